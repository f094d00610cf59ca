use crate::RemoldError;
use crate::RemoldResult;

/// A buffer of source text plus the offsets that track segmentation
/// progress: what has been consumed (`processed`), where the current match
/// begins (`start`), where the current block ends (`end`), and how many
/// characters bracket removal physically deleted (`trim`).
///
/// A cursor lives for exactly one recursion level of the segmentation
/// engine: it is created over the parent's pending text, consumed
/// completely, and discarded once the parent advances past it.
#[derive(Debug, Clone)]
pub struct SegmentCursor {
	text: String,
	processed: usize,
	start: usize,
	end: usize,
	trim: usize,
}

impl SegmentCursor {
	pub fn new(text: impl Into<String>) -> Self {
		let text = text.into();
		let end = text.len();
		tracing::trace!(len = end, "new segment cursor");
		Self {
			text,
			processed: 0,
			start: 0,
			end,
			trim: 0,
		}
	}

	/// The full buffer text.
	pub fn text(&self) -> &str {
		&self.text
	}

	pub fn start(&self) -> usize {
		self.start
	}

	pub fn end(&self) -> usize {
		self.end
	}

	/// Characters physically removed from the buffer by bracket removal.
	/// The parent cursor adds this back when skipping past the child.
	pub fn trim(&self) -> usize {
		self.trim
	}

	pub fn set_trim(&mut self, trim: usize) {
		self.trim = trim;
	}

	/// The text between `start` and `end`: the block currently being
	/// processed. Empty when `start` has reached `end`.
	pub fn to_be_processed(&self) -> &str {
		if self.start < self.end {
			&self.text[self.start..self.end]
		} else {
			""
		}
	}

	/// The text between `processed` and `start`: found by scanning but not
	/// claimed by any match.
	pub fn preprocessed(&self) -> &str {
		if self.processed < self.start {
			&self.text[self.processed..self.start]
		} else {
			""
		}
	}

	/// The text after `end`: left over once this level's sections have all
	/// run.
	pub fn trailing(&self) -> &str {
		if self.end < self.text.len() {
			&self.text[self.end..]
		} else {
			""
		}
	}

	/// Everything from `start` to the end of the buffer; the window the
	/// next search runs over.
	pub fn remaining_from_start(&self) -> &str {
		&self.text[self.start..]
	}

	/// Move `start` forward by `offset` bytes.
	///
	/// When the new start passes `end`, `end` is reset to `offset` — the
	/// historical behaviour of the system this engine reproduces; see the
	/// cursor tests for the observable effect.
	pub fn advance_start(&mut self, offset: usize) -> RemoldResult<()> {
		self.check_index(self.start + offset)?;
		self.start += offset;
		if self.start > self.end {
			self.end = offset;
		}
		self.trace("advance_start");
		Ok(())
	}

	/// Mark everything before `start` as consumed.
	pub fn commit_processed(&mut self) {
		self.processed = self.start;
		self.trace("commit_processed");
	}

	/// Set the end of the current block.
	pub fn set_end(&mut self, index: usize) -> RemoldResult<()> {
		self.check_index(index)?;
		self.end = index;
		self.trace("set_end");
		Ok(())
	}

	/// Jump `start` to the end of the current block so the next search
	/// scans the remainder.
	pub fn seek_end(&mut self) {
		self.start = self.end;
		self.trace("seek_end");
	}

	/// Remove the single character at `index` from the buffer. Used by
	/// bracket removal; the caller accounts for the shrinkage via
	/// [`SegmentCursor::set_trim`].
	pub fn remove_char(&mut self, index: usize) -> RemoldResult<()> {
		if index >= self.text.len() {
			return Err(RemoldError::CursorIndex {
				index,
				len: self.text.len(),
			});
		}
		self.text.remove(index);
		Ok(())
	}

	/// Finish processing: every offset moves to the end of the buffer.
	pub fn close(&mut self) {
		self.start = self.text.len();
		self.end = self.text.len();
		self.processed = self.text.len();
		self.trace("close");
	}

	fn check_index(&self, index: usize) -> RemoldResult<()> {
		if index > self.text.len() {
			return Err(RemoldError::CursorIndex {
				index,
				len: self.text.len(),
			});
		}
		Ok(())
	}

	fn trace(&self, operation: &str) {
		tracing::trace!(
			operation,
			processed = self.processed,
			start = self.start,
			end = self.end,
			trim = self.trim,
		);
	}
}
