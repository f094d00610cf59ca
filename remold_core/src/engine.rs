use std::collections::HashMap;

use crate::RemoldResult;
use crate::assemble::FragmentMap;
use crate::assemble::TargetOutput;
use crate::brackets;
use crate::brackets::BracketCounter;
use crate::brackets::LeadingBracket;
use crate::config::BlockKind;
use crate::config::CodeSection;
use crate::cursor::SegmentCursor;
use crate::linker::SectionArena;
use crate::template;
use crate::translate;
use crate::translate::TranslationTable;

/// Converts one source text by walking a section tree against it.
///
/// Each recursion level owns a fresh [`SegmentCursor`] over the parent's
/// pending block. Scanning alternates between searching for the section's
/// start pattern, emitting the unmatched text ahead of a match, bounding
/// the matched block per its [`BlockKind`], and either translating the
/// block (leaf) or segmenting it further with the child sections
/// (container). Fragments accumulate in a [`FragmentMap`] and merge into
/// the shared [`TargetOutput`] when the tree has been fully walked.
#[derive(Debug)]
pub struct CodeConverter<'a> {
	translations: &'a TranslationTable,
	templates: &'a HashMap<u32, String>,
}

impl<'a> CodeConverter<'a> {
	pub fn new(translations: &'a TranslationTable, templates: &'a HashMap<u32, String>) -> Self {
		Self {
			translations,
			templates,
		}
	}

	/// Convert `source` with the tree rooted at `root`, appending the
	/// assembled fragments to `output` per target file id.
	pub fn convert(
		&self,
		source: &str,
		arena: &SectionArena,
		root: usize,
		output: &mut TargetOutput,
	) -> RemoldResult<()> {
		tracing::debug!(section = %arena.data(root).title, "converting code for section tree");
		let mut pieces = FragmentMap::new();
		let mut cursor = SegmentCursor::new(source);
		self.process_content(&cursor, arena, root, None, 1, 1, &mut pieces)?;
		self.append_trailing(arena, root, &mut cursor, &mut pieces)?;
		pieces.merge_into(output);
		Ok(())
	}

	/// One recursion level: scan the pending block of `external` with the
	/// section at `index`. `seq` is this section's 1-based position among
	/// its siblings; the returned cursor tells the caller how far the
	/// level consumed (`end`) and how much it physically removed (`trim`).
	#[allow(clippy::too_many_arguments)]
	fn process_content(
		&self,
		external: &SegmentCursor,
		arena: &SectionArena,
		index: usize,
		parent: Option<usize>,
		seq: usize,
		depth: usize,
		pieces: &mut FragmentMap,
	) -> RemoldResult<SegmentCursor> {
		let section = arena.data(index);
		let mut cursor = SegmentCursor::new(external.to_be_processed());
		let pattern = translate::compile(&section.search_start)?;

		loop {
			if cursor.remaining_from_start().trim().is_empty() {
				break;
			}
			tracing::trace!(depth, pattern = %section.search_start, "searching for section start");
			let found = pattern
				.find(cursor.remaining_from_start())
				.map(|found| (found.start(), found.end()));
			let Some((match_start, match_end)) = found else {
				self.append_preprocessed(arena, index, parent, seq, &mut cursor, pieces)?;
				break;
			};
			cursor.advance_start(match_start)?;
			self.append_preprocessed(arena, index, parent, seq, &mut cursor, pieces)?;
			extract_code_block(section, &mut cursor, match_start, match_end)?;
			self.append_code(arena, index, parent, seq, depth, &mut cursor, pieces)?;
			if section.process_once {
				break;
			}
		}

		if is_last_section(arena, parent, seq) {
			let owner = parent.unwrap_or(index);
			self.append_trailing(arena, owner, &mut cursor, pieces)?;
		}

		Ok(cursor)
	}

	/// Emit the text scanned past but not claimed by the match. The first
	/// child of a parent routes this through the parent's translations and
	/// target, so text between the parent's match and the first child's
	/// match stays with the parent.
	fn append_preprocessed(
		&self,
		arena: &SectionArena,
		index: usize,
		parent: Option<usize>,
		seq: usize,
		cursor: &mut SegmentCursor,
		pieces: &mut FragmentMap,
	) -> RemoldResult<()> {
		let owner = match parent {
			Some(parent_index) if seq == 1 => parent_index,
			_ => index,
		};
		let section = arena.data(owner);
		let translated = self.translate(cursor.preprocessed(), &section.translation_ids)?;
		pieces.insert(section.target_file_id, section.target_order, translated);
		cursor.commit_processed();
		Ok(())
	}

	/// Emit the matched block: template preamble, output preamble, then
	/// either the translated block itself (leaf) or the children's
	/// recursive output (container), then the postambles.
	#[allow(clippy::too_many_arguments)]
	fn append_code(
		&self,
		arena: &SectionArena,
		index: usize,
		parent: Option<usize>,
		parent_seq: usize,
		depth: usize,
		cursor: &mut SegmentCursor,
		pieces: &mut FragmentMap,
	) -> RemoldResult<()> {
		let section = arena.data(index);
		let template_pre = template::preamble(section.template_id, self.templates);
		let template_post = template::postamble(section.template_id, self.templates);

		pieces.insert(section.target_file_id, section.target_order, template_pre);
		if !section.output_preamble.trim().is_empty() {
			pieces.insert(
				section.target_file_id,
				section.target_order,
				section.output_preamble.as_str(),
			);
		}

		let children = arena.children(index).to_vec();
		if children.is_empty() {
			let translated = self.translate(cursor.to_be_processed(), &section.translation_ids)?;
			pieces.insert(section.target_file_id, section.target_order, translated);
			cursor.seek_end();
			cursor.commit_processed();
		} else {
			for (position, child) in children.iter().enumerate() {
				let level = self.process_content(
					cursor,
					arena,
					*child,
					Some(index),
					position + 1,
					depth + 1,
					pieces,
				)?;
				cursor.advance_start(level.end() + level.trim())?;
				cursor.commit_processed();
			}
			if is_last_section(arena, parent, parent_seq) {
				let owner = parent.unwrap_or(index);
				self.append_trailing(arena, owner, cursor, pieces)?;
			}
		}

		if !section.output_postamble.trim().is_empty() {
			pieces.insert(
				section.target_file_id,
				section.target_order,
				section.output_postamble.as_str(),
			);
		}
		pieces.insert(section.target_file_id, section.target_order, template_post);
		Ok(())
	}

	/// Emit the text after the current block's end and close the cursor.
	fn append_trailing(
		&self,
		arena: &SectionArena,
		owner: usize,
		cursor: &mut SegmentCursor,
		pieces: &mut FragmentMap,
	) -> RemoldResult<()> {
		let section = arena.data(owner);
		let translated = self.translate(cursor.trailing(), &section.translation_ids)?;
		pieces.insert(section.target_file_id, section.target_order, translated);
		cursor.close();
		Ok(())
	}

	fn translate(&self, code: &str, ids: &[u32]) -> RemoldResult<String> {
		let rules = self.translations.entries_for(ids)?;
		translate::apply(code, &rules)
	}
}

/// True when this section is the last of its parent's children, or has no
/// parent at all. The leftover text of the shared buffer is emitted once,
/// by the last sibling.
fn is_last_section(arena: &SectionArena, parent: Option<usize>, seq: usize) -> bool {
	parent.is_none_or(|parent_index| seq == arena.children(parent_index).len())
}

/// Bound the matched block by moving the cursor's `end` per the section's
/// block kind, optionally stripping the search text and the block's
/// outermost bracket pair. `match_start`/`match_end` are relative to the
/// cursor's `start` at the time of the match.
pub(crate) fn extract_code_block(
	section: &CodeSection,
	cursor: &mut SegmentCursor,
	match_start: usize,
	match_end: usize,
) -> RemoldResult<()> {
	if section.remove_search {
		tracing::trace!("removing matched search text");
		cursor.advance_start(match_end - match_start)?;
		cursor.commit_processed();
	}

	match section.block_kind {
		BlockKind::Auto => {
			tracing::trace!("block boundary: auto");
			let search_info = BracketCounter::new(&section.search_start);
			if !section.search_end.trim().is_empty() {
				if let Some(boundary) = find_end(cursor.remaining_from_start(), &section.search_end)? {
					let end = cursor.start() + boundary;
					cursor.set_end(end)?;
					return Ok(());
				}
			} else if let (Some(open), Some(close)) =
				(search_info.leading().open(), search_info.leading().close())
			{
				let boundary = brackets::index_to_corresponding_close(
					cursor.remaining_from_start(),
					open,
					close,
					search_info.leading_count(),
				);
				let end = cursor.start() + boundary;
				cursor.set_end(end)?;
				return Ok(());
			}
		}
		BlockKind::SearchEnd => {
			tracing::trace!("block boundary: search_end");
			if !section.search_end.trim().is_empty() {
				if let Some(boundary) = find_end(cursor.remaining_from_start(), &section.search_end)? {
					let end = cursor.start() + boundary;
					cursor.set_end(end)?;
					return Ok(());
				}
			}
		}
		BlockKind::Statement => {
			tracing::trace!("block boundary: statement");
			let info = BracketCounter::new(cursor.remaining_from_start());
			if let Some(boundary) = info.index_of_closed_round() {
				let end = cursor.start() + boundary;
				cursor.set_end(end)?;
			}
			remove_brackets(&info, section, cursor, LeadingBracket::Round)?;
			return Ok(());
		}
		BlockKind::Function => {
			tracing::trace!("block boundary: function");
			let info = BracketCounter::new(cursor.remaining_from_start());
			if let Some(boundary) = info.index_of_closed_curly() {
				let end = cursor.start() + boundary;
				cursor.set_end(end)?;
			}
			remove_brackets(&info, section, cursor, LeadingBracket::Curly)?;
			return Ok(());
		}
		BlockKind::Command => {
			tracing::trace!("block boundary: command");
			if let Some(boundary) = find_end(cursor.remaining_from_start(), ";")? {
				let end = cursor.start() + boundary;
				cursor.set_end(end)?;
				return Ok(());
			}
		}
		BlockKind::LineEnd => {
			tracing::trace!("block boundary: line_end");
			if let Some(boundary) = find_end(cursor.remaining_from_start(), "\n")? {
				let end = cursor.start() + boundary;
				cursor.set_end(end)?;
				return Ok(());
			}
		}
		BlockKind::All => {}
	}

	// Every kind whose boundary was not found takes the whole buffer.
	tracing::trace!("block boundary: all");
	let end = cursor.text().len();
	cursor.set_end(end)?;
	Ok(())
}

/// Delete the block's outermost bracket pair of the given kind from the
/// buffer and shrink the block end accordingly. A block missing either
/// bracket is left untouched.
fn remove_brackets(
	info: &BracketCounter,
	section: &CodeSection,
	cursor: &mut SegmentCursor,
	kind: LeadingBracket,
) -> RemoldResult<()> {
	if !section.remove_brackets {
		return Ok(());
	}
	let pair = match kind {
		LeadingBracket::Curly => (info.index_of_open_curly(), info.index_of_closed_curly()),
		_ => (info.index_of_open_round(), info.index_of_closed_round()),
	};
	let (Some(first), Some(last)) = pair else {
		return Ok(());
	};
	cursor.remove_char(cursor.start() + last - 1)?;
	cursor.remove_char(cursor.start() + first)?;
	cursor.set_trim(2);
	let end = cursor.end() - cursor.trim();
	cursor.set_end(end)?;
	Ok(())
}

fn find_end(text: &str, pattern: &str) -> RemoldResult<Option<usize>> {
	let regex = translate::compile(pattern)?;
	Ok(regex.find(text).map(|found| found.end()))
}
