use std::collections::BTreeMap;

use crate::template::CONTENTS_MARKER;

/// Replaced in every target with the target's file name, stripped of
/// directories and extension. Part of the wire contract with template
/// authors.
pub const CLASS_NAME_MARKER: &str = "##_CLASS_NAME_##";

const INDENT: &str = "    ";

/// Fragments accumulated for the targets of one source conversion, keyed
/// by target file id and then by an ordering slot. Slots are assigned by
/// [`FragmentMap::insert`] and never reused; flattening concatenates the
/// fragments in slot order.
#[derive(Debug, Clone, Default)]
pub struct FragmentMap {
	targets: BTreeMap<u32, BTreeMap<usize, String>>,
}

impl FragmentMap {
	pub fn new() -> Self {
		Self::default()
	}

	/// Place `fragment` in the next free slot of `target_id`'s map.
	///
	/// An `order` of zero (or less) takes the first free slot from 1
	/// upward. A positive `order` is scaled by 100 and the fragment lands
	/// in the first free slot at or above that point, so higher orders
	/// always flatten after lower ones while 99 in-between slots stay
	/// available for fragments emitted by nested sections. More than 99
	/// fragments in one order group overflow into the next; their relative
	/// placement is undefined.
	pub fn insert(&mut self, target_id: u32, order: i32, fragment: impl Into<String>) {
		let slots = self.targets.entry(target_id).or_default();
		let order = i64::from(order) * 100;
		let mut first_gap = 1usize;
		while slots.contains_key(&first_gap) {
			first_gap += 1;
		}
		if order <= 0 {
			tracing::trace!(target_id, slot = first_gap, "fragment inserted");
			slots.insert(first_gap, fragment.into());
		} else {
			let order = order as usize;
			while slots.contains_key(&(first_gap + order)) {
				first_gap += 1;
			}
			tracing::trace!(target_id, slot = first_gap + order, "fragment inserted");
			slots.insert(first_gap + order, fragment.into());
		}
	}

	/// Flatten every target's fragments in slot order and append them to
	/// `output`.
	pub fn merge_into(self, output: &mut TargetOutput) {
		for (target_id, slots) in self.targets {
			let mut flattened = String::new();
			for fragment in slots.into_values() {
				flattened.push_str(&fragment);
			}
			output.append(target_id, &flattened);
		}
	}
}

/// The assembled output text per target file id.
#[derive(Debug, Clone, Default)]
pub struct TargetOutput {
	targets: BTreeMap<u32, String>,
}

impl TargetOutput {
	pub fn new() -> Self {
		Self::default()
	}

	/// Append `text` to the output of `target_id`, creating it on first
	/// use.
	pub fn append(&mut self, target_id: u32, text: &str) {
		self.targets.entry(target_id).or_default().push_str(text);
	}

	pub fn get(&self, target_id: u32) -> Option<&str> {
		self.targets.get(&target_id).map(String::as_str)
	}

	pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
		self.targets.iter().map(|(id, text)| (*id, text.as_str()))
	}

	pub fn is_empty(&self) -> bool {
		self.targets.is_empty()
	}
}

impl IntoIterator for TargetOutput {
	type IntoIter = std::collections::btree_map::IntoIter<u32, String>;
	type Item = (u32, String);

	fn into_iter(self) -> Self::IntoIter {
		self.targets.into_iter()
	}
}

/// The file name of `path` without directories or extension; substituted
/// for the class-name marker.
pub fn strip_path_for_class_name(path: &str) -> &str {
	let name = match path.rfind('/') {
		Some(slash) => &path[slash + 1..],
		None => path,
	};
	match name.rfind('.') {
		Some(dot) => &name[..dot],
		None => name,
	}
}

/// Resolve the placeholder tokens left in an assembled target: every
/// class-name marker becomes the target's class name and every remaining
/// contents marker is deleted.
pub fn finalize_target(text: &str, target_path: &str) -> String {
	let class_name = strip_path_for_class_name(target_path);
	text.replace(CLASS_NAME_MARKER, class_name)
		.replace(CONTENTS_MARKER, "")
}

/// Re-derive indentation purely from `{`/`}` nesting depth and collapse
/// runs of blank lines. On every line break the leading whitespace is
/// replaced with four spaces per depth level; a line opening with `}`
/// sits one level shallower. Applying this to already re-indented text is
/// a no-op.
pub fn reindent(text: &str) -> String {
	let mut depth = 0usize;
	let mut output = String::with_capacity(text.len());
	let mut spacing = false;
	let mut inserted_spaces = false;
	let mut newline_count = 0usize;

	for ch in text.chars() {
		if spacing {
			if ch == ' ' || ch == '\t' {
				continue;
			}
			if ch == '\n' {
				let previous = newline_count;
				newline_count += 1;
				if previous > 2 {
					continue;
				}
				inserted_spaces = true;
			}
			if !inserted_spaces {
				for _ in 0..depth {
					output.push_str(INDENT);
				}
				inserted_spaces = true;
				newline_count = 0;
			}
			if ch == '}' && output.ends_with(INDENT) {
				output.truncate(output.len() - INDENT.len());
			}
			spacing = false;
			output.push(ch);
		} else {
			output.push(ch);
		}
		if ch == '}' && depth > 0 {
			depth -= 1;
		}
		if ch == '{' {
			depth += 1;
		}
		if ch == '\n' {
			spacing = true;
			inserted_spaces = false;
			newline_count += 1;
		}
	}

	output
}
