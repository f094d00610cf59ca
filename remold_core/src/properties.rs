use std::collections::HashMap;

use crate::RemoldResult;
use crate::assemble::TargetOutput;
use crate::config::CodeSection;
use crate::template;
use crate::translate;
use crate::translate::TranslationTable;

/// Replaced in the output preamble with the matched property's key.
pub const KEY_MARKER: &str = "##_KEY_##";
/// Replaced in the output preamble with the matched property's value.
pub const VALUE_MARKER: &str = "##_VALUE_##";

const LINE_JOIN: char = '\\';

/// Converts line-oriented `key=value` property sources.
///
/// Unlike [`crate::engine::CodeConverter`] this engine does not recurse:
/// a single section selects the lines (by `search_start` match), and its
/// output preamble acts as a per-line format string with [`KEY_MARKER`]
/// and [`VALUE_MARKER`] placeholders. Lines ending in `\` are joined with
/// their continuation before matching.
#[derive(Debug)]
pub struct PropertyConverter<'a> {
	translations: &'a TranslationTable,
	templates: &'a HashMap<u32, String>,
}

impl<'a> PropertyConverter<'a> {
	pub fn new(translations: &'a TranslationTable, templates: &'a HashMap<u32, String>) -> Self {
		Self {
			translations,
			templates,
		}
	}

	/// Convert `source` with `section`, appending the result directly to
	/// the section's target.
	pub fn convert(
		&self,
		source: &str,
		section: &CodeSection,
		output: &mut TargetOutput,
	) -> RemoldResult<()> {
		tracing::debug!(section = %section.title, "converting properties for section");
		section.verify()?;
		let pattern = translate::compile(&section.search_start)?;
		let rules = self.translations.entries_for(&section.translation_ids)?;

		let mut converted = String::new();
		converted.push_str(template::preamble(section.template_id, self.templates));

		for line in logical_lines(source) {
			if !pattern.is_match(&line) {
				continue;
			}
			let Some(equals) = line.find('=') else {
				continue;
			};
			if equals == 0 || equals + 1 == line.len() {
				continue;
			}
			let key = &line[..equals];
			let value = &line[equals + 1..];
			tracing::trace!(key, value, "matched property line");
			let formatted = section
				.output_preamble
				.replace(KEY_MARKER, key)
				.replace(VALUE_MARKER, value);
			converted.push_str(&translate::apply(&formatted, &rules)?);
			converted.push('\n');
		}

		converted.push_str(template::postamble(section.template_id, self.templates));
		output.append(section.target_file_id, &converted);
		Ok(())
	}
}

/// Split `source` into logical property lines: each raw line is trimmed,
/// and a line ending in `\` is joined with the following one (the join
/// character itself is dropped).
fn logical_lines(source: &str) -> Vec<String> {
	let mut lines = Vec::new();
	let mut pending = String::new();

	for part in source.split('\n') {
		let part = part.trim();
		pending.push_str(part.strip_suffix(LINE_JOIN).unwrap_or(part));
		if part.is_empty() || !part.ends_with(LINE_JOIN) {
			tracing::trace!(line = %pending, "extracted property line");
			lines.push(std::mem::take(&mut pending));
		}
	}

	lines
}
