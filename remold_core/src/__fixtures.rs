use std::collections::HashMap;

use crate::RemoldResult;
use crate::assemble::TargetOutput;
use crate::config::BlockKind;
use crate::config::CodeSection;
use crate::config::TranslationOp;
use crate::config::TranslationRule;
use crate::engine::CodeConverter;
use crate::linker::SectionArena;
use crate::translate::TranslationTable;

/// A leaf section with every optional field at its default.
pub(crate) fn section(id: u32, search_start: &str) -> CodeSection {
	CodeSection {
		id,
		title: format!("SECTION {id}"),
		search_start: search_start.to_string(),
		search_end: String::new(),
		block_kind: BlockKind::Auto,
		process_once: true,
		remove_search: false,
		remove_brackets: false,
		output_preamble: String::new(),
		output_postamble: String::new(),
		template_id: None,
		target_file_id: 1,
		target_order: 0,
		translation_ids: vec![],
		component_ref_ids: vec![],
		children: vec![],
	}
}

pub(crate) fn replace_rule(id: u32, from: &str, to: &str, once: bool) -> TranslationRule {
	TranslationRule {
		id,
		from: from.to_string(),
		to: to.to_string(),
		op: TranslationOp::Replace,
		process_once: once,
	}
}

pub(crate) fn case_rule(id: u32, from: &str, op: TranslationOp, once: bool) -> TranslationRule {
	TranslationRule {
		id,
		from: from.to_string(),
		to: String::new(),
		op,
		process_once: once,
	}
}

pub(crate) fn template_map(entries: &[(u32, &str)]) -> HashMap<u32, String> {
	entries
		.iter()
		.map(|(id, text)| (*id, (*text).to_string()))
		.collect()
}

/// Convert `source` with a single section tree and no translations or
/// templates.
pub(crate) fn convert_code(source: &str, section: CodeSection) -> RemoldResult<TargetOutput> {
	convert_code_with(source, section, vec![], HashMap::new())
}

pub(crate) fn convert_code_with(
	source: &str,
	section: CodeSection,
	rules: Vec<TranslationRule>,
	templates: HashMap<u32, String>,
) -> RemoldResult<TargetOutput> {
	let mut arena = SectionArena::new();
	let root = arena.add_tree(section);
	let translations = TranslationTable::new(rules);
	let mut output = TargetOutput::new();
	CodeConverter::new(&translations, &templates).convert(source, &arena, root, &mut output)?;
	Ok(output)
}
