use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use crate::RemoldError;
use crate::RemoldResult;
use crate::assemble;
use crate::assemble::TargetOutput;
use crate::config::CodeSection;
use crate::config::RemoldConfig;
use crate::config::SourceKind;
use crate::engine::CodeConverter;
use crate::files;
use crate::linker::SectionArena;
use crate::linker::SectionLinker;
use crate::properties::PropertyConverter;
use crate::translate;
use crate::translate::TranslationTable;

/// One finalized target: its id, resolved path, and the text to write.
#[derive(Debug, Clone)]
pub struct TargetResult {
	pub id: u32,
	pub path: PathBuf,
	pub contents: String,
}

/// The result of a full conversion run, before any file is written.
#[derive(Debug, Clone, Default)]
pub struct ConversionOutcome {
	pub targets: Vec<TargetResult>,
}

/// Run every conversion in `config`. `root` is the directory config
/// paths resolve against (normally the config file's directory).
///
/// The run is fail-fast: all ids, patterns, and component links are
/// verified before the first source is read, and any error aborts before
/// a single target is produced.
pub fn run(config: &RemoldConfig, root: &Path) -> RemoldResult<ConversionOutcome> {
	verify_config(config)?;
	let (arena, conversion_roots) = link_sections(config)?;

	let translations = TranslationTable::new(config.translations.clone());
	let sources = files::read_contents(
		config.sources.iter().map(|entry| (entry.id, entry.path.as_path())),
		root,
	)?;
	let templates = files::read_contents(
		config.templates.iter().map(|entry| (entry.id, entry.path.as_path())),
		root,
	)?;

	let mut output = TargetOutput::new();
	for (conversion, roots) in config.conversions.iter().zip(&conversion_roots) {
		let entry = config
			.source(conversion.source_id)
			.ok_or(RemoldError::UnknownSourceId(conversion.source_id))?;
		let source = sources
			.get(&conversion.source_id)
			.ok_or(RemoldError::UnknownSourceId(conversion.source_id))?;
		for root_index in roots {
			tracing::debug!(
				source = conversion.source_id,
				section = %arena.data(*root_index).title,
				"processing code section"
			);
			match entry.kind {
				SourceKind::Code => {
					CodeConverter::new(&translations, &templates).convert(
						source,
						&arena,
						*root_index,
						&mut output,
					)?;
				}
				SourceKind::Properties => {
					PropertyConverter::new(&translations, &templates).convert(
						source,
						arena.data(*root_index),
						&mut output,
					)?;
				}
			}
		}
	}

	finalize(config, root, output)
}

/// Write every target of `outcome`, honoring the overwrite policy.
pub fn write_outcome(outcome: &ConversionOutcome, overwrite: bool) -> RemoldResult<()> {
	for target in &outcome.targets {
		files::write_contents(&target.path, &target.contents, overwrite)?;
	}
	Ok(())
}

/// Substitute the class-name placeholder from each target's file name,
/// delete leftover contents markers, and re-derive the indentation.
fn finalize(
	config: &RemoldConfig,
	root: &Path,
	output: TargetOutput,
) -> RemoldResult<ConversionOutcome> {
	let mut targets = Vec::new();
	for (id, text) in output {
		let entry = config.target(id).ok_or(RemoldError::UnknownTargetId(id))?;
		let path_display = entry.path.to_string_lossy().replace('\\', "/");
		let finalized = assemble::finalize_target(&text, &path_display);
		targets.push(TargetResult {
			id,
			path: files::resolve(root, &entry.path),
			contents: assemble::reindent(&finalized),
		});
	}
	Ok(ConversionOutcome { targets })
}

/// Flatten all section trees into one arena and resolve component
/// references. Returns the arena plus the root indices per conversion.
pub fn link_sections(config: &RemoldConfig) -> RemoldResult<(SectionArena, Vec<Vec<usize>>)> {
	let mut arena = SectionArena::new();
	for component in &config.components {
		arena.add_component(component.clone());
	}

	let mut conversion_roots = Vec::new();
	let mut all_roots = Vec::new();
	for conversion in &config.conversions {
		let mut roots = Vec::new();
		for section in &conversion.sections {
			let index = arena.add_tree(section.clone());
			roots.push(index);
			all_roots.push(index);
		}
		conversion_roots.push(roots);
	}

	SectionLinker::link_all(&mut arena, &all_roots)?;
	Ok((arena, conversion_roots))
}

/// The pre-pass over the whole configuration: positive ids everywhere,
/// resolvable cross-references, unique section ids, and compilable
/// patterns. Runs before any text is processed.
pub fn verify_config(config: &RemoldConfig) -> RemoldResult<()> {
	for entry in &config.sources {
		if entry.id == 0 {
			return Err(RemoldError::InvalidId {
				entity: "source file",
				id: entry.id,
			});
		}
	}
	for entry in &config.targets {
		if entry.id == 0 {
			return Err(RemoldError::InvalidId {
				entity: "target file",
				id: entry.id,
			});
		}
	}
	for entry in &config.templates {
		if entry.id == 0 {
			return Err(RemoldError::InvalidId {
				entity: "template",
				id: entry.id,
			});
		}
	}
	for rule in &config.translations {
		if rule.id == 0 {
			return Err(RemoldError::InvalidId {
				entity: "translation",
				id: rule.id,
			});
		}
		translate::compile(&rule.from)?;
	}

	let translations = TranslationTable::new(config.translations.clone());
	let mut seen_ids = HashSet::new();
	for section in &config.components {
		verify_tree(config, &translations, section, &mut seen_ids)?;
	}
	for conversion in &config.conversions {
		if config.source(conversion.source_id).is_none() {
			return Err(RemoldError::UnknownSourceId(conversion.source_id));
		}
		for section in &conversion.sections {
			verify_tree(config, &translations, section, &mut seen_ids)?;
		}
	}

	Ok(())
}

fn verify_tree(
	config: &RemoldConfig,
	translations: &TranslationTable,
	section: &CodeSection,
	seen_ids: &mut HashSet<u32>,
) -> RemoldResult<()> {
	section.verify()?;
	if !seen_ids.insert(section.id) {
		return Err(RemoldError::DuplicateSectionId(section.id));
	}
	if config.target(section.target_file_id).is_none() {
		return Err(RemoldError::UnknownTargetId(section.target_file_id));
	}
	if let Some(template_id) = section.template_id {
		if config.template(template_id).is_none() {
			return Err(RemoldError::UnknownTemplateId(template_id));
		}
	}
	translate::compile(&section.search_start)?;
	if !section.search_end.trim().is_empty() {
		translate::compile(&section.search_end)?;
	}
	translations.entries_for(&section.translation_ids)?;

	let unknown: Vec<String> = section
		.component_ref_ids
		.iter()
		.filter(|id| !config.components.iter().any(|component| component.id == **id))
		.map(ToString::to_string)
		.collect();
	if !unknown.is_empty() {
		return Err(RemoldError::UnknownComponentIds(unknown.join(" ")));
	}

	for child in &section.children {
		verify_tree(config, translations, child, seen_ids)?;
	}
	Ok(())
}
