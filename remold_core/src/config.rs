use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::RemoldError;
use crate::RemoldResult;

/// Default config file name discovered next to the sources.
pub const CONFIG_FILE_NAME: &str = "remold.toml";

/// Prefix used for auto-generated section titles.
const SECTION_TITLE_PREFIX: &str = "SECTION_";

/// How the text of a matched section is bounded.
///
/// The boundary is computed against the text following the search match;
/// see [`crate::engine`] for the exact rules per kind.
#[derive(Debug, Clone, Copy, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
	/// Use `search_end` when present, otherwise derive the boundary from the
	/// unmatched bracket left open by the search pattern itself. Falls back
	/// to [`BlockKind::All`].
	#[default]
	Auto,
	/// The end of the `search_end` match.
	SearchEnd,
	/// Just past the first balanced `)`.
	Statement,
	/// Just past the first balanced `}`.
	Function,
	/// The end of the first `;`.
	Command,
	/// The end of the first line break.
	LineEnd,
	/// The rest of the buffer.
	All,
}

/// The operation a translation rule performs on its regex matches.
#[derive(Debug, Clone, Copy, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum TranslationOp {
	/// Substitute the match with the rule's `to` string.
	#[default]
	Replace,
	/// Upper-case the matched span, leaving the rest untouched.
	UpperCase,
	/// Lower-case the matched span, leaving the rest untouched.
	LowerCase,
}

/// A regex substitution or case transform applied to text before emission.
///
/// ```toml
/// [[translations]]
/// id = 7
/// from = "java\\.util\\.Vector"
/// to = "java.util.ArrayList"
/// ```
#[derive(Debug, Clone, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TranslationRule {
	pub id: u32,
	/// The regular expression to search for.
	pub from: String,
	/// The replacement text. Only meaningful for [`TranslationOp::Replace`].
	#[serde(default)]
	pub to: String,
	#[serde(default)]
	pub op: TranslationOp,
	/// When true only the first match is processed.
	#[serde(default = "default_true")]
	pub process_once: bool,
}

/// One node of the section tree: a pattern to find, how to bound the matched
/// block, and how to transform and place the result.
///
/// ```toml
/// [[conversions.sections]]
/// id = 1
/// title = "DAO METHOD"
/// search_start = "public void.*\\{"
/// block_kind = "function"
/// target_file_id = 1
/// output_preamble = "fn converted() {"
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CodeSection {
	/// Unique positive id across all sections and components.
	#[serde(default)]
	pub id: u32,
	/// Display title. Auto-generated during normalization when blank.
	#[serde(default)]
	pub title: String,
	/// The regular expression that opens a section.
	#[serde(default)]
	pub search_start: String,
	/// An optional regular expression that closes a section.
	#[serde(default)]
	pub search_end: String,
	#[serde(default)]
	pub block_kind: BlockKind,
	/// Stop after the first match instead of rescanning the remainder.
	#[serde(default = "default_true")]
	pub process_once: bool,
	/// Strip the matched search text from the output.
	#[serde(default)]
	pub remove_search: bool,
	/// Strip the block's outermost bracket pair from the output. Only honored
	/// for [`BlockKind::Statement`] and [`BlockKind::Function`].
	#[serde(default)]
	pub remove_brackets: bool,
	/// Text emitted ahead of the section's own output.
	#[serde(default)]
	pub output_preamble: String,
	/// Text emitted after the section's own output.
	#[serde(default)]
	pub output_postamble: String,
	/// Template wrapped around the section output, split at the contents
	/// marker.
	#[serde(default)]
	pub template_id: Option<u32>,
	/// The target file this section's fragments are written to.
	#[serde(default)]
	pub target_file_id: u32,
	/// Ordering group within the target; higher orders land later.
	#[serde(default)]
	pub target_order: i32,
	/// Translation rules applied, in order, to every emitted fragment.
	#[serde(default)]
	pub translation_ids: Vec<u32>,
	/// Reusable component subtrees appended as additional children.
	#[serde(default)]
	pub component_ref_ids: Vec<u32>,
	/// Child sections the matched block is recursively segmented with.
	#[serde(default)]
	pub children: Vec<CodeSection>,
}

/// What a source file contains, selecting the conversion engine.
#[derive(Debug, Clone, Copy, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
	/// Free-form code, segmented recursively.
	#[default]
	Code,
	/// Line-oriented `key=value` properties.
	Properties,
}

/// A source file entry: the text to convert.
#[derive(Debug, Clone, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SourceFile {
	pub id: u32,
	pub path: PathBuf,
	#[serde(default)]
	pub kind: SourceKind,
}

/// A target or template file entry.
#[derive(Debug, Clone, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileEntry {
	pub id: u32,
	pub path: PathBuf,
}

/// One conversion: a source id plus the section trees applied to it.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Conversion {
	pub source_id: u32,
	#[serde(default)]
	pub sections: Vec<CodeSection>,
}

/// The full configuration loaded from `remold.toml`.
///
/// ```toml
/// overwrite_targets = true
///
/// [[sources]]
/// id = 1
/// path = "legacy/Main.java"
///
/// [[targets]]
/// id = 1
/// path = "out/Main.kt"
///
/// [[conversions]]
/// source_id = 1
///
/// [[conversions.sections]]
/// id = 1
/// search_start = "class"
/// target_file_id = 1
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoldConfig {
	/// Replace target files that already exist. When false, an existing
	/// target aborts the run before anything is written.
	#[serde(default)]
	pub overwrite_targets: bool,
	#[serde(default)]
	pub sources: Vec<SourceFile>,
	#[serde(default)]
	pub targets: Vec<FileEntry>,
	#[serde(default)]
	pub templates: Vec<FileEntry>,
	#[serde(default)]
	pub translations: Vec<TranslationRule>,
	/// Reusable section subtrees referenced by id from `component_ref_ids`.
	#[serde(default)]
	pub components: Vec<CodeSection>,
	#[serde(default)]
	pub conversions: Vec<Conversion>,
}

impl RemoldConfig {
	/// Load and normalize the config from `path`.
	pub fn load(path: &Path) -> RemoldResult<Self> {
		let content = std::fs::read_to_string(path).map_err(|e| {
			RemoldError::FileRead {
				path: path.display().to_string(),
				reason: e.to_string(),
			}
		})?;
		let mut config: RemoldConfig =
			toml::from_str(&content).map_err(|e| RemoldError::ConfigParse(e.to_string()))?;
		config.normalize();
		Ok(config)
	}

	/// Fill in the derivable defaults that serde cannot: auto-generated
	/// titles for blank ones, numbered per run.
	pub fn normalize(&mut self) {
		let mut counter = 1;
		for section in &mut self.components {
			normalize_section(section, &mut counter);
		}
		for conversion in &mut self.conversions {
			for section in &mut conversion.sections {
				normalize_section(section, &mut counter);
			}
		}
	}

	/// Look up a target file entry by id.
	pub fn target(&self, id: u32) -> Option<&FileEntry> {
		self.targets.iter().find(|entry| entry.id == id)
	}

	/// Look up a source file entry by id.
	pub fn source(&self, id: u32) -> Option<&SourceFile> {
		self.sources.iter().find(|entry| entry.id == id)
	}

	/// Look up a template file entry by id.
	pub fn template(&self, id: u32) -> Option<&FileEntry> {
		self.templates.iter().find(|entry| entry.id == id)
	}
}

fn normalize_section(section: &mut CodeSection, counter: &mut u32) {
	if section.title.trim().is_empty() {
		section.title = format!("{SECTION_TITLE_PREFIX}{counter}");
		tracing::debug!(title = %section.title, "generated title for untitled code section");
		*counter += 1;
	}
	if section.remove_brackets
		&& section.block_kind != BlockKind::Statement
		&& section.block_kind != BlockKind::Function
	{
		tracing::warn!(
			title = %section.title,
			"remove_brackets only works for statement and function block kinds"
		);
	}
	for child in &mut section.children {
		normalize_section(child, counter);
	}
}

fn default_true() -> bool {
	true
}

impl CodeSection {
	/// Verify the fields a single section must carry before the engine can
	/// run it. Cross-table references are checked separately by
	/// [`crate::convert::verify_config`].
	pub fn verify(&self) -> RemoldResult<()> {
		if self.id == 0 {
			return Err(RemoldError::MissingSectionId {
				title: self.title.clone(),
			});
		}
		if self.target_file_id == 0 {
			return Err(RemoldError::InvalidId {
				entity: "target file",
				id: self.target_file_id,
			});
		}
		if self.search_start.trim().is_empty() {
			return Err(RemoldError::MissingSearchStart {
				title: self.title.clone(),
			});
		}
		if self.template_id == Some(0) {
			return Err(RemoldError::InvalidId {
				entity: "template",
				id: 0,
			});
		}
		Ok(())
	}
}
