use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum RemoldError {
	#[error(transparent)]
	#[diagnostic(code(remold::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(remold::config_parse),
		help("check that remold.toml is valid TOML with [[sources]], [[targets]] and [[conversions]] sections")
	)]
	ConfigParse(String),

	#[error("code section `{title}` has no id")]
	#[diagnostic(
		code(remold::missing_section_id),
		help("every code section needs a unique positive `id`")
	)]
	MissingSectionId { title: String },

	#[error("code section `{title}` has no search pattern")]
	#[diagnostic(
		code(remold::missing_search_start),
		help("set `search_start` to a regular expression matching where the section begins")
	)]
	MissingSearchStart { title: String },

	#[error("duplicate code section id {0}")]
	#[diagnostic(code(remold::duplicate_section_id))]
	DuplicateSectionId(u32),

	#[error("{entity} id {id} is invalid, ids must be greater than 0")]
	#[diagnostic(code(remold::invalid_id))]
	InvalidId { entity: &'static str, id: u32 },

	#[error("source file not declared with id {0}")]
	#[diagnostic(code(remold::unknown_source_id))]
	UnknownSourceId(u32),

	#[error("target file not declared with id {0}")]
	#[diagnostic(code(remold::unknown_target_id))]
	UnknownTargetId(u32),

	#[error("template file not declared with id {0}")]
	#[diagnostic(code(remold::unknown_template_id))]
	UnknownTemplateId(u32),

	#[error("code section component(s) not declared with id(s): {0}")]
	#[diagnostic(
		code(remold::unknown_component_id),
		help("component references must point at entries in the top-level [[components]] table")
	)]
	UnknownComponentIds(String),

	#[error("translation(s) not declared with id(s): {0}")]
	#[diagnostic(code(remold::unknown_translation_id))]
	UnknownTranslationIds(String),

	#[error("circular component reference {chain} from code section `{title}`")]
	#[diagnostic(
		code(remold::cyclic_reference),
		help("a component must not reference itself, directly or through other components")
	)]
	CyclicReference { chain: String, title: String },

	#[error("invalid pattern `{pattern}`: {reason}")]
	#[diagnostic(code(remold::invalid_pattern))]
	InvalidPattern { pattern: String, reason: String },

	#[error("cursor index {index} out of bounds for buffer of length {len}")]
	#[diagnostic(
		code(remold::cursor_index),
		help("this indicates a block kind that does not fit the configured search pattern")
	)]
	CursorIndex { index: usize, len: usize },

	#[error("failed to read `{path}`: {reason}")]
	#[diagnostic(code(remold::file_read))]
	FileRead { path: String, reason: String },

	#[error("target `{0}` already exists and overwrite_targets is disabled")]
	#[diagnostic(
		code(remold::target_exists),
		help("set `overwrite_targets = true` in remold.toml or remove the existing file")
	)]
	TargetExists(String),
}

pub type RemoldResult<T> = Result<T, RemoldError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
