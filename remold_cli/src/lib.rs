use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Rework legacy source files into new targets with declarative code sections.",
	long_about = "remold is a configuration-driven source-to-source converter.\n\nA remold.toml \
	              file declares code sections — a search pattern, a block boundary rule, optional \
	              child sections, and output wiring — plus translation rules, templates, and the \
	              source and target files. remold segments each source along the section tree, \
	              rewrites every segment through the translation rules, and reassembles the pieces \
	              into the target files.\n\nQuick start:\n  remold init   Create a sample \
	              remold.toml\n  remold check  Validate the configuration\n  remold run    Convert \
	              the sources and write the targets"
)]
pub struct RemoldCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the configuration file.
	#[arg(long, short, global = true, default_value = "remold.toml")]
	pub config: PathBuf,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Create a sample remold.toml in the current directory.
	///
	/// The sample declares one source, one target, and a minimal section
	/// tree, with comments explaining each field. If the file already
	/// exists this command is a no-op and exits successfully.
	Init,
	/// Validate the configuration without converting anything.
	///
	/// Loads the config, verifies every id and cross-reference, compiles
	/// every search and translation pattern, and resolves component
	/// references including cycle detection. Exits with a non-zero status
	/// code on the first problem found.
	Check,
	/// Convert the sources and write the target files.
	///
	/// Runs the whole conversion: segmentation, translation, template
	/// wrapping, placeholder resolution, and re-indentation. Targets are
	/// only written when the full run succeeds; an existing target aborts
	/// the run unless `overwrite_targets` is enabled in the config.
	Run {
		/// Compute the targets and print a unified diff against any
		/// existing files instead of writing.
		#[arg(long, default_value_t = false)]
		dry_run: bool,
	},
}
