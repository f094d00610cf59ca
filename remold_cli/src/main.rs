use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use owo_colors::OwoColorize;
use remold_cli::Commands;
use remold_cli::RemoldCli;
use remold_core::RemoldConfig;
use remold_core::convert;
use similar::ChangeTag;
use similar::TextDiff;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = RemoldCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	if args.verbose {
		let filter = tracing_subscriber::EnvFilter::try_from_default_env()
			.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("remold_core=debug"));
		tracing_subscriber::fmt()
			.with_env_filter(filter)
			.with_writer(std::io::stderr)
			.init();
	}

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match args.command {
		Some(Commands::Init) => run_init(&args),
		Some(Commands::Check) => run_check(&args),
		Some(Commands::Run { dry_run }) => run_convert(&args, dry_run),
		None => {
			eprintln!("No subcommand specified. Run `remold --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		let report: miette::Report = e.into();
		eprintln!("{report:?}");
		process::exit(2);
	}
}

/// The directory config-relative paths resolve against.
fn resolve_root(args: &RemoldCli) -> PathBuf {
	args.config
		.parent()
		.filter(|parent| !parent.as_os_str().is_empty())
		.map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

const SAMPLE_CONFIG: &str = r##"# remold configuration
# Declare the files involved and the code sections that drive the
# conversion. Relative paths resolve against this file's directory.

overwrite_targets = false

[[sources]]
id = 1
path = "legacy/Source.java"
# kind = "code" (default) or "properties"

[[targets]]
id = 1
path = "out/Converted.java"

# Templates wrap a section's output; the text before ##_CONTENTS_## is
# emitted first and the text after it last.
# [[templates]]
# id = 1
# path = "templates/class.tmpl"

# Translation rules rewrite emitted text. op = "replace" (default),
# "upper_case" or "lower_case".
# [[translations]]
# id = 1
# from = "java\\.util\\.Vector"
# to = "java.util.ArrayList"

[[conversions]]
source_id = 1

[[conversions.sections]]
id = 1
title = "EXAMPLE"
search_start = "class"
block_kind = "function"
target_file_id = 1
"##;

fn run_init(args: &RemoldCli) -> remold_core::RemoldResult<()> {
	if args.config.exists() {
		println!("Config file already exists: {}", args.config.display());
		return Ok(());
	}
	std::fs::write(&args.config, SAMPLE_CONFIG)?;
	println!("Created {}", args.config.display());
	println!();
	println!("Next steps:");
	println!("  1. Point [[sources]] and [[targets]] at your files");
	println!("  2. Describe the code sections to extract and rewrite");
	println!("  3. Run `remold check`, then `remold run`");
	Ok(())
}

fn run_check(args: &RemoldCli) -> remold_core::RemoldResult<()> {
	let config = RemoldConfig::load(&args.config)?;
	convert::verify_config(&config)?;
	let (arena, _) = convert::link_sections(&config)?;

	println!("{}", colored!("Configuration is valid.", green));
	println!(
		"{} source(s), {} target(s), {} template(s), {} translation(s)",
		config.sources.len(),
		config.targets.len(),
		config.templates.len(),
		config.translations.len()
	);
	println!(
		"{} code section(s) across {} conversion(s)",
		arena.len(),
		config.conversions.len()
	);
	Ok(())
}

fn run_convert(args: &RemoldCli, dry_run: bool) -> remold_core::RemoldResult<()> {
	let root = resolve_root(args);
	let config = RemoldConfig::load(&args.config)?;
	let outcome = convert::run(&config, &root)?;

	if dry_run {
		for target in &outcome.targets {
			let existing = std::fs::read_to_string(&target.path).unwrap_or_default();
			println!("{}", colored!(target.path.display(), bold));
			print_diff(&existing, &target.contents);
		}
		println!("Dry run: {} target(s) computed, nothing written.", outcome.targets.len());
		return Ok(());
	}

	convert::write_outcome(&outcome, config.overwrite_targets)?;
	for target in &outcome.targets {
		println!("Wrote {}", target.path.display());
	}
	println!(
		"{}",
		colored!(format!("Converted {} target(s).", outcome.targets.len()), green)
	);
	Ok(())
}

fn print_diff(old: &str, new: &str) {
	let diff = TextDiff::from_lines(old, new);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => print!("{}", colored!(format!("-{change}"), red)),
			ChangeTag::Insert => print!("{}", colored!(format!("+{change}"), green)),
			ChangeTag::Equal => print!(" {change}"),
		}
	}
}
