mod common;

use remold_core::AnyEmptyResult;

const VALID_CONFIG: &str = r#"
overwrite_targets = true

[[sources]]
id = 1
path = "Source.java"

[[targets]]
id = 1
path = "out/Target.java"

[[conversions]]
source_id = 1

[[conversions.sections]]
id = 1
search_start = "class"
target_file_id = 1
"#;

#[test]
fn check_accepts_valid_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let config_path = tmp.path().join("remold.toml");
	std::fs::write(&config_path, VALID_CONFIG)?;

	let mut cmd = common::remold_cmd();
	cmd.env("NO_COLOR", "1")
		.arg("check")
		.arg("--config")
		.arg(&config_path)
		.assert()
		.success()
		.stdout(predicates::str::contains("Configuration is valid."))
		.stdout(predicates::str::contains("1 code section(s)"));
	Ok(())
}

#[test]
fn check_rejects_missing_search_pattern() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let config_path = tmp.path().join("remold.toml");
	let config = VALID_CONFIG.replace("search_start = \"class\"", "search_start = \"\"");
	std::fs::write(&config_path, config)?;

	let mut cmd = common::remold_cmd();
	cmd.env("NO_COLOR", "1")
		.arg("check")
		.arg("--config")
		.arg(&config_path)
		.assert()
		.failure()
		.stderr(predicates::str::contains("no search pattern"));
	Ok(())
}

#[test]
fn check_rejects_unknown_target_reference() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let config_path = tmp.path().join("remold.toml");
	let config = VALID_CONFIG.replace("target_file_id = 1", "target_file_id = 7");
	std::fs::write(&config_path, config)?;

	let mut cmd = common::remold_cmd();
	cmd.env("NO_COLOR", "1")
		.arg("check")
		.arg("--config")
		.arg(&config_path)
		.assert()
		.failure()
		.stderr(predicates::str::contains("target file not declared with id 7"));
	Ok(())
}

#[test]
fn check_rejects_component_cycle() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let config_path = tmp.path().join("remold.toml");
	let config = format!(
		"{VALID_CONFIG}\
		 component_ref_ids = [10]\n\n\
		 [[components]]\n\
		 id = 10\n\
		 search_start = \"x\"\n\
		 target_file_id = 1\n\
		 component_ref_ids = [10]\n"
	);
	std::fs::write(&config_path, config)?;

	let mut cmd = common::remold_cmd();
	cmd.env("NO_COLOR", "1")
		.arg("check")
		.arg("--config")
		.arg(&config_path)
		.assert()
		.failure()
		.stderr(predicates::str::contains("circular component reference"));
	Ok(())
}
