mod common;

use remold_core::AnyEmptyResult;

#[test]
fn init_creates_sample_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let config_path = tmp.path().join("remold.toml");

	let mut cmd = common::remold_cmd();
	cmd.env("NO_COLOR", "1")
		.arg("init")
		.arg("--config")
		.arg(&config_path)
		.assert()
		.success()
		.stdout(predicates::str::contains("Created"));

	let written = std::fs::read_to_string(&config_path)?;
	assert!(written.contains("[[sources]]"));
	assert!(written.contains("[[conversions.sections]]"));
	Ok(())
}

#[test]
fn init_does_not_clobber_existing_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let config_path = tmp.path().join("remold.toml");
	std::fs::write(&config_path, "overwrite_targets = true\n")?;

	let mut cmd = common::remold_cmd();
	cmd.env("NO_COLOR", "1")
		.arg("init")
		.arg("--config")
		.arg(&config_path)
		.assert()
		.success()
		.stdout(predicates::str::contains("already exists"));

	assert_eq!(
		std::fs::read_to_string(&config_path)?,
		"overwrite_targets = true\n"
	);
	Ok(())
}
