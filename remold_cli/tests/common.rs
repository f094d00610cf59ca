use assert_cmd::Command;

pub fn remold_cmd() -> Command {
	Command::cargo_bin("remold").expect("binary `remold` should be built")
}
