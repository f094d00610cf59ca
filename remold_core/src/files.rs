use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;

use crate::RemoldError;
use crate::RemoldResult;

/// Read every file of `entries` into a map keyed by entry id. Contents
/// are normalized line-wise: each line is re-terminated with `\n`, so
/// carriage returns never reach the boundary scans.
pub fn read_contents<'a>(
	entries: impl IntoIterator<Item = (u32, &'a Path)>,
	root: &Path,
) -> RemoldResult<HashMap<u32, String>> {
	let mut contents = HashMap::new();
	for (id, path) in entries {
		let resolved = resolve(root, path);
		let raw = std::fs::read_to_string(&resolved).map_err(|e| {
			RemoldError::FileRead {
				path: resolved.display().to_string(),
				reason: e.to_string(),
			}
		})?;
		let mut normalized = String::with_capacity(raw.len());
		for line in raw.lines() {
			normalized.push_str(line);
			normalized.push('\n');
		}
		tracing::debug!(id, path = %resolved.display(), bytes = normalized.len(), "read file");
		contents.insert(id, normalized);
	}
	Ok(contents)
}

/// Write `contents` to the target path, creating parent directories as
/// needed. An existing file is an error unless `overwrite` is set.
pub fn write_contents(path: &Path, contents: &str, overwrite: bool) -> RemoldResult<()> {
	if !overwrite && path.exists() {
		return Err(RemoldError::TargetExists(path.display().to_string()));
	}
	if let Some(parent) = path.parent() {
		if !parent.as_os_str().is_empty() {
			std::fs::create_dir_all(parent)?;
		}
	}
	tracing::debug!(path = %path.display(), bytes = contents.len(), "writing target");
	std::fs::write(path, contents)?;
	Ok(())
}

/// Resolve a config-relative path against the config file's directory.
pub fn resolve(root: &Path, path: &Path) -> PathBuf {
	if path.is_absolute() {
		path.to_path_buf()
	} else {
		root.join(path)
	}
}
