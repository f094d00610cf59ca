use regex::Regex;

use crate::RemoldError;
use crate::RemoldResult;
use crate::config::TranslationOp;
use crate::config::TranslationRule;

/// The id-keyed table of translation rules declared in the config.
#[derive(Debug, Clone, Default)]
pub struct TranslationTable {
	rules: Vec<TranslationRule>,
}

impl TranslationTable {
	pub fn new(rules: Vec<TranslationRule>) -> Self {
		Self { rules }
	}

	pub fn is_empty(&self) -> bool {
		self.rules.is_empty()
	}

	/// Resolve `ids` to their rules, preserving order. The whole id set is
	/// checked up front so a single error lists every unknown id rather
	/// than failing on the first one mid-translation.
	pub fn entries_for(&self, ids: &[u32]) -> RemoldResult<Vec<&TranslationRule>> {
		let unknown: Vec<String> = ids
			.iter()
			.filter(|id| !self.rules.iter().any(|rule| rule.id == **id))
			.map(ToString::to_string)
			.collect();
		if !unknown.is_empty() {
			return Err(RemoldError::UnknownTranslationIds(unknown.join(" ")));
		}
		Ok(ids
			.iter()
			.filter_map(|id| self.rules.iter().find(|rule| rule.id == *id))
			.collect())
	}
}

/// Apply `rules` to `source` in list order and return the rewritten text.
/// Text no rule matches is returned unchanged.
pub fn apply(source: &str, rules: &[&TranslationRule]) -> RemoldResult<String> {
	let mut target = source.to_string();
	for rule in rules {
		target = match rule.op {
			TranslationOp::Replace => replace(&target, rule)?,
			TranslationOp::UpperCase | TranslationOp::LowerCase => case_transform(&target, rule)?,
		};
	}
	Ok(target)
}

/// Compile `pattern`, mapping failures onto the configuration error
/// taxonomy. Shared by the translation and segmentation engines.
pub(crate) fn compile(pattern: &str) -> RemoldResult<Regex> {
	Regex::new(pattern).map_err(|e| {
		RemoldError::InvalidPattern {
			pattern: pattern.to_string(),
			reason: e.to_string(),
		}
	})
}

fn replace(source: &str, rule: &TranslationRule) -> RemoldResult<String> {
	let regex = compile(&rule.from)?;
	let replaced = if rule.process_once {
		regex.replace(source, rule.to.as_str())
	} else {
		regex.replace_all(source, rule.to.as_str())
	};
	Ok(replaced.into_owned())
}

/// Case-transform the first match, then either stop (`process_once`) or
/// continue on the remainder so every later non-overlapping match is
/// transformed independently.
fn case_transform(source: &str, rule: &TranslationRule) -> RemoldResult<String> {
	let regex = compile(&rule.from)?;
	let mut output = String::with_capacity(source.len());
	let mut rest = source;

	loop {
		let Some(found) = regex.find(rest) else {
			output.push_str(rest);
			break;
		};
		output.push_str(&rest[..found.start()]);
		let transformed = match rule.op {
			TranslationOp::UpperCase => found.as_str().to_uppercase(),
			_ => found.as_str().to_lowercase(),
		};
		output.push_str(&transformed);
		rest = &rest[found.end()..];
		if rule.process_once {
			output.push_str(rest);
			break;
		}
		// A zero-width pattern would stall here; step one character so the
		// scan always advances.
		if found.range().is_empty() {
			let Some(ch) = rest.chars().next() else {
				break;
			};
			output.push(ch);
			rest = &rest[ch.len_utf8()..];
		}
	}

	Ok(output)
}
