use std::collections::HashMap;

/// Splits a template into the half emitted before the section contents
/// and the half emitted after. The marker is part of the wire contract
/// between template authors and the engine; any marker still present
/// after assembly is deleted during target finalization.
pub const CONTENTS_MARKER: &str = "##_CONTENTS_##";

/// The part of the template up to the contents marker. Empty when the
/// section has no template or the template carries no marker.
pub fn preamble(template_id: Option<u32>, templates: &HashMap<u32, String>) -> &str {
	split(template_id, templates).0
}

/// The part of the template after the contents marker. Empty when the
/// section has no template or the template carries no marker.
pub fn postamble(template_id: Option<u32>, templates: &HashMap<u32, String>) -> &str {
	split(template_id, templates).1
}

fn split(template_id: Option<u32>, templates: &HashMap<u32, String>) -> (&str, &str) {
	let Some(id) = template_id.filter(|id| *id > 0) else {
		return ("", "");
	};
	let Some(template) = templates.get(&id) else {
		return ("", "");
	};
	let Some(index) = template.find(CONTENTS_MARKER) else {
		return ("", "");
	};
	(
		&template[..index],
		&template[index + CONTENTS_MARKER.len()..],
	)
}
