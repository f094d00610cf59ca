use std::collections::HashSet;

use crate::RemoldError;
use crate::RemoldResult;
use crate::config::CodeSection;

/// All section trees of a run flattened into one arena. Children are
/// stored as index lists, so a component subtree referenced from several
/// parents is the same node reachable along every path rather than a
/// copy.
#[derive(Debug, Clone, Default)]
pub struct SectionArena {
	nodes: Vec<SectionNode>,
	components: Vec<usize>,
}

/// One section in the arena: its configuration plus child indices.
#[derive(Debug, Clone)]
pub struct SectionNode {
	pub data: CodeSection,
	pub children: Vec<usize>,
}

impl SectionArena {
	pub fn new() -> Self {
		Self::default()
	}

	/// Flatten `section` and its children into the arena, returning the
	/// root's index.
	pub fn add_tree(&mut self, mut section: CodeSection) -> usize {
		let children = std::mem::take(&mut section.children);
		let index = self.nodes.len();
		self.nodes.push(SectionNode {
			data: section,
			children: Vec::with_capacity(children.len()),
		});
		for child in children {
			let child_index = self.add_tree(child);
			self.nodes[index].children.push(child_index);
		}
		index
	}

	/// Add a reusable component tree. Components are resolvable by id from
	/// `component_ref_ids`; only top-level components participate in the
	/// lookup.
	pub fn add_component(&mut self, section: CodeSection) -> usize {
		let index = self.add_tree(section);
		self.components.push(index);
		index
	}

	pub fn data(&self, index: usize) -> &CodeSection {
		&self.nodes[index].data
	}

	pub fn children(&self, index: usize) -> &[usize] {
		&self.nodes[index].children
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// The arena index of the component with the given section id.
	pub fn component_index(&self, id: u32) -> Option<usize> {
		self.components
			.iter()
			.copied()
			.find(|index| self.nodes[*index].data.id == id)
	}

	fn push_child(&mut self, parent: usize, child: usize) {
		self.nodes[parent].children.push(child);
	}
}

/// Resolves component references into arena child links, depth first,
/// with cycle detection along the current descent path.
///
/// The path set is branch-local: it is extended only while descending
/// into a referenced component and restored afterwards, so two siblings
/// (or two children of one section) may both depend on the same component
/// without tripping the check. Each component subtree is linked at most
/// once per run; later references append the already-linked node
/// unmodified.
#[derive(Debug)]
pub struct SectionLinker<'a> {
	arena: &'a mut SectionArena,
	linked: HashSet<usize>,
}

impl<'a> SectionLinker<'a> {
	pub fn new(arena: &'a mut SectionArena) -> Self {
		Self {
			arena,
			linked: HashSet::new(),
		}
	}

	/// Link every tree rooted at `roots`.
	pub fn link_all(arena: &mut SectionArena, roots: &[usize]) -> RemoldResult<()> {
		let mut linker = SectionLinker::new(arena);
		let mut path = Vec::new();
		for root in roots {
			linker.link(*root, &mut path)?;
		}
		Ok(())
	}

	fn link(&mut self, index: usize, path: &mut Vec<u32>) -> RemoldResult<()> {
		let refs = self.arena.nodes[index].data.component_ref_ids.clone();
		let existing_children = self.arena.nodes[index].children.clone();

		for ref_id in refs {
			if path.contains(&ref_id) {
				return Err(self.cycle_error(index, path, ref_id));
			}
			let Some(component) = self.arena.component_index(ref_id) else {
				return Err(RemoldError::UnknownComponentIds(ref_id.to_string()));
			};
			if self.linked.insert(component) {
				path.push(ref_id);
				self.link(component, path)?;
				path.pop();
			}
			tracing::debug!(
				section = %self.arena.data(index).title,
				component = ref_id,
				"linked component into section"
			);
			self.arena.push_child(index, component);
		}

		// Children are linked with the original path so that each child's
		// cycle set starts fresh; only the component descent above extends
		// the path.
		for child in existing_children {
			self.link(child, path)?;
		}

		Ok(())
	}

	fn cycle_error(&self, index: usize, path: &[u32], ref_id: u32) -> RemoldError {
		let mut chain: Vec<String> = path.iter().map(ToString::to_string).collect();
		chain.push(ref_id.to_string());
		RemoldError::CyclicReference {
			chain: chain.join(" -> "),
			title: self.arena.data(index).title.clone(),
		}
	}
}
