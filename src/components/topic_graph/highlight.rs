//! Selection highlighting.
//!
//! Selecting a node keeps it and its direct neighbors at full opacity and dims
//! everything else. Neighbors are taken from the edges currently drawn, so a
//! leaf hidden behind a collapsed cluster never lights up.

use std::collections::HashSet;

use super::model::Edge;
use super::types::NodeId;

/// Opacity and scale of a node element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeLook {
	pub opacity: f64,
	pub scale: f64,
}

impl NodeLook {
	pub const BASE: NodeLook = NodeLook {
		opacity: 1.0,
		scale: 1.0,
	};
}

/// Opacity and stroke width of a line element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineLook {
	pub opacity: f64,
	pub width: f64,
}

/// How strongly a selection stands out.
#[derive(Clone, Debug, PartialEq)]
pub struct HighlightStyle {
	/// Opacity of nodes outside the highlight set
	pub dimmed_node_opacity: f64,
	/// Scale of the selected node
	pub focus_scale: f64,
	/// Opacity of lines not touching the selected node
	pub dimmed_line_opacity: f64,
	/// Opacity of lines touching the selected node
	pub focus_line_opacity: f64,
	/// Width multiplier for lines touching the selected node
	pub focus_line_width: f64,
	/// Extra scale of the node under the pointer
	pub hover_scale: f64,
}

impl Default for HighlightStyle {
	fn default() -> Self {
		Self {
			dimmed_node_opacity: 0.3,
			focus_scale: 1.2,
			dimmed_line_opacity: 0.2,
			focus_line_opacity: 1.0,
			focus_line_width: 1.5,
			hover_scale: 1.1,
		}
	}
}

/// The selected node, its neighbors, and the lines between them.
#[derive(Clone, Debug, PartialEq)]
pub struct HighlightSet {
	focus: NodeId,
	nodes: HashSet<NodeId>,
	edges: HashSet<Edge>,
}

impl HighlightSet {
	/// Highlight `focus` against the currently drawn `edges`.
	pub fn compute(focus: NodeId, edges: &[Edge]) -> Self {
		let mut nodes = HashSet::from([focus]);
		let mut touching = HashSet::new();
		for edge in edges {
			if let Some(other) = edge.other(focus) {
				nodes.insert(other);
				touching.insert(*edge);
			}
		}
		Self {
			focus,
			nodes,
			edges: touching,
		}
	}

	pub fn focus(&self) -> NodeId {
		self.focus
	}

	pub fn contains(&self, id: NodeId) -> bool {
		self.nodes.contains(&id)
	}

	pub fn nodes(&self) -> &HashSet<NodeId> {
		&self.nodes
	}

	pub fn contains_edge(&self, edge: &Edge) -> bool {
		self.edges.contains(edge)
	}

	/// Target look for a node under this highlight.
	pub fn node_look(&self, id: NodeId, style: &HighlightStyle) -> NodeLook {
		if id == self.focus {
			NodeLook {
				opacity: 1.0,
				scale: style.focus_scale,
			}
		} else if self.contains(id) {
			NodeLook::BASE
		} else {
			NodeLook {
				opacity: style.dimmed_node_opacity,
				scale: 1.0,
			}
		}
	}

	/// Target look for a line under this highlight, given its unhighlighted look.
	pub fn line_look(&self, edge: &Edge, base: LineLook, style: &HighlightStyle) -> LineLook {
		if self.contains_edge(edge) {
			LineLook {
				opacity: style.focus_line_opacity,
				width: base.width * style.focus_line_width,
			}
		} else {
			LineLook {
				opacity: style.dimmed_line_opacity,
				width: base.width,
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::super::model::EdgeKind;
	use super::*;

	fn link(a: NodeId, b: NodeId) -> Edge {
		Edge::new(a, b, EdgeKind::Link).unwrap()
	}

	#[test]
	fn set_is_focus_plus_neighbors() {
		let edges = [link(1, 2), link(3, 1), link(2, 3), link(4, 5)];
		let set = HighlightSet::compute(1, &edges);
		assert_eq!(set.nodes(), &HashSet::from([1, 2, 3]));
		assert!(set.contains_edge(&link(1, 2)));
		assert!(set.contains_edge(&link(1, 3)));
		assert!(!set.contains_edge(&link(2, 3)));
	}

	#[test]
	fn isolated_focus_highlights_only_itself() {
		let set = HighlightSet::compute(9, &[link(1, 2)]);
		assert_eq!(set.nodes(), &HashSet::from([9]));
	}

	#[test]
	fn looks_follow_membership() {
		let style = HighlightStyle::default();
		let set = HighlightSet::compute(1, &[link(1, 2), link(2, 3)]);

		assert_eq!(set.node_look(1, &style), NodeLook { opacity: 1.0, scale: 1.2 });
		assert_eq!(set.node_look(2, &style), NodeLook::BASE);
		assert_eq!(set.node_look(3, &style).opacity, 0.3);

		let base = LineLook {
			opacity: 0.4,
			width: 2.0,
		};
		assert_eq!(
			set.line_look(&link(1, 2), base, &style),
			LineLook { opacity: 1.0, width: 3.0 }
		);
		assert_eq!(
			set.line_look(&link(2, 3), base, &style),
			LineLook { opacity: 0.2, width: 2.0 }
		);
	}
}
