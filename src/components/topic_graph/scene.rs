//! Retained scene graph.
//!
//! The scene is the only owner of visual elements: one [`SceneNode`] per
//! visible topic and one [`SceneLine`] per drawn edge. Each reflow diffs the
//! new layout against what is retained and applies only the implied
//! create/move/remove operations, so re-syncing an unchanged layout is a no-op.
//!
//! Lines store no coordinates of their own; the painter reads endpoint
//! positions from the node registry, so lines cannot drift from their nodes.
//!
//! Every element carries a `target` look, set by the highlight pass, and a
//! `shown` look that eases toward it each frame.

use std::collections::HashSet;

use indexmap::IndexMap;

use super::highlight::{HighlightSet, HighlightStyle, LineLook, NodeLook};
use super::layout::Layout;
use super::model::{Edge, EdgeKind, GraphModel, Node};
use super::theme::{CategoryPalette, Color, LineStyle};
use super::types::{NodeId, SizeTier};

/// Speed of the ease toward target looks. At 60fps, ~95% in ~300ms.
const EASE_SPEED: f64 = 10.0;

/// A drawn topic.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneNode {
	pub id: NodeId,
	pub x: f64,
	pub y: f64,
	pub radius: f64,
	pub tier: SizeTier,
	pub color: Color,
	pub label: String,
	pub target: NodeLook,
	pub shown: NodeLook,
}

/// A drawn connection between two scene nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneLine {
	pub edge: Edge,
	pub color: Color,
	pub dash: Option<(f64, f64)>,
	/// Look with no selection active.
	pub base: LineLook,
	pub target: LineLook,
	pub shown: LineLook,
}

/// Element operations performed by one [`Scene::sync`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SceneDiff {
	pub nodes_created: usize,
	pub nodes_moved: usize,
	pub nodes_removed: usize,
	pub lines_created: usize,
	pub lines_removed: usize,
}

impl SceneDiff {
	pub fn is_empty(&self) -> bool {
		*self == Self::default()
	}
}

/// Registry of visual elements, keyed by node id and by edge.
#[derive(Clone, Debug, Default)]
pub struct Scene {
	nodes: IndexMap<NodeId, SceneNode>,
	lines: IndexMap<Edge, SceneLine>,
}

impl Scene {
	pub fn new() -> Self {
		Self::default()
	}

	/// Bring the registry in line with `layout` and `edges`.
	///
	/// Edges with an endpoint missing from `layout` are skipped.
	pub fn sync(
		&mut self,
		layout: &Layout,
		edges: &[Edge],
		model: &GraphModel,
		palette: &CategoryPalette,
		style: &LineStyle,
	) -> SceneDiff {
		let mut diff = SceneDiff::default();

		let before = self.nodes.len();
		self.nodes.retain(|id, _| layout.contains(*id));
		diff.nodes_removed = before - self.nodes.len();

		for (id, pos) in layout.iter() {
			if let Some(node) = self.nodes.get_mut(&id) {
				if node.x != pos.x || node.y != pos.y || node.radius != pos.radius {
					node.x = pos.x;
					node.y = pos.y;
					node.radius = pos.radius;
					diff.nodes_moved += 1;
				}
				continue;
			}
			let Some(topic) = model.node(id) else {
				continue;
			};
			self.nodes.insert(
				id,
				SceneNode {
					id,
					x: pos.x,
					y: pos.y,
					radius: pos.radius,
					tier: topic.tier(),
					color: palette.color_of(topic.category()),
					label: topic.label().to_string(),
					target: NodeLook::BASE,
					shown: NodeLook {
						opacity: 0.0,
						scale: 1.0,
					},
				},
			);
			diff.nodes_created += 1;
		}

		let wanted: HashSet<Edge> = edges
			.iter()
			.filter(|e| self.nodes.contains_key(&e.a) && self.nodes.contains_key(&e.b))
			.copied()
			.collect();
		let before = self.lines.len();
		self.lines.retain(|edge, _| wanted.contains(edge));
		diff.lines_removed = before - self.lines.len();

		for edge in edges {
			if !wanted.contains(edge) || self.lines.contains_key(edge) {
				continue;
			}
			let line = line_for(*edge, model, palette, style);
			self.lines.insert(*edge, line);
			diff.lines_created += 1;
		}

		diff
	}

	/// Set target looks for every element. `None` restores base looks.
	pub fn apply_highlight(&mut self, highlight: Option<&HighlightSet>, style: &HighlightStyle) {
		for node in self.nodes.values_mut() {
			node.target = match highlight {
				Some(set) => set.node_look(node.id, style),
				None => NodeLook::BASE,
			};
		}
		for line in self.lines.values_mut() {
			line.target = match highlight {
				Some(set) => set.line_look(&line.edge, line.base, style),
				None => line.base,
			};
		}
	}

	/// Grow the hovered node's target scale by `scale`. Call after
	/// [`apply_highlight`](Self::apply_highlight), which resets targets.
	pub fn apply_hover(&mut self, hovered: Option<NodeId>, scale: f64) {
		if let Some(node) = hovered.and_then(|id| self.nodes.get_mut(&id)) {
			node.target.scale *= scale;
		}
	}

	/// Ease shown looks toward their targets.
	pub fn tick(&mut self, dt: f64) {
		let factor = 1.0 - (-EASE_SPEED * dt).exp();
		for node in self.nodes.values_mut() {
			node.shown.opacity = ease(node.shown.opacity, node.target.opacity, factor);
			node.shown.scale = ease(node.shown.scale, node.target.scale, factor);
		}
		for line in self.lines.values_mut() {
			line.shown.opacity = ease(line.shown.opacity, line.target.opacity, factor);
			line.shown.width = ease(line.shown.width, line.target.width, factor);
		}
	}

	/// Jump every shown look to its target.
	pub fn settle(&mut self) {
		for node in self.nodes.values_mut() {
			node.shown = node.target;
		}
		for line in self.lines.values_mut() {
			line.shown = line.target;
		}
	}

	/// Topmost node whose circle contains the point. Later elements draw on top.
	pub fn node_at(&self, x: f64, y: f64) -> Option<NodeId> {
		self.nodes
			.values()
			.rev()
			.find(|n| {
				let (dx, dy) = (n.x - x, n.y - y);
				let r = n.radius * n.target.scale;
				dx * dx + dy * dy <= r * r
			})
			.map(|n| n.id)
	}

	pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
		self.nodes.get(&id)
	}

	pub fn nodes(&self) -> impl Iterator<Item = &SceneNode> {
		self.nodes.values()
	}

	pub fn line(&self, edge: &Edge) -> Option<&SceneLine> {
		self.lines.get(edge)
	}

	pub fn lines(&self) -> impl Iterator<Item = &SceneLine> {
		self.lines.values()
	}

	/// Both endpoint elements of a line.
	pub fn endpoints(&self, line: &SceneLine) -> Option<(&SceneNode, &SceneNode)> {
		Some((self.nodes.get(&line.edge.a)?, self.nodes.get(&line.edge.b)?))
	}

	pub fn contains(&self, id: NodeId) -> bool {
		self.nodes.contains_key(&id)
	}

	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	pub fn line_count(&self) -> usize {
		self.lines.len()
	}
}

fn ease(current: f64, target: f64, factor: f64) -> f64 {
	let next = current + (target - current) * factor;
	if (target - next).abs() < 0.001 { target } else { next }
}

/// Base color, dash and look for a newly created line.
fn line_for(edge: Edge, model: &GraphModel, palette: &CategoryPalette, style: &LineStyle) -> SceneLine {
	let endpoint_leaf = [edge.a, edge.b]
		.into_iter()
		.find_map(|id| model.node(id).filter(|n| matches!(n, Node::Leaf(_))));

	let (color, dash, base) = match (edge.kind, endpoint_leaf) {
		(EdgeKind::Membership, leaf) => (
			leaf.map(|n| palette.color_of(n.category()))
				.unwrap_or(style.leaf_link),
			None,
			LineLook {
				opacity: style.membership_opacity,
				width: style.membership_width,
			},
		),
		(EdgeKind::Link, Some(_)) => (
			style.leaf_link,
			Some(style.leaf_link_dash),
			LineLook {
				opacity: style.leaf_link_opacity,
				width: style.leaf_link_width,
			},
		),
		(EdgeKind::Link, None) => (
			style.cluster_link,
			None,
			LineLook {
				opacity: style.cluster_link_opacity,
				width: style.cluster_link_width,
			},
		),
	};

	SceneLine {
		edge,
		color,
		dash,
		base,
		target: base,
		shown: LineLook {
			opacity: 0.0,
			width: base.width,
		},
	}
}

#[cfg(test)]
mod tests {
	use super::super::layout::{LayoutConfig, compute_layout};
	use super::super::model::tests::sample_model;
	use super::super::theme::Theme;
	use super::*;

	fn membership(cluster: NodeId, leaves: &[NodeId]) -> Vec<Edge> {
		leaves
			.iter()
			.filter_map(|&l| Edge::new(cluster, l, EdgeKind::Membership))
			.collect()
	}

	fn frame(model: &GraphModel, expanded: Option<NodeId>) -> (Layout, Vec<Edge>) {
		let layout = compute_layout(model, 800.0, 600.0, expanded, &LayoutConfig::default());
		let mut edges = model.edges_among(&layout.visible_ids());
		if let Some(c) = expanded {
			let leaves: Vec<_> = model.leaf_nodes_of(c).map(|l| l.info.id).collect();
			edges.extend(membership(c, &leaves));
		}
		(layout, edges)
	}

	#[test]
	fn first_sync_creates_everything_and_second_is_a_no_op() {
		let model = sample_model();
		let theme = Theme::default();
		let palette = CategoryPalette::default();
		let (layout, edges) = frame(&model, None);

		let mut scene = Scene::new();
		let diff = scene.sync(&layout, &edges, &model, &palette, &theme.line);
		assert_eq!(diff.nodes_created, 3);
		assert_eq!(diff.lines_created, 2);
		assert_eq!(scene.node_count(), 3);

		let again = scene.sync(&layout, &edges, &model, &palette, &theme.line);
		assert!(again.is_empty(), "{again:?}");
	}

	#[test]
	fn expand_then_collapse_restores_cluster_only_scene() {
		let model = sample_model();
		let theme = Theme::default();
		let palette = CategoryPalette::default();
		let mut scene = Scene::new();

		let (layout, edges) = frame(&model, None);
		scene.sync(&layout, &edges, &model, &palette, &theme.line);
		let clusters: Vec<_> = scene.nodes().map(|n| n.id).collect();

		let (layout, edges) = frame(&model, Some(1));
		let diff = scene.sync(&layout, &edges, &model, &palette, &theme.line);
		assert_eq!(diff.nodes_created, 3);
		// Three membership lines plus 101-102 and 102-103.
		assert_eq!(diff.lines_created, 5);
		assert_eq!(diff.nodes_moved, 0);

		let (layout, edges) = frame(&model, None);
		let diff = scene.sync(&layout, &edges, &model, &palette, &theme.line);
		assert_eq!(diff.nodes_removed, 3);
		assert_eq!(diff.lines_removed, 5);
		let after: Vec<_> = scene.nodes().map(|n| n.id).collect();
		assert_eq!(after, clusters);
		assert!(scene.lines().all(|l| l.edge.kind == EdgeKind::Link));
	}

	#[test]
	fn lines_with_missing_endpoints_are_never_created() {
		let model = sample_model();
		let theme = Theme::default();
		let mut scene = Scene::new();
		let (layout, _) = frame(&model, None);
		let stray = [Edge::new(1, 101, EdgeKind::Membership).unwrap()];
		let diff = scene.sync(&layout, &stray, &model, &CategoryPalette::default(), &theme.line);
		assert_eq!(diff.lines_created, 0);
		assert_eq!(scene.line_count(), 0);
	}

	#[test]
	fn resize_moves_nodes_without_recreating_them() {
		let model = sample_model();
		let theme = Theme::default();
		let palette = CategoryPalette::default();
		let mut scene = Scene::new();
		let (layout, edges) = frame(&model, None);
		scene.sync(&layout, &edges, &model, &palette, &theme.line);

		let bigger = compute_layout(&model, 1600.0, 1200.0, None, &LayoutConfig::default());
		let diff = scene.sync(&bigger, &edges, &model, &palette, &theme.line);
		assert_eq!(diff.nodes_created, 0);
		assert_eq!(diff.nodes_moved, 3);
		assert_eq!(diff.lines_created, 0);
	}

	#[test]
	fn line_styles_depend_on_kind_and_endpoints() {
		let model = sample_model();
		let theme = Theme::default();
		let palette = CategoryPalette::default();
		let mut scene = Scene::new();
		let (layout, edges) = frame(&model, Some(1));
		scene.sync(&layout, &edges, &model, &palette, &theme.line);

		let cluster_link = scene.line(&Edge::new(1, 2, EdgeKind::Link).unwrap()).unwrap();
		assert_eq!(cluster_link.base.opacity, 0.4);
		assert_eq!(cluster_link.dash, None);

		let leaf_link = scene.line(&Edge::new(101, 102, EdgeKind::Link).unwrap()).unwrap();
		assert_eq!(leaf_link.dash, Some((3.0, 3.0)));
		assert_eq!(leaf_link.base.opacity, 0.5);

		let member = scene.line(&Edge::new(1, 101, EdgeKind::Membership).unwrap()).unwrap();
		assert_eq!(member.color, palette.color_of("Ecology"));
		assert_eq!(member.base.opacity, 0.7);
	}

	#[test]
	fn highlight_targets_and_easing() {
		let model = sample_model();
		let theme = Theme::default();
		let palette = CategoryPalette::default();
		let style = HighlightStyle::default();
		let mut scene = Scene::new();
		let (layout, edges) = frame(&model, None);
		scene.sync(&layout, &edges, &model, &palette, &theme.line);

		let set = HighlightSet::compute(3, &edges);
		scene.apply_highlight(Some(&set), &style);
		assert_eq!(scene.node(3).unwrap().target.scale, 1.2);
		assert_eq!(scene.node(2).unwrap().target.opacity, 1.0);
		assert_eq!(scene.node(1).unwrap().target.opacity, 0.3);

		for _ in 0..120 {
			scene.tick(1.0 / 60.0);
		}
		assert_eq!(scene.node(1).unwrap().shown.opacity, 0.3);
		let touching = scene.line(&Edge::new(2, 3, EdgeKind::Link).unwrap()).unwrap();
		assert_eq!(touching.shown.opacity, 1.0);
		assert_eq!(touching.shown.width, 1.5 * 1.5);

		scene.apply_highlight(None, &style);
		scene.settle();
		assert!(scene.nodes().all(|n| n.shown == NodeLook::BASE));
		assert!(scene.lines().all(|l| l.shown == l.base));
	}

	#[test]
	fn hit_testing_prefers_later_elements() {
		let model = sample_model();
		let theme = Theme::default();
		let mut scene = Scene::new();
		let (layout, edges) = frame(&model, Some(1));
		scene.sync(&layout, &edges, &model, &CategoryPalette::default(), &theme.line);

		// Leaf 101 sits 90px right of cluster 1 and overlaps it.
		let leaf = scene.node(101).unwrap();
		assert_eq!(scene.node_at(leaf.x, leaf.y), Some(101));
		let cluster = scene.node(1).unwrap();
		assert_eq!(scene.node_at(cluster.x - 60.0, cluster.y), Some(1));
		assert_eq!(scene.node_at(400.0, 300.0), None);
	}
}
