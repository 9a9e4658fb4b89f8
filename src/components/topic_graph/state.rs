//! Interaction state for the topic graph.
//!
//! [`TopicGraphState`] owns the validated model, the cached layout and the
//! retained [`Scene`], and drives the expansion/selection state machine:
//!
//! - **Collapsed**: clicking a cluster expands it and selects it.
//! - **Expanded(c)**: clicking `c` collapses it; clicking another cluster
//!   expands that one instead; clicking one of `c`'s leaves selects the leaf
//!   without touching the layout.
//! - [`reset`](TopicGraphState::reset) returns to Collapsed from anywhere.
//!
//! Every change that alters the visible node set goes through the
//! [`ReflowTrigger`], and a reflow always runs layout, then scene sync, then
//! the highlight pass. Clicks on topics that are not currently visible are
//! ignored.

use std::collections::HashMap;

use log::{debug, warn};

use super::highlight::{HighlightSet, HighlightStyle};
use super::layout::{Layout, LayoutConfig, compute_layout};
use super::model::{Edge, EdgeKind, GraphModel, Node, TopicInfo, ValidationError};
use super::reflow::{DEFAULT_DEBOUNCE_MS, Invalidation, Reflow, ReflowTrigger};
use super::scene::Scene;
use super::theme::{CategoryPalette, Color, Theme};
use super::types::{NodeId, TopicDataset};

/// Topics that open a dedicated page when selected.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NavigationTable {
	routes: HashMap<NodeId, String>,
}

impl NavigationTable {
	pub fn new(routes: HashMap<NodeId, String>) -> Self {
		Self { routes }
	}

	pub fn route_for(&self, id: NodeId) -> Option<&str> {
		self.routes.get(&id).map(String::as_str)
	}
}

/// Everything configurable about a topic graph besides its model.
#[derive(Clone, Debug)]
pub struct TopicGraphOptions {
	pub layout: LayoutConfig,
	pub palette: CategoryPalette,
	pub theme: Theme,
	pub highlight: HighlightStyle,
	pub routes: NavigationTable,
	/// Quiet period before a resize is applied, in milliseconds.
	pub debounce_ms: f64,
}

impl Default for TopicGraphOptions {
	fn default() -> Self {
		Self {
			layout: LayoutConfig::default(),
			palette: CategoryPalette::default(),
			theme: Theme::default(),
			highlight: HighlightStyle::default(),
			routes: NavigationTable::default(),
			debounce_ms: DEFAULT_DEBOUNCE_MS,
		}
	}
}

/// Result of a click or select request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
	/// The topic is unknown or not visible; nothing changed.
	Ignored,
	/// The cluster was expanded and selected.
	Expanded(NodeId),
	/// The expanded cluster was collapsed.
	Collapsed,
	/// The topic was selected in place.
	Selected(NodeId),
	/// The topic was selected and has a dedicated page at this route.
	Navigate(String),
}

/// A topic referenced from the detail panel.
#[derive(Clone, Debug, PartialEq)]
pub struct RelatedTopic {
	pub id: NodeId,
	pub label: String,
	pub color: Color,
}

/// Detail panel contents for the selected topic.
#[derive(Clone, Debug, PartialEq)]
pub struct TopicDetail {
	pub id: NodeId,
	pub label: String,
	pub category: String,
	pub color: Color,
	pub description: String,
	pub image: Option<String>,
	pub route: Option<String>,
	/// Owning cluster, for leaves.
	pub parent: Option<RelatedTopic>,
	pub related: Vec<RelatedTopic>,
	/// Owned leaves, for clusters.
	pub subtopics: Vec<RelatedTopic>,
}

/// Interaction controller and owner of the layout cache and scene.
pub struct TopicGraphState {
	model: GraphModel,
	options: TopicGraphOptions,
	trigger: ReflowTrigger,
	scene: Scene,
	layout: Layout,
	edges: Vec<Edge>,
	width: f64,
	height: f64,
	expanded: Option<NodeId>,
	selected: Option<NodeId>,
	hovered: Option<NodeId>,
	highlight: Option<HighlightSet>,
}

impl TopicGraphState {
	/// Build the state and lay out the initial, collapsed view.
	pub fn new(model: GraphModel, width: f64, height: f64, mut options: TopicGraphOptions) -> Self {
		for id in options.routes.routes.keys() {
			if model.node(*id).is_none() {
				warn!("topic-graph: route declared for unknown topic {id}");
			}
		}
		let layout = options.layout.sanitized();
		if layout != options.layout {
			warn!("topic-graph: unusable layout values replaced: {:?} -> {layout:?}", options.layout);
			options.layout = layout;
		}
		let mut state = Self {
			model,
			trigger: ReflowTrigger::new(options.debounce_ms),
			options,
			scene: Scene::new(),
			layout: Layout::default(),
			edges: Vec::new(),
			width,
			height,
			expanded: None,
			selected: None,
			hovered: None,
			highlight: None,
		};
		state.trigger.invalidate(Invalidation::Mount);
		state.flush();
		state
	}

	/// Validate `data` and build the state from its model and presentation tables.
	pub fn from_dataset(data: &TopicDataset, width: f64, height: f64) -> Result<Self, ValidationError> {
		let model = GraphModel::from_dataset(data)?;
		let palette = if data.categories.is_empty() {
			CategoryPalette::default()
		} else {
			CategoryPalette::from_css(&data.categories)
		};
		let options = TopicGraphOptions {
			layout: data.layout.clone(),
			palette,
			routes: NavigationTable::new(data.routes.clone()),
			..TopicGraphOptions::default()
		};
		Ok(Self::new(model, width, height, options))
	}

	/// Handle a click on topic `id`.
	pub fn click(&mut self, id: NodeId) -> ClickOutcome {
		if !self.layout.contains(id) {
			debug!("topic-graph: ignoring click on hidden topic {id}");
			return ClickOutcome::Ignored;
		}
		let outcome = match self.model.node(id) {
			None => return ClickOutcome::Ignored,
			Some(Node::Cluster(_)) if self.expanded == Some(id) => {
				self.set_expanded(None, None);
				ClickOutcome::Collapsed
			}
			Some(Node::Cluster(_)) => {
				self.set_expanded(Some(id), Some(id));
				ClickOutcome::Expanded(id)
			}
			Some(Node::Leaf(leaf)) => {
				if self.expanded != Some(leaf.parent) {
					return ClickOutcome::Ignored;
				}
				self.set_selected(Some(id));
				ClickOutcome::Selected(id)
			}
		};
		self.with_route(id, outcome)
	}

	/// Select topic `id` from outside the canvas (e.g. a related-topic link),
	/// expanding its cluster first if it is a hidden leaf. Never collapses.
	pub fn select(&mut self, id: NodeId) -> ClickOutcome {
		if self.layout.is_empty() {
			debug!("topic-graph: ignoring select of {id}, nothing is laid out");
			return ClickOutcome::Ignored;
		}
		let outcome = match self.model.node(id) {
			None => return ClickOutcome::Ignored,
			Some(Node::Cluster(_)) if self.expanded == Some(id) => {
				self.set_selected(Some(id));
				ClickOutcome::Selected(id)
			}
			Some(Node::Cluster(_)) => {
				self.set_expanded(Some(id), Some(id));
				ClickOutcome::Expanded(id)
			}
			Some(Node::Leaf(leaf)) => {
				let parent = leaf.parent;
				if self.expanded == Some(parent) {
					self.set_selected(Some(id));
				} else {
					self.set_expanded(Some(parent), Some(id));
				}
				ClickOutcome::Selected(id)
			}
		};
		if self.layout.contains(id) {
			self.with_route(id, outcome)
		} else {
			outcome
		}
	}

	/// Mark the topic under the pointer, or none. Hidden topics count as none.
	pub fn hover(&mut self, id: Option<NodeId>) {
		let id = id.filter(|id| self.layout.contains(*id));
		if id != self.hovered {
			self.hovered = id;
			self.refresh_highlight();
		}
	}

	/// Drop the selection and highlight but keep the current expansion.
	pub fn clear_selection(&mut self) {
		self.set_selected(None);
	}

	/// Return to the collapsed view with nothing selected.
	pub fn reset(&mut self) {
		if self.expanded.is_some() {
			self.set_expanded(None, None);
		} else {
			self.set_selected(None);
		}
	}

	/// Record a container resize at time `now` (milliseconds). Applied by [`poll`](Self::poll).
	pub fn resize(&mut self, now: f64, width: f64, height: f64) {
		self.trigger.resize(now, width, height);
	}

	/// Run any reflow that is due at time `now`. Returns whether one ran.
	pub fn poll(&mut self, now: f64) -> bool {
		match self.trigger.poll(now) {
			Some(reflow) => {
				self.reflow(reflow);
				true
			}
			None => false,
		}
	}

	/// Advance element transitions by `dt` seconds.
	pub fn tick(&mut self, dt: f64) {
		self.scene.tick(dt);
	}

	pub fn node_at(&self, x: f64, y: f64) -> Option<NodeId> {
		self.scene.node_at(x, y)
	}

	pub fn model(&self) -> &GraphModel {
		&self.model
	}

	pub fn layout(&self) -> &Layout {
		&self.layout
	}

	pub fn scene(&self) -> &Scene {
		&self.scene
	}

	/// Edges currently drawn, links first, then membership lines.
	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	pub fn theme(&self) -> &Theme {
		&self.options.theme
	}

	pub fn palette(&self) -> &CategoryPalette {
		&self.options.palette
	}

	pub fn expanded(&self) -> Option<NodeId> {
		self.expanded
	}

	pub fn selected(&self) -> Option<NodeId> {
		self.selected
	}

	pub fn hovered(&self) -> Option<NodeId> {
		self.hovered
	}

	pub fn highlight(&self) -> Option<&HighlightSet> {
		self.highlight.as_ref()
	}

	pub fn size(&self) -> (f64, f64) {
		(self.width, self.height)
	}

	pub fn visible_ids(&self) -> Vec<NodeId> {
		self.layout.visible_ids()
	}

	/// Legend entries for the active palette, as CSS colors.
	pub fn legend(&self) -> Vec<(String, String)> {
		self.options
			.palette
			.legend()
			.map(|(name, color)| (name.to_string(), color.to_css()))
			.collect()
	}

	/// Detail panel contents for the selected topic.
	pub fn detail(&self) -> Option<TopicDetail> {
		let id = self.selected?;
		let node = self.model.node(id)?;
		let palette = &self.options.palette;
		let topic = |info: &TopicInfo| RelatedTopic {
			id: info.id,
			label: info.label.clone(),
			color: palette.color_of(&info.category),
		};

		let (parent, subtopics) = match node {
			Node::Cluster(_) => (None, self.model.leaf_nodes_of(id).map(|l| topic(&l.info)).collect()),
			Node::Leaf(leaf) => (self.model.node(leaf.parent).map(|p| topic(p.info())), Vec::new()),
		};
		let info = node.info();
		Some(TopicDetail {
			id,
			label: info.label.clone(),
			category: info.category.clone(),
			color: palette.color_of(&info.category),
			description: info.description.clone(),
			image: info.image.clone(),
			route: self.options.routes.route_for(id).map(String::from),
			parent,
			related: self.model.related(id).into_iter().map(|n| topic(n.info())).collect(),
			subtopics,
		})
	}

	fn set_expanded(&mut self, expanded: Option<NodeId>, selected: Option<NodeId>) {
		debug!("topic-graph: expanded {:?} -> {:?}", self.expanded, expanded);
		self.selected = selected;
		if self.expanded != expanded {
			self.expanded = expanded;
			self.trigger.invalidate(Invalidation::Expansion);
			self.flush();
		} else {
			self.refresh_highlight();
		}
	}

	fn set_selected(&mut self, selected: Option<NodeId>) {
		self.selected = selected;
		self.refresh_highlight();
	}

	fn with_route(&self, id: NodeId, outcome: ClickOutcome) -> ClickOutcome {
		match (&outcome, self.options.routes.route_for(id)) {
			(ClickOutcome::Expanded(_) | ClickOutcome::Selected(_), Some(route)) => {
				ClickOutcome::Navigate(route.to_string())
			}
			_ => outcome,
		}
	}

	/// Run a pending non-resize reflow right away.
	fn flush(&mut self) {
		if let Some(reflow) = self.trigger.take_immediate() {
			self.reflow(reflow);
		}
	}

	/// Layout, then scene sync, then the highlight pass.
	fn reflow(&mut self, reflow: Reflow) {
		if let Some((w, h)) = reflow.size {
			self.width = w;
			self.height = h;
		}

		self.layout = compute_layout(
			&self.model,
			self.width,
			self.height,
			self.expanded,
			&self.options.layout,
		);
		self.edges = visible_edges(&self.model, &self.layout, self.expanded);
		let diff = self.scene.sync(
			&self.layout,
			&self.edges,
			&self.model,
			&self.options.palette,
			&self.options.theme.line,
		);
		self.refresh_highlight();

		debug!(
			"topic-graph: reflow ({:?}) at {}x{}: {:?}",
			reflow.reason, self.width, self.height, diff
		);
	}

	fn refresh_highlight(&mut self) {
		self.highlight = self
			.selected
			.filter(|id| self.layout.contains(*id))
			.map(|id| HighlightSet::compute(id, &self.edges));
		self.hovered = self.hovered.filter(|id| self.layout.contains(*id));
		self.scene
			.apply_highlight(self.highlight.as_ref(), &self.options.highlight);
		self.scene
			.apply_hover(self.hovered, self.options.highlight.hover_scale);
	}
}

/// Links among the visible topics, plus membership lines from the expanded
/// cluster to each of its visible leaves.
fn visible_edges(model: &GraphModel, layout: &Layout, expanded: Option<NodeId>) -> Vec<Edge> {
	let mut edges = model.edges_among(&layout.visible_ids());
	if let Some(cluster) = expanded {
		edges.extend(
			model
				.leaf_nodes_of(cluster)
				.filter(|leaf| layout.contains(leaf.info.id))
				.filter_map(|leaf| Edge::new(cluster, leaf.info.id, EdgeKind::Membership)),
		);
	}
	edges
}
