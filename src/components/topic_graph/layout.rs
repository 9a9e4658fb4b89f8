//! Deterministic ring layout.
//!
//! Clusters sit evenly on a ring around the container center; the expanded
//! cluster's leaves sit on a smaller ring around that cluster. The result is a
//! pure function of the container size, the model, the expanded cluster and
//! the [`LayoutConfig`], so identical inputs always produce identical positions.

use std::f64::consts::TAU;

use indexmap::IndexMap;
use serde::Deserialize;

use super::model::{GraphModel, LeafTier};
use super::types::{NodeId, SizeTier};

/// Node radius in pixels per size tier.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct NodeRadii {
	pub large: f64,
	pub medium: f64,
	pub small: f64,
}

impl Default for NodeRadii {
	fn default() -> Self {
		Self {
			large: 70.0,
			medium: 50.0,
			small: 40.0,
		}
	}
}

impl NodeRadii {
	pub fn for_tier(&self, tier: SizeTier) -> f64 {
		match tier {
			SizeTier::Large => self.large,
			SizeTier::Medium => self.medium,
			SizeTier::Small => self.small,
		}
	}

	/// Replace any radius that is not a positive finite number with its default.
	pub fn sanitized(&self) -> Self {
		let default = Self::default();
		Self {
			large: positive_or(self.large, default.large),
			medium: positive_or(self.medium, default.medium),
			small: positive_or(self.small, default.small),
		}
	}
}

/// Tuning values for the ring layout.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
	/// Cluster ring radius as a fraction of `min(width, height)`.
	pub cluster_ring: f64,
	/// Subtopic ring radius as a fraction of `min(width, height)`.
	pub subtopic_ring: f64,
	pub radii: NodeRadii,
	/// Maximum per-axis offset in pixels applied to each node, seeded by its id.
	/// `None` places nodes exactly on their rings.
	pub jitter: Option<f64>,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			cluster_ring: 0.35,
			subtopic_ring: 0.15,
			radii: NodeRadii::default(),
			jitter: None,
		}
	}
}

impl LayoutConfig {
	/// Copy with unusable values replaced: ring factors that are negative or
	/// not finite and radii that are not positive fall back to their defaults,
	/// and a jitter that is not a positive finite number turns jitter off.
	pub fn sanitized(&self) -> Self {
		let default = Self::default();
		let ring = |v: f64, fallback: f64| if v.is_finite() && v >= 0.0 { v } else { fallback };
		Self {
			cluster_ring: ring(self.cluster_ring, default.cluster_ring),
			subtopic_ring: ring(self.subtopic_ring, default.subtopic_ring),
			radii: self.radii.sanitized(),
			jitter: self.jitter.filter(|a| a.is_finite() && *a > 0.0),
		}
	}
}

fn positive_or(value: f64, fallback: f64) -> f64 {
	if value.is_finite() && value > 0.0 { value } else { fallback }
}

/// Center and radius of a visible node, in container pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
	pub x: f64,
	pub y: f64,
	pub radius: f64,
}

/// Positions of every visible node, in declaration order (clusters first).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Layout {
	pub width: f64,
	pub height: f64,
	positions: IndexMap<NodeId, Position>,
}

impl Layout {
	pub fn get(&self, id: NodeId) -> Option<Position> {
		self.positions.get(&id).copied()
	}

	pub fn contains(&self, id: NodeId) -> bool {
		self.positions.contains_key(&id)
	}

	pub fn len(&self) -> usize {
		self.positions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.positions.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (NodeId, Position)> + '_ {
		self.positions.iter().map(|(&id, &p)| (id, p))
	}

	pub fn visible_ids(&self) -> Vec<NodeId> {
		self.positions.keys().copied().collect()
	}
}

/// Compute positions for the clusters and, if `expanded` names a cluster, its leaves.
///
/// Returns an empty layout for an empty model or a degenerate container.
/// Unusable `config` values are replaced as in [`LayoutConfig::sanitized`].
pub fn compute_layout(
	model: &GraphModel,
	width: f64,
	height: f64,
	expanded: Option<NodeId>,
	config: &LayoutConfig,
) -> Layout {
	let config = &config.sanitized();
	let mut layout = Layout {
		width,
		height,
		positions: IndexMap::new(),
	};
	let clusters = model.cluster_ids();
	if clusters.is_empty() || !(width > 0.0 && height > 0.0) || !(width * height).is_finite() {
		return layout;
	}

	let span = width.min(height);
	let (cx, cy) = (width / 2.0, height / 2.0);
	let cluster_radius = config.radii.for_tier(SizeTier::Large);
	for (i, (x, y)) in ring(cx, cy, span * config.cluster_ring, clusters.len()).enumerate() {
		let id = clusters[i];
		let (x, y) = jittered(id, x, y, config.jitter);
		layout.positions.insert(
			id,
			Position {
				x,
				y,
				radius: cluster_radius,
			},
		);
	}

	let Some(parent) = expanded.and_then(|id| layout.get(id).map(|p| (id, p))) else {
		return layout;
	};
	let (parent_id, center) = parent;
	let leaves: Vec<_> = model.leaf_nodes_of(parent_id).collect();
	for (leaf, (x, y)) in leaves
		.iter()
		.zip(ring(center.x, center.y, span * config.subtopic_ring, leaves.len()))
	{
		let id = leaf.info.id;
		let tier = match leaf.tier {
			LeafTier::Medium => SizeTier::Medium,
			LeafTier::Small => SizeTier::Small,
		};
		let (x, y) = jittered(id, x, y, config.jitter);
		layout.positions.insert(
			id,
			Position {
				x,
				y,
				radius: config.radii.for_tier(tier),
			},
		);
	}
	layout
}

/// `count` points evenly spaced on a circle, starting at angle zero.
fn ring(cx: f64, cy: f64, radius: f64, count: usize) -> impl Iterator<Item = (f64, f64)> {
	let step = if count == 0 { 0.0 } else { TAU / count as f64 };
	(0..count).map(move |i| {
		let angle = i as f64 * step;
		(cx + radius * angle.cos(), cy + radius * angle.sin())
	})
}

fn jittered(id: NodeId, x: f64, y: f64, amplitude: Option<f64>) -> (f64, f64) {
	match amplitude {
		Some(a) if a > 0.0 => {
			let (dx, dy) = jitter_offset(id, a);
			(x + dx, y + dy)
		}
		_ => (x, y),
	}
}

/// Offset in `[-amplitude, amplitude]` per axis, fixed for a given id.
pub fn jitter_offset(id: NodeId, amplitude: f64) -> (f64, f64) {
	let seed = id as f64 + 1.0;
	(
		(pseudo_random(seed * 1.1) - 0.5) * 2.0 * amplitude,
		(pseudo_random(seed * 2.3) - 0.5) * 2.0 * amplitude,
	)
}

/// Simple pseudo-random function (deterministic)
fn pseudo_random(seed: f64) -> f64 {
	let x = (seed * 12.9898 + seed * 78.233).sin() * 43758.5453;
	x - x.floor()
}
