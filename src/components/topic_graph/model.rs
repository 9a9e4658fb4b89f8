//! Immutable topic graph: clusters, their leaves, and the edges between them.
//!
//! The model is validated once from a [`TopicDataset`] and never changes
//! afterwards. Edges are not stored; they are derived on demand from the
//! `connections` lists and canonicalized so each undirected pair appears once.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

use super::types::{NodeId, SizeTier, TopicDataset, TopicRecord};

/// Fields shared by every topic regardless of kind.
#[derive(Clone, Debug, PartialEq)]
pub struct TopicInfo {
	pub id: NodeId,
	pub label: String,
	pub category: String,
	pub description: String,
	pub image: Option<String>,
}

/// A top-level topic owning a ring of subtopics.
#[derive(Clone, Debug, PartialEq)]
pub struct ClusterNode {
	pub info: TopicInfo,
	/// Links to other clusters.
	pub connections: Vec<NodeId>,
	/// Owned leaves, as declared by the dataset.
	pub subtopics: Vec<NodeId>,
}

/// Size of a leaf topic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LeafTier {
	Medium,
	Small,
}

/// A subtopic, visible only while its parent cluster is expanded.
#[derive(Clone, Debug, PartialEq)]
pub struct LeafNode {
	pub info: TopicInfo,
	pub tier: LeafTier,
	pub parent: NodeId,
	/// Links to other leaves, under the same or a different parent.
	pub connections: Vec<NodeId>,
}

/// A node of the topic graph.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
	Cluster(ClusterNode),
	Leaf(LeafNode),
}

/// Discriminant of [`Node`], used in validation messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
	Cluster,
	Leaf,
}

impl fmt::Display for NodeKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			NodeKind::Cluster => f.write_str("cluster"),
			NodeKind::Leaf => f.write_str("leaf"),
		}
	}
}

impl Node {
	pub fn info(&self) -> &TopicInfo {
		match self {
			Node::Cluster(c) => &c.info,
			Node::Leaf(l) => &l.info,
		}
	}

	pub fn id(&self) -> NodeId {
		self.info().id
	}

	pub fn label(&self) -> &str {
		&self.info().label
	}

	pub fn category(&self) -> &str {
		&self.info().category
	}

	pub fn kind(&self) -> NodeKind {
		match self {
			Node::Cluster(_) => NodeKind::Cluster,
			Node::Leaf(_) => NodeKind::Leaf,
		}
	}

	pub fn tier(&self) -> SizeTier {
		match self {
			Node::Cluster(_) => SizeTier::Large,
			Node::Leaf(LeafNode {
				tier: LeafTier::Medium,
				..
			}) => SizeTier::Medium,
			Node::Leaf(LeafNode {
				tier: LeafTier::Small,
				..
			}) => SizeTier::Small,
		}
	}

	pub fn connections(&self) -> &[NodeId] {
		match self {
			Node::Cluster(c) => &c.connections,
			Node::Leaf(l) => &l.connections,
		}
	}

	pub fn as_cluster(&self) -> Option<&ClusterNode> {
		match self {
			Node::Cluster(c) => Some(c),
			Node::Leaf(_) => None,
		}
	}

	pub fn as_leaf(&self) -> Option<&LeafNode> {
		match self {
			Node::Leaf(l) => Some(l),
			Node::Cluster(_) => None,
		}
	}

	/// Build a node from a raw record, checking that its shape matches its size tier.
	fn from_record(record: &TopicRecord) -> Result<Self, ValidationError> {
		let info = TopicInfo {
			id: record.id,
			label: record.name.clone(),
			category: record.category.clone(),
			description: record.description.clone(),
			image: record.image.clone().filter(|s| !s.is_empty()),
		};
		let tier = match record.size {
			SizeTier::Large => {
				if record.parent_id.is_some() {
					return Err(ValidationError::ClusterWithParent { id: record.id });
				}
				return Ok(Node::Cluster(ClusterNode {
					info,
					connections: record.connections.clone(),
					subtopics: record.subtopics.clone(),
				}));
			}
			SizeTier::Medium => LeafTier::Medium,
			SizeTier::Small => LeafTier::Small,
		};
		if !record.subtopics.is_empty() {
			return Err(ValidationError::LeafWithSubtopics { id: record.id });
		}
		let parent = record
			.parent_id
			.ok_or(ValidationError::LeafWithoutParent { id: record.id })?;
		Ok(Node::Leaf(LeafNode {
			info,
			tier,
			parent,
			connections: record.connections.clone(),
		}))
	}
}

/// Kind of a drawn connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EdgeKind {
	/// Derived from a `connections` list.
	Link,
	/// Expanded cluster to one of its visible leaves.
	Membership,
}

/// Undirected edge with canonical endpoint order (`a < b`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
	pub a: NodeId,
	pub b: NodeId,
	pub kind: EdgeKind,
}

impl Edge {
	/// Canonicalize an endpoint pair. Self-loops have no edge.
	pub fn new(x: NodeId, y: NodeId, kind: EdgeKind) -> Option<Self> {
		match x.cmp(&y) {
			std::cmp::Ordering::Less => Some(Self { a: x, b: y, kind }),
			std::cmp::Ordering::Greater => Some(Self { a: y, b: x, kind }),
			std::cmp::Ordering::Equal => None,
		}
	}

	pub fn touches(&self, id: NodeId) -> bool {
		self.a == id || self.b == id
	}

	/// The endpoint opposite `id`, if `id` is an endpoint.
	pub fn other(&self, id: NodeId) -> Option<NodeId> {
		if self.a == id {
			Some(self.b)
		} else if self.b == id {
			Some(self.a)
		} else {
			None
		}
	}
}

/// Reasons a dataset cannot become a [`GraphModel`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
	#[error("topic id {id} is declared more than once")]
	DuplicateId { id: NodeId },
	#[error("topic {from} references missing topic {to}")]
	MissingReference { from: NodeId, to: NodeId },
	#[error("topic {from} references {to}, which is not a {expected} topic")]
	WrongKind {
		from: NodeId,
		to: NodeId,
		expected: NodeKind,
	},
	#[error("leaf topic {id} has no parentId")]
	LeafWithoutParent { id: NodeId },
	#[error("large topic {id} must not have a parentId")]
	ClusterWithParent { id: NodeId },
	#[error("leaf topic {id} must not own subtopics")]
	LeafWithSubtopics { id: NodeId },
	#[error("cluster {cluster} lists subtopic {leaf}, whose parent is {parent}")]
	SubtopicParentMismatch {
		cluster: NodeId,
		leaf: NodeId,
		parent: NodeId,
	},
}

/// Validated, read-only topic graph.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphModel {
	nodes: Vec<Node>,
	index: HashMap<NodeId, usize>,
	clusters: Vec<NodeId>,
	/// Leaves per parent, in declaration order.
	children: HashMap<NodeId, Vec<NodeId>>,
}

impl GraphModel {
	/// Validate dataset records into a model.
	pub fn from_dataset(data: &TopicDataset) -> Result<Self, ValidationError> {
		let nodes = data
			.topics
			.iter()
			.map(Node::from_record)
			.collect::<Result<Vec<_>, _>>()?;
		Self::new(nodes)
	}

	/// Validate already-typed nodes into a model. Declaration order is preserved.
	pub fn new(nodes: Vec<Node>) -> Result<Self, ValidationError> {
		let mut index = HashMap::with_capacity(nodes.len());
		for (i, node) in nodes.iter().enumerate() {
			if index.insert(node.id(), i).is_some() {
				return Err(ValidationError::DuplicateId { id: node.id() });
			}
		}

		let kind_of = |id: NodeId| index.get(&id).map(|&i| nodes[i].kind());
		let expect = |from: NodeId, to: NodeId, expected: NodeKind| match kind_of(to) {
			None => Err(ValidationError::MissingReference { from, to }),
			Some(kind) if kind != expected => Err(ValidationError::WrongKind { from, to, expected }),
			Some(_) => Ok(()),
		};

		let mut clusters = Vec::new();
		let mut children: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
		for node in &nodes {
			match node {
				Node::Cluster(cluster) => {
					let id = cluster.info.id;
					for &to in &cluster.connections {
						expect(id, to, NodeKind::Cluster)?;
					}
					for &leaf in &cluster.subtopics {
						expect(id, leaf, NodeKind::Leaf)?;
						if let Some(Node::Leaf(l)) = index.get(&leaf).map(|&i| &nodes[i]) {
							if l.parent != id {
								return Err(ValidationError::SubtopicParentMismatch {
									cluster: id,
									leaf,
									parent: l.parent,
								});
							}
						}
					}
					clusters.push(id);
					children.entry(id).or_default();
				}
				Node::Leaf(leaf) => {
					let id = leaf.info.id;
					expect(id, leaf.parent, NodeKind::Cluster)?;
					for &to in &leaf.connections {
						expect(id, to, NodeKind::Leaf)?;
					}
					children.entry(leaf.parent).or_default().push(id);
				}
			}
		}

		Ok(Self {
			nodes,
			index,
			clusters,
			children,
		})
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn node(&self, id: NodeId) -> Option<&Node> {
		self.index.get(&id).map(|&i| &self.nodes[i])
	}

	/// All nodes in declaration order.
	pub fn nodes(&self) -> impl Iterator<Item = &Node> {
		self.nodes.iter()
	}

	/// Cluster nodes in declaration order.
	pub fn cluster_nodes(&self) -> impl Iterator<Item = &ClusterNode> + '_ {
		self.clusters.iter().filter_map(|&id| self.node(id)?.as_cluster())
	}

	/// Ids of cluster nodes in declaration order.
	pub fn cluster_ids(&self) -> &[NodeId] {
		&self.clusters
	}

	/// Leaves whose parent is `parent`, in declaration order. Empty for unknown ids.
	pub fn leaf_nodes_of(&self, parent: NodeId) -> impl Iterator<Item = &LeafNode> + '_ {
		self.children
			.get(&parent)
			.into_iter()
			.flatten()
			.filter_map(|&id| self.node(id)?.as_leaf())
	}

	/// Canonical link edges whose endpoints are both in `ids`, each exactly once,
	/// sorted by endpoint pair.
	pub fn edges_among(&self, ids: &[NodeId]) -> Vec<Edge> {
		let members: HashSet<NodeId> = ids.iter().copied().collect();
		let mut edges = BTreeSet::new();
		for &id in &members {
			let Some(node) = self.node(id) else {
				continue;
			};
			for &to in node.connections() {
				if members.contains(&to) {
					if let Some(edge) = Edge::new(id, to, EdgeKind::Link) {
						edges.insert(edge);
					}
				}
			}
		}
		edges.into_iter().collect()
	}

	/// Topics listed in `id`'s connections, deduplicated, in declaration order.
	pub fn related(&self, id: NodeId) -> Vec<&Node> {
		let Some(node) = self.node(id) else {
			return Vec::new();
		};
		let mut seen = HashSet::new();
		node.connections()
			.iter()
			.filter(|&&to| to != id && seen.insert(to))
			.filter_map(|&to| self.node(to))
			.collect()
	}

	/// Ids linked to `id` from either side, sorted. Membership is not a link.
	pub fn neighbors(&self, id: NodeId) -> Vec<NodeId> {
		let mut out = BTreeSet::new();
		for node in &self.nodes {
			if node.id() == id {
				out.extend(node.connections().iter().copied().filter(|&to| to != id));
			} else if node.connections().contains(&id) {
				out.insert(node.id());
			}
		}
		out.into_iter().collect()
	}
}
