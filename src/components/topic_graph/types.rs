//! Dataset records supplied by the page layer.
//!
//! These mirror the JSON embedded in the page and are validated into a
//! [`GraphModel`](super::model::GraphModel) before anything is drawn.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::layout::LayoutConfig;

/// Identifier shared by cluster and leaf topics.
pub type NodeId = u32;

/// Visual size class of a topic. `Large` topics are clusters; the others are leaves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeTier {
	Large,
	Medium,
	Small,
}

/// One topic as it appears in the dataset.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicRecord {
	pub id: NodeId,
	pub name: String,
	#[serde(default)]
	pub category: String,
	#[serde(default)]
	pub description: String,
	/// Image path for the detail panel. Empty strings are treated as absent.
	#[serde(default)]
	pub image: Option<String>,
	pub size: SizeTier,
	#[serde(default)]
	pub connections: Vec<NodeId>,
	/// Owned subtopics (cluster records only).
	#[serde(default)]
	pub subtopics: Vec<NodeId>,
	/// Owning cluster (leaf records only).
	#[serde(default)]
	pub parent_id: Option<NodeId>,
}

/// Complete dataset: topics plus presentation tables.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TopicDataset {
	/// Category name to CSS color, in legend order.
	#[serde(default)]
	pub categories: IndexMap<String, String>,
	pub topics: Vec<TopicRecord>,
	/// Topics that open a dedicated page instead of only the in-place panel.
	#[serde(default)]
	pub routes: HashMap<NodeId, String>,
	#[serde(default)]
	pub layout: LayoutConfig,
}

impl TopicDataset {
	/// Parse a dataset from its JSON text.
	pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(text)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_minimal_dataset_with_defaults() {
		let data = TopicDataset::from_json(
			r#"{
				"topics": [
					{ "id": 1, "name": "Marine Biodiversity", "size": "large", "subtopics": [101] },
					{ "id": 101, "name": "Alpha Diversity", "size": "medium", "parentId": 1 }
				]
			}"#,
		)
		.expect("dataset should parse");

		assert_eq!(data.topics.len(), 2);
		assert!(data.categories.is_empty());
		assert!(data.routes.is_empty());
		assert_eq!(data.layout, LayoutConfig::default());
		assert_eq!(data.topics[1].parent_id, Some(1));
		assert_eq!(data.topics[1].size, SizeTier::Medium);
		assert!(data.topics[0].connections.is_empty());
	}

	#[test]
	fn parses_routes_with_numeric_keys() {
		let data = TopicDataset::from_json(
			r#"{
				"topics": [],
				"routes": { "102": "/biological/species-distribution" }
			}"#,
		)
		.expect("dataset should parse");
		assert_eq!(
			data.routes.get(&102).map(String::as_str),
			Some("/biological/species-distribution")
		);
	}

	#[test]
	fn keeps_category_declaration_order() {
		let data = TopicDataset::from_json(
			r##"{
				"topics": [],
				"categories": { "Methods": "#ffa500", "Concepts": "#2a9d8f", "Fields": "#8338ec" }
			}"##,
		)
		.expect("dataset should parse");
		let names: Vec<_> = data.categories.keys().map(String::as_str).collect();
		assert_eq!(names, ["Methods", "Concepts", "Fields"]);
	}

	#[test]
	fn rejects_unknown_size() {
		let err = TopicDataset::from_json(r#"{ "topics": [ { "id": 1, "name": "x", "size": "huge" } ] }"#);
		assert!(err.is_err());
	}
}
