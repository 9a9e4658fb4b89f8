//! Hierarchical topic graph visualization component.
//!
//! Renders a two-level topic network on an HTML canvas:
//! - Top-level clusters on an outer ring, linked to related clusters
//! - Clicking a cluster reveals its subtopics on a ring around it
//! - Selecting a topic highlights it and its neighbors and dims the rest
//! - A detail panel with related topics and an optional route per topic
//!
//! The engine below the component is plain Rust and can be driven directly:
//!
//! ```ignore
//! use topic_graph::{ClickOutcome, TopicDataset, TopicGraphState};
//!
//! let data = TopicDataset::from_json(json)?;
//! let mut state = TopicGraphState::from_dataset(&data, 800.0, 600.0)?;
//! assert_eq!(state.click(1), ClickOutcome::Expanded(1));
//! ```
//!
//! In a Leptos view:
//!
//! ```ignore
//! view! { <TopicGraphCanvas data=dataset fullscreen=true /> }
//! ```

mod component;
pub mod highlight;
pub mod layout;
pub mod model;
pub mod reflow;
mod render;
pub mod scene;
pub mod state;
pub mod theme;
pub mod types;

pub use component::TopicGraphCanvas;
pub use highlight::{HighlightSet, HighlightStyle};
pub use layout::{Layout, LayoutConfig, NodeRadii, Position, compute_layout};
pub use model::{Edge, EdgeKind, GraphModel, Node, ValidationError};
pub use reflow::{Invalidation, ReflowTrigger};
pub use render::wrap_label;
pub use scene::{Scene, SceneDiff};
pub use state::{
	ClickOutcome, NavigationTable, RelatedTopic, TopicDetail, TopicGraphOptions, TopicGraphState,
};
pub use theme::{CategoryPalette, Color, Theme};
pub use types::{NodeId, SizeTier, TopicDataset, TopicRecord};
