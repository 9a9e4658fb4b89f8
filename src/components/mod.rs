//! UI components.

pub mod topic_graph;
