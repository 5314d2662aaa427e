//! UI components.

pub mod community_graph;
