//! Text report and process-flow graph for a [`crate::hierarchy::Hierarchy`].

pub mod graph;
pub mod render;
pub mod text;
pub mod writer;

pub use graph::{GraphStyle, ProcessGraph};
pub use render::{GraphRenderer, GraphvizRenderer};
pub use writer::{ArtifactPaths, Report, ReportArtifacts, ReportWriter};
