//! Offline analysis of utility-network trace exports.
//!
//! [`export::parse_export`] turns an export document into canonical maps,
//! [`extract`] picks barriers and subnetwork controllers out of them,
//! [`graph::build_graph`] builds the connectivity graph and [`trace`] runs the
//! traversals over it.

pub mod diagnostics;
pub mod error;
pub mod export;
pub mod extract;
pub mod graph;
pub mod key;
pub mod report;
pub mod trace;
pub mod value;

pub use error::{ExportError, TraceError};
pub use export::{ParseOptions, ParsedExport, parse_export};
pub use graph::{DirectedGraph, Graph, NetworkGraph, UndirectedGraph, build_graph};
pub use key::{FeatureKey, NodeKey};
pub use report::{AnalysisReport, build_report};
pub use trace::{ForwardStar, ForwardStarOptions};
pub use value::AttrValue;
