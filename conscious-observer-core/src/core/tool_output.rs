//! Gate-Out's input bundle.

use serde::Deserialize;
use serde::Serialize;

use super::identifiers::OutputId;

/// The artifact bundle handed to Gate-Out for grounding, calibration, and
/// filtering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutput {
    /// Identifies this output for the retry-budget store.
    pub output_id: OutputId,
    /// The synthesized artifact content.
    pub content: String,
    /// Free-form metadata carried alongside the content.
    pub metadata: serde_json::Value,
    /// Confidence the producing collaborator stated for this content, in `[0, 1]`.
    pub stated_confidence: f64,
    /// The DAG node id that produced this content, if any.
    pub source_node_id: Option<String>,
    /// The monitored loop invocation that produced this content.
    pub source_loop_id: String,
}
