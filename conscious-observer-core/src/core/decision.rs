//! Inner-loop decision records and the loop-detection hash.

use std::hash::Hash;
use std::hash::Hasher;

use serde::Deserialize;
use serde::Serialize;

/// Metadata attached to a REPLAN decision.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplanMetadata {
    /// The new objective the inner loop proposes to pursue.
    pub objective: Option<String>,
    /// Free-text reason the loop chose to replan.
    pub reason: Option<String>,
}

/// One step taken by the inner execution loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionTag {
    /// Proceed to the next cycle.
    Continue,
    /// Propose a new plan; terminates the loop in EMERGENCY mode.
    Replan,
    /// Suspend awaiting external input; terminates the loop.
    Park,
    /// The objective is satisfied; terminates the loop.
    Complete,
    /// Suspend on a timer; terminates the loop.
    Sleep,
}

/// One decision emitted by `runCycle`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    /// What the inner loop chose to do this cycle.
    pub action: ActionTag,
    /// The inner loop's stated reasoning.
    pub reasoning: String,
    /// DAG node ids this decision targets, if any.
    pub target_node_ids: Vec<String>,
    /// Populated when `action == Replan`.
    pub replan: Option<ReplanMetadata>,
}

impl Decision {
    /// A stable hash of `(action, target_node_ids, replan.objective)`, used
    /// as the loop-detection key by the cognitive-load monitor.
    #[must_use]
    pub fn loop_detection_hash(&self) -> u64 {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        std::mem::discriminant(&self.action).hash(&mut hasher);
        self.target_node_ids.hash(&mut hasher);
        if let Some(replan) = &self.replan {
            replan.objective.hash(&mut hasher);
        }
        hasher.finish()
    }
}
