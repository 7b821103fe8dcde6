//! The orchestrator's input types: the raw payload and the caller's intent.

use serde::Deserialize;
use serde::Serialize;

/// Declared modality of a [`RawInput`] payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    /// Plain or rich text.
    Text,
    /// Audio payload.
    Audio,
    /// Still image payload.
    Image,
    /// Video payload.
    Video,
    /// Structured or semi-structured document payload.
    Document,
}

/// An opaque payload with a declared modality tag.
///
/// # Invariants
/// - Passed by reference into perception; never mutated by the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawInput {
    /// The declared modality of `payload`.
    pub modality: Modality,
    /// The opaque payload bytes, encoded per the modality's own convention.
    pub payload: Vec<u8>,
}

impl RawInput {
    /// Builds a text input from a UTF-8 string.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            modality: Modality::Text,
            payload: text.into().into_bytes(),
        }
    }

    /// Interprets the payload as UTF-8 text, if the modality is [`Modality::Text`].
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if self.modality != Modality::Text {
            return None;
        }
        std::str::from_utf8(&self.payload).ok()
    }
}

/// The caller's intent for one invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnRequest {
    /// Free-text objective the loop should pursue.
    pub objective: String,
    /// Optional constraints narrowing the objective.
    #[serde(default)]
    pub constraints: Vec<String>,
    /// Optional caller-supplied trace identifier; generated if absent.
    #[serde(default)]
    pub trace_id: Option<String>,
}

impl SpawnRequest {
    /// Builds a minimal spawn request with no constraints and no caller trace id.
    #[must_use]
    pub fn new(objective: impl Into<String>) -> Self {
        Self {
            objective: objective.into(),
            constraints: Vec::new(),
            trace_id: None,
        }
    }
}
