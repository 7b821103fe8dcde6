//! Uniform collaborator envelope and the typed unwrappers built on it (C1).
//!
//! Every collaborator returns `CollaboratorEnvelope<Value>`-shaped JSON: a
//! list of schema-tagged signals, an optional error, and a metrics bundle.
//! Unwrappers decode exactly one schema out of the signal list and propagate
//! everything else as an error — they never infer, never log above `debug`,
//! and never substitute a default when the expected schema is missing.

use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Identifies the schema a [`Signal`] carries, used by unwrappers to locate
/// the signal they expect inside a collaborator's envelope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaTag(pub String);

impl SchemaTag {
    /// Creates a new schema tag.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }
}

impl From<&str> for SchemaTag {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One schema-tagged data record emitted by a collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    /// Which schema `data` should be decoded as.
    pub schema: SchemaTag,
    /// The raw decoded-at-the-boundary payload.
    pub data: serde_json::Value,
}

/// An error reported by a collaborator instead of (or in addition to) signals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollaboratorError {
    /// A short machine-stable error kind, e.g. `"UNSUPPORTED_MODALITY"`.
    pub kind: String,
    /// A human-readable message, for logs only.
    pub message: String,
}

/// Per-call metrics a collaborator reports alongside its signals.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CollaboratorMetrics {
    /// Wall-clock latency of the call, in milliseconds.
    pub latency_ms: u64,
    /// Tokens consumed by the call, if applicable (0 for non-LLM collaborators).
    pub tokens_used: u64,
}

/// The uniform envelope every collaborator call returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollaboratorEnvelope {
    /// Zero or more schema-tagged signals.
    pub signals: Vec<Signal>,
    /// An error, if the collaborator failed or partially failed.
    pub error: Option<CollaboratorError>,
    /// Latency/token accounting for the call.
    pub metrics: CollaboratorMetrics,
}

impl CollaboratorEnvelope {
    /// Builds a success envelope from a single signal.
    #[must_use]
    pub fn single(schema: SchemaTag, data: serde_json::Value, metrics: CollaboratorMetrics) -> Self {
        Self {
            signals: vec![Signal { schema, data }],
            error: None,
            metrics,
        }
    }

    /// Builds a failure envelope carrying no signals.
    #[must_use]
    pub fn failure(kind: impl Into<String>, message: impl Into<String>, metrics: CollaboratorMetrics) -> Self {
        Self {
            signals: Vec::new(),
            error: Some(CollaboratorError {
                kind: kind.into(),
                message: message.into(),
            }),
            metrics,
        }
    }
}

/// Error raised when an unwrapper cannot produce the typed record it expects.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UnwrapError {
    /// The collaborator reported an explicit error.
    #[error("collaborator error {kind}: {message}")]
    Collaborator {
        /// The collaborator-reported error kind.
        kind: String,
        /// The collaborator-reported message.
        message: String,
    },
    /// No signal with the expected schema tag was present.
    #[error("expected schema `{expected}` not found in envelope")]
    SchemaMissing {
        /// The schema tag the unwrapper required.
        expected: String,
    },
    /// A signal with the expected schema was present but failed to decode.
    #[error("schema `{schema}` failed to decode: {source}")]
    DecodeFailed {
        /// The schema tag whose payload failed to decode.
        schema: String,
        /// The underlying decode error.
        #[source]
        source: serde_json::Error,
    },
}

/// Decodes the first signal matching `schema` out of `envelope` as `T`.
///
/// Inspects `envelope.error` first (collaborator-reported failures win over
/// a partial signal list), then scans `envelope.signals` for `schema`. Does
/// not infer and does not substitute a default when the schema is absent.
///
/// # Errors
///
/// Returns [`UnwrapError::Collaborator`] if the envelope carries an error,
/// [`UnwrapError::SchemaMissing`] if no signal matches `schema`, or
/// [`UnwrapError::DecodeFailed`] if the matching signal's payload does not
/// deserialize as `T`.
pub fn unwrap_signal<T>(envelope: &CollaboratorEnvelope, schema: &SchemaTag) -> Result<T, UnwrapError>
where
    T: DeserializeOwned,
{
    if let Some(error) = &envelope.error {
        debug!(kind = %error.kind, "collaborator reported error");
        return Err(UnwrapError::Collaborator {
            kind: error.kind.clone(),
            message: error.message.clone(),
        });
    }
    let Some(signal) = envelope.signals.iter().find(|s| &s.schema == schema) else {
        return Err(UnwrapError::SchemaMissing {
            expected: schema.0.clone(),
        });
    };
    serde_json::from_value(signal.data.clone()).map_err(|source| UnwrapError::DecodeFailed {
        schema: schema.0.clone(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::CollaboratorEnvelope;
    use super::CollaboratorMetrics;
    use super::SchemaTag;
    use super::UnwrapError;
    use super::unwrap_signal;

    #[test]
    fn unwrap_decodes_matching_schema() {
        let envelope = CollaboratorEnvelope::single(
            SchemaTag::new("modality.output"),
            serde_json::json!({"kind": "text"}),
            CollaboratorMetrics::default(),
        );
        let decoded: serde_json::Value =
            unwrap_signal(&envelope, &SchemaTag::new("modality.output")).expect("schema present");
        assert_eq!(decoded["kind"], "text");
    }

    #[test]
    fn unwrap_reports_missing_schema() {
        let envelope = CollaboratorEnvelope::single(
            SchemaTag::new("other"),
            serde_json::json!({}),
            CollaboratorMetrics::default(),
        );
        let result: Result<serde_json::Value, UnwrapError> =
            unwrap_signal(&envelope, &SchemaTag::new("modality.output"));
        assert!(matches!(result, Err(UnwrapError::SchemaMissing { .. })));
    }

    #[test]
    fn unwrap_surfaces_collaborator_error_before_schema_scan() {
        let envelope = CollaboratorEnvelope::failure("DECODE_FAILED", "bad input", CollaboratorMetrics::default());
        let result: Result<serde_json::Value, UnwrapError> =
            unwrap_signal(&envelope, &SchemaTag::new("modality.output"));
        assert!(matches!(result, Err(UnwrapError::Collaborator { .. })));
    }
}
