// conscious-observer-core/src/core/identifiers.rs
// ============================================================================
// Module: Conscious Observer Identifiers
// Description: Canonical opaque identifiers for traces, agents, and outputs.
// Purpose: Provide strongly typed, serializable IDs with stable string forms.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! This module defines the opaque string-based identifiers used throughout
//! Conscious Observer. Identifiers serialize as strings; validation (such as
//! "non-empty") is enforced at construction rather than left to convention.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Error returned when an identifier fails its construction invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    /// The identifier string was empty.
    #[error("identifier must not be empty")]
    Empty,
}

// ============================================================================
// SECTION: Trace Identifier
// ============================================================================

/// Trace identifier propagated from Gate-In through every result record.
///
/// # Invariants
/// - Never empty: [`TraceId::new`] rejects an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraceId(String);

impl TraceId {
    /// Creates a new trace identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError::Empty`] when `id` is empty.
    pub fn new(id: impl Into<String>) -> Result<Self, IdentifierError> {
        let id = id.into();
        if id.is_empty() {
            return Err(IdentifierError::Empty);
        }
        Ok(Self(id))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Builds a trace id of the form `trace-{suffix}`.
    ///
    /// Infallible: the `trace-` prefix guarantees the result is never
    /// empty, so callers deriving a trace id from an already-known suffix
    /// (such as an agent id) do not need to handle [`IdentifierError`].
    #[must_use]
    pub fn derived_from(suffix: impl std::fmt::Display) -> Self {
        Self(format!("trace-{suffix}"))
    }

    /// Wraps an already-known-non-empty string without re-validating it.
    ///
    /// Intended for call sites that have just checked `!s.is_empty()`
    /// themselves (e.g. a caller-supplied trace id) and want to use it
    /// verbatim rather than via the fallible [`TraceId::new`].
    #[must_use]
    pub(crate) fn from_checked_nonempty(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// SECTION: Agent Identifier
// ============================================================================

/// Agent identifier assigned during agent genesis (Gate-In step 1).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(String);

impl AgentId {
    /// Creates a new agent identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for AgentId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for AgentId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

// ============================================================================
// SECTION: Output Identifier
// ============================================================================

/// Output identifier used to key the Gate-Out retry-budget store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutputId(String);

impl OutputId {
    /// Creates a new output identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OutputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// SECTION: Domain Tag
// ============================================================================

/// Domain classification tag produced by the classifier and threaded through
/// calibration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DomainTag(String);

impl DomainTag {
    /// Creates a new domain tag.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Returns the domain tag as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DomainTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
