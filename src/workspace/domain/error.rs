//! Error types for workspace domain parsing.

use thiserror::Error;

/// Error returned while parsing plan step statuses from wire data.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown plan step status: {0}")]
pub struct ParsePlanStepStatusError(pub String);

/// Error returned while parsing code change statuses from wire data.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown code change status: {0}")]
pub struct ParseCodeChangeStatusError(pub String);

/// Error returned while parsing stage tags from wire data.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown workspace stage: {0}")]
pub struct ParseStageError(pub String);
