//! Task workspace coordination for Atelier.
//!
//! This module implements the workspace state machine: a task with an
//! ordered plan, a set of code changes, and a batch of review comments,
//! advanced by asynchronous generation calls and synchronous operator
//! edits. Generated artefacts merge into operator-edited state under the
//! rules enforced by the [`domain::Task`] aggregate, while each stage's
//! call lifecycle is tracked in a [`domain::StageTracker`]. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
