//! Application services for workspace orchestration.

mod workspace;

pub use workspace::{ManualChangeRequest, WorkspaceService};
