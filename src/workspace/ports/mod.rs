//! Port contracts for the task workspace.
//!
//! Ports define infrastructure-agnostic interfaces used by workspace
//! services.

pub mod gateway;

pub use gateway::{
    Generated, GenerationError, GenerationGateway, GenerationResult, ImplementationSeedOptions,
    PlanGenerationOptions, PlanTone, ReviewRunOptions, ReviewStrictness,
};
