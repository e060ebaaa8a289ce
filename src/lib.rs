//! # serverless-constant-inputs
//!
//! Scans a serverless deployment descriptor's function events, lifts the
//! constant `input` payloads attached to schedule triggers, and synthesizes
//! one CloudFormation-style resource entry per payload into
//! `service.resources.Resources`, leaving everything else in the descriptor
//! untouched.
//!
//! ## Modules
//!
//! - `descriptor` - Typed serde model of the descriptor plus file load/save
//! - `extract` - Pure extraction of constant inputs from the functions map
//! - `resources` - Resource-name generation and the in-place merge pass
//! - `error` - Crate error type

pub mod descriptor;
pub mod error;
pub mod extract;
pub mod resources;

pub use descriptor::{Format, ScheduleInput, ServerlessDescriptor, Service};
pub use error::{Error, Result};
pub use extract::{extract_inputs, ExtractedInput};
pub use resources::{apply_constant_inputs, generated_resource_name, merge_resources};
