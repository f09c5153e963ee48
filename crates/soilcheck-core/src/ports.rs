//! Port trait definitions
//!
//! These traits define the interfaces that adapters must implement.

pub mod inference;

pub use inference::{InferenceCapability, InferenceFailure, InferenceResult};
