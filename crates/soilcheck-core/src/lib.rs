//! Soilcheck Core - Domain models, inference port, and configuration
//!
//! This crate contains the soil/analysis data model and the port definition
//! for the external inference capability.

pub mod config;
pub mod error;
pub mod models;
pub mod ports;

pub use error::{Result, SoilcheckError};
