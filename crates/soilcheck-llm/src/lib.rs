//! Soilcheck LLM - Inference service adapters
//!
//! This crate implements the inference port from `soilcheck-core` over HTTP.

pub mod client;

pub use client::{is_supported_mime_type, HttpInferenceClient, SUPPORTED_MIME_TYPES};
