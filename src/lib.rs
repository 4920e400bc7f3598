//! dinesat: customer satisfaction prediction for restaurant visit data.
//!
//! This crate implements the tabular pipeline behind the prediction demo:
//! CSV loading with forward-fill cleaning, deterministic categorical
//! encoding, feature schema management, a GBDT classifier behind a small
//! fit/predict trait, and the per-request inference adapter.
//!
//! Initialization happens once and returns an immutable
//! [`pipeline::SatisfactionPipeline`] handle that every subsequent
//! prediction borrows read-only.
pub mod config;
pub mod dataset;
pub mod encoding;
pub mod error;
pub mod inference;
pub mod matrix;
pub mod models;
pub mod pipeline;
pub mod schema;
