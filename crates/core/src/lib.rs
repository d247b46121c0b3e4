//! Carteira Core - data consolidation, derivation and persisted-view
//! migration for the Carteira portfolio dashboard.
//!
//! This crate combines partial per-ticker data fragments into one record
//! set, derives synthetic metrics, indexes metric keys into groups, and
//! migrates persisted user configuration between schema versions.
//! It is database-agnostic and defines the key-value store trait
//! implemented by the `storage-sqlite` crate.

pub mod constants;
pub mod data;
pub mod derivation;
pub mod errors;
pub mod groups;
pub mod keys;
pub mod metadata;
pub mod migrations;
pub mod positions;
pub mod settings;
pub mod subscriptions;
pub mod tickers;
pub mod views;

// Re-export the types nearly every caller touches
pub use data::{AssetClass, ClassedDataSet, DataEntry, DataSet, MetricValue};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
