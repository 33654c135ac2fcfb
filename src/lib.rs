//! # Bey Stats
//!
//! Personal battle statistics for spinning-top tournament players.
//!
//! ## Architecture
//!
//! - **models**: Match rows, part tables and derived statistics
//! - **calculate**: Classification, decomposition and the aggregator
//! - **storage**: JSONL data lake reads
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod models;
pub mod storage;

pub use models::*;
