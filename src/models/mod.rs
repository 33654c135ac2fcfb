//! Core data models: match rows, part tables and derived statistics.

mod ids;
mod match_record;
mod parts;
mod stats;

pub use ids::*;
pub use match_record::*;
pub use parts::*;
pub use stats::*;
