// crates/core/src/lib.rs
//! Pure domain logic for kemuri: shared types, JST time handling, and the
//! chart aggregations the stats endpoints are built on. No I/O lives here.

pub mod chart;
pub mod grouping;
pub mod health;
pub mod jst;
pub mod paths;
pub mod types;

pub use chart::*;
pub use grouping::*;
pub use health::*;
pub use jst::*;
pub use types::*;
