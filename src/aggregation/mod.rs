//! Batch regrouping of persisted readings into burn sessions.
//!
//! Mode time is attributed with a cumulative difference: every update assigns
//! `timestamp - start_time - already_attributed` to the row's mode, so
//! repeated rows of the same mode never count the same interval twice.

pub mod aggregator;

pub use aggregator::{aggregate, OpenSession, SessionAggregator};
