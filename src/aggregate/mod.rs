//! Fan-out aggregation: concurrent provider calls, settle-all collection and
//! deterministic merge into one [`WordBundle`](crate::model::WordBundle).

mod engine;
mod report;

pub use engine::{AggregateError, Aggregator};
pub use report::{Outcome, ProviderCall, ProviderReport};
