//! # Site Audit Core
//!
//! The reachability-and-fact-extraction pipeline.
//!
//! * **[`probe`]**: ICMP reachability behind the [`probe::Prober`] trait.
//! * **[`session`]**: one-command SSH sessions behind [`session::SessionClient`].
//! * **[`extract`]**: positional parsing of router and switch output.
//! * **[`processor`]**: the per-record, per-slot state machine.
//! * **[`pipeline`]**: bounded fan-out over a batch of records.

pub mod extract;
pub mod pipeline;
pub mod probe;
pub mod processor;
pub mod session;

#[cfg(test)]
mod testing;

pub use pipeline::{Pipeline, PipelineError};
