//! Site feasibility analysis pipeline.
//!
//! An address is geocoded, terrain and environmental signals are gathered
//! concurrently from independent providers, a handful of deterministic
//! assessments are derived, and the findings are assembled into a
//! [`analysis::SiteReport`] with a rendered document attached.

pub mod analysis;
pub mod config;
pub mod error;
pub mod telemetry;
