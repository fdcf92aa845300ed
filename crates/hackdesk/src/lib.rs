//! Core library for the hackathon attendance service.
//!
//! The interesting machinery lives in [`workflows::attendance`]: the status
//! vocabulary, the overall-status derivation engine, the invitation/RSVP
//! lifecycle service, and the invitation expiry sweep.

pub mod config;
pub mod error;
pub mod metadata;
pub mod telemetry;
pub mod workflows;
