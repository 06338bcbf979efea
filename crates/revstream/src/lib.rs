//! Core library for the Revstream Capital revenue-advance platform.
//!
//! Houses the pricing engine that quotes advances against recurring revenue,
//! the onboarding funnel guard and session lifecycle, and the aggregator
//! proxy that shields upstream credentials from clients.

pub mod aggregator;
pub mod config;
pub mod error;
pub mod funnel;
pub mod pricing;
pub mod telemetry;
