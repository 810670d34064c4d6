//! HTTP handlers for the gateway endpoint and probes.

pub mod generate;

pub use generate::{generate, method_not_allowed};
