//! Footprints Core - Domain models, dataset descriptors, and configuration
//!
//! This crate contains the partition-path parser, the region statistics table,
//! the STAC record types and the port definitions shared by the footprints crates.

pub mod config;
pub mod error;
pub mod models;
pub mod ports;

pub use error::{FootprintsError, Result};
