//! Port trait definitions
//!
//! These traits define the interfaces that adapters must implement.

pub mod inspector;

pub use inspector::{InspectRequest, TableInspector, TableProfile};
