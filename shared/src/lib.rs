//! Shared domain types and calculations for the Wire Works Operations Platform
//!
//! This crate contains the pure (I/O-free) parts of the system: item and
//! document domain types, the conversion charge calculator, GST breakdown
//! math, and validation helpers used by the backend services.

pub mod charges;
pub mod gst;
pub mod types;
pub mod validation;

pub use charges::*;
pub use gst::*;
pub use types::*;
pub use validation::*;
