//! HTTP handlers for the Wire Works Operations Platform

mod bom;
mod challan;
mod grn;
mod gst;
mod health;
mod invoice;
mod item;
mod party;
mod reporting;
mod stock;

pub use bom::*;
pub use challan::*;
pub use grn::*;
pub use gst::*;
pub use health::*;
pub use invoice::*;
pub use item::*;
pub use party::*;
pub use reporting::*;
pub use stock::*;
