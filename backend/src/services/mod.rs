//! Business logic services for the Wire Works Operations Platform

pub mod bom;
pub mod challan;
pub mod grn;
pub mod gst;
pub mod invoice;
pub mod item;
pub mod party;
pub mod reporting;
pub mod sequence;
pub mod stock;

pub use bom::BomService;
pub use challan::ChallanService;
pub use grn::GrnService;
pub use gst::GstService;
pub use invoice::InvoiceService;
pub use item::ItemService;
pub use party::PartyService;
pub use reporting::ReportingService;
pub use stock::StockService;
