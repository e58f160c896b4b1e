//! Route definitions for the Wire Works Operations Platform

use axum::{routing::get, Router};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Master data
        .nest("/items", item_routes())
        .nest("/parties", party_routes())
        .nest("/gst-rates", gst_routes())
        .nest("/bom", bom_routes())
        // Inventory
        .nest("/stock", stock_routes())
        .nest("/grn", grn_routes())
        // Documents
        .nest("/challans", challan_routes())
        .nest("/invoices", invoice_routes())
        // Reporting
        .route("/dashboard", get(handlers::get_dashboard_summary))
}

/// Item master routes
fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_items).post(handlers::create_item))
        .route(
            "/:item_id",
            get(handlers::get_item)
                .put(handlers::update_item)
                .delete(handlers::delete_item),
        )
}

/// Party master routes
fn party_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_parties).post(handlers::create_party))
        .route(
            "/:party_id",
            get(handlers::get_party)
                .put(handlers::update_party)
                .delete(handlers::delete_party),
        )
}

/// GST rate master routes
fn gst_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_gst_rates).post(handlers::create_gst_rate))
        .route(
            "/:rate_id",
            get(handlers::get_gst_rate)
                .put(handlers::update_gst_rate)
                .delete(handlers::delete_gst_rate),
        )
}

/// BOM registry routes
fn bom_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_bom_rules).post(handlers::create_bom_rule))
        .route(
            "/:rule_id",
            get(handlers::get_bom_rule)
                .put(handlers::update_bom_rule)
                .delete(handlers::delete_bom_rule),
        )
        // Conversion lookups for the outward screen
        .route("/options/rm/:item_id", get(handlers::list_conversion_options))
        .route("/resolve/fg/:item_id", get(handlers::resolve_conversion))
}

/// Stock ledger routes (read-only; receipts and challans move stock)
fn stock_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_stock))
        .route("/:category/:item_id", get(handlers::get_stock_level))
}

/// Goods receipt routes
fn grn_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_grns).post(handlers::create_grn))
        .route("/:grn_id", get(handlers::get_grn).delete(handlers::delete_grn))
}

/// Outward challan routes
fn challan_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_challans).post(handlers::create_challan))
        .route(
            "/:challan_id",
            get(handlers::get_challan)
                .put(handlers::update_challan)
                .delete(handlers::delete_challan),
        )
}

/// Tax invoice routes
fn invoice_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_invoices).post(handlers::derive_invoice))
        .route(
            "/:invoice_id",
            get(handlers::get_invoice).delete(handlers::delete_invoice),
        )
}
