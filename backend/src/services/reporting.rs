//! Dashboard reporting service

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use crate::error::AppResult;

/// Reporting service for the dashboard screen
#[derive(Clone)]
pub struct ReportingService {
    db: PgPool,
}

/// Headline numbers for the dashboard
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub total_parties: i64,
    pub total_items: i64,
    pub active_bom_rules: i64,
    pub total_receipts: i64,
    pub total_challans: i64,
    pub total_invoices: i64,
    pub rm_stock_total: Decimal,
    pub fg_stock_total: Decimal,
}

impl ReportingService {
    /// Create a new ReportingService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Collect the dashboard summary
    pub async fn dashboard_summary(&self) -> AppResult<DashboardSummary> {
        let (total_parties, total_items, active_bom_rules, total_receipts, total_challans, total_invoices) =
            sqlx::query_as::<_, (i64, i64, i64, i64, i64, i64)>(
                r#"
                SELECT (SELECT COUNT(*) FROM party_master),
                       (SELECT COUNT(*) FROM item_master),
                       (SELECT COUNT(*) FROM bom_rules WHERE status = 'Active'),
                       (SELECT COUNT(*) FROM grn_records),
                       (SELECT COUNT(*) FROM outward_challans),
                       (SELECT COUNT(*) FROM tax_invoices)
                "#,
            )
            .fetch_one(&self.db)
            .await?;

        let (rm_stock_total, fg_stock_total) = sqlx::query_as::<_, (Decimal, Decimal)>(
            r#"
            SELECT COALESCE(SUM(quantity) FILTER (WHERE category = 'RM'), 0),
                   COALESCE(SUM(quantity) FILTER (WHERE category = 'FG'), 0)
            FROM stock_entries
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        Ok(DashboardSummary {
            total_parties,
            total_items,
            active_bom_rules,
            total_receipts,
            total_challans,
            total_invoices,
            rm_stock_total,
            fg_stock_total,
        })
    }
}
