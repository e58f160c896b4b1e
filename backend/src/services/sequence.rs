//! Sequential document number generation
//!
//! Challans and invoices carry numbers like CH0001 / INV0037. The counter
//! advance is a single upsert-returning statement, so concurrent callers can
//! never observe the same value.

use sqlx::PgConnection;

use crate::error::AppResult;

/// Advance the counter for `prefix` and return the formatted number.
///
/// Runs on the caller's connection so the number is minted inside the same
/// transaction as the document it identifies.
pub async fn next_number(conn: &mut PgConnection, prefix: &str) -> AppResult<String> {
    let value = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO document_sequences (prefix, value)
        VALUES ($1, 1)
        ON CONFLICT (prefix)
        DO UPDATE SET value = document_sequences.value + 1
        RETURNING value
        "#,
    )
    .bind(prefix)
    .fetch_one(&mut *conn)
    .await?;

    Ok(format_number(prefix, value))
}

fn format_number(prefix: &str, value: i64) -> String {
    format!("{}{:04}", prefix, value)
}
