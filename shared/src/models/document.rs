//! Receipt document payload

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One sellable line of the document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LineItem {
    pub name: String,
    pub qty: Decimal,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

/// Document totals (2-decimal money semantics)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Totals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

/// One row of the per-rate tax breakdown
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxBreakdownRow {
    pub label: String,
    pub base: Decimal,
    pub tax: Decimal,
}

/// One settled payment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentRow {
    pub label: String,
    pub amount: Decimal,
}

/// Immutable input for one compile call.
///
/// Values arrive from a loosely validated web layer; blank strings mean
/// "absent" and are skipped by the compiler.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentPayload {
    pub company_name: String,
    pub company_nif: String,
    pub company_lines: Vec<String>,
    pub terminal_name: String,
    pub printed_at: String,
    pub document_label: String,
    pub document_number: String,
    pub operator_name: String,
    /// Fiscal series identifier (ATCUD)
    pub atcud: String,
    /// Fiscal signature hash, trimmed to the line width when printed
    pub hash_value: String,
    pub customer_line: String,
    pub table_line: String,
    pub items: Vec<LineItem>,
    pub totals: Totals,
    pub tax_lines: Vec<TaxBreakdownRow>,
    pub payments: Vec<PaymentRow>,
    /// QR symbol payload, at most 700 bytes reach the printer
    pub qr_code: Option<String>,
    /// Base64 logo image, optionally `data:image/...;base64,` prefixed
    pub logo_base64: Option<String>,
    /// Explicit trailing feed; non-positive selects the default
    pub final_feed_lines: i64,
}
