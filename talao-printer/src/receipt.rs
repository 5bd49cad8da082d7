//! Document compiler
//!
//! One-shot entry points turning a `DocumentPayload` and a
//! `PrinterProfile` into complete ESC/POS byte streams. Each call fully
//! determines its output from its inputs; nothing is cached between
//! calls and the returned buffer is owned by the caller.

use chrono::Local;
use rust_decimal::Decimal;
use shared::models::{DocumentPayload, LineItem, PaymentRow, PrinterProfile, Totals};
use tracing::instrument;

use crate::error::{CompileError, CompileResult};
use crate::escpos::EscPosBuilder;
use crate::layout::{self, LINE_WIDTH};
use crate::raster;

/// Default trailing feed for a composed receipt, in lines.
const DEFAULT_RECEIPT_FEED: i64 = 8;

/// Default trailing feed for a fiscal page facsimile.
const DEFAULT_FISCAL_FEED: i64 = 6;

/// Default raster segment height for fiscal pages, in dot rows.
const DEFAULT_SEGMENT_HEIGHT: i64 = 1200;

/// Optional knobs for [`build_fiscal_pages`], straight from persisted
/// request configuration; out-of-range values are clamped.
#[derive(Debug, Clone, Copy, Default)]
pub struct FiscalPageOptions {
    pub feed_lines: Option<i64>,
    pub width_dots: Option<i64>,
    pub segment_height: Option<i64>,
}

/// Compile a full receipt document.
///
/// The cut is applied only when both `apply_cut` and the profile allow
/// it; a non-blank `cut_mode_override` takes precedence over the
/// profile's configured mode. A logo that fails to decode is omitted
/// without failing the document.
#[instrument(skip_all, fields(items = payload.items.len()))]
pub fn build_receipt(
    payload: &DocumentPayload,
    profile: &PrinterProfile,
    apply_cut: bool,
    cut_mode_override: Option<&str>,
    apply_drawer: bool,
) -> Vec<u8> {
    let mut b = EscPosBuilder::new();
    b.align_center();

    if let Some(logo) = payload.logo_base64.as_deref().filter(|s| !is_blank(s)) {
        if let Some(frame) = raster::logo_raster(logo) {
            b.raw(&frame);
            b.newline();
        }
    }

    b.bold(true);
    b.line(&payload.company_name);
    b.bold(false);

    if !is_blank(&payload.company_nif) {
        b.line(&payload.company_nif);
    }
    for line in &payload.company_lines {
        if !is_blank(line) {
            b.line(line);
        }
    }
    if !is_blank(&payload.terminal_name) {
        b.line(&payload.terminal_name);
    }
    if !is_blank(&payload.printed_at) {
        b.line(&payload.printed_at);
    }

    b.align_left();
    b.line(&layout::rule(LINE_WIDTH));

    let headline = [payload.document_label.trim(), payload.document_number.trim()]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    if !headline.is_empty() {
        b.bold(true);
        b.line(&headline);
        b.bold(false);
    }

    if !is_blank(&payload.operator_name) {
        b.line(&format!("Operador: {}", payload.operator_name));
    }
    if !is_blank(&payload.atcud) {
        b.line(&format!("ATCUD: {}", payload.atcud));
    }
    if !is_blank(&payload.hash_value) {
        b.line(&format!("Hash: {}", layout::trim_width(&payload.hash_value, LINE_WIDTH)));
    }
    if !is_blank(&payload.customer_line) {
        b.line(&format!("Cliente: {}", payload.customer_line));
    }
    if !is_blank(&payload.table_line) {
        b.line(&payload.table_line);
    }

    b.line(&layout::rule(LINE_WIDTH));

    for item in &payload.items {
        b.line(&item.name);
        let left = format!(
            "{} x {}",
            layout::format_qty(item.qty),
            layout::format_money(item.unit_price)
        );
        b.line(&layout::two_col(&left, &layout::format_money(item.line_total), LINE_WIDTH));
    }

    b.line(&layout::rule(LINE_WIDTH));
    b.line(&layout::two_col("Subtotal", &layout::format_money(payload.totals.subtotal), LINE_WIDTH));
    b.line(&layout::two_col("IVA", &layout::format_money(payload.totals.tax), LINE_WIDTH));
    b.bold(true);
    b.line(&layout::two_col("TOTAL", &layout::format_money(payload.totals.total), LINE_WIDTH));
    b.bold(false);

    if !payload.tax_lines.is_empty() {
        b.line(&layout::rule(LINE_WIDTH));
        b.bold(true);
        b.line("Impostos");
        b.bold(false);
        for row in &payload.tax_lines {
            if is_blank(&row.label) {
                continue;
            }
            b.line(&row.label);
            b.line(&layout::two_col(
                &format!("Base {}", layout::format_money(row.base)),
                &layout::format_money(row.tax),
                LINE_WIDTH,
            ));
        }
    }

    if !payload.payments.is_empty() {
        b.line(&layout::rule(LINE_WIDTH));
        for payment in &payload.payments {
            b.line(&layout::two_col(
                &payment.label,
                &layout::format_money(payment.amount),
                LINE_WIDTH,
            ));
        }
    }

    if let Some(qr) = payload.qr_code.as_deref().filter(|s| !is_blank(s)) {
        b.align_center();
        b.qr(qr);
        b.newline();
        b.align_left();
    }

    b.newline();
    b.align_center();
    b.line("Obrigado pela preferencia");
    b.align_left();

    if apply_drawer && profile.cash_drawer.enabled {
        b.open_drawer(&profile.cash_drawer.kick_pulse);
    }

    let requested = if payload.final_feed_lines <= 0 {
        DEFAULT_RECEIPT_FEED
    } else {
        payload.final_feed_lines
    };
    b.feed(requested.clamp(6, 14));
    b.newline();
    b.newline();

    if apply_cut && profile.cut.enabled {
        b.cut(resolve_cut_mode(cut_mode_override, profile));
    }

    b.build()
}

/// Drawer-kick pulse only.
pub fn build_drawer(profile: &PrinterProfile) -> Vec<u8> {
    let mut b = EscPosBuilder::new();
    b.open_drawer(&profile.cash_drawer.kick_pulse);
    b.build()
}

/// Paper-cut only; the override takes precedence when non-blank.
pub fn build_cut(profile: &PrinterProfile, mode_override: Option<&str>) -> Vec<u8> {
    let mut b = EscPosBuilder::new();
    b.cut(resolve_cut_mode(mode_override, profile));
    b.build()
}

/// Synthesize a one-item diagnostic receipt and compile it with cut and
/// drawer requested.
pub fn build_test_print(profile: &PrinterProfile, title: &str) -> Vec<u8> {
    let now = Local::now();
    let payload = DocumentPayload {
        company_name: "TALAO PRINTER".to_string(),
        company_nif: "TESTE".to_string(),
        terminal_name: profile.name.clone(),
        operator_name: "TESTE".to_string(),
        document_number: format!("TEST-{}", now.format("%Y%m%d%H%M%S")),
        printed_at: now.format("%d/%m/%Y %H:%M:%S").to_string(),
        items: vec![LineItem {
            name: title.to_string(),
            qty: Decimal::ONE,
            unit_price: Decimal::new(100, 2),
            line_total: Decimal::new(100, 2),
        }],
        totals: Totals {
            subtotal: Decimal::new(81, 2),
            tax: Decimal::new(19, 2),
            total: Decimal::new(100, 2),
        },
        payments: vec![PaymentRow {
            label: "Numerario".to_string(),
            amount: Decimal::new(100, 2),
        }],
        ..Default::default()
    };

    build_receipt(&payload, profile, true, None, true)
}

/// Compile a pre-rendered fiscal document, one base64 raster per page.
///
/// The default raster width is 576 dots for network profiles and 384
/// otherwise; both width and segment height can be overridden and are
/// normalized. Fails hard when no page yields raster data, a facsimile
/// with nothing on it must never reach the printer.
#[instrument(skip_all, fields(pages = pages.len()))]
pub fn build_fiscal_pages(
    pages: &[String],
    profile: &PrinterProfile,
    apply_cut: bool,
    cut_mode_override: Option<&str>,
    apply_drawer: bool,
    options: FiscalPageOptions,
) -> CompileResult<Vec<u8>> {
    if pages.is_empty() {
        return Err(CompileError::MissingPages);
    }

    let mut b = EscPosBuilder::new();
    b.align_center();

    let default_width: u32 = if profile.mode_normalized() == "network" { 576 } else { 384 };
    let target_width = raster::normalize_paper_width_dots(
        options.width_dots.unwrap_or(i64::from(default_width)),
        default_width,
    );
    let segment = raster::clamp_segment_height(options.segment_height.unwrap_or(DEFAULT_SEGMENT_HEIGHT));

    let mut printed_chunks = 0usize;
    for raw in pages {
        if is_blank(raw) {
            continue;
        }
        let chunks = raster::page_raster_chunks(raw, target_width, segment);
        if chunks.is_empty() {
            continue;
        }
        for chunk in &chunks {
            b.raw(chunk);
            b.newline();
        }
        b.newline();
        printed_chunks += chunks.len();
    }

    if printed_chunks == 0 {
        return Err(CompileError::UnprintablePages);
    }

    b.align_left();
    if apply_drawer && profile.cash_drawer.enabled {
        b.open_drawer(&profile.cash_drawer.kick_pulse);
    }

    b.feed(options.feed_lines.unwrap_or(DEFAULT_FISCAL_FEED).clamp(4, 6));
    b.newline();
    b.newline();

    if apply_cut && profile.cut.enabled {
        b.cut(resolve_cut_mode(cut_mode_override, profile));
    }

    Ok(b.build())
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn resolve_cut_mode<'a>(override_mode: Option<&'a str>, profile: &'a PrinterProfile) -> &'a str {
    match override_mode {
        Some(mode) if !is_blank(mode) => mode,
        _ => &profile.cut.mode,
    }
}
