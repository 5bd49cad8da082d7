//! # talao-printer
//!
//! ESC/POS document compiler - turns structured point-of-sale documents
//! into the raw byte streams thermal printers understand.
//!
//! ## Scope
//!
//! This crate decides WHAT bytes reach the printer:
//! - ESC/POS command building (CP850 text, QR symbols, drawer kick, cut)
//! - Fixed-width receipt layout (42-column grid, money/quantity formats)
//! - Raster pipeline for logos and pre-rendered fiscal pages
//!   (scale, Floyd-Steinberg dithering, segmented `GS v 0` frames)
//!
//! Delivery is someone else's job: the surrounding system hands the
//! returned buffer to a sender that owns the TCP, USB or Bluetooth
//! channel. The compiler performs no I/O, never retries and keeps no
//! state between calls, so concurrent compiles need no locking.
//!
//! ## Example
//!
//! ```ignore
//! use shared::models::{DocumentPayload, PrinterProfile};
//! use talao_printer::build_receipt;
//!
//! let payload: DocumentPayload = serde_json::from_str(&job_body)?;
//! let bytes = build_receipt(&payload, &profile, true, None, false);
//! sender.dispatch(destination, bytes).await?;
//! ```

mod encoding;
mod error;
mod escpos;
mod layout;
mod raster;
mod receipt;

// Re-exports
pub use encoding::{decode as decode_cp850, encode as encode_cp850, sanitize};
pub use error::{CompileError, CompileResult};
pub use escpos::{EscPosBuilder, QR_PAYLOAD_LIMIT};
pub use layout::{LINE_WIDTH, format_money, format_qty, rule, trim_width, two_col};
pub use raster::{
    SEGMENT_HEIGHT_MAX, SEGMENT_HEIGHT_MIN, SUPPORTED_WIDTH_DOTS, clamp_segment_height,
    decode_base64_image, logo_raster, normalize_paper_width_dots, page_raster_chunks,
};
pub use receipt::{
    FiscalPageOptions, build_cut, build_drawer, build_fiscal_pages, build_receipt,
    build_test_print,
};
