//! # dine-invoice
//!
//! Minimal PDF document library - low-level invoice output only.
//!
//! ## Scope
//!
//! This crate handles HOW an invoice file is produced:
//! - PDF 1.4 page/object/xref writing (uncompressed, A4)
//! - Built-in Helvetica fonts with WinAnsi text encoding
//! - Text width measurement for right/center alignment
//! - Amount in words (Indian numbering)
//!
//! Business logic (WHAT goes on the invoice) stays in `dine-server`.
//!
//! ## Example
//!
//! ```
//! use dine_invoice::{Align, Font, PdfBuilder};
//!
//! let mut b = PdfBuilder::a4();
//! b.font(Font::Bold, 18.0);
//! b.text_line("SEA TALE RESTAURANT", Align::Center);
//! b.font(Font::Regular, 10.0);
//! b.columns(&[("Table: T5", Align::Left), ("Date: 2025-01-22", Align::Right)]);
//! b.rule(0.5);
//!
//! let bytes = b.build().unwrap();
//! assert!(bytes.starts_with(b"%PDF-1.4"));
//! ```

mod encoding;
mod error;
mod metrics;
mod pdf;
mod words;

// Re-exports
pub use encoding::{encode_winansi, escape_pdf_string};
pub use error::{InvoiceError, InvoiceResult};
pub use metrics::text_width;
pub use pdf::{Align, Color, Font, PdfBuilder};
pub use words::{amount_in_words, number_in_words};
