//! PDF document builder
//!
//! Provides a fluent API for laying out text-only documents top to bottom,
//! with automatic page breaks.

use std::io::Write;

use crate::encoding::{encode_winansi, escape_pdf_string};
use crate::error::{InvoiceError, InvoiceResult};
use crate::metrics::text_width;

/// A4 width in points
pub const A4_WIDTH: f32 = 595.28;
/// A4 height in points
pub const A4_HEIGHT: f32 = 841.89;

const DEFAULT_MARGIN: f32 = 40.0;
const LINE_SPACING: f32 = 1.4;

// Fixed object numbers; page objects start after these
const OBJ_CATALOG: usize = 1;
const OBJ_PAGES: usize = 2;
const OBJ_FONT_REGULAR: usize = 3;
const OBJ_FONT_BOLD: usize = 4;
const OBJ_INFO: usize = 5;
const OBJ_FIRST_PAGE: usize = 6;

/// Built-in font
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(&self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }
}

/// Horizontal text alignment inside a box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// RGB color, components in 0.0..=1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color(pub f32, pub f32, pub f32);

impl Color {
    pub const BLACK: Color = Color(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color(1.0, 1.0, 1.0);
    pub const GRAY: Color = Color(0.39, 0.39, 0.39);
    pub const LIGHT_GRAY: Color = Color(0.78, 0.78, 0.78);

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }
}

/// PDF document builder
///
/// Coordinates passed to the builder are relative to the left margin; the
/// vertical position is tracked by an internal cursor that moves down as
/// lines are written.
pub struct PdfBuilder {
    pages: Vec<Vec<u8>>,
    current: Vec<u8>,
    width: f32,
    height: f32,
    margin: f32,
    /// Top of the next line, in PDF user space (origin bottom-left)
    cursor: f32,
    font: Font,
    size: f32,
    color: Color,
    title: Option<String>,
}

impl PdfBuilder {
    /// Create an A4 portrait document with the default margin
    pub fn a4() -> Self {
        Self::with_page(A4_WIDTH, A4_HEIGHT, DEFAULT_MARGIN)
    }

    /// Create a document with a custom page size (points)
    pub fn new(width: f32, height: f32, margin: f32) -> InvoiceResult<Self> {
        if margin < 0.0 || margin * 2.0 >= width || margin * 2.0 >= height {
            return Err(InvoiceError::Layout(format!(
                "margin {margin} does not fit a {width}x{height} page"
            )));
        }
        Ok(Self::with_page(width, height, margin))
    }

    fn with_page(width: f32, height: f32, margin: f32) -> Self {
        Self {
            pages: Vec::new(),
            current: Vec::with_capacity(4096),
            width,
            height,
            margin,
            cursor: height - margin,
            font: Font::Regular,
            size: 10.0,
            color: Color::BLACK,
            title: None,
        }
    }

    /// Set the document title (Info dictionary)
    pub fn title(&mut self, title: &str) -> &mut Self {
        self.title = Some(title.to_string());
        self
    }

    // === State ===

    /// Select font and size for subsequent text
    pub fn font(&mut self, font: Font, size: f32) -> &mut Self {
        self.font = font;
        self.size = size;
        self
    }

    /// Select fill color for subsequent text
    pub fn color(&mut self, color: Color) -> &mut Self {
        self.color = color;
        self
    }

    /// Usable width between the margins
    pub fn content_width(&self) -> f32 {
        self.width - self.margin * 2.0
    }

    /// Height of one line at the current font size
    pub fn line_height(&self) -> f32 {
        self.size * LINE_SPACING
    }

    /// Number of pages written so far (including the open one)
    pub fn page_count(&self) -> usize {
        self.pages.len() + 1
    }

    /// Width of `s` at the current font
    pub fn measure(&self, s: &str) -> f32 {
        text_width(s, self.font, self.size)
    }

    // === Flow ===

    /// Move the cursor down by `points`
    pub fn space(&mut self, points: f32) -> &mut Self {
        self.ensure_space(points);
        self.cursor -= points;
        self
    }

    /// Start a new page if fewer than `points` remain above the bottom margin
    pub fn ensure_space(&mut self, points: f32) -> &mut Self {
        if self.cursor - points < self.margin {
            self.new_page();
        }
        self
    }

    /// Close the current page and start a new one
    pub fn new_page(&mut self) -> &mut Self {
        let finished = std::mem::replace(&mut self.current, Vec::with_capacity(4096));
        self.pages.push(finished);
        self.cursor = self.height - self.margin;
        self
    }

    // === Text Output ===

    /// Write one line of text across the full content width
    pub fn text_line(&mut self, s: &str, align: Align) -> &mut Self {
        let width = self.content_width();
        self.row(&[(s, 0.0, width, align)])
    }

    /// Write one line split into equal-width columns
    pub fn columns(&mut self, cells: &[(&str, Align)]) -> &mut Self {
        if cells.is_empty() {
            return self;
        }
        let col = self.content_width() / cells.len() as f32;
        let boxed: Vec<(&str, f32, f32, Align)> = cells
            .iter()
            .enumerate()
            .map(|(i, (text, align))| (*text, col * i as f32, col, *align))
            .collect();
        self.row(&boxed)
    }

    /// Write one line made of `(text, x, width, align)` boxes
    ///
    /// `x` is measured from the left margin.
    pub fn row(&mut self, cells: &[(&str, f32, f32, Align)]) -> &mut Self {
        let lh = self.line_height();
        self.ensure_space(lh);
        let baseline = self.cursor - self.size;
        for (text, x, width, align) in cells {
            if text.is_empty() {
                continue;
            }
            let w = self.measure(text);
            let offset = match align {
                Align::Left => 0.0,
                Align::Center => (width - w) / 2.0,
                Align::Right => width - w,
            };
            self.draw_text(self.margin + x + offset, baseline, text);
        }
        self.cursor -= lh;
        self
    }

    /// Split `s` into lines no wider than `width` at the current font
    ///
    /// Breaks on whitespace; a single word wider than `width` is kept whole.
    pub fn wrap(&self, s: &str, width: f32) -> Vec<String> {
        let mut lines = Vec::new();
        let mut line = String::new();
        for word in s.split_whitespace() {
            let candidate = if line.is_empty() {
                word.to_string()
            } else {
                format!("{line} {word}")
            };
            if !line.is_empty() && self.measure(&candidate) > width {
                lines.push(std::mem::take(&mut line));
                line = word.to_string();
            } else {
                line = candidate;
            }
        }
        if !line.is_empty() || lines.is_empty() {
            lines.push(line);
        }
        lines
    }

    // === Graphics ===

    /// Horizontal rule across the content width
    pub fn rule(&mut self, thickness: f32) -> &mut Self {
        self.rule_colored(thickness, Color::BLACK)
    }

    /// Horizontal rule in a given stroke color
    pub fn rule_colored(&mut self, thickness: f32, color: Color) -> &mut Self {
        self.ensure_space(6.0);
        let y = self.cursor - 3.0;
        let (x1, x2) = (self.margin, self.width - self.margin);
        let Color(r, g, b) = color;
        self.push(&format!(
            "q {r:.3} {g:.3} {b:.3} RG {thickness:.2} w {x1:.2} {y:.2} m {x2:.2} {y:.2} l S Q\n"
        ));
        self.cursor -= 6.0;
        self
    }

    /// Fill a box whose top edge is at the cursor; the cursor does not move
    ///
    /// Used behind a highlighted line written right after it.
    pub fn fill_box(&mut self, x: f32, width: f32, height: f32, color: Color) -> &mut Self {
        self.ensure_space(height);
        let left = self.margin + x;
        let bottom = self.cursor - height;
        let Color(r, g, b) = color;
        self.push(&format!(
            "q {r:.3} {g:.3} {b:.3} rg {left:.2} {bottom:.2} {width:.2} {height:.2} re f Q\n"
        ));
        self
    }

    fn draw_text(&mut self, x: f32, y: f32, s: &str) {
        let Color(r, g, b) = self.color;
        let mut op = format!(
            "BT {r:.3} {g:.3} {b:.3} rg /{} {:.1} Tf {x:.2} {y:.2} Td (",
            self.font.resource(),
            self.size
        )
        .into_bytes();
        op.extend_from_slice(&escape_pdf_string(&encode_winansi(s)));
        op.extend_from_slice(b") Tj ET\n");
        self.current.extend_from_slice(&op);
    }

    fn push(&mut self, op: &str) {
        self.current.extend_from_slice(op.as_bytes());
    }

    // === Output ===

    /// Serialize the document to PDF bytes
    pub fn build(mut self) -> InvoiceResult<Vec<u8>> {
        let last = std::mem::take(&mut self.current);
        self.pages.push(last);

        let mut out: Vec<u8> = Vec::with_capacity(8192);
        let mut offsets: Vec<usize> = Vec::new();

        out.write_all(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n")?;

        let kids = (0..self.pages.len())
            .map(|i| format!("{} 0 R", OBJ_FIRST_PAGE + i * 2))
            .collect::<Vec<_>>()
            .join(" ");

        write_object(
            &mut out,
            &mut offsets,
            OBJ_CATALOG,
            format!("<< /Type /Catalog /Pages {OBJ_PAGES} 0 R >>").as_bytes(),
        )?;
        write_object(
            &mut out,
            &mut offsets,
            OBJ_PAGES,
            format!(
                "<< /Type /Pages /Kids [{kids}] /Count {} >>",
                self.pages.len()
            )
            .as_bytes(),
        )?;
        write_object(
            &mut out,
            &mut offsets,
            OBJ_FONT_REGULAR,
            b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>",
        )?;
        write_object(
            &mut out,
            &mut offsets,
            OBJ_FONT_BOLD,
            b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>",
        )?;

        let mut info = b"<< /Producer (dine-invoice)".to_vec();
        if let Some(title) = &self.title {
            info.extend_from_slice(b" /Title (");
            info.extend_from_slice(&escape_pdf_string(&encode_winansi(title)));
            info.push(b')');
        }
        info.extend_from_slice(b" >>");
        write_object(&mut out, &mut offsets, OBJ_INFO, &info)?;

        for (i, content) in self.pages.iter().enumerate() {
            let page_id = OBJ_FIRST_PAGE + i * 2;
            let content_id = page_id + 1;
            write_object(
                &mut out,
                &mut offsets,
                page_id,
                format!(
                    "<< /Type /Page /Parent {OBJ_PAGES} 0 R /MediaBox [0 0 {:.2} {:.2}] \
                     /Resources << /Font << /F1 {OBJ_FONT_REGULAR} 0 R /F2 {OBJ_FONT_BOLD} 0 R >> >> \
                     /Contents {content_id} 0 R >>",
                    self.width, self.height
                )
                .as_bytes(),
            )?;

            offsets.push(out.len());
            write!(out, "{content_id} 0 obj\n<< /Length {} >>\nstream\n", content.len())?;
            out.write_all(content)?;
            out.write_all(b"\nendstream\nendobj\n")?;
        }

        let xref_at = out.len();
        write!(out, "xref\n0 {}\n", offsets.len() + 1)?;
        out.write_all(b"0000000000 65535 f \n")?;
        for offset in &offsets {
            write!(out, "{offset:010} 00000 n \n")?;
        }
        write!(
            out,
            "trailer\n<< /Size {} /Root {OBJ_CATALOG} 0 R /Info {OBJ_INFO} 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
            offsets.len() + 1
        )?;

        tracing::debug!(pages = self.pages.len(), bytes = out.len(), "PDF document built");
        Ok(out)
    }
}

/// Write `id 0 obj <body> endobj` and record its byte offset
fn write_object(
    out: &mut Vec<u8>,
    offsets: &mut Vec<usize>,
    id: usize,
    body: &[u8],
) -> InvoiceResult<()> {
    debug_assert_eq!(offsets.len() + 1, id, "objects must be written in order");
    offsets.push(out.len());
    writeln!(out, "{id} 0 obj")?;
    out.write_all(body)?;
    out.write_all(b"\nendobj\n")?;
    Ok(())
}
