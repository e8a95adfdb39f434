//! The seam between the layout engine and whatever actually draws.
//!
//! The engine never touches fonts or bytes directly: it asks the backend
//! to measure text and to draw, and tracks the cursor from the results.
//! The crate ships one concrete implementation, [`PdfBackend`](crate::pdf::PdfBackend);
//! tests use a deterministic recording backend.

use crate::colour::Colour;
use crate::error::DocError;
use crate::geometry::PageGeometry;
use crate::style::{TableStyle, TextStyle};
use crate::units::Pt;
use std::io::Write;

/// The result of measuring a run of text against a maximum width: the
/// wrapped lines and the uniform height of each line box.
#[derive(Debug, Clone, PartialEq)]
pub struct WrappedText {
    pub lines: Vec<String>,
    pub line_height: Pt,
}

impl WrappedText {
    /// Total vertical extent of the wrapped text
    pub fn height(&self) -> Pt {
        self.line_height * self.lines.len() as f32
    }
}

/// The cursor position after a table finished flowing, reported by the
/// backend so the engine can resume tracking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableFlow {
    /// Top-down offset just below the last drawn row, on the final page
    pub final_y: Pt,
    /// How many page breaks the table performed internally
    pub pages_added: usize,
}

/// The font-metrics and drawing backend a [`Session`](crate::Session)
/// renders through.
///
/// All vertical coordinates crossing this boundary are top-down offsets
/// from the top page edge, in the range `[0, geometry.height]`; backends
/// with a bottom-up native space (such as PDF) convert internally.
pub trait RenderBackend {
    /// Called exactly once when a session opens. The backend keeps the
    /// geometry for coordinate conversion and creates the first page.
    fn begin(&mut self, geometry: &PageGeometry);

    /// Wrap `text` to fit within `max_width` at the given style,
    /// honouring embedded newlines, and report the line height
    fn measure(&self, text: &str, max_width: Pt, style: &TextStyle) -> WrappedText;

    /// Draw a single pre-wrapped line with its top-left corner at (x, y)
    /// on the current page
    fn draw_text(&mut self, text: &str, x: Pt, y: Pt, style: &TextStyle);

    /// Stroke a straight line between two points on the current page
    fn draw_line(&mut self, from: (Pt, Pt), to: (Pt, Pt), colour: Colour, thickness: Pt);

    /// Append a fresh page; subsequent draws land on it
    fn new_page(&mut self);

    /// Flow a table starting at top-down offset `y` on the current page,
    /// breaking pages internally and repeating the header row at the top
    /// of every continuation page. Rows are pre-normalized to the
    /// header's column count.
    fn draw_table(
        &mut self,
        header: &[String],
        rows: &[Vec<String>],
        geometry: &PageGeometry,
        y: Pt,
        style: &TableStyle,
    ) -> TableFlow;

    /// Perform backend-specific finalization, writing the document to
    /// `w`. No layout happens here; calling this twice is a caller error.
    fn write(&mut self, w: &mut dyn Write) -> Result<(), DocError>;
}
