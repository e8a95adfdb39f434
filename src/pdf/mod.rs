//! The PDF rendering backend: measures text against embedded TTF/OTF
//! faces and assembles the finished document with [pdf_writer].
//!
//! The layout engine hands this backend top-down vertical offsets; all
//! conversion into PDF's bottom-up coordinate space happens here.

pub(crate) mod page;
pub(crate) mod refs;

use crate::backend::{RenderBackend, TableFlow, WrappedText};
use crate::colour::Colour;
use crate::error::DocError;
use crate::font::Font;
use crate::geometry::PageGeometry;
use crate::info::Info;
use crate::style::{FontClass, TableStyle, TextStyle};
use crate::units::Pt;
use id_arena::{Arena, Id};
use pdf_writer::{Finish, Pdf};
use page::{Page, RuleLayout, SpanFont, SpanLayout};
use refs::{ObjectReferences, RefType};
use std::io::Write;

/// A [RenderBackend] that renders into a PDF document.
///
/// Construction requires a regular font face; bold and italic faces are
/// optional and fall back to the regular face when absent.
pub struct PdfBackend {
    fonts: Arena<Font>,
    regular: Id<Font>,
    bold: Option<Id<Font>>,
    italic: Option<Id<Font>>,
    geometry: PageGeometry,
    pages: Vec<Page>,
    info: Option<Info>,
}

impl PdfBackend {
    /// Create a backend around the given regular font face, failing if
    /// the face cannot be parsed
    pub fn new(regular: Vec<u8>) -> Result<PdfBackend, DocError> {
        let mut fonts = Arena::new();
        let regular = fonts.alloc(Font::load(regular)?);
        Ok(PdfBackend {
            fonts,
            regular,
            bold: None,
            italic: None,
            geometry: PageGeometry::letter(),
            pages: Vec::new(),
            info: None,
        })
    }

    /// Attach a bold face, used by heading and table-header styles
    pub fn with_bold(mut self, bytes: Vec<u8>) -> Result<PdfBackend, DocError> {
        self.bold = Some(self.fonts.alloc(Font::load(bytes)?));
        Ok(self)
    }

    /// Attach an italic face, used by the blank-content placeholder
    pub fn with_italic(mut self, bytes: Vec<u8>) -> Result<PdfBackend, DocError> {
        self.italic = Some(self.fonts.alloc(Font::load(bytes)?));
        Ok(self)
    }

    /// Attach document metadata, written into the PDF info dictionary
    pub fn with_info(mut self, info: Info) -> PdfBackend {
        self.info = Some(info);
        self
    }

    fn font_for(&self, class: FontClass) -> Id<Font> {
        match class {
            FontClass::Regular => self.regular,
            FontClass::Bold => self.bold.unwrap_or(self.regular),
            FontClass::Italic => self.italic.unwrap_or(self.regular),
        }
    }

    fn current_page(&mut self) -> &mut Page {
        if self.pages.is_empty() {
            self.pages.push(Page::new());
        }
        self.pages.last_mut().expect("at least one page")
    }

    fn grid_rule(&mut self, y: Pt, style: &TableStyle, geometry: &PageGeometry) {
        self.draw_line(
            (geometry.content_left(), y),
            (geometry.content_right(), y),
            style.grid,
            style.grid_thickness,
        );
    }

    /// Height of one table row: the tallest wrapped cell plus padding
    fn row_height(&self, cells: &[String], inner_width: Pt, style: &TextStyle, padding: Pt) -> Pt {
        let mut tallest = Pt(0.0);
        for cell in cells {
            let wrapped = self.measure(cell, inner_width, style);
            tallest = tallest.max(wrapped.height().max(wrapped.line_height));
        }
        tallest + padding * 2.0
    }

    fn draw_row(
        &mut self,
        cells: &[String],
        y: Pt,
        col_width: Pt,
        style: &TextStyle,
        padding: Pt,
        geometry: &PageGeometry,
    ) {
        let inner_width = col_width - padding * 2.0;
        for (col, cell) in cells.iter().enumerate() {
            let x = geometry.content_left() + col_width * col as f32 + padding;
            let wrapped = self.measure(cell, inner_width, style);
            for (line_no, line) in wrapped.lines.iter().enumerate() {
                self.draw_text(line, x, y + padding + wrapped.line_height * line_no as f32, style);
            }
        }
    }
}

impl RenderBackend for PdfBackend {
    fn begin(&mut self, geometry: &PageGeometry) {
        self.geometry = *geometry;
        self.pages.push(Page::new());
    }

    fn measure(&self, text: &str, max_width: Pt, style: &TextStyle) -> WrappedText {
        let font = &self.fonts[self.font_for(style.class)];
        let mut lines: Vec<String> = Vec::new();
        for segment in text.split('\n') {
            wrap_segment(font, segment, style.size, max_width, &mut lines);
        }
        WrappedText {
            lines,
            line_height: font.line_height(style.size),
        }
    }

    fn draw_text(&mut self, text: &str, x: Pt, y: Pt, style: &TextStyle) {
        let id = self.font_for(style.class);
        let ascent = self.fonts[id].ascent(style.size);
        let baseline = self.geometry.height - y - ascent;
        let span = SpanLayout {
            text: text.to_string(),
            font: SpanFont {
                id,
                size: style.size,
            },
            colour: style.colour,
            coords: (x, baseline),
        };
        self.current_page().add_span(span);
    }

    fn draw_line(&mut self, from: (Pt, Pt), to: (Pt, Pt), colour: Colour, thickness: Pt) {
        let height = self.geometry.height;
        let rule = RuleLayout {
            from: (from.0, height - from.1),
            to: (to.0, height - to.1),
            colour,
            thickness,
        };
        self.current_page().add_rule(rule);
    }

    fn new_page(&mut self) {
        self.pages.push(Page::new());
    }

    fn draw_table(
        &mut self,
        header: &[String],
        rows: &[Vec<String>],
        geometry: &PageGeometry,
        y: Pt,
        style: &TableStyle,
    ) -> TableFlow {
        let col_width = geometry.content_width() / header.len() as f32;
        let inner_width = col_width - style.cell_padding * 2.0;
        let header_height =
            self.row_height(header, inner_width, &style.header, style.cell_padding);

        let mut y = y;
        let mut pages_added = 0usize;

        self.grid_rule(y, style, geometry);
        self.draw_row(header, y, col_width, &style.header, style.cell_padding, geometry);
        y += header_height;
        self.grid_rule(y, style, geometry);

        for row in rows {
            let row_height = self.row_height(row, inner_width, &style.cell, style.cell_padding);
            if y > geometry.margin && y + row_height > geometry.bottom_boundary() {
                self.new_page();
                pages_added += 1;
                y = geometry.margin;
                self.grid_rule(y, style, geometry);
                self.draw_row(header, y, col_width, &style.header, style.cell_padding, geometry);
                y += header_height;
                self.grid_rule(y, style, geometry);
            }
            self.draw_row(row, y, col_width, &style.cell, style.cell_padding, geometry);
            y += row_height;
            self.grid_rule(y, style, geometry);
        }

        TableFlow {
            final_y: y,
            pages_added,
        }
    }

    fn write(&mut self, w: &mut dyn Write) -> Result<(), DocError> {
        let pages = std::mem::take(&mut self.pages);

        let mut refs = ObjectReferences::new();
        let catalog_id = refs.gen(RefType::Catalog);
        let page_tree_id = refs.gen(RefType::PageTree);

        let mut writer = Pdf::new();
        if let Some(info) = &self.info {
            info.write(&mut refs, &mut writer);
        }

        let page_refs: Vec<_> = (0..pages.len())
            .map(|i| refs.gen(RefType::Page(i)))
            .collect();
        writer
            .pages(page_tree_id)
            .count(page_refs.len() as i32)
            .kids(page_refs);

        for (id, font) in self.fonts.iter() {
            font.write(&mut refs, id, &mut writer);
        }

        let media_box = pdf_writer::Rect {
            x1: 0.0,
            y1: 0.0,
            x2: self.geometry.width.0,
            y2: self.geometry.height.0,
        };
        for (i, page) in pages.iter().enumerate() {
            page.write(&mut refs, i, media_box, &self.fonts, &mut writer)?;
        }

        let mut catalog = writer.catalog(catalog_id);
        catalog.pages(page_tree_id);
        catalog.finish();

        w.write_all(writer.finish().as_slice()).map_err(Into::into)
    }
}

/// Greedy word wrap of a single newline-free segment. A word wider than
/// the column on its own is broken at the character level.
fn wrap_segment(font: &Font, segment: &str, size: Pt, max_width: Pt, lines: &mut Vec<String>) {
    let mut line = String::new();
    for word in segment.split_whitespace() {
        if font.text_width(word, size) > max_width {
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            let mut piece = String::new();
            for ch in word.chars() {
                piece.push(ch);
                if font.text_width(&piece, size) > max_width && piece.chars().count() > 1 {
                    piece.pop();
                    lines.push(std::mem::take(&mut piece));
                    piece.push(ch);
                }
            }
            line = piece;
            continue;
        }

        let candidate = if line.is_empty() {
            word.to_string()
        } else {
            format!("{line} {word}")
        };
        if font.text_width(&candidate, size) <= max_width {
            line = candidate;
        } else {
            lines.push(std::mem::take(&mut line));
            line = word.to_string();
        }
    }
    lines.push(line);
}
