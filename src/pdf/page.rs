//! The backend's per-page content model: positioned text spans and
//! stroked rules, rendered into a PDF content stream at write time.

use crate::colour::Colour;
use crate::font::Font;
use crate::pdf::refs::{ObjectReferences, RefType};
use crate::units::Pt;
use id_arena::{Arena, Id};
use pdf_writer::{Finish, Name, Pdf};
use std::io::Write;

/// The font face and size a span renders with
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct SpanFont {
    pub id: Id<Font>,
    pub size: Pt,
}

/// A single positioned run of text. Coordinates are PDF-space (bottom-up)
/// baseline coordinates; the backend converts from the engine's top-down
/// offsets before constructing spans.
#[derive(Clone, PartialEq, Debug)]
pub struct SpanLayout {
    pub text: String,
    pub font: SpanFont,
    pub colour: Colour,
    pub coords: (Pt, Pt),
}

/// A stroked straight line in PDF-space coordinates
#[derive(Clone, PartialEq, Debug)]
pub struct RuleLayout {
    pub from: (Pt, Pt),
    pub to: (Pt, Pt),
    pub colour: Colour,
    pub thickness: Pt,
}

#[derive(Clone, PartialEq, Debug)]
pub enum PageContents {
    Text(SpanLayout),
    Rule(RuleLayout),
}

/// One page of laid-out content
#[derive(Default)]
pub struct Page {
    pub contents: Vec<PageContents>,
}

impl Page {
    pub fn new() -> Page {
        Page::default()
    }

    pub fn add_span(&mut self, span: SpanLayout) {
        self.contents.push(PageContents::Text(span));
    }

    pub fn add_rule(&mut self, rule: RuleLayout) {
        self.contents.push(PageContents::Rule(rule));
    }

    /// Convert the page contents into low-level PDF operators, tracking
    /// the current font and fill colour so consecutive spans in the same
    /// style don't repeat state changes
    #[allow(clippy::write_with_newline)]
    fn render(&self, fonts: &Arena<Font>) -> Result<Vec<u8>, std::io::Error> {
        let mut content: Vec<u8> = Vec::new();
        if self.contents.is_empty() {
            return Ok(content);
        }

        let mut current_font: Option<SpanFont> = None;
        let mut current_colour: Option<Colour> = None;

        write!(&mut content, "q\n")?;
        for item in self.contents.iter() {
            match item {
                PageContents::Text(span) => {
                    if current_font != Some(span.font) {
                        current_font = Some(span.font);
                        write!(
                            &mut content,
                            "/F{} {} Tf\n",
                            span.font.id.index(),
                            span.font.size
                        )?;
                    }
                    if current_colour != Some(span.colour) {
                        current_colour = Some(span.colour);
                        write_fill_colour(&mut content, span.colour)?;
                    }

                    write!(&mut content, "BT\n")?;
                    write!(&mut content, "{} {} Td\n", span.coords.0, span.coords.1)?;
                    write!(&mut content, "<")?;
                    for ch in span.text.chars() {
                        write!(&mut content, "{:04x}", fonts[span.font.id].encode_glyph(ch))?;
                    }
                    write!(&mut content, "> Tj\n")?;
                    write!(&mut content, "ET\n")?;
                }
                PageContents::Rule(rule) => {
                    write!(&mut content, "q\n")?;
                    write_stroke_colour(&mut content, rule.colour)?;
                    write!(&mut content, "{} w\n", rule.thickness)?;
                    write!(&mut content, "{} {} m\n", rule.from.0, rule.from.1)?;
                    write!(&mut content, "{} {} l\n", rule.to.0, rule.to.1)?;
                    write!(&mut content, "S\n")?;
                    write!(&mut content, "Q\n")?;
                }
            }
        }
        write!(&mut content, "Q\n")?;

        Ok(content)
    }

    pub(crate) fn write(
        &self,
        refs: &mut ObjectReferences,
        page_index: usize,
        media_box: pdf_writer::Rect,
        fonts: &Arena<Font>,
        writer: &mut Pdf,
    ) -> Result<(), std::io::Error> {
        let id = refs.get(RefType::Page(page_index)).expect("page ref exists");
        let mut page = writer.page(id);
        page.media_box(media_box);
        page.parent(refs.get(RefType::PageTree).expect("page tree ref exists"));

        let mut resources = page.resources();
        let mut resource_fonts = resources.fonts();
        for (font_id, _) in fonts.iter() {
            resource_fonts.pair(
                Name(format!("F{}", font_id.index()).as_bytes()),
                refs.get(RefType::Font(font_id.index()))
                    .expect("font ref exists"),
            );
        }
        resource_fonts.finish();
        resources.finish();

        let content_id = refs.gen(RefType::ContentForPage(page_index));
        page.contents(content_id);
        page.finish();

        let rendered = self.render(fonts)?;
        writer.stream(content_id, rendered.as_slice());

        Ok(())
    }
}

#[allow(clippy::write_with_newline)]
fn write_fill_colour(content: &mut Vec<u8>, colour: Colour) -> Result<(), std::io::Error> {
    match colour {
        Colour::RGB { r, g, b } => write!(content, "{r} {g} {b} rg\n"),
        Colour::CMYK { c, m, y, k } => write!(content, "{c} {m} {y} {k} k\n"),
        Colour::Grey { g } => write!(content, "{g} g\n"),
    }
}

#[allow(clippy::write_with_newline)]
fn write_stroke_colour(content: &mut Vec<u8>, colour: Colour) -> Result<(), std::io::Error> {
    match colour {
        Colour::RGB { r, g, b } => write!(content, "{r} {g} {b} RG\n"),
        Colour::CMYK { c, m, y, k } => write!(content, "{c} {m} {y} {k} K\n"),
        Colour::Grey { g } => write!(content, "{g} G\n"),
    }
}
