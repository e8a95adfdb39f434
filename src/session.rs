//! The document session: the object a report template holds while it
//! emits blocks in document order.
//!
//! Every block method follows the same four-step protocol: compute the
//! required height, check it against the page boundary through
//! [`Cursor::ensure_space`], draw through the backend, then advance the
//! cursor by the content height plus the block's spacing contract. The
//! session owns the cursor; callers never track positions themselves.

use crate::backend::RenderBackend;
use crate::colour::colours;
use crate::cursor::Cursor;
use crate::error::DocError;
use crate::geometry::PageGeometry;
use crate::style::{
    placeholder_style, spacing, text_style, timestamp_style, BlockKind, Spacing, TableStyle,
    TextStyle, BULLET_PREFIX, PLACEHOLDER_TEXT, RULE_OFFSET, RULE_THICKNESS,
};
use crate::units::Pt;
use chrono::Local;
use std::io::Write;

/// Content for a [`Session::conditional_section`]: either flowing text
/// or a bulleted list. Blank content of either shape renders nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionContent {
    Text(String),
    List(Vec<String>),
}

impl From<&str> for SectionContent {
    fn from(text: &str) -> Self {
        SectionContent::Text(text.to_string())
    }
}

impl From<String> for SectionContent {
    fn from(text: String) -> Self {
        SectionContent::Text(text)
    }
}

impl From<Option<String>> for SectionContent {
    fn from(text: Option<String>) -> Self {
        SectionContent::Text(text.unwrap_or_default())
    }
}

impl From<Vec<String>> for SectionContent {
    fn from(items: Vec<String>) -> Self {
        SectionContent::List(items)
    }
}

impl From<Vec<&str>> for SectionContent {
    fn from(items: Vec<&str>) -> Self {
        SectionContent::List(items.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for SectionContent {
    fn from(items: &[&str]) -> Self {
        SectionContent::List(items.iter().map(|i| i.to_string()).collect())
    }
}

/// Spacing for the subtitle drawn directly beneath the document title
const SUBTITLE_GAPS: Spacing = Spacing {
    top_gap: Pt(2.0),
    bottom_gap: Pt(2.0),
};

/// Spacing for the generated-timestamp line that closes the header block
const TIMESTAMP_GAPS: Spacing = Spacing {
    top_gap: Pt(2.0),
    bottom_gap: Pt(12.0),
};

/// A single in-progress document render. Opened once per export, used
/// from one thread, and finalized exactly once with [`Session::emit`].
/// Blocks render strictly in call order and the emitted page sequence
/// reflects that order.
pub struct Session<B: RenderBackend> {
    backend: B,
    geometry: PageGeometry,
    cursor: Cursor,
}

impl<B: RenderBackend> Session<B> {
    /// Open a session and draw the document header: the tier-1 title, an
    /// optional tier-2 subtitle, and a generated-timestamp line.
    pub fn open(
        mut backend: B,
        geometry: PageGeometry,
        title: &str,
        subtitle: Option<&str>,
    ) -> Session<B> {
        backend.begin(&geometry);
        let mut session = Session {
            backend,
            geometry,
            cursor: Cursor::new(&geometry),
        };

        session.heading(
            text_style(BlockKind::DocTitle),
            spacing(BlockKind::DocTitle),
            title,
            false,
        );
        if let Some(subtitle) = subtitle {
            session.heading(
                text_style(BlockKind::SectionTitle),
                SUBTITLE_GAPS,
                subtitle,
                false,
            );
        }
        let stamp = Local::now().format("Generated %Y-%m-%d %H:%M").to_string();
        session.flow_lines(&stamp, &timestamp_style(), TIMESTAMP_GAPS);

        session
    }

    /// A tier-2 heading with its accent rule. The title and rule form a
    /// single required-height unit, so a page break can never separate
    /// them.
    pub fn section_title(&mut self, text: &str) {
        self.heading(
            text_style(BlockKind::SectionTitle),
            spacing(BlockKind::SectionTitle),
            text,
            true,
        );
    }

    /// A tier-3 heading
    pub fn subsection_title(&mut self, text: &str) {
        self.heading(
            text_style(BlockKind::SubsectionTitle),
            spacing(BlockKind::SubsectionTitle),
            text,
            false,
        );
    }

    /// A tier-4 heading
    pub fn minor_title(&mut self, text: &str) {
        self.heading(
            text_style(BlockKind::MinorTitle),
            spacing(BlockKind::MinorTitle),
            text,
            false,
        );
    }

    /// Flowing body text. Blank or whitespace-only input renders the
    /// fixed `"N/A"` placeholder in italic muted style, so every field
    /// is visibly accounted for. Long paragraphs may
    /// split across page boundaries at any line.
    pub fn paragraph(&mut self, text: &str) {
        if text.trim().is_empty() {
            self.flow_lines(
                PLACEHOLDER_TEXT,
                &placeholder_style(),
                spacing(BlockKind::Paragraph),
            );
        } else {
            self.flow_lines(
                text,
                &text_style(BlockKind::Paragraph),
                spacing(BlockKind::Paragraph),
            );
        }
    }

    /// A bulleted list. Blank entries are filtered out; the remaining
    /// items are bullet-prefixed, joined with newlines, and delegated to
    /// the paragraph path, so lists paginate exactly like paragraphs.
    pub fn list<I, S>(&mut self, items: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = items
            .into_iter()
            .filter(|item| !item.as_ref().trim().is_empty())
            .map(|item| format!("{BULLET_PREFIX}{}", item.as_ref().trim()))
            .collect::<Vec<_>>()
            .join("\n");
        self.paragraph(&joined);
    }

    /// An optional report field: when the content is blank (empty text
    /// or a list of blank entries) nothing at all is emitted: no heading,
    /// no placeholder. Otherwise a tier-4 heading followed by the
    /// content.
    pub fn conditional_section<C: Into<SectionContent>>(&mut self, label: &str, content: C) {
        match content.into() {
            SectionContent::Text(text) => {
                if text.trim().is_empty() {
                    return;
                }
                self.minor_title(label);
                self.paragraph(&text);
            }
            SectionContent::List(items) => {
                if items.iter().all(|item| item.trim().is_empty()) {
                    return;
                }
                self.minor_title(label);
                self.list(items);
            }
        }
    }

    /// A table with a header row and body rows. Rows are normalized to
    /// the header's column count. The session reserves room for the
    /// header plus one row, then hands off to the backend's table flow,
    /// which repeats the header on every continuation page; cursor
    /// tracking resumes from the backend-reported final position.
    pub fn table<S: AsRef<str>>(&mut self, header: &[S], rows: &[Vec<String>]) {
        if header.is_empty() {
            return;
        }
        let header: Vec<String> = header.iter().map(|h| h.as_ref().to_string()).collect();
        let rows = normalize_rows(header.len(), rows);
        let style = TableStyle::default();
        let gaps = spacing(BlockKind::Table);

        // minimum before hand-off: header plus one single-line row
        let width = self.geometry.content_width();
        let header_line = self.backend.measure("Mg", width, &style.header).line_height;
        let cell_line = self.backend.measure("Mg", width, &style.cell).line_height;
        let minimum = gaps.top_gap + header_line + cell_line + style.cell_padding * 4.0;
        self.cursor
            .ensure_space(&self.geometry, minimum, &mut self.backend);
        self.cursor.advance(gaps.top_gap);

        let flow = self
            .backend
            .draw_table(&header, &rows, &self.geometry, self.cursor.y, &style);
        self.cursor.y = flow.final_y;
        self.cursor.page_index += flow.pages_added;

        self.cursor.advance(gaps.bottom_gap);
        self.cursor.clamp(&self.geometry);
    }

    /// Finalize the document, writing it to `w`. No further layout
    /// happens here.
    pub fn emit<W: Write>(mut self, mut w: W) -> Result<(), DocError> {
        self.backend.write(&mut w)
    }

    /// The current cursor position, mostly useful to callers that want
    /// to report progress or assert layout in tests
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Draw a title block: all wrapped lines (and the accent rule, when
    /// present) form one atomic required-height unit, so a heading is
    /// never stranded at the very bottom of a page.
    fn heading(&mut self, style: TextStyle, gaps: Spacing, text: &str, with_rule: bool) {
        if text.trim().is_empty() {
            return;
        }
        let wrapped = self
            .backend
            .measure(text, self.geometry.content_width(), &style);

        let mut required = gaps.top_gap + wrapped.height();
        if with_rule {
            required += RULE_OFFSET + RULE_THICKNESS;
        }
        self.cursor
            .ensure_space(&self.geometry, required, &mut self.backend);

        self.cursor.advance(gaps.top_gap);
        for line in &wrapped.lines {
            self.backend
                .draw_text(line, self.geometry.content_left(), self.cursor.y, &style);
            self.cursor.advance(wrapped.line_height);
        }

        if with_rule {
            self.cursor.advance(RULE_OFFSET);
            let y = self.cursor.y;
            self.backend.draw_line(
                (self.geometry.content_left(), y),
                (self.geometry.content_right(), y),
                colours::ACCENT,
                RULE_THICKNESS,
            );
            self.cursor.advance(RULE_THICKNESS);
        }

        self.cursor.advance(gaps.bottom_gap);
        self.cursor.clamp(&self.geometry);
    }

    /// Draw flowing text line by line with a per-line page-break check,
    /// so the block may legitimately split across pages. The first line
    /// carries the top gap in its required height, keeping the gap and
    /// the line on the same page.
    fn flow_lines(&mut self, text: &str, style: &TextStyle, gaps: Spacing) {
        let wrapped = self
            .backend
            .measure(text, self.geometry.content_width(), style);

        let mut first = true;
        for line in &wrapped.lines {
            let required = if first {
                gaps.top_gap + wrapped.line_height
            } else {
                wrapped.line_height
            };
            self.cursor
                .ensure_space(&self.geometry, required, &mut self.backend);
            if first {
                self.cursor.advance(gaps.top_gap);
                first = false;
            }
            self.backend
                .draw_text(line, self.geometry.content_left(), self.cursor.y, style);
            self.cursor.advance(wrapped.line_height);
        }

        self.cursor.advance(gaps.bottom_gap);
        self.cursor.clamp(&self.geometry);
    }
}

/// Shape body rows to the header's column count: extra cells are
/// dropped, missing cells become empty strings
fn normalize_rows(columns: usize, rows: &[Vec<String>]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| {
            let mut row: Vec<String> = row.iter().take(columns).cloned().collect();
            while row.len() < columns {
                row.push(String::new());
            }
            row
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{TableFlow, WrappedText};
    use crate::colour::Colour;

    /// Deterministic metrics: every character is `size / 2` wide and
    /// every line box is `1.35 × size` tall, so a 10pt paragraph line is
    /// exactly 13.5pt, the height the layout scenarios are written
    /// against.
    const LINE_FACTOR: f32 = 1.35;
    const CHAR_FACTOR: f32 = 0.5;
    const TABLE_HEADER_HEIGHT: f32 = 14.0;
    const TABLE_ROW_HEIGHT: f32 = 12.0;

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Text {
            page: usize,
            y: f32,
            size: f32,
            text: String,
        },
        Line {
            page: usize,
            y: f32,
        },
        TableHeader {
            page: usize,
            y: f32,
        },
        TableRow {
            page: usize,
            y: f32,
        },
        PageBreak,
    }

    struct Recording {
        page: usize,
        ops: Vec<Op>,
    }

    impl Recording {
        fn new() -> Recording {
            Recording {
                page: 0,
                ops: Vec::new(),
            }
        }

        fn texts(&self) -> Vec<&Op> {
            self.ops
                .iter()
                .filter(|op| matches!(op, Op::Text { .. }))
                .collect()
        }
    }

    impl RenderBackend for Recording {
        fn begin(&mut self, _geometry: &PageGeometry) {}

        fn measure(&self, text: &str, max_width: Pt, style: &TextStyle) -> WrappedText {
            let per_char = style.size.0 * CHAR_FACTOR;
            let max_chars = ((max_width.0 / per_char).floor() as usize).max(1);
            let mut lines = Vec::new();
            for raw in text.split('\n') {
                if raw.is_empty() {
                    lines.push(String::new());
                    continue;
                }
                let chars: Vec<char> = raw.chars().collect();
                for chunk in chars.chunks(max_chars) {
                    lines.push(chunk.iter().collect());
                }
            }
            if lines.is_empty() {
                lines.push(String::new());
            }
            WrappedText {
                lines,
                line_height: Pt(style.size.0 * LINE_FACTOR),
            }
        }

        fn draw_text(&mut self, text: &str, _x: Pt, y: Pt, style: &TextStyle) {
            self.ops.push(Op::Text {
                page: self.page,
                y: y.0,
                size: style.size.0,
                text: text.to_string(),
            });
        }

        fn draw_line(&mut self, from: (Pt, Pt), _to: (Pt, Pt), _colour: Colour, _thickness: Pt) {
            self.ops.push(Op::Line {
                page: self.page,
                y: from.1 .0,
            });
        }

        fn new_page(&mut self) {
            self.page += 1;
            self.ops.push(Op::PageBreak);
        }

        fn draw_table(
            &mut self,
            _header: &[String],
            rows: &[Vec<String>],
            geometry: &PageGeometry,
            y: Pt,
            _style: &TableStyle,
        ) -> TableFlow {
            let bottom = geometry.bottom_boundary().0;
            let margin = geometry.margin.0;
            let mut y = y.0;
            let mut pages_added = 0;

            self.ops.push(Op::TableHeader { page: self.page, y });
            y += TABLE_HEADER_HEIGHT;

            for _row in rows {
                if y > margin && y + TABLE_ROW_HEIGHT > bottom {
                    self.page += 1;
                    pages_added += 1;
                    self.ops.push(Op::PageBreak);
                    y = margin;
                    self.ops.push(Op::TableHeader { page: self.page, y });
                    y += TABLE_HEADER_HEIGHT;
                }
                self.ops.push(Op::TableRow { page: self.page, y });
                y += TABLE_ROW_HEIGHT;
            }

            TableFlow {
                final_y: Pt(y),
                pages_added,
            }
        }

        fn write(&mut self, _w: &mut dyn std::io::Write) -> Result<(), DocError> {
            Ok(())
        }
    }

    fn geometry() -> PageGeometry {
        PageGeometry::new((Pt(600.0), Pt(800.0)), Pt(40.0)).unwrap()
    }

    fn open_session() -> Session<Recording> {
        Session::open(
            Recording::new(),
            geometry(),
            "Community Garden Expansion",
            Some("Grant application"),
        )
    }

    fn assert_cursor_in_bounds(session: &Session<Recording>) {
        let geom = session.geometry();
        let cursor = session.cursor();
        assert!(
            cursor.y >= geom.margin && cursor.y <= geom.bottom_boundary(),
            "cursor y {} escaped [{}, {}]",
            cursor.y,
            geom.margin,
            geom.bottom_boundary()
        );
    }

    #[test]
    fn open_draws_title_subtitle_and_timestamp() {
        let session = open_session();
        let texts = session.backend().texts();
        assert_eq!(texts.len(), 3);
        assert!(matches!(
            texts[0],
            Op::Text { page: 0, size, text, .. } if *size == 22.0 && text.starts_with("Community")
        ));
        assert!(matches!(texts[2], Op::Text { size, text, .. }
            if *size == 8.0 && text.starts_with("Generated ")));
        assert_eq!(session.cursor().page_index, 0);
    }

    #[test]
    fn pagination_is_monotonic_across_a_mixed_document() {
        let mut session = open_session();
        let mut last_page = 0;
        let long = "The proposed expansion doubles the number of raised beds and adds an \
                    accessible irrigation loop along the northern fence line. "
            .repeat(12);

        for _ in 0..4 {
            session.section_title("Budget Overview");
            assert_cursor_in_bounds(&session);
            assert!(session.cursor().page_index >= last_page);
            last_page = session.cursor().page_index;

            session.paragraph(&long);
            assert_cursor_in_bounds(&session);
            assert!(session.cursor().page_index >= last_page);
            last_page = session.cursor().page_index;

            session.subsection_title("Materials");
            session.list(["soil", "lumber", "drip line"]);
            assert_cursor_in_bounds(&session);

            session.conditional_section("Notes", "");
            assert_cursor_in_bounds(&session);

            let rows: Vec<Vec<String>> = (0..8)
                .map(|i| vec![format!("item {i}"), "2".into(), "40.00".into()])
                .collect();
            session.table(&["Item", "Qty", "Cost"], &rows);
            assert_cursor_in_bounds(&session);
            assert!(session.cursor().page_index >= last_page);
            last_page = session.cursor().page_index;
        }
        assert!(last_page > 0, "the mixed document should span pages");
    }

    #[test]
    fn section_title_and_rule_never_split_across_pages() {
        let mut session = open_session();
        // park the cursor where the title would fit but title+rule would not
        session.cursor.y = Pt(745.0);
        session.section_title("Budget Overview");

        let title = session
            .backend()
            .ops
            .iter()
            .rev()
            .find_map(|op| match op {
                Op::Text { page, size, .. } if *size == 16.0 => Some(*page),
                _ => None,
            })
            .expect("section title drawn");
        let rule = session
            .backend()
            .ops
            .iter()
            .rev()
            .find_map(|op| match op {
                Op::Line { page, .. } => Some(*page),
                _ => None,
            })
            .expect("accent rule drawn");
        assert_eq!(title, rule, "title and rule must co-locate");
        assert_eq!(title, 1, "the whole unit moved to the next page");
    }

    #[test]
    fn blank_paragraphs_render_identical_placeholder_blocks() {
        let mut session = open_session();
        session.paragraph("");
        session.paragraph("   ");
        session.paragraph("");

        let placeholders: Vec<f32> = session
            .backend()
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::Text { y, text, .. } if text == PLACEHOLDER_TEXT => Some(*y),
                _ => None,
            })
            .collect();
        assert_eq!(placeholders.len(), 3);
        let delta_a = placeholders[1] - placeholders[0];
        let delta_b = placeholders[2] - placeholders[1];
        assert!(
            (delta_a - delta_b).abs() < 1e-4,
            "placeholder blocks must not shrink or grow: {delta_a} vs {delta_b}"
        );
    }

    #[test]
    fn list_paginates_exactly_like_the_equivalent_paragraph() {
        let items: Vec<String> = (0..60).map(|i| format!("inventory item number {i}")).collect();
        let joined = items
            .iter()
            .map(|item| format!("{BULLET_PREFIX}{item}"))
            .collect::<Vec<_>>()
            .join("\n");

        let mut list_session = open_session();
        let skip_a = list_session.backend().ops.len();
        list_session.list(&items);

        let mut para_session = open_session();
        let skip_b = para_session.backend().ops.len();
        para_session.paragraph(&joined);

        let list_ops = &list_session.backend().ops[skip_a..];
        let para_ops = &para_session.backend().ops[skip_b..];
        assert_eq!(list_ops, para_ops);
        assert!(
            list_session.cursor().page_index > 0,
            "the list should be long enough to break at least once"
        );
    }

    #[test]
    fn blank_conditional_section_advances_the_cursor_by_exactly_zero() {
        let mut session = open_session();
        let before = session.cursor();
        let ops_before = session.backend().ops.len();

        session.conditional_section("Notes", "");
        session.conditional_section("Risks", vec!["", "   "]);
        session.conditional_section("Budget Notes", None::<String>);

        assert_eq!(session.cursor(), before);
        assert_eq!(session.backend().ops.len(), ops_before);
    }

    #[test]
    fn populated_conditional_section_emits_heading_and_content() {
        let mut session = open_session();
        let ops_before = session.backend().ops.len();
        session.conditional_section("Notes", "Deliveries only on weekdays.");
        let new_texts: Vec<&Op> = session.backend().ops[ops_before..]
            .iter()
            .filter(|op| matches!(op, Op::Text { .. }))
            .collect();
        assert_eq!(new_texts.len(), 2, "heading plus one paragraph line");
        assert!(matches!(new_texts[0], Op::Text { text, .. } if text == "Notes"));
    }

    #[test]
    fn header_only_session_emits_a_single_page() {
        let mut session = open_session();
        session.conditional_section("Notes", "");
        assert_eq!(session.cursor().page_index, 0);
        let mut out = Vec::new();
        session.emit(&mut out).unwrap();
    }

    #[test]
    fn long_paragraph_splits_once_at_the_bottom_boundary() {
        // usable height 720 (800 page, 40 margin, boundary at 760); a
        // 15-line paragraph at 13.5pt per line starting at y=650 must
        // break exactly once, after the line that would exceed 760
        let mut session = open_session();
        session.cursor.y = Pt(650.0);
        let text = vec!["w"; 15].join("\n");
        session.paragraph(&text);

        let lines: Vec<(usize, f32)> = session
            .backend()
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::Text { page, y, text, .. } if text == "w" => Some((*page, *y)),
                _ => None,
            })
            .collect();
        assert_eq!(lines.len(), 15);

        let first_page: Vec<&(usize, f32)> = lines.iter().filter(|(p, _)| *p == 0).collect();
        let second_page: Vec<&(usize, f32)> = lines.iter().filter(|(p, _)| *p == 1).collect();
        assert_eq!(first_page.len(), 8);
        assert_eq!(second_page.len(), 7);
        assert!((first_page[0].1 - 650.0).abs() < 1e-3);
        assert!((first_page[7].1 - 744.5).abs() < 1e-3, "last line that fits");
        assert!((second_page[0].1 - 40.0).abs() < 1e-3, "resumes at the margin");
        assert_eq!(session.cursor().page_index, 1);
    }

    #[test]
    fn table_repeats_its_header_on_every_continuation_page() {
        let mut session = open_session();
        session.cursor.y = Pt(700.0);
        let rows: Vec<Vec<String>> = (0..50)
            .map(|i| vec![format!("row {i}"), "1".into(), "10.00".into()])
            .collect();
        session.table(&["Item", "Qty", "Cost"], &rows);

        let headers: Vec<(usize, f32)> = session
            .backend()
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::TableHeader { page, y } => Some((*page, *y)),
                _ => None,
            })
            .collect();
        let row_pages: std::collections::BTreeSet<usize> = session
            .backend()
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::TableRow { page, .. } => Some(*page),
                _ => None,
            })
            .collect();

        assert!(row_pages.len() > 1, "the table should span pages");
        assert_eq!(
            headers.len(),
            row_pages.len(),
            "one header per page the table touches"
        );
        for (page, y) in headers.iter().skip(1) {
            assert!(row_pages.contains(page));
            assert!(
                (*y - 40.0).abs() < 1e-3,
                "continuation headers start at the top margin"
            );
        }
        assert_eq!(session.cursor().page_index, *row_pages.iter().max().unwrap());
    }

    #[test]
    fn rows_are_normalized_to_the_header_width() {
        let rows = vec![
            vec!["a".to_string()],
            vec!["a".to_string(), "b".to_string(), "c".to_string(), "d".to_string()],
        ];
        let normalized = normalize_rows(3, &rows);
        assert_eq!(normalized[0], vec!["a", "", ""]);
        assert_eq!(normalized[1], vec!["a", "b", "c"]);
    }

    #[test]
    fn empty_list_still_renders_the_placeholder() {
        let mut session = open_session();
        session.list(Vec::<String>::new());
        let last = session.backend().texts().last().cloned().cloned().unwrap();
        assert!(matches!(last, Op::Text { text, .. } if text == PLACEHOLDER_TEXT));
    }
}
