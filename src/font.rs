//! Parsed font faces: the metrics source for the PDF backend, and the
//! machinery to embed the face into the generated document.
//!
//! Fonts are TTF or OTF and are embedded in their entirety, so large
//! fonts increase the size of the generated PDF accordingly.

use crate::error::DocError;
use crate::pdf::refs::{ObjectReferences, RefType};
use crate::units::Pt;
use id_arena::Id;
use owned_ttf_parser::{AsFaceRef, GlyphId, OwnedFace};
use pdf_writer::{
    types::{CidFontType, FontFlags, SystemInfo},
    Filter, Finish, Name, Pdf, Ref, Str,
};
use std::collections::HashMap;

/// A parsed font face. Within the PDF backend fonts are referred to by
/// their arena [Id], never by name.
pub struct Font {
    pub face: OwnedFace,
}

impl Font {
    /// Load a font from raw bytes, failing if the face cannot be parsed
    pub fn load(bytes: Vec<u8>) -> Result<Font, DocError> {
        let face = OwnedFace::from_vec(bytes, 0)?;
        Ok(Font { face })
    }

    fn scaling(&self, size: Pt) -> f32 {
        size.0 / self.face.as_face_ref().units_per_em() as f32
    }

    /// Distance from the baseline to the top of the font at `size`
    pub fn ascent(&self, size: Pt) -> Pt {
        Pt(self.face.as_face_ref().ascender() as f32 * self.scaling(size))
    }

    /// Distance from the baseline to the bottom of the font at `size`;
    /// usually negative
    pub fn descent(&self, size: Pt) -> Pt {
        Pt(self.face.as_face_ref().descender() as f32 * self.scaling(size))
    }

    /// The default vertical offset between consecutive lines at `size`
    pub fn line_height(&self, size: Pt) -> Pt {
        let face = self.face.as_face_ref();
        let scaling = self.scaling(size);
        let leading = face.line_gap() as f32 * scaling;
        let ascent = face.ascender() as f32 * scaling;
        let descent = face.descender() as f32 * scaling;
        Pt(leading + ascent - descent)
    }

    /// The advance width of `text` at `size`. Characters without a glyph
    /// measure as the replacement glyph, matching how they render.
    pub fn text_width(&self, text: &str, size: Pt) -> Pt {
        let face = self.face.as_face_ref();
        let scaling = self.scaling(size);
        let width: f32 = text
            .chars()
            .map(|ch| {
                let gid = GlyphId(self.encode_glyph(ch));
                face.glyph_hor_advance(gid).unwrap_or_default() as f32 * scaling
            })
            .sum();
        Pt(width)
    }

    pub fn glyph_id(&self, ch: char) -> Option<u16> {
        self.face.as_face_ref().glyph_index(ch).map(|gid| gid.0)
    }

    /// The glyph a character renders as: its own glyph, the replacement
    /// glyph, `?`, or `.notdef` in that order of preference
    pub(crate) fn encode_glyph(&self, ch: char) -> u16 {
        self.glyph_id(ch)
            .or_else(|| self.glyph_id('\u{FFFD}'))
            .or_else(|| self.glyph_id('?'))
            .unwrap_or_default()
    }

    fn full_name(&self) -> String {
        self.face
            .as_face_ref()
            .names()
            .into_iter()
            .find(|name| name.name_id == owned_ttf_parser::name_id::FULL_NAME && name.is_unicode())
            .and_then(|name| name.to_string())
            .unwrap_or_else(|| "Embedded".to_string())
    }

    fn family(&self) -> String {
        self.face
            .as_face_ref()
            .names()
            .into_iter()
            .find(|name| name.name_id == owned_ttf_parser::name_id::FAMILY && name.is_unicode())
            .and_then(|name| name.to_string())
            .unwrap_or_else(|| "Embedded".to_string())
    }

    /// Map of glyph id to the character it renders, from the unicode
    /// cmap subtables
    fn glyph_map(&self) -> HashMap<u16, char> {
        let mut map: HashMap<u16, char> = HashMap::new();
        let Some(cmap) = self.face.as_face_ref().tables().cmap else {
            return map;
        };
        for subtable in cmap.subtables.into_iter().filter(|t| t.is_unicode()) {
            subtable.codepoints(|codepoint: u32| {
                if let Ok(ch) = char::try_from(codepoint) {
                    if let Some(gid) = subtable.glyph_index(codepoint).filter(|gid| gid.0 > 0) {
                        map.entry(gid.0).or_insert(ch);
                    }
                }
            });
        }
        map
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, id: Id<Font>, writer: &mut Pdf) {
        let index = id.index();
        let font_id = refs.gen(RefType::Font(index));
        let cid_font_id = self.write_cid(refs, index, writer);
        let to_unicode_id = self.write_to_unicode(refs, index, writer);

        let mut font = writer.type0_font(font_id);
        font.base_font(Name(format!("F{index}").as_bytes()));
        font.encoding_predefined(Name(b"Identity-H"));
        font.descendant_font(cid_font_id);
        font.to_unicode(to_unicode_id);
    }

    fn write_cid(&self, refs: &mut ObjectReferences, index: usize, writer: &mut Pdf) -> Ref {
        let descriptor_id = self.write_descriptor(refs, index, writer);
        let id = refs.gen(RefType::CidFont(index));

        let mut cid_font = writer.cid_font(id);
        cid_font.subtype(CidFontType::Type2);
        cid_font.base_font(Name(format!("F{index}").as_bytes()));
        cid_font.system_info(SystemInfo {
            registry: Str(b"Adobe"),
            ordering: Str(b"Identity"),
            supplement: 0,
        });
        cid_font.font_descriptor(descriptor_id);

        let scaling = 1000.0 / self.face.as_face_ref().units_per_em() as f32;
        let mut id_widths: Vec<(u16, f32)> = self
            .glyph_map()
            .keys()
            .filter_map(|&gid| {
                self.face
                    .as_face_ref()
                    .glyph_hor_advance(GlyphId(gid))
                    .map(|advance| (gid, advance as f32 * scaling))
            })
            .collect();
        id_widths.sort_by_key(|&(gid, _)| gid);

        // emit widths as runs of consecutive glyph ids
        let mut widths = cid_font.widths();
        widths.consecutive(0, [1000.0]);
        let mut run_start: u16 = 0;
        let mut run: Vec<f32> = Vec::new();
        for (gid, width) in id_widths {
            if !run.is_empty() && gid != run_start + run.len() as u16 {
                widths.consecutive(run_start, run.clone());
                run.clear();
            }
            if run.is_empty() {
                run_start = gid;
            }
            run.push(width);
        }
        if !run.is_empty() {
            widths.consecutive(run_start, run);
        }
        widths.finish();

        cid_font.default_width(1000.0);
        cid_font.cid_to_gid_map_predefined(Name(b"Identity"));

        id
    }

    fn write_descriptor(&self, refs: &mut ObjectReferences, index: usize, writer: &mut Pdf) -> Ref {
        let data_id = self.write_font_data(refs, index, writer);
        let id = refs.gen(RefType::FontDescriptor(index));

        let face = self.face.as_face_ref();
        let scaling = 1000.0 / face.units_per_em() as f32;

        let mut descriptor = writer.font_descriptor(id);
        descriptor.name(Name(self.full_name().as_bytes()));
        descriptor.family(Str(self.family().as_bytes()));
        descriptor.weight(face.weight().to_number());

        let mut flags = FontFlags::empty();
        if face.is_monospaced() {
            flags.set(FontFlags::FIXED_PITCH, true);
        }
        if face.is_italic() {
            flags.set(FontFlags::ITALIC, true);
        }
        descriptor.flags(flags);

        let bbox = face.global_bounding_box();
        descriptor.bbox(pdf_writer::Rect {
            x1: bbox.x_min as f32 * scaling,
            y1: bbox.y_min as f32 * scaling,
            x2: bbox.x_max as f32 * scaling,
            y2: bbox.y_max as f32 * scaling,
        });
        descriptor.italic_angle(face.italic_angle());
        descriptor.ascent(face.ascender() as f32 * scaling);
        descriptor.descent(face.descender() as f32 * scaling);
        descriptor.leading(face.line_gap() as f32 * scaling);
        descriptor.cap_height(
            face.capital_height()
                .map(|h| h as f32 * scaling)
                .unwrap_or(1000.0),
        );
        descriptor.x_height(
            face.x_height()
                .or_else(|| face.capital_height())
                .unwrap_or_default() as f32
                * scaling,
        );
        // stem width is not present in TTF metrics; a nominal value
        descriptor.stem_v(80.0);
        descriptor.font_file2(data_id);

        id
    }

    fn write_font_data(&self, refs: &mut ObjectReferences, index: usize, writer: &mut Pdf) -> Ref {
        let id = refs.gen(RefType::FontData(index));
        writer
            .stream(id, self.face.as_slice())
            .pair(Name(b"Length1"), self.face.as_slice().len() as i32);
        id
    }

    fn write_to_unicode(&self, refs: &mut ObjectReferences, index: usize, writer: &mut Pdf) -> Ref {
        let id = refs.gen(RefType::ToUnicode(index));

        let mut map = String::from(
            "/CIDInit /ProcSet findresource begin\n\
             12 dict begin\n\
             begincmap\n\
             /CIDSystemInfo\n\
             << /Registry (Adobe)\n\
             /Ordering (UCS) /Supplement 0 >> def\n\
             /CMapName /Adobe-Identity-UCS def\n\
             /CMapType 2 def\n\
             1 begincodespacerange\n\
             <0000> <FFFF>\n\
             endcodespacerange\n",
        );

        let mut pairs: Vec<(u16, char)> = self.glyph_map().into_iter().collect();
        pairs.sort_by_key(|&(gid, _)| gid);
        for block in pairs.chunks(100) {
            map.push_str(&format!("{} beginbfchar\n", block.len()));
            for &(gid, ch) in block {
                map.push_str(&format!("<{gid:04x}> <{:04x}>\n", ch as u32));
            }
            map.push_str("endbfchar\n");
        }
        map.push_str("endcmap CMapName currentdict /CMap defineresource pop end end\n");

        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(
            map.as_bytes(),
            miniz_oxide::deflate::CompressionLevel::DefaultCompression as u8,
        );
        let mut stream = writer.stream(id, compressed.as_slice());
        stream.filter(Filter::FlateDecode);

        id
    }
}
