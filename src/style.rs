//! The style and spacing tables shared by every block kind.
//!
//! All report types render through this one table; adding a block kind
//! means adding an enum variant and two table rows, not a new builder.

use crate::colour::{colours, Colour};
use crate::units::Pt;

/// Every renderable block kind with a height-computation and spacing
/// contract. Lists have no entry of their own: they render through the
/// paragraph path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// Tier-1 heading, drawn once by the document header
    DocTitle,
    /// Tier-2 heading with an attached accent rule
    SectionTitle,
    /// Tier-3 heading
    SubsectionTitle,
    /// Tier-4 heading, also used by conditional sections
    MinorTitle,
    /// Flowing body text; may split across page boundaries
    Paragraph,
    /// Tabular block delegated to the backend's table flow
    Table,
}

/// Which face of the loaded font family a style renders with. Backends
/// without a bold or italic face fall back to the regular one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontClass {
    Regular,
    Bold,
    Italic,
}

/// Font size, face, and fill colour for one block kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: Pt,
    pub class: FontClass,
    pub colour: Colour,
}

/// The vertical whitespace wrapped around a block's content, independent
/// of how much text the block holds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spacing {
    pub top_gap: Pt,
    pub bottom_gap: Pt,
}

/// Distance between a section title's last line and its accent rule
pub const RULE_OFFSET: Pt = Pt(3.0);
/// Stroke thickness of the section-title rule
pub const RULE_THICKNESS: Pt = Pt(1.2);
/// Text substituted for blank paragraph content
pub const PLACEHOLDER_TEXT: &str = "N/A";
/// Bullet prefix applied to list items before paragraph delegation
pub const BULLET_PREFIX: &str = "\u{2022}  ";

/// The fixed style table: one entry per block kind
pub fn text_style(kind: BlockKind) -> TextStyle {
    match kind {
        BlockKind::DocTitle => TextStyle {
            size: Pt(22.0),
            class: FontClass::Bold,
            colour: colours::DARK_SLATE,
        },
        BlockKind::SectionTitle => TextStyle {
            size: Pt(16.0),
            class: FontClass::Bold,
            colour: colours::DARK_SLATE,
        },
        BlockKind::SubsectionTitle => TextStyle {
            size: Pt(13.0),
            class: FontClass::Bold,
            colour: colours::SLATE,
        },
        BlockKind::MinorTitle => TextStyle {
            size: Pt(11.0),
            class: FontClass::Bold,
            colour: colours::SLATE,
        },
        BlockKind::Paragraph | BlockKind::Table => TextStyle {
            size: Pt(10.0),
            class: FontClass::Regular,
            colour: colours::SLATE,
        },
    }
}

/// The fixed spacing table: one entry per block kind
pub fn spacing(kind: BlockKind) -> Spacing {
    match kind {
        BlockKind::DocTitle => Spacing {
            top_gap: Pt(0.0),
            bottom_gap: Pt(4.0),
        },
        BlockKind::SectionTitle => Spacing {
            top_gap: Pt(14.0),
            bottom_gap: Pt(8.0),
        },
        BlockKind::SubsectionTitle => Spacing {
            top_gap: Pt(10.0),
            bottom_gap: Pt(5.0),
        },
        BlockKind::MinorTitle => Spacing {
            top_gap: Pt(8.0),
            bottom_gap: Pt(4.0),
        },
        BlockKind::Paragraph => Spacing {
            top_gap: Pt(0.0),
            bottom_gap: Pt(6.0),
        },
        BlockKind::Table => Spacing {
            top_gap: Pt(6.0),
            bottom_gap: Pt(8.0),
        },
    }
}

/// Style for the `"N/A"` substitution when a paragraph is blank
pub fn placeholder_style() -> TextStyle {
    TextStyle {
        size: Pt(10.0),
        class: FontClass::Italic,
        colour: colours::MUTED,
    }
}

/// Style for the generated-timestamp line in the document header
pub fn timestamp_style() -> TextStyle {
    TextStyle {
        size: Pt(8.0),
        class: FontClass::Regular,
        colour: colours::MUTED,
    }
}

/// Styling for the table flow: header and cell text plus the grid rules
/// separating rows
#[derive(Debug, Clone, PartialEq)]
pub struct TableStyle {
    pub header: TextStyle,
    pub cell: TextStyle,
    pub grid: Colour,
    pub grid_thickness: Pt,
    pub cell_padding: Pt,
}

impl Default for TableStyle {
    fn default() -> TableStyle {
        TableStyle {
            header: TextStyle {
                size: Pt(10.0),
                class: FontClass::Bold,
                colour: colours::DARK_SLATE,
            },
            cell: text_style(BlockKind::Table),
            grid: colours::MUTED,
            grid_thickness: Pt(0.5),
            cell_padding: Pt(3.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_tiers_decrease_in_size() {
        let sizes: Vec<f32> = [
            BlockKind::DocTitle,
            BlockKind::SectionTitle,
            BlockKind::SubsectionTitle,
            BlockKind::MinorTitle,
            BlockKind::Paragraph,
        ]
        .into_iter()
        .map(|kind| text_style(kind).size.0)
        .collect();
        assert!(sizes.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn every_kind_has_a_spacing_contract() {
        for kind in [
            BlockKind::DocTitle,
            BlockKind::SectionTitle,
            BlockKind::SubsectionTitle,
            BlockKind::MinorTitle,
            BlockKind::Paragraph,
            BlockKind::Table,
        ] {
            let gaps = spacing(kind);
            assert!(gaps.top_gap.0 >= 0.0 && gaps.bottom_gap.0 >= 0.0);
        }
    }

    #[test]
    fn placeholder_is_italic_and_muted() {
        let style = placeholder_style();
        assert_eq!(style.class, FontClass::Italic);
        assert_eq!(style.colour, colours::MUTED);
    }
}
