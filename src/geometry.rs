use crate::error::DocError;
use crate::units::Pt;

/// Page dimensions as (width, height) in points, portrait orientation.
pub type PageSize = (Pt, Pt);

pub const LETTER: PageSize = (Pt(8.5 * 72.0), Pt(11.0 * 72.0));
pub const A4: PageSize = (Pt(210.0 * 72.0 / 25.4), Pt(297.0 * 72.0 / 25.4));

/// The fixed geometry of every page in a document: page size plus a
/// uniform margin on all four sides. Immutable for the lifetime of a
/// session; all block layout happens inside the derived content area.
///
/// Vertical offsets in this crate run top-down: `margin` is the top of
/// the content area and [`bottom_boundary`](PageGeometry::bottom_boundary)
/// is the lowest offset a block may occupy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: Pt,
    pub height: Pt,
    pub margin: Pt,
}

impl PageGeometry {
    /// Create a validated page geometry. The margin must leave a usable
    /// content area, i.e. `margin < width / 2` and `margin < height / 2`.
    pub fn new(size: PageSize, margin: Pt) -> Result<PageGeometry, DocError> {
        let (width, height) = size;
        if margin.0 < 0.0 || margin >= width * 0.5 || margin >= height * 0.5 {
            return Err(DocError::InvalidGeometry {
                width,
                height,
                margin,
            });
        }
        Ok(PageGeometry {
            width,
            height,
            margin,
        })
    }

    /// US letter with a 40pt margin
    pub fn letter() -> PageGeometry {
        PageGeometry {
            width: LETTER.0,
            height: LETTER.1,
            margin: Pt(40.0),
        }
    }

    /// ISO A4 with a 40pt margin
    pub fn a4() -> PageGeometry {
        PageGeometry {
            width: A4.0,
            height: A4.1,
            margin: Pt(40.0),
        }
    }

    /// The horizontal width available to block content
    pub fn content_width(&self) -> Pt {
        self.width - self.margin * 2.0
    }

    /// The left edge of the content area
    pub fn content_left(&self) -> Pt {
        self.margin
    }

    /// The right edge of the content area
    pub fn content_right(&self) -> Pt {
        self.width - self.margin
    }

    /// The lowest top-down vertical offset content may reach; a block
    /// extending past this boundary triggers a page break
    pub fn bottom_boundary(&self) -> Pt {
        self.height - self.margin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_content_area() {
        let geom = PageGeometry::new((Pt(600.0), Pt(800.0)), Pt(40.0)).unwrap();
        assert_eq!(geom.content_width(), Pt(520.0));
        assert_eq!(geom.content_left(), Pt(40.0));
        assert_eq!(geom.content_right(), Pt(560.0));
        assert_eq!(geom.bottom_boundary(), Pt(760.0));
    }

    #[test]
    fn rejects_margin_wider_than_half_the_page() {
        let result = PageGeometry::new((Pt(600.0), Pt(800.0)), Pt(300.0));
        assert!(matches!(result, Err(DocError::InvalidGeometry { .. })));
        let result = PageGeometry::new((Pt(600.0), Pt(800.0)), Pt(-1.0));
        assert!(matches!(result, Err(DocError::InvalidGeometry { .. })));
    }

    #[test]
    fn standard_sizes_are_portrait() {
        assert!(LETTER.0 < LETTER.1);
        assert!(A4.0 < A4.1);
    }
}
