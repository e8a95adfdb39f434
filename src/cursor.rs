use crate::backend::RenderBackend;
use crate::geometry::PageGeometry;
use crate::units::Pt;

/// The writing cursor: the current top-down vertical offset on the
/// current page, plus the page index. Owned exclusively by the session;
/// `page_index` only ever increases.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    pub y: Pt,
    pub page_index: usize,
}

impl Cursor {
    pub fn new(geometry: &PageGeometry) -> Cursor {
        Cursor {
            y: geometry.margin,
            page_index: 0,
        }
    }

    /// The single page-break decision point: if `required` more vertical
    /// units do not fit above the bottom boundary, append a new page and
    /// reset the cursor to the top margin. Returns whether a break
    /// happened.
    ///
    /// Callers invoke this once per discrete unit (a whole title, one
    /// paragraph line, a table minimum), never recursively, so a unit
    /// taller than the whole content area is drawn on a starved page
    /// rather than looping.
    pub fn ensure_space<B: RenderBackend + ?Sized>(
        &mut self,
        geometry: &PageGeometry,
        required: Pt,
        backend: &mut B,
    ) -> bool {
        if self.y + required > geometry.bottom_boundary() {
            backend.new_page();
            self.y = geometry.margin;
            self.page_index += 1;
            true
        } else {
            false
        }
    }

    /// Move the cursor down by `amount`
    pub fn advance(&mut self, amount: Pt) {
        self.y += amount;
    }

    /// Pull the cursor back inside the content area after a trailing gap
    /// pushed it past the bottom boundary
    pub fn clamp(&mut self, geometry: &PageGeometry) {
        self.y = self.y.min(geometry.bottom_boundary());
    }
}
