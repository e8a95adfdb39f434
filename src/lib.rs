//! A paginated document-flow layout engine for structured reports.
//!
//! A [Session] opens a document with a title header, then renders a
//! sequence of blocks (section titles, paragraphs, lists, tables) while
//! tracking a top-down cursor and breaking pages automatically. Drawing
//! and text measurement go through an injected [RenderBackend]; the
//! crate ships a PDF implementation in [pdf].

mod backend;
pub use backend::*;

mod colour;
pub use colour::*;

mod cursor;
pub use cursor::*;

mod error;
pub use error::*;

mod font;
pub use font::*;

mod geometry;
pub use geometry::*;

mod info;
pub use info::*;

/// The bundled PDF rendering backend
pub mod pdf;
pub use pdf::PdfBackend;

mod session;
pub use session::*;

/// Block styles, spacing, and table styling
pub mod style;

mod units;
pub use units::*;

/// Re-export PDF-writer functionality for callers that post-process the
/// generated document
pub use pdf_writer;
