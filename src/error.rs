use crate::units::Pt;
use thiserror::Error;

/// All errors that the crate can generate. Block rendering itself never
/// fails, since missing or malformed content degrades to placeholders;
/// errors only arise when constructing a backend or geometry, and when
/// emitting the finished document.
#[derive(Error, Debug)]
pub enum DocError {
    #[error(transparent)]
    /// An I/O error occurred while emitting the document
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font, so no backend could
    /// be constructed
    FaceParsing(#[from] owned_ttf_parser::FaceParsingError),

    /// The margin does not leave any usable content area on the page
    #[error("invalid page geometry: margin {margin} does not fit a {width}x{height} page")]
    InvalidGeometry { width: Pt, height: Pt, margin: Pt },
}
