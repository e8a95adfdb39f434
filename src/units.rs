use derive_more::{Add, AddAssign, Display, Div, From, Into, Mul, MulAssign, Sub, SubAssign};

/// A distance expressed in PDF points, where 72 points make up one inch.
/// All layout quantities in this crate (page sizes, margins, gaps, font
/// sizes, cursor offsets) are [Pt] values, never bare floats.
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    PartialOrd,
    Add,
    AddAssign,
    Sub,
    SubAssign,
    Mul,
    MulAssign,
    Div,
    Display,
    From,
    Into,
)]
pub struct Pt(pub f32);

impl Pt {
    /// The smaller of `self` and `other`
    pub fn min(self, other: Pt) -> Pt {
        if self <= other {
            self
        } else {
            other
        }
    }

    /// The larger of `self` and `other`
    pub fn max(self, other: Pt) -> Pt {
        if self >= other {
            self
        } else {
            other
        }
    }
}

/// A distance expressed in inches, convertible to [Pt]
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd, Display, From, Into)]
pub struct In(pub f32);

impl From<In> for Pt {
    fn from(value: In) -> Pt {
        Pt(value.0 * 72.0)
    }
}

/// A distance expressed in millimetres, convertible to [Pt]
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd, Display, From, Into)]
pub struct Mm(pub f32);

impl From<Mm> for Pt {
    fn from(value: Mm) -> Pt {
        Pt(value.0 * 72.0 / 25.4)
    }
}
