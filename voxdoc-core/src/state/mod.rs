pub mod camera;
pub mod document;
pub mod layer;
pub mod material;
pub mod painter;
pub mod shape;
pub mod transform;

pub use document::{Document, DocumentError};

/// A step through an ordered list. Up is toward the front.
#[derive(Copy, Clone, PartialEq, Eq, Debug, strum::AsRefStr)]
pub enum Direction {
    Up,
    Down,
}
#[derive(thiserror::Error, Debug)]
#[error("direction must be 1 or -1, got {0}")]
pub struct InvalidDirection(pub i32);

impl TryFrom<i32> for Direction {
    type Error = InvalidDirection;
    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Up),
            -1 => Ok(Self::Down),
            other => Err(InvalidDirection(other)),
        }
    }
}
impl Direction {
    /// The index one step from `idx` in a list of length `len`, if there is one.
    #[must_use]
    pub fn neighbor(self, idx: usize, len: usize) -> Option<usize> {
        match self {
            Self::Up => idx.checked_sub(1),
            Self::Down => idx.checked_add(1).filter(|&next| next < len),
        }
    }
}
