use super::{shape::Shape, transform::Matrix};
use crate::color::Color;

/// The tool state some operations draw from: which shape and color to paint, and the current selection.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct Painter {
    pub shape: Shape,
    pub color: Color,
    /// Selection box, if any. A degenerate box counts as no selection.
    pub selection: Option<Matrix>,
}
impl Painter {
    /// The selection, if there is a usable one.
    #[must_use]
    pub fn selection(&self) -> Option<&Matrix> {
        self.selection.as_ref().filter(|b| !b.is_null_box())
    }
}
