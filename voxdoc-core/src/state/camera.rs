use super::transform::Matrix;
use crate::checksum::Key;

pub type CameraID = crate::id::EntityID<Camera>;

#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    id: CameraID,
    name: String,
    /// Orthographic rather than perspective projection.
    pub ortho: bool,
    /// Vertical field of view, in degrees.
    pub fovy: f32,
    /// Distance from the rotation center.
    pub distance: f32,
    /// Placement of the rotation center.
    pub transform: Matrix,
}
impl Camera {
    pub(crate) fn new(name: String) -> Self {
        Self {
            id: CameraID::default(),
            name,
            ortho: false,
            fovy: 20.0,
            distance: 128.0,
            transform: Matrix::IDENTITY,
        }
    }
    #[must_use]
    pub fn id(&self) -> CameraID {
        self.id
    }
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
    /// Key over everything but identity.
    #[must_use]
    pub fn key(&self) -> Key {
        Key::SEED
            .fold_str(&self.name)
            .fold_bool(self.ortho)
            .fold_pod(&self.fovy)
            .fold_pod(&self.distance)
            .fold_pod(&self.transform)
    }
}
