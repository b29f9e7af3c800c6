use super::{material::Material, material::MaterialID, shape::Shape, transform::Matrix};
use crate::{checksum::Key, color::Color, id::LayerID, mesh::Mesh};

/// A picture waiting to be turned into voxels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageRef {
    pub path: std::path::PathBuf,
}

#[derive(Clone, Debug)]
pub struct Layer {
    pub(crate) id: LayerID,
    pub(crate) name: String,
    pub visible: bool,
    /// Placement of the layer's own content. Clones re-apply this on top of their source.
    pub transform: Matrix,
    /// Weak, may reference a material no longer in the document only transiently.
    pub material: Option<MaterialID>,
    pub mesh: Mesh,
    pub image: Option<ImageRef>,
    /// Source layer this one mirrors, if any.
    pub(crate) base: Option<LayerID>,
    /// Content key of the source mesh as of the last synchronization.
    pub(crate) base_mesh_key: Key,
    /// Procedural content, regenerated from this descriptor, [`Self::color`] and the transform.
    /// Takes priority over [`Self::base`] should both be present.
    pub(crate) shape: Option<Shape>,
    pub color: Color,
    pub(crate) shape_key: Key,
}
impl Layer {
    pub(crate) fn new(id: LayerID, name: String) -> Self {
        Self {
            id,
            name,
            visible: true,
            transform: Matrix::IDENTITY,
            material: None,
            mesh: Mesh::new(),
            image: None,
            base: None,
            base_mesh_key: Key::SEED,
            shape: None,
            color: Color::WHITE,
            shape_key: Key::SEED,
        }
    }
    #[must_use]
    pub fn id(&self) -> LayerID {
        self.id
    }
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
    /// The layer this one is a clone of.
    #[must_use]
    pub fn base(&self) -> Option<LayerID> {
        self.base
    }
    #[must_use]
    pub fn shape(&self) -> Option<Shape> {
        self.shape
    }
    /// Only plain layers may be painted on directly - the rest regenerate their content.
    #[must_use]
    pub fn can_edit(&self) -> bool {
        self.base.is_none() && self.image.is_none() && self.shape.is_none()
    }
    /// Content key of this layer. `material` is the resolved [`Self::material`], if any.
    /// Identity (own ID, source ID, material ID) is never part of it.
    #[must_use]
    pub fn key(&self, material: Option<&Material>) -> Key {
        let key = Key::SEED
            .fold_key(self.mesh.content_key())
            .fold_str(&self.name)
            .fold_bool(self.visible)
            .fold_pod(&self.transform)
            .fold_key(material.map_or(Key::SEED, Material::hash))
            .fold_bool(self.base.is_some())
            .fold(&[self.shape.map_or(u8::MAX, Shape::tag)])
            .fold_pod(&self.color);
        match &self.image {
            Some(image) => key.fold_str(&image.path.to_string_lossy()),
            None => key.fold_bool(false),
        }
    }
}
