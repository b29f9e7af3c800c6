//! # Document
//!
//! A document owns three ordered collections - layers, cameras, materials - and the undo history of its own content.
//! Order is meaningful: it is the stacking and merge order of layers and cameras.
//!
//! References between entities (the active entities, a layer's material, a clone's source) are IDs resolved against
//! the document on use. Anything removing an entity is responsible for clearing or redirecting the IDs pointing at it,
//! which [`Document::check_invariants`] verifies.

mod cameras;
mod dirty;
mod layers;
mod materials;
mod sync;

use super::{
    camera::{Camera, CameraID},
    layer::Layer,
    material::{Material, MaterialID},
    transform::Aabb,
};
use crate::{
    checksum::Key,
    id::{self, LayerID},
};

#[derive(thiserror::Error, Debug)]
pub enum DocumentError {
    #[error("{0} not found")]
    LayerNotFound(LayerID),
    #[error("{0} not found")]
    CameraNotFound(CameraID),
    #[error("{0} not found")]
    MaterialNotFound(MaterialID),
    #[error("no active layer")]
    NoActiveLayer,
    #[error("document has no layers")]
    EmptyLayers,
    #[error("{0} is used by more than one layer")]
    DuplicateLayerId(LayerID),
    #[error("name {0:?} is used more than once")]
    DuplicateName(String),
    #[error("{layer} clones {base}, which is not in the document")]
    DanglingBase { layer: LayerID, base: LayerID },
    #[error("{layer} uses {material}, which is not in the document")]
    DanglingMaterial {
        layer: LayerID,
        material: MaterialID,
    },
    #[error("active {0} is not in the document")]
    DanglingActive(&'static str),
    #[error("{0} has no image to convert")]
    NotAnImageLayer(LayerID),
    #[error(transparent)]
    Image(#[from] crate::io::ImageError),
}

/// Everything about a document that undo and redo restore.
#[derive(Clone, Debug)]
pub(crate) struct Content {
    pub(crate) layers: Vec<Layer>,
    pub(crate) cameras: Vec<Camera>,
    pub(crate) materials: Vec<Material>,
    pub(crate) active_layer: Option<LayerID>,
    pub(crate) active_camera: Option<CameraID>,
    pub(crate) active_material: Option<MaterialID>,
    pub(crate) bounds: Aabb,
    pub(crate) export_size: [u32; 2],
}

pub struct Document {
    pub(crate) content: Content,
    /// Where the document was last saved or loaded from. Not part of history.
    path: Option<std::path::PathBuf>,
    /// [`Document::document_key`] as of the last save. Not part of history.
    saved_key: Key,
    pub(crate) history: crate::history::History,
}
impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
impl Document {
    pub const DEFAULT_BOUNDS: Aabb = Aabb {
        min: [-16, -16, 0],
        max: [16, 16, 32],
    };
    pub const DEFAULT_EXPORT_SIZE: [u32; 2] = [1024, 1024];

    /// A document with one material, one camera and one layer. Starts out clean.
    #[must_use]
    pub fn new() -> Self {
        let mut this = Self {
            content: Content {
                layers: Vec::new(),
                cameras: Vec::new(),
                materials: Vec::new(),
                active_layer: None,
                active_camera: None,
                active_material: None,
                bounds: Self::DEFAULT_BOUNDS,
                export_size: Self::DEFAULT_EXPORT_SIZE,
            },
            path: None,
            saved_key: Key::SEED,
            history: crate::history::History::default(),
        };
        this.add_material(None);
        this.add_camera(None);
        this.add_layer(None);
        // An untouched document has nothing worth saving.
        this.saved_key = this.document_key();
        this
    }

    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.content.layers
    }
    #[must_use]
    pub fn cameras(&self) -> &[Camera] {
        &self.content.cameras
    }
    #[must_use]
    pub fn materials(&self) -> &[Material] {
        &self.content.materials
    }

    /// # Errors
    /// If no layer has this ID.
    pub fn layer(&self, id: LayerID) -> Result<&Layer, DocumentError> {
        self.content
            .layers
            .iter()
            .find(|layer| layer.id == id)
            .ok_or(DocumentError::LayerNotFound(id))
    }
    /// # Errors
    /// If no layer has this ID.
    pub fn layer_mut(&mut self, id: LayerID) -> Result<&mut Layer, DocumentError> {
        self.content
            .layers
            .iter_mut()
            .find(|layer| layer.id == id)
            .ok_or(DocumentError::LayerNotFound(id))
    }
    pub(crate) fn layer_index(&self, id: LayerID) -> Result<usize, DocumentError> {
        self.content
            .layers
            .iter()
            .position(|layer| layer.id == id)
            .ok_or(DocumentError::LayerNotFound(id))
    }
    #[must_use]
    pub fn active_layer_id(&self) -> Option<LayerID> {
        self.content.active_layer
    }
    /// # Errors
    /// If the document is in an invalid state with no active layer.
    pub fn active_layer(&self) -> Result<&Layer, DocumentError> {
        let id = self.content.active_layer.ok_or(DocumentError::NoActiveLayer)?;
        self.layer(id)
    }
    /// # Errors
    /// If no layer has this ID.
    pub fn set_active_layer(&mut self, id: LayerID) -> Result<(), DocumentError> {
        self.layer_index(id)?;
        self.content.active_layer = Some(id);
        Ok(())
    }
    /// The layer an operation acts on: the one given, else the active one. Checked to exist.
    pub(crate) fn target_layer(&self, target: Option<LayerID>) -> Result<LayerID, DocumentError> {
        let id = target
            .or(self.content.active_layer)
            .ok_or(DocumentError::NoActiveLayer)?;
        self.layer_index(id)?;
        Ok(id)
    }
    pub(crate) fn layer_name_exists(&self, name: &str) -> bool {
        self.content
            .layers
            .iter()
            .any(|layer| id::name_eq(&layer.name, name))
    }
    pub(crate) fn next_layer_id(&self) -> LayerID {
        id::allocate_layer_id(self.content.layers.iter().map(Layer::id))
    }

    #[must_use]
    pub fn bounds(&self) -> Aabb {
        self.content.bounds
    }
    pub fn set_bounds(&mut self, bounds: Aabb) {
        self.content.bounds = bounds;
    }
    #[must_use]
    pub fn export_size(&self) -> [u32; 2] {
        self.content.export_size
    }
    pub fn set_export_size(&mut self, size: [u32; 2]) {
        self.content.export_size = size;
    }

    #[must_use]
    pub fn path(&self) -> Option<&std::path::Path> {
        self.path.as_deref()
    }
    #[must_use]
    pub fn saved_key(&self) -> Key {
        self.saved_key
    }
    /// Has the content changed since the last [`Self::mark_saved`]?
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.document_key() != self.saved_key
    }
    /// Record the current content as persisted, optionally at a new path.
    pub fn mark_saved(&mut self, path: Option<std::path::PathBuf>) {
        if path.is_some() {
            self.path = path;
        }
        self.saved_key = self.document_key();
        log::debug!("Document saved at {:?}, key {:?}", self.path, self.saved_key);
    }

    /// Verify every structural invariant, returning the first violation found.
    /// # Errors
    /// Any violation is a bug in whatever last mutated the document.
    pub fn check_invariants(&self) -> Result<(), DocumentError> {
        let content = &self.content;
        if content.layers.is_empty() {
            return Err(DocumentError::EmptyLayers);
        }

        let mut ids = hashbrown::HashSet::with_capacity(content.layers.len());
        for layer in &content.layers {
            if !ids.insert(layer.id) {
                return Err(DocumentError::DuplicateLayerId(layer.id));
            }
        }

        unique_names(content.layers.iter().map(Layer::name))?;
        unique_names(content.cameras.iter().map(Camera::name))?;
        unique_names(content.materials.iter().map(Material::name))?;

        for layer in &content.layers {
            if let Some(base) = layer.base {
                if !ids.contains(&base) {
                    return Err(DocumentError::DanglingBase {
                        layer: layer.id,
                        base,
                    });
                }
            }
            if let Some(material) = layer.material {
                if self.material(material).is_err() {
                    return Err(DocumentError::DanglingMaterial {
                        layer: layer.id,
                        material,
                    });
                }
            }
        }

        match content.active_layer {
            None => return Err(DocumentError::NoActiveLayer),
            Some(id) if !ids.contains(&id) => return Err(DocumentError::DanglingActive("layer")),
            Some(_) => (),
        }
        match content.active_camera {
            None if !content.cameras.is_empty() => {
                return Err(DocumentError::DanglingActive("camera"))
            }
            Some(id) if self.camera(id).is_err() => {
                return Err(DocumentError::DanglingActive("camera"))
            }
            _ => (),
        }
        match content.active_material {
            None if !content.materials.is_empty() => {
                return Err(DocumentError::DanglingActive("material"))
            }
            Some(id) if self.material(id).is_err() => {
                return Err(DocumentError::DanglingActive("material"))
            }
            _ => (),
        }
        Ok(())
    }
}

fn unique_names<'a>(names: impl Iterator<Item = &'a str>) -> Result<(), DocumentError> {
    let mut seen = hashbrown::HashSet::new();
    for name in names {
        if !seen.insert(name.to_ascii_lowercase()) {
            return Err(DocumentError::DuplicateName(name.to_owned()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::Document;

    #[test]
    fn fresh_document() {
        let document = Document::new();
        document.check_invariants().unwrap();
        assert_eq!(document.layers().len(), 1);
        assert_eq!(document.cameras().len(), 1);
        assert_eq!(document.materials().len(), 1);

        let layer = document.active_layer().unwrap();
        assert_eq!(layer.name(), "Layer.1");
        assert_eq!(layer.id().get(), 1);
        assert!(layer.visible);
        assert_eq!(layer.material, Some(document.materials()[0].id()));
        assert_eq!(document.cameras()[0].name(), "Camera.1");
        assert_eq!(document.materials()[0].name(), "Material.1");

        assert_eq!(document.bounds(), Document::DEFAULT_BOUNDS);
        assert_eq!(document.export_size(), [1024, 1024]);
        assert!(!document.is_dirty());
        assert!(document.path().is_none());
    }
    #[test]
    fn dirty_and_saved() {
        let mut document = Document::new();
        document.add_layer(None);
        assert!(document.is_dirty());

        document.mark_saved(Some("model.vox".into()));
        assert!(!document.is_dirty());
        assert_eq!(document.path(), Some(std::path::Path::new("model.vox")));

        // Saving again without a path keeps the old one.
        document.mark_saved(None);
        assert_eq!(document.path(), Some(std::path::Path::new("model.vox")));
    }
    #[test]
    fn invariant_violations_are_reported() {
        use super::DocumentError;
        let mut document = Document::new();
        let first = document.active_layer_id().unwrap();
        let second = document.add_layer(None);

        document.layer_mut(second).unwrap().name = "LAYER.1".into();
        assert!(matches!(
            document.check_invariants(),
            Err(DocumentError::DuplicateName(_))
        ));
        document.layer_mut(second).unwrap().name = "Layer.2".into();

        document.layer_mut(second).unwrap().base = crate::id::LayerID::new(40);
        assert!(matches!(
            document.check_invariants(),
            Err(DocumentError::DanglingBase { .. })
        ));
        document.layer_mut(second).unwrap().base = Some(first);
        document.check_invariants().unwrap();

        document.content.active_layer = None;
        assert!(matches!(
            document.check_invariants(),
            Err(DocumentError::NoActiveLayer)
        ));
    }
}
