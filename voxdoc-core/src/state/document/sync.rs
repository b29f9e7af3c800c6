//! Bringing derived layer content up to date.
//!
//! Clones and shape layers don't own their content, it is regenerated from a source layer or a shape descriptor.
//! Each layer caches the key of what it was last generated from, so a pass over an unchanged document
//! touches nothing.

use super::{Document, DocumentError};
use crate::{blend::BlendMode, checksum::Key, id::LayerID};

impl Document {
    /// Regenerate every clone whose source changed and every shape layer whose descriptor changed.
    /// Returns how many layers were regenerated.
    ///
    /// A layer with both a shape and a source is regenerated from its shape only.
    /// Chains of clones settle within one call, regardless of their order in the list.
    /// # Errors
    /// If a clone's source is missing from the document. Layers before it in the list have already been updated.
    pub fn synchronize(&mut self) -> Result<usize, DocumentError> {
        let mut touched = 0;
        // Any acyclic chain settles within as many passes as there are layers.
        for _ in 0..self.content.layers.len() {
            let pass = self.synchronize_pass()?;
            if pass == 0 {
                break;
            }
            touched += pass;
        }
        if touched != 0 {
            log::trace!("Synchronized {touched} layers");
        }
        Ok(touched)
    }
    /// One scan in list order. A clone placed before its source may see it stale.
    fn synchronize_pass(&mut self) -> Result<usize, DocumentError> {
        let mut touched = 0;
        for idx in 0..self.content.layers.len() {
            let layer = &self.content.layers[idx];
            let (id, shaped, base) = (layer.id, layer.shape.is_some(), layer.base);
            if shaped {
                touched += usize::from(self.sync_shape(idx));
            } else if let Some(base) = base {
                touched += usize::from(self.sync_clone(idx, id, base)?);
            }
        }
        Ok(touched)
    }
    fn sync_clone(&mut self, idx: usize, id: LayerID, base: LayerID) -> Result<bool, DocumentError> {
        let source_idx = self
            .layer_index(base)
            .map_err(|_| DocumentError::DanglingBase { layer: id, base })?;
        let source_key = self.content.layers[source_idx].mesh.content_key();
        if source_key == self.content.layers[idx].base_mesh_key {
            return Ok(false);
        }
        let source = self.content.layers[source_idx].mesh.clone();
        let layer = &mut self.content.layers[idx];
        layer.mesh.set(&source);
        layer.mesh.apply_transform(&layer.transform);
        layer.base_mesh_key = source_key;
        Ok(true)
    }
    fn sync_shape(&mut self, idx: usize) -> bool {
        let bounds = self.content.bounds;
        let layer = &mut self.content.layers[idx];
        let Some(shape) = layer.shape else {
            return false;
        };
        let key = Key::SEED
            .fold_pod(&layer.transform)
            .fold(&[shape.tag()])
            .fold_pod(&layer.color);
        if key == layer.shape_key {
            return false;
        }
        layer.mesh.clear();
        layer.mesh.rasterize_shape(
            shape,
            &layer.transform,
            layer.color,
            BlendMode::Over,
            Some(&bounds),
        );
        layer.shape_key = key;
        true
    }
}
