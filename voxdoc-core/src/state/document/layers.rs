//! Layer lifecycle. Every operation taking an `Option<LayerID>` target acts on the active layer when given `None`.

use super::{Document, DocumentError};
use crate::{
    blend::BlendMode,
    color::Color,
    id::{self, LayerID},
    state::{
        layer::{ImageRef, Layer},
        painter::Painter,
        transform::Matrix,
        Direction,
    },
};

impl Document {
    /// Append a new, empty layer and make it active. With no name, one is generated.
    /// A requested name that is already taken gets disambiguated.
    pub fn add_layer(&mut self, name: Option<&str>) -> LayerID {
        let name = match name {
            Some(name) => id::available_name(name, |c| self.layer_name_exists(c)),
            None => id::unique_name("Layer", |c| self.layer_name_exists(c)),
        };
        let mut layer = Layer::new(self.next_layer_id(), name);
        layer.material = self.content.active_material;
        self.push_layer(layer)
    }
    /// Append a layer holding the painter's shape and color, placed at the selection if there is one,
    /// else centered in the document. Content is generated by the next [`Self::synchronize`].
    pub fn add_shape_layer(&mut self, painter: &Painter) -> LayerID {
        let name = id::available_name("shape", |c| self.layer_name_exists(c));
        let mut layer = Layer::new(self.next_layer_id(), name);
        layer.shape = Some(painter.shape);
        layer.color = painter.color;
        layer.transform = match painter.selection() {
            Some(selection) => *selection,
            None => Matrix::from_translation(self.content.bounds.center())
                .mul(&Matrix::from_scale([4.0; 3])),
        };
        self.push_layer(layer)
    }
    /// Append a layer referencing a picture, sized one voxel per pixel and centered in the document.
    /// Convert it with [`Self::image_layer_to_mesh`].
    /// # Errors
    /// If the picture can't be read.
    pub fn add_image_layer(&mut self, path: &std::path::Path) -> Result<LayerID, DocumentError> {
        let (width, height) = crate::io::dimensions(path)?;
        let stem = path
            .file_stem()
            .map_or_else(|| "image".into(), |stem| stem.to_string_lossy());
        let name = id::available_name(&stem, |c| self.layer_name_exists(c));
        let mut layer = Layer::new(self.next_layer_id(), name);
        layer.material = self.content.active_material;
        layer.image = Some(ImageRef {
            path: path.to_owned(),
        });
        layer.transform = Matrix::from_translation(self.content.bounds.center())
            .mul(&Matrix::from_scale([width as f32, height as f32, 1.0]));
        Ok(self.push_layer(layer))
    }
    fn push_layer(&mut self, layer: Layer) -> LayerID {
        let id = layer.id;
        log::trace!("Adding {id} {:?}", layer.name);
        self.content.layers.push(layer);
        self.content.active_layer = Some(id);
        id
    }

    /// Remove a layer. Clones of it keep their current content as independent layers.
    /// The document is never left without a layer: removing the last one leaves a fresh empty one in its place.
    /// # Errors
    /// If the target doesn't exist.
    pub fn delete_layer(&mut self, target: Option<LayerID>) -> Result<(), DocumentError> {
        let id = self.target_layer(target)?;
        let idx = self.layer_index(id)?;
        self.content.layers.remove(idx);
        if self.content.active_layer == Some(id) {
            self.content.active_layer = None;
        }
        self.sever_clones_of(id);

        if self.content.layers.is_empty() {
            let placeholder = Layer::new(self.next_layer_id(), "unnamed".to_owned());
            log::trace!("Last layer deleted, replacing with {}", placeholder.id);
            self.content.layers.push(placeholder);
        }
        if self.content.active_layer.is_none() {
            self.content.active_layer = self.content.layers.last().map(Layer::id);
        }
        Ok(())
    }
    /// Detach every clone of `id`, freezing their content.
    fn sever_clones_of(&mut self, id: LayerID) {
        for layer in &mut self.content.layers {
            if layer.base == Some(id) {
                log::trace!("Unlinking {} from deleted source {id}", layer.id);
                layer.base = None;
            }
        }
    }

    /// Swap a layer with its neighbor. Nothing happens at either end of the list.
    /// # Errors
    /// If the target doesn't exist.
    pub fn move_layer(
        &mut self,
        target: Option<LayerID>,
        direction: Direction,
    ) -> Result<(), DocumentError> {
        let id = self.target_layer(target)?;
        let idx = self.layer_index(id)?;
        if let Some(other) = direction.neighbor(idx, self.content.layers.len()) {
            self.content.layers.swap(idx, other);
        }
        Ok(())
    }
    /// Move one step toward the front of the list.
    /// # Errors
    /// If the target doesn't exist.
    pub fn move_layer_up(&mut self, target: Option<LayerID>) -> Result<(), DocumentError> {
        self.move_layer(target, Direction::Up)
    }
    /// Move one step toward the back of the list.
    /// # Errors
    /// If the target doesn't exist.
    pub fn move_layer_down(&mut self, target: Option<LayerID>) -> Result<(), DocumentError> {
        self.move_layer(target, Direction::Down)
    }

    /// Append an independent copy of a layer and make it active.
    /// # Errors
    /// If the target doesn't exist.
    pub fn duplicate_layer(&mut self, target: Option<LayerID>) -> Result<LayerID, DocumentError> {
        let source = self.layer(self.target_layer(target)?)?;
        let mut layer = source.clone();
        layer.name = id::available_name(&source.name, |c| self.layer_name_exists(c));
        layer.id = self.next_layer_id();
        layer.visible = true;
        layer.base = None;
        Ok(self.push_layer(layer))
    }
    /// Append a layer that mirrors the target's mesh (through its own transform), and make it active.
    /// # Errors
    /// If the target doesn't exist.
    pub fn clone_layer(&mut self, target: Option<LayerID>) -> Result<LayerID, DocumentError> {
        let source = self.layer(self.target_layer(target)?)?;
        let name = id::available_name(&format!("{} clone", source.name), |c| {
            self.layer_name_exists(c)
        });
        let mut layer = Layer::new(self.next_layer_id(), name);
        layer.material = source.material;
        layer.mesh = source.mesh.clone();
        layer.base = Some(source.id);
        layer.base_mesh_key = source.mesh.content_key();
        Ok(self.push_layer(layer))
    }
    /// Stop mirroring a source and stop regenerating from a shape. The content as of now is kept.
    /// # Errors
    /// If the target doesn't exist.
    pub fn unclone_layer(&mut self, target: Option<LayerID>) -> Result<(), DocumentError> {
        let layer = self.layer_mut(self.target_layer(target)?)?;
        layer.base = None;
        layer.shape = None;
        Ok(())
    }
    /// Make the source of a clone active. Nothing happens for layers that aren't clones.
    /// # Errors
    /// If the target doesn't exist.
    pub fn select_parent_layer(&mut self, target: Option<LayerID>) -> Result<(), DocumentError> {
        let id = self.target_layer(target)?;
        match self.layer(id)?.base {
            Some(base) if self.layer_index(base).is_ok() => {
                self.content.active_layer = Some(base);
            }
            Some(base) => log::debug!("Parent {base} of {id} is gone"),
            None => log::debug!("{id} has no parent"),
        }
        Ok(())
    }

    /// Flatten every visible layer into the last visible one, which becomes active.
    /// Earlier layers are composited "over" later ones. Hidden layers are left alone.
    pub fn merge_visible_layers(&mut self) {
        let mut accumulator: Option<usize> = None;
        let mut merged_away = smallvec::SmallVec::<[LayerID; 4]>::new();
        for idx in 0..self.content.layers.len() {
            if !self.content.layers[idx].visible {
                continue;
            }
            let layer = &mut self.content.layers[idx];
            layer.base = None;
            layer.shape = None;
            if let Some(prev) = accumulator {
                let below = std::mem::take(&mut self.content.layers[prev].mesh);
                self.content.layers[idx].mesh.merge(&below, BlendMode::Over);
                merged_away.push(self.content.layers[prev].id);
            }
            accumulator = Some(idx);
        }
        let Some(last) = accumulator else {
            log::debug!("No visible layers to merge");
            return;
        };
        let last = self.content.layers[last].id;

        self.content
            .layers
            .retain(|layer| !merged_away.contains(&layer.id));
        for id in merged_away {
            self.sever_clones_of(id);
        }
        self.content.active_layer = Some(last);
    }

    /// Erase a layer's content within a box, or entirely if there is no usable box.
    /// # Errors
    /// If the target doesn't exist.
    pub fn clear_layer(
        &mut self,
        target: Option<LayerID>,
        within: Option<&Matrix>,
    ) -> Result<(), DocumentError> {
        let layer = self.layer_mut(self.target_layer(target)?)?;
        match within.filter(|b| !b.is_null_box()) {
            None => layer.mesh.clear(),
            Some(within) => layer.mesh.rasterize_shape(
                crate::state::shape::Shape::Cube,
                within,
                Color::WHITE,
                BlendMode::Sub,
                None,
            ),
        }
        Ok(())
    }
    /// # Errors
    /// If the target doesn't exist.
    pub fn layer_can_edit(&self, target: Option<LayerID>) -> Result<bool, DocumentError> {
        Ok(self.layer(self.target_layer(target)?)?.can_edit())
    }
    /// Give a layer a new name, disambiguated against the other layers. Returns the name actually used.
    /// # Errors
    /// If the target doesn't exist.
    pub fn rename_layer(
        &mut self,
        target: Option<LayerID>,
        name: &str,
    ) -> Result<String, DocumentError> {
        let id = self.target_layer(target)?;
        let name = id::available_name(name, |c| {
            self.content
                .layers
                .iter()
                .any(|layer| layer.id != id && id::name_eq(&layer.name, c))
        });
        self.layer_mut(id)?.name.clone_from(&name);
        Ok(name)
    }

    /// Bake a layer's picture into voxels, one per pixel, and drop the picture.
    /// # Errors
    /// If the target doesn't exist, has no picture, or the picture can't be decoded.
    /// Nothing is changed on error.
    pub fn image_layer_to_mesh(&mut self, target: Option<LayerID>) -> Result<(), DocumentError> {
        let id = self.target_layer(target)?;
        let layer = self.layer(id)?;
        let image = layer
            .image
            .as_ref()
            .ok_or(DocumentError::NotAnImageLayer(id))?;
        let decoded = crate::io::decode(&image.path)?;

        let layer = self.layer_mut(id)?;
        let (width, height) = (decoded.width as f32, decoded.height as f32);
        for y in 0..decoded.height {
            for x in 0..decoded.width {
                let Some(pixel) = decoded.pixel(x, y) else {
                    continue;
                };
                // Unit square centered on the origin, top row at +Y.
                let local = [x as f32 / width - 0.5, 0.5 - y as f32 / height, 0.0];
                let pos = layer.transform.transform_point(local).map(|v| v.round() as i32);
                layer.mesh.set_at(pos, Color::from_pixel(pixel));
            }
        }
        layer.image = None;
        log::debug!(
            "Converted {id} from a {}x{} picture",
            decoded.width,
            decoded.height
        );
        Ok(())
    }
}
