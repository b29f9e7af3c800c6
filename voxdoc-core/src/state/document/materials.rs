use super::{Document, DocumentError};
use crate::{
    id,
    state::material::{Material, MaterialID},
};

impl Document {
    /// # Errors
    /// If no material has this ID.
    pub fn material(&self, id: MaterialID) -> Result<&Material, DocumentError> {
        self.content
            .materials
            .iter()
            .find(|material| material.id() == id)
            .ok_or(DocumentError::MaterialNotFound(id))
    }
    /// # Errors
    /// If no material has this ID.
    pub fn material_mut(&mut self, id: MaterialID) -> Result<&mut Material, DocumentError> {
        self.content
            .materials
            .iter_mut()
            .find(|material| material.id() == id)
            .ok_or(DocumentError::MaterialNotFound(id))
    }
    fn material_name_exists(&self, name: &str) -> bool {
        self.content
            .materials
            .iter()
            .any(|material| id::name_eq(material.name(), name))
    }
    #[must_use]
    pub fn active_material(&self) -> Option<&Material> {
        self.content
            .active_material
            .and_then(|id| self.material(id).ok())
    }
    /// Make a material active. Layers created afterwards use it.
    /// # Errors
    /// If no material has this ID.
    pub fn set_active_material(&mut self, id: MaterialID) -> Result<(), DocumentError> {
        self.material(id)?;
        self.content.active_material = Some(id);
        Ok(())
    }

    /// Append a new material and make it active.
    pub fn add_material(&mut self, name: Option<&str>) -> MaterialID {
        let name = match name {
            Some(name) => id::available_name(name, |c| self.material_name_exists(c)),
            None => id::unique_name("Material", |c| self.material_name_exists(c)),
        };
        let material = Material::new(name);
        let id = material.id();
        log::trace!("Adding {id} {:?}", material.name());
        self.content.materials.push(material);
        self.content.active_material = Some(id);
        id
    }
    /// Remove a material, the active one when given `None`. Layers using it are left without a material.
    /// Removing the active material activates the first remaining one.
    /// # Errors
    /// If the target doesn't exist.
    pub fn delete_material(&mut self, target: Option<MaterialID>) -> Result<(), DocumentError> {
        let Some(id) = target.or(self.content.active_material) else {
            log::debug!("No material to delete");
            return Ok(());
        };
        let idx = self
            .content
            .materials
            .iter()
            .position(|material| material.id() == id)
            .ok_or(DocumentError::MaterialNotFound(id))?;
        self.content.materials.remove(idx);
        for layer in &mut self.content.layers {
            if layer.material == Some(id) {
                layer.material = None;
            }
        }
        if self.content.active_material == Some(id) {
            self.content.active_material = self.content.materials.first().map(Material::id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn layers_follow_active_material() {
        let mut document = Document::new();
        let first = document.materials()[0].id();
        let metal = document.add_material(Some("Metal"));
        let layer = document.add_layer(None);
        assert_eq!(document.layer(layer).unwrap().material, Some(metal));

        document.set_active_material(first).unwrap();
        let other = document.add_layer(None);
        assert_eq!(document.layer(other).unwrap().material, Some(first));
    }
    #[test]
    fn delete_clears_references() {
        let mut document = Document::new();
        let first = document.materials()[0].id();
        let first_layer = document.active_layer_id().unwrap();
        let metal = document.add_material(None);
        assert_eq!(document.material(metal).unwrap().name(), "Material.2");
        let metal_layer = document.add_layer(None);

        document.delete_material(Some(first)).unwrap();
        document.check_invariants().unwrap();
        assert_eq!(document.layer(first_layer).unwrap().material, None);
        assert_eq!(document.layer(metal_layer).unwrap().material, Some(metal));
        assert_eq!(document.active_material().map(Material::id), Some(metal));

        document.delete_material(None).unwrap();
        assert!(document.materials().is_empty());
        assert!(document.active_material().is_none());
        assert_eq!(document.layer(metal_layer).unwrap().material, None);
        document.check_invariants().unwrap();

        // New layers are fine without any material.
        let bare = document.add_layer(None);
        assert_eq!(document.layer(bare).unwrap().material, None);
        document.delete_material(None).unwrap();
    }
    #[test]
    fn delete_inactive_keeps_active() {
        let mut document = Document::new();
        let first = document.materials()[0].id();
        let second = document.add_material(None);
        document.delete_material(Some(first)).unwrap();
        assert_eq!(document.active_material().map(Material::id), Some(second));
        assert!(matches!(
            document.delete_material(Some(first)),
            Err(DocumentError::MaterialNotFound(_))
        ));
    }
}
