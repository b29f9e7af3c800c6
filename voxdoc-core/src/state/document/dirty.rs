use super::Document;
use crate::checksum::Key;

impl Document {
    /// Key over the content of every layer, camera and material, in list order.
    /// IDs never contribute, so a snapshot and the state it was taken from share a key.
    #[must_use]
    pub fn document_key(&self) -> Key {
        let content = &self.content;
        let key = content.layers.iter().fold(Key::SEED, |key, layer| {
            let material = layer.material.and_then(|id| self.material(id).ok());
            key.fold_key(layer.key(material))
        });
        let key = content
            .cameras
            .iter()
            .fold(key, |key, camera| key.fold_key(camera.key()));
        content
            .materials
            .iter()
            .fold(key, |key, material| key.fold_key(material.hash()))
    }
}

#[cfg(test)]
mod test {
    use crate::{color::Color, state::Document};

    #[test]
    fn follows_content() {
        let mut document = Document::new();
        let initial = document.document_key();
        let layer = document.active_layer_id().unwrap();

        document.layer_mut(layer).unwrap().mesh.set_at([0, 0, 0], Color::BLACK);
        let painted = document.document_key();
        assert_ne!(painted, initial);

        document
            .layer_mut(layer)
            .unwrap()
            .mesh
            .set_at([0, 0, 0], Color::TRANSPARENT);
        assert_eq!(document.document_key(), initial);
    }
    #[test]
    fn order_matters() {
        let mut document = Document::new();
        document.add_layer(None);
        let before = document.document_key();
        document.move_layer_up(None).unwrap();
        assert_ne!(document.document_key(), before);
        document.move_layer_down(None).unwrap();
        assert_eq!(document.document_key(), before);
    }
    #[test]
    fn materials_and_cameras_count() {
        let mut document = Document::new();
        let initial = document.document_key();

        let material = document.materials()[0].id();
        document.material_mut(material).unwrap().roughness = 1.0;
        let rough = document.document_key();
        assert_ne!(rough, initial);

        let camera = document.cameras()[0].id();
        document.camera_mut(camera).unwrap().ortho = true;
        assert_ne!(document.document_key(), rough);
    }
    #[test]
    fn independent_of_ids() {
        // Same operations on two documents, so every ID differs but the content doesn't.
        let a = Document::new();
        let b = Document::new();
        assert_ne!(a.materials()[0].id(), b.materials()[0].id());
        assert_eq!(a.document_key(), b.document_key());
    }
}
