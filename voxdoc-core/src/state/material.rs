use crate::checksum::Key;

pub type MaterialID = crate::id::EntityID<Material>;

/// Surface properties shared by any number of layers.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    id: MaterialID,
    name: String,
    /// Linear RGBA multiplier of voxel colors.
    pub base_color: [f32; 4],
    pub metallic: f32,
    pub roughness: f32,
    pub emission: [f32; 3],
}
impl Material {
    pub(crate) fn new(name: String) -> Self {
        Self {
            id: MaterialID::default(),
            name,
            base_color: [1.0; 4],
            metallic: 0.2,
            roughness: 0.5,
            emission: [0.0; 3],
        }
    }
    #[must_use]
    pub fn id(&self) -> MaterialID {
        self.id
    }
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
    /// Content hash over everything but identity.
    #[must_use]
    pub fn hash(&self) -> Key {
        Key::SEED
            .fold_str(&self.name)
            .fold_pod(&self.base_color)
            .fold_pod(&self.metallic)
            .fold_pod(&self.roughness)
            .fold_pod(&self.emission)
    }
}
