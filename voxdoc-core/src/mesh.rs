//! # Meshes
//!
//! Sparse voxel content owned by a layer. Voxels are keyed by their integer position, which is also the position of
//! their center. Storage is ordered, so iteration and [`Mesh::content_key`] are deterministic.

use crate::{
    blend::BlendMode,
    checksum::Key,
    color::Color,
    state::{
        shape::Shape,
        transform::{Aabb, Matrix},
    },
};

pub type Position = [i32; 3];

#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct Mesh {
    voxels: std::collections::BTreeMap<Position, Color>,
}
impl Mesh {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }
    /// Number of filled voxels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.voxels.len()
    }
    #[must_use]
    pub fn get(&self, pos: Position) -> Option<Color> {
        self.voxels.get(&pos).copied()
    }
    /// Write a single voxel. A fully transparent color empties it.
    pub fn set_at(&mut self, pos: Position, color: Color) {
        if color.alpha() == 0 {
            self.voxels.remove(&pos);
        } else {
            self.voxels.insert(pos, color);
        }
    }
    pub fn iter(&self) -> impl Iterator<Item = (Position, Color)> + '_ {
        self.voxels.iter().map(|(pos, color)| (*pos, *color))
    }
    /// Replace all content with a copy of `other`'s.
    pub fn set(&mut self, other: &Mesh) {
        self.voxels.clone_from(&other.voxels);
    }
    pub fn clear(&mut self) {
        self.voxels.clear();
    }
    /// Move every voxel through `matrix`, rounding to the nearest position.
    /// Where several voxels land on one position, the last in storage order wins.
    pub fn apply_transform(&mut self, matrix: &Matrix) {
        if *matrix == Matrix::IDENTITY {
            return;
        }
        let voxels = std::mem::take(&mut self.voxels);
        self.voxels = voxels
            .into_iter()
            .map(|(pos, color)| {
                let moved = matrix.transform_point(pos.map(|v| v as f32));
                (moved.map(|v| v.round() as i32), color)
            })
            .collect();
    }
    /// Blend every voxel of `src` onto self.
    pub fn merge(&mut self, src: &Mesh, mode: BlendMode) {
        for (pos, color) in src.iter() {
            match mode.apply(self.get(pos), color) {
                Some(color) => {
                    self.voxels.insert(pos, color);
                }
                None => {
                    self.voxels.remove(&pos);
                }
            }
        }
    }
    /// Fill the volume of `shape` placed by `transform` with `color`, blended with `mode`.
    /// Nothing outside `clip` is touched.
    pub fn rasterize_shape(
        &mut self,
        shape: Shape,
        transform: &Matrix,
        color: Color,
        mode: BlendMode,
        clip: Option<&Aabb>,
    ) {
        let Some(inverse) = transform.inverse() else {
            // Flat shapes have no volume.
            return;
        };
        let bounds = transform.box_bounds();
        let Some(bounds) = clip.map_or(Some(bounds), |clip| clip.intersect(&bounds)) else {
            return;
        };
        for x in bounds.min[0]..=bounds.max[0] {
            for y in bounds.min[1]..=bounds.max[1] {
                for z in bounds.min[2]..=bounds.max[2] {
                    let local = inverse.transform_point([x as f32, y as f32, z as f32]);
                    if !shape.contains(local) {
                        continue;
                    }
                    let pos = [x, y, z];
                    match mode.apply(self.get(pos), color) {
                        Some(color) => {
                            self.voxels.insert(pos, color);
                        }
                        None => {
                            self.voxels.remove(&pos);
                        }
                    }
                }
            }
        }
    }
    /// Key that changes whenever the content does.
    #[must_use]
    pub fn content_key(&self) -> Key {
        self.voxels
            .iter()
            .fold(Key::SEED.fold(&(self.voxels.len() as u64).to_le_bytes()), |key, (pos, color)| {
                key.fold_pod(pos).fold_pod(color)
            })
    }
}
