/// An affine 3D transform, in voxel units.
///
/// Also used to describe boxes: a box is the image of the cube `[-1, 1]^3` under its matrix.
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable, PartialEq)]
#[repr(C)]
pub struct Matrix {
    /// Column-major matrix elements. The last column is the translation.
    pub elements: [[f32; 4]; 4],
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<cgmath::Matrix4<f32>> for Matrix {
    fn from(value: cgmath::Matrix4<f32>) -> Self {
        Self {
            elements: value.into(),
        }
    }
}

impl From<Matrix> for cgmath::Matrix4<f32> {
    fn from(value: Matrix) -> Self {
        value.elements.into()
    }
}

impl Matrix {
    pub const IDENTITY: Self = Self {
        elements: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };
    #[must_use]
    pub fn from_translation(offset: [f32; 3]) -> Self {
        cgmath::Matrix4::from_translation(offset.into()).into()
    }
    #[must_use]
    pub fn from_scale([x, y, z]: [f32; 3]) -> Self {
        cgmath::Matrix4::from_nonuniform_scale(x, y, z).into()
    }
    /// `self * rhs`, i.e. `rhs` is applied first.
    #[must_use]
    pub fn mul(&self, rhs: &Self) -> Self {
        (cgmath::Matrix4::from(*self) * cgmath::Matrix4::from(*rhs)).into()
    }
    #[must_use]
    pub fn translation(&self) -> [f32; 3] {
        let [x, y, z, _] = self.elements[3];
        [x, y, z]
    }
    #[must_use]
    pub fn transform_point(&self, point: [f32; 3]) -> [f32; 3] {
        let matrix = cgmath::Matrix4::from(*self);
        cgmath::Transform::transform_point(&matrix, cgmath::Point3::from(point)).into()
    }
    /// Inverse of the affine part, or None if degenerate.
    #[must_use]
    pub fn inverse(&self) -> Option<Self> {
        use cgmath::SquareMatrix;
        let matrix = cgmath::Matrix4::from(*self);
        // `invert` only rejects an exactly zero determinant, slivers are null too.
        let det = matrix.determinant();
        if !det.is_finite() || det.abs() < f32::EPSILON {
            return None;
        }
        matrix.invert().map(Into::into)
    }
    /// A box with no volume, which selects nothing.
    #[must_use]
    pub fn is_null_box(&self) -> bool {
        self.inverse().is_none()
    }
    /// Integer bounds of the image of the `[-1, 1]^3` cube.
    #[must_use]
    pub fn box_bounds(&self) -> Aabb {
        let mut min = [f32::INFINITY; 3];
        let mut max = [f32::NEG_INFINITY; 3];
        for corner in 0..8 {
            let unit = [
                if corner & 1 == 0 { -1.0 } else { 1.0 },
                if corner & 2 == 0 { -1.0 } else { 1.0 },
                if corner & 4 == 0 { -1.0 } else { 1.0 },
            ];
            let point = self.transform_point(unit);
            for axis in 0..3 {
                min[axis] = min[axis].min(point[axis]);
                max[axis] = max[axis].max(point[axis]);
            }
        }
        // Saturating float -> int casts, fine for absurd boxes.
        Aabb {
            min: min.map(|v| v.floor() as i32),
            max: max.map(|v| v.ceil() as i32),
        }
    }
}

/// Integer axis-aligned box, inclusive on both ends.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct Aabb {
    pub min: [i32; 3],
    pub max: [i32; 3],
}
impl Aabb {
    #[must_use]
    pub fn center(&self) -> [f32; 3] {
        std::array::from_fn(|axis| (self.min[axis] as f32 + self.max[axis] as f32) / 2.0)
    }
    #[must_use]
    pub fn contains(&self, pos: [i32; 3]) -> bool {
        (0..3).all(|axis| self.min[axis] <= pos[axis] && pos[axis] <= self.max[axis])
    }
    /// Overlap of two boxes, None if they're disjoint.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let min = std::array::from_fn(|axis| self.min[axis].max(other.min[axis]));
        let max = std::array::from_fn(|axis| self.max[axis].min(other.max[axis]));
        (0..3)
            .all(|axis| min[axis] <= max[axis])
            .then_some(Self { min, max })
    }
    /// The box as a matrix mapping the unit cube onto it.
    #[must_use]
    pub fn as_box(&self) -> Matrix {
        let half: [f32; 3] =
            std::array::from_fn(|axis| (self.max[axis] as f32 - self.min[axis] as f32) / 2.0);
        Matrix::from_translation(self.center()).mul(&Matrix::from_scale(half))
    }
}

#[cfg(test)]
mod test {
    use super::{Aabb, Matrix};

    fn close(a: [f32; 3], b: [f32; 3]) -> bool {
        a.iter().zip(b).all(|(a, b)| (a - b).abs() < 1e-4)
    }
    #[test]
    fn compose_order() {
        // Scale first, then translate.
        let m = Matrix::from_translation([1.0, 2.0, 3.0]).mul(&Matrix::from_scale([2.0; 3]));
        assert!(close(m.transform_point([1.0, 1.0, 1.0]), [3.0, 4.0, 5.0]));
    }
    #[test]
    fn inverse_roundtrips() {
        let m = Matrix::from_translation([4.0, -2.0, 7.5]).mul(&Matrix::from_scale([2.0, 3.0, 0.5]));
        let inv = m.inverse().unwrap();
        let p = [0.25, -3.0, 11.0];
        assert!(close(inv.transform_point(m.transform_point(p)), p));
    }
    #[test]
    fn matches_cgmath() {
        use cgmath::{Matrix4, Vector3};
        let ours =
            Matrix::from_translation([1.0, -2.0, 0.5]).mul(&Matrix::from_scale([3.0, 1.0, 2.0]));
        let theirs = Matrix4::from_translation(Vector3::new(1.0, -2.0, 0.5))
            * Matrix4::from_nonuniform_scale(3.0, 1.0, 2.0);
        assert_eq!(Matrix4::from(ours), theirs);
        assert_eq!(Matrix::from(theirs), ours);
        assert_eq!(ours.translation(), [1.0, -2.0, 0.5]);
    }
    #[test]
    fn degenerate_box() {
        assert!(Matrix::from_scale([1.0, 0.0, 1.0]).is_null_box());
        assert!(Matrix::from_scale([1.0, 1e-4, 1e-4]).is_null_box());
        assert!(!Matrix::IDENTITY.is_null_box());
    }
    #[test]
    fn box_roundtrip() {
        let aabb = Aabb {
            min: [-16, -16, 0],
            max: [16, 16, 32],
        };
        assert_eq!(aabb.center(), [0.0, 0.0, 16.0]);
        assert_eq!(aabb.as_box().box_bounds(), aabb);
    }
    #[test]
    fn intersections() {
        let a = Aabb { min: [0; 3], max: [4; 3] };
        let b = Aabb { min: [2; 3], max: [8; 3] };
        let c = Aabb { min: [5; 3], max: [6; 3] };
        assert_eq!(a.intersect(&b), Some(Aabb { min: [2; 3], max: [4; 3] }));
        assert_eq!(a.intersect(&c), None);
    }
}
