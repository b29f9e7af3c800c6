//! # Shapes
//! Procedural volumes, defined within the cube `[-1, 1]^3` and placed by a [`Matrix`](super::transform::Matrix).

#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Debug,
    Default,
    strum::AsRefStr,
    strum::EnumString,
    strum::EnumIter,
    serde::Serialize,
    serde::Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Shape {
    #[default]
    Sphere,
    Cube,
    /// Round in XY, extruded along Z.
    Cylinder,
}
impl Shape {
    /// Is the point, in shape-local units, inside the volume?
    #[must_use]
    pub fn contains(self, [x, y, z]: [f32; 3]) -> bool {
        match self {
            Self::Sphere => x * x + y * y + z * z <= 1.0,
            Self::Cube => x.abs() <= 1.0 && y.abs() <= 1.0 && z.abs() <= 1.0,
            Self::Cylinder => x * x + y * y <= 1.0 && z.abs() <= 1.0,
        }
    }
    /// Stable discriminant, for keys.
    #[must_use]
    pub fn tag(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
mod test {
    use super::Shape;
    #[test]
    fn corners() {
        let corner = [0.9, 0.9, 0.9];
        assert!(Shape::Cube.contains(corner));
        assert!(!Shape::Sphere.contains(corner));
        assert!(!Shape::Cylinder.contains(corner));
        assert!(Shape::Cylinder.contains([0.6, 0.6, 0.99]));
    }
    #[test]
    fn names() {
        assert_eq!(Shape::Cylinder.as_ref(), "cylinder");
        assert_eq!("cube".parse::<Shape>(), Ok(Shape::Cube));
    }
}
