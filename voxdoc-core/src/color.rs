/// A straight (non-premultiplied) 8 bit per channel RGBA color, as stored in a voxel.
#[repr(transparent)]
#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Debug,
    bytemuck::Pod,
    bytemuck::Zeroable,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct Color(pub [u8; 4]);
impl Color {
    pub const TRANSPARENT: Self = Self([0; 4]);
    pub const WHITE: Self = Self([255; 4]);
    pub const BLACK: Self = Self([0, 0, 0, 255]);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }
    #[must_use]
    pub const fn alpha(self) -> u8 {
        self.0[3]
    }
    /// Take the first `bytes.len()` channels from a pixel, with alpha defaulting to opaque.
    /// Any channels past four are ignored.
    #[must_use]
    pub fn from_pixel(bytes: &[u8]) -> Self {
        let mut channels = [0, 0, 0, 255];
        channels
            .iter_mut()
            .zip(bytes)
            .for_each(|(channel, byte)| *channel = *byte);
        Self(channels)
    }
}
impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}
impl From<[u8; 4]> for Color {
    fn from(value: [u8; 4]) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod test {
    use super::Color;
    #[test]
    fn pixel_channels() {
        assert_eq!(Color::from_pixel(&[1, 2, 3]), Color::new(1, 2, 3, 255));
        assert_eq!(Color::from_pixel(&[1, 2, 3, 4]), Color::new(1, 2, 3, 4));
        // Greyscale still only fills red. Callers expand if they want grey.
        assert_eq!(Color::from_pixel(&[9]), Color::new(9, 0, 0, 255));
    }
}
