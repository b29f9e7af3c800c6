//! # Content keys
//!
//! A [`Key`] is a 32 bit checksum folded over content, used to tell whether anything changed since it was last taken.
//! Keys compose: folding bytes into a key yields a new key that depends on both, in order.
//!
//! Not cryptographic, and not stable across versions of this crate - never persist them.

static CRC: crc::Crc<u32> = crc::Crc::<u32>::new(&crc::CRC_32_ISO_HDLC);

#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(transparent)]
pub struct Key(pub u32);
impl Key {
    /// Starting state for every fold.
    pub const SEED: Self = Self(0);

    /// Fold some bytes into this key.
    #[must_use]
    pub fn fold(self, bytes: &[u8]) -> Self {
        let mut digest = CRC.digest();
        digest.update(&self.0.to_le_bytes());
        digest.update(bytes);
        Self(digest.finalize())
    }
    /// Fold the in-memory bytes of a plain-old-data value.
    #[must_use]
    pub fn fold_pod<T: bytemuck::NoUninit>(self, value: &T) -> Self {
        self.fold(bytemuck::bytes_of(value))
    }
    /// Fold another key into this one.
    #[must_use]
    pub fn fold_key(self, other: Key) -> Self {
        self.fold(&other.0.to_le_bytes())
    }
    /// Fold a string, length prefixed so that neighboring strings can't trade bytes.
    #[must_use]
    pub fn fold_str(self, str: &str) -> Self {
        // Length is bounded by memory, u64 can always hold it.
        self.fold(&(str.len() as u64).to_le_bytes())
            .fold(str.as_bytes())
    }
    #[must_use]
    pub fn fold_bool(self, value: bool) -> Self {
        self.fold(&[u8::from(value)])
    }
}
impl std::fmt::Debug for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Key({:08X})", self.0)
    }
}

#[cfg(test)]
mod test {
    use super::Key;
    #[test]
    fn deterministic() {
        let a = Key::SEED.fold(b"voxels");
        let b = Key::SEED.fold(b"voxels");
        assert_eq!(a, b);
        assert_ne!(a, Key::SEED.fold(b"voxel"));
    }
    #[test]
    fn order_matters() {
        let ab = Key::SEED.fold_key(Key(1)).fold_key(Key(2));
        let ba = Key::SEED.fold_key(Key(2)).fold_key(Key(1));
        assert_ne!(ab, ba);
    }
    #[test]
    fn strings_dont_bleed() {
        let split_early = Key::SEED.fold_str("ab").fold_str("c");
        let split_late = Key::SEED.fold_str("a").fold_str("bc");
        assert_ne!(split_early, split_late);
    }
    #[test]
    fn fmt_debug() {
        assert_eq!(format!("{:?}", Key(0xBEEF)), "Key(0000BEEF)");
    }
}
