use crate::color::Color;

/// How voxels of one mesh are combined onto another.
#[derive(
    strum::AsRefStr, PartialEq, Eq, strum::EnumIter, Copy, Clone, Hash, Debug, Default,
)]
#[repr(u8)]
pub enum BlendMode {
    /// Source composited on top of destination.
    #[default]
    Over,
    /// Source alpha carves away the destination.
    Sub,
}
impl BlendMode {
    /// Combine a source voxel onto an optional destination voxel. `None` means empty space.
    #[must_use]
    pub fn apply(self, dst: Option<Color>, src: Color) -> Option<Color> {
        match self {
            Self::Over => Some(match dst {
                _ if src.alpha() == 0 => return dst,
                None => src,
                Some(dst) => over(src, dst),
            }),
            Self::Sub => {
                let dst = dst?;
                let alpha = dst.alpha().saturating_sub(src.alpha());
                (alpha != 0).then(|| Color::new(dst.0[0], dst.0[1], dst.0[2], alpha))
            }
        }
    }
}

/// Straight alpha "over" operator, in integer space.
fn over(src: Color, dst: Color) -> Color {
    let sa = u32::from(src.alpha());
    let da = u32::from(dst.alpha());
    // out_a = sa + da(1 - sa), all scaled by 255
    let out_a_255 = sa * 255 + da * (255 - sa);
    if out_a_255 == 0 {
        return Color::TRANSPARENT;
    }
    let channel = |s: u8, d: u8| -> u8 {
        let num = u32::from(s) * sa * 255 + u32::from(d) * da * (255 - sa);
        // Weighted average of two u8s can't exceed u8::MAX.
        u8::try_from((num + out_a_255 / 2) / out_a_255).unwrap_or(u8::MAX)
    };
    Color::new(
        channel(src.0[0], dst.0[0]),
        channel(src.0[1], dst.0[1]),
        channel(src.0[2], dst.0[2]),
        u8::try_from((out_a_255 + 127) / 255).unwrap_or(u8::MAX),
    )
}

#[cfg(test)]
mod test {
    use super::BlendMode;
    use crate::color::Color;

    const RED: Color = Color::new(255, 0, 0, 255);
    const BLUE: Color = Color::new(0, 0, 255, 255);

    #[test]
    fn opaque_over_replaces() {
        assert_eq!(BlendMode::Over.apply(Some(BLUE), RED), Some(RED));
        assert_eq!(BlendMode::Over.apply(None, RED), Some(RED));
    }
    #[test]
    fn transparent_over_is_noop() {
        assert_eq!(BlendMode::Over.apply(Some(BLUE), Color::TRANSPARENT), Some(BLUE));
        assert_eq!(BlendMode::Over.apply(None, Color::TRANSPARENT), None);
    }
    #[test]
    fn half_over_mixes() {
        let half_red = Color::new(255, 0, 0, 128);
        let Some(mixed) = BlendMode::Over.apply(Some(BLUE), half_red) else {
            panic!("over an opaque voxel can't vanish");
        };
        assert_eq!(mixed.alpha(), 255);
        assert!(mixed.0[0] > 120 && mixed.0[0] < 135, "{mixed:?}");
        assert!(mixed.0[2] > 120 && mixed.0[2] < 135, "{mixed:?}");
    }
    #[test]
    fn sub_carves() {
        assert_eq!(BlendMode::Sub.apply(Some(BLUE), Color::WHITE), None);
        assert_eq!(BlendMode::Sub.apply(None, Color::WHITE), None);
        assert_eq!(
            BlendMode::Sub.apply(Some(BLUE), Color::new(0, 0, 0, 55)),
            Some(Color::new(0, 0, 255, 200))
        );
    }
}
