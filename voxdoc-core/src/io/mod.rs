//! # Image input
//!
//! Decoding of pictures that image layers reference. Only the decoded pixels cross into the document,
//! the files themselves are never kept open.

#[derive(thiserror::Error, Debug)]
pub enum ImageError {
    #[error("failed to decode {path:?}: {source}")]
    Decode {
        path: std::path::PathBuf,
        source: image::ImageError,
    },
    #[error("image {path:?} is empty")]
    Empty { path: std::path::PathBuf },
}

/// Tightly packed, row-major pixels, top row first.
pub struct DecodedImage {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// 3 for RGB sources, 4 for anything with alpha.
    pub bytes_per_pixel: usize,
}
impl DecodedImage {
    /// Bytes of the pixel at (x, y), or None if out of bounds.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * self.bytes_per_pixel;
        self.pixels.get(idx..idx + self.bytes_per_pixel)
    }
}

/// Read and decode a picture, normalizing it to 8 bit RGB or RGBA.
/// # Errors
/// If the file can't be read or isn't a supported picture, or has no pixels.
pub fn decode(path: &std::path::Path) -> Result<DecodedImage, ImageError> {
    let image = image::open(path).map_err(|source| ImageError::Decode {
        path: path.to_owned(),
        source,
    })?;
    if image.width() == 0 || image.height() == 0 {
        return Err(ImageError::Empty {
            path: path.to_owned(),
        });
    }
    let (width, height) = (image.width(), image.height());
    let (pixels, bytes_per_pixel) = if image.color().has_alpha() {
        (image.into_rgba8().into_raw(), 4)
    } else {
        (image.into_rgb8().into_raw(), 3)
    };
    log::trace!("Decoded {path:?}: {width}x{height}, {bytes_per_pixel} bytes per pixel");
    Ok(DecodedImage {
        pixels,
        width,
        height,
        bytes_per_pixel,
    })
}

/// Read just the size of a picture, without decoding the pixels.
/// # Errors
/// If the file can't be read or isn't a supported picture.
pub fn dimensions(path: &std::path::Path) -> Result<(u32, u32), ImageError> {
    image::image_dimensions(path).map_err(|source| ImageError::Decode {
        path: path.to_owned(),
        source,
    })
}

#[cfg(test)]
pub(crate) mod test {
    /// Write a small picture into a fresh temporary path.
    pub(crate) fn write_png(name: &str, pixels: &[[u8; 4]], width: u32) -> std::path::PathBuf {
        let height = u32::try_from(pixels.len()).unwrap() / width;
        let mut image = image::RgbaImage::new(width, height);
        for (idx, pixel) in pixels.iter().enumerate() {
            let idx = u32::try_from(idx).unwrap();
            image.put_pixel(idx % width, idx / width, image::Rgba(*pixel));
        }
        let mut path = std::env::temp_dir();
        path.push(format!("voxdoc-{}-{name}.png", std::process::id()));
        image.save(&path).unwrap();
        path
    }

    #[test]
    fn decode_rgba() {
        let path = write_png("decode", &[[255, 0, 0, 255], [0, 255, 0, 128]], 2);
        let decoded = super::decode(&path).unwrap();
        assert_eq!((decoded.width, decoded.height), (2, 1));
        assert_eq!(decoded.bytes_per_pixel, 4);
        assert_eq!(decoded.pixel(1, 0), Some([0, 255, 0, 128].as_slice()));
        assert_eq!(decoded.pixel(2, 0), None);
        assert_eq!(super::dimensions(&path).unwrap(), (2, 1));
        let _ = std::fs::remove_file(path);
    }
    #[test]
    fn missing_file() {
        let err = super::decode(std::path::Path::new("/definitely/not/here.png"));
        assert!(matches!(err, Err(super::ImageError::Decode { .. })));
    }
}
