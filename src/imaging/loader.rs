//! Decoding of uploaded image files

use image::{ImageFormat, RgbImage};
use sha2::{Digest, Sha256};
use std::path::Path;
use tracing::debug;

use crate::error::DecodeError;

/// Upload extensions accepted by the file picker
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["jpg", "png", "jpeg"];

/// Check whether a file name carries one of the accepted extensions
pub fn is_supported_upload(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Decode PNG or JPEG bytes into an RGB pixel grid
pub fn load_image(bytes: &[u8]) -> Result<RgbImage, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }

    let format = image::guess_format(bytes)?;
    if !matches!(format, ImageFormat::Png | ImageFormat::Jpeg) {
        return Err(DecodeError::UnsupportedFormat(
            format.extensions_str().first().copied().unwrap_or("unknown").to_string(),
        ));
    }

    let decoded = image::load_from_memory_with_format(bytes, format)?;
    let rgb = decoded.to_rgb8();
    debug!("Decoded {:?} image {}x{}", format, rgb.width(), rgb.height());

    Ok(rgb)
}

/// SHA-256 of the uploaded bytes, used to skip redecoding the same upload
pub fn fingerprint(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};
    use std::io::Cursor;

    /// Encode a small image with distinct corner colors
    pub(crate) fn encode_test_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let img: RgbImage = ImageBuffer::from_fn(width, height, |x, y| {
            if x == 0 && y == 0 {
                Rgb([255, 0, 0])
            } else {
                Rgb([0, 0, 255])
            }
        });
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), format).unwrap();
        bytes
    }

    #[test]
    fn test_supported_upload_names() {
        assert!(is_supported_upload("scan.png"));
        assert!(is_supported_upload("photo.JPG"));
        assert!(is_supported_upload("/tmp/some.dir/receipt.jpeg"));
        assert!(!is_supported_upload("anim.gif"));
        assert!(!is_supported_upload("no_extension"));
    }

    #[test]
    fn test_png_dimensions_and_channel_order() {
        let bytes = encode_test_image(7, 5, ImageFormat::Png);
        let img = load_image(&bytes).unwrap();

        assert_eq!(img.dimensions(), (7, 5));
        // Red stays in the first channel
        assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0]);
        assert_eq!(img.get_pixel(3, 3).0, [0, 0, 255]);
    }

    #[test]
    fn test_jpeg_decodes_to_rgb() {
        let bytes = encode_test_image(32, 16, ImageFormat::Jpeg);
        let img = load_image(&bytes).unwrap();

        assert_eq!(img.dimensions(), (32, 16));
        let px = img.get_pixel(20, 10).0;
        // Lossy, but blue must dominate
        assert!(px[2] > 200 && px[0] < 60, "unexpected pixel {:?}", px);
    }

    #[test]
    fn test_malformed_bytes_rejected() {
        let err = load_image(b"definitely not an image").unwrap_err();
        assert!(matches!(err, DecodeError::Malformed(_)));

        // PNG signature followed by garbage
        let mut truncated = encode_test_image(4, 4, ImageFormat::Png);
        truncated.truncate(20);
        assert!(load_image(&truncated).is_err());
    }

    #[test]
    fn test_other_formats_rejected() {
        let bytes = encode_test_image(4, 4, ImageFormat::Bmp);
        let err = load_image(&bytes).unwrap_err();
        assert!(matches!(err, DecodeError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_empty_upload() {
        assert!(matches!(load_image(&[]), Err(DecodeError::Empty)));
    }

    #[test]
    fn test_fingerprint_is_stable() {
        let a = fingerprint(b"hello");
        assert_eq!(a, fingerprint(b"hello"));
        assert_ne!(a, fingerprint(b"hello!"));
        assert_eq!(a.len(), 64);
    }
}
