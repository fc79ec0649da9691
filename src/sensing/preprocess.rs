use std::io::Cursor;

use image::{imageops, DynamicImage, GrayImage, ImageFormat};

use crate::settings::OcrSettings;

use super::CaptureError;

/// Grayscale, blur and binarise a frame so the seven-segment digits stand out.
/// Returns the processed image as PNG bytes.
pub fn prepare(frame: &[u8], settings: &OcrSettings) -> Result<Vec<u8>, CaptureError> {
    let gray = image::load_from_memory(frame)?.to_luma8();
    let mut processed = imageops::blur(&gray, settings.blur_sigma);
    threshold(&mut processed, settings.threshold);

    let mut png = Vec::new();
    DynamicImage::ImageLuma8(processed).write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(png)
}

/// Pixels brighter than `level` become white, everything else black.
pub fn threshold(image: &mut GrayImage, level: u8) {
    for pixel in image.pixels_mut() {
        pixel.0[0] = if pixel.0[0] > level { 255 } else { 0 };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb, RgbImage};

    #[test]
    fn threshold_is_strictly_above_level() {
        let mut image = GrayImage::from_fn(3, 1, |x, _| Luma([[149u8, 150, 151][x as usize]]));
        threshold(&mut image, 150);
        assert_eq!(image.into_raw(), vec![0, 0, 255]);
    }

    #[test]
    fn prepared_frame_is_binary() {
        let frame = RgbImage::from_fn(16, 16, |x, _| {
            if x < 8 {
                Rgb([20, 20, 20])
            } else {
                Rgb([240, 240, 240])
            }
        });
        let mut png = Vec::new();
        DynamicImage::ImageRgb8(frame)
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();

        let processed = prepare(&png, &OcrSettings::default()).unwrap();
        let decoded = image::load_from_memory(&processed).unwrap().to_luma8();

        assert_eq!(decoded.dimensions(), (16, 16));
        assert!(decoded.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
        assert_eq!(decoded.get_pixel(0, 0).0[0], 0);
        assert_eq!(decoded.get_pixel(15, 0).0[0], 255);
    }

    #[test]
    fn garbage_frame_is_an_image_error() {
        let err = prepare(b"not a png", &OcrSettings::default()).unwrap_err();
        assert!(matches!(err, CaptureError::Image(_)));
    }
}
