//! Adapters between `image::GrayImage` and the workspace image types.

use crate::CompareError;
use ::image::DynamicImage;
use rank_otsu_core::{ubyte_from_f32, ubyte_from_u16, GrayImage, GrayImageView, ImageError};
use std::path::Path;

/// Borrow an `image::GrayImage` as a [`GrayImageView`].
pub fn gray_view(img: &::image::GrayImage) -> GrayImageView<'_> {
    GrayImageView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
    }
}

/// Copy an `image::GrayImage` into an owned [`GrayImage`].
pub fn from_image(img: &::image::GrayImage) -> GrayImage {
    GrayImage {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw().clone(),
    }
}

/// Convert a [`GrayImageView`] into an `image::GrayImage`.
pub fn to_image(view: &GrayImageView<'_>) -> Result<::image::GrayImage, ImageError> {
    let invalid = ImageError::InvalidDimensions {
        width: view.width,
        height: view.height,
    };
    let w = u32::try_from(view.width).map_err(|_| invalid.clone())?;
    let h = u32::try_from(view.height).map_err(|_| invalid.clone())?;
    ::image::GrayImage::from_raw(w, h, view.data.to_vec()).ok_or(invalid)
}

/// Reduce a decoded image to 8-bit gray.
///
/// 16-bit images are reduced to 16-bit luma and keep its high byte. Float
/// images are scaled from `[0, 1]`. Everything else goes through `image`'s
/// 8-bit luma conversion.
pub fn to_gray(decoded: &DynamicImage) -> Result<GrayImage, CompareError> {
    let (w, h) = (decoded.width() as usize, decoded.height() as usize);
    let gray = match decoded {
        DynamicImage::ImageLuma16(img) => ubyte_from_u16(w, h, img.as_raw())?,
        DynamicImage::ImageLumaA16(_)
        | DynamicImage::ImageRgb16(_)
        | DynamicImage::ImageRgba16(_) => {
            ubyte_from_u16(w, h, decoded.to_luma16().as_raw())?
        }
        DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => {
            ubyte_from_f32(w, h, decoded.to_luma32f().as_raw())?
        }
        _ => from_image(&decoded.to_luma8()),
    };
    Ok(gray)
}

/// Decode any supported image file and convert it to 8-bit gray.
pub fn load_gray(path: impl AsRef<Path>) -> Result<GrayImage, CompareError> {
    let path = path.as_ref();
    let decoded = ::image::open(path).map_err(|source| CompareError::Decode {
        path: path.display().to_string(),
        source,
    })?;
    let gray = to_gray(&decoded)?;
    log::debug!(
        "loaded {} ({}x{}, {:?})",
        path.display(),
        gray.width,
        gray.height,
        decoded.color()
    );
    Ok(gray)
}

/// Encode a gray image; the format follows the file extension.
pub fn save_gray(view: &GrayImageView<'_>, path: impl AsRef<Path>) -> Result<(), CompareError> {
    let path = path.as_ref();
    let img = to_image(view)?;
    img.save(path).map_err(|source| CompareError::Encode {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions_preserve_pixels() {
        let raw = ::image::GrayImage::from_fn(5, 3, |x, y| ::image::Luma([(x * 10 + y) as u8]));
        let view = gray_view(&raw);
        assert_eq!((view.width, view.height), (5, 3));
        assert_eq!(view.get(4, 2), Some(42));

        let owned = from_image(&raw);
        let back = to_image(&owned.view()).expect("convert");
        assert_eq!(back, raw);
    }

    #[test]
    fn wide_samples_are_reduced_to_bytes() {
        let deep: ::image::ImageBuffer<::image::Luma<u16>, Vec<u16>> =
            ::image::ImageBuffer::from_raw(3, 1, vec![0, 0x80ff, 0xffff]).expect("buffer");
        let gray = to_gray(&DynamicImage::ImageLuma16(deep)).expect("u16");
        assert_eq!(gray.data, vec![0, 0x80, 0xff]);

        let float = ::image::Rgb32FImage::from_raw(2, 1, vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0])
            .expect("buffer");
        let gray = to_gray(&DynamicImage::ImageRgb32F(float)).expect("f32");
        assert_eq!(gray.data, vec![0, 255]);
    }

    #[test]
    fn every_16_bit_layout_keeps_the_high_byte() {
        let samples = vec![0x01ff, 0x01ff, 0x01ff, 0xff00, 0xff00, 0xff00];
        let rgb: ::image::ImageBuffer<::image::Rgb<u16>, Vec<u16>> =
            ::image::ImageBuffer::from_raw(2, 1, samples).expect("buffer");
        let gray = to_gray(&DynamicImage::ImageRgb16(rgb.clone())).expect("rgb16");
        assert_eq!(gray.data, vec![0x01, 0xff]);

        let rgba = DynamicImage::ImageRgb16(rgb).to_rgba16();
        let gray = to_gray(&DynamicImage::ImageRgba16(rgba)).expect("rgba16");
        assert_eq!(gray.data, vec![0x01, 0xff]);

        let gray_alpha: ::image::ImageBuffer<::image::LumaA<u16>, Vec<u16>> =
            ::image::ImageBuffer::from_raw(2, 1, vec![0x01ff, 0xffff, 0x80ff, 0]).expect("buffer");
        let gray = to_gray(&DynamicImage::ImageLumaA16(gray_alpha)).expect("la16");
        assert_eq!(gray.data, vec![0x01, 0x80]);
    }

    #[test]
    fn save_then_load_png() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("page.png");
        let img = crate::data::page();
        save_gray(&img.view(), &path).expect("save");
        let loaded = load_gray(&path).expect("load");
        assert_eq!(loaded, img);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_gray("/nonexistent/page.png").unwrap_err();
        match err {
            CompareError::Decode { path, .. } => assert!(path.ends_with("page.png")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
