//! Conversions to the 8-bit representation every filter works on.

use crate::image::{checked_len, GrayImage, ImageError};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConvertError {
    #[error(transparent)]
    Image(#[from] ImageError),
    #[error("float pixel {index} = {value} is outside [0, 1]")]
    OutOfRange { index: usize, value: f32 },
}

fn check_len(width: usize, height: usize, got: usize) -> Result<(), ImageError> {
    let expected = checked_len(width, height)?;
    if got != expected {
        return Err(ImageError::InvalidBuffer { expected, got });
    }
    Ok(())
}

/// Scale float intensities in `[0, 1]` to `0..=255`, rounding to nearest.
pub fn ubyte_from_f32(
    width: usize,
    height: usize,
    data: &[f32],
) -> Result<GrayImage, ConvertError> {
    check_len(width, height, data.len())?;
    let mut out = Vec::with_capacity(data.len());
    for (index, &value) in data.iter().enumerate() {
        if !(0.0..=1.0).contains(&value) {
            return Err(ConvertError::OutOfRange { index, value });
        }
        out.push((value * 255.0).round() as u8);
    }
    Ok(GrayImage {
        width,
        height,
        data: out,
    })
}

/// Keep the high byte of each 16-bit sample.
pub fn ubyte_from_u16(
    width: usize,
    height: usize,
    data: &[u16],
) -> Result<GrayImage, ConvertError> {
    check_len(width, height, data.len())?;
    Ok(GrayImage {
        width,
        height,
        data: data.iter().map(|&v| (v >> 8) as u8).collect(),
    })
}

/// `false -> 0`, `true -> 255`.
pub fn ubyte_from_bool(
    width: usize,
    height: usize,
    data: &[bool],
) -> Result<GrayImage, ConvertError> {
    check_len(width, height, data.len())?;
    Ok(GrayImage {
        width,
        height,
        data: data.iter().map(|&v| if v { 255 } else { 0 }).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_endpoints_map_to_full_range() {
        let img = ubyte_from_f32(3, 1, &[0.0, 0.5, 1.0]).expect("in range");
        assert_eq!(img.data, vec![0, 128, 255]);
    }

    #[test]
    fn float_outside_unit_interval_is_rejected() {
        let err = ubyte_from_f32(2, 1, &[0.2, -0.1]).unwrap_err();
        assert_eq!(
            err,
            ConvertError::OutOfRange {
                index: 1,
                value: -0.1
            }
        );
        assert!(ubyte_from_f32(1, 1, &[f32::NAN]).is_err());
    }

    #[test]
    fn u16_keeps_high_byte() {
        let img = ubyte_from_u16(3, 1, &[0, 0x80ff, u16::MAX]).expect("valid");
        assert_eq!(img.data, vec![0, 0x80, 0xff]);
    }

    #[test]
    fn bool_maps_to_black_and_white() {
        let img = ubyte_from_bool(2, 1, &[false, true]).expect("valid");
        assert_eq!(img.data, vec![0, 255]);
    }

    #[test]
    fn length_mismatch_is_an_image_error() {
        let err = ubyte_from_bool(2, 2, &[true]).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Image(ImageError::InvalidBuffer { expected: 4, got: 1 })
        ));
    }
}
