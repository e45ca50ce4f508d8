/// Errors raised when constructing or combining grayscale images.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("invalid image dimensions (width={width}, height={height})")]
    InvalidDimensions { width: usize, height: usize },

    #[error("invalid image buffer length (expected {expected} bytes, got {got})")]
    InvalidBuffer { expected: usize, got: usize },

    #[error("image shape mismatch ({left_w}x{left_h} vs {right_w}x{right_h})")]
    ShapeMismatch {
        left_w: usize,
        left_h: usize,
        right_w: usize,
        right_h: usize,
    },
}

#[derive(Clone, Copy, Debug)]
pub struct GrayImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8], // row-major, len = w*h
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

pub(crate) fn checked_len(width: usize, height: usize) -> Result<usize, ImageError> {
    width
        .checked_mul(height)
        .ok_or(ImageError::InvalidDimensions { width, height })
}

impl<'a> GrayImageView<'a> {
    /// Wrap a row-major buffer, checking that its length matches the shape.
    pub fn new(width: usize, height: usize, data: &'a [u8]) -> Result<Self, ImageError> {
        let expected = checked_len(width, height)?;
        if data.len() != expected {
            return Err(ImageError::InvalidBuffer {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x).copied()
    }

    #[inline]
    pub fn row(&self, y: usize) -> &'a [u8] {
        &self.data[y * self.width..(y + 1) * self.width]
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Smallest and largest pixel value, `None` for an empty image.
    pub fn min_max(&self) -> Option<(u8, u8)> {
        let first = *self.data.first()?;
        Some(
            self.data
                .iter()
                .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
        )
    }

    pub fn same_shape(&self, other: &GrayImageView<'_>) -> Result<(), ImageError> {
        if self.width != other.width || self.height != other.height {
            return Err(ImageError::ShapeMismatch {
                left_w: self.width,
                left_h: self.height,
                right_w: other.width,
                right_h: other.height,
            });
        }
        Ok(())
    }
}

impl GrayImage {
    /// Black image of the given shape.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self, ImageError> {
        GrayImageView::new(width, height, &data)?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn view(&self) -> GrayImageView<'_> {
        GrayImageView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        self.view().get(x, y)
    }

    pub fn min_max(&self) -> Option<(u8, u8)> {
        self.view().min_max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_rejects_short_buffer() {
        let data = [0u8; 5];
        let err = GrayImageView::new(3, 2, &data).unwrap_err();
        assert_eq!(err, ImageError::InvalidBuffer { expected: 6, got: 5 });
    }

    #[test]
    fn overflowing_dimensions_are_rejected() {
        let err = GrayImage::from_raw(usize::MAX, 2, Vec::new()).unwrap_err();
        assert!(matches!(err, ImageError::InvalidDimensions { .. }));
    }

    #[test]
    fn get_is_bounds_checked() {
        let img = GrayImage::from_raw(2, 2, vec![1, 2, 3, 4]).expect("valid");
        assert_eq!(img.get(1, 1), Some(4));
        assert_eq!(img.get(2, 0), None);
        assert_eq!(img.view().row(1), &[3, 4]);
    }

    #[test]
    fn min_max_of_empty_is_none() {
        let img = GrayImage::new(0, 0);
        assert_eq!(img.min_max(), None);
        let img = GrayImage::from_raw(3, 1, vec![9, 2, 7]).expect("valid");
        assert_eq!(img.min_max(), Some((2, 9)));
    }
}
