//! Boundary checks for pixel buffers handed to an external image writer.
//!
//! The runtime does not encode images. It only verifies that a frame or
//! palette has the exact length the writer expects.

use derive_more::Display;

use crate::bytes::Bytes;
use crate::error::{RtResult, RuntimeError};
use crate::value::Value;

/// Palette entries times RGB components.
pub const PALETTE_LEN: usize = 256 * 3;

#[derive(Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channels {
    /// One palette index per pixel.
    #[display("indexed")]
    Indexed,
    #[display("rgb")]
    Rgb,
}

impl Channels {
    pub fn count(self) -> usize {
        match self {
            Channels::Indexed => 1,
            Channels::Rgb => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameShape {
    pub width: usize,
    pub height: usize,
    pub channels: Channels,
}

impl FrameShape {
    pub fn new(width: i64, height: i64, channels: Channels) -> RtResult<Self> {
        let dimension = |name: &str, n: i64| {
            usize::try_from(n).map_err(|_| {
                RuntimeError::value_error(
                    "frame",
                    format_args!("{name} must not be negative"),
                    &Value::Int(n),
                )
            })
        };
        Ok(FrameShape {
            width: dimension("width", width)?,
            height: dimension("height", height)?,
            channels,
        })
    }

    /// Number of bytes a frame of this shape holds.
    pub fn expected_len(&self) -> Option<usize> {
        self.width
            .checked_mul(self.height)?
            .checked_mul(self.channels.count())
    }
}

/// Verifies that `frame` holds exactly `width * height * channels` bytes.
pub fn check_frame(shape: &FrameShape, frame: &[u8]) -> RtResult<()> {
    match shape.expected_len() {
        Some(expected) if expected == frame.len() => Ok(()),
        expected => Err(RuntimeError::value_error(
            "check_frame",
            format_args!(
                "{}x{} {} frame needs {} bytes",
                shape.width,
                shape.height,
                shape.channels,
                expected.map_or_else(|| "more than usize::MAX".to_owned(), |n| n.to_string()),
            ),
            &Value::Int(i64::try_from(frame.len()).unwrap_or(i64::MAX)),
        )),
    }
}

/// Verifies that `palette` holds 256 RGB triples.
pub fn check_palette(palette: &[u8]) -> RtResult<()> {
    if palette.len() == PALETTE_LEN {
        Ok(())
    } else {
        Err(RuntimeError::value_error(
            "check_palette",
            format_args!("palette needs {PALETTE_LEN} bytes"),
            &Value::Int(i64::try_from(palette.len()).unwrap_or(i64::MAX)),
        ))
    }
}

/// The 256-entry palette mapping index `i` to `(i, i, i)`.
pub fn grayscale_palette() -> Bytes {
    (0..=u8::MAX)
        .flat_map(|i| [i, i, i])
        .collect::<Vec<u8>>()
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_length_must_match_shape() {
        let shape = FrameShape::new(4, 2, Channels::Rgb).unwrap();
        assert_eq!(shape.expected_len(), Some(24));
        assert!(check_frame(&shape, &[0; 24]).is_ok());
        let err = check_frame(&shape, &[0; 8]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "ValueError: check_frame: 4x2 rgb frame needs 24 bytes, got 8 (int)"
        );

        let indexed = FrameShape::new(4, 2, Channels::Indexed).unwrap();
        assert!(check_frame(&indexed, &[0; 8]).is_ok());
    }

    #[test]
    fn negative_dimensions_are_rejected() {
        let err = FrameShape::new(-1, 2, Channels::Indexed).unwrap_err();
        assert_eq!(err.name(), "ValueError");
    }

    #[test]
    fn grayscale_palette_is_valid() {
        let palette = grayscale_palette();
        assert!(check_palette(&palette).is_ok());
        assert_eq!(&palette[..6], &[0, 0, 0, 1, 1, 1]);
        assert_eq!(&palette[765..], &[255, 255, 255]);
        assert!(check_palette(&palette[1..]).is_err());
    }
}
