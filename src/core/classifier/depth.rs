//! Colour depth detection from the stored pixel layout.

use crate::error::ClassifyError;
use image::{DynamicImage, ExtendedColorType, ImageDecoder, ImageFormat, ImageReader};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Bits per pixel of an image, or unknown when the layout is not recognized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorDepth {
    Bits(u8),
    Unknown,
}

impl ColorDepth {
    /// Bit count, with -1 standing for unknown
    pub fn bits(&self) -> i32 {
        match self {
            ColorDepth::Bits(bits) => i32::from(*bits),
            ColorDepth::Unknown => -1,
        }
    }

    /// True for known depths in `1..=8`
    pub fn is_low_color(&self) -> bool {
        matches!(self, ColorDepth::Bits(bits) if (1..=8).contains(bits))
    }
}

impl std::fmt::Display for ColorDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColorDepth::Bits(bits) => write!(f, "{}-bit", bits),
            ColorDepth::Unknown => write!(f, "unknown depth"),
        }
    }
}

/// Map a direct-colour pixel layout to a colour depth.
///
/// Only multi-channel or wide layouts have a meaningful bit count here.
/// Narrow grayscale (`L8`, `L4`, `L1`) is not a palette and reads as unknown.
pub fn color_depth_of_layout(layout: ExtendedColorType) -> ColorDepth {
    use ExtendedColorType as Layout;

    match layout {
        Layout::Rgba16 => ColorDepth::Bits(64),
        Layout::Rgb16 => ColorDepth::Bits(48),
        Layout::Rgba8 | Layout::La16 => ColorDepth::Bits(32),
        Layout::Rgb8 => ColorDepth::Bits(24),
        Layout::La8 | Layout::L16 => ColorDepth::Bits(16),
        _ => ColorDepth::Unknown,
    }
}

/// Map the index width of a palette image to a colour depth
pub fn color_depth_of_palette(index_bits: u8) -> ColorDepth {
    match index_bits {
        bits @ (1 | 4 | 8) => ColorDepth::Bits(bits),
        _ => ColorDepth::Unknown,
    }
}

/// Decode the image at `path` and report its colour depth.
///
/// The whole image is decoded, so truncated or corrupt pixel data is an error
/// even when the header is readable. Decoders expand palettes to RGB, so the
/// palette index width is read back from the file header.
pub fn color_depth(path: &Path) -> Result<ColorDepth, ClassifyError> {
    let decode_error = |e: image::ImageError| ClassifyError::DecodeError {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    let reader = ImageReader::open(path)
        .map_err(|source| io_error(path, source))?
        .with_guessed_format()
        .map_err(|source| io_error(path, source))?;
    let format = reader.format();

    let decoder = reader.into_decoder().map_err(decode_error)?;
    let layout = decoder.original_color_type();
    DynamicImage::from_decoder(decoder).map_err(decode_error)?;

    match palette_index_bits(path, format)? {
        Some(bits) => Ok(color_depth_of_palette(bits)),
        None => Ok(color_depth_of_layout(layout)),
    }
}

/// Index width of a palette image, read from its header
fn palette_index_bits(path: &Path, format: Option<ImageFormat>) -> Result<Option<u8>, ClassifyError> {
    match format {
        // GIF frames are always palette-indexed
        Some(ImageFormat::Gif) => Ok(Some(8)),
        Some(ImageFormat::Png) => png_palette_bits(path),
        Some(ImageFormat::Bmp) => bmp_palette_bits(path),
        _ => Ok(None),
    }
}

fn png_palette_bits(path: &Path) -> Result<Option<u8>, ClassifyError> {
    let file = File::open(path).map_err(|source| io_error(path, source))?;
    let reader = png::Decoder::new(BufReader::new(file))
        .read_info()
        .map_err(|e| ClassifyError::DecodeError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let info = reader.info();
    Ok((info.color_type == png::ColorType::Indexed).then_some(info.bit_depth as u8))
}

/// Offsets into the BMP file header and the DIB header that follows it
const BMP_FILE_HEADER_LEN: usize = 14;
const BMP_CORE_HEADER_LEN: u32 = 12;

fn bmp_palette_bits(path: &Path) -> Result<Option<u8>, ClassifyError> {
    let mut header = Vec::with_capacity(BMP_FILE_HEADER_LEN + 16);
    File::open(path)
        .and_then(|file| file.take(BMP_FILE_HEADER_LEN as u64 + 16).read_to_end(&mut header))
        .map_err(|source| io_error(path, source))?;

    let Some(dib) = header.get(BMP_FILE_HEADER_LEN..).filter(|dib| dib.len() >= 16) else {
        return Ok(None);
    };
    let dib_len = u32::from_le_bytes([dib[0], dib[1], dib[2], dib[3]]);
    // OS/2 core headers use 16-bit dimensions, which moves the bit count up
    let bit_count = if dib_len == BMP_CORE_HEADER_LEN {
        u16::from_le_bytes([dib[10], dib[11]])
    } else {
        u16::from_le_bytes([dib[14], dib[15]])
    };

    Ok(u8::try_from(bit_count).ok().filter(|bits| *bits <= 8))
}

fn io_error(path: &Path, source: std::io::Error) -> ClassifyError {
    ClassifyError::IoError {
        path: path.to_path_buf(),
        source,
    }
}
