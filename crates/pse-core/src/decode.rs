//! Decoder boundary: uploaded bytes → `Raster`.
//!
//! PSD parsing and image decoding belong to third-party codecs; this module
//! only adapts their output to the editor's RGBA8 raster and folds their
//! errors into one `DecodeError`.

use crate::model::Raster;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// The upload contained no bytes.
    Empty,
    /// The PSD codec rejected the file.
    Psd(String),
    /// The image codec rejected the file.
    Image(String),
    /// The codec produced a pixel buffer that does not match its dimensions.
    BadRaster { width: u32, height: u32, len: usize },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Empty => write!(f, "file is empty"),
            DecodeError::Psd(msg) => write!(f, "could not read PSD: {msg}"),
            DecodeError::Image(msg) => write!(f, "could not read image: {msg}"),
            DecodeError::BadRaster { width, height, len } => write!(
                f,
                "decoded {width}x{height} image has {len} bytes of pixel data"
            ),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Turns an uploaded file into a flattened raster.
pub trait Decoder {
    fn decode(&self, bytes: &[u8]) -> Result<Raster, DecodeError>;
}

/// Flattens a layered PSD to its composite image.
#[derive(Debug, Clone, Copy, Default)]
pub struct PsdDecoder;

impl Decoder for PsdDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<Raster, DecodeError> {
        if bytes.is_empty() {
            return Err(DecodeError::Empty);
        }
        check_psd_sections(bytes)?;
        let psd = psd::Psd::from_bytes(bytes).map_err(|e| DecodeError::Psd(e.to_string()))?;
        let (width, height) = (psd.width(), psd.height());
        let rgba = psd.rgba();
        log::debug!("decoded PSD {width}x{height}");
        into_raster(width, height, rgba)
    }
}

/// Decodes standard raster formats (PNG, JPEG, GIF, BMP, WebP) for logos.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageDecoder;

impl Decoder for ImageDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<Raster, DecodeError> {
        if bytes.is_empty() {
            return Err(DecodeError::Empty);
        }
        let img = image::load_from_memory(bytes)
            .map_err(|e| DecodeError::Image(e.to_string()))?
            .to_rgba8();
        let (width, height) = img.dimensions();
        log::debug!("decoded image {width}x{height}");
        into_raster(width, height, img.into_raw())
    }
}

/// Walk the fixed header, the three length-prefixed sections and the image
/// data before the codec sees the bytes. The codec slices without bounds
/// checks, so a truncated upload must be turned away here.
fn check_psd_sections(bytes: &[u8]) -> Result<(), DecodeError> {
    const HEADER_LEN: usize = 26;
    if bytes.len() < HEADER_LEN || &bytes[..4] != b"8BPS" {
        return Err(DecodeError::Psd("not a PSD file (bad signature)".to_string()));
    }
    let version = read_u16(bytes, 4);
    if version != 1 {
        return Err(DecodeError::Psd(format!("unsupported PSD version {version}")));
    }
    let channels = u64::from(read_u16(bytes, 12));
    let height = u64::from(read_u32(bytes, 14));
    let width = u64::from(read_u32(bytes, 18));
    let depth = u64::from(read_u16(bytes, 22));
    if channels == 0 || width == 0 || height == 0 {
        return Err(DecodeError::Psd(format!(
            "empty image ({width}x{height}, {channels} channels)"
        )));
    }

    let mut cursor = HEADER_LEN;
    for section in ["color mode data", "image resources", "layer and mask info"] {
        if bytes.len() < cursor + 4 {
            return Err(DecodeError::Psd(format!("truncated before {section}")));
        }
        let len = read_u32(bytes, cursor);
        cursor = cursor
            .checked_add(4)
            .and_then(|c| c.checked_add(len as usize))
            .filter(|end| *end <= bytes.len())
            .ok_or_else(|| DecodeError::Psd(format!("truncated {section} section")))?;
    }

    if bytes.len() < cursor + 2 {
        return Err(DecodeError::Psd("missing image data".to_string()));
    }
    let compression = read_u16(bytes, cursor);
    let data = &bytes[cursor + 2..];
    let rows = channels * height;
    let needed = match compression {
        // Raw: one plane per channel, rows padded to whole bytes.
        0 => rows.checked_mul((width * depth).div_ceil(8)),
        // RLE: a u16 byte count per row, then the packed rows.
        1 => {
            let table_len = rows * 2;
            if (data.len() as u64) < table_len {
                return Err(DecodeError::Psd("truncated RLE row table".to_string()));
            }
            let packed: u64 = data[..table_len as usize]
                .chunks_exact(2)
                .map(|c| u64::from(u16::from_be_bytes([c[0], c[1]])))
                .sum();
            Some(table_len + packed)
        }
        other => {
            return Err(DecodeError::Psd(format!(
                "unsupported image data compression {other}"
            )));
        }
    };
    match needed {
        Some(needed) if data.len() as u64 >= needed => Ok(()),
        _ => Err(DecodeError::Psd("truncated image data".to_string())),
    }
}

fn read_u16(bytes: &[u8], at: usize) -> u16 {
    u16::from_be_bytes([bytes[at], bytes[at + 1]])
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_be_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

fn into_raster(width: u32, height: u32, rgba: Vec<u8>) -> Result<Raster, DecodeError> {
    let len = rgba.len();
    Raster::new(width, height, rgba).ok_or(DecodeError::BadRaster { width, height, len })
}
