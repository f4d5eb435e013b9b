//! PNG decode to luma and 8-bit grayscale encode.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use fmask_core::Grid;

use crate::convert::luma;
use crate::{IoError, IoResult};

/// Reads a PNG file as an 8-bit luma grid.
///
/// Palette, low bit depth and 16-bit images are normalized to 8 bits per
/// channel first. Color is reduced with Rec.601 weights; alpha is dropped.
pub fn read_gray<P: AsRef<Path>>(path: P) -> IoResult<Grid<u8>> {
    let file = File::open(path.as_ref())?;
    let mut decoder = png::Decoder::new(BufReader::new(file));
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder
        .read_info()
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("cannot determine output buffer size".into()))?;
    let mut buf = vec![0u8; buf_size];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;

    let width = info.width as usize;
    let height = info.height as usize;
    let bytes = &buf[..info.buffer_size()];
    let row = info.line_size;

    let channels = match info.color_type {
        png::ColorType::Grayscale => 1,
        png::ColorType::GrayscaleAlpha => 2,
        png::ColorType::Rgb => 3,
        png::ColorType::Rgba => 4,
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "PNG color type {:?} {:?}",
                other, info.bit_depth
            )));
        }
    };

    let gray = Grid::from_fn(width, height, |x, y| {
        let px = &bytes[y * row + x * channels..][..channels];
        if channels < 3 {
            px[0]
        } else {
            luma(px[0], px[1], px[2])
        }
    });
    Ok(gray)
}

/// Writes an 8-bit grayscale PNG.
pub fn write_gray<P: AsRef<Path>>(path: P, image: &Grid<u8>) -> IoResult<()> {
    let (w, h) = image.dims();
    let width = u32::try_from(w).map_err(|_| IoError::EncodeError(format!("width {} too large", w)))?;
    let height = u32::try_from(h).map_err(|_| IoError::EncodeError(format!("height {} too large", h)))?;

    let file = File::create(path.as_ref())?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), width, height);
    encoder.set_color(png::ColorType::Grayscale);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::default());

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    writer
        .write_image_data(image.as_slice())
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    writer.finish().map_err(|e| IoError::EncodeError(e.to_string()))?;
    Ok(())
}
