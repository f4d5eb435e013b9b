//! JPEG decode to luma.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use fmask_core::Grid;

use crate::convert::luma;
use crate::{IoError, IoResult};

/// Reads a JPEG file as an 8-bit luma grid.
///
/// RGB input is reduced with Rec.601 weights, CMYK is converted to RGB
/// first and 16-bit luma keeps its high byte.
pub fn read_gray<P: AsRef<Path>>(path: P) -> IoResult<Grid<u8>> {
    let file = File::open(path.as_ref())?;
    let mut decoder = jpeg_decoder::Decoder::new(BufReader::new(file));
    let pixels = decoder
        .decode()
        .map_err(|e| IoError::DecodeError(e.to_string()))?;
    let info = decoder
        .info()
        .ok_or_else(|| IoError::DecodeError("missing JPEG info".into()))?;

    let width = usize::from(info.width);
    let height = usize::from(info.height);

    let gray: Vec<u8> = match info.pixel_format {
        jpeg_decoder::PixelFormat::L8 => pixels,
        jpeg_decoder::PixelFormat::L16 => pixels.chunks_exact(2).map(|l16| l16[0]).collect(),
        jpeg_decoder::PixelFormat::RGB24 => pixels
            .chunks_exact(3)
            .map(|rgb| luma(rgb[0], rgb[1], rgb[2]))
            .collect(),
        jpeg_decoder::PixelFormat::CMYK32 => pixels
            .chunks_exact(4)
            .map(|cmyk| {
                let k = 255 - u16::from(cmyk[3]);
                let channel = |c: u8| ((255 - u16::from(c)) * k / 255) as u8;
                luma(channel(cmyk[0]), channel(cmyk[1]), channel(cmyk[2]))
            })
            .collect(),
    };

    Ok(Grid::from_vec(width, height, gray)?)
}
