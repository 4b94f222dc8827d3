use std::{
    fs::File,
    io::{self, BufWriter},
    path::{Path, PathBuf},
};

use chrono::Utc;
use image::{ImageBuffer, ImageError, Rgba, codecs::png::PngEncoder};
use projection_capture_provider::RawFrame;
use thiserror::Error;

const PIXEL_STRIDE: u32 = 4;

/// Crop the frame's stride padding and encode it as a timestamped PNG file.
pub(super) fn write_screenshot(frame: &RawFrame, dir: &Path) -> Result<PathBuf, Error> {
    if frame.pixel_stride != PIXEL_STRIDE {
        return Err(Error::PixelStride(frame.pixel_stride));
    }

    let tight_row = (frame.width * frame.pixel_stride) as usize;
    let row_stride = frame.row_stride as usize;

    let expected = row_stride * frame.height as usize;
    if frame.data.len() < expected {
        return Err(Error::FrameData(frame.data.len(), expected));
    }

    // The row stride may exceed the pixel data for alignment reasons; copy
    // each row's pixels into a tight buffer, dropping the padding.
    let mut pixels = Vec::with_capacity(tight_row * frame.height as usize);
    for y in 0..frame.height as usize {
        let row = y * row_stride;
        pixels.extend_from_slice(&frame.data[row..row + tight_row]);
    }

    let pixels_len = pixels.len();
    let img: ImageBuffer<Rgba<u8>, Vec<u8>> =
        match ImageBuffer::from_raw(frame.width, frame.height, pixels) {
            Some(img) => img,
            None => return Err(Error::ImageBuffer(frame.width, frame.height, pixels_len)),
        };

    let name = format!("screenshot_{}.png", Utc::now().timestamp_millis());
    let path = std::path::absolute(dir.join(name)).map_err(Error::Absolute)?;

    let file = File::create(&path).map_err(Error::CreateFile)?;
    let mut buffer = BufWriter::new(file);
    let encoder = PngEncoder::new(&mut buffer);
    img.write_with_encoder(encoder)?;

    Ok(path)
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unsupported pixel stride: {0}")]
    PixelStride(u32),

    #[error("Frame data is too short:\nData: {0}\nExpected: {1}")]
    FrameData(usize, usize),

    #[error("Failed to create image buffer:\nFrame Size: {0}, {1}\nPixel Data: {2}")]
    ImageBuffer(u32, u32, usize),

    #[error("Failed to resolve the screenshot path:\n{0}")]
    Absolute(#[source] io::Error),

    #[error("Failed to create file for screenshot:\n{0}")]
    CreateFile(#[source] io::Error),

    #[error("Failed to write screenshot to file:\n{0}")]
    WriteFile(#[from] ImageError),
}
