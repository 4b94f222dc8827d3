/// A raw frame pulled from the frame-buffer reader.
///
/// The data is RGBA, 8 bits per channel. The row stride may exceed
/// `width * pixel_stride` for alignment reasons; consumers must crop the
/// padding columns before encoding.
#[derive(Debug, Clone)]
pub struct RawFrame {
    /// Frame width in pixels.
    pub width: u32,

    /// Frame height in pixels.
    pub height: u32,

    /// Bytes per pixel.
    pub pixel_stride: u32,

    /// Bytes per row, including any alignment padding.
    pub row_stride: u32,

    /// The raw block of bytes that make up the frame.
    pub data: Box<[u8]>,
}
