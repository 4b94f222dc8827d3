/// Display bounds and density.
///
/// A session snapshots these at start and does not refresh them; a rotation
/// or resolution change after start is a known staleness window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayMetrics {
    /// Screen width in pixels.
    pub width: u32,

    /// Screen height in pixels.
    pub height: u32,

    /// Pixel density in dots per inch.
    pub density_dpi: u32,
}
