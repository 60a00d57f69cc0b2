/// Byte order of one packed 4-byte pixel as delivered by the capture layer.
///
/// Channel extraction is driven by this tag rather than hard-coded offsets,
/// so a capture source and a model trained on a different channel layout can
/// be paired without touching the preprocessing loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// Blue, green, red, alpha. What most platform cameras deliver.
    Bgra8,
    /// Red, green, blue, alpha.
    Rgba8,
    /// Alpha, red, green, blue.
    Argb8,
}

impl PixelFormat {
    /// Byte offsets of the red, green and blue channels within a pixel.
    pub fn rgb_offsets(self) -> [usize; 3] {
        match self {
            PixelFormat::Bgra8 => [2, 1, 0],
            PixelFormat::Rgba8 => [0, 1, 2],
            PixelFormat::Argb8 => [1, 2, 3],
        }
    }
}

/// One captured camera frame, borrowed from the capture layer.
///
/// The buffer holds `height` rows of `bytes_per_row` bytes each; rows may be
/// padded past `width * 4`. Borrowing ties every read to the delivery
/// callback: the capture layer is free to recycle the buffer as soon as the
/// call returns, and nothing here can outlive it.
#[derive(Debug, Clone, Copy)]
pub struct RawFrame<'a> {
    pub width: u32,
    pub height: u32,
    pub bytes_per_row: usize,
    pub format: PixelFormat,
    pub data: &'a [u8],
}

impl<'a> RawFrame<'a> {
    pub fn new(
        width: u32,
        height: u32,
        bytes_per_row: usize,
        format: PixelFormat,
        data: &'a [u8],
    ) -> Self {
        Self {
            width,
            height,
            bytes_per_row,
            format,
            data,
        }
    }

    /// Frame with no row padding, `bytes_per_row == width * 4`.
    pub fn tightly_packed(width: u32, height: u32, format: PixelFormat, data: &'a [u8]) -> Self {
        Self::new(width, height, width as usize * 4, format, data)
    }
}
