use crate::frame::RawFrame;
use image::{imageops, imageops::FilterType, RgbaImage};
use ndarray::{Array, Ix4};
use thiserror::Error;

/// Input edge lengths the classifier was trained on.
pub const INPUT_WIDTH: u32 = 224;
pub const INPUT_HEIGHT: u32 = 224;

#[derive(Error, Debug)]
pub enum PreprocessError {
    #[error("failed to resample frame: {0}")]
    ResampleFailed(String),
    #[error("failed to build input tensor: {0}")]
    AllocationFailed(#[from] ndarray::ShapeError),
}

/// Converts a raw camera frame into the model input tensor.
///
/// The frame is resampled to `target_width` x `target_height` with a bilinear
/// filter, channels are extracted in RGB order according to the frame's pixel
/// format, and each byte is scaled to `[0, 1]`. The result has shape
/// `[1, target_height, target_width, 3]` filled row-major (y outer, x inner),
/// which is the pixel-to-index mapping the model was trained against.
///
/// Every read of `frame.data` happens before this function returns, so the
/// caller may recycle the buffer immediately. On error no tensor is produced.
pub fn preprocess(
    frame: &RawFrame<'_>,
    target_width: u32,
    target_height: u32,
) -> Result<Array<f32, Ix4>, PreprocessError> {
    if frame.width == 0 || frame.height == 0 {
        return Err(PreprocessError::ResampleFailed("zero-size frame".into()));
    }
    if target_width == 0 || target_height == 0 {
        return Err(PreprocessError::ResampleFailed(
            "zero-size target dimensions".into(),
        ));
    }

    let width = frame.width as usize;
    let height = frame.height as usize;
    let row_bytes = width * 4;
    if frame.bytes_per_row < row_bytes {
        return Err(PreprocessError::ResampleFailed(format!(
            "row stride {} shorter than {} pixel bytes",
            frame.bytes_per_row, row_bytes
        )));
    }
    let needed = frame
        .bytes_per_row
        .checked_mul(height)
        .ok_or_else(|| PreprocessError::ResampleFailed("frame dimensions overflow".into()))?;
    // The last row only needs its pixel bytes, not the trailing padding.
    let needed = needed - (frame.bytes_per_row - row_bytes);
    if frame.data.len() < needed {
        return Err(PreprocessError::ResampleFailed(format!(
            "buffer holds {} bytes, frame needs {}",
            frame.data.len(),
            needed
        )));
    }

    // Repack the stride-padded buffer into tight RGBA so the resampler sees
    // one canonical layout regardless of the source pixel format.
    let [r_off, g_off, b_off] = frame.format.rgb_offsets();
    let mut rgba = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        let row = &frame.data[y * frame.bytes_per_row..][..row_bytes];
        for pixel in row.chunks_exact(4) {
            rgba.extend_from_slice(&[pixel[r_off], pixel[g_off], pixel[b_off], 255]);
        }
    }
    let img = RgbaImage::from_raw(frame.width, frame.height, rgba)
        .ok_or_else(|| PreprocessError::ResampleFailed("pixel buffer rejected".into()))?;

    let resized = imageops::resize(&img, target_width, target_height, FilterType::Triangle);

    let mut values = Vec::with_capacity(target_width as usize * target_height as usize * 3);
    for pixel in resized.pixels() {
        let [r, g, b, _] = pixel.0;
        values.push(r as f32 / 255.);
        values.push(g as f32 / 255.);
        values.push(b as f32 / 255.);
    }

    let input = Array::from_shape_vec(
        (1, target_height as usize, target_width as usize, 3),
        values,
    )?;
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::PixelFormat;

    fn solid_bgra(width: u32, height: u32, b: u8, g: u8, r: u8) -> Vec<u8> {
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..width * height {
            data.extend_from_slice(&[b, g, r, 255]);
        }
        data
    }

    #[test]
    fn test_output_shape_and_range() {
        let mut data = Vec::new();
        for i in 0..100u32 * 80 {
            data.extend_from_slice(&[(i % 256) as u8, (i % 97) as u8, (i % 13) as u8, 255]);
        }
        let frame = RawFrame::tightly_packed(100, 80, PixelFormat::Bgra8, &data);

        let input = preprocess(&frame, INPUT_WIDTH, INPUT_HEIGHT).unwrap();

        assert_eq!(input.shape(), &[1, 224, 224, 3]);
        assert!(input.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn test_deterministic() {
        let mut data = Vec::new();
        for i in 0..64u32 * 48 {
            data.extend_from_slice(&[(i * 7 % 256) as u8, (i * 3 % 256) as u8, (i % 256) as u8, 255]);
        }
        let frame = RawFrame::tightly_packed(64, 48, PixelFormat::Bgra8, &data);

        let first = preprocess(&frame, INPUT_WIDTH, INPUT_HEIGHT).unwrap();
        let second = preprocess(&frame, INPUT_WIDTH, INPUT_HEIGHT).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_bgra_channel_order() {
        // Pure blue in BGRA must land in the last channel slot.
        let data = solid_bgra(32, 32, 255, 0, 0);
        let frame = RawFrame::tightly_packed(32, 32, PixelFormat::Bgra8, &data);

        let input = preprocess(&frame, INPUT_WIDTH, INPUT_HEIGHT).unwrap();

        assert_eq!(input[[0, 0, 0, 0]], 0.0);
        assert_eq!(input[[0, 0, 0, 1]], 0.0);
        assert_eq!(input[[0, 0, 0, 2]], 1.0);
        assert_eq!(input[[0, 223, 223, 2]], 1.0);
    }

    #[test]
    fn test_argb_channel_order() {
        // A, R, G, B layout: red byte sits at offset 1.
        let mut data = Vec::new();
        for _ in 0..16u32 * 16 {
            data.extend_from_slice(&[255, 255, 0, 0]);
        }
        let frame = RawFrame::tightly_packed(16, 16, PixelFormat::Argb8, &data);

        let input = preprocess(&frame, INPUT_WIDTH, INPUT_HEIGHT).unwrap();

        assert_eq!(input[[0, 0, 0, 0]], 1.0);
        assert_eq!(input[[0, 0, 0, 1]], 0.0);
        assert_eq!(input[[0, 0, 0, 2]], 0.0);
    }

    #[test]
    fn test_row_padding_ignored() {
        let width = 4u32;
        let height = 4u32;
        let stride = 24usize; // 16 pixel bytes + 8 padding bytes per row
        let mut padded = Vec::new();
        for _ in 0..height {
            for _ in 0..width {
                padded.extend_from_slice(&[0, 0, 255, 255]);
            }
            padded.extend_from_slice(&[0xAB; 8]);
        }
        let frame = RawFrame::new(width, height, stride, PixelFormat::Bgra8, &padded);

        let tight = solid_bgra(width, height, 0, 0, 255);
        let reference = RawFrame::tightly_packed(width, height, PixelFormat::Bgra8, &tight);

        let got = preprocess(&frame, INPUT_WIDTH, INPUT_HEIGHT).unwrap();
        let expected = preprocess(&reference, INPUT_WIDTH, INPUT_HEIGHT).unwrap();

        assert_eq!(got, expected);
    }

    #[test]
    fn test_zero_size_frame_rejected() {
        let frame = RawFrame::tightly_packed(0, 0, PixelFormat::Bgra8, &[]);

        let err = preprocess(&frame, INPUT_WIDTH, INPUT_HEIGHT).unwrap_err();

        assert!(matches!(err, PreprocessError::ResampleFailed(_)));
    }

    #[test]
    fn test_short_buffer_rejected() {
        let data = solid_bgra(8, 8, 1, 2, 3);
        let frame = RawFrame::tightly_packed(8, 8, PixelFormat::Bgra8, &data[..100]);

        let err = preprocess(&frame, INPUT_WIDTH, INPUT_HEIGHT).unwrap_err();

        assert!(matches!(err, PreprocessError::ResampleFailed(_)));
    }

    #[test]
    fn test_identity_size_keeps_values() {
        // Already at target size: resampling must not disturb a solid color.
        let data = solid_bgra(INPUT_WIDTH, INPUT_HEIGHT, 51, 102, 204);
        let frame = RawFrame::tightly_packed(INPUT_WIDTH, INPUT_HEIGHT, PixelFormat::Bgra8, &data);

        let input = preprocess(&frame, INPUT_WIDTH, INPUT_HEIGHT).unwrap();

        assert_eq!(input[[0, 100, 100, 0]], 204.0 / 255.0);
        assert_eq!(input[[0, 100, 100, 1]], 102.0 / 255.0);
        assert_eq!(input[[0, 100, 100, 2]], 51.0 / 255.0);
    }
}
