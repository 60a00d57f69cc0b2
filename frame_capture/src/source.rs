use logo_prediction::PixelFormat;

/// Deterministic BGRA frame generator.
///
/// Stands in for a camera device when none is attached: produces a moving
/// gradient so consecutive frames differ and the pipeline is exercised
/// end to end. Each `fill` call overwrites the caller's buffer, matching
/// how a capture layer recycles its delivery buffer between frames.
pub struct TestPatternSource {
    width: u32,
    height: u32,
    tick: u32,
}

impl TestPatternSource {
    pub const FORMAT: PixelFormat = PixelFormat::Bgra8;

    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            tick: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn fill(&mut self, buffer: &mut Vec<u8>) {
        buffer.clear();
        buffer.reserve(self.width as usize * self.height as usize * 4);
        let t = self.tick;
        for y in 0..self.height {
            for x in 0..self.width {
                let b = ((x + t) % 256) as u8;
                let g = ((y + t) % 256) as u8;
                let r = ((x + y) % 256) as u8;
                buffer.extend_from_slice(&[b, g, r, 255]);
            }
        }
        self.tick = self.tick.wrapping_add(1);
    }
}
