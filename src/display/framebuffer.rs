// Frame buffer - presentation-side pixel storage
//
// Takes the video core's raw 240x160 BGR555 output and produces display-ready
// RGB pixels: optional LCD color emulation, optional interframe blending
// (averaging with the previous frame, approximating the slow panel response),
// and screen rotation for portrait-oriented shells.

use crate::ppu::{bgr555_to_rgb, bgr555_to_rgb_lcd, SCREEN_HEIGHT, SCREEN_SIZE, SCREEN_WIDTH};
use crate::system::{Orientation, PresentationConfig};

/// Presentation frame buffer
///
/// Stores display-ready pixels as packed 0x00RRGGBB values. Dimensions depend
/// on the orientation applied by the last `present` call.
pub struct FrameBuffer {
    /// Display-ready pixel data
    pixels: Vec<u32>,

    /// Raw BGR555 copy of the previous frame, for interframe blending
    previous: Vec<u16>,

    /// Output width after rotation
    width: usize,

    /// Output height after rotation
    height: usize,
}

impl FrameBuffer {
    /// Create a new frame buffer initialized to black
    pub fn new() -> Self {
        FrameBuffer {
            pixels: vec![0; SCREEN_SIZE],
            previous: vec![0; SCREEN_SIZE],
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
        }
    }

    /// Output width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Output height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Display-ready pixels, row-major in the rotated orientation
    pub fn as_slice(&self) -> &[u32] {
        &self.pixels
    }

    /// Get a pixel in the rotated orientation
    ///
    /// # Panics
    /// Panics if coordinates are out of bounds
    #[inline]
    pub fn get_pixel(&self, x: usize, y: usize) -> u32 {
        assert!(x < self.width, "X coordinate {} out of bounds", x);
        assert!(y < self.height, "Y coordinate {} out of bounds", y);
        self.pixels[y * self.width + x]
    }

    /// Ingest a raw frame from the video core
    ///
    /// # Arguments
    /// * `frame` - Raw BGR555 frame buffer (240x160)
    /// * `config` - Presentation settings to apply
    ///
    /// # Panics
    /// Panics if the frame has the wrong size
    pub fn present(&mut self, frame: &[u16], config: &PresentationConfig) {
        assert_eq!(frame.len(), SCREEN_SIZE, "Unexpected frame size");

        let convert = if config.color_emulation {
            bgr555_to_rgb_lcd
        } else {
            bgr555_to_rgb
        };

        (self.width, self.height) = match config.orientation {
            Orientation::Normal | Orientation::Rotate180 => (SCREEN_WIDTH, SCREEN_HEIGHT),
            Orientation::Rotate90 | Orientation::Rotate270 => (SCREEN_HEIGHT, SCREEN_WIDTH),
        };

        for y in 0..SCREEN_HEIGHT {
            for x in 0..SCREEN_WIDTH {
                let index = y * SCREEN_WIDTH + x;
                let mut color = frame[index];
                if config.interframe_blending {
                    color = average_bgr555(color, self.previous[index]);
                }
                let target = match config.orientation {
                    Orientation::Normal => index,
                    Orientation::Rotate90 => x * SCREEN_HEIGHT + (SCREEN_HEIGHT - 1 - y),
                    Orientation::Rotate180 => {
                        (SCREEN_HEIGHT - 1 - y) * SCREEN_WIDTH + (SCREEN_WIDTH - 1 - x)
                    }
                    Orientation::Rotate270 => (SCREEN_WIDTH - 1 - x) * SCREEN_HEIGHT + y,
                };
                self.pixels[target] = convert(color);
            }
        }

        self.previous.copy_from_slice(frame);
    }

    /// Convert the frame buffer to RGBA format for display
    ///
    /// # Arguments
    /// * `output` - Output buffer to write RGBA data (must be at least
    ///   SCREEN_SIZE * 4 bytes)
    ///
    /// # Panics
    /// Panics if output buffer is too small
    pub fn to_rgba(&self, output: &mut [u8]) {
        assert!(
            output.len() >= SCREEN_SIZE * 4,
            "Output buffer too small for RGBA conversion"
        );

        for (i, &pixel) in self.pixels.iter().enumerate() {
            let offset = i * 4;
            output[offset] = (pixel >> 16) as u8; // R
            output[offset + 1] = (pixel >> 8) as u8; // G
            output[offset + 2] = pixel as u8; // B
            output[offset + 3] = 0xFF; // A
        }
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-channel average of two BGR555 colors
fn average_bgr555(a: u16, b: u16) -> u16 {
    let mut out = 0u16;
    for shift in [0, 5, 10] {
        let ca = a >> shift & 0x1F;
        let cb = b >> shift & 0x1F;
        out |= (ca + cb) / 2 << shift;
    }
    out
}
