// Screenshot functionality
//
// Captures the current frame buffer and saves it as a PNG file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::ppu::{bgr555_to_rgb, bgr555_to_rgb_lcd, SCREEN_HEIGHT, SCREEN_WIDTH};

/// Errors that can occur during screenshot operations
#[derive(Debug)]
pub enum ScreenshotError {
    /// I/O error
    Io(io::Error),

    /// PNG encoding error
    PngEncoding(png::EncodingError),
}

impl std::fmt::Display for ScreenshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScreenshotError::Io(e) => write!(f, "I/O error: {}", e),
            ScreenshotError::PngEncoding(e) => write!(f, "PNG encoding error: {}", e),
        }
    }
}

impl std::error::Error for ScreenshotError {}

impl From<io::Error> for ScreenshotError {
    fn from(e: io::Error) -> Self {
        ScreenshotError::Io(e)
    }
}

impl From<png::EncodingError> for ScreenshotError {
    fn from(e: png::EncodingError) -> Self {
        ScreenshotError::PngEncoding(e)
    }
}

/// Save a screenshot of the current frame
///
/// Converts the raw BGR555 frame buffer to RGB and saves as PNG.
///
/// # Arguments
///
/// * `frame` - The raw frame buffer (240x160 BGR555)
/// * `directory` - Directory to save into (created if missing)
/// * `color_emulation` - Apply the LCD panel color model
/// * `include_timestamp` - Append a timestamp to the filename
///
/// # Returns
///
/// Result containing the path to the saved screenshot or an error
pub fn save_screenshot(
    frame: &[u16],
    directory: &Path,
    color_emulation: bool,
    include_timestamp: bool,
) -> Result<PathBuf, ScreenshotError> {
    fs::create_dir_all(directory)?;

    let filename = if include_timestamp {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        format!("screenshot_{}.png", timestamp)
    } else {
        "screenshot.png".to_string()
    };
    let file_path = directory.join(filename);

    let rgb_data = frame_to_rgb(frame, color_emulation);
    save_png(&file_path, &rgb_data, SCREEN_WIDTH as u32, SCREEN_HEIGHT as u32)?;

    Ok(file_path)
}

/// Convert a BGR555 frame buffer to packed RGB bytes
fn frame_to_rgb(frame: &[u16], color_emulation: bool) -> Vec<u8> {
    let convert = if color_emulation {
        bgr555_to_rgb_lcd
    } else {
        bgr555_to_rgb
    };

    let mut rgb_data = Vec::with_capacity(frame.len() * 3);
    for &pixel in frame {
        let color = convert(pixel);
        rgb_data.push((color >> 16) as u8); // R
        rgb_data.push((color >> 8) as u8); // G
        rgb_data.push(color as u8); // B
    }

    rgb_data
}

/// Save RGB data as a PNG file
fn save_png(path: &Path, data: &[u8], width: u32, height: u32) -> Result<(), ScreenshotError> {
    let file = fs::File::create(path)?;
    let w = io::BufWriter::new(file);

    let mut encoder = png::Encoder::new(w, width, height);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(data)?;

    Ok(())
}
