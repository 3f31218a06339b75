// Configuration management
//
// Handles video-system configuration and settings persistence.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;

/// Default configuration file path
const CONFIG_FILE: &str = "gba_video_config.toml";

/// Video system configuration
///
/// Stores all user-configurable settings for the video core and its
/// presentation pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoSystemConfig {
    /// Timing settings
    pub timing: TimingConfig,

    /// Presentation settings
    pub presentation: PresentationConfig,

    /// Save state settings
    pub save_state: SaveStateConfig,

    /// Screenshot settings
    pub screenshot: ScreenshotConfig,
}

/// Timing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Suspend the pipeline at every pixel instead of drawing whole
    /// scanlines at once
    pub accurate: bool,
}

/// Screen orientation for presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    /// Native landscape
    Normal,

    /// Rotated 90 degrees clockwise
    Rotate90,

    /// Upside down
    Rotate180,

    /// Rotated 270 degrees clockwise
    Rotate270,
}

/// Presentation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresentationConfig {
    /// Model the AGB LCD panel's color response instead of raw RGB
    pub color_emulation: bool,

    /// Average each frame with the previous one, approximating the slow
    /// panel response
    pub interframe_blending: bool,

    /// Screen orientation
    pub orientation: Orientation,
}

/// Save state configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveStateConfig {
    /// Save directory
    pub save_directory: PathBuf,
}

/// Screenshot configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenshotConfig {
    /// Screenshot directory
    pub screenshot_directory: PathBuf,

    /// Include timestamp in filename
    pub include_timestamp: bool,
}

impl Default for VideoSystemConfig {
    fn default() -> Self {
        VideoSystemConfig {
            timing: TimingConfig { accurate: false },
            presentation: PresentationConfig {
                color_emulation: true,
                interframe_blending: true,
                orientation: Orientation::Normal,
            },
            save_state: SaveStateConfig {
                save_directory: PathBuf::from("saves"),
            },
            screenshot: ScreenshotConfig {
                screenshot_directory: PathBuf::from("screenshots"),
                include_timestamp: true,
            },
        }
    }
}

impl VideoSystemConfig {
    /// Load configuration from file or create default
    ///
    /// If the configuration file doesn't exist, creates a default
    /// configuration and saves it to the file.
    ///
    /// # Returns
    ///
    /// The loaded or default configuration
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|_| {
            let config = Self::default();
            // Try to save the default config, but don't fail if we can't
            let _ = config.save();
            config
        })
    }

    /// Load configuration from file
    ///
    /// # Returns
    ///
    /// Result containing the configuration or an error
    pub fn load() -> Result<Self, io::Error> {
        let contents = fs::read_to_string(CONFIG_FILE)?;
        toml::from_str(&contents).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Save configuration to file
    ///
    /// # Returns
    ///
    /// Result indicating success or error
    pub fn save(&self) -> Result<(), io::Error> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(CONFIG_FILE, contents)
    }
}
