// System module - video system coordinator
//
// Ties the video core to its collaborators (interrupt latch, DMA channels)
// and implements quality-of-life features: save states, screenshots, and
// configuration management. The core itself stays free of globals; every
// collaborator is owned here and passed in explicitly per step.

mod config;
mod save_state;
mod screenshot;

pub use config::{
    Orientation, PresentationConfig, SaveStateConfig, ScreenshotConfig, TimingConfig,
    VideoSystemConfig,
};
pub use save_state::{SaveState, SaveStateError};
pub use screenshot::{save_screenshot, ScreenshotError};

use std::fs;
use std::path::{Path, PathBuf};

use crate::bus::VideoBus;
use crate::display::FrameBuffer;
use crate::dma::DmaChannels;
use crate::irq::IrqLatch;
use crate::ppu::Ppu;

/// Video system coordinator
///
/// Owns the bus (and through it the video core), the interrupt latch, the
/// DMA channel model, and the configuration.
pub struct VideoSystem {
    /// Bus exposing the video address space
    bus: VideoBus,

    /// Interrupt request latch
    irq: IrqLatch,

    /// DMA channel model
    dma: DmaChannels,

    /// Configuration
    config: VideoSystemConfig,

    /// Frames completed since power-on
    frames: u64,
}

impl VideoSystem {
    /// Create a new video system with default configuration
    pub fn new() -> Self {
        Self::with_config(VideoSystemConfig::default())
    }

    /// Create a new video system, loading configuration from disk
    ///
    /// Falls back to (and persists) the default configuration if no file
    /// exists.
    pub fn from_saved_config() -> Self {
        Self::with_config(VideoSystemConfig::load_or_default())
    }

    /// Create a new video system with the given configuration
    pub fn with_config(config: VideoSystemConfig) -> Self {
        let mut bus = VideoBus::new();
        bus.ppu.set_accurate(config.timing.accurate);
        VideoSystem {
            bus,
            irq: IrqLatch::new(),
            dma: DmaChannels::new(),
            config,
            frames: 0,
        }
    }

    /// Advance the video core by one timing slot
    ///
    /// # Returns
    ///
    /// Cycles consumed
    pub fn step(&mut self) -> u32 {
        self.bus.ppu.step(&mut self.irq, &mut self.dma)
    }

    /// Run until at least `cycles` cycles have elapsed
    ///
    /// # Returns
    ///
    /// Cycles actually consumed (slots never split, so this may overshoot)
    pub fn run_cycles(&mut self, cycles: u32) -> u32 {
        let mut elapsed = 0;
        while elapsed < cycles {
            elapsed += self.step();
        }
        elapsed
    }

    /// Run to the end of the current scanline
    pub fn run_scanline(&mut self) -> u32 {
        let mut elapsed = self.step();
        while !matches!(self.bus.ppu.phase, crate::ppu::Phase::LineStart) {
            elapsed += self.step();
        }
        elapsed
    }

    /// Run until the current frame completes
    ///
    /// # Returns
    ///
    /// Cycles consumed
    pub fn run_frame(&mut self) -> u32 {
        let mut elapsed = 0;
        loop {
            elapsed += self.step();
            if self.bus.ppu.poll_frame() {
                break;
            }
        }
        self.frames += 1;
        elapsed
    }

    /// Present the completed frame into a display frame buffer
    pub fn present(&mut self, framebuffer: &mut FrameBuffer) {
        framebuffer.present(self.bus.ppu.frame(), &self.config.presentation);
    }

    /// Save the video-core state to a slot in the configured save directory
    ///
    /// # Arguments
    ///
    /// * `slot` - Save slot number
    ///
    /// # Returns
    ///
    /// Result containing the path written or an error
    pub fn save_state(&self, slot: u8) -> Result<PathBuf, SaveStateError> {
        let directory = &self.config.save_state.save_directory;
        fs::create_dir_all(directory)?;
        let path = directory.join(format!("slot_{}.state", slot));
        self.save_state_to(&path)?;
        Ok(path)
    }

    /// Save the video-core state to an explicit path
    pub fn save_state_to(&self, path: &Path) -> Result<(), SaveStateError> {
        let state = SaveState::from_ppu(&self.bus.ppu);
        fs::write(path, state.to_bytes()?)?;
        log::info!("Saved state to {}", path.display());
        Ok(())
    }

    /// Restore the video-core state from a slot
    pub fn load_state(&mut self, slot: u8) -> Result<(), SaveStateError> {
        let path = self
            .config
            .save_state
            .save_directory
            .join(format!("slot_{}.state", slot));
        self.load_state_from(&path)
    }

    /// Restore the video-core state from an explicit path
    pub fn load_state_from(&mut self, path: &Path) -> Result<(), SaveStateError> {
        let bytes = fs::read(path)?;
        let state = SaveState::from_bytes(&bytes)?;
        state.restore_to_ppu(&mut self.bus.ppu)?;
        log::info!("Loaded state from {}", path.display());
        Ok(())
    }

    /// Save a screenshot of the last completed frame
    ///
    /// # Returns
    ///
    /// Result containing the path to the saved screenshot or an error
    pub fn screenshot(&self) -> Result<PathBuf, ScreenshotError> {
        let path = save_screenshot(
            self.bus.ppu.frame(),
            &self.config.screenshot.screenshot_directory,
            self.config.presentation.color_emulation,
            self.config.screenshot.include_timestamp,
        )?;
        log::info!("Screenshot saved to {}", path.display());
        Ok(path)
    }

    // ========================================
    // Accessors
    // ========================================

    pub fn ppu(&self) -> &Ppu {
        &self.bus.ppu
    }

    pub fn ppu_mut(&mut self) -> &mut Ppu {
        &mut self.bus.ppu
    }

    pub fn bus(&self) -> &VideoBus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut VideoBus {
        &mut self.bus
    }

    pub fn irq(&self) -> &IrqLatch {
        &self.irq
    }

    pub fn irq_mut(&mut self) -> &mut IrqLatch {
        &mut self.irq
    }

    pub fn dma(&self) -> &DmaChannels {
        &self.dma
    }

    pub fn dma_mut(&mut self) -> &mut DmaChannels {
        &mut self.dma
    }

    pub fn config(&self) -> &VideoSystemConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut VideoSystemConfig {
        &mut self.config
    }

    /// Frames completed since power-on
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Default for VideoSystem {
    fn default() -> Self {
        Self::new()
    }
}
