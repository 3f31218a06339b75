// GBA Video Core Library
// Cycle-accurate emulation of the Game Boy Advance video chip

// Public modules
pub mod bus;
pub mod display;
pub mod dma;
pub mod irq;
pub mod ppu;
pub mod system;

// Re-export main types for convenience
pub use bus::{Bus, VideoBus};
pub use display::FrameBuffer;
pub use dma::{DmaChannels, DmaHooks, DmaTiming};
pub use irq::{Interrupt, InterruptLine, IrqLatch};
pub use ppu::Ppu;
pub use system::{
    Orientation, SaveState, SaveStateError, ScreenshotError, VideoSystem, VideoSystemConfig,
};
