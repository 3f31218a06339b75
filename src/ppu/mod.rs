// PPU module - Picture Processing Unit implementation
//
// Cycle-accurate emulation of the GBA video chip: four tile/bitmap/affine
// background layers, the object (sprite) layer, four window units, and the
// final priority/blend compositor, all driven by a per-scanline timing state
// machine. The PPU is an explicitly owned context; the enclosing system
// constructs one at power-on and passes collaborators (interrupt line, DMA
// hooks) into every `step` call.

pub(crate) mod constants;

mod background;
mod color;
mod dac;
mod memory;
mod object;
mod registers;
mod timing;
mod window;

#[cfg(test)]
mod tests;

pub use color::{bgr555_to_rgb, bgr555_to_rgb_lcd};
pub use constants::{
    CYCLES_PER_FRAME, CYCLES_PER_SCANLINE, FIRST_VBLANK_SCANLINE, LAST_VBLANK_SCANLINE,
    SCANLINES_PER_FRAME, SCREEN_HEIGHT, SCREEN_SIZE, SCREEN_WIDTH,
};

pub(crate) use background::Background;
pub(crate) use dac::Dac;
pub(crate) use object::{ObjPixel, Objects};
pub(crate) use timing::Phase;
pub(crate) use window::Window;

use constants::{OAM_SIZE, PRAM_ENTRIES, VRAM_SIZE};

/// PPU structure representing the complete video chip state
///
/// Owns the three memory regions (VRAM, palette RAM, OAM), the register file
/// (distributed across the background, window, and compositor sub-units), the
/// timing state machine, and the raw BGR555 frame buffer.
pub struct Ppu {
    // Memory regions
    pub(crate) vram: [u8; VRAM_SIZE],
    pub(crate) pram: [u16; PRAM_ENTRIES],
    pub(crate) oam: [u8; OAM_SIZE],

    // Display control and status
    pub(crate) dispcnt: u16,
    pub(crate) greenswap: u16,
    /// DISPSTAT writable bits only (interrupt enables + vcompare); the three
    /// status bits are live booleans below and composed on read.
    pub(crate) dispstat: u16,
    pub(crate) vcounter: u16,
    pub(crate) vblank: bool,
    pub(crate) hblank: bool,
    pub(crate) vcoincidence: bool,

    /// Force-blank delay latch: `[observed, written]`. Rendering reads slot 0,
    /// register writes set slot 1, and the timing engine shifts once per
    /// scanline, so the renderer always sees the value written one line ago.
    pub(crate) force_blank: [bool; 2],

    // Rendering sub-units (each owns its share of the register file)
    pub(crate) bg: [Background; 4],
    pub(crate) windows: [Window; 4],
    pub(crate) objects: Objects,
    pub(crate) dac: Dac,

    // Timing state
    pub(crate) phase: Phase,
    pub(crate) video_capture: bool,
    pub(crate) frame_ready: bool,
    accurate: bool,

    /// Raw frame output, one BGR555 color per visible pixel
    pub(crate) frame: [u16; constants::SCREEN_SIZE],
}

impl Ppu {
    /// Create a new PPU in its power-on state
    ///
    /// All memory regions and registers are zero-filled, matching hardware
    /// power-on.
    pub fn new() -> Self {
        Ppu {
            vram: [0; VRAM_SIZE],
            pram: [0; PRAM_ENTRIES],
            oam: [0; OAM_SIZE],
            dispcnt: 0,
            greenswap: 0,
            dispstat: 0,
            vcounter: 0,
            vblank: false,
            hblank: false,
            vcoincidence: false,
            force_blank: [false; 2],
            bg: [
                Background::new(0),
                Background::new(1),
                Background::new(2),
                Background::new(3),
            ],
            windows: [Window::new(); 4],
            objects: Objects::new(),
            dac: Dac::new(),
            phase: Phase::LineStart,
            video_capture: false,
            frame_ready: false,
            accurate: false,
            frame: [0; constants::SCREEN_SIZE],
        }
    }

    /// Select between fast (flat 960-cycle draw window) and accurate
    /// (per-pixel suspension) timing
    pub fn set_accurate(&mut self, accurate: bool) {
        self.accurate = accurate;
    }

    /// Whether accurate per-pixel timing is enabled
    pub fn accurate(&self) -> bool {
        self.accurate
    }

    /// Current scanline counter (0-227)
    pub fn vcounter(&self) -> u16 {
        self.vcounter
    }

    /// Whether the vertical blanking flag is currently asserted
    pub fn in_vblank(&self) -> bool {
        self.vblank
    }

    /// Whether the horizontal blanking flag is currently asserted
    pub fn in_hblank(&self) -> bool {
        self.hblank
    }

    /// Whether the vertical-coincidence comparator currently matches
    pub fn vcoincidence(&self) -> bool {
        self.vcoincidence
    }

    /// The raw BGR555 frame buffer (240x160)
    pub fn frame(&self) -> &[u16] {
        &self.frame
    }

    /// Poll and clear the frame-complete signal
    ///
    /// Set once per frame, on the final cycle of the last scanline.
    pub fn poll_frame(&mut self) -> bool {
        let ready = self.frame_ready;
        self.frame_ready = false;
        ready
    }

    // ========================================
    // DISPCNT decode helpers
    // ========================================

    pub(crate) fn bg_mode(&self) -> u16 {
        self.dispcnt & 0x0007
    }

    pub(crate) fn bitmap_frame_select(&self) -> bool {
        self.dispcnt & 0x0010 != 0
    }

    pub(crate) fn obj_mapping_1d(&self) -> bool {
        self.dispcnt & 0x0040 != 0
    }

    pub(crate) fn bg_enabled(&self, n: usize) -> bool {
        self.dispcnt & (0x0100 << n) != 0
    }

    pub(crate) fn obj_enabled(&self) -> bool {
        self.dispcnt & 0x1000 != 0
    }

    pub(crate) fn win0_enabled(&self) -> bool {
        self.dispcnt & 0x2000 != 0
    }

    pub(crate) fn win1_enabled(&self) -> bool {
        self.dispcnt & 0x4000 != 0
    }

    pub(crate) fn objwin_enabled(&self) -> bool {
        self.dispcnt & 0x8000 != 0
    }

    /// Whether the renderer outputs blank (white) pixels this scanline
    ///
    /// Observes the force-blank value written one scanline ago, or a halted
    /// CPU.
    pub(crate) fn blank(&self, cpu_halted: bool) -> bool {
        self.force_blank[0] || cpu_halted
    }
}

impl Default for Ppu {
    fn default() -> Self {
        Self::new()
    }
}
