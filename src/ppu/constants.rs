// PPU constants

/// Screen width in pixels
pub const SCREEN_WIDTH: usize = 240;

/// Screen height in pixels
pub const SCREEN_HEIGHT: usize = 160;

/// Total number of pixels in one frame
pub const SCREEN_SIZE: usize = SCREEN_WIDTH * SCREEN_HEIGHT;

/// Size of VRAM in bytes (96 KiB)
pub(super) const VRAM_SIZE: usize = 96 * 1024;

/// Number of 16-bit palette entries (256 background + 256 object)
pub(super) const PRAM_ENTRIES: usize = 512;

/// Size of OAM in bytes (128 sprite entries + 32 affine parameter groups)
pub(super) const OAM_SIZE: usize = 1024;

/// Number of sprite entries in OAM
pub(super) const OAM_ENTRIES: usize = 128;

/// Start of object character data within VRAM (tile modes)
pub(super) const OBJ_VRAM_BASE: usize = 0x10000;

/// First usable object tile in bitmap modes (3-5)
///
/// The lower half of object character memory overlaps the bitmap frame
/// buffer in those modes and samples as transparent.
pub(super) const OBJ_BITMAP_TILE_FLOOR: u32 = 512;

/// Size of the PPU register window in bytes (offsets 0x000-0x055)
pub(crate) const IO_WINDOW_SIZE: u32 = 0x56;

// ========================================
// Timing constants
// ========================================

/// Number of PPU cycles per scanline
pub const CYCLES_PER_SCANLINE: u32 = 1232;

/// Number of scanlines per frame (160 visible + 68 blanking)
pub const SCANLINES_PER_FRAME: u16 = 228;

/// Total PPU cycles per frame
/// 1232 cycles/scanline x 228 scanlines = 280,896 cycles
pub const CYCLES_PER_FRAME: u32 = CYCLES_PER_SCANLINE * SCANLINES_PER_FRAME as u32;

/// First scanline of the vertical blanking interval
pub const FIRST_VBLANK_SCANLINE: u16 = 160;

/// Last scanline on which the vblank flag reads back set
///
/// The flag clears one line before wraparound so that vblank DMA armed on
/// the final line of a frame does not retrigger.
pub const LAST_VBLANK_SCANLINE: u16 = 226;

/// Scanline at which the video-capture DMA arm/disarm decision is taken
pub(super) const CAPTURE_DECISION_SCANLINE: u16 = 162;

/// Length of the visible-pixel window in cycles (240 pixels x 4 cycles)
pub(super) const DRAW_CYCLES: u32 = 960;

/// Cycles from the hblank-DMA trigger to the end of the scanline
pub(super) const TAIL_CYCLES: u32 = 223;
