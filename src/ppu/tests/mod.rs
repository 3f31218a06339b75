//! PPU unit tests
//!
//! This module contains comprehensive tests for the video core, organized by
//! functionality.

use super::*;
use crate::dma::DmaChannels;
use crate::irq::IrqLatch;

mod objects;

// ========================================
// Test Constants (register window offsets)
// ========================================

/// Display Control - Read/Write
pub(crate) const DISPCNT: u32 = 0x00;
/// Green Swap - Read/Write
pub(crate) const GREENSWAP: u32 = 0x02;
/// Display Status - Read/Write (bits 0-2 read only)
pub(crate) const DISPSTAT: u32 = 0x04;
/// Vertical Counter - Read only
pub(crate) const VCOUNT: u32 = 0x06;
/// Background 0 Control - Read/Write
pub(crate) const BG0CNT: u32 = 0x08;
/// Background 2 Control - Read/Write
pub(crate) const BG2CNT: u32 = 0x0C;
/// Background 3 Control - Read/Write
pub(crate) const BG3CNT: u32 = 0x0E;
/// Background 0 Horizontal Offset - Write only
pub(crate) const BG0HOFS: u32 = 0x10;
/// Background 0 Vertical Offset - Write only
pub(crate) const BG0VOFS: u32 = 0x12;
/// Background 2 Parameter A - Write only
pub(crate) const BG2PA: u32 = 0x20;
/// Background 2 Parameter D - Write only
pub(crate) const BG2PD: u32 = 0x26;
/// Background 2 Reference X (low) - Write only
pub(crate) const BG2X_L: u32 = 0x28;
/// Background 2 Reference X (high) - Write only
pub(crate) const BG2X_H: u32 = 0x2A;
/// Window 0 Horizontal bounds - Write only
pub(crate) const WIN0H: u32 = 0x40;
/// Window 0 Vertical bounds - Write only
pub(crate) const WIN0V: u32 = 0x44;
/// Window 1 Horizontal bounds - Write only
pub(crate) const WIN1H: u32 = 0x42;
/// Window 1 Vertical bounds - Write only
pub(crate) const WIN1V: u32 = 0x46;
/// Window Inside Control - Read/Write
pub(crate) const WININ: u32 = 0x48;
/// Window Outside Control - Read/Write
pub(crate) const WINOUT: u32 = 0x4A;
/// Mosaic Size - Write only
pub(crate) const MOSAIC: u32 = 0x4C;
/// Blend Control - Read/Write
pub(crate) const BLDCNT: u32 = 0x50;
/// Blend Alpha Coefficients - Read/Write
pub(crate) const BLDALPHA: u32 = 0x52;
/// Blend Brightness Coefficient - Write only
pub(crate) const BLDY: u32 = 0x54;

// Common BGR555 colors
pub(crate) const RED: u16 = 0x001F;
pub(crate) const GREEN: u16 = 0x03E0;
pub(crate) const BLUE: u16 = 0x7C00;
pub(crate) const WHITE: u16 = 0x7FFF;

// ========================================
// Test harness
// ========================================

/// Video core plus its collaborators, wired like the real system
pub(crate) struct Harness {
    pub(crate) ppu: Ppu,
    pub(crate) irq: IrqLatch,
    pub(crate) dma: DmaChannels,
}

impl Harness {
    pub(crate) fn new() -> Self {
        Harness {
            ppu: Ppu::new(),
            irq: IrqLatch::new(),
            dma: DmaChannels::new(),
        }
    }

    pub(crate) fn step(&mut self) -> u32 {
        self.ppu.step(&mut self.irq, &mut self.dma)
    }

    /// Step until at least `cycles` cycles have elapsed
    pub(crate) fn run_cycles(&mut self, cycles: u32) -> u32 {
        let mut elapsed = 0;
        while elapsed < cycles {
            elapsed += self.step();
        }
        elapsed
    }

    /// Step until the given scanline has just begun (its line-start slot has
    /// executed)
    pub(crate) fn run_to_scanline(&mut self, line: u16) {
        loop {
            if self.ppu.vcounter() == line && matches!(self.ppu.phase, Phase::Coincidence) {
                return;
            }
            self.step();
        }
    }

    /// Step until the given scanline has been fully drawn (its hblank has
    /// been asserted)
    pub(crate) fn render_line(&mut self, line: u16) {
        self.run_to_scanline(line);
        while !self.ppu.in_hblank() {
            self.step();
        }
    }

    /// Step until the frame-complete signal fires
    pub(crate) fn run_frame(&mut self) -> u32 {
        let mut elapsed = 0;
        loop {
            elapsed += self.step();
            if self.ppu.poll_frame() {
                return elapsed;
            }
        }
    }

    /// Sample the raw frame buffer
    pub(crate) fn pixel(&self, x: usize, y: usize) -> u16 {
        self.ppu.frame()[y * SCREEN_WIDTH + x]
    }
}

// ========================================
// Scene-building helpers
// ========================================

/// Fill one 4bpp tile with a single palette index
pub(crate) fn fill_tile_4bpp(ppu: &mut Ppu, char_base: u32, tile: u32, index: u8) {
    let byte = index << 4 | index;
    for offset in 0..32 {
        let addr = char_base + tile * 32 + offset;
        // Widened byte writes land on both halves, which is what we want
        ppu.write_vram16(addr & !1, u16::from_le_bytes([byte, byte]));
    }
}

/// Fill one 8bpp tile with a single palette index
pub(crate) fn fill_tile_8bpp(ppu: &mut Ppu, char_base: u32, tile: u32, index: u8) {
    for offset in 0..64 {
        let addr = char_base + tile * 64 + offset;
        ppu.write_vram16(addr & !1, u16::from_le_bytes([index, index]));
    }
}

/// Write one OAM attribute triple
pub(crate) fn write_object(ppu: &mut Ppu, index: u32, attr0: u16, attr1: u16, attr2: u16) {
    let base = index * 8;
    ppu.write_oam16(base, attr0);
    ppu.write_oam16(base + 2, attr1);
    ppu.write_oam16(base + 4, attr2);
}

/// Fill one 4bpp object tile with a single palette index
pub(crate) fn fill_obj_tile_4bpp(ppu: &mut Ppu, tile: u32, index: u8) {
    fill_tile_4bpp(ppu, 0x10000, tile, index);
}
