// Video memory bus
//
// Routes CPU-visible accesses to the video regions: the register window at
// 0x0400_0000, palette RAM at 0x0500_0000, VRAM at 0x0600_0000, and OAM at
// 0x0700_0000. Width quirks (byte-write widening, ignored OAM byte writes)
// live in the PPU's memory accessors; the bus only decodes.

use crate::ppu::constants::IO_WINDOW_SIZE;
use crate::ppu::Ppu;

/// Width-aware bus interface
pub trait Bus {
    fn read8(&self, addr: u32) -> u8;
    fn read16(&self, addr: u32) -> u16;
    fn read32(&self, addr: u32) -> u32;
    fn write8(&mut self, addr: u32, data: u8);
    fn write16(&mut self, addr: u32, data: u16);
    fn write32(&mut self, addr: u32, data: u32);
}

/// Bus exposing the video core's CPU-visible address space
///
/// Accesses outside the video regions read as zero and ignore writes, so the
/// bus can stand alone in tests without the rest of the machine attached.
pub struct VideoBus {
    pub ppu: Ppu,
}

impl VideoBus {
    pub fn new() -> Self {
        VideoBus { ppu: Ppu::new() }
    }

    fn io_offset(addr: u32) -> Option<u32> {
        let offset = addr & 0x00FF_FFFF;
        (offset < IO_WINDOW_SIZE).then_some(offset)
    }
}

impl Default for VideoBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for VideoBus {
    fn read8(&self, addr: u32) -> u8 {
        match addr >> 24 {
            0x04 => Self::io_offset(addr).map_or(0, |offset| self.ppu.read_io8(offset)),
            0x05 => self.ppu.read_pram8(addr),
            0x06 => self.ppu.read_vram8(addr),
            0x07 => self.ppu.read_oam8(addr),
            _ => 0,
        }
    }

    fn read16(&self, addr: u32) -> u16 {
        match addr >> 24 {
            0x04 => Self::io_offset(addr).map_or(0, |offset| self.ppu.read_io16(offset)),
            0x05 => self.ppu.read_pram16(addr),
            0x06 => self.ppu.read_vram16(addr),
            0x07 => self.ppu.read_oam16(addr),
            _ => 0,
        }
    }

    fn read32(&self, addr: u32) -> u32 {
        match addr >> 24 {
            0x04 => Self::io_offset(addr).map_or(0, |offset| self.ppu.read_io32(offset)),
            0x05 => self.ppu.read_pram32(addr),
            0x06 => self.ppu.read_vram32(addr),
            0x07 => self.ppu.read_oam32(addr),
            _ => 0,
        }
    }

    fn write8(&mut self, addr: u32, data: u8) {
        match addr >> 24 {
            0x04 => {
                if let Some(offset) = Self::io_offset(addr) {
                    self.ppu.write_io8(offset, data);
                }
            }
            0x05 => self.ppu.write_pram8(addr, data),
            0x06 => self.ppu.write_vram8(addr, data),
            0x07 => self.ppu.write_oam8(addr, data),
            _ => {}
        }
    }

    fn write16(&mut self, addr: u32, data: u16) {
        match addr >> 24 {
            0x04 => {
                if let Some(offset) = Self::io_offset(addr) {
                    self.ppu.write_io16(offset, data);
                }
            }
            0x05 => self.ppu.write_pram16(addr, data),
            0x06 => self.ppu.write_vram16(addr, data),
            0x07 => self.ppu.write_oam16(addr, data),
            _ => {}
        }
    }

    fn write32(&mut self, addr: u32, data: u32) {
        match addr >> 24 {
            0x04 => {
                if let Some(offset) = Self::io_offset(addr) {
                    self.ppu.write_io32(offset, data);
                }
            }
            0x05 => self.ppu.write_pram32(addr, data),
            0x06 => self.ppu.write_vram32(addr, data),
            0x07 => self.ppu.write_oam32(addr, data),
            _ => {}
        }
    }
}
