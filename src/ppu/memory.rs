// PPU memory access methods
//
// Width-aware accessors for the three PPU-owned memory regions. Addresses are
// always masked into the region (hardware mirroring); an out-of-range address
// is folded, never an error. Sub-word writes follow the hardware widening
// rules: palette and background-VRAM byte writes are duplicated into both
// halves of the containing 16-bit slot, object-VRAM and OAM byte writes are
// ignored.

use super::constants::{OAM_SIZE, PRAM_ENTRIES, VRAM_SIZE};
use super::Ppu;

impl Ppu {
    /// Fold a bus address into a VRAM offset
    ///
    /// VRAM is 96 KiB mirrored in a 128 KiB window: the upper 32 KiB region
    /// maps the object-character 32 KiB twice.
    pub(crate) fn vram_offset(addr: u32) -> usize {
        let offset = (addr as usize) & 0x1FFFF;
        if offset >= VRAM_SIZE {
            offset - 0x8000
        } else {
            offset
        }
    }

    /// First VRAM offset belonging to object character data
    ///
    /// In bitmap modes the frame buffer claims an extra 16 KiB, so the
    /// byte-write-ignore region starts later.
    fn obj_vram_floor(&self) -> usize {
        if self.bg_mode() >= 3 {
            0x14000
        } else {
            0x10000
        }
    }

    // ========================================
    // VRAM
    // ========================================

    pub(crate) fn read_vram8(&self, addr: u32) -> u8 {
        self.vram[Self::vram_offset(addr)]
    }

    pub(crate) fn read_vram16(&self, addr: u32) -> u16 {
        let offset = Self::vram_offset(addr & !1);
        u16::from_le_bytes([self.vram[offset], self.vram[offset + 1]])
    }

    pub(crate) fn read_vram32(&self, addr: u32) -> u32 {
        let lo = self.read_vram16(addr & !3) as u32;
        let hi = self.read_vram16((addr & !3) | 2) as u32;
        hi << 16 | lo
    }

    /// 8-bit VRAM writes are widened to 16 bits in background pages and
    /// ignored in object pages (hardware rule)
    pub(crate) fn write_vram8(&mut self, addr: u32, data: u8) {
        let offset = Self::vram_offset(addr & !1);
        if offset >= self.obj_vram_floor() {
            return;
        }
        self.vram[offset] = data;
        self.vram[offset + 1] = data;
    }

    pub(crate) fn write_vram16(&mut self, addr: u32, data: u16) {
        let offset = Self::vram_offset(addr & !1);
        self.vram[offset..offset + 2].copy_from_slice(&data.to_le_bytes());
    }

    pub(crate) fn write_vram32(&mut self, addr: u32, data: u32) {
        self.write_vram16(addr & !3, data as u16);
        self.write_vram16((addr & !3) | 2, (data >> 16) as u16);
    }

    // ========================================
    // Palette RAM
    // ========================================

    fn pram_index(addr: u32) -> usize {
        ((addr >> 1) as usize) & (PRAM_ENTRIES - 1)
    }

    pub(crate) fn read_pram8(&self, addr: u32) -> u8 {
        let entry = self.pram[Self::pram_index(addr)];
        if addr & 1 == 0 {
            entry as u8
        } else {
            (entry >> 8) as u8
        }
    }

    pub(crate) fn read_pram16(&self, addr: u32) -> u16 {
        self.pram[Self::pram_index(addr)]
    }

    pub(crate) fn read_pram32(&self, addr: u32) -> u32 {
        let lo = self.read_pram16(addr & !3) as u32;
        let hi = self.read_pram16((addr & !3) | 2) as u32;
        hi << 16 | lo
    }

    /// Palette writes always operate at 16-bit granularity: a byte write is
    /// expanded by duplicating the byte into both halves of its slot
    /// (hardware-mandated)
    pub(crate) fn write_pram8(&mut self, addr: u32, data: u8) {
        self.pram[Self::pram_index(addr)] = u16::from_le_bytes([data, data]);
    }

    pub(crate) fn write_pram16(&mut self, addr: u32, data: u16) {
        self.pram[Self::pram_index(addr)] = data;
    }

    pub(crate) fn write_pram32(&mut self, addr: u32, data: u32) {
        self.write_pram16(addr & !3, data as u16);
        self.write_pram16((addr & !3) | 2, (data >> 16) as u16);
    }

    // ========================================
    // OAM
    // ========================================

    fn oam_offset(addr: u32) -> usize {
        (addr as usize) & (OAM_SIZE - 1)
    }

    pub(crate) fn read_oam8(&self, addr: u32) -> u8 {
        self.oam[Self::oam_offset(addr)]
    }

    pub(crate) fn read_oam16(&self, addr: u32) -> u16 {
        let offset = Self::oam_offset(addr & !1);
        u16::from_le_bytes([self.oam[offset], self.oam[offset + 1]])
    }

    pub(crate) fn read_oam32(&self, addr: u32) -> u32 {
        let lo = self.read_oam16(addr & !3) as u32;
        let hi = self.read_oam16((addr & !3) | 2) as u32;
        hi << 16 | lo
    }

    /// 8-bit OAM writes are ignored (hardware rule)
    pub(crate) fn write_oam8(&mut self, _addr: u32, _data: u8) {}

    pub(crate) fn write_oam16(&mut self, addr: u32, data: u16) {
        let offset = Self::oam_offset(addr & !1);
        self.oam[offset..offset + 2].copy_from_slice(&data.to_le_bytes());
    }

    pub(crate) fn write_oam32(&mut self, addr: u32, data: u32) {
        self.write_oam16(addr & !3, data as u16);
        self.write_oam16((addr & !3) | 2, (data >> 16) as u16);
    }
}
