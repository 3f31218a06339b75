// Memory-mapped register access
//
// The video core decodes an 86-byte register window at offsets 0x00-0x55.
// All registers are 16 bits wide; byte access is composed on top of the
// halfword handlers, and 32-bit access is two halfword accesses.

use super::Ppu;

impl Ppu {
    // ========================================================================
    // Reads
    // ========================================================================

    /// Read a 16-bit register at the given window offset
    ///
    /// Write-only registers and unmapped offsets read as zero.
    pub fn read_io16(&self, addr: u32) -> u16 {
        match addr & !1 {
            // DISPCNT
            0x00 => self.dispcnt,
            // GREENSWAP
            0x02 => self.greenswap,
            // DISPSTAT: live status in bits 0-2, stored enables above
            0x04 => {
                self.dispstat
                    | u16::from(self.vblank)
                    | u16::from(self.hblank) << 1
                    | u16::from(self.vcoincidence) << 2
            }
            // VCOUNT
            0x06 => self.vcounter,
            // BG0CNT-BG3CNT
            0x08..=0x0E => self.bg[(addr as usize >> 1) & 3].control,
            // WININ / WINOUT
            0x48 => u16::from(self.windows[0].control) | u16::from(self.windows[1].control) << 8,
            0x4A => u16::from(self.windows[3].control) | u16::from(self.windows[2].control) << 8,
            // BLDCNT / BLDALPHA
            0x50 => self.dac.bldcnt,
            0x52 => self.dac.bldalpha,
            _ => 0,
        }
    }

    /// Read a single register byte
    pub fn read_io8(&self, addr: u32) -> u8 {
        let half = self.read_io16(addr);
        (half >> (addr & 1) * 8) as u8
    }

    /// Read two adjacent registers as one 32-bit value
    pub fn read_io32(&self, addr: u32) -> u32 {
        let addr = addr & !3;
        u32::from(self.read_io16(addr)) | u32::from(self.read_io16(addr | 2)) << 16
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Write a 16-bit register at the given window offset
    pub fn write_io16(&mut self, addr: u32, data: u16) {
        match addr & !1 {
            0x00 => self.dispcnt = data,
            0x02 => self.greenswap = data,
            // Status bits 0-2 are read-only
            0x04 => self.dispstat = data & 0xFF38,
            0x06 => {}
            0x08..=0x0E => {
                let n = (addr as usize >> 1) & 3;
                // Bit 13 is only wired up on the affine-capable layers
                self.bg[n].control = data & if n < 2 { 0xDFFF } else { 0xFFFF };
            }
            // Scroll registers, 9 bits each
            0x10 | 0x14 | 0x18 | 0x1C => self.bg[(addr as usize >> 2) & 3].hofs = data & 0x01FF,
            0x12 | 0x16 | 0x1A | 0x1E => self.bg[(addr as usize >> 2) & 3].vofs = data & 0x01FF,
            // Affine matrices, 8.8 fixed point
            0x20 => self.bg[2].pa = i32::from(data as i16),
            0x22 => self.bg[2].pb = i32::from(data as i16),
            0x24 => self.bg[2].pc = i32::from(data as i16),
            0x26 => self.bg[2].pd = i32::from(data as i16),
            0x30 => self.bg[3].pa = i32::from(data as i16),
            0x32 => self.bg[3].pb = i32::from(data as i16),
            0x34 => self.bg[3].pc = i32::from(data as i16),
            0x36 => self.bg[3].pd = i32::from(data as i16),
            // Affine reference points, 28 bits sign-extended; the rendering
            // copy is only resynchronized at the top of the frame
            0x28 => self.bg[2].write_ref_x(data, false),
            0x2A => self.bg[2].write_ref_x(data, true),
            0x2C => self.bg[2].write_ref_y(data, false),
            0x2E => self.bg[2].write_ref_y(data, true),
            0x38 => self.bg[3].write_ref_x(data, false),
            0x3A => self.bg[3].write_ref_x(data, true),
            0x3C => self.bg[3].write_ref_y(data, false),
            0x3E => self.bg[3].write_ref_y(data, true),
            // Window bounds: start in the high byte, end in the low byte
            0x40 | 0x42 => {
                let w = &mut self.windows[(addr as usize >> 1) & 1];
                w.x1 = (data >> 8) as u8;
                w.x2 = data as u8;
            }
            0x44 | 0x46 => {
                let w = &mut self.windows[(addr as usize >> 1) & 1];
                w.y1 = (data >> 8) as u8;
                w.y2 = data as u8;
            }
            0x48 => {
                self.windows[0].control = (data & 0x3F) as u8;
                self.windows[1].control = (data >> 8 & 0x3F) as u8;
            }
            0x4A => {
                self.windows[3].control = (data & 0x3F) as u8;
                self.windows[2].control = (data >> 8 & 0x3F) as u8;
            }
            0x4C => self.dac.mosaic = data,
            0x50 => self.dac.bldcnt = data & 0x3FFF,
            0x52 => self.dac.bldalpha = data & 0x1F1F,
            0x54 => self.dac.bldy = data & 0x001F,
            _ => {}
        }
    }

    /// Write a single register byte, leaving its partner byte untouched
    pub fn write_io8(&mut self, addr: u32, data: u8) {
        let current = self.io_latch(addr);
        let half = if addr & 1 == 0 {
            current & 0xFF00 | u16::from(data)
        } else {
            current & 0x00FF | u16::from(data) << 8
        };
        self.write_io16(addr, half);
    }

    /// Write two adjacent registers from one 32-bit value
    pub fn write_io32(&mut self, addr: u32, data: u32) {
        let addr = addr & !3;
        self.write_io16(addr, data as u16);
        self.write_io16(addr | 2, (data >> 16) as u16);
    }

    /// Internal latch readback for byte-write composition
    ///
    /// Differs from the bus-visible read for write-only registers, whose
    /// stored value must survive a partial write.
    fn io_latch(&self, addr: u32) -> u16 {
        match addr & !1 {
            0x10 | 0x14 | 0x18 | 0x1C => self.bg[(addr as usize >> 2) & 3].hofs,
            0x12 | 0x16 | 0x1A | 0x1E => self.bg[(addr as usize >> 2) & 3].vofs,
            0x20 => self.bg[2].pa as u16,
            0x22 => self.bg[2].pb as u16,
            0x24 => self.bg[2].pc as u16,
            0x26 => self.bg[2].pd as u16,
            0x30 => self.bg[3].pa as u16,
            0x32 => self.bg[3].pb as u16,
            0x34 => self.bg[3].pc as u16,
            0x36 => self.bg[3].pd as u16,
            0x28 => self.bg[2].x as u16,
            0x2A => (self.bg[2].x >> 16) as u16,
            0x2C => self.bg[2].y as u16,
            0x2E => (self.bg[2].y >> 16) as u16,
            0x38 => self.bg[3].x as u16,
            0x3A => (self.bg[3].x >> 16) as u16,
            0x3C => self.bg[3].y as u16,
            0x3E => (self.bg[3].y >> 16) as u16,
            0x40 | 0x42 => {
                let w = &self.windows[(addr as usize >> 1) & 1];
                u16::from(w.x1) << 8 | u16::from(w.x2)
            }
            0x44 | 0x46 => {
                let w = &self.windows[(addr as usize >> 1) & 1];
                u16::from(w.y1) << 8 | u16::from(w.y2)
            }
            0x4C => self.dac.mosaic,
            0x54 => self.dac.bldy,
            _ => self.read_io16(addr),
        }
    }
}
