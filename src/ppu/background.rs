// Background layer rendering
//
// Each of the four background units owns its scroll/mode/affine registers and
// produces one (color, priority, opaque) candidate per pixel. Which sampling
// path runs depends on the video mode: text (tile map + scroll), affine
// (2x2 matrix over a latched reference point), or one of the three bitmap
// modes on layer 2.

use serde::{Deserialize, Serialize};

use super::Ppu;

/// One per-pixel layer candidate fed to the compositor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Pixel {
    /// BGR555 color
    pub(crate) color: u16,
    /// Priority value, 0 (front) to 3 (back)
    pub(crate) priority: u8,
    /// Transparent candidates never win pass 1
    pub(crate) opaque: bool,
}

/// State for one background layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Background {
    pub(crate) id: usize,
    /// BGxCNT
    pub(crate) control: u16,
    /// BGxHOFS / BGxVOFS (9 bits each)
    pub(crate) hofs: u16,
    pub(crate) vofs: u16,
    /// Affine matrix, 8.8 fixed point (layers 2 and 3 only)
    pub(crate) pa: i32,
    pub(crate) pb: i32,
    pub(crate) pc: i32,
    pub(crate) pd: i32,
    /// Live reference point, 20.8 fixed point sign-extended from 28 bits.
    /// Register writes land here; rendering never reads it directly.
    pub(crate) x: i32,
    pub(crate) y: i32,
    /// Latched shadow of the reference point, resynchronized from the live
    /// pair once per frame and advanced by (pb, pd) per scanline.
    pub(crate) lx: i32,
    pub(crate) ly: i32,
    /// Latched copy of (lx, ly) at the top of each mosaic block row
    pub(crate) mlx: i32,
    pub(crate) mly: i32,
    /// Candidate for the pixel currently in flight
    pub(crate) output: Pixel,
}

impl Background {
    pub(crate) fn new(id: usize) -> Self {
        Background {
            id,
            control: 0,
            hofs: 0,
            vofs: 0,
            pa: 0,
            pb: 0,
            pc: 0,
            pd: 0,
            x: 0,
            y: 0,
            lx: 0,
            ly: 0,
            mlx: 0,
            mly: 0,
            output: Pixel::default(),
        }
    }

    pub(crate) fn priority(&self) -> u8 {
        (self.control & 0x0003) as u8
    }

    fn char_base(&self) -> usize {
        ((self.control >> 2) & 0x0003) as usize * 0x4000
    }

    pub(crate) fn mosaic_enabled(&self) -> bool {
        self.control & 0x0040 != 0
    }

    fn bpp8(&self) -> bool {
        self.control & 0x0080 != 0
    }

    fn screen_base(&self) -> usize {
        ((self.control >> 8) & 0x001F) as usize * 0x800
    }

    fn wraparound(&self) -> bool {
        self.control & 0x2000 != 0
    }

    fn screen_size(&self) -> u16 {
        self.control >> 14
    }

    /// Resynchronize the latched reference point from the live pair
    /// (top-of-frame boundary)
    pub(crate) fn latch_reference(&mut self) {
        self.lx = self.x;
        self.ly = self.y;
        self.mlx = self.lx;
        self.mly = self.ly;
    }

    /// Sign-extend a 28-bit reference-point register to 20.8 fixed point
    fn extend28(raw: u32) -> i32 {
        ((raw << 4) as i32) >> 4
    }

    pub(crate) fn write_ref_x(&mut self, half: u16, high: bool) {
        let raw = (self.x as u32) & 0x0FFF_FFFF;
        let raw = if high {
            (raw & 0x0000_FFFF) | (u32::from(half) & 0x0FFF) << 16
        } else {
            (raw & 0x0FFF_0000) | u32::from(half)
        };
        self.x = Self::extend28(raw);
    }

    pub(crate) fn write_ref_y(&mut self, half: u16, high: bool) {
        let raw = (self.y as u32) & 0x0FFF_FFFF;
        let raw = if high {
            (raw & 0x0000_FFFF) | (u32::from(half) & 0x0FFF) << 16
        } else {
            (raw & 0x0FFF_0000) | u32::from(half)
        };
        self.y = Self::extend28(raw);
    }
}

impl Ppu {
    /// Per-scanline background hook
    ///
    /// Advances the latched affine reference point by the per-scanline deltas,
    /// except on the frame-boundary line whose resync just happened, and
    /// latches the mosaic row anchor at the top of each block row.
    pub(crate) fn bg_scanline(&mut self, n: usize, y: u16) {
        if n < 2 {
            return;
        }
        let vsize = self.dac.bg_mosaic_v();
        let bg = &mut self.bg[n];
        if y != 0 {
            bg.lx += bg.pb;
            bg.ly += bg.pd;
        }
        if u32::from(y) % vsize == 0 {
            bg.mlx = bg.lx;
            bg.mly = bg.ly;
        }
    }

    /// Per-pixel background hook: computes the layer's candidate for (x, y)
    pub(crate) fn bg_run(&mut self, n: usize, x: u32, y: u32) {
        let mode = self.bg_mode();
        let output = if !self.bg_enabled(n) {
            Pixel::default()
        } else {
            match (mode, n) {
                (0, _) | (1, 0) | (1, 1) => self.bg_text_pixel(n, x, y),
                (1, 2) | (2, 2) | (2, 3) => self.bg_affine_tile_pixel(n, x),
                (3, 2) | (4, 2) | (5, 2) => self.bg_bitmap_pixel(n, x),
                _ => Pixel::default(),
            }
        };
        self.bg[n].output = output;
    }

    /// Text-mode sampling: scroll, screen-entry lookup, 4/8 bpp tile fetch
    fn bg_text_pixel(&self, n: usize, x: u32, y: u32) -> Pixel {
        let bg = &self.bg[n];
        let (mut x, mut y) = (x, y);
        if bg.mosaic_enabled() {
            x -= x % self.dac.bg_mosaic_h();
            y -= y % self.dac.bg_mosaic_v();
        }
        let fx = x + u32::from(bg.hofs);
        let fy = y + u32::from(bg.vofs);

        // Map dimensions in tiles per screen size
        let (tw, th) = match bg.screen_size() {
            0 => (32, 32),
            1 => (64, 32),
            2 => (32, 64),
            _ => (64, 64),
        };
        let mx = (fx / 8) % tw;
        let my = (fy / 8) % th;
        // Screenblocks beyond the first are laid out 2 KiB apart
        let block = match bg.screen_size() {
            0 => 0,
            1 => mx / 32,
            2 => my / 32,
            _ => (my / 32) * 2 + mx / 32,
        };
        let map_addr = bg.screen_base() + block as usize * 0x800 + ((my % 32) * 32 + (mx % 32)) as usize * 2;
        let entry = self.read_vram16(map_addr as u32);

        let tile = u32::from(entry & 0x03FF);
        let hflip = entry & 0x0400 != 0;
        let vflip = entry & 0x0800 != 0;
        let palette = u32::from(entry >> 12);

        let px = if hflip { 7 - fx % 8 } else { fx % 8 };
        let py = if vflip { 7 - fy % 8 } else { fy % 8 };

        let (index, entry_index) = if bg.bpp8() {
            let addr = bg.char_base() + (tile * 64 + py * 8 + px) as usize;
            if addr >= 0x10000 {
                return Pixel::default();
            }
            let index = u32::from(self.vram[addr]);
            (index, index)
        } else {
            let addr = bg.char_base() + (tile * 32 + py * 4 + px / 2) as usize;
            if addr >= 0x10000 {
                return Pixel::default();
            }
            let index = u32::from(self.vram[addr]) >> (px & 1) * 4 & 0x0F;
            (index, palette * 16 + index)
        };

        Pixel {
            color: self.pram[entry_index as usize] & 0x7FFF,
            priority: bg.priority(),
            opaque: index != 0,
        }
    }

    /// Sample coordinate for an affine-capable layer at screen column `x`,
    /// in 20.8 fixed point
    fn bg_affine_coords(&self, n: usize, x: u32) -> (i32, i32) {
        let bg = &self.bg[n];
        let x = if bg.mosaic_enabled() {
            x - x % self.dac.bg_mosaic_h()
        } else {
            x
        };
        let (bx, by) = if bg.mosaic_enabled() {
            (bg.mlx, bg.mly)
        } else {
            (bg.lx, bg.ly)
        };
        (bx + bg.pa * x as i32, by + bg.pc * x as i32)
    }

    /// Affine tile sampling: always 8 bpp, one-byte map entries, optional
    /// wraparound
    fn bg_affine_tile_pixel(&self, n: usize, x: u32) -> Pixel {
        let (cx, cy) = self.bg_affine_coords(n, x);
        let bg = &self.bg[n];
        let size = 128 << bg.screen_size(); // pixels per side
        let (mut tx, mut ty) = (cx >> 8, cy >> 8);
        if bg.wraparound() {
            tx &= size - 1;
            ty &= size - 1;
        } else if tx < 0 || ty < 0 || tx >= size || ty >= size {
            return Pixel::default();
        }
        let tiles = (size / 8) as usize;
        let map_addr = bg.screen_base() + (ty / 8) as usize * tiles + (tx / 8) as usize;
        if map_addr >= 0x10000 {
            return Pixel::default();
        }
        let tile = u32::from(self.vram[map_addr]);
        let addr = bg.char_base() + (tile * 64) as usize + ((ty % 8) * 8 + tx % 8) as usize;
        if addr >= 0x10000 {
            return Pixel::default();
        }
        let index = self.vram[addr] as usize;
        Pixel {
            color: self.pram[index] & 0x7FFF,
            priority: bg.priority(),
            opaque: index != 0,
        }
    }

    /// Bitmap-mode sampling on layer 2 (modes 3, 4, 5): the affine transform
    /// still applies, out-of-bounds samples are transparent
    fn bg_bitmap_pixel(&self, n: usize, x: u32) -> Pixel {
        let (cx, cy) = self.bg_affine_coords(n, x);
        let bg = &self.bg[n];
        let (tx, ty) = (cx >> 8, cy >> 8);
        let mode = self.bg_mode();
        let (width, height) = if mode == 5 { (160, 128) } else { (240, 160) };
        if tx < 0 || ty < 0 || tx >= width || ty >= height {
            return Pixel::default();
        }
        let (tx, ty) = (tx as u32, ty as u32);
        let frame = if self.bitmap_frame_select() { 0xA000 } else { 0 };

        let (color, opaque) = match mode {
            // Direct 15-bit color, full screen
            3 => (self.read_vram16((ty * 240 + tx) * 2), true),
            // Paletted, double-buffered
            4 => {
                let index = self.vram[frame + (ty * 240 + tx) as usize] as usize;
                (self.pram[index], index != 0)
            }
            // Direct 15-bit color, small double-buffered frame
            _ => (self.read_vram16(frame as u32 + (ty * 160 + tx) * 2), true),
        };

        Pixel {
            color: color & 0x7FFF,
            priority: bg.priority(),
            opaque,
        }
    }
}
