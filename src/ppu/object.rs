// Object (sprite) rendering
//
// Objects are evaluated once per scanline into a 240-entry line buffer plus
// an object-window mask. OAM holds 128 attribute triples, 8 bytes apart, with
// the affine parameter groups interleaved between them.

use serde::{Deserialize, Serialize};

use super::constants::{OAM_ENTRIES, OBJ_BITMAP_TILE_FLOOR, OBJ_VRAM_BASE, SCREEN_WIDTH};
use super::Ppu;

/// One object line-buffer slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ObjPixel {
    pub(crate) color: u16,
    pub(crate) priority: u8,
    pub(crate) opaque: bool,
    /// Set for semi-transparent objects (attr0 mode 1)
    pub(crate) translucent: bool,
}

/// Per-scanline object output
#[derive(Debug, Clone)]
pub(crate) struct Objects {
    pub(crate) line: [ObjPixel; SCREEN_WIDTH],
    /// Object-window coverage (attr0 mode 2 objects render here instead)
    pub(crate) window: [bool; SCREEN_WIDTH],
}

impl Objects {
    pub(crate) fn new() -> Self {
        Objects {
            line: [ObjPixel::default(); SCREEN_WIDTH],
            window: [false; SCREEN_WIDTH],
        }
    }
}

/// Decoded OAM attributes for one object
struct Attributes {
    y: u32,
    affine: bool,
    double_size: bool,
    disabled: bool,
    mode: u16,
    mosaic: bool,
    bpp8: bool,
    x: u32,
    group: usize,
    hflip: bool,
    vflip: bool,
    tile: u32,
    priority: u8,
    palette: u32,
    width: u32,
    height: u32,
}

/// Object dimensions by (shape, size)
const OBJ_SIZES: [[(u32, u32); 4]; 3] = [
    [(8, 8), (16, 16), (32, 32), (64, 64)],
    [(16, 8), (32, 8), (32, 16), (64, 32)],
    [(8, 16), (8, 32), (16, 32), (32, 64)],
];

impl Attributes {
    fn decode(oam: &[u8], index: usize) -> Option<Self> {
        let base = index * 8;
        let attr0 = u16::from_le_bytes([oam[base], oam[base + 1]]);
        let attr1 = u16::from_le_bytes([oam[base + 2], oam[base + 3]]);
        let attr2 = u16::from_le_bytes([oam[base + 4], oam[base + 5]]);

        let shape = (attr0 >> 14) as usize;
        if shape == 3 {
            return None;
        }
        let (width, height) = OBJ_SIZES[shape][(attr1 >> 14) as usize];

        Some(Attributes {
            y: u32::from(attr0 & 0x00FF),
            affine: attr0 & 0x0100 != 0,
            double_size: attr0 & 0x0200 != 0,
            disabled: attr0 & 0x0300 == 0x0200,
            mode: attr0 >> 10 & 3,
            mosaic: attr0 & 0x1000 != 0,
            bpp8: attr0 & 0x2000 != 0,
            x: u32::from(attr1 & 0x01FF),
            group: (attr1 >> 9 & 0x1F) as usize,
            hflip: attr1 & 0x1000 != 0,
            vflip: attr1 & 0x2000 != 0,
            tile: u32::from(attr2 & 0x03FF),
            priority: (attr2 >> 10 & 3) as u8,
            palette: u32::from(attr2 >> 12),
            width,
            height,
        })
    }
}

impl Ppu {
    /// Evaluate all 128 objects for scanline `y` into the line buffer
    ///
    /// Objects are walked in OAM order; a texel claims a pixel only when the
    /// slot is still transparent or the object's priority is strictly better,
    /// so ties go to the lower OAM index.
    pub(crate) fn obj_scanline(&mut self, y: u16) {
        self.objects.line = [ObjPixel::default(); SCREEN_WIDTH];
        self.objects.window = [false; SCREEN_WIDTH];
        if !self.obj_enabled() {
            return;
        }
        let y = u32::from(y);
        for index in 0..OAM_ENTRIES {
            let attrs = match Attributes::decode(&self.oam, index) {
                Some(attrs) => attrs,
                None => continue,
            };
            if attrs.mode == 3 || (!attrs.affine && attrs.disabled) {
                continue;
            }
            self.obj_render(&attrs, y);
        }
    }

    fn obj_render(&mut self, attrs: &Attributes, y: u32) {
        // Bounding box; double-size affine objects occupy twice the footprint
        let (box_w, box_h) = if attrs.affine && attrs.double_size {
            (attrs.width * 2, attrs.height * 2)
        } else {
            (attrs.width, attrs.height)
        };

        // Screen position wraps at 256 vertically and 512 horizontally
        let line_y = (y.wrapping_sub(attrs.y)) & 0x00FF;
        if line_y >= box_h {
            return;
        }

        // Affine parameter group: pa/pb/pc/pd at bytes 6/14/22/30 of each
        // 32-byte block, 8.8 fixed point
        let (pa, pb, pc, pd) = if attrs.affine {
            let base = attrs.group * 32;
            let param = |offset: usize| {
                i32::from(i16::from_le_bytes([
                    self.oam[base + offset],
                    self.oam[base + offset + 1],
                ]))
            };
            (param(6), param(14), param(22), param(30))
        } else {
            (0x100, 0, 0, 0x100)
        };

        let (mosaic_h, mosaic_v) = (self.dac.obj_mosaic_h(), self.dac.obj_mosaic_v());
        // Texel stride of one tile row: 1D mapping packs the object's own
        // rows back to back, 2D mapping uses the fixed 32-tile charblock pitch
        let row_stride = if self.obj_mapping_1d() {
            attrs.width / 8 * if attrs.bpp8 { 2 } else { 1 }
        } else {
            32
        };

        for box_x in 0..box_w {
            let screen_x = (attrs.x + box_x) & 0x01FF;
            if screen_x >= SCREEN_WIDTH as u32 {
                continue;
            }

            let (mut sample_x, mut sample_y) = (box_x, line_y);
            if attrs.mosaic {
                sample_x = box_x.saturating_sub((attrs.x + box_x) % mosaic_h);
                sample_y = line_y.saturating_sub((attrs.y + line_y) % mosaic_v);
            }

            let (tx, ty) = if attrs.affine {
                // Transform about the bounding-box center
                let cx = sample_x as i32 - box_w as i32 / 2;
                let cy = sample_y as i32 - box_h as i32 / 2;
                let tx = (pa * cx + pb * cy >> 8) + attrs.width as i32 / 2;
                let ty = (pc * cx + pd * cy >> 8) + attrs.height as i32 / 2;
                if tx < 0 || ty < 0 || tx >= attrs.width as i32 || ty >= attrs.height as i32 {
                    continue;
                }
                (tx as u32, ty as u32)
            } else {
                let tx = if attrs.hflip { attrs.width - 1 - sample_x } else { sample_x };
                let ty = if attrs.vflip { attrs.height - 1 - sample_y } else { sample_y };
                (tx, ty)
            };

            let index = match self.obj_texel(attrs, tx, ty, row_stride) {
                Some(index) if index != 0 => index,
                _ => continue,
            };

            let slot = &mut self.objects.line[screen_x as usize];
            if attrs.mode == 2 {
                self.objects.window[screen_x as usize] = true;
            } else if !slot.opaque || attrs.priority < slot.priority {
                *slot = ObjPixel {
                    color: self.pram[256 + index] & 0x7FFF,
                    priority: attrs.priority,
                    opaque: true,
                    translucent: attrs.mode == 1,
                };
            }
        }
    }

    /// Fetch one object texel, returning the palette index
    fn obj_texel(&self, attrs: &Attributes, tx: u32, ty: u32, row_stride: u32) -> Option<usize> {
        // In bitmap video modes the low half of object VRAM belongs to the
        // frame buffer; tiles there never render
        if self.bg_mode() >= 3 && attrs.tile < OBJ_BITMAP_TILE_FLOOR {
            return None;
        }
        let tile_x = tx / 8;
        let tile_y = ty / 8;
        let tile = if attrs.bpp8 {
            attrs.tile + tile_y * row_stride + tile_x * 2
        } else {
            attrs.tile + tile_y * row_stride + tile_x
        };
        // Tile numbers address 32-byte units; fetches wrap within the
        // 32 KiB object region
        let base = (tile & 0x03FF) * 32;

        if attrs.bpp8 {
            let offset = base + (ty % 8) * 8 + tx % 8;
            Some(self.vram[OBJ_VRAM_BASE + (offset & 0x7FFF) as usize] as usize)
        } else {
            let offset = base + (ty % 8) * 4 + (tx % 8) / 2;
            let byte = self.vram[OBJ_VRAM_BASE + (offset & 0x7FFF) as usize];
            let nibble = usize::from(byte >> (tx % 8 & 1) * 4 & 0x0F);
            if nibble == 0 {
                return Some(0);
            }
            Some(attrs.palette as usize * 16 + nibble)
        }
    }
}
