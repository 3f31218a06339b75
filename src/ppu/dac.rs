// Final compositor
//
// Two-pass selection per pixel: pass 1 picks the frontmost opaque candidate
// among the enabled layers (backdrop as fallback), pass 2 runs only when a
// blend needs the next candidate underneath. Splitting the passes lets the
// timing core charge them as separate cycle slots.

use serde::{Deserialize, Serialize};

use super::window::MASK_SFX;
use super::Ppu;

/// Layer indices used in the blend target masks
pub(crate) const LAYER_OBJ: u8 = 4;
pub(crate) const LAYER_BACKDROP: u8 = 5;

/// Compositor registers plus the pass-1 to pass-2 stash
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Dac {
    /// BLDCNT
    pub(crate) bldcnt: u16,
    /// BLDALPHA
    pub(crate) bldalpha: u16,
    /// BLDY
    pub(crate) bldy: u16,
    /// MOSAIC (write-only)
    pub(crate) mosaic: u16,

    /// Window mask captured in pass 1
    pub(crate) mask: u8,
    /// Winning layer from pass 1
    pub(crate) above_layer: u8,
    pub(crate) above_color: u16,
    /// Pass 2 was requested by a semi-transparent object rather than BLDCNT
    pub(crate) forced_blend: bool,
    /// Final pixel color
    pub(crate) color: u16,
}

impl Dac {
    pub(crate) fn new() -> Self {
        Dac {
            bldcnt: 0,
            bldalpha: 0,
            bldy: 0,
            mosaic: 0,
            mask: 0,
            above_layer: LAYER_BACKDROP,
            above_color: 0,
            forced_blend: false,
            color: 0,
        }
    }

    pub(crate) fn bg_mosaic_h(&self) -> u32 {
        u32::from(self.mosaic & 0x000F) + 1
    }

    pub(crate) fn bg_mosaic_v(&self) -> u32 {
        u32::from(self.mosaic >> 4 & 0x000F) + 1
    }

    pub(crate) fn obj_mosaic_h(&self) -> u32 {
        u32::from(self.mosaic >> 8 & 0x000F) + 1
    }

    pub(crate) fn obj_mosaic_v(&self) -> u32 {
        u32::from(self.mosaic >> 12 & 0x000F) + 1
    }

    fn blend_mode(&self) -> u16 {
        self.bldcnt >> 6 & 3
    }

    fn first_target(&self, layer: u8) -> bool {
        self.bldcnt & 1 << layer != 0
    }

    fn second_target(&self, layer: u8) -> bool {
        self.bldcnt >> 8 & 1 << layer != 0
    }

    /// Blend coefficients saturate at 16/16
    fn eva(&self) -> u32 {
        (self.bldalpha & 0x001F).min(16).into()
    }

    fn evb(&self) -> u32 {
        (self.bldalpha >> 8 & 0x001F).min(16).into()
    }

    fn evy(&self) -> u32 {
        (self.bldy & 0x001F).min(16).into()
    }
}

/// Per-channel alpha blend, saturating at 31
fn blend(above: u16, below: u16, eva: u32, evb: u32) -> u16 {
    let mut out = 0u16;
    for shift in [0, 5, 10] {
        let a = u32::from(above >> shift) & 0x1F;
        let b = u32::from(below >> shift) & 0x1F;
        let c = ((a * eva + b * evb) >> 4).min(31) as u16;
        out |= c << shift;
    }
    out
}

fn brighten(color: u16, evy: u32) -> u16 {
    let mut out = 0u16;
    for shift in [0, 5, 10] {
        let c = u32::from(color >> shift) & 0x1F;
        let c = (c + ((31 - c) * evy >> 4)) as u16;
        out |= c << shift;
    }
    out
}

fn darken(color: u16, evy: u32) -> u16 {
    let mut out = 0u16;
    for shift in [0, 5, 10] {
        let c = u32::from(color >> shift) & 0x1F;
        let c = (c - (c * evy >> 4)) as u16;
        out |= c << shift;
    }
    out
}

impl Ppu {
    /// Pass 1: select the frontmost opaque candidate for (x, y)
    ///
    /// Returns true when a second pass is required to find the layer
    /// underneath, either for BLDCNT alpha blending or because the winning
    /// object is semi-transparent.
    pub(crate) fn dac_upper(&mut self, x: u32, y: u32) -> bool {
        let mask = self.window_mask(x, y);
        let (layer, color, translucent) = self.dac_select(mask, x, LAYER_BACKDROP);

        self.dac.mask = mask;
        self.dac.above_layer = layer;
        self.dac.above_color = color;
        self.dac.forced_blend = layer == LAYER_OBJ && translucent;
        self.dac.color = color;

        if self.dac.forced_blend {
            // Semi-transparent objects blend regardless of the window's
            // color-effect gate and the first-target mask
            return true;
        }
        if mask & MASK_SFX == 0 || !self.dac.first_target(layer) {
            return false;
        }
        match self.dac.blend_mode() {
            // Nothing lies beneath the backdrop, so it never alpha-blends
            1 => layer != LAYER_BACKDROP,
            2 => {
                self.dac.color = brighten(color, self.dac.evy());
                false
            }
            3 => {
                self.dac.color = darken(color, self.dac.evy());
                false
            }
            _ => false,
        }
    }

    /// Pass 2: find the candidate beneath the pass-1 winner and blend
    pub(crate) fn dac_lower(&mut self, x: u32) {
        let (layer, below, _) = self.dac_select(self.dac.mask, x, self.dac.above_layer);
        if !self.dac.second_target(layer) {
            return;
        }
        self.dac.color = blend(
            self.dac.above_color,
            below,
            self.dac.eva(),
            self.dac.evb(),
        );
    }

    /// Priority-resolve the layers at column `x`, skipping `exclude`
    ///
    /// Precedence at equal priority: objects, then backgrounds in index
    /// order, then the backdrop.
    fn dac_select(&self, mask: u8, x: u32, exclude: u8) -> (u8, u16, bool) {
        let mut layer = LAYER_BACKDROP;
        let mut priority = 4u8;
        let mut color = self.pram[0] & 0x7FFF;
        let mut translucent = false;

        if exclude != LAYER_OBJ && self.obj_enabled() && mask & 0x10 != 0 {
            let slot = self.objects.line[x as usize];
            if slot.opaque {
                layer = LAYER_OBJ;
                priority = slot.priority;
                color = slot.color;
                translucent = slot.translucent;
            }
        }
        for n in 0..4u8 {
            if n == exclude || !self.bg_enabled(n as usize) || mask & 1 << n == 0 {
                continue;
            }
            let pixel = self.bg[n as usize].output;
            if pixel.opaque && pixel.priority < priority {
                layer = n;
                priority = pixel.priority;
                color = pixel.color;
                translucent = false;
            }
        }
        (layer, color, translucent)
    }
}
