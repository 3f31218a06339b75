// Window logic
//
// Two rectangular windows, the object window, and the outside region each
// carry a 6-bit enable mask (bg0-3, obj, color effects). Per pixel exactly
// one region applies: win0 beats win1 beats the object window beats outside.

use serde::{Deserialize, Serialize};

use super::Ppu;

pub(crate) const WINDOW_WIN0: usize = 0;
pub(crate) const WINDOW_WIN1: usize = 1;
pub(crate) const WINDOW_OBJ: usize = 2;
pub(crate) const WINDOW_OUT: usize = 3;

/// All layers plus color effects enabled
pub(crate) const MASK_ALL: u8 = 0x3F;
pub(crate) const MASK_SFX: u8 = 0x20;

/// One window region's state
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub(crate) struct Window {
    /// 6-bit enable mask: bg0-3, obj, color effects
    pub(crate) control: u8,
    /// Rectangle bounds, [x1, x2) and [y1, y2) (win0/win1 only)
    pub(crate) x1: u8,
    pub(crate) x2: u8,
    pub(crate) y1: u8,
    pub(crate) y2: u8,
}

impl Window {
    pub(crate) fn new() -> Self {
        Window {
            control: 0,
            x1: 0,
            x2: 0,
            y1: 0,
            y2: 0,
        }
    }

    /// Rectangle test with hardware wrap semantics: an inverted range
    /// (start > end) selects the complement of [end, start)
    pub(crate) fn contains(&self, x: u32, y: u32) -> bool {
        Self::in_range(x, self.x1, self.x2) && Self::in_range(y, self.y1, self.y2)
    }

    fn in_range(v: u32, start: u8, end: u8) -> bool {
        let (start, end) = (u32::from(start), u32::from(end));
        if start <= end {
            v >= start && v < end
        } else {
            v >= start || v < end
        }
    }
}

impl Ppu {
    /// Resolve the layer-enable mask applying at (x, y)
    ///
    /// When no window source is enabled in DISPCNT, windowing is bypassed and
    /// every layer plus color effects is allowed.
    pub(crate) fn window_mask(&self, x: u32, y: u32) -> u8 {
        if !self.win0_enabled() && !self.win1_enabled() && !self.objwin_enabled() {
            return MASK_ALL;
        }
        if self.win0_enabled() && self.windows[WINDOW_WIN0].contains(x, y) {
            return self.windows[WINDOW_WIN0].control;
        }
        if self.win1_enabled() && self.windows[WINDOW_WIN1].contains(x, y) {
            return self.windows[WINDOW_WIN1].control;
        }
        if self.objwin_enabled() && self.objects.window[x as usize] {
            return self.windows[WINDOW_OBJ].control;
        }
        self.windows[WINDOW_OUT].control
    }
}
