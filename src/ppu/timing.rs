// Cycle-accurate scanline sequencing
//
// Each scanline is 1232 cycles carved into fixed slots; a full frame is 228
// scanlines (280896 cycles). `step` performs the work of exactly one slot and
// returns the cycles it consumed, so a caller can interleave the video core
// with the rest of the machine at any granularity.
//
// Slot layout per scanline:
//   1    line boundary, vblank flag, frame latch
//   1    vcoincidence flag, vblank interrupt
//   3    vcoincidence interrupt, vblank DMA
//   41   video-capture arming and trigger
//   960  pixel pipeline (240 pixels at 4 cycles each)
//   1    hblank assert
//   1    hblank interrupt
//   1    hblank DMA
//   223  tail

use serde::{Deserialize, Serialize};

use super::constants::{
    CAPTURE_DECISION_SCANLINE, DRAW_CYCLES, FIRST_VBLANK_SCANLINE, LAST_VBLANK_SCANLINE,
    SCANLINES_PER_FRAME, SCREEN_HEIGHT, SCREEN_WIDTH, TAIL_CYCLES,
};
use super::Ppu;
use crate::dma::DmaHooks;
use crate::irq::{Interrupt, InterruptLine};

/// Position within the scanline slot sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum Phase {
    LineStart,
    Coincidence,
    Triggers,
    Capture,
    DrawLine,
    PixelUpper { x: u8 },
    PixelLower { x: u8 },
    HBlankAssert,
    HBlankIrq,
    HBlankDma,
    Tail,
}

impl Ppu {
    /// Advance the video core by one slot
    ///
    /// # Arguments
    /// * `irq` - interrupt receiver, also consulted for the halted state
    /// * `dma` - DMA trigger receiver
    ///
    /// # Returns
    /// * Cycles consumed by the slot
    pub fn step(&mut self, irq: &mut dyn InterruptLine, dma: &mut dyn DmaHooks) -> u32 {
        debug_assert!(self.vcounter < SCANLINES_PER_FRAME);
        match self.phase {
            Phase::LineStart => {
                // Close out the previous line; skipped at power-on, before
                // any hblank has been asserted
                if self.hblank {
                    self.hblank = false;
                    self.vcounter = (self.vcounter + 1) % SCANLINES_PER_FRAME;
                }
                self.vblank = (FIRST_VBLANK_SCANLINE..=LAST_VBLANK_SCANLINE)
                    .contains(&self.vcounter);
                if self.vcounter == 0 {
                    self.bg[2].latch_reference();
                    self.bg[3].latch_reference();
                }
                self.phase = Phase::Coincidence;
                1
            }
            Phase::Coincidence => {
                self.vcoincidence = self.vcounter == self.dispstat >> 8;
                if self.vcounter == FIRST_VBLANK_SCANLINE && self.dispstat & 0x0008 != 0 {
                    irq.set_flag(Interrupt::VBlank);
                }
                self.phase = Phase::Triggers;
                1
            }
            Phase::Triggers => {
                if self.vcoincidence && self.dispstat & 0x0020 != 0 {
                    irq.set_flag(Interrupt::VCoincidence);
                }
                if self.vcounter == FIRST_VBLANK_SCANLINE {
                    dma.vblank();
                }
                self.phase = Phase::Capture;
                3
            }
            Phase::Capture => {
                if self.vcounter == CAPTURE_DECISION_SCANLINE {
                    if self.video_capture {
                        dma.disable_capture_channel();
                    }
                    self.video_capture = !self.video_capture && dma.capture_channel_ready();
                }
                if self.video_capture && (2..CAPTURE_DECISION_SCANLINE).contains(&self.vcounter) {
                    dma.video_capture();
                }
                self.phase = Phase::DrawLine;
                41
            }
            Phase::DrawLine => {
                // The blanking bit a scanline observes is the one written at
                // least one scanline earlier
                self.force_blank[0] = self.force_blank[1];
                self.force_blank[1] = self.dispcnt & 0x0080 != 0;
                if self.vcounter >= SCREEN_HEIGHT as u16 {
                    self.phase = Phase::HBlankAssert;
                    return DRAW_CYCLES;
                }

                let y = self.vcounter;
                self.bg_scanline(2, y);
                self.bg_scanline(3, y);
                self.obj_scanline(y);
                if self.accurate {
                    self.phase = Phase::PixelUpper { x: 0 };
                    return 0;
                }

                let y = u32::from(y);
                let blank = self.blank(irq.halted());
                for x in 0..SCREEN_WIDTH as u32 {
                    if blank {
                        self.set_frame_pixel(x, y, 0x7FFF);
                        continue;
                    }
                    if self.render_pixel_upper(x, y) {
                        self.dac_lower(x);
                    }
                    self.set_frame_pixel(x, y, self.dac.color);
                }
                self.finish_line(y);
                self.phase = Phase::HBlankAssert;
                DRAW_CYCLES
            }
            Phase::PixelUpper { x } => {
                let y = u32::from(self.vcounter);
                let column = u32::from(x);
                if self.blank(irq.halted()) {
                    self.set_frame_pixel(column, y, 0x7FFF);
                    self.advance_pixel(x, y);
                    return 4;
                }
                if self.render_pixel_upper(column, y) {
                    // A lower-layer fetch splits the pixel into two slots
                    self.phase = Phase::PixelLower { x };
                    2
                } else {
                    self.set_frame_pixel(column, y, self.dac.color);
                    self.advance_pixel(x, y);
                    4
                }
            }
            Phase::PixelLower { x } => {
                let y = u32::from(self.vcounter);
                self.dac_lower(u32::from(x));
                self.set_frame_pixel(u32::from(x), y, self.dac.color);
                self.advance_pixel(x, y);
                2
            }
            Phase::HBlankAssert => {
                self.hblank = true;
                self.phase = Phase::HBlankIrq;
                1
            }
            Phase::HBlankIrq => {
                if self.dispstat & 0x0010 != 0 {
                    irq.set_flag(Interrupt::HBlank);
                }
                self.phase = Phase::HBlankDma;
                1
            }
            Phase::HBlankDma => {
                if self.vcounter < SCREEN_HEIGHT as u16 {
                    dma.hblank();
                }
                self.phase = Phase::Tail;
                1
            }
            Phase::Tail => {
                // The frame signal lands on the final cycle of the last
                // scanline, so a frame is exactly 280896 cycles end to end
                if self.vcounter == SCANLINES_PER_FRAME - 1 {
                    self.frame_ready = true;
                }
                self.phase = Phase::LineStart;
                TAIL_CYCLES
            }
        }
    }

    /// Run every layer for one pixel and resolve pass 1
    fn render_pixel_upper(&mut self, x: u32, y: u32) -> bool {
        for n in 0..4 {
            self.bg_run(n, x, y);
        }
        self.dac_upper(x, y)
    }

    fn set_frame_pixel(&mut self, x: u32, y: u32, color: u16) {
        self.frame[(y * SCREEN_WIDTH as u32 + x) as usize] = color;
    }

    fn advance_pixel(&mut self, x: u8, y: u32) {
        if x as usize == SCREEN_WIDTH - 1 {
            self.finish_line(y);
            self.phase = Phase::HBlankAssert;
        } else {
            self.phase = Phase::PixelUpper { x: x + 1 };
        }
    }

    /// Post-process the completed scanline
    ///
    /// GREENSWAP exchanges the green channel between each even/odd pixel
    /// pair; the red and blue channels stay put.
    fn finish_line(&mut self, y: u32) {
        if self.greenswap & 1 == 0 {
            return;
        }
        let base = (y * SCREEN_WIDTH as u32) as usize;
        for x in (0..SCREEN_WIDTH).step_by(2) {
            let even = self.frame[base + x];
            let odd = self.frame[base + x + 1];
            self.frame[base + x] = even & !0x03E0 | odd & 0x03E0;
            self.frame[base + x + 1] = odd & !0x03E0 | even & 0x03E0;
        }
    }
}
