// DMA trigger plumbing
//
// The video core does not move DMA data itself; it only reports the moments
// a transfer may start. Channel 3 additionally supports video capture, which
// the core arms and disarms on a fixed scanline each frame.

/// Start condition configured on a DMA channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DmaTiming {
    #[default]
    Immediate,
    VBlank,
    HBlank,
    /// Channel-specific trigger; on channel 3 this is video capture
    Special,
}

/// Receiver for DMA trigger events from the video core
pub trait DmaHooks {
    /// Vertical blank has begun
    fn vblank(&mut self);

    /// Horizontal blank has begun on a visible scanline
    fn hblank(&mut self);

    /// A video-capture line transfer should run now
    fn video_capture(&mut self);

    /// Whether the capture channel is enabled and configured for capture
    /// timing
    fn capture_channel_ready(&self) -> bool;

    /// Tear down the capture channel at the end of the capture window
    fn disable_capture_channel(&mut self);
}

/// One modeled DMA channel
#[derive(Debug, Clone, Default)]
pub struct DmaChannel {
    pub enabled: bool,
    pub timing: DmaTiming,
    /// Transfers triggered so far, for inspection
    pub triggered: u64,
}

/// Minimal four-channel DMA model
///
/// Tracks enables, start timings, and trigger counts; useful standalone and
/// as the default hook implementation when no full DMA engine is attached.
#[derive(Debug, Clone, Default)]
pub struct DmaChannels {
    pub channels: [DmaChannel; 4],
}

/// The only channel wired for video capture
const CAPTURE_CHANNEL: usize = 3;

impl DmaChannels {
    pub fn new() -> Self {
        DmaChannels::default()
    }

    pub fn configure(&mut self, channel: usize, enabled: bool, timing: DmaTiming) {
        self.channels[channel].enabled = enabled;
        self.channels[channel].timing = timing;
    }

    fn trigger(&mut self, timing: DmaTiming) {
        for channel in &mut self.channels {
            if channel.enabled && channel.timing == timing {
                channel.triggered += 1;
            }
        }
    }
}

impl DmaHooks for DmaChannels {
    fn vblank(&mut self) {
        self.trigger(DmaTiming::VBlank);
    }

    fn hblank(&mut self) {
        self.trigger(DmaTiming::HBlank);
    }

    fn video_capture(&mut self) {
        let channel = &mut self.channels[CAPTURE_CHANNEL];
        if channel.enabled && channel.timing == DmaTiming::Special {
            channel.triggered += 1;
        }
    }

    fn capture_channel_ready(&self) -> bool {
        let channel = &self.channels[CAPTURE_CHANNEL];
        channel.enabled && channel.timing == DmaTiming::Special
    }

    fn disable_capture_channel(&mut self) {
        self.channels[CAPTURE_CHANNEL].enabled = false;
    }
}
