// Save state functionality
//
// Serializes the complete video-core state so execution can resume at the
// exact slot it was captured at, including mid-scanline and mid-pixel.

use serde::{Deserialize, Serialize};
use std::io;

use crate::ppu::Ppu;

/// Errors that can occur during save state operations
#[derive(Debug)]
pub enum SaveStateError {
    /// I/O error
    Io(io::Error),

    /// Serialization/deserialization error
    Serialization(serde_json::Error),

    /// Save state version mismatch
    VersionMismatch { expected: u32, found: u32 },

    /// A memory region in the state has the wrong length
    CorruptState(&'static str),
}

impl std::fmt::Display for SaveStateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveStateError::Io(e) => write!(f, "I/O error: {}", e),
            SaveStateError::Serialization(e) => write!(f, "Serialization error: {}", e),
            SaveStateError::VersionMismatch { expected, found } => {
                write!(
                    f,
                    "Version mismatch: expected {}, found {}",
                    expected, found
                )
            }
            SaveStateError::CorruptState(region) => {
                write!(f, "Corrupt state: bad {} length", region)
            }
        }
    }
}

impl std::error::Error for SaveStateError {}

impl From<io::Error> for SaveStateError {
    fn from(e: io::Error) -> Self {
        SaveStateError::Io(e)
    }
}

impl From<serde_json::Error> for SaveStateError {
    fn from(e: serde_json::Error) -> Self {
        SaveStateError::Serialization(e)
    }
}

/// Current save state format version
const SAVE_STATE_VERSION: u32 = 1;

/// Complete video-core save state
///
/// Contains everything needed to resume stepping with cycle-for-cycle
/// identical behavior: memory regions, the register file, rendering latches,
/// the per-scanline object buffers, the compositor stash, and the timing
/// phase.
#[derive(Debug, Serialize, Deserialize)]
pub struct SaveState {
    /// Version number for compatibility checking
    version: u32,

    /// Timestamp when the save state was created
    timestamp: String,

    /// Video core state
    video: VideoState,
}

/// Video core state for serialization
#[derive(Debug, Serialize, Deserialize)]
struct VideoState {
    // Memory regions
    vram: Vec<u8>,
    pram: Vec<u16>,
    oam: Vec<u8>,

    // Register file and live status
    dispcnt: u16,
    greenswap: u16,
    dispstat: u16,
    vcounter: u16,
    vblank: bool,
    hblank: bool,
    vcoincidence: bool,
    force_blank: [bool; 2],

    // Rendering sub-units
    bg: Vec<crate::ppu::Background>,
    windows: Vec<crate::ppu::Window>,
    obj_line: Vec<crate::ppu::ObjPixel>,
    obj_window: Vec<bool>,
    dac: crate::ppu::Dac,

    // Timing state
    phase: crate::ppu::Phase,
    video_capture: bool,
    frame_ready: bool,
    accurate: bool,

    // Partial frame output
    frame: Vec<u16>,
}

impl SaveState {
    /// Capture the current video-core state
    ///
    /// # Arguments
    ///
    /// * `ppu` - Reference to the video core
    ///
    /// # Returns
    ///
    /// The captured save state
    pub fn from_ppu(ppu: &Ppu) -> Self {
        let timestamp = chrono::Local::now().to_rfc3339();

        let video = VideoState {
            vram: ppu.vram.to_vec(),
            pram: ppu.pram.to_vec(),
            oam: ppu.oam.to_vec(),
            dispcnt: ppu.dispcnt,
            greenswap: ppu.greenswap,
            dispstat: ppu.dispstat,
            vcounter: ppu.vcounter,
            vblank: ppu.vblank,
            hblank: ppu.hblank,
            vcoincidence: ppu.vcoincidence,
            force_blank: ppu.force_blank,
            bg: ppu.bg.to_vec(),
            windows: ppu.windows.to_vec(),
            obj_line: ppu.objects.line.to_vec(),
            obj_window: ppu.objects.window.to_vec(),
            dac: ppu.dac.clone(),
            phase: ppu.phase,
            video_capture: ppu.video_capture,
            frame_ready: ppu.frame_ready,
            accurate: ppu.accurate(),
            frame: ppu.frame.to_vec(),
        };

        SaveState {
            version: SAVE_STATE_VERSION,
            timestamp,
            video,
        }
    }

    /// Restore the video core from this save state
    ///
    /// # Arguments
    ///
    /// * `ppu` - Mutable reference to the video core
    ///
    /// # Returns
    ///
    /// Result indicating success or error
    pub fn restore_to_ppu(&self, ppu: &mut Ppu) -> Result<(), SaveStateError> {
        if self.version != SAVE_STATE_VERSION {
            return Err(SaveStateError::VersionMismatch {
                expected: SAVE_STATE_VERSION,
                found: self.version,
            });
        }

        let video = &self.video;
        copy_region(&mut ppu.vram, &video.vram, "vram")?;
        copy_region(&mut ppu.pram, &video.pram, "pram")?;
        copy_region(&mut ppu.oam, &video.oam, "oam")?;

        ppu.dispcnt = video.dispcnt;
        ppu.greenswap = video.greenswap;
        ppu.dispstat = video.dispstat;
        ppu.vcounter = video.vcounter;
        ppu.vblank = video.vblank;
        ppu.hblank = video.hblank;
        ppu.vcoincidence = video.vcoincidence;
        ppu.force_blank = video.force_blank;

        if video.bg.len() != ppu.bg.len() {
            return Err(SaveStateError::CorruptState("background"));
        }
        for (target, source) in ppu.bg.iter_mut().zip(video.bg.iter()) {
            *target = source.clone();
        }
        if video.windows.len() != ppu.windows.len() {
            return Err(SaveStateError::CorruptState("window"));
        }
        ppu.windows.copy_from_slice(&video.windows);
        copy_region(&mut ppu.objects.line, &video.obj_line, "object line")?;
        copy_region(&mut ppu.objects.window, &video.obj_window, "object window")?;
        ppu.dac = video.dac.clone();

        ppu.phase = video.phase;
        ppu.video_capture = video.video_capture;
        ppu.frame_ready = video.frame_ready;
        ppu.set_accurate(video.accurate);
        copy_region(&mut ppu.frame, &video.frame, "frame")?;

        Ok(())
    }

    /// Serialize to JSON bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, SaveStateError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Deserialize from JSON bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SaveStateError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// When this state was captured (RFC 3339)
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }
}

fn copy_region<T: Copy>(
    target: &mut [T],
    source: &[T],
    name: &'static str,
) -> Result<(), SaveStateError> {
    if source.len() != target.len() {
        return Err(SaveStateError::CorruptState(name));
    }
    target.copy_from_slice(source);
    Ok(())
}
