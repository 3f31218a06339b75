// Display module - presentation pipeline
//
// This module turns the video core's raw BGR555 output into display-ready
// pixels: LCD color emulation, interframe blending, and rotation.

pub mod framebuffer;

pub use framebuffer::FrameBuffer;
