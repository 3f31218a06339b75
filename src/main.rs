// GBA Video Core - Main Entry Point
//
// This is a demonstration of the video core: it draws a test pattern through
// the bus into bitmap mode 3, runs one full frame, and writes a screenshot.

use gba_video::bus::Bus;
use gba_video::ppu::{CYCLES_PER_FRAME, SCREEN_HEIGHT, SCREEN_WIDTH};
use gba_video::VideoSystem;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("GBA Video Core (gba-video) v0.1.0");
    println!("==================================");
    println!();

    // Load or create configuration
    let mut system = VideoSystem::from_saved_config();
    println!(
        "Timing mode: {}",
        if system.ppu().accurate() {
            "accurate (per-pixel)"
        } else {
            "fast (per-scanline)"
        }
    );
    println!();

    // Bitmap mode 3 with background 2 enabled
    system.bus_mut().write16(0x0400_0000, 0x0403);
    // Identity affine matrix
    system.bus_mut().write16(0x0400_0020, 0x0100);
    system.bus_mut().write16(0x0400_0026, 0x0100);

    // Horizontal red/green gradient with a vertical blue ramp
    for y in 0..SCREEN_HEIGHT as u32 {
        for x in 0..SCREEN_WIDTH as u32 {
            let r = (x * 31 / (SCREEN_WIDTH as u32 - 1)) as u16;
            let g = 31 - r;
            let b = (y * 31 / (SCREEN_HEIGHT as u32 - 1)) as u16;
            let color = r | g << 5 | b << 10;
            let addr = 0x0600_0000 + (y * SCREEN_WIDTH as u32 + x) * 2;
            system.bus_mut().write16(addr, color);
        }
    }

    let cycles = system.run_frame();
    println!(
        "Rendered frame {} in {} cycles (expected {})",
        system.frames(),
        cycles,
        CYCLES_PER_FRAME
    );

    let path = system.screenshot()?;
    println!("Screenshot saved to: {}", path.display());

    Ok(())
}
