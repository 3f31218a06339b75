// Color conversion
//
// The PPU works in BGR555 throughout; conversion to 24-bit RGB happens only
// at presentation time.

/// Convert a BGR555 color to packed 0x00RRGGBB by bit replication
///
/// # Arguments
/// * `color` - 15-bit BGR555 value (bit 15 ignored)
///
/// # Returns
/// * Packed 24-bit RGB value
pub fn bgr555_to_rgb(color: u16) -> u32 {
    let r = u32::from(color) & 0x1F;
    let g = u32::from(color) >> 5 & 0x1F;
    let b = u32::from(color) >> 10 & 0x1F;
    let expand = |c: u32| c << 3 | c >> 2;
    expand(r) << 16 | expand(g) << 8 | expand(b)
}

/// Convert a BGR555 color to packed 0x00RRGGBB, modeling the AGB LCD panel
///
/// The panel's response is far from sRGB: each output channel mixes the
/// source channels and the result passes through a display gamma of 4.0
/// before re-encoding at 2.2.
///
/// # Arguments
/// * `color` - 15-bit BGR555 value (bit 15 ignored)
///
/// # Returns
/// * Packed 24-bit RGB value
pub fn bgr555_to_rgb_lcd(color: u16) -> u32 {
    const LCD_GAMMA: f64 = 4.0;
    const OUT_GAMMA: f64 = 2.2;

    let channel = |c: u16| ((c & 0x1F) as f64 / 31.0).powf(LCD_GAMMA);
    let lr = channel(color);
    let lg = channel(color >> 5);
    let lb = channel(color >> 10);

    let mix = |r_w: f64, g_w: f64, b_w: f64| {
        let v = (r_w * lr + g_w * lg + b_w * lb) / 255.0;
        let v = (v * 255.0 / 280.0).powf(1.0 / OUT_GAMMA);
        (v * 255.0).round().clamp(0.0, 255.0) as u32
    };

    let r = mix(255.0, 50.0, 0.0);
    let g = mix(10.0, 230.0, 10.0);
    let b = mix(20.0, 50.0, 230.0);
    r << 16 | g << 8 | b
}
