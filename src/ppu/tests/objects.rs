//! Object rendering tests
//!
//! Tests for OAM decoding, the per-scanline line buffer, priority rules,
//! affine transforms, tile mapping modes, and the object window.

use super::*;

/// Scene with objects enabled in mode 0 and object tile 4 solid palette
/// index 1 (RED, object palette bank 0)
fn obj_scene() -> Harness {
    let mut h = Harness::new();
    h.ppu.write_io16(DISPCNT, 0x1000);
    fill_obj_tile_4bpp(&mut h.ppu, 4, 1);
    h.ppu.write_pram16(0x200 + 2, RED);
    h
}

#[test]
fn test_simple_object_renders() {
    let mut h = obj_scene();
    // 8x8 object at (10, 0), tile 4
    write_object(&mut h.ppu, 0, 0x0000, 10, 0x0004);
    h.render_line(0);
    assert_eq!(h.pixel(9, 0), 0);
    assert_eq!(h.pixel(10, 0), RED);
    assert_eq!(h.pixel(17, 0), RED);
    assert_eq!(h.pixel(18, 0), 0);
}

#[test]
fn test_object_vertical_extent() {
    let mut h = obj_scene();
    write_object(&mut h.ppu, 0, 0x0005, 0, 0x0004); // y = 5
    h.render_line(4);
    assert_eq!(h.pixel(0, 4), 0);
    h.render_line(5);
    assert_eq!(h.pixel(0, 5), RED);
    h.render_line(12);
    assert_eq!(h.pixel(0, 12), RED);
    h.render_line(13);
    assert_eq!(h.pixel(0, 13), 0);
}

#[test]
fn test_object_disable_bit() {
    let mut h = obj_scene();
    write_object(&mut h.ppu, 0, 0x0200, 0, 0x0004); // non-affine, disabled
    h.render_line(0);
    assert_eq!(h.pixel(0, 0), 0);
}

#[test]
fn test_objects_need_dispcnt_enable() {
    let mut h = obj_scene();
    h.ppu.write_io16(DISPCNT, 0x0000);
    write_object(&mut h.ppu, 0, 0x0000, 0, 0x0004);
    h.render_line(0);
    assert_eq!(h.pixel(0, 0), 0);
}

#[test]
fn test_object_size_decoding() {
    let mut h = obj_scene();
    for tile in 0..16 {
        fill_obj_tile_4bpp(&mut h.ppu, tile, 1);
    }
    // 32x8 horizontal object (shape 1, size 1), 2D mapping
    write_object(&mut h.ppu, 0, 0x4000, 0x4000, 0x0000);
    h.render_line(0);
    assert_eq!(h.pixel(31, 0), RED);
    assert_eq!(h.pixel(32, 0), 0);
}

#[test]
fn test_object_horizontal_wrap() {
    let mut h = obj_scene();
    write_object(&mut h.ppu, 0, 0x0000, 508, 0x0004);
    h.render_line(0);
    // Columns 508-511 are off screen; the rest wraps to the left edge
    assert_eq!(h.pixel(0, 0), RED);
    assert_eq!(h.pixel(3, 0), RED);
    assert_eq!(h.pixel(4, 0), 0);
}

#[test]
fn test_object_vertical_wrap() {
    let mut h = obj_scene();
    write_object(&mut h.ppu, 0, 250, 0, 0x0004); // y = 250, wraps past 256
    h.render_line(0);
    assert_eq!(h.pixel(0, 0), RED, "row 6 of the object");
    h.render_line(1);
    assert_eq!(h.pixel(0, 1), RED);
    h.render_line(2);
    assert_eq!(h.pixel(0, 2), 0);
}

#[test]
fn test_object_flips() {
    let mut h = obj_scene();
    // Tile 4: left half index 1, right half index 2
    for row in 0..8u32 {
        h.ppu.write_vram16(0x10000 + 4 * 32 + row * 4, 0x1111);
        h.ppu.write_vram16(0x10000 + 4 * 32 + row * 4 + 2, 0x2222);
    }
    h.ppu.write_pram16(0x200 + 4, GREEN);
    write_object(&mut h.ppu, 0, 0x0000, 0x1000, 0x0004); // hflip
    h.render_line(0);
    assert_eq!(h.pixel(0, 0), GREEN);
    assert_eq!(h.pixel(7, 0), RED);
}

// ========================================
// Priority
// ========================================

#[test]
fn test_priority_tie_goes_to_lower_oam_index() {
    let mut h = obj_scene();
    fill_obj_tile_4bpp(&mut h.ppu, 8, 2);
    h.ppu.write_pram16(0x200 + 4, GREEN);

    // Same priority, overlapping
    write_object(&mut h.ppu, 0, 0x0000, 0, 0x0004); // index 1 -> RED
    write_object(&mut h.ppu, 1, 0x0000, 0, 0x0008); // index 2 -> GREEN
    h.render_line(0);
    assert_eq!(h.pixel(0, 0), RED, "earlier OAM entry wins the tie");
}

#[test]
fn test_better_priority_beats_lower_index() {
    let mut h = obj_scene();
    fill_obj_tile_4bpp(&mut h.ppu, 8, 2);
    h.ppu.write_pram16(0x200 + 4, GREEN);

    write_object(&mut h.ppu, 0, 0x0000, 0, 0x0004 | 0x0400); // priority 1
    write_object(&mut h.ppu, 1, 0x0000, 0, 0x0008); // priority 0
    h.render_line(0);
    assert_eq!(h.pixel(0, 0), GREEN);
}

#[test]
fn test_transparent_texels_do_not_claim_pixels() {
    let mut h = obj_scene();
    fill_obj_tile_4bpp(&mut h.ppu, 8, 0); // fully transparent tile
    write_object(&mut h.ppu, 0, 0x0000, 0, 0x0008);
    write_object(&mut h.ppu, 1, 0x0000, 0, 0x0004);
    h.render_line(0);
    assert_eq!(h.pixel(0, 0), RED, "transparent front object hides nothing");
}

// ========================================
// Affine objects
// ========================================

#[test]
fn test_affine_object_identity() {
    let mut h = obj_scene();
    // Identity parameter group 0: pa/pb/pc/pd at bytes 6/14/22/30
    h.ppu.write_oam16(6, 0x0100);
    h.ppu.write_oam16(14, 0);
    h.ppu.write_oam16(22, 0);
    h.ppu.write_oam16(30, 0x0100);

    write_object(&mut h.ppu, 0, 0x0100, 0, 0x0004); // affine, group 0
    h.render_line(0);
    assert_eq!(h.pixel(0, 0), RED);
    assert_eq!(h.pixel(7, 0), RED);
    assert_eq!(h.pixel(8, 0), 0);
}

#[test]
fn test_affine_object_shrink_clips_to_box() {
    let mut h = obj_scene();
    // pa = 2.0: the sprite shrinks to half width, centered in its box
    h.ppu.write_oam16(6, 0x0200);
    h.ppu.write_oam16(14, 0);
    h.ppu.write_oam16(22, 0);
    h.ppu.write_oam16(30, 0x0100);

    write_object(&mut h.ppu, 0, 0x0100, 0, 0x0004);
    h.render_line(0);
    assert_eq!(h.pixel(1, 0), 0, "outside the shrunken image");
    assert_eq!(h.pixel(4, 0), RED, "center of the box still covered");
    assert_eq!(h.pixel(6, 0), 0);
}

#[test]
fn test_affine_double_size_box() {
    let mut h = obj_scene();
    h.ppu.write_oam16(6, 0x0100);
    h.ppu.write_oam16(14, 0);
    h.ppu.write_oam16(22, 0);
    h.ppu.write_oam16(30, 0x0100);

    // Double-size: 16x16 box for an 8x8 sprite, image centered
    write_object(&mut h.ppu, 0, 0x0300, 0, 0x0004);
    h.render_line(4);
    assert_eq!(h.pixel(3, 4), 0, "margin of the doubled box");
    assert_eq!(h.pixel(4, 4), RED);
    assert_eq!(h.pixel(11, 4), RED);
    assert_eq!(h.pixel(12, 4), 0);
}

// ========================================
// Tile mapping
// ========================================

#[test]
fn test_2d_mapping_second_row_stride() {
    let mut h = obj_scene();
    // 16x16 object: in 2D mapping the second tile row is 32 tiles on
    fill_obj_tile_4bpp(&mut h.ppu, 0, 1);
    fill_obj_tile_4bpp(&mut h.ppu, 1, 1);
    fill_obj_tile_4bpp(&mut h.ppu, 32, 2);
    fill_obj_tile_4bpp(&mut h.ppu, 33, 2);
    h.ppu.write_pram16(0x200 + 4, GREEN);

    write_object(&mut h.ppu, 0, 0x0000, 0x4000, 0x0000); // square 16x16
    h.render_line(0);
    assert_eq!(h.pixel(0, 0), RED);
    h.render_line(8);
    assert_eq!(h.pixel(0, 8), GREEN);
}

#[test]
fn test_1d_mapping_second_row_stride() {
    let mut h = obj_scene();
    h.ppu.write_io16(DISPCNT, 0x1000 | 0x0040); // 1D mapping
    fill_obj_tile_4bpp(&mut h.ppu, 0, 1);
    fill_obj_tile_4bpp(&mut h.ppu, 1, 1);
    fill_obj_tile_4bpp(&mut h.ppu, 2, 2);
    fill_obj_tile_4bpp(&mut h.ppu, 3, 2);
    h.ppu.write_pram16(0x200 + 4, GREEN);

    write_object(&mut h.ppu, 0, 0x0000, 0x4000, 0x0000);
    h.render_line(8);
    assert_eq!(h.pixel(0, 8), GREEN, "1D row stride is the object width");
}

#[test]
fn test_bitmap_modes_hide_low_object_tiles() {
    let mut h = obj_scene();
    h.ppu.write_io16(DISPCNT, 0x1000 | 0x0003); // mode 3, objects on
    fill_obj_tile_4bpp(&mut h.ppu, 512, 2);
    h.ppu.write_pram16(0x200 + 4, GREEN);

    write_object(&mut h.ppu, 0, 0x0000, 0, 0x0004); // tile 4: below the floor
    write_object(&mut h.ppu, 1, 0x0008, 0, 512); // tile 512: allowed
    h.render_line(0);
    assert_eq!(h.pixel(0, 0), 0, "tiles below 512 overlap the frame buffer");
    h.render_line(8);
    assert_eq!(h.pixel(0, 8), GREEN);
}

// ========================================
// Object window and mosaic
// ========================================

#[test]
fn test_objwindow_object_does_not_draw() {
    let mut h = obj_scene();
    write_object(&mut h.ppu, 0, 0x0800, 0, 0x0004); // mode 2: window
    h.render_line(0);
    assert_eq!(h.pixel(0, 0), 0, "window objects contribute no pixels");
    assert!(h.ppu.objects.window[0], "but they set the window mask");
    assert!(!h.ppu.objects.window[8]);
}

#[test]
fn test_prohibited_mode_skipped() {
    let mut h = obj_scene();
    write_object(&mut h.ppu, 0, 0x0C00, 0, 0x0004); // mode 3: prohibited
    h.render_line(0);
    assert_eq!(h.pixel(0, 0), 0);
}

#[test]
fn test_object_mosaic_horizontal() {
    let mut h = obj_scene();
    h.ppu.write_io16(MOSAIC, 0x0300); // object blocks 4 px wide
    // Tile 4: left half index 1, right half index 2
    for row in 0..8u32 {
        h.ppu.write_vram16(0x10000 + 4 * 32 + row * 4, 0x1111);
        h.ppu.write_vram16(0x10000 + 4 * 32 + row * 4 + 2, 0x2222);
    }
    h.ppu.write_pram16(0x200 + 4, GREEN);
    write_object(&mut h.ppu, 0, 0x1000, 0, 0x0004); // mosaic enable
    h.render_line(0);
    assert_eq!(h.pixel(5, 0), h.pixel(4, 0), "columns collapse into blocks");
    assert_eq!(h.pixel(4, 0), GREEN, "block origin at column 4 samples texel 4");
}
