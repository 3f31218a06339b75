// PPU Benchmarks
// Performance benchmarks for frame stepping, rendering modes, and register access

use criterion::{criterion_group, criterion_main, Criterion};
use gba_video::{Bus, VideoSystem};
use std::hint::black_box;

const DISPCNT: u32 = 0x0400_0000;
const BG2PA: u32 = 0x0400_0020;
const BG2PD: u32 = 0x0400_0026;
const BLDCNT: u32 = 0x0400_0050;
const BLDY: u32 = 0x0400_0054;
const PRAM: u32 = 0x0500_0000;
const VRAM: u32 = 0x0600_0000;
const OAM: u32 = 0x0700_0000;

/// Fill the mode 3 frame buffer with a gradient
fn fill_bitmap(system: &mut VideoSystem) {
    system.bus_mut().write16(DISPCNT, 0x0403);
    system.bus_mut().write16(BG2PA, 0x0100);
    system.bus_mut().write16(BG2PD, 0x0100);
    for i in 0..(240 * 160) as u32 {
        system.bus_mut().write16(VRAM + i * 2, (i & 0x7FFF) as u16);
    }
}

/// Benchmark whole-frame stepping in both timing modes
fn bench_frame_stepping(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame_stepping");
    group.sample_size(20);

    group.bench_function("fast_idle", |b| {
        let mut system = VideoSystem::new();

        b.iter(|| {
            black_box(system.run_frame());
        });
    });

    group.bench_function("fast_bitmap", |b| {
        let mut system = VideoSystem::new();
        fill_bitmap(&mut system);

        b.iter(|| {
            black_box(system.run_frame());
        });
    });

    group.bench_function("accurate_bitmap", |b| {
        let mut system = VideoSystem::new();
        system.ppu_mut().set_accurate(true);
        fill_bitmap(&mut system);
        // A full-screen darken forces the two-pass pixel pipeline
        system.bus_mut().write16(BLDCNT, 0x00C4);
        system.bus_mut().write16(BLDY, 8);

        b.iter(|| {
            black_box(system.run_frame());
        });
    });

    group.finish();
}

/// Benchmark scanline rendering with a busy object layer
fn bench_object_scanline(c: &mut Criterion) {
    let mut group = c.benchmark_group("object_scanline");

    group.bench_function("full_oam_line", |b| {
        let mut system = VideoSystem::new();
        system.bus_mut().write16(DISPCNT, 0x1000);
        system.bus_mut().write16(PRAM + 0x202, 0x001F);
        for i in 0..16u32 {
            system.bus_mut().write16(VRAM + 0x1_0000 + i * 2, 0x1111);
        }
        // 128 overlapping sprites on the same line
        for i in 0..128u32 {
            system.bus_mut().write16(OAM + i * 8, 0x0000);
            system.bus_mut().write16(OAM + i * 8 + 2, (i % 232) as u16);
            system.bus_mut().write16(OAM + i * 8 + 4, 0x0000);
        }

        b.iter(|| {
            black_box(system.run_scanline());
        });
    });

    group.finish();
}

/// Benchmark register access through the bus
fn bench_registers(c: &mut Criterion) {
    let mut group = c.benchmark_group("registers");

    group.bench_function("dispcnt_write", |b| {
        let mut system = VideoSystem::new();

        b.iter(|| {
            system.bus_mut().write16(DISPCNT, black_box(0x0403));
        });
    });

    group.bench_function("dispstat_read", |b| {
        let system = VideoSystem::new();

        b.iter(|| {
            black_box(system.bus().read16(0x0400_0004));
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_frame_stepping,
    bench_object_scanline,
    bench_registers
);
criterion_main!(benches);
