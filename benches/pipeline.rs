use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nyx::term::{LayerCompositor, SubpixelEncoder, TileAtlas, TileCompositor};
use nyx::types::{LayerSet, PixelBuffer, Placement, Tilemap, Viewport};

const VIEWPORT: Viewport = Viewport {
    width: 160,
    height: 90,
};

fn atlas() -> TileAtlas {
    let mut atlas = TileAtlas::new(16).unwrap();
    for id in 1..=4u16 {
        let mut tex = PixelBuffer::new(16, 16);
        for y in 0..16 {
            for x in 0..16 {
                tex.set(x, y, (id as usize * 16 + (x ^ y)) as u8);
            }
        }
        atlas.create_tile(tex, Some(id), None, false).unwrap();
    }
    atlas
}

fn tilemap() -> Tilemap {
    let rows: Vec<Vec<u8>> = (0..8)
        .map(|r| (0..12).map(|c| ((r + c) % 4 + 1) as u8).collect())
        .collect();
    Tilemap::new(&rows, 16).unwrap()
}

fn bench_tile_scroll(c: &mut Criterion) {
    let atlas = atlas();
    let map = tilemap();
    let mut tiles = TileCompositor::new();
    let mut pos = 0i64;

    c.bench_function("tilemap_scroll_160x90", |b| {
        b.iter(|| {
            pos += 3;
            let frame = tiles
                .render_at(&map, &atlas, black_box((pos, -pos / 2)), VIEWPORT)
                .unwrap();
            black_box(frame);
        })
    });
}

fn bench_compose(c: &mut Criterion) {
    let atlas = atlas();
    let map = tilemap();
    let sprites: Vec<PixelBuffer> = (0..32)
        .map(|i| PixelBuffer::filled(8, 8, 100 + i as u8))
        .collect();
    let mut compositor = LayerCompositor::new();

    c.bench_function("compose_tilemap_32_sprites", |b| {
        b.iter(|| {
            let mut layers = LayerSet::new();
            layers.set_tilemap(&map);
            for (i, sprite) in sprites.iter().enumerate() {
                let i = i as i32;
                layers.push(1 + i % 3, Placement::new(i * 5 - 4, i * 3 - 4, sprite));
            }
            let frame = compositor
                .render(&layers, &atlas, 16, black_box(VIEWPORT))
                .unwrap();
            black_box(frame);
        })
    });
}

fn bench_encode(c: &mut Criterion) {
    let mut frame = PixelBuffer::new(VIEWPORT.width, VIEWPORT.height);
    for y in 0..VIEWPORT.height {
        for x in 0..VIEWPORT.width {
            frame.set(x, y, ((x / 3 + y / 2) % 200 + 16) as u8);
        }
    }

    c.bench_function("encode_full_frame", |b| {
        let mut encoder = SubpixelEncoder::new();
        b.iter(|| {
            encoder.invalidate();
            let bytes = encoder.encode(black_box(&frame)).unwrap();
            black_box(bytes.len());
        })
    });

    c.bench_function("encode_unchanged_frame", |b| {
        let mut encoder = SubpixelEncoder::new();
        encoder.encode(&frame).unwrap();
        b.iter(|| {
            let bytes = encoder.encode(black_box(&frame)).unwrap();
            black_box(bytes.len());
        })
    });
}

criterion_group!(benches, bench_tile_scroll, bench_compose, bench_encode);
criterion_main!(benches);
