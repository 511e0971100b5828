//! Built-in four-room loop used by the viewer and the renderer tests.
//!
//! ```text
//!   z
//!   ^   +------+------+
//!   |   |  s1  |  s2  |   s2: raised floor
//!   |   +------+======+   ===: transparent grate
//!   |   |  s0  |  s3  |   s3: lowered ceiling
//!   |   +------+------+
//!   +-------------------> x      spawn: centre of s0, facing +z
//! ```
//!
//! The palette is split into eight hue bands of 32 shades
//! (`index = band * 32 + shade`), and every sector draws exclusively from its
//! own band, so a rendered frame tells which sector each pixel came from.

use glam::Vec3;

use crate::world::{
    builder::{LevelBuilder, SectorDesc},
    camera::Camera,
    geometry::{Level, LevelError, SectorId, WallFlags},
    texture::{Colormap, LIGHT_LEVELS, LIGHT_RAMP_LEN, Palette, Texture, TextureBank, TextureError},
};

pub const SHADES_PER_BAND: usize = 32;

/// Band used by the grate texture between s2 and s3.
pub const GRATE_BAND: u8 = 4;

const TEX_SIZE: usize = 64;

/// Base colour of every hue band at full brightness.
const BAND_RGB: [(u8, u8, u8); 8] = [
    (0xc8, 0xb4, 0x96), // sandstone
    (0x5a, 0x96, 0xdc), // blue
    (0x78, 0xc8, 0x5a), // green
    (0xdc, 0x6e, 0x50), // brick red
    (0xc8, 0xc8, 0xd2), // steel
    (0xe6, 0xc8, 0x3c),
    (0xa0, 0x64, 0xc8),
    (0xff, 0xff, 0xff),
];

#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    #[error(transparent)]
    Level(#[from] LevelError),
    #[error(transparent)]
    Texture(#[from] TextureError),
}

pub struct DemoLevel {
    pub level: Level,
    pub textures: TextureBank,
    pub palette: Palette,
    pub colormap: Colormap,
    pub spawn: Camera,
}

/// Palette band of a palette index.
#[inline]
pub fn band_of(index: u8) -> u8 {
    index / SHADES_PER_BAND as u8
}

#[inline]
fn shade(band: u8, s: usize) -> u8 {
    band * SHADES_PER_BAND as u8 + s.min(SHADES_PER_BAND - 1) as u8
}

fn pattern(name: String, band: u8, f: impl Fn(usize, usize) -> usize) -> Texture {
    let mut pixels = vec![0u8; TEX_SIZE * TEX_SIZE];
    for y in 0..TEX_SIZE {
        for x in 0..TEX_SIZE {
            pixels[y * TEX_SIZE + x] = shade(band, f(x, y));
        }
    }
    Texture {
        name,
        w: TEX_SIZE,
        h: TEX_SIZE,
        pixels,
    }
}

fn brick(x: usize, y: usize) -> usize {
    let row = y / 16;
    let col_x = (x + if row % 2 == 0 { 0 } else { 16 }) % 32;
    if y % 16 == 0 || col_x == 0 {
        10
    } else {
        20 + (x * 7 + y * 3) % 9
    }
}

fn tiles(x: usize, y: usize) -> usize {
    let base = if ((x / 32) ^ (y / 32)) & 1 == 0 { 14 } else { 22 };
    base + (x * 5 + y * 11) % 4
}

fn panels(x: usize, y: usize) -> usize {
    16 + ((x ^ y) & 3) + if x % 32 == 0 || y % 32 == 0 { 8 } else { 0 }
}

/// Grate texture; texel 0 shows what lies behind.
fn grate() -> Texture {
    let mut tex = pattern("GRATE".into(), GRATE_BAND, |x, y| 18 + (x + y) % 6);
    for y in 0..TEX_SIZE {
        for x in 0..TEX_SIZE {
            if x % 8 < 6 && y % 8 < 6 {
                tex.pixels[y * TEX_SIZE + x] = 0;
            }
        }
    }
    tex
}

/// Eight hue bands that fade linearly to black.
pub fn band_palette() -> Palette {
    let mut pal = Palette::default();
    for (band, &(r, g, b)) in BAND_RGB.iter().enumerate() {
        for s in 0..SHADES_PER_BAND {
            let k = |c: u8| (c as u32 * s as u32 / (SHADES_PER_BAND as u32 - 1)) & 0xff;
            pal[band * SHADES_PER_BAND + s] = (k(r) << 16) | (k(g) << 8) | k(b);
        }
    }
    pal
}

/// Light level `l` scales each shade by `(l + 1) / 32` inside its band.
pub fn band_colormap() -> Colormap {
    let mut cm = Colormap::default();
    for l in 0..LIGHT_LEVELS {
        for i in 0..256 {
            let band = i / SHADES_PER_BAND;
            let s = i % SHADES_PER_BAND;
            cm[l][i] = (band * SHADES_PER_BAND + s * (l + 1) / LIGHT_LEVELS) as u8;
        }
    }
    // One light level lost per world unit of distance from the camera.
    for (d, v) in cm.light_source_ramp.iter_mut().enumerate() {
        *v = (d / 4).min(LIGHT_LEVELS - 1) as u8;
    }
    debug_assert_eq!(cm.light_source_ramp.len(), LIGHT_RAMP_LEN);
    cm
}

/// Build the four-room loop with its textures and shading tables.
pub fn four_room_loop() -> Result<DemoLevel, DemoError> {
    let mut textures = TextureBank::default_with_checker();
    let mut tex = [[0u16; 3]; 4];
    for (band, ids) in tex.iter_mut().enumerate() {
        let b = band as u8;
        ids[0] = textures.insert(format!("WALL{band}"), pattern(format!("WALL{band}"), b, brick))?;
        ids[1] = textures.insert(format!("FLOOR{band}"), pattern(format!("FLOOR{band}"), b, tiles))?;
        ids[2] = textures.insert(format!("CEIL{band}"), pattern(format!("CEIL{band}"), b, panels))?;
    }
    let grate_tex = textures.insert("GRATE", grate())?;

    let desc = |i: usize, floor_h: f32, ceil_h: f32, ambient: i32| SectorDesc {
        floor_h,
        ceil_h,
        ambient,
        floor_tex: tex[i][1],
        ceil_tex: tex[i][2],
        wall_tex: tex[i][0],
    };

    let mut b = LevelBuilder::new("FOURLOOP");
    let s0 = b.sector(
        desc(0, 0.0, 32.0, 28),
        &[(-64.0, -64.0), (-64.0, 0.0), (0.0, 0.0), (0.0, -64.0)],
    );
    b.sector(
        desc(1, 0.0, 32.0, 24),
        &[(-64.0, 0.0), (-64.0, 64.0), (0.0, 64.0), (0.0, 0.0)],
    );
    let s2 = b.sector(
        desc(2, 8.0, 32.0, 20),
        &[(0.0, 0.0), (0.0, 64.0), (64.0, 64.0), (64.0, 0.0)],
    );
    let s3 = b.sector(
        desc(3, 0.0, 24.0, 31),
        &[(0.0, -64.0), (0.0, 0.0), (64.0, 0.0), (64.0, -64.0)],
    );
    b.link_shared_edges();

    // s2 wall 3 runs (64,0) -> (0,0), mirrored by s3 wall 1.
    mark_grate(&mut b, s2, 3, grate_tex);
    mark_grate(&mut b, s3, 1, grate_tex);

    let level = b.build()?;
    let spawn = Camera::new(Vec3::new(-32.0, 16.0, -32.0), 0.0, Some(s0));

    Ok(DemoLevel {
        level,
        textures,
        palette: band_palette(),
        colormap: band_colormap(),
        spawn,
    })
}

fn mark_grate(b: &mut LevelBuilder, sector: SectorId, wall: u16, tex: u16) {
    let w = b.wall_mut(sector, wall);
    w.flags |= WallFlags::TRANSPARENT;
    w.mid_tex = tex;
}
