//! ---------------------------------------------------------------------------
//! Classic fixed-point portal renderer
//!
//! * Draws the camera sector, then recurses through every visible adjoin
//!   with a narrowed clip window, up to `max_adjoin_depth`.
//! * All per-frame math is Q16.16 ([`Fixed16`](crate::fixed::Fixed16)); floats never reach the
//!   column loops.
//! * All mutable state lives in one [`RendererContext`]; there are no
//!   globals, so independent renderers can coexist.
//! ---------------------------------------------------------------------------

mod arena;
mod flat;
mod frame;
mod projection;
mod sector;
mod wall;
mod window;

pub use arena::{Arena, Pool};
pub use frame::{FrameState, MAX_LIGHT_LEVEL};
pub use projection::Projection;
pub use sector::{RenderSector, RenderWall, ViewVertex};
pub use wall::{NEAR_PLANE, TEXELS_PER_UNIT, WallColumn, WallPart};
pub use window::{WindowSlot, WindowStack};

use log::{debug, info, trace};

use crate::{
    config::{ConfigError, LightMode, MAX_ADJOIN_DEPTH, RendererConfig},
    renderer::{Frame, Renderer, SectorObjects},
    world::{CameraPose, Level, SectorId},
};

/// Diagnostics of the last `draw` call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameCounters {
    pub draw_frame: u32,
    pub sectors_drawn: usize,
    pub walls_processed: usize,
    /// Walls that produced at least one column.
    pub wall_segments: usize,
    pub adjoin_segments: usize,
    pub flat_spans: usize,
    pub max_adjoin_depth: usize,
    pub depth_cap_hits: usize,
    pub reentry_skips: usize,
    pub wall_budget_hits: usize,
    pub arena_exhausted: usize,
}

/*───────────────────────────────────────────────────────────────────────*/
/*                              Backend                                 */
/*───────────────────────────────────────────────────────────────────────*/

pub struct RendererContext {
    config: RendererConfig,
    proj: Projection,
    frame: FrameState,
    sectors: Vec<RenderSector>,
    windows: WindowStack,
    arena: Arena,
    counters: FrameCounters,
}

impl Default for RendererContext {
    fn default() -> Self {
        Self::build(RendererConfig::default())
    }
}

impl RendererContext {
    pub fn new(config: RendererConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        debug!(
            "renderer config: depth {}, wall budget {}, arena {}v/{}c, light {:?}",
            config.max_adjoin_depth,
            config.max_wall_count,
            config.arena_vertices,
            config.arena_columns,
            config.light_mode
        );
        Ok(Self::build(config))
    }

    fn build(config: RendererConfig) -> Self {
        let mut frame = FrameState::default();
        frame.set_light_mode(config.light_mode);
        Self {
            arena: Arena::new(&config),
            config,
            proj: Projection::default(),
            frame,
            sectors: Vec::new(),
            windows: WindowStack::new(MAX_ADJOIN_DEPTH + 1),
            counters: FrameCounters::default(),
        }
    }

    /*──────────────────────── inspection ────────────────────────*/

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn counters(&self) -> &FrameCounters {
        &self.counters
    }

    pub fn projection(&self) -> &Projection {
        &self.proj
    }

    pub fn frame_state(&self) -> &FrameState {
        &self.frame
    }

    pub fn sector_state(&self, id: SectorId) -> &RenderSector {
        &self.sectors[id as usize]
    }

    pub fn windows(&self) -> &WindowStack {
        &self.windows
    }

    /// Takes effect immediately, no `set_camera` needed.
    pub fn set_light_mode(&mut self, mode: LightMode) {
        self.config.light_mode = mode;
        self.frame.set_light_mode(mode);
    }

    pub fn light_mode(&self) -> LightMode {
        self.config.light_mode
    }
}

/*──────────────────────── Renderer trait impl ────────────────────────*/
impl Renderer for RendererContext {
    fn setup_level(&mut self, level: &Level, width: usize, height: usize) {
        if !self.proj.matches(width, height) {
            self.proj.rebuild(width, height);
        }
        self.windows.resize(width);
        self.windows.reset(&self.proj);
        self.arena.reset(&self.config);
        self.sectors = (0..level.sectors.len())
            .map(|i| RenderSector::from_level(level, i as SectorId))
            .collect();
        self.counters = FrameCounters::default();
        info!(
            "setup level `{}`: {} sectors, {} walls at {}x{}",
            level.name,
            level.sectors.len(),
            level.walls.len(),
            width,
            height
        );
    }

    fn change_resolution(&mut self, width: usize, height: usize) -> bool {
        if self.proj.matches(width, height) {
            return false;
        }
        self.proj.rebuild(width, height);
        self.windows.resize(width);
        debug!(
            "resolution {}x{} (tables generation {})",
            width, height, self.proj.generation
        );
        true
    }

    fn set_camera(&mut self, pose: &CameraPose) {
        self.frame.setup(pose, &self.proj, self.config.light_mode);
    }

    fn draw(&mut self, out: &mut Frame<'_>, objects: &mut dyn SectorObjects) {
        let (w, h) = (self.proj.width, self.proj.height);
        assert!(w > 0 && h > 0, "setup_level must run before draw");
        assert_eq!(
            out.display.len(),
            w * h,
            "display buffer does not match {w}x{h}"
        );

        out.display.fill(0);
        self.frame.draw_frame = self.frame.draw_frame.wrapping_add(1);
        self.counters = FrameCounters {
            draw_frame: self.frame.draw_frame,
            ..FrameCounters::default()
        };
        self.arena.rewind();
        self.windows.reset(&self.proj);

        let Some(sector) = self.frame.sector else {
            debug!("camera outside every sector, frame left blank");
            return;
        };
        self.draw_sector(sector, 1, out, objects);

        trace!("frame {:?}", self.counters);
    }

    fn update_sector(&mut self, level: &Level, id: SectorId) {
        let slot = &mut self.sectors[id as usize];
        let stamp = slot.draw_frame;
        *slot = RenderSector::from_level(level, id);
        slot.draw_frame = stamp;
        trace!(
            "sector {id} updated: floor {} ceil {} ambient {}",
            slot.floor_h, slot.ceil_h, slot.ambient
        );
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        fixed::Fixed16,
        renderer::{RendererExt, WindowView},
        world::{
            Camera, Colormap, LevelBuilder, SectorDesc, Texture, TextureBank, TextureId,
            WallFlags, demo,
        },
    };
    use glam::Vec3;
    use std::f32::consts::{FRAC_PI_4, TAU};

    const W: usize = 320;
    const H: usize = 200;

    /* tiny helpers ---------------------------------------------------*/

    /// Palette indices double as surface ids under an identity colormap.
    struct Surfaces {
        bank: TextureBank,
        ids: Vec<TextureId>,
    }

    impl Surfaces {
        fn new(colours: &[u8]) -> Self {
            let mut bank = TextureBank::default_with_checker();
            let ids = colours
                .iter()
                .map(|&c| {
                    let name = format!("C{c}");
                    bank.insert(name.clone(), Texture::solid(name, 8, 8, c)).unwrap()
                })
                .collect();
            Self { bank, ids }
        }
    }

    fn desc(floor_h: f32, ceil_h: f32, floor: TextureId, ceil: TextureId, wall: TextureId) -> SectorDesc {
        SectorDesc {
            floor_h,
            ceil_h,
            ambient: 31,
            floor_tex: floor,
            ceil_tex: ceil,
            wall_tex: wall,
        }
    }

    fn off_renderer(depth: usize) -> RendererContext {
        let cfg = RendererConfig {
            light_mode: LightMode::Off,
            ..RendererConfig::with_depth(depth)
        };
        RendererContext::new(cfg).unwrap()
    }

    fn render(r: &mut RendererContext, cam: &Camera, bank: &TextureBank) -> Vec<u8> {
        let mut fb = vec![0u8; W * H];
        r.set_camera(&cam.pose());
        r.draw_frame(&mut fb, &Colormap::identity(), bank);
        fb
    }

    fn px(fb: &[u8], x: usize, y: usize) -> u8 {
        fb[y * W + x]
    }

    /// 64×64 room centred on the origin: floor 1, ceiling 2, walls 3.
    fn solid_room() -> (Level, Surfaces) {
        let s = Surfaces::new(&[1, 2, 3]);
        let mut b = LevelBuilder::new("room");
        b.sector(
            desc(0.0, 32.0, s.ids[0], s.ids[1], s.ids[2]),
            &[(-32.0, -32.0), (-32.0, 32.0), (32.0, 32.0), (32.0, -32.0)],
        );
        (b.build().unwrap(), s)
    }

    /// Room s0 plus a narrower-height corridor s1 straight ahead.
    ///
    /// s0: floor 1, ceil 2, walls 3.  s1: floor 4, ceil 5, walls 6.
    fn corridor() -> (Level, Surfaces) {
        let s = Surfaces::new(&[1, 2, 3, 4, 5, 6]);
        let mut b = LevelBuilder::new("corridor");
        b.sector(
            desc(0.0, 32.0, s.ids[0], s.ids[1], s.ids[2]),
            &[(-32.0, -32.0), (-32.0, 32.0), (32.0, 32.0), (32.0, -32.0)],
        );
        b.sector(
            desc(8.0, 24.0, s.ids[3], s.ids[4], s.ids[5]),
            &[(-32.0, 32.0), (-32.0, 96.0), (32.0, 96.0), (32.0, 32.0)],
        );
        assert_eq!(b.link_shared_edges(), 1);
        (b.build().unwrap(), s)
    }

    fn eye(x: f32, z: f32, yaw: f32, sector: SectorId) -> Camera {
        Camera::new(Vec3::new(x, 16.0, z), yaw, Some(sector))
    }

    /* solid room -----------------------------------------------------*/

    #[test]
    fn solid_room_rows() {
        let (level, s) = solid_room();
        let mut r = off_renderer(40);
        r.setup_level(&level, W, H);
        let fb = render(&mut r, &eye(0.0, 0.0, 0.0, 0), &s.bank);

        for x in [0, 80, 160, 319] {
            assert_eq!(px(&fb, x, 0), 0, "row 0 is never drawn");
            for y in 1..20 {
                assert_eq!(px(&fb, x, y), 2, "ceiling at ({x},{y})");
            }
            for y in 20..180 {
                assert_eq!(px(&fb, x, y), 3, "wall at ({x},{y})");
            }
            for y in 180..200 {
                assert_eq!(px(&fb, x, y), 1, "floor at ({x},{y})");
            }
        }
        let c = r.counters();
        assert_eq!(c.sectors_drawn, 1);
        assert_eq!(c.adjoin_segments, 0);
        assert!(c.flat_spans > 0);
    }

    #[test]
    fn solid_room_is_fully_covered_at_any_yaw() {
        let (level, s) = solid_room();
        let mut r = off_renderer(40);
        r.setup_level(&level, W, H);
        for i in 0..16 {
            let yaw = i as f32 * TAU / 16.0 + 0.01;
            let fb = render(&mut r, &eye(3.0, -5.0, yaw, 0), &s.bank);
            let holes = fb[W..].iter().filter(|&&p| p == 0).count();
            assert_eq!(holes, 0, "uncovered pixels at yaw {yaw}");
            assert_eq!(r.counters().sectors_drawn, 1);
            for d in 1..=2 {
                assert!(r.windows().is_consistent(d));
            }
        }
    }

    #[test]
    fn consecutive_draws_are_identical() {
        let (level, s) = corridor();
        let mut r = off_renderer(40);
        r.setup_level(&level, W, H);
        let cam = eye(4.0, -3.0, 0.3, 0);
        let a = render(&mut r, &cam, &s.bank);
        let ca = *r.counters();

        let mut b = vec![0xAAu8; W * H];
        r.draw_frame(&mut b, &Colormap::identity(), &s.bank);
        assert_eq!(a, b);
        let cb = *r.counters();
        assert_eq!(cb.sectors_drawn, ca.sectors_drawn);
        assert_eq!(cb.draw_frame, ca.draw_frame + 1);
    }

    /* portals --------------------------------------------------------*/

    #[test]
    fn corridor_through_portal() {
        let (level, s) = corridor();
        let mut r = off_renderer(40);
        r.setup_level(&level, W, H);
        let fb = render(&mut r, &eye(0.0, 0.0, 0.0, 0), &s.bank);

        // upper strip (s0 wall texture) down to the lowered ceiling
        for y in 20..60 {
            assert_eq!(px(&fb, 160, y), 3, "upper strip row {y}");
        }
        // lower strip up to the raised floor
        for y in 140..180 {
            assert_eq!(px(&fb, 160, y), 3, "lower strip row {y}");
        }
        // through the portal: s1 ceiling, far wall, floor
        assert_eq!(px(&fb, 160, 70), 5);
        assert_eq!(px(&fb, 160, 100), 6);
        assert_eq!(px(&fb, 160, 130), 4);
        // s0's own flats outside the wall
        assert_eq!(px(&fb, 160, 10), 2);
        assert_eq!(px(&fb, 160, 190), 1);

        let c = r.counters();
        assert_eq!(c.sectors_drawn, 2);
        assert_eq!(c.adjoin_segments, 1);
        assert_eq!(c.max_adjoin_depth, 2);
        // the mirror wall faces away from the camera and is culled first
        assert_eq!(c.reentry_skips, 0);
    }

    /// Corridor with s1 moved to `floor_h ..= ceil_h`.
    fn stepped_corridor(floor_h: i32, ceil_h: i32) -> (Level, Surfaces) {
        let s = Surfaces::new(&[1, 2, 3, 4, 5, 6]);
        let mut b = LevelBuilder::new("stepped");
        b.sector(
            desc(0.0, 32.0, s.ids[0], s.ids[1], s.ids[2]),
            &[(-32.0, -32.0), (-32.0, 32.0), (32.0, 32.0), (32.0, -32.0)],
        );
        let s1 = b.sector(
            desc(8.0, 24.0, s.ids[3], s.ids[4], s.ids[5]),
            &[(-32.0, 32.0), (-32.0, 96.0), (32.0, 96.0), (32.0, 32.0)],
        );
        b.link_shared_edges();
        let sec = b.sector_mut(s1);
        sec.floor_h = Fixed16::from_int(floor_h);
        sec.ceil_h = Fixed16::from_int(ceil_h);
        (b.build().unwrap(), s)
    }

    fn assert_closed_portal(floor_h: i32, ceil_h: i32) {
        let (level, s) = stepped_corridor(floor_h, ceil_h);
        let mut r = off_renderer(40);
        r.setup_level(&level, W, H);
        let fb = render(&mut r, &eye(0.0, 0.0, 0.0, 0), &s.bank);

        for y in 1..20 {
            assert_eq!(px(&fb, 160, y), 2, "s0 ceiling above the wall at row {y}");
        }
        for y in 20..180 {
            assert_eq!(px(&fb, 160, y), 3, "s0 wall strip at row {y}");
        }
        for y in 180..200 {
            assert_eq!(px(&fb, 160, y), 1, "s0 floor below the wall at row {y}");
        }
        let c = r.counters();
        assert_eq!(c.sectors_drawn, 1);
        assert_eq!(c.adjoin_segments, 1);
    }

    #[test]
    fn neighbour_entirely_below_keeps_own_floor() {
        assert_closed_portal(-40, -8);
    }

    #[test]
    fn neighbour_entirely_above_keeps_own_ceiling() {
        assert_closed_portal(40, 60);
    }

    #[test]
    fn light_mode_switch_applies_without_new_camera() {
        let (level, s) = solid_room();
        let mut r = RendererContext::default();
        r.setup_level(&level, W, H);
        r.set_camera(&eye(0.0, 0.0, 0.0, 0).pose());
        assert!(r.frame_state().camera_light);

        r.set_light_mode(LightMode::Off);
        assert_eq!(r.frame_state().light_mode, LightMode::Off);
        assert!(!r.frame_state().camera_light);
        let mut fb = vec![0u8; W * H];
        r.draw_frame(&mut fb, &Colormap::identity(), &s.bank);
        // fullbright identity rows leave surface ids untouched
        assert_eq!(px(&fb, 160, 100), 3);
        assert_eq!(r.light_mode(), LightMode::Off);
    }

    #[test]
    fn depth_cap_truncates_instead_of_failing() {
        let (level, s) = corridor();
        let mut r = off_renderer(1);
        r.setup_level(&level, W, H);
        let fb = render(&mut r, &eye(0.0, 0.0, 0.0, 0), &s.bank);

        assert!(fb.iter().all(|&p| p < 4), "nothing of s1 may show");
        // the opening shows s0's flats instead
        assert_eq!(px(&fb, 160, 70), 2);
        assert_eq!(px(&fb, 160, 130), 1);
        let c = r.counters();
        assert_eq!(c.sectors_drawn, 1);
        assert_eq!(c.depth_cap_hits, 1);
    }

    #[test]
    fn solid_adjoin_renders_as_wall() {
        let (mut level, s) = corridor();
        let w = level
            .walls
            .iter_mut()
            .find(|w| w.adjoin.is_some())
            .unwrap();
        w.flags |= WallFlags::SOLID_ADJOIN;
        let mut r = off_renderer(40);
        r.setup_level(&level, W, H);
        let fb = render(&mut r, &eye(0.0, 0.0, 0.0, 0), &s.bank);
        assert_eq!(px(&fb, 160, 100), 3);
        assert_eq!(r.counters().sectors_drawn, 1);
    }

    #[test]
    fn transparent_portal_skips_colour_zero() {
        let (mut level, mut s) = corridor();
        let grate = s.bank.insert("GRATE", Texture::solid("GRATE", 8, 8, 9)).unwrap();
        let hole = s.bank.insert("HOLE", Texture::solid("HOLE", 8, 8, 0)).unwrap();

        let idx = level.walls.iter().position(|w| w.adjoin.is_some()).unwrap();
        level.walls[idx].flags |= WallFlags::TRANSPARENT;

        level.walls[idx].mid_tex = grate;
        let mut r = off_renderer(40);
        r.setup_level(&level, W, H);
        let fb = render(&mut r, &eye(0.0, 0.0, 0.0, 0), &s.bank);
        assert_eq!(px(&fb, 160, 100), 9, "grate covers the opening");
        assert_eq!(px(&fb, 160, 30), 3, "strips untouched");

        level.walls[idx].mid_tex = hole;
        r.setup_level(&level, W, H);
        let fb = render(&mut r, &eye(0.0, 0.0, 0.0, 0), &s.bank);
        assert_eq!(px(&fb, 160, 100), 6, "see-through texels show s1");
    }

    #[test]
    fn cyclic_adjoins_terminate() {
        let (level, s) = corridor();
        let mut r = off_renderer(40);
        r.setup_level(&level, W, H);
        for i in 0..12 {
            let yaw = i as f32 * TAU / 12.0;
            for (x, z, sec) in [(0.0, 0.0, 0), (0.0, 64.0, 1), (0.0, 31.0, 0)] {
                render(&mut r, &eye(x, z, yaw, sec), &s.bank);
                let c = r.counters();
                assert!(c.max_adjoin_depth <= 40);
                assert!(c.sectors_drawn <= 2);
            }
        }
    }

    #[test]
    fn looking_back_from_corridor() {
        let (level, s) = corridor();
        let mut r = off_renderer(40);
        r.setup_level(&level, W, H);
        // from inside s1 facing -z: s0 is visible through the same portal
        let fb = render(&mut r, &eye(0.0, 64.0, std::f32::consts::PI, 1), &s.bank);
        assert_eq!(r.counters().sectors_drawn, 2);
        assert_eq!(px(&fb, 160, 100), 3, "s0's far wall");
    }

    /* four-room loop -------------------------------------------------*/

    fn loop_bands(depth: usize) -> (Vec<u8>, FrameCounters) {
        let d = demo::four_room_loop().unwrap();
        let mut r = off_renderer(depth);
        r.setup_level(&d.level, W, H);
        let mut fb = vec![0u8; W * H];
        r.set_camera(&d.spawn.pose());
        r.draw_frame(&mut fb, &d.colormap, &d.textures);
        (fb, *r.counters())
    }

    #[test]
    fn four_room_loop_depth_cap_one() {
        let (fb, c) = loop_bands(1);
        assert!(!fb.iter().any(|&p| p != 0 && demo::band_of(p) == 1));
        assert_eq!(c.sectors_drawn, 1);
        assert!(c.depth_cap_hits >= 1);
    }

    #[test]
    fn four_room_loop_default_depth() {
        let (fb, c) = loop_bands(40);
        assert!(fb.iter().any(|&p| p != 0 && demo::band_of(p) == 1));
        assert!(c.sectors_drawn >= 2);
        assert!(c.max_adjoin_depth >= 2);
    }

    #[test]
    fn four_room_loop_orbit() {
        let d = demo::four_room_loop().unwrap();
        let mut r = RendererContext::default();
        r.setup_level(&d.level, W, H);
        let mut fb = vec![0u8; W * H];
        for i in 0..8 {
            let mut cam = d.spawn;
            cam.turn(i as f32 * FRAC_PI_4 + 0.05);
            r.set_camera(&cam.pose());
            r.draw_frame(&mut fb, &d.colormap, &d.textures);
            let c = r.counters();
            assert!(c.sectors_drawn >= 1 && c.sectors_drawn <= 4);
            assert_eq!(c.arena_exhausted, 0);
        }
    }

    /* object hook ----------------------------------------------------*/

    #[derive(Default)]
    struct Recorder {
        visits: Vec<(SectorId, usize, i32, i32)>,
    }

    impl SectorObjects for Recorder {
        fn draw_objects(&mut self, sector: SectorId, view: &WindowView<'_>, display: &mut [u8]) {
            self.visits.push((sector, view.depth, view.min_x, view.max_x));
            // marker in the first open pixel of the window
            if let Some(x) = (view.min_x..=view.max_x).find(|&x| view.is_open(x)) {
                display[view.top[x as usize] as usize * W + x as usize] = 0xEE;
            }
        }
    }

    #[test]
    fn object_hook_sees_each_sector_once() {
        let (level, s) = corridor();
        let mut r = off_renderer(40);
        r.setup_level(&level, W, H);
        r.set_camera(&eye(0.0, 0.0, 0.0, 0).pose());

        let mut fb = vec![0u8; W * H];
        let cm = Colormap::identity();
        let mut rec = Recorder::default();
        let mut frame = Frame {
            display: &mut fb,
            colormap: &cm,
            textures: &s.bank,
        };
        r.draw(&mut frame, &mut rec);

        // s1 finishes (and reports) before s0 returns from its walls
        assert_eq!(rec.visits.len(), 2);
        assert_eq!((rec.visits[0].0, rec.visits[0].1), (1, 2));
        assert_eq!((rec.visits[1].0, rec.visits[1].1), (0, 1));
        assert_eq!((rec.visits[1].2, rec.visits[1].3), (0, 319));
        assert!(fb.contains(&0xEE));
    }

    /* lifecycle ------------------------------------------------------*/

    #[test]
    fn update_sector_changes_output() {
        let (mut level, s) = corridor();
        let mut r = off_renderer(40);
        r.setup_level(&level, W, H);
        let cam = eye(0.0, 0.0, 0.0, 0);
        let before = render(&mut r, &cam, &s.bank);

        // raise s1's ceiling to s0's: the upper strip disappears
        level.sectors[1].ceil_h = Fixed16::from_int(32);
        r.update_sector(&level, 1);
        assert_eq!(r.sector_state(1).ceil_h, Fixed16::from_int(32));
        let after = render(&mut r, &cam, &s.bank);
        assert_ne!(before, after);
        assert_eq!(px(&after, 160, 40), 5, "s1 ceiling through the opening");
    }

    #[test]
    fn change_resolution_is_noop_when_unchanged() {
        let (level, _) = solid_room();
        let mut r = RendererContext::default();
        r.setup_level(&level, 640, 400);
        assert!(r.change_resolution(320, 200));
        let generation = r.projection().generation;
        let ptr = r.projection().y_over_x.as_ptr();
        assert!(!r.change_resolution(320, 200));
        assert_eq!(r.projection().generation, generation);
        assert_eq!(r.projection().y_over_x.as_ptr(), ptr);
    }

    #[test]
    fn camera_outside_level_draws_nothing() {
        let (level, s) = solid_room();
        let mut r = off_renderer(40);
        r.setup_level(&level, W, H);
        let fb = render(&mut r, &Camera::new(Vec3::ZERO, 0.0, None), &s.bank);
        assert!(fb.iter().all(|&p| p == 0));
        assert_eq!(r.counters().sectors_drawn, 0);
    }

    #[test]
    fn wall_budget_truncates_sector() {
        let (level, s) = solid_room();
        let mut r = RendererContext::new(RendererConfig {
            light_mode: LightMode::Off,
            max_wall_count: 1,
            ..RendererConfig::default()
        })
        .unwrap();
        r.setup_level(&level, W, H);
        let fb = render(&mut r, &eye(0.0, 0.0, 0.0, 0), &s.bank);

        // only the left wall is processed, the front wall never draws
        let c = r.counters();
        assert_eq!(c.wall_budget_hits, 1);
        assert_eq!(c.walls_processed, 1);
        assert_eq!(px(&fb, 160, 100), 0);
        assert_eq!(px(&fb, 160, 50), 2);
    }

    #[test]
    fn exhausted_arena_skips_walls() {
        let (level, s) = solid_room();
        let mut r = RendererContext::new(RendererConfig {
            light_mode: LightMode::Off,
            arena_columns: 8,
            ..RendererConfig::default()
        })
        .unwrap();
        r.setup_level(&level, W, H);
        let fb = render(&mut r, &eye(0.0, 0.0, 0.0, 0), &s.bank);
        assert!(r.counters().arena_exhausted >= 1);
        assert_eq!(r.counters().wall_segments, 0);
        assert!(!fb.contains(&3));
    }

    #[test]
    fn invalid_config_rejected() {
        assert!(RendererContext::new(RendererConfig::with_depth(0)).is_err());
        assert!(RendererContext::new(RendererConfig::with_depth(41)).is_err());
    }

    #[test]
    #[should_panic]
    fn wrong_buffer_size_is_fatal() {
        let (level, s) = solid_room();
        let mut r = RendererContext::default();
        r.setup_level(&level, W, H);
        let mut fb = vec![0u8; 10];
        r.draw_frame(&mut fb, &Colormap::identity(), &s.bank);
    }
}
