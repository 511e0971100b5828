use clap::Parser;
use log::{LevelFilter, Metadata, Record, info};
use minifb::{Key, KeyRepeat, Scale, Window, WindowOptions};
use std::time::{Duration, Instant};

use yajedi_rs::{
    config::{LightMode, RendererConfig},
    renderer::{Renderer, RendererContext, RendererExt},
    world::{Palette, demo},
};

const MOVE_SPEED: f32 = 1.5;
const TURN_SPEED: f32 = 0.05;
const LOOK_SPEED: f32 = 0.03;

/// Walk the built-in four-room loop with the software portal renderer.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[arg(long, default_value_t = 320)]
    width: usize,

    #[arg(long, default_value_t = 200)]
    height: usize,

    /// Window scale factor (1, 2, 4 or 8)
    #[arg(long, default_value_t = 2)]
    scale: u8,

    /// Adjoin recursion cap
    #[arg(long, default_value_t = yajedi_rs::config::MAX_ADJOIN_DEPTH)]
    depth: usize,

    #[arg(long, value_enum, default_value_t = LightMode::Normal)]
    light: LightMode,

    /// Render this many frames without a window, then exit
    #[arg(long, value_name = "N")]
    headless_frames: Option<usize>,

    /// Log per-frame diagnostics
    #[arg(short, long)]
    verbose: bool,
}

/// Plain stderr sink for the `log` facade.
struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            eprintln!("[{:<5} {}] {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn expand(indexed: &[u8], palette: &Palette, rgb: &mut [u32]) {
    for (dst, &idx) in rgb.iter_mut().zip(indexed) {
        *dst = palette[idx as usize];
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    log::set_logger(&LOGGER).map_err(|e| anyhow::anyhow!("{e}"))?;
    log::set_max_level(if args.verbose {
        LevelFilter::Trace
    } else {
        LevelFilter::Info
    });

    let demo = demo::four_room_loop()?;
    let (w, h) = (args.width, args.height);
    anyhow::ensure!(w > 0 && h > 0, "resolution must be non-zero, got {w}x{h}");

    let mut renderer = RendererContext::new(RendererConfig {
        light_mode: args.light,
        ..RendererConfig::with_depth(args.depth)
    })?;
    renderer.setup_level(&demo.level, w, h);
    info!("level {}: {} sectors", demo.level.name, demo.level.sectors.len());

    let mut camera = demo.spawn;
    let mut indexed = vec![0u8; w * h];

    if let Some(frames) = args.headless_frames {
        let t0 = Instant::now();
        for _ in 0..frames {
            camera.turn(TURN_SPEED);
            renderer.set_camera(&camera.pose());
            renderer.draw_frame(&mut indexed, &demo.colormap, &demo.textures);
        }
        let avg_ms = t0.elapsed().as_secs_f64() * 1000.0 / frames.max(1) as f64;
        info!("{frames} frames, avg render: {avg_ms:.2} ms");
        info!("last frame: {:?}", renderer.counters());
        return Ok(());
    }

    let scale = match args.scale {
        1 => Scale::X1,
        2 => Scale::X2,
        4 => Scale::X4,
        8 => Scale::X8,
        other => anyhow::bail!("unsupported scale {other}"),
    };
    let mut win = Window::new(
        "yajedi software renderer",
        w,
        h,
        WindowOptions {
            scale,
            ..WindowOptions::default()
        },
    )?;
    win.set_target_fps(35);

    let mut rgb = vec![0u32; w * h];

    // ────────────────── benchmarking state ──────────────────────────────
    let mut acc_time = Duration::ZERO;
    let mut acc_frames = 0usize;
    let mut last_print = Instant::now();

    while win.is_open() && !win.is_key_down(Key::Escape) {
        let t0 = Instant::now();

        let mut forward = 0.0;
        let mut side = 0.0;
        if win.is_key_down(Key::Up) || win.is_key_down(Key::W) {
            forward += MOVE_SPEED;
        }
        if win.is_key_down(Key::Down) || win.is_key_down(Key::S) {
            forward -= MOVE_SPEED;
        }
        if win.is_key_down(Key::A) {
            side -= MOVE_SPEED;
        }
        if win.is_key_down(Key::D) {
            side += MOVE_SPEED;
        }
        if win.is_key_down(Key::Left) {
            camera.turn(TURN_SPEED);
        }
        if win.is_key_down(Key::Right) {
            camera.turn(-TURN_SPEED);
        }
        if win.is_key_down(Key::PageUp) {
            camera.look(LOOK_SPEED);
        }
        if win.is_key_down(Key::PageDown) {
            camera.look(-LOOK_SPEED);
        }
        if win.is_key_pressed(Key::L, KeyRepeat::No) {
            let mode = renderer.light_mode().cycle();
            renderer.set_light_mode(mode);
            info!("light mode {mode:?}");
        }

        if forward != 0.0 || side != 0.0 {
            let before = camera.sector;
            camera.step(forward, side);
            if camera.relocate(&demo.level).is_none() {
                log::debug!("camera left the level at {:?}", camera.pos);
            } else if camera.sector != before {
                log::debug!("entered sector {:?}", camera.sector);
            }
        }

        renderer.set_camera(&camera.pose());
        renderer.draw_frame(&mut indexed, &demo.colormap, &demo.textures);
        expand(&indexed, &demo.palette, &mut rgb);
        acc_time += t0.elapsed();
        acc_frames += 1;
        log::trace!("{:?}", renderer.counters());

        win.update_with_buffer(&rgb, w, h)?;

        if last_print.elapsed() >= Duration::from_secs(3) {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames as f64;
            info!("avg render: {:.2} ms  ({:.1} FPS)", avg_ms, 1000.0 / avg_ms);
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }
    }
    Ok(())
}
