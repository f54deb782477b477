//! Particle Sandbox entry point
//!
//! Headless native driver: builds a demo scene and runs the engine against
//! the wall clock, logging population and FPS.

use std::process::ExitCode;

use glam::Vec2;

use particle_sandbox::engine::{
    Clock, Engine, FpsHandle, FrameHooks, SleepScheduler, StopHandle, SystemClock,
};
use particle_sandbox::sim::FieldKind;
use particle_sandbox::{ConfigHandle, QualityPreset, Result, Sandbox, SimConfig};

const VIEWPORT: (f32, f32) = (1280.0, 720.0);
const DEFAULT_SECONDS: f64 = 5.0;

/// Command line options
#[derive(Debug, Default)]
struct Options {
    config_path: Option<String>,
    seconds: Option<f64>,
    seed: Option<u64>,
    quality: Option<QualityPreset>,
}

fn parse_args() -> std::result::Result<Options, String> {
    let mut opts = Options::default();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seconds" => {
                let value = args.next().ok_or("--seconds needs a value")?;
                opts.seconds = Some(value.parse().map_err(|_| format!("bad --seconds: {value}"))?);
            }
            "--seed" => {
                let value = args.next().ok_or("--seed needs a value")?;
                opts.seed = Some(value.parse().map_err(|_| format!("bad --seed: {value}"))?);
            }
            "--quality" => {
                let value = args.next().ok_or("--quality needs a value")?;
                opts.quality = Some(value.parse::<QualityPreset>().map_err(|e| e.to_string())?);
            }
            "-h" | "--help" => {
                return Err("usage: particle-sandbox [CONFIG.json] [--seconds N] [--seed S] \
                            [--quality low|medium|high]"
                    .into());
            }
            path if opts.config_path.is_none() && !path.starts_with('-') => {
                opts.config_path = Some(path.to_string());
            }
            other => return Err(format!("unexpected argument: {other}")),
        }
    }
    Ok(opts)
}

/// Wraps the sandbox to stop after a wall-clock budget and log once a second
struct DemoHooks<'a> {
    sandbox: &'a mut Sandbox,
    clock: SystemClock,
    stop: StopHandle,
    deadline_ms: f64,
    next_report_ms: f64,
    fps: FpsHandle,
}

impl FrameHooks for DemoHooks<'_> {
    fn update(&mut self, dt: f32) {
        self.sandbox.update(dt);
    }

    fn render(&mut self) {
        self.sandbox.render();
        let now = self.clock.now_ms();
        if now >= self.next_report_ms {
            let snap = self.sandbox.snapshot();
            log::info!(
                "t={:.1}s fps={} particles={} fields={} expired={}",
                now / 1000.0,
                self.fps.get(),
                snap.particles,
                snap.fields,
                snap.expired_total
            );
            self.next_report_ms = now + 1000.0;
        }
        if now >= self.deadline_ms {
            self.stop.stop();
        }
    }
}

fn build_scene(sandbox: &mut Sandbox) -> Result<()> {
    let (w, h) = VIEWPORT;
    sandbox.place_field(FieldKind::Attractor, Vec2::new(w * 0.25, h * 0.5))?;
    sandbox.place_field(FieldKind::Repulsor, Vec2::new(w * 0.5, h * 0.7))?;
    sandbox.place_field(FieldKind::Vortex, Vec2::new(w * 0.75, h * 0.5))?;
    for i in 0..4 {
        let x = w * (0.2 + 0.2 * i as f32);
        sandbox.spawn_burst(Vec2::new(x, h * 0.2), 150);
    }
    Ok(())
}

fn run(opts: Options) -> Result<()> {
    let mut config = match &opts.config_path {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    if let Some(preset) = opts.quality {
        config.apply_preset(preset);
        log::info!(
            "Quality preset {}: max {} particles",
            preset.as_str(),
            config.max_particles
        );
    }
    let config = ConfigHandle::new(config)?;
    let (w, h) = VIEWPORT;
    let mut sandbox = match opts.seed {
        Some(seed) => Sandbox::with_seed(config, w, h, seed)?,
        None => Sandbox::new(config, w, h)?,
    };
    build_scene(&mut sandbox)?;

    let clock = SystemClock::new();
    let mut engine = Engine::with_clock(clock);
    let seconds = opts.seconds.unwrap_or(DEFAULT_SECONDS);
    let mut hooks = DemoHooks {
        sandbox: &mut sandbox,
        clock,
        stop: engine.stop_handle(),
        deadline_ms: seconds * 1000.0,
        next_report_ms: 1000.0,
        fps: engine.fps_handle(),
    };
    engine.run(&mut hooks, &mut SleepScheduler::from_hz(60));

    match serde_json::to_string_pretty(sandbox.snapshot()) {
        Ok(json) => println!("{json}"),
        Err(e) => log::warn!("Could not serialize snapshot: {e}"),
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Particle Sandbox (native) starting...");

    let opts = match parse_args() {
        Ok(opts) => opts,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    match run(opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
