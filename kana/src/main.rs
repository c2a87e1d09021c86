//! Kana daemon.
//!
//! Propagates a particle population with the noisy velocity motion model,
//! driven by UDP velocity commands, and renders the particle grid at a fixed
//! rate. Keys on stdin: `x` quits, space or `s` saves a snapshot.
//!
//! Usage:
//! ```bash
//! kana [SAMPLES LINEAR_NOISE ANGULAR_NOISE] [--config kana.toml] [--rate 30]
//! ```

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use clap::Parser;

use kana::utils::setup_ctrl_c_handler;
use kana::{
    AppConfig, CommandHandler, CommandThread, Error, ExitReason, HeadlessDisplay, MotionModel,
    NoiseGenerator, Overrides, ParticleSet, RenderLoop, Result, SnapshotWriter, StdinKeySource,
    UdpCommandReceiver, create_shared_grid,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of particles
    samples: Option<usize>,

    /// Linear velocity noise amplitude (m/s)
    #[arg(allow_negative_numbers = true)]
    linear_noise: Option<f32>,

    /// Angular velocity noise amplitude (rad/s)
    #[arg(allow_negative_numbers = true)]
    angular_noise: Option<f32>,

    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Render rate in Hz
    #[arg(long)]
    rate: Option<f32>,

    /// UDP bind address for velocity commands
    #[arg(long)]
    bind: Option<String>,

    /// RNG seed (0 = OS entropy)
    #[arg(long)]
    seed: Option<u64>,

    /// Directory for snapshot images
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    /// The three positionals come as a group or not at all.
    fn overrides(&self) -> Result<Overrides> {
        let given = [
            self.samples.is_some(),
            self.linear_noise.is_some(),
            self.angular_noise.is_some(),
        ];
        if given.iter().any(|&g| g) && !given.iter().all(|&g| g) {
            return Err(Error::Config(
                "SAMPLES LINEAR_NOISE ANGULAR_NOISE must be given together".to_string(),
            ));
        }

        Ok(Overrides {
            particles: self.samples,
            linear_noise: self.linear_noise,
            angular_noise: self.angular_noise,
            rate_hz: self.rate,
            bind_address: self.bind.clone(),
            seed: self.seed,
            snapshot_dir: self.snapshot_dir.clone(),
            log_level: self.log_level.clone(),
        })
    }
}

fn init_logging(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {} - {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

/// Load, override and validate. Nothing is constructed on failure.
fn load_config(args: &Args) -> Result<(AppConfig, Option<PathBuf>)> {
    let (mut config, path) = AppConfig::load(args.config.as_deref())?;
    config.apply(args.overrides()?);
    config.validate()?;
    Ok((config, path))
}

fn main() {
    let args = Args::parse();

    let (config, config_path) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            init_logging(args.log_level.as_deref().unwrap_or("info"));
            log::error!("{}", e);
            std::process::exit(1);
        }
    };
    init_logging(&config.logging.level);

    log::info!("kana starting");
    match &config_path {
        Some(path) => log::info!("  Config: {}", path.display()),
        None => log::info!("  Config: built-in defaults"),
    }
    log::info!(
        "  Grid: {}x{} @ {} cells/m",
        config.grid.height,
        config.grid.width,
        config.grid.scale
    );
    log::info!(
        "  Particles: {} (linear noise {}, angular noise {})",
        config.filter.particles,
        config.filter.linear_noise,
        config.filter.angular_noise
    );
    log::info!("  Render: {} Hz", config.render.rate_hz);
    log::info!("  Commands: udp://{}", config.command.bind_address);

    let running = Arc::new(AtomicBool::new(true));
    if let Err(e) = setup_ctrl_c_handler(running.clone()) {
        log::warn!("{}", e);
    }

    match run(&config, running) {
        Ok(reason) => log::info!("kana shutdown complete ({:?})", reason),
        Err(e) => {
            log::error!("Daemon error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run(config: &AppConfig, running: Arc<AtomicBool>) -> Result<ExitReason> {
    // 1. Shared grid and particle set
    let grid = create_shared_grid(config.grid_config());
    let handler = CommandHandler::new(
        ParticleSet::new(config.filter.particles),
        MotionModel::new(config.motion_model_config()),
        NoiseGenerator::new(config.filter.seed),
        grid.clone(),
        config.grid.mark_intensity,
    );

    // 2. Command source
    let (receiver, command_rx) = UdpCommandReceiver::new(config.receiver_config(), running.clone())?;
    let receiver_handle = thread::Builder::new()
        .name("udp-commands".into())
        .spawn(move || receiver.run())
        .map_err(|e| Error::Other(format!("Failed to spawn UDP receiver: {}", e)))?;

    // 3. Command thread
    let command_thread = CommandThread::spawn(handler, command_rx, running.clone())?;

    // 4. Render loop on the main thread
    let mut render = RenderLoop::new(
        config.render_loop_config(),
        grid,
        HeadlessDisplay::new(),
        StdinKeySource::spawn()?,
        SnapshotWriter::new(&config.render.snapshot_dir),
    );
    let reason = render.run(&running);

    // 5. Shutdown
    running.store(false, Ordering::Relaxed);
    if receiver_handle.join().is_err() {
        log::error!("UDP receiver thread panicked");
    }
    match command_thread.join() {
        Ok(handler) => log::info!("Handled {} commands", handler.commands_handled()),
        Err(_) => log::error!("Command thread panicked"),
    }
    log::info!(
        "Rendered {} frames, saved {} snapshots",
        render.display().frames_shown(),
        render.snapshots_saved()
    );

    Ok(reason)
}
