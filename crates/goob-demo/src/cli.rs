//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use goob_engine::device::GpuInit;
use goob_engine::logging::LoggingConfig;
use goob_engine::window::RuntimeConfig;

/// goob demo programs.
#[derive(Parser, Debug)]
#[command(name = "goob-demo", about = "Window, bouncing-sprite and Ink sprite demos")]
pub struct Cli {
    #[command(subcommand)]
    pub demo: Demo,

    #[command(flatten)]
    pub window: WindowArgs,

    /// Log filter (error, warn, info, debug, trace, or env_logger syntax).
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Demo {
    /// Open a window and print input events.
    Window,
    /// Click to spawn bouncing dots.
    Bounce(BounceArgs),
    /// Click to add sprites driven by an Ink script.
    Ink(InkArgs),
}

#[derive(Args, Debug)]
pub struct WindowArgs {
    /// Window width in logical pixels.
    #[arg(long, global = true, default_value_t = 800)]
    pub width: u32,

    /// Window height in logical pixels.
    #[arg(long, global = true, default_value_t = 600)]
    pub height: u32,

    /// Window title.
    #[arg(long, global = true)]
    pub title: Option<String>,

    /// Draw at this fixed resolution, letterboxed into the window.
    /// Takes `WIDTHxHEIGHT`.
    #[arg(long, global = true, value_parser = parse_resolution)]
    pub logical: Option<(u32, u32)>,

    /// Present without vsync.
    #[arg(long, global = true)]
    pub no_vsync: bool,
}

#[derive(Args, Debug)]
pub struct BounceArgs {
    /// Sprite image (PNG, JPEG, BMP or GIF). A dot is generated when absent.
    #[arg(long)]
    pub texture: Option<PathBuf>,

    /// Sprite edge length in logical pixels.
    #[arg(long, default_value_t = 24.0)]
    pub size: f32,

    /// RNG seed; random when absent.
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Args, Debug)]
pub struct InkArgs {
    /// Sprite image (PNG, JPEG, BMP or GIF). A dot is generated when absent.
    #[arg(long)]
    pub texture: Option<PathBuf>,

    /// Behaviour script; the bundled `bounce.ink` when absent.
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Sprites added or removed per click.
    #[arg(long, default_value_t = 100)]
    pub count: usize,

    /// Uniform sprite scale.
    #[arg(long, default_value_t = 1.0)]
    pub scale: f64,

    /// RNG seed; random when absent.
    #[arg(long)]
    pub seed: Option<u64>,
}

fn parse_resolution(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let w: u32 = w.trim().parse().map_err(|e| format!("bad width '{w}': {e}"))?;
    let h: u32 = h.trim().parse().map_err(|e| format!("bad height '{h}': {e}"))?;
    if w == 0 || h == 0 {
        return Err(format!("resolution must be non-zero, got {w}x{h}"));
    }
    Ok((w, h))
}

impl WindowArgs {
    pub fn runtime_config(&self, default_title: &str) -> RuntimeConfig {
        let title = self.title.clone().unwrap_or_else(|| default_title.to_string());
        let config = RuntimeConfig::new(title, self.width.max(1) as f64, self.height.max(1) as f64);
        match self.logical {
            Some((w, h)) => config.with_logical_size(w as f32, h as f32),
            None => config,
        }
    }

    pub fn gpu_init(&self) -> GpuInit {
        GpuInit::default().with_vsync(!self.no_vsync)
    }
}

impl Cli {
    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            env_filter: self.log_level.clone(),
            ..LoggingConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subcommand_with_global_window_flags() {
        let cli = Cli::parse_from(["goob-demo", "bounce", "--width", "320", "--title", "hi"]);
        assert!(matches!(cli.demo, Demo::Bounce(_)));
        assert_eq!(cli.window.width, 320);
        assert_eq!(cli.window.height, 600);
        let cfg = cli.window.runtime_config("default");
        assert_eq!(cfg.title, "hi");
        assert!(cfg.logical_size.is_none());
    }

    #[test]
    fn ink_flags() {
        let cli = Cli::parse_from(["goob-demo", "ink", "--count", "5", "--script", "a.ink", "--seed", "9"]);
        let Demo::Ink(args) = cli.demo else { panic!("expected ink") };
        assert_eq!(args.count, 5);
        assert_eq!(args.script, Some(PathBuf::from("a.ink")));
        assert_eq!(args.seed, Some(9));
        assert_eq!(args.scale, 1.0);
    }

    #[test]
    fn default_title_used_when_absent() {
        let cli = Cli::parse_from(["goob-demo", "window"]);
        assert_eq!(cli.window.runtime_config("Goobernatorial").title, "Goobernatorial");
    }

    #[test]
    fn logical_resolution_letterboxes() {
        let cli = Cli::parse_from(["goob-demo", "--logical", "320x180", "window"]);
        let cfg = cli.window.runtime_config("t");
        let vp = cfg.logical_size.unwrap();
        assert_eq!((vp.width, vp.height), (320.0, 180.0));
    }

    #[test]
    fn resolution_parsing() {
        assert_eq!(parse_resolution("640x480"), Ok((640, 480)));
        assert!(parse_resolution("640").is_err());
        assert!(parse_resolution("0x480").is_err());
        assert!(parse_resolution("ax480").is_err());
    }

    #[test]
    fn unknown_demo_is_rejected() {
        assert!(Cli::try_parse_from(["goob-demo", "teapot"]).is_err());
    }
}
