use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use inbetween::{
    CancelToken, CommandOracle, CrossfadeOracle, FfmpegSink, FfmpegSinkOpts, FileJob, Fps,
    InterpError, InterpResult, InterpolationConfig, InterpolationOracle, Preset, ScheduleMode,
    Size,
};

/// Generate a smooth video transition between two still images.
#[derive(Parser, Debug)]
#[command(name = "inbetween", version, about, long_about = None)]
struct Cli {
    /// First endpoint image (t = 0).
    #[arg(long, value_name = "PATH")]
    image1: PathBuf,

    /// Second endpoint image (t = 1).
    #[arg(long, value_name = "PATH")]
    image2: PathBuf,

    /// Output video path (container follows the extension).
    #[arg(short, long, value_name = "PATH")]
    output: PathBuf,

    /// Number of interpolated frames between the endpoints.
    #[arg(long, value_name = "N")]
    frames: Option<usize>,

    /// Output frame rate, e.g. `20` or `30000/1001`.
    #[arg(long, value_name = "F")]
    fps: Option<Fps>,

    /// Pad both sides to a multiple of this before calling the oracle.
    #[arg(long, value_name = "A")]
    align: Option<u32>,

    /// Resize both inputs to WIDTHxHEIGHT on load.
    #[arg(long, value_name = "WxH")]
    size: Option<Size>,

    /// Start from a named preset instead of the defaults.
    #[arg(long, value_enum, conflicts_with = "config")]
    preset: Option<PresetChoice>,

    /// Start from a JSON config file instead of the defaults.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Scheduling mode.
    #[arg(long, value_enum)]
    mode: Option<ModeChoice>,

    /// Oracle implementation.
    #[arg(long, value_enum, default_value_t = OracleChoice::Crossfade)]
    oracle: OracleChoice,

    /// Command line for `--oracle command`, with {x0} {x1} {t} {out} placeholders.
    #[arg(long, value_name = "CMD", required_if_eq("oracle", "command"))]
    oracle_cmd: Option<String>,

    /// Run oracle calls on a pool of N worker threads.
    #[arg(long, value_name = "N")]
    threads: Option<usize>,

    /// Retry each failed oracle call up to N extra times.
    #[arg(long, value_name = "N")]
    retries: Option<u32>,

    /// Also write every final frame as a PNG into this directory.
    #[arg(long, value_name = "DIR")]
    dump_frames: Option<PathBuf>,

    /// Fail instead of replacing an existing output file.
    #[arg(long)]
    no_overwrite: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PresetChoice {
    Quick,
    Smooth,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeChoice {
    Even,
    Recursive,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OracleChoice {
    Crossfade,
    Command,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("inbetween={log_level}").into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match run(&cli) {
        Ok(frames) => {
            println!("{frames}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error[{}]: {err}", err.kind());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> InterpResult<usize> {
    let cfg = build_config(cli)?;
    let oracle = make_oracle(cli)?;

    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        handler_token.cancel();
        eprintln!("interrupt received, stopping after the current oracle call...");
    }) {
        tracing::warn!("could not install Ctrl-C handler: {e}");
    }

    let mut sink = FfmpegSink::new(FfmpegSinkOpts {
        overwrite: !cli.no_overwrite,
        ..FfmpegSinkOpts::new(&cli.output)
    });
    let job = FileJob {
        image1: cli.image1.clone(),
        image2: cli.image2.clone(),
        dump_frames: cli.dump_frames.clone(),
    };

    let (report, summary) =
        inbetween::interpolate_files(&cfg, oracle.as_ref(), &job, &mut sink, &cancel)?;
    tracing::info!(
        output = %cli.output.display(),
        oracle_calls = report.oracle_calls,
        duration_secs = summary.duration_secs,
        "wrote video"
    );
    Ok(report.frames)
}

fn build_config(cli: &Cli) -> InterpResult<InterpolationConfig> {
    let mut cfg = match (&cli.config, cli.preset) {
        (Some(path), _) => InterpolationConfig::from_json_file(path)?,
        (None, Some(PresetChoice::Quick)) => Preset::Quick.config(),
        (None, Some(PresetChoice::Smooth)) => Preset::Smooth.config(),
        (None, None) => InterpolationConfig::default(),
    };

    if let Some(n) = cli.frames {
        cfg.frame_count = n;
    }
    if let Some(fps) = cli.fps {
        cfg.fps = fps;
    }
    if let Some(align) = cli.align {
        cfg.alignment = align;
    }
    if let Some(size) = cli.size {
        cfg.target_size = Some(size);
    }
    if let Some(mode) = cli.mode {
        cfg.mode = match mode {
            ModeChoice::Even => ScheduleMode::Even,
            ModeChoice::Recursive => ScheduleMode::Recursive,
        };
    }
    if let Some(threads) = cli.threads {
        cfg.threading.parallel = true;
        cfg.threading.threads = Some(threads);
    }
    if let Some(retries) = cli.retries {
        cfg.retry.max_attempts = retries.saturating_add(1);
    }

    cfg.validate()?;
    Ok(cfg)
}

fn make_oracle(cli: &Cli) -> InterpResult<Box<dyn InterpolationOracle>> {
    match cli.oracle {
        OracleChoice::Crossfade => Ok(Box::new(CrossfadeOracle)),
        OracleChoice::Command => {
            let cmd = cli.oracle_cmd.as_deref().ok_or_else(|| {
                InterpError::validation("--oracle command requires --oracle-cmd")
            })?;
            Ok(Box::new(CommandOracle::parse(cmd)?))
        }
    }
}
