use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "datarain", version, about = "Render the data rain header animation")]
struct Cli {
    /// More log output on stderr (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the full animation as a looping GIF.
    Render(RenderArgs),
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Print the effective configuration as JSON.
    DumpConfig(ConfigArgs),
}

#[derive(Args, Debug)]
struct ConfigArgs {
    /// JSON configuration; missing fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the glyph selection seed.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Output GIF path (defaults to `out_path` from the configuration).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
        Command::DumpConfig(args) => cmd_dump_config(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &ConfigArgs) -> anyhow::Result<datarain::RainConfig> {
    let mut cfg = match &args.config {
        Some(path) => datarain::RainConfig::from_json_file(path)?,
        None => datarain::RainConfig::default(),
    };
    if let Some(seed) = args.seed {
        cfg.seed = seed;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.config)?;
    let out = datarain::generate_to_file(&cfg, args.out.as_deref())?;
    eprintln!("wrote {}", out.display());
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.config)?;
    let range = cfg.frame_range()?;
    if !range.contains(datarain::FrameIndex(args.frame)) {
        anyhow::bail!(
            "frame {} out of range (total_frames = {})",
            args.frame,
            cfg.total_frames
        );
    }

    let fonts = datarain::FontStore::new(cfg.font_path.clone());
    let mut surface = datarain::CpuSurface::new(cfg.canvas(), fonts)?;
    let (frame, glyphs) =
        datarain::render_frame(&cfg, datarain::FrameIndex(args.frame), &mut surface)?;
    tracing::debug!(frame = args.frame, glyphs, "frame rendered");

    datarain::ensure_parent_dir(&args.out)?;
    image::save_buffer_with_format(
        &args.out,
        &frame.to_straight_rgba8(),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_dump_config(args: ConfigArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args)?;
    println!("{}", cfg.to_json_pretty()?);
    Ok(())
}
