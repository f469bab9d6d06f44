use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use rand::SeedableRng as _;
use rand::rngs::StdRng;
use reelforge::{
    CatalogConfig, Category, ComposeRequest, Compositor, FontLibrary, FrameRgb8, FrameSequence,
    Orchestrator, Platform, RenderThreading, ScriptRequest, generate_script,
};

#[derive(Parser, Debug)]
#[command(name = "reelforge", version, about = "Compose short vertical videos from a prompt")]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace). `RUST_LOG` wins when set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the category a prompt resolves to.
    Classify(ClassifyArgs),
    /// Print the generated script as JSON.
    Script(ComposeArgs),
    /// Render a single composed frame as a PNG.
    Frame(FrameArgs),
    /// Render the full clip as a PNG sequence plus metadata.json.
    Render(RenderArgs),
    /// Render the enhanced thumbnail as a PNG.
    Thumbnail(ThumbnailArgs),
}

#[derive(Args, Debug)]
struct ClassifyArgs {
    /// Free-text prompt.
    text: String,
}

#[derive(Args, Debug)]
struct ComposeArgs {
    /// Free-text prompt.
    #[arg(long)]
    prompt: String,

    /// Skip classification (finance, tech, lifestyle, motivation, default).
    #[arg(long)]
    category: Option<Category>,

    /// Clip length in seconds (15..=60).
    #[arg(long, default_value_t = 30.0)]
    duration: f64,

    /// Target platform preset; unknown names fall back to instagram.
    #[arg(long, default_value = "instagram")]
    platform: String,

    /// Pin template selection and background grain.
    #[arg(long)]
    seed: Option<u64>,

    /// Catalog JSON overriding the built-in template pools and palettes.
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Extra directory of .ttf/.otf fonts for captions.
    #[arg(long)]
    fonts: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    compose: ComposeArgs,

    /// Timestamp in seconds.
    #[arg(long)]
    at: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    compose: ComposeArgs,

    /// Output directory for frames and metadata.
    #[arg(long)]
    out_dir: PathBuf,

    /// Enable frame-level parallelism.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Render chunk size (parallel mode only).
    #[arg(long, default_value_t = 64)]
    chunk_size: usize,
}

#[derive(Args, Debug)]
struct ThumbnailArgs {
    #[command(flatten)]
    compose: ComposeArgs,

    /// Timestamp in seconds.
    #[arg(long, default_value_t = reelforge::THUMBNAIL_AT)]
    at: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Classify(args) => cmd_classify(args),
        Command::Script(args) => cmd_script(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
        Command::Thumbnail(args) => cmd_thumbnail(args),
    }
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_catalog(path: Option<&Path>) -> anyhow::Result<CatalogConfig> {
    match path {
        Some(p) => CatalogConfig::from_path(p)
            .with_context(|| format!("load catalog '{}'", p.display())),
        None => Ok(CatalogConfig::builtin()),
    }
}

fn load_fonts(dir: Option<&Path>) -> anyhow::Result<FontLibrary> {
    match dir {
        Some(d) => Ok(FontLibrary::with_font_dir(d)?),
        None => Ok(FontLibrary::system()),
    }
}

struct Composed {
    compositor: Compositor,
    metadata: reelforge::CompositionMetadata,
}

fn compose(args: &ComposeArgs) -> anyhow::Result<Composed> {
    let orch = Orchestrator::new(load_catalog(args.catalog.as_deref())?)?;
    let platform = Platform::from_name_or_default(&args.platform);
    let mut req = ComposeRequest::for_platform(&args.prompt, args.duration, platform);
    req.category = args.category;
    req.seed = args.seed;

    let (timeline, metadata) = orch.compose(&req).context("compose")?;
    let fonts = load_fonts(args.fonts.as_deref())?;
    tracing::debug!(faces = fonts.face_count(), "fonts loaded");
    let compositor = orch.compositor(timeline, &fonts)?;
    Ok(Composed {
        compositor,
        metadata,
    })
}

fn write_png(path: &Path, frame: &FrameRgb8) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgb8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))
}

fn cmd_classify(args: ClassifyArgs) -> anyhow::Result<()> {
    let lowered = args.text.to_lowercase();
    let category = reelforge::classify(&args.text);
    let scores: serde_json::Map<String, serde_json::Value> = Category::ALL
        .into_iter()
        .map(|c| {
            (
                c.to_string(),
                reelforge::content::category::keyword_score(&lowered, c).into(),
            )
        })
        .collect();
    let out = serde_json::json!({ "category": category, "keyword_hits": scores });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn cmd_script(args: ComposeArgs) -> anyhow::Result<()> {
    let catalog = load_catalog(args.catalog.as_deref())?;
    let req = ScriptRequest {
        prompt: &args.prompt,
        category: args.category,
        hook: None,
        main_point_count: catalog.main_points.len(),
    };
    let script = match args.seed {
        Some(seed) => generate_script(&catalog, &req, &mut StdRng::seed_from_u64(seed))?,
        None => generate_script(&catalog, &req, &mut rand::thread_rng())?,
    };
    println!("{}", serde_json::to_string_pretty(&script)?);
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let composed = compose(&args.compose)?;
    let frame = composed.compositor.render(args.at)?;
    write_png(&args.out, &frame)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_thumbnail(args: ThumbnailArgs) -> anyhow::Result<()> {
    let composed = compose(&args.compose)?;
    let frame = reelforge::thumbnail(
        &composed.compositor,
        composed.metadata.duration,
        args.at,
    )?;
    write_png(&args.out, &frame)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let composed = compose(&args.compose)?;
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let seq: FrameSequence = composed.metadata.frame_sequence()?;
    let threading = RenderThreading {
        parallel: args.parallel,
        chunk_size: args.chunk_size,
        threads: args.threads,
    };
    let out_dir = args.out_dir.clone();
    let stats = reelforge::render_frames_with(&composed.compositor, &seq, &threading, |i, frame| {
        write_png(&out_dir.join(format!("frame_{i:05}.png")), &frame)
            .map_err(reelforge::ReelError::from)
    })?;

    let meta_path = args.out_dir.join("metadata.json");
    std::fs::write(&meta_path, composed.metadata.to_json_pretty()?)
        .with_context(|| format!("write '{}'", meta_path.display()))?;
    let timeline_path = args.out_dir.join("timeline.json");
    std::fs::write(&timeline_path, composed.compositor.timeline().to_json_pretty()?)
        .with_context(|| format!("write '{}'", timeline_path.display()))?;

    eprintln!(
        "wrote {} frames ({}x{} @ {} fps) to {}",
        stats.frames_total,
        seq.canvas.width,
        seq.canvas.height,
        seq.fps,
        args.out_dir.display()
    );
    Ok(())
}
