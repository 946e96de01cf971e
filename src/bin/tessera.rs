use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tessera::PixelComparator as _;

#[derive(Parser, Debug)]
#[command(name = "tessera", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite a scene document into a PNG.
    Render(RenderArgs),
    /// Compare two PNGs pixel by pixel. Exits non-zero when they differ.
    Compare(CompareArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input scene document JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Backend to use.
    #[arg(long, value_enum, default_value_t = BackendChoice::Software)]
    backend: BackendChoice,

    /// Write this pass (`LAYER:INDEX`) instead of the final frame.
    #[arg(long, value_parser = parse_pass_id)]
    readback: Option<tessera::RenderPassId>,

    /// Intermediate pass buffer margin in pixels.
    #[arg(long)]
    margin: Option<u32>,
}

#[derive(Parser, Debug)]
struct CompareArgs {
    /// Rendered PNG.
    #[arg(long)]
    actual: PathBuf,

    /// Reference PNG.
    #[arg(long)]
    expected: PathBuf,

    /// Allow off-by-one channel differences.
    #[arg(long)]
    fuzzy: bool,

    /// Ignore the alpha channel.
    #[arg(long)]
    discard_alpha: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackendChoice {
    Software,
    Hardware,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Compare(args) => cmd_compare(args),
    }
}

fn parse_pass_id(s: &str) -> Result<tessera::RenderPassId, String> {
    let (layer, index) = s
        .split_once(':')
        .ok_or_else(|| format!("expected LAYER:INDEX, got '{s}'"))?;
    let layer = layer
        .trim()
        .parse::<i32>()
        .map_err(|e| format!("bad layer id '{layer}': {e}"))?;
    let index = index
        .trim()
        .parse::<i32>()
        .map_err(|e| format!("bad pass index '{index}': {e}"))?;
    Ok(tessera::RenderPassId::new(layer, index))
}

fn read_scene_json(path: &Path) -> anyhow::Result<tessera::SceneDocument> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("open scene '{}'", path.display()))?;
    let doc = tessera::SceneDocument::from_json(&json).with_context(|| "parse scene JSON")?;
    Ok(doc)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut doc = read_scene_json(&args.in_path)?;

    let mut settings = tessera::RenderSettings::from_env();
    if let Some(margin) = args.margin {
        settings = settings.with_pass_margin(margin);
    }
    let kind = match args.backend {
        BackendChoice::Software => tessera::BackendKind::Software,
        BackendChoice::Hardware => tessera::BackendKind::Hardware,
    };
    let backend = tessera::create_backend(kind, &settings)?;

    let resources = tessera::ResourceProvider::default().into_shared();
    doc.upload_resources(&mut resources.write())
        .with_context(|| "upload scene resources")?;

    let mut request = doc.frame_request();
    if let Some(pass) = args.readback {
        request = request.with_readback(pass);
    }
    let mut compositor = tessera::Compositor::new(backend, resources, settings);
    let output = compositor.draw_frame(&request)?;
    let frame = match (args.readback, output.readback) {
        (Some(_), Some(readback)) => readback,
        (Some(pass), None) => anyhow::bail!("pass {pass} produced no readback"),
        (None, _) => output.frame,
    };

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    frame.write_png(&args.out)?;

    eprintln!(
        "wrote {} ({} passes, {} quads, {} culled)",
        args.out.display(),
        output.stats.passes_drawn,
        output.stats.quads_drawn,
        output.stats.quads_culled
    );
    Ok(())
}

fn read_png(path: &Path) -> anyhow::Result<tessera::FrameRGBA> {
    let img = image::open(path)
        .with_context(|| format!("open png '{}'", path.display()))?
        .to_rgba8();
    Ok(tessera::FrameRGBA::from_rgba_image(&img))
}

fn cmd_compare(args: CompareArgs) -> anyhow::Result<()> {
    let actual = read_png(&args.actual)?;
    let expected = read_png(&args.expected)?;
    let matched = if args.fuzzy {
        tessera::FuzzyPixelComparator::off_by_one(args.discard_alpha).compare(&actual, &expected)
    } else {
        tessera::ExactPixelComparator::new(args.discard_alpha).compare(&actual, &expected)
    };
    if !matched {
        anyhow::bail!(
            "'{}' does not match '{}'",
            args.actual.display(),
            args.expected.display()
        );
    }
    eprintln!("match");
    Ok(())
}
