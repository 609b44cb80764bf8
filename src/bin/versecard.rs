use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use versecard::{
    BackgroundResolver, BackgroundSpec, ComposeOptions, Compositor, FixedAdvanceShaper,
    ParleyShaper, RenderRequest, Script, TextShaper, VerseUnit, segment,
};

#[derive(Parser, Debug)]
#[command(name = "versecard", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Split a poem's lines into selectable verse units.
    Segment(SegmentArgs),
    /// Render one verse card to a JPEG file.
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct SegmentArgs {
    /// Input text file, one poem line per line.
    #[arg(long = "in")]
    in_path: PathBuf,

    #[arg(long, value_enum, default_value_t = Language::Latin)]
    language: Language,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// JSON card spec. Inline flags below override its fields.
    #[arg(long = "in")]
    spec: Option<PathBuf>,

    /// Verse text; use \n for an explicit line break.
    #[arg(long)]
    text: Option<String>,

    #[arg(long, value_enum, default_value_t = Language::Latin)]
    language: Language,

    /// Author display name painted near the bottom of the card.
    #[arg(long, default_value = "")]
    attribution: String,

    /// Poem title, used for the suggested download filename.
    #[arg(long)]
    title: Option<String>,

    /// Background image file. Mutually exclusive with --url.
    #[arg(long, conflicts_with = "url")]
    background: Option<PathBuf>,

    /// Background image URL.
    #[arg(long)]
    url: Option<String>,

    /// Seed for the procedural background (used when no image is given).
    #[arg(long)]
    seed: Option<String>,

    /// Square edge length for procedural backgrounds.
    #[arg(long)]
    size: Option<u32>,

    /// Font file for a script, as `<language>=<path>`. Repeatable. Without
    /// any fonts, text is painted as fixed-advance placeholder bars.
    #[arg(long = "font", value_parser = parse_font_arg)]
    fonts: Vec<FontArg>,

    /// Output JPEG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Language {
    Latin,
    Devanagari,
    Nastaliq,
}

impl Language {
    fn script(self) -> Script {
        match self {
            Language::Latin => Script::Latin,
            Language::Devanagari => Script::Devanagari,
            Language::Nastaliq => Script::Nastaliq,
        }
    }
}

#[derive(Clone, Debug)]
struct FontArg {
    language: Language,
    path: PathBuf,
}

fn parse_font_arg(s: &str) -> Result<FontArg, String> {
    let (lang, path) = s
        .split_once('=')
        .ok_or_else(|| format!("expected <language>=<path>, got '{s}'"))?;
    let language = Language::from_str(lang, true)?;
    Ok(FontArg {
        language,
        path: PathBuf::from(path),
    })
}

/// On-disk card spec for `render --in`.
#[derive(Debug, serde::Deserialize)]
struct CardSpec {
    lines: Vec<String>,
    language: Script,
    #[serde(default)]
    attribution: String,
    #[serde(default)]
    title: Option<String>,
    /// Index of the verse unit to render.
    #[serde(default)]
    verse: usize,
    #[serde(default)]
    background: Option<BackgroundField>,
}

#[derive(Debug, Default, serde::Deserialize)]
struct BackgroundField {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    seed: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Segment(args) => cmd_segment(args),
        Command::Render(args) => cmd_render(args).await,
    }
}

fn cmd_segment(args: SegmentArgs) -> anyhow::Result<()> {
    let raw = fs::read_to_string(&args.in_path)
        .with_context(|| format!("read '{}'", args.in_path.display()))?;
    let lines: Vec<String> = raw.lines().map(|l| l.to_string()).collect();

    let units = segment(&lines, args.language.script());
    if units.is_empty() {
        eprintln!("nothing to render: no non-empty lines");
        return Ok(());
    }
    for (i, unit) in units.iter().enumerate() {
        println!("{i}: {}", unit.text.replace('\n', " / "));
    }
    Ok(())
}

async fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let spec = match &args.spec {
        Some(path) => {
            let raw = fs::read(path).with_context(|| format!("open spec '{}'", path.display()))?;
            Some(serde_json::from_slice::<CardSpec>(&raw).context("parse card spec JSON")?)
        }
        None => None,
    };

    let script = match &spec {
        Some(s) => s.language,
        None => args.language.script(),
    };

    let verse = match (&args.text, &spec) {
        (Some(text), _) => VerseUnit {
            text: text.replace("\\n", "\n"),
            script,
        },
        (None, Some(spec)) => {
            let units = segment(&spec.lines, script);
            units
                .get(spec.verse)
                .cloned()
                .with_context(|| format!("spec has no verse unit {}", spec.verse))?
        }
        (None, None) => anyhow::bail!("either --text or --in is required"),
    };

    let background = background_spec(&args, spec.as_ref())?;
    let attribution = if args.attribution.is_empty() {
        spec.as_ref().map(|s| s.attribution.clone()).unwrap_or_default()
    } else {
        args.attribution.clone()
    };
    let title = args
        .title
        .clone()
        .or_else(|| spec.as_ref().and_then(|s| s.title.clone()));

    let mut resolver = BackgroundResolver::new();
    if let Some(size) = args.size {
        resolver = resolver.with_procedural_size(size);
    }
    let mut compositor = Compositor::with_options(
        build_shaper(&args.fonts)?,
        resolver,
        ComposeOptions::default(),
    );

    let request = RenderRequest {
        verse,
        background,
        attribution,
        title,
    };
    let image = compositor.compose(&request).await?;

    if let Some(parent) = args.out.parent() {
        if parent != Path::new("") {
            fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
    }
    fs::write(&args.out, &image.encoded_bytes)
        .with_context(|| format!("write jpeg '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} (suggested name: {})",
        args.out.display(),
        image.suggested_file_name
    );
    Ok(())
}

fn background_spec(args: &RenderArgs, spec: Option<&CardSpec>) -> anyhow::Result<BackgroundSpec> {
    if let Some(path) = &args.background {
        let bytes = fs::read(path).with_context(|| format!("read '{}'", path.display()))?;
        return Ok(BackgroundSpec::UserBytes(bytes));
    }
    if let Some(url) = &args.url {
        return Ok(BackgroundSpec::RemoteUrl(url.clone()));
    }

    let field = spec.and_then(|s| s.background.as_ref());
    if let Some(path) = field.and_then(|f| f.path.as_ref()) {
        let bytes = fs::read(path).with_context(|| format!("read '{path}'"))?;
        return Ok(BackgroundSpec::UserBytes(bytes));
    }
    if let Some(url) = field.and_then(|f| f.url.as_ref()) {
        return Ok(BackgroundSpec::RemoteUrl(url.clone()));
    }

    let seed = args
        .seed
        .clone()
        .or_else(|| field.and_then(|f| f.seed.clone()));
    Ok(BackgroundSpec::Procedural { seed })
}

fn build_shaper(fonts: &[FontArg]) -> anyhow::Result<Box<dyn TextShaper>> {
    if fonts.is_empty() {
        eprintln!("no fonts given; rendering placeholder bars (pass --font <language>=<path>)");
        return Ok(Box::new(FixedAdvanceShaper::default()));
    }

    let mut shaper = ParleyShaper::new();
    for font in fonts {
        let bytes = fs::read(&font.path)
            .with_context(|| format!("read font '{}'", font.path.display()))?;
        shaper.register_font(font.language.script(), &bytes)?;
    }
    Ok(Box::new(shaper))
}
