use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use ckpass::{
    DeliveryReceipt, DirectoryTarget, EngineDetector, EngineKind, ExportOutcome, ExportPipeline,
    ExportSession, FieldUpdate, FixedEngine, FormState, MembershipLength, MembershipType,
    PassAssets, PassConfig, PassRegion, PassSnapshot, ResvgSnapshot, SystemClock,
    UserAgentDetector,
};

#[derive(Parser, Debug)]
#[command(name = "ckpass", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a pass and deliver it into a directory.
    Export(ExportArgs),
    /// Write the pass SVG without capturing it.
    Preview(PreviewArgs),
    /// Classify a user-agent string.
    Detect(DetectArgs),
}

#[derive(clap::Args, Debug)]
struct PassArgs {
    #[arg(long, default_value = "")]
    first_name: String,

    #[arg(long, default_value = "")]
    last_name: String,

    /// Tier label, e.g. "Premium" or "Premium Membership".
    #[arg(long, default_value = "Essential")]
    membership_type: String,

    /// Duration in months (1, 6 or 12).
    #[arg(long, default_value_t = 1)]
    months: u32,

    /// Parking bay (Parking tier only).
    #[arg(long, default_value = "")]
    parking_bay: String,

    /// Profile photo (PNG, JPEG, GIF or WebP).
    #[arg(long)]
    photo: Option<PathBuf>,

    /// Config JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    #[command(flatten)]
    pass: PassArgs,

    /// Output directory.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// User-agent used to pick the delivery path.
    #[arg(long)]
    user_agent: Option<String>,

    /// Force the engine instead of detecting it.
    #[arg(long, value_enum)]
    engine: Option<EngineArg>,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    #[command(flatten)]
    pass: PassArgs,

    /// Output SVG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct DetectArgs {
    #[arg(long)]
    user_agent: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum EngineArg {
    Standard,
    Restricted,
}

impl From<EngineArg> for EngineKind {
    fn from(v: EngineArg) -> Self {
        match v {
            EngineArg::Standard => EngineKind::Standard,
            EngineArg::Restricted => EngineKind::Restricted,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Export(args) => cmd_export(args).await,
        Command::Preview(args) => cmd_preview(args),
        Command::Detect(args) => cmd_detect(args),
    }
}

async fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.pass.config.as_deref())?;
    let snapshot = fill_form(&args.pass)?;
    let region = build_region(&snapshot, &cfg)?;

    let detector: Box<dyn EngineDetector> = match (args.engine, args.user_agent) {
        (Some(engine), _) => Box::new(FixedEngine(engine.into())),
        (None, Some(ua)) => Box::new(UserAgentDetector::new(ua)),
        (None, None) => Box::new(FixedEngine(EngineKind::Standard)),
    };
    let pipeline = ExportPipeline::new(Arc::new(ResvgSnapshot), Arc::new(SystemClock))
        .with_scale(cfg.capture_scale);
    let session =
        ExportSession::new(pipeline, detector.as_ref()).with_advisory(cfg.advisory_text.clone());

    if let Some(banner) = session.advisory_banner() {
        eprintln!("{banner}");
    }

    match session.export(Some(region), snapshot).await {
        ExportOutcome::Review(artifact) => {
            tracing::info!(
                filename = %artifact.suggested_filename,
                width = artifact.width,
                height = artifact.height,
                "review: {}",
                session.delivery_action_label()
            );
        }
        ExportOutcome::Failed(notice) => anyhow::bail!("{}", notice.message),
        ExportOutcome::Busy => anyhow::bail!("an export is already in progress"),
    }

    let mut target = DirectoryTarget::new(args.out_dir.clone());
    let receipt = session.deliver(&mut target)?;
    let what = match receipt {
        DeliveryReceipt::Downloaded { .. } => "download".to_string(),
        DeliveryReceipt::OpenedDocument { title } => title,
    };
    for path in target.written() {
        eprintln!("wrote {} ({what})", path.display());
    }
    Ok(())
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.pass.config.as_deref())?;
    let snapshot = fill_form(&args.pass)?;
    let region = build_region(&snapshot, &cfg)?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, region.svg())
        .with_context(|| format!("write svg '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_detect(args: DetectArgs) -> anyhow::Result<()> {
    let engine = UserAgentDetector::new(args.user_agent).detect();
    println!("{}", serde_json::to_string(&engine)?);
    if engine.is_restricted() {
        println!("{}", PassConfig::default().advisory_text);
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<PassConfig> {
    Ok(match path {
        Some(p) => PassConfig::from_path(p)?,
        None => PassConfig::default(),
    })
}

fn fill_form(args: &PassArgs) -> anyhow::Result<PassSnapshot> {
    let mut form = FormState::start(&SystemClock);
    form.apply(FieldUpdate::FirstName(args.first_name.clone()));
    form.apply(FieldUpdate::LastName(args.last_name.clone()));
    form.apply(FieldUpdate::MembershipType(MembershipType::from_label(
        &args.membership_type,
    )));
    form.apply(FieldUpdate::MembershipLength(MembershipLength::from_months(
        args.months,
    )?));
    if form.shows_parking_bay_input() {
        form.apply(FieldUpdate::ParkingBay(args.parking_bay.clone()));
    }
    if let Some(path) = &args.photo {
        let mime = photo_mime(path)?;
        let bytes =
            std::fs::read(path).with_context(|| format!("read photo '{}'", path.display()))?;
        form.upload_profile_image(mime, &bytes);
    }
    Ok(form.snapshot())
}

fn photo_mime(path: &Path) -> anyhow::Result<&'static str> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "png" => Ok("image/png"),
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "gif" => Ok("image/gif"),
        "webp" => Ok("image/webp"),
        _ => anyhow::bail!("photo '{}' is not a supported image type", path.display()),
    }
}

fn build_region(snapshot: &PassSnapshot, cfg: &PassConfig) -> anyhow::Result<PassRegion> {
    let assets = PassAssets::load(cfg.assets_dir.as_deref(), cfg.load_system_fonts)?;
    let layout = ckpass::project(snapshot, &cfg.date_format)?;
    Ok(PassRegion::new(&layout, &assets))
}
