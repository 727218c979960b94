use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use config::{Overrides, Settings};
use fetch::HttpFetcher;
use std::io;
use std::path::{Path, PathBuf};
use winter_fingerprint::{FingerprintError, Installation, ModuleSet};
use winter_manifest::{BuildIndex, ManifestError};
use winter_protocol::{
    serialize_json_pretty, BuildList, ErrorCode, ErrorEnvelope, FingerprintReport,
    REPORT_SCHEMA_VERSION,
};
use winter_resolver::ResolveError;

mod config;
mod fetch;
mod report;

#[derive(Parser)]
#[command(name = "winter")]
#[command(about = "Inspect Winter CMS installations", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Config file (defaults to <config dir>/winter-cli/config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Source manifest location: http(s) URL, file:// URL or path (overrides WINTER_MANIFEST_URL)
    #[arg(long, global = true)]
    manifest_url: Option<String>,

    /// Forks manifest location (overrides WINTER_FORKS_URL)
    #[arg(long, global = true)]
    forks_url: Option<String>,

    /// HTTP timeout for manifest downloads (overrides WINTER_HTTP_TIMEOUT_SECS)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Determine the Winter CMS build in use in a project
    #[command(alias = "project:version")]
    Version(VersionArgs),

    /// List every build in the source manifest
    Builds(BuildsArgs),

    /// Show the expected file hashes at a build
    State(StateArgs),

    /// Show module checksums (and file hashes) of a project
    Fingerprint(FingerprintArgs),
}

#[derive(Args)]
struct VersionArgs {
    /// Path to the Winter CMS project (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// List modified, created or deleted files
    #[arg(short, long)]
    detailed: bool,

    /// Modules to compare, comma-separated (default: detected)
    #[arg(long, value_delimiter = ',')]
    modules: Vec<String>,

    /// Output JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct BuildsArgs {
    /// Output JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct StateArgs {
    /// Build version, e.g. 1.2.0
    build: String,

    /// Output JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct FingerprintArgs {
    /// Path to the Winter CMS project (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Modules to scan, comma-separated (default: detected)
    #[arg(long, value_delimiter = ',')]
    modules: Vec<String>,

    /// Include per-file hashes
    #[arg(long)]
    files: bool,

    /// Output JSON
    #[arg(long)]
    json: bool,
}

impl Commands {
    fn json(&self) -> bool {
        match self {
            Self::Version(args) => args.json,
            Self::Builds(args) => args.json,
            Self::State(args) => args.json,
            Self::Fingerprint(args) => args.json,
        }
    }

    fn modules(&self) -> Option<Vec<String>> {
        let modules = match self {
            Self::Version(args) => &args.modules,
            Self::Fingerprint(args) => &args.modules,
            Self::Builds(_) | Self::State(_) => return None,
        };
        (!modules.is_empty()).then(|| modules.clone())
    }
}

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let mut text = serialize_json_pretty(value)?;
    text.push('\n');
    print_stdout(&text)
}

pub fn main_entry() -> Result<()> {
    let mut cli = Cli::parse();

    // Keep stdout clean for JSON consumers.
    let json_output = cli.command.json();
    if json_output {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let outcome = Settings::load(
        cli.config.as_deref(),
        Overrides {
            builds_url: cli.manifest_url.clone(),
            forks_url: cli.forks_url.clone(),
            timeout_secs: cli.timeout_secs,
            modules: cli.command.modules(),
        },
    )
    .and_then(|settings| run(cli.command, &settings));

    match outcome {
        Ok(()) => Ok(()),
        Err(err) if json_output => {
            let envelope = error_envelope(&err);
            print_json(&envelope)?;
            std::process::exit(1);
        }
        Err(err) => Err(err),
    }
}

fn run(command: Commands, settings: &Settings) -> Result<()> {
    match command {
        Commands::Version(args) => run_version(args, settings),
        Commands::Builds(args) => run_builds(args, settings),
        Commands::State(args) => run_state(args, settings),
        Commands::Fingerprint(args) => run_fingerprint(args, settings),
    }
}

fn open_installation(path: &Path, settings: &Settings) -> Result<Installation> {
    let modules = settings.modules.as_ref().map(ModuleSet::new);
    Installation::open(path, modules)
        .with_context(|| format!("Unable to open Winter CMS project at {}", path.display()))
}

fn load_index(settings: &Settings) -> Result<BuildIndex> {
    let fetcher = HttpFetcher::new(settings.timeout)?;
    BuildIndex::load(&fetcher, &settings.builds_url, &settings.forks_url)
        .context("Unable to load the Winter CMS build manifests")
}

/// Detect the build of an installation
fn run_version(args: VersionArgs, settings: &Settings) -> Result<()> {
    let installation = open_installation(&args.path, settings)?;
    let index = load_index(settings)?;

    log::debug!("Detecting Winter CMS build...");
    let resolution =
        winter_resolver::resolve(installation.fingerprint(), &index, args.detailed)
            .context("Unable to determine the Winter CMS build")?;
    log::info!(
        "Resolved build {} (modified: {}, confident: {})",
        resolution.build(),
        resolution.is_modified(),
        resolution.is_confident()
    );

    let report = resolution.to_report();
    if args.json {
        print_json(&report)
    } else {
        print_stdout(&report::render_version(&report, args.detailed))
    }
}

/// List indexed builds in ascending order
fn run_builds(args: BuildsArgs, settings: &Settings) -> Result<()> {
    let index = load_index(settings)?;
    let builds: Vec<String> = index.list_builds().into_iter().map(str::to_string).collect();

    if args.json {
        print_json(&BuildList { builds })
    } else {
        let mut text = builds.join("\n");
        if !text.is_empty() {
            text.push('\n');
        }
        print_stdout(&text)
    }
}

/// Print the reconstructed file map at a build
fn run_state(args: StateArgs, settings: &Settings) -> Result<()> {
    let index = load_index(settings)?;
    let state = index
        .state_at(&args.build)
        .with_context(|| format!("Unable to reconstruct build {}", args.build))?;

    if args.json {
        print_json(&state)
    } else {
        print_stdout(&report::render_map(&state))
    }
}

/// Print the raw fingerprint maps of an installation
fn run_fingerprint(args: FingerprintArgs, settings: &Settings) -> Result<()> {
    let installation = open_installation(&args.path, settings)?;
    let fingerprint = installation.fingerprint();

    if args.json {
        return print_json(&FingerprintReport {
            schema_version: REPORT_SCHEMA_VERSION,
            modules: fingerprint.module_checksums().clone(),
            files: args.files.then(|| fingerprint.files().clone()),
        });
    }

    let mut text = report::render_map(fingerprint.module_checksums());
    if args.files {
        text.push('\n');
        text.push_str(&report::render_map(fingerprint.files()));
    }
    print_stdout(&text)
}

fn error_envelope(err: &anyhow::Error) -> ErrorEnvelope {
    let code = classify_error(err);
    let envelope = ErrorEnvelope::new(code, format!("{err:#}"));
    match code {
        ErrorCode::InvalidInstallation => {
            envelope.with_hint("pass the root directory of a Winter CMS project")
        }
        ErrorCode::UnknownBuild => envelope.with_hint("run `winter builds` to list known builds"),
        _ => envelope,
    }
}

fn classify_error(err: &anyhow::Error) -> ErrorCode {
    for cause in err.chain() {
        if let Some(err) = cause.downcast_ref::<FingerprintError>() {
            return match err {
                FingerprintError::IoError(_) => ErrorCode::IoError,
                FingerprintError::InvalidRoot(_) | FingerprintError::InvalidInstallation { .. } => {
                    ErrorCode::InvalidInstallation
                }
            };
        }
        if let Some(err) = cause.downcast_ref::<ManifestError>() {
            return manifest_error_code(err);
        }
        if let Some(err) = cause.downcast_ref::<ResolveError>() {
            return match err {
                ResolveError::Manifest(err) => manifest_error_code(err),
                ResolveError::NoBuilds | ResolveError::NoCandidate => ErrorCode::ManifestError,
            };
        }
        if cause.downcast_ref::<io::Error>().is_some() {
            return ErrorCode::IoError;
        }
    }
    ErrorCode::Internal
}

fn manifest_error_code(err: &ManifestError) -> ErrorCode {
    match err {
        ManifestError::UnknownBuild(_) => ErrorCode::UnknownBuild,
        ManifestError::InvalidVersion(_) => ErrorCode::InvalidVersion,
        _ => ErrorCode::ManifestError,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winter_manifest::DocumentKind;

    #[test]
    fn errors_are_classified_through_context_layers() {
        let err = anyhow::Error::new(ManifestError::UnknownBuild("9.9.9".to_string()))
            .context("Unable to reconstruct build 9.9.9");
        assert_eq!(classify_error(&err), ErrorCode::UnknownBuild);

        let err = anyhow::Error::new(ResolveError::NoBuilds).context("resolve");
        assert_eq!(classify_error(&err), ErrorCode::ManifestError);

        let err = anyhow::Error::new(FingerprintError::InvalidInstallation {
            missing: PathBuf::from("themes"),
        });
        assert_eq!(classify_error(&err), ErrorCode::InvalidInstallation);

        let err = anyhow::Error::new(ManifestError::NotFound {
            kind: DocumentKind::Forks,
            location: "forks.json".to_string(),
        });
        assert_eq!(classify_error(&err), ErrorCode::ManifestError);

        assert_eq!(classify_error(&anyhow::anyhow!("boom")), ErrorCode::Internal);
    }

    #[test]
    fn unknown_build_envelope_carries_a_hint() {
        let err = anyhow::Error::new(ManifestError::UnknownBuild("9.9.9".to_string()));
        let envelope = error_envelope(&err);
        assert_eq!(envelope.code, ErrorCode::UnknownBuild);
        assert!(envelope.message.contains("9.9.9"));
        assert!(envelope.hint.is_some());
    }

    #[test]
    fn module_flags_are_only_overrides_when_given() {
        let cli = Cli::parse_from(["winter", "version", "--modules", "system,cms", "."]);
        assert_eq!(
            cli.command.modules(),
            Some(vec!["system".to_string(), "cms".to_string()])
        );

        let cli = Cli::parse_from(["winter", "project:version"]);
        assert_eq!(cli.command.modules(), None);
    }
}
