use crate::{
    common::{Error, Result},
    config::Config,
    session::Session,
};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Config file read when `--config` is not given.
const DEFAULT_CONFIG: &str = "longan.yaml";

#[derive(Parser, Debug)]
#[command(name = "longan")]
#[command(about = "Turn documents into slide decks and restyle decks onto templates")]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Command,

    /// Path to config YAML. If omitted, uses ./longan.yaml if present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Summarize a .txt, .md or .docx document into a deck.
    Generate {
        document: PathBuf,
        /// Profile to render with instead of the detected theme's.
        #[arg(long)]
        profile: Option<String>,
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Rebuild a deck on the slide designs of a template deck.
    Restyle {
        input: PathBuf,
        template: PathBuf,
        output: PathBuf,
    },
    /// List the known profile names.
    Profiles {},
}

pub fn dispatch(args: Args) -> Result<()> {
    let cfg_path = args
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    let mut cfg = match Config::load(&cfg_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            init_logging(&args, &Config::default())?;
            return Err(e);
        },
    };
    init_logging(&args, &cfg)?;

    if let Ok(yaml) = cfg.to_yaml() {
        debug!("effective config:\n{}", yaml);
    }

    match args.cmd {
        Command::Generate {
            document,
            profile,
            out_dir,
        } => {
            if let Some(dir) = out_dir {
                cfg.output.dir = dir;
            }
            generate(&cfg, &document, profile.as_deref())
        },
        Command::Restyle {
            input,
            template,
            output,
        } => restyle(&cfg, &input, &template, &output),
        Command::Profiles {} => profiles(&cfg),
    }
}

fn init_logging(args: &Args, cfg: &Config) -> Result<()> {
    let filter = match args.log_level.as_deref() {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(cfg.logging.level.as_str())),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| Error::Config(format!("failed to init logging: {e}")))
}

fn generate(cfg: &Config, document: &Path, profile: Option<&str>) -> Result<()> {
    let mut session = Session::from_config(cfg)?;
    if let Some(name) = profile {
        if !session.profiles().contains(name) && name.parse::<crate::summarize::Theme>().is_err() {
            warn!(profile = name, "unknown profile, using fallback");
        }
    }

    let generated = session.generate(document, profile)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "output": generated.output_path,
            "profile": generated.profile_name,
            "theme": generated.theme,
            "slides": generated.slide_count,
            "used_external_model": generated.used_external_model,
        }))?
    );
    Ok(())
}

fn restyle(cfg: &Config, input: &Path, template: &Path, output: &Path) -> Result<()> {
    let session = Session::from_config(cfg)?;
    let report = session.restyle(input, template, output)?;
    info!(
        slides = report.slides_written,
        failures = report.failure_count(),
        dropped = report.dropped_contents(),
        "restyle finished"
    );
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn profiles(cfg: &Config) -> Result<()> {
    for profile in cfg.profiles()?.iter() {
        println!(
            "{}\t{}\t#{}\t#{}",
            profile.name,
            profile.font,
            profile.primary_color.to_hex(),
            profile.secondary_color.to_hex()
        );
    }
    Ok(())
}
