use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use taglog::config::{self, Config, StyleMode};
use taglog::git::Git2Repository;
use taglog::ui;
use taglog::unreleased::{UnreleasedOptions, DEFAULT_UNRELEASED_TAG};
use taglog::{ChangelogGenerator, ChangelogOptions};

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl From<ColorChoice> for StyleMode {
    fn from(choice: ColorChoice) -> Self {
        match choice {
            ColorChoice::Auto => StyleMode::Auto,
            ColorChoice::Always => StyleMode::Always,
            ColorChoice::Never => StyleMode::Never,
        }
    }
}

#[derive(clap::Parser, Debug)]
#[command(
    name = "taglog",
    version,
    about = "Generate a changelog from git tags and conventional commits"
)]
struct Args {
    #[arg(long, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(short, long, env = "TAGLOG_REPO", help = "Path to git repository")]
    repo: Option<PathBuf>,

    #[arg(
        short,
        long,
        env = "TAGLOG_OUTPUT",
        help = "Write the changelog to a file instead of stdout"
    )]
    output: Option<PathBuf>,

    #[arg(
        long,
        env = "TAGLOG_UNRELEASED",
        help = "Only generate the section for unreleased commits"
    )]
    unreleased: bool,

    #[arg(
        short,
        long,
        env = "TAGLOG_TAG",
        help = "Version to use for unreleased commits [default: unreleased]"
    )]
    tag: Option<String>,

    #[arg(
        long,
        env = "TAGLOG_INC_MAJOR",
        help = "Label unreleased commits with the next major version"
    )]
    inc_major: bool,

    #[arg(
        long,
        env = "TAGLOG_INC_MINOR",
        help = "Label unreleased commits with the next minor version"
    )]
    inc_minor: bool,

    #[arg(
        long,
        env = "TAGLOG_INC_PATCH",
        help = "Label unreleased commits with the next patch version"
    )]
    inc_patch: bool,

    #[arg(long, value_enum, help = "When to style terminal output")]
    color: Option<ColorChoice>,

    #[arg(short, long, help = "Print debug diagnostics to stderr")]
    verbose: bool,
}

/// Effective settings after applying flags and environment over the config file
#[derive(Debug, Clone, PartialEq)]
struct Settings {
    repo: PathBuf,
    output: Option<PathBuf>,
    style: StyleMode,
    options: ChangelogOptions,
}

fn resolve_settings(args: Args, config: Config) -> Settings {
    let tag = args
        .tag
        .or(config.tag)
        .unwrap_or_else(|| DEFAULT_UNRELEASED_TAG.to_string());

    Settings {
        repo: args
            .repo
            .or(config.repo)
            .unwrap_or_else(|| PathBuf::from(".")),
        output: args.output.or(config.output),
        style: args.color.map(StyleMode::from).unwrap_or(config.style),
        options: ChangelogOptions {
            unreleased_only: args.unreleased || config.unreleased,
            unreleased: UnreleasedOptions {
                inc_major: args.inc_major || config.inc_major,
                inc_minor: args.inc_minor || config.inc_minor,
                inc_patch: args.inc_patch || config.inc_patch,
                tag,
            },
            ..ChangelogOptions::default()
        },
    }
}

fn init_logging(verbose: bool) {
    // recorded warnings are shown by ui, so tracing stays quiet by default
    let default_level = if verbose { "debug" } else { "error" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(args: Args) -> Result<()> {
    let loaded = config::load_config(args.config.as_deref()).context("Error loading config")?;
    if let Some(source) = &loaded.source {
        ui::display_status(&format!("Using config file: {}", source.display()));
    }

    let settings = resolve_settings(args, loaded.config);
    tracing::debug!(repo = %settings.repo.display(), "opening repository");

    let repo = Git2Repository::open(&settings.repo)?;
    let changelog = ChangelogGenerator::new(&repo)?.generate(&settings.options)?;

    for warning in &changelog.warnings {
        ui::display_warning(warning);
    }

    let text = changelog.render();
    match &settings.output {
        Some(path) => {
            fs::write(path, &text)
                .with_context(|| format!("Cannot write to file '{}'", path.display()))?;
            ui::display_success(&format!("Changelog written to {}", path.display()));
        }
        None => print!(
            "{}",
            ui::render_markdown(&text, ui::should_style(settings.style))
        ),
    }

    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}
