//! CLI command definitions, routing, and tracing setup.

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use storefront_cms::CmsClient;
use storefront_commerce::HttpCommerceClient;
use storefront_core::publish::validate_output;
use storefront_core::{
    GenerateConfig, GenerateOutcome, GenerateResult, GenerationRequest, HomeSources,
    ProgressReporter, generate_and_publish,
};
use storefront_shared::{AppConfig, init_config, load_config, validate_tokens};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Storefront: generate the home page from commerce and CMS content.
#[derive(Parser)]
#[command(
    name = "storefront",
    version,
    about = "Generate and publish the storefront home page from commerce and CMS content.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Generate the home page and publish it to the output directory.
    Generate {
        /// Locale for commerce queries (defaults to the configured locale).
        #[arg(short, long)]
        locale: Option<String>,

        /// Serve draft CMS content and inject the visual editor hooks.
        #[arg(long)]
        preview: bool,

        /// Route/query parameter passed to the CMS context (repeatable).
        #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
        params: Vec<(String, String)>,

        /// Output directory (defaults to `[page] output_dir`).
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Regenerate even if the published page is still fresh.
        #[arg(long)]
        force: bool,
    },

    /// Check that a published output directory is complete and consistent.
    Validate {
        /// Output directory (defaults to `[page] output_dir`).
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

fn parse_param(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "storefront=info",
        1 => "storefront=debug",
        _ => "storefront=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Generate {
            locale,
            preview,
            params,
            out,
            force,
        } => {
            let request = GenerationRequest {
                params: params.into_iter().collect::<BTreeMap<_, _>>(),
                preview,
                locale,
            };
            cmd_generate(request, out, force).await
        }
        Command::Validate { out } => cmd_validate(out).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_generate(request: GenerationRequest, out: Option<PathBuf>, force: bool) -> Result<()> {
    // Validate tokens before doing anything
    let config = load_config()?;
    validate_tokens(&config)?;

    let commerce = HttpCommerceClient::from_settings(&config.commerce)?;
    let cms = CmsClient::from_settings(&config.cms)?;

    let mut generate_config =
        GenerateConfig::from_app_config(&config, request, cms.token(), out);
    generate_config.force = force;

    info!(
        out = %generate_config.out_dir.display(),
        draft = generate_config.request.is_draft(),
        force,
        "generating home page"
    );

    let sources = HomeSources {
        commerce: &commerce,
        cms: &cms,
    };
    let reporter = CliProgress::new();

    let outcome = generate_and_publish(&generate_config, &sources, &reporter).await?;

    match outcome {
        GenerateOutcome::Published(result) => {
            println!();
            println!("  Home page published!");
            println!("  Path:         {}", result.out_dir.display());
            println!("  Locale:       {}", result.manifest.locale);
            println!("  Featured:     {}", result.featured_count);
            println!("  Best selling: {}", result.best_selling_count);
            println!("  Hash:         {}", result.manifest.content_hash);
            println!("  Expires:      {}", result.manifest.expires_at().to_rfc3339());
            println!("  Time:         {:.1}s", result.elapsed.as_secs_f64());
            println!();
        }
        GenerateOutcome::Fresh(manifest) => {
            reporter.spinner.finish_and_clear();
            println!();
            println!("  Published page is still fresh; use --force to regenerate.");
            println!("  Generated:    {}", manifest.generated_at.to_rfc3339());
            println!("  Expires:      {}", manifest.expires_at().to_rfc3339());
            println!();
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            spinner.set_style(
                style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
            );
        }
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn done(&self, _result: &GenerateResult) {
        self.spinner.finish_and_clear();
    }
}

async fn cmd_validate(out: Option<PathBuf>) -> Result<()> {
    let config = load_config()?;
    let out_dir = out.unwrap_or_else(|| PathBuf::from(&config.page.output_dir));

    if !out_dir.is_dir() {
        return Err(eyre!("'{}' is not a directory", out_dir.display()));
    }

    let manifest = validate_output(&out_dir)?;
    info!(out = %out_dir.display(), "published output is valid");

    println!("  Output is valid: {}", out_dir.display());
    println!("  Generated: {}", manifest.generated_at.to_rfc3339());
    println!("  Locale:    {}", manifest.locale);
    println!("  Preview:   {}", manifest.preview);
    Ok(())
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_split_on_first_equals() {
        assert_eq!(
            parse_param("_storyblok=1234").unwrap(),
            ("_storyblok".to_string(), "1234".to_string())
        );
        assert_eq!(
            parse_param("q=a=b").unwrap(),
            ("q".to_string(), "a=b".to_string())
        );
        assert!(parse_param("novalue").is_err());
        assert!(parse_param("=x").is_err());
    }

    #[test]
    fn generate_args_parse() {
        let cli = Cli::try_parse_from([
            "storefront",
            "generate",
            "--preview",
            "--locale",
            "de-DE",
            "--param",
            "_storyblok=1",
            "--force",
        ])
        .unwrap();

        let Command::Generate {
            locale,
            preview,
            params,
            force,
            out,
        } = cli.command
        else {
            panic!("expected generate");
        };
        assert_eq!(locale.as_deref(), Some("de-DE"));
        assert!(preview && force);
        assert_eq!(params, [("_storyblok".to_string(), "1".to_string())]);
        assert!(out.is_none());
    }
}
