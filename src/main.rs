use clap::{Parser, Subcommand};
use simple_docs::{config, generate, output};
use std::path::{Path, PathBuf};
use tracing::info;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "simple-docs")]
#[command(about = "Static documentation generator for source trees")]
#[command(long_about = "\
Static documentation generator for source trees

Your project directory is the data source. Every file becomes one HTML page
in a single flat output directory: markdown is rendered, everything else is
syntax highlighted.

Output structure:

  .simple-docs/
  ├── tree.js                              # Navigation tree (directory → files)
  ├── highlight.css                        # Classes used by highlighted pages
  ├── __SLASH__README.md.html              # README.md, rendered
  └── __SLASH__src__SLASH__app.js.html     # src/app.js, highlighted

Names are flattened by replacing each path separator with a token
(__SLASH__ by default), so nested files never collide with each other.

Skipped while walking: .git, node_modules, target and the other
directories listed under [walk] prune, plus the output directory itself.

Run 'simple-docs gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Project directory to document
    #[arg(long, default_value = ".", global = true)]
    source: PathBuf,

    /// Output directory [default: <source>/.simple-docs, see output_dir in config]
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log format
    #[arg(long, value_enum, default_value = "text", global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Walk the project and write one HTML page per file
    Build,
    /// Walk the project and print the navigation tree without writing
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, &cli.log_format);

    match cli.command {
        Command::Build => {
            let site_config = config::load_config(&cli.source)?;
            init_thread_pool(&site_config.processing);
            let output_dir = resolve_output_dir(&cli.source, cli.output.as_deref(), &site_config);

            println!(
                "==> Building {} → {}",
                cli.source.display(),
                output_dir.display()
            );
            let report = generate::generate(&cli.source, &output_dir, &site_config)?;
            output::print_build_report(&report, &site_config);
        }
        Command::Check => {
            let site_config = config::load_config(&cli.source)?;
            init_thread_pool(&site_config.processing);
            let output_dir = resolve_output_dir(&cli.source, cli.output.as_deref(), &site_config);
            let exclude = std::fs::canonicalize(&output_dir).ok();

            println!("==> Checking {}", cli.source.display());
            let snapshot = generate::snapshot(&cli.source, exclude.as_deref(), &site_config)?;
            info!(files = snapshot.records.len(), "walk complete");
            output::print_tree(&snapshot.tree);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Install the global subscriber. Logs go to stderr; stdout carries the report.
///
/// `RUST_LOG` wins over `-v` when set.
fn init_tracing(verbose: u8, format: &LogFormat) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match verbose {
        0 => "simple_docs=info",
        1 => "simple_docs=debug",
        _ => "simple_docs=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores — user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

/// `--output` when given, otherwise the configured directory under the source.
fn resolve_output_dir(source: &Path, cli_output: Option<&Path>, config: &config::SiteConfig) -> PathBuf {
    match cli_output {
        Some(dir) => dir.to_path_buf(),
        None => source.join(&config.output_dir),
    }
}
