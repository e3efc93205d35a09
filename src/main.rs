use clap::{Parser, Subcommand};
use mdjson::{config, logger, materialize, output, serve};
use std::path::{Path, PathBuf};

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
#[command(name = "mdjson")]
#[command(about = "Serve or build a markdown tree as JSON")]
#[command(long_about = "\
Serve or build a markdown tree as JSON

Every markdown file becomes a JSON document and every directory gets an
index.json listing the front matter of the files directly inside it. The dev
server renders on request; the build writes the same bytes to disk.

Content structure:

  project/
  ├── config.toml                  # Optional, see 'mdjson gen-config'
  └── docs/                        # content_dir (also the URL prefix)
      ├── intro.md                 # → /docs/intro.json
      ├── roadmap.draft.md         # Draft: never rendered, listed, or built
      ├── img/diagram.svg          # Asset: served raw, copied verbatim
      └── guide/
          ├── setup.md             # → /docs/guide/setup.json
          └── usage.md             # → /docs/guide/usage.json
                                   # → /docs/guide/index.json

Document JSON:  {\"id\": \"setup\", \"data\": {<front matter>}, \"content\": \"<html>\"}
Index JSON:     [{\"id\": \"usage\", \"data\": {...}}, {\"id\": \"setup\", ...}]
                sorted by id, descending

Run 'mdjson gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Project root holding config.toml and the content directory
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Content directory, relative to the project root (overrides config)
    #[arg(long, global = true)]
    content_dir: Option<String>,

    /// Output directory for `build` (overrides config)
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Disable colored log output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

/// Flags for the dev server.
#[derive(clap::Args, Clone)]
struct ServeArgs {
    /// Interface to bind (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (overrides config)
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Subcommand)]
enum Command {
    /// Write every document, index and asset to the output directory
    Build,
    /// Run the development server, rendering on request
    Serve(ServeArgs),
    /// Transform all content without writing anything
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match &cli.command {
        Command::Build => {
            let site = setup(&cli)?;
            init_thread_pool(&site.processing);
            let content_root = site.content_root(&cli.root);
            let out = cli
                .output
                .clone()
                .unwrap_or_else(|| site.output_root(&cli.root));
            println!("==> Building {} → {}", content_root.display(), out.display());
            let emitter = materialize::FsEmitter::new(&out);
            let report = materialize::materialize(&content_root, &site.prefix(), &emitter)?;
            output::print_build_output(&report, &out);
        }
        Command::Check => {
            let site = setup(&cli)?;
            init_thread_pool(&site.processing);
            let content_root = site.content_root(&cli.root);
            println!("==> Checking {}", content_root.display());
            let report = materialize::check(&content_root, &site.prefix())?;
            output::print_check_output(&report);
        }
        Command::Serve(args) => {
            let site = setup(&cli)?;
            let mut server = site.server.clone();
            if let Some(host) = &args.host {
                server.host = host.clone();
            }
            if let Some(port) = args.port {
                server.port = port;
            }
            let addr = server.addr();
            let content_root = site.content_root(&cli.root);
            ensure_dir(&content_root)?;

            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            let prefix = site.prefix();
            output::print_serve_banner(&addr, &prefix);
            let adapter = serve::DevAdapter::new(content_root, &prefix);
            runtime.block_on(serve::serve(adapter, &addr))?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Start logging, then load `config.toml` and apply command-line overrides.
fn setup(cli: &Cli) -> Result<config::SiteConfig, config::ConfigError> {
    logger::init_logger(cli.verbose, cli.quiet, cli.no_color);
    resolve_config(cli)
}

/// Load `config.toml` from the project root and apply command-line overrides.
fn resolve_config(cli: &Cli) -> Result<config::SiteConfig, config::ConfigError> {
    let mut site = config::load_config(&cli.root)?;
    if let Some(content_dir) = &cli.content_dir {
        site.content_dir = content_dir.clone();
        site.validate()?;
    }
    tracing::debug!(?site, "resolved config");
    Ok(site)
}

/// The dev server would otherwise start and answer 404 to everything.
fn ensure_dir(path: &Path) -> Result<(), mdjson::scan::ScanError> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(mdjson::scan::ScanError::NotFound(path.to_path_buf()))
    }
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores. User can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
