use clap::{Parser, Subcommand};
use simple_blog::{config, generate, output, scan};
use std::path::{Path, PathBuf};

fn version_string() -> &'static str {
    if env!("BLOG_RELEASE_TAG") == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("BLOG_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "simple-blog")]
#[command(about = "Static blog engine: validated posts and categories as JSON")]
#[command(long_about = "\
Static blog engine: validated posts and categories as JSON

Posts are markdown files with YAML front-matter; categories are small data
files. Every file is checked against its schema before anything is written.

Content structure:

  content/
  ├── config.toml                  # Site config (optional)
  ├── categories/
  │   ├── programming.json         # {\"name\": \"Programming\"}
  │   └── web-development.yaml     # name: Web Development
  └── posts/
      ├── hello-world.md           # → slug hello-world
      ├── 2024/review.mdx          # → slug 2024/review
      └── _draft.md                # Leading underscore = ignored

Post front-matter:
  title        required string
  description  required string
  date         required date (alias: pubDate)
  category     required category id (alias: categoryId)
  slug         optional, defaults to the file path

Output:
  dist/categories.json   [{id, name}, ...]
  dist/posts.json        fields chosen by [api] posts in config.toml

Run 'simple-blog gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Directory for intermediate files (manifest)
    #[arg(long, default_value = ".simple-blog-temp", global = true)]
    temp_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate content and write the manifest
    Scan,
    /// Write the JSON endpoints from the manifest
    Generate,
    /// Run the full pipeline: scan → generate
    Build,
    /// Validate content directory without building
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Scan => {
            let manifest = scan::scan(&cli.source)?;
            write_manifest(&manifest, &cli.temp_dir)?;
            output::print_scan_output(&manifest, &cli.source);
        }
        Command::Generate => {
            let manifest_path = cli.temp_dir.join("manifest.json");
            let generated = generate::generate(&manifest_path, &cli.output)?;
            output::print_generate_output(&generated.endpoints, &generated.config);
        }
        Command::Build => {
            println!("==> Stage 1: Scanning {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            let manifest_path = write_manifest(&manifest, &cli.temp_dir)?;
            output::print_scan_output(&manifest, &cli.source);

            println!("==> Stage 2: Generating JSON → {}", cli.output.display());
            let generated = generate::generate(&manifest_path, &cli.output)?;
            output::print_generate_output(&generated.endpoints, &generated.config);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            output::print_scan_output(&manifest, &cli.source);
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Write the scan manifest into the temp dir and return its path.
fn write_manifest(
    manifest: &scan::Manifest,
    temp_dir: &Path,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    std::fs::create_dir_all(temp_dir)?;
    let manifest_path = temp_dir.join("manifest.json");
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(&manifest_path, json)?;
    Ok(manifest_path)
}

/// Diagnostics go to stderr via `RUST_LOG`; user-facing output stays on stdout.
fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
