// Copyright 2026 Marketgrab Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use marketgrab::config::{DelayPolicy, ExtractionConfig, PageSize, SortField};
use marketgrab::session::SessionOrchestrator;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(
    name = "marketgrab",
    about = "Marketgrab — unattended batch extractor for paginated marketplace listings",
    version,
    after_help = "Delays accept a fixed value (\"800\") or a uniform range (\"400..1500\"), in milliseconds."
)]
struct Cli {
    /// Marketplace listing URL
    #[arg(long, default_value = "https://accounts.clickbank.com/marketplace.htm")]
    url: url::Url,

    /// Search keyword filter (empty = no filter)
    #[arg(long, default_value = "")]
    keywords: String,

    /// Results per page
    #[arg(long, value_enum, default_value_t = PageSize::Fifty)]
    page_size: PageSize,

    /// Sort field applied before extraction
    #[arg(long, value_enum, default_value_t = SortField::Gravity)]
    sort: SortField,

    /// Delay before each page advance, fixed ms or min..max range
    #[arg(long, default_value = "400..1500")]
    delay: DelayPolicy,

    /// Run the browser with a visible window
    #[arg(long)]
    headed: bool,

    /// Gzip the output artifact
    #[arg(long)]
    compress: bool,

    /// Directory the artifact is written under
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// Upper bound for each individual wait, in milliseconds
    #[arg(long, default_value_t = 30_000)]
    wait_timeout: u64,

    /// Enable verbose/debug logging
    #[arg(long, short)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(long, short)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "marketgrab", &mut std::io::stdout());
        return Ok(());
    }

    let default_level = if cli.verbose {
        "marketgrab=debug"
    } else if cli.quiet {
        "marketgrab=warn"
    } else {
        "marketgrab=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(default_level.parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ExtractionConfig {
        url: cli.url,
        search_keywords: cli.keywords,
        page_size: cli.page_size,
        sort_field: cli.sort,
        delay: cli.delay,
        headless: !cli.headed,
        compress: cli.compress,
        output_dir: cli.output_dir,
        wait_timeout: Duration::from_millis(cli.wait_timeout),
    };

    match SessionOrchestrator::new(config).run().await {
        Ok(path) => {
            println!("{}", path.display());
            Ok(())
        }
        Err(e) => {
            eprintln!("  Error: {e:#}");
            std::process::exit(1);
        }
    }
}
