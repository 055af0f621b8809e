//! Krisha-Scout command-line interface

use anyhow::Context;
use clap::Parser;
use krisha_scout::config::{load_config, Config};
use krisha_scout::crawler::{
    build_http_client, HttpFetcher, NoopSession, NoopSolver, Orchestrator, RunScope,
};
use krisha_scout::districts::{find_district, City, District};
use krisha_scout::ConfigError;
use krisha_scout::output::print_summary;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "krisha-scout",
    about = "Adaptive crawler for krisha.kz apartment listings",
    version
)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// City to crawl
    #[arg(long, value_enum, default_value_t = City::Almaty)]
    city: City,

    /// District slug(s); repeatable. Omit to crawl the whole city.
    #[arg(short, long)]
    district: Vec<String>,

    /// List pages to walk per district
    #[arg(short, long, default_value_t = 1)]
    pages: u32,

    /// Stop after this many saved records (0 = unlimited)
    #[arg(long, default_value_t = 0)]
    max_listings: u64,

    /// Output directory; overrides the configured one
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Account phone for the credential session
    #[arg(long, env = "KRISHA_PHONE")]
    phone: Option<String>,

    /// Account password for the credential session
    #[arg(long, env = "KRISHA_PASSWORD")]
    password: Option<String>,

    /// API key for the external challenge-solver service
    #[arg(long, env = "CAPSOLVER_API_KEY")]
    solver_key: Option<String>,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Resolve the scope and print it without crawling
    #[arg(long)]
    dry_run: bool,
}

fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        "krisha_scout=warn"
    } else {
        match verbose {
            0 => "krisha_scout=info,warn",
            1 => "krisha_scout=debug,info",
            _ => "trace",
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

fn resolve_districts(city: City, names: &[String]) -> anyhow::Result<Vec<&'static District>> {
    let mut districts = Vec::new();
    for name in names {
        let district = find_district(city, name).ok_or_else(|| {
            ConfigError::UnknownDistrict(format!("'{name}' for {city}"))
        })?;
        districts.push(district);
    }
    Ok(districts)
}

fn print_scope(city: City, districts: &[&'static District], scope: &RunScope, config: &Config) {
    println!("City:         {} ({})", city.label(), city.slug());
    if districts.is_empty() {
        println!("Districts:    (whole city)");
    } else {
        for d in districts {
            println!("District:     {} [{}]", d.canonical_name(), d.slug);
        }
    }
    println!("Pages:        {}", scope.pages);
    println!(
        "Listing cap:  {}",
        if scope.max_listings == 0 {
            "unlimited".to_string()
        } else {
            scope.max_listings.to_string()
        }
    );
    println!("Output dir:   {}", scope.output_dir.display());
    println!("Base URL:     {}", config.site.base_url);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(phone) = cli.phone {
        config.auth.phone = Some(phone);
    }
    if let Some(password) = cli.password {
        config.auth.password = Some(password);
    }
    if let Some(key) = cli.solver_key {
        config.solver.api_key = Some(key);
    }

    let districts = resolve_districts(cli.city, &cli.district)?;

    let output_dir = cli
        .output
        .unwrap_or_else(|| PathBuf::from(&config.output.dir));

    let scope = RunScope {
        cities: vec![cli.city],
        districts,
        pages: cli.pages.max(1),
        max_listings: cli.max_listings,
        output_dir,
    };

    if cli.dry_run {
        print_scope(cli.city, &scope.districts, &scope, &config);
        return Ok(());
    }

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = Arc::clone(&shutdown);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received, finishing current listing");
                shutdown.store(true, Ordering::Relaxed);
            }
        });
    }

    let client = build_http_client(config.site.request_timeout_secs)?;
    let fetcher = HttpFetcher::new(client);

    info!(city = %cli.city, pages = scope.pages, "Starting crawl");
    let orchestrator = Orchestrator::new(
        fetcher,
        NoopSolver,
        NoopSession,
        config,
        scope,
        shutdown,
    );

    let summary = orchestrator.run().await?;
    print_summary(&summary);
    Ok(())
}
