//! Search command - discover surrounding regions and aggregate queue
//! listings for a benefit.

use kolejka::config::{self, DiscoverySettings, FetchSettings};
use kolejka::geo::Coordinate;
use kolejka::orchestrator::{DiscoveryOutcome, SearchOutcome};

use crate::error::CliError;
use crate::output;
use crate::runner::CliRunner;

/// Arguments for the search command.
#[derive(clap::Args)]
pub struct SearchArgs {
    /// Benefit name or fragment to search for
    #[arg(long)]
    pub benefit: String,

    /// Latitude in decimal degrees (defaults to Kraków city centre)
    #[arg(long, requires = "lon")]
    pub lat: Option<f64>,

    /// Longitude in decimal degrees
    #[arg(long, requires = "lat")]
    pub lon: Option<f64>,

    /// Sampling circle radius in kilometers
    #[arg(long, default_value_t = 100.0)]
    pub radius_km: f64,

    /// Number of boundary sample points
    #[arg(long, default_value_t = config::DEFAULT_SAMPLE_COUNT)]
    pub points: usize,

    /// Only queues admitting children
    #[arg(long)]
    pub children: bool,

    /// Fetch the home region only, skipping near-region discovery
    #[arg(long)]
    pub no_near: bool,
}

/// Run the search command.
pub async fn run(args: SearchArgs, verbose: bool) -> Result<(), CliError> {
    let runner = CliRunner::new(verbose)?;
    runner.log_startup("search");

    let center = match (args.lat, args.lon) {
        (Some(lat), Some(lon)) => {
            Coordinate::new(lat, lon).map_err(|e| CliError::BadCoordinate(e.to_string()))?
        }
        _ => config::DEFAULT_CENTER,
    };

    let discovery = DiscoverySettings {
        sample_count: args.points,
        sample_radius_m: args.radius_km * 1000.0,
        ..DiscoverySettings::default()
    };
    let cooldown_secs = discovery.retry_cooldown_secs;
    let orchestrator = runner.build_orchestrator(discovery, FetchSettings::default(), center);

    println!(
        "Searching for '{}' around {:.4}, {:.4}...",
        args.benefit, center.latitude, center.longitude
    );
    println!();

    if args.no_near {
        let home = orchestrator.locate_home().await?;
        println!("Home region: {} ({})", home.display_name(), home.code());
        println!();
    } else {
        match orchestrator.run_discovery().await? {
            DiscoveryOutcome::Completed { home, near } => {
                output::print_region_summary(home, &near);
            }
            DiscoveryOutcome::Throttled => {
                println!("Region discovery was throttled; retrying in {cooldown_secs}s...");
                match orchestrator.retry_discovery().await? {
                    DiscoveryOutcome::Completed { home, near } => {
                        output::print_region_summary(home, &near);
                    }
                    DiscoveryOutcome::Throttled => return Err(CliError::DiscoveryThrottled),
                }
            }
        }
    }

    let mut outcome = orchestrator.search(&args.benefit, args.children).await?;
    if outcome == SearchOutcome::Throttled {
        println!("Queue service is throttling; resuming the interrupted fetch...");
        outcome = orchestrator.retry_search().await?;
    }
    if outcome == SearchOutcome::Throttled {
        return Err(CliError::Fetch(kolejka::api::FetchError::Throttled));
    }

    let status = orchestrator.status();
    let home_heading = match status.home_region {
        Some(home) => format!("Queues in {} ({})", home.display_name(), home.code()),
        None => "Queues in home region".to_string(),
    };
    output::print_region_table(&home_heading, &status.home_records, center);
    if !args.no_near {
        output::print_region_table("Queues in near regions", &status.near_records, center);
    }

    let total = status.home_records.len() + status.near_records.len();
    println!("{} queue listing(s) for '{}'.", total, args.benefit);

    Ok(())
}
