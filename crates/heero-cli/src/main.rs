use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod context;
mod inspect;
mod watch;

#[derive(Debug, Parser)]
#[command(name = "heero-cli")]
#[command(about = "HEERO service-location map tools")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Load every configured source once and summarize the result
    Load {
        /// Print the merged records as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Serve cached locations and keep them fresh until interrupted
    Watch,
    /// Show which markers survive de-overlap for a viewport
    Place {
        /// Viewport center latitude
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        /// Viewport center longitude
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        /// Zoom level
        #[arg(long)]
        zoom: f64,
        /// Canvas width in pixels
        #[arg(long, default_value = "1024")]
        width: f64,
        /// Canvas height in pixels
        #[arg(long, default_value = "768")]
        height: f64,
        /// Group nearby points into clusters instead of de-overlapping
        #[arg(long)]
        cluster: bool,
        /// Only keep locations whose city, company or address contains this
        #[arg(long)]
        search: Option<String>,
    },
    /// Assign colors to discovered categories and print the color map
    Colors,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = heero_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Some(Commands::Load { json }) => inspect::run_load(&config, json).await?,
        Some(Commands::Watch) => watch::run_watch(&config).await?,
        Some(Commands::Place {
            lat,
            lng,
            zoom,
            width,
            height,
            cluster,
            search,
        }) => {
            let args = inspect::PlaceArgs {
                center: heero_core::LngLat::new(lng, lat),
                zoom,
                width,
                height,
                cluster,
                search,
            };
            inspect::run_place(&config, &args).await?;
        }
        Some(Commands::Colors) => inspect::run_colors(&config).await?,
        None => println!("heero-cli: run with --help to list commands"),
    }

    Ok(())
}
