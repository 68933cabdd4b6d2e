use clap::{Parser, Subcommand};
use nearby::daemon::{self, DaemonCommand};
use nearby::location::LocationSource;
use nearby::places::{ApiKey, Category, NearbyQuery, PlacesClient};

#[derive(Parser, Debug)]
#[command(name = "nearby", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Print the places around a location.
    Search {
        /// Places API key
        #[arg(short = 'k', long, env = "NEARBY_API_KEY")]
        key: String,

        /// Latitude (defaults to the IP-derived location)
        #[arg(long, requires = "lng", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lng: Option<f64>,

        /// Search radius in meters
        #[arg(short = 'r', long, default_value_t = nearby::places::DEFAULT_RADIUS_METERS)]
        radius: u32,

        /// Place type filter (restaurant, cafe, bar, ...)
        #[arg(short = 'c', long, default_value_t = Category::Restaurant)]
        category: Category,
    },
    /// Show the wheel.
    Show,
    /// Hide the wheel.
    Hide,
    /// Start spinning the wheel.
    Spin,
    /// Reload nearby places into the wheel.
    Refresh,
    /// Add an option to the wheel.
    Add {
        #[arg(required = true, num_args = 1..)]
        label: Vec<String>,
    },
    /// Remove the option at the given position.
    Remove { index: usize },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let command = match cli.command {
        Commands::Search {
            key,
            lat,
            lng,
            radius,
            category,
        } => {
            let source = match lat.zip(lng) {
                Some((lat, lng)) => LocationSource::Fixed { lat, lng },
                None => LocationSource::default(),
            };
            return search(ApiKey::new(key), source, radius, category).await;
        }
        Commands::Show => DaemonCommand::Show,
        Commands::Hide => DaemonCommand::Hide,
        Commands::Spin => DaemonCommand::Spin,
        Commands::Refresh => DaemonCommand::Refresh,
        Commands::Add { label } => DaemonCommand::Add(label.join(" ")),
        Commands::Remove { index } => DaemonCommand::Remove(index),
    };

    daemon::send(&command)?;
    Ok(())
}

async fn search(
    key: ApiKey,
    source: LocationSource,
    radius: u32,
    category: Category,
) -> anyhow::Result<()> {
    let client = PlacesClient::new(key)?;
    let location = source.resolve(client.http()).await?;

    let query = NearbyQuery {
        location,
        radius,
        category,
    };
    let places = client.nearby_search(&query).await?;

    if places.is_empty() {
        anyhow::bail!("No {} found within {}m of {}", category, radius, location);
    }

    for place in places {
        println!("{}", place.name);
    }
    Ok(())
}
