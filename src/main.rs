use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use marketplace::backend::{DirStorage, ListingRepository, MemoryRepository};
use marketplace::filters::{self, FilterStore, MemoryHistory, Navigator, PriceRange, SortKey};
use marketplace::{post_listing, Config, NewListing, Photo};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "marketplace", about = "Browse and post classified listings")]
struct Cli {
    /// TOML config file
    #[arg(long, global = true, default_value = "marketplace.toml")]
    config: PathBuf,

    /// Listings snapshot (overrides `data_file` from the config)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the listings matching a filter query string
    Browse {
        /// Query string, e.g. "search=lamp&sortBy=price-low"
        #[arg(long, default_value = "")]
        query: String,
    },
    /// Print one listing in full
    Show {
        /// Listing id
        id: String,
    },
    /// Post a new listing
    Post {
        #[arg(long)]
        title: String,
        #[arg(long)]
        price: f64,
        #[arg(long)]
        category: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        location: Option<String>,
        /// Image file to attach
        #[arg(long)]
        photo: Option<PathBuf>,
    },
    /// Print the canonical browse URL for a set of filters
    Href {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value_t = 0)]
        min: i64,
        #[arg(long, default_value_t = 2000)]
        max: i64,
        /// Category slug; repeat for several
        #[arg(long = "category")]
        categories: Vec<String>,
        #[arg(long, default_value = "recent")]
        sort: SortKey,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load_from(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;
    if let Some(data) = cli.data {
        config.data_file = data;
    }

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Command::Browse { query } => browse(&config, &query).await,
        Command::Show { id } => show(&config, &id).await,
        Command::Post {
            title,
            price,
            category,
            email,
            description,
            location,
            photo,
        } => {
            let listing = NewListing {
                title,
                description,
                price,
                category,
                seller_email: email,
                location,
            };
            post(&config, listing, photo).await
        }
        Command::Href {
            search,
            min,
            max,
            categories,
            sort,
        } => href(&config, search, PriceRange::new(min, max), categories, sort).await,
    }
}

async fn browse(config: &Config, query: &str) -> Result<()> {
    let repo = MemoryRepository::load(&config.data_file, &config.default_location)
        .await
        .context("Failed to load listings")?;
    let listings = repo.select_all().await?;
    let state = filters::decode(query);
    info!("Browsing {} listings with {}", listings.len(), filters::href(&state));

    let visible = filters::project(&listings, &state);
    if visible.is_empty() {
        println!("No listings found matching your criteria.");
        println!("Try adjusting your filters or search terms.");
        return Ok(());
    }

    println!("{}\n", filters::summary(visible.len()));
    let now = Utc::now();
    for (i, listing) in visible.iter().enumerate() {
        println!("{}. {} (${:.2})", i + 1, listing.title, listing.price);
        println!("   {} · {}", listing.category, listing.location);
        println!("   Posted {}", listing.age(now));
        println!("   Contact: {}", listing.seller_email);
        if let Some(url) = &listing.image_url {
            println!("   Photo: {}", url);
        }
        println!("   ID: {}", listing.id);
        println!();
    }

    Ok(())
}

async fn show(config: &Config, id: &str) -> Result<()> {
    let repo = MemoryRepository::load(&config.data_file, &config.default_location)
        .await
        .context("Failed to load listings")?;
    let listing = match id.trim().parse::<i64>() {
        Ok(id) => repo.select_one(id).await?,
        Err(_) => None,
    };
    let Some(listing) = listing else {
        println!("Listing not found");
        println!("The listing you're looking for doesn't exist or has been removed.");
        return Ok(());
    };

    println!("{}", listing.title);
    println!("${:.2} · {}", listing.price, listing.category);
    println!("Listed {} in {}", listing.age(Utc::now()), listing.location);
    if let Some(url) = &listing.image_url {
        println!("Photo: {}", url);
    }
    println!();
    if listing.description.is_empty() {
        println!("No description provided.");
    } else {
        println!("{}", listing.description);
    }
    println!();
    println!("Seller: {}", listing.seller_email);
    Ok(())
}

async fn post(config: &Config, listing: NewListing, photo: Option<PathBuf>) -> Result<()> {
    let repo = MemoryRepository::load(&config.data_file, &config.default_location)
        .await
        .context("Failed to load listings")?;
    let storage = DirStorage::new(&config.storage_dir, &config.bucket, &config.public_base_url);

    let photo = match photo {
        Some(path) => {
            let bytes = tokio::fs::read(&path)
                .await
                .with_context(|| format!("Failed to read photo {}", path.display()))?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            Some(Photo { file_name, bytes })
        }
        None => None,
    };

    let id = post_listing(&repo, &storage, listing, photo)
        .await
        .context("Failed to post listing")?;
    repo.save(&config.data_file)
        .await
        .context("Failed to save listings")?;

    println!("✅ Posted listing {}", id);
    Ok(())
}

async fn href(
    config: &Config,
    search: String,
    range: PriceRange,
    categories: Vec<String>,
    sort: SortKey,
) -> Result<()> {
    let mut store = FilterStore::new(MemoryHistory::default(), config.debounce());
    store.set_search(search);
    for category in &categories {
        store.toggle_category(category, true);
    }
    store.set_sort_by(sort);
    if range != PriceRange::default() {
        store.set_price_range(range.min() as i64, range.max() as i64);
        store.next_price_commit().await;
    }

    println!("{}", store.navigator().location());
    Ok(())
}
