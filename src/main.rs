use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use viestay::api::ApiClient;
use viestay::auth::SessionStore;
use viestay::filters::{
    select_bucket, select_custom_range, select_enum, EnumAxis, RangeAxis, RangeBucket,
};
use viestay::listing::SortMode;
use viestay::models::SearchResultItem;
use viestay::query::{History, ParamDelta, QueryState, PAGE_KEY};
use viestay::render::CardView;
use viestay::saved::SavedItems;
use viestay::search::{FetchState, SearchController};
use viestay::storage::{FileStore, KeyValueStore};
use viestay::{ApiError, Config};

/// VieStay - find rooms and apartments for rent in Vietnam
#[derive(Parser, Debug)]
#[command(name = "viestay")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Backend base URL
    #[arg(long, global = true, env = "VIESTAY_API_BASE_URL")]
    api: Option<String>,

    /// Local storage file for saved posts and session
    #[arg(long, global = true, env = "VIESTAY_STORAGE")]
    storage: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search listings
    Search(SearchArgs),
    /// Show one listing post
    Post { id: String },
    /// Show one bookable room
    Room { id: String },
    /// Bookmark a post
    Save { id: String },
    /// Remove a bookmark
    Unsave { id: String },
    /// List bookmarks
    Saved {
        /// Drop bookmarks of posts the server no longer has
        #[arg(long)]
        prune: bool,
    },
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Start from an existing search query string, e.g. "district=Cầu Giấy&minRent=0"
    #[arg(long)]
    query: Option<String>,

    /// Property type code (ROOM, APARTMENT, MINI_APARTMENT, HOUSE, DORMITORY)
    #[arg(long)]
    category: Option<String>,

    #[arg(long)]
    district: Option<String>,

    /// Predefined price bucket, 1-based
    #[arg(long, conflicts_with = "price_range")]
    price_bucket: Option<usize>,

    /// Custom price range as two slider percentages
    #[arg(long, num_args = 2, value_names = ["FROM", "TO"])]
    price_range: Option<Vec<f64>>,

    /// Predefined area bucket, 1-based
    #[arg(long, conflicts_with = "area_range")]
    area_bucket: Option<usize>,

    /// Custom area range as two slider percentages
    #[arg(long, num_args = 2, value_names = ["FROM", "TO"])]
    area_range: Option<Vec<f64>>,

    /// Feature flag code, e.g. hasWifi
    #[arg(long)]
    feature: Option<String>,

    /// Secondary ordering: default, newest, price, area
    #[arg(long, default_value = "default")]
    sort: SortMode,

    #[arg(long)]
    page: Option<u32>,
}

fn bucket(axis: RangeAxis, index: usize) -> Result<&'static RangeBucket> {
    let buckets = axis.buckets();
    index
        .checked_sub(1)
        .and_then(|i| buckets.get(i))
        .with_context(|| format!("Bucket must be between 1 and {}", buckets.len()))
}

fn print_items(items: &[SearchResultItem], json: bool) -> Result<()> {
    let cards: Vec<CardView> = items.iter().map(CardView::from).collect();
    if json {
        println!("{}", serde_json::to_string_pretty(&cards)?);
        return Ok(());
    }
    for (i, card) in cards.iter().enumerate() {
        let saved = if card.is_saved { " ★" } else { "" };
        match card.badge {
            Some(badge) => println!("{}. [{}] {}{}", i + 1, badge, card.title, saved),
            None => println!("{}. {}{}", i + 1, card.title, saved),
        }
        println!("   {} · {}", card.price, card.area);
        if !card.address.is_empty() {
            println!("   {}", card.address);
        }
        println!("   → {}", card.route);
        println!();
    }
    Ok(())
}

async fn run_search(
    args: SearchArgs,
    config: &Config,
    client: ApiClient,
    saved: &SavedItems,
    json: bool,
) -> Result<()> {
    let state = QueryState::new(History::new());
    if let Some(query) = &args.query {
        state.load_location(&format!("/search?{query}"));
    }

    // Each widget interaction starts from the params left by the previous one
    if let Some(code) = &args.category {
        state.apply_params(&select_enum(&state.params(), EnumAxis::Category, code));
    }
    if let Some(district) = &args.district {
        state.apply_params(&select_enum(&state.params(), EnumAxis::District, district));
    }
    if let Some(index) = args.price_bucket {
        let bucket = bucket(RangeAxis::Price, index)?;
        state.apply_params(&select_bucket(&state.params(), RangeAxis::Price, bucket));
    }
    if let Some(range) = &args.price_range {
        state.apply_params(&select_custom_range(RangeAxis::Price, range[0], range[1]));
    }
    if let Some(index) = args.area_bucket {
        let bucket = bucket(RangeAxis::Area, index)?;
        state.apply_params(&select_bucket(&state.params(), RangeAxis::Area, bucket));
    }
    if let Some(range) = &args.area_range {
        state.apply_params(&select_custom_range(RangeAxis::Area, range[0], range[1]));
    }
    if let Some(code) = &args.feature {
        state.apply_params(&select_enum(&state.params(), EnumAxis::Feature, code));
    }
    if let Some(page) = args.page {
        state.apply_params(&ParamDelta::new().set(PAGE_KEY, page));
    }

    for (axis, selection) in state.filters().iter() {
        info!("Filter {:?}: {}", axis, selection.display);
    }
    info!("🔎 {}", viestay::query::search_location(&state.params()));

    let controller = SearchController::new(client, config.request_timeout, config.results_per_page);
    controller.set_sort(args.sort);
    controller.on_query_change(&state.params()).await;

    match controller.state() {
        FetchState::Ready(batch) => {
            let mut items = controller.visible_items();
            saved.mark_saved(&mut items)?;
            let pagination = controller.pagination();
            info!(
                "✅ {} results, page {}/{}",
                batch.total,
                pagination.current_page(),
                pagination.total_pages()
            );
            print_items(&items, json)
        }
        FetchState::Empty => {
            println!("Không tìm thấy kết quả phù hợp.");
            Ok(())
        }
        FetchState::Failed { message, retryable } => {
            if retryable {
                bail!("{message} (try again)");
            }
            bail!("{message}")
        }
        FetchState::Idle | FetchState::Loading => bail!("Search did not complete"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(api) = cli.api {
        config.api_base_url = api.trim_end_matches('/').to_string();
    }
    if let Some(storage) = cli.storage {
        config.storage_path = storage;
    }

    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(&config.storage_path));
    let session = Arc::new(SessionStore::new(Arc::clone(&store)));
    let saved = SavedItems::new(store);
    let client = ApiClient::new(&config, session).context("Failed to create API client")?;

    match cli.command {
        Commands::Search(args) => run_search(args, &config, client, &saved, cli.json).await?,
        Commands::Post { id } => match client.get_post(&id).await {
            Ok(post) => {
                let mut items = vec![SearchResultItem::from(post)];
                saved.mark_saved(&mut items)?;
                print_items(&items, cli.json)?;
            }
            Err(ApiError::NotFound { .. }) => bail!("Tin đăng {id} không tồn tại"),
            Err(e) => return Err(e).context("Failed to fetch post"),
        },
        Commands::Room { id } => match client.get_room(&id).await {
            Ok(room) => print_items(&[SearchResultItem::from(room)], cli.json)?,
            Err(ApiError::NotFound { .. }) => bail!("Phòng {id} không tồn tại"),
            Err(e) => return Err(e).context("Failed to fetch room"),
        },
        Commands::Save { id } => {
            if saved.save(&id)? {
                println!("💾 Đã lưu {id}");
            } else {
                println!("{id} đã được lưu trước đó");
            }
        }
        Commands::Unsave { id } => {
            if saved.unsave(&id)? {
                println!("Đã bỏ lưu {id}");
            } else {
                println!("{id} chưa được lưu");
            }
        }
        Commands::Saved { prune } => {
            if prune {
                let existing: HashSet<String> = client
                    .list_posts()
                    .await
                    .context("Failed to list posts for pruning")?
                    .into_iter()
                    .map(|item| item.id)
                    .collect();
                let dropped = saved.retain_existing(&existing)?;
                if !dropped.is_empty() {
                    warn!("Removed {} saved posts that no longer exist", dropped.len());
                }
            }
            let ids = saved.ids()?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&ids)?);
            } else if ids.is_empty() {
                println!("Chưa có tin nào được lưu.");
            } else {
                for id in ids {
                    println!("{id}");
                }
            }
        }
    }

    Ok(())
}
