mod render;
mod session;

use std::sync::Arc;

use catalog_client::{CatalogClient, ClientSettings};
use catalog_core::query::PAGE_SIZE_OPTIONS;
use catalog_core::{AppConfig, CatalogQuery, FilterMode};
use catalog_store::{FetchStatus, ProductStore};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "catalog-cli")]
#[command(about = "Browse and curate a product catalog")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List one page of products (the default when no command is given)
    List(ListArgs),
    /// Show a single product
    Show {
        /// Product id
        id: u64,
    },
    /// List the distinct product categories
    Categories,
    /// Read commands from stdin against one in-memory store
    Session,
}

/// Filters shared by the `list` command and the session `list` command.
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub(crate) struct ListArgs {
    /// Case-insensitive text to look for in title and description
    #[arg(long)]
    pub search: Option<String>,
    /// Only show this exact category
    #[arg(long)]
    pub category: Option<String>,
    /// Only show favorites
    #[arg(long)]
    pub favorites: bool,
    /// 1-based page number
    #[arg(long, default_value_t = 1)]
    pub page: usize,
    /// Cards per page (10, 20, 30 or 40)
    #[arg(long, value_parser = parse_page_size)]
    pub page_size: Option<usize>,
}

impl ListArgs {
    pub(crate) fn to_query(&self, default_page_size: usize) -> CatalogQuery {
        CatalogQuery {
            mode: if self.favorites {
                FilterMode::Favorites
            } else {
                FilterMode::All
            },
            search: self.search.clone().unwrap_or_default(),
            category: self.category.clone(),
            page: self.page,
            page_size: self.page_size.unwrap_or(default_page_size),
        }
    }
}

impl Default for ListArgs {
    fn default() -> Self {
        Self {
            search: None,
            category: None,
            favorites: false,
            page: 1,
            page_size: None,
        }
    }
}

pub(crate) fn parse_page_size(value: &str) -> Result<usize, String> {
    let size: usize = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    if PAGE_SIZE_OPTIONS.contains(&size) {
        Ok(size)
    } else {
        Err(format!("page size must be one of {PAGE_SIZE_OPTIONS:?}"))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = catalog_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let client = CatalogClient::new(&ClientSettings::from_app_config(&config))
        .map_err(|e| anyhow::anyhow!("failed to build catalog client: {e}"))?;
    let store = Arc::new(ProductStore::new(client));

    match cli.command {
        Some(Commands::List(args)) => run_list(&store, &config, &args).await?,
        None => run_list(&store, &config, &ListArgs::default()).await?,
        Some(Commands::Show { id }) => run_show(&store, id).await?,
        Some(Commands::Categories) => run_categories(&store).await?,
        Some(Commands::Session) => session::run(store, &config).await?,
    }

    Ok(())
}

/// Fetches the catalog for a one-shot command, failing the process when the
/// fetch did not succeed.
async fn load(store: &ProductStore<CatalogClient>) -> anyhow::Result<catalog_store::StoreState> {
    store.fetch_products().await;
    let state = store.snapshot();
    if state.status == FetchStatus::Error {
        anyhow::bail!(
            "{}",
            state
                .error
                .as_deref()
                .unwrap_or(catalog_store::FetchFailure::GENERIC_MESSAGE)
        );
    }
    Ok(state)
}

async fn run_list(
    store: &ProductStore<CatalogClient>,
    config: &AppConfig,
    args: &ListArgs,
) -> anyhow::Result<()> {
    let state = load(store).await?;
    print!("{}", render::list_view(&state, &args.to_query(config.page_size)));
    Ok(())
}

async fn run_show(store: &ProductStore<CatalogClient>, id: u64) -> anyhow::Result<()> {
    let state = load(store).await?;
    print!("{}", render::detail_view(&state, id));
    Ok(())
}

async fn run_categories(store: &ProductStore<CatalogClient>) -> anyhow::Result<()> {
    let state = load(store).await?;
    print!("{}", render::categories_view(&state));
    Ok(())
}
