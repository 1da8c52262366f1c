//! Line-oriented interactive session.
//!
//! One store lives for the whole session, so favorites and local edits made
//! here survive between commands. The initial fetch runs in the background;
//! commands issued while it is in flight see the loading state.

use std::io::Write as _;
use std::sync::Arc;

use catalog_client::CatalogClient;
use catalog_core::{validate_draft, AppConfig, ProductDraft, ProductUpdate};
use catalog_store::{CatalogSource, FetchStatus, ProductStore};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{render, ListArgs};

/// One line of session input.
#[derive(Debug, Parser)]
#[command(no_binary_name = true)]
pub(crate) struct SessionLine {
    #[command(subcommand)]
    pub command: SessionCommand,
}

#[derive(Debug, PartialEq, Eq, Subcommand)]
pub(crate) enum SessionCommand {
    /// List one page of products
    List(ListArgs),
    /// Show a single product
    Show { id: u64 },
    /// Toggle a product in the favorites
    Fav { id: u64 },
    /// Remove a product for the rest of the session
    Rm { id: u64 },
    /// Create a local product
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        price: Decimal,
        #[arg(long)]
        category: String,
        /// Image URL; a placeholder is used when omitted
        #[arg(long)]
        image: Option<String>,
    },
    /// Edit fields of an existing product
    Edit {
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        price: Option<Decimal>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        image: Option<String>,
    },
    /// Fetch the catalog again after a failure
    Retry,
    /// List the distinct product categories
    Categories,
    /// Show store counters
    Stats,
    /// End the session
    #[command(alias = "exit")]
    Quit,
}

/// Runs the session until `quit` or end of input.
///
/// # Errors
///
/// Returns an error if stdin or stdout fails, or if the configured drafts
/// file cannot be loaded.
pub(crate) async fn run(
    store: Arc<ProductStore<CatalogClient>>,
    config: &AppConfig,
) -> anyhow::Result<()> {
    let drafts = match &config.drafts_path {
        Some(path) => catalog_core::load_drafts(path)?.drafts,
        None => Vec::new(),
    };

    tokio::spawn({
        let store = Arc::clone(&store);
        async move { store.fetch_products().await }
    });

    // Creating before the catalog arrives would suppress the fetch, so seed
    // drafts only once the store is ready.
    if !drafts.is_empty() {
        let store = Arc::clone(&store);
        let mut rx = store.subscribe();
        tokio::spawn(async move {
            let ready = rx.wait_for(|s| s.status == FetchStatus::Ready).await.is_ok();
            if ready {
                let count = drafts
                    .into_iter()
                    .filter_map(|draft| store.create_product(draft))
                    .count();
                tracing::info!(count, "seed drafts created");
            }
        });
    }

    println!("catalog session; type `help` for commands");
    let page_size = config.page_size;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let words = match split_words(&line) {
            Ok(words) if words.is_empty() => continue,
            Ok(words) => words,
            Err(e) => {
                println!("error: {e}");
                continue;
            }
        };

        let command = match SessionLine::try_parse_from(words) {
            Ok(parsed) => parsed.command,
            Err(e) => {
                print!("{e}");
                continue;
            }
        };

        if matches!(command, SessionCommand::Quit) {
            break;
        }
        print!("{}", execute(&store, command, page_size).await);
    }

    Ok(())
}

/// Applies one command to the store and returns what to print.
pub(crate) async fn execute<S: CatalogSource>(
    store: &ProductStore<S>,
    command: SessionCommand,
    page_size: usize,
) -> String {
    match command {
        SessionCommand::List(args) => {
            render::list_view(&store.snapshot(), &args.to_query(page_size))
        }
        SessionCommand::Show { id } => render::detail_view(&store.snapshot(), id),
        SessionCommand::Fav { id } => {
            store.toggle_favorite(id);
            let liked = store.snapshot().is_favorite(id);
            if liked {
                format!("#{id} added to favorites\n")
            } else {
                format!("#{id} removed from favorites\n")
            }
        }
        SessionCommand::Rm { id } => {
            let existed = store.snapshot().product(id).is_some();
            store.remove_product(id);
            if existed {
                format!("#{id} removed\n")
            } else {
                format!("#{id} not found\n")
            }
        }
        SessionCommand::Create {
            title,
            description,
            price,
            category,
            image,
        } => {
            let draft = ProductDraft {
                title,
                description,
                category,
                price,
                image_url: image,
            };
            if let Err(e) = validate_draft(&draft) {
                return format!("error: {e}\n");
            }
            match store.create_product(draft) {
                Some(product) => format!("created #{} {}\n", product.id, product.title),
                None => "error: no product ids left\n".to_owned(),
            }
        }
        SessionCommand::Edit {
            id,
            title,
            description,
            price,
            category,
            image,
        } => {
            let Some(current) = store.snapshot().product(id).cloned() else {
                return format!("#{id} not found\n");
            };
            let update = ProductUpdate {
                title,
                description,
                price,
                category,
                image_url: image,
            };
            // The edited product must still pass the creation rules.
            let merged = ProductDraft {
                title: update.title.clone().unwrap_or(current.title),
                description: update.description.clone().unwrap_or(current.description),
                category: update.category.clone().unwrap_or(current.category),
                price: update.price.unwrap_or(current.price),
                image_url: None,
            };
            if let Err(e) = validate_draft(&merged) {
                return format!("error: {e}\n");
            }
            match store.update_product(id, update) {
                Some(product) => format!("updated #{} {}\n", product.id, product.title),
                None => format!("#{id} not found\n"),
            }
        }
        SessionCommand::Retry => {
            store.fetch_products().await;
            let state = store.snapshot();
            match state.status {
                FetchStatus::Error => {
                    render::list_view(&state, &ListArgs::default().to_query(page_size))
                }
                status => format!("status: {status}, {} products\n", state.products.len()),
            }
        }
        SessionCommand::Categories => render::categories_view(&store.snapshot()),
        SessionCommand::Stats => render::stats_view(&store.snapshot()),
        SessionCommand::Quit => String::new(),
    }
}

/// Splits a line on whitespace, keeping quoted runs together.
///
/// Single and double quotes both group; a backslash escapes the next
/// character outside single quotes.
pub(crate) fn split_words(line: &str) -> anyhow::Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some('\''), c) => current.push(c),
            (_, '\\') => {
                let escaped = chars
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("trailing backslash"))?;
                current.push(escaped);
                in_word = true;
            }
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if let Some(q) = quote {
        anyhow::bail!("unterminated {q} quote");
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
