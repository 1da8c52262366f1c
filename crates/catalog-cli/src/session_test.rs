use catalog_client::RawProduct;
use catalog_store::{CatalogSource, FetchFailure};
use serde_json::json;

use super::*;

/// Serves a fixed catalog, or fails with `message` when it is set.
struct StaticSource {
    records: Vec<serde_json::Value>,
    failure: Option<&'static str>,
}

impl CatalogSource for StaticSource {
    async fn load(&self) -> Result<Vec<RawProduct>, FetchFailure> {
        if let Some(message) = self.failure {
            return Err(FetchFailure::new(message));
        }
        Ok(self
            .records
            .iter()
            .map(|r| serde_json::from_value(r.clone()).unwrap())
            .collect())
    }
}

async fn loaded_store() -> ProductStore<StaticSource> {
    let store = ProductStore::new(StaticSource {
        records: vec![
            json!({"id": 1, "title": "Mug", "description": "Stoneware", "price": 4.5, "category": "kitchen"}),
            json!({"id": 2, "title": "Kettle", "description": "Steel", "price": 25, "category": "kitchen"}),
        ],
        failure: None,
    });
    store.fetch_products().await;
    store
}

fn parse(line: &str) -> SessionCommand {
    SessionLine::try_parse_from(split_words(line).unwrap())
        .expect("expected valid session command")
        .command
}

// -----------------------------------------------------------------------
// split_words
// -----------------------------------------------------------------------

#[test]
fn split_words_plain_whitespace() {
    assert_eq!(split_words("  show   12 ").unwrap(), vec!["show", "12"]);
}

#[test]
fn split_words_keeps_quoted_runs() {
    assert_eq!(
        split_words(r#"create --title "Desk Lamp" --description 'a "bright" one'"#).unwrap(),
        vec!["create", "--title", "Desk Lamp", "--description", r#"a "bright" one"#]
    );
}

#[test]
fn split_words_empty_quotes_make_empty_word() {
    assert_eq!(split_words(r#"edit 3 --category """#).unwrap(), vec!["edit", "3", "--category", ""]);
}

#[test]
fn split_words_backslash_escapes() {
    assert_eq!(split_words(r"a\ b c").unwrap(), vec!["a b", "c"]);
}

#[test]
fn split_words_rejects_unterminated_quote() {
    assert!(split_words(r#"create --title "Lamp"#).is_err());
}

#[test]
fn split_words_blank_line_is_empty() {
    assert!(split_words("   ").unwrap().is_empty());
}

// -----------------------------------------------------------------------
// parsing
// -----------------------------------------------------------------------

#[test]
fn parses_list_with_filters() {
    let cmd = parse("list --search mug --favorites --page 2 --page-size 10");
    assert!(matches!(
        cmd,
        SessionCommand::List(ListArgs {
            search: Some(ref s),
            category: None,
            favorites: true,
            page: 2,
            page_size: Some(10),
        }) if s == "mug"
    ));
}

#[test]
fn rejects_unsupported_page_size() {
    let words = split_words("list --page-size 15").unwrap();
    assert!(SessionLine::try_parse_from(words).is_err());
}

#[test]
fn parses_create_with_decimal_price() {
    let cmd = parse(r#"create --title Lamp --description "Desk lamp" --price 19.99 --category home"#);
    assert_eq!(
        cmd,
        SessionCommand::Create {
            title: "Lamp".to_owned(),
            description: "Desk lamp".to_owned(),
            price: Decimal::new(1999, 2),
            category: "home".to_owned(),
            image: None,
        }
    );
}

#[test]
fn exit_is_alias_for_quit() {
    assert_eq!(parse("exit"), SessionCommand::Quit);
}

// -----------------------------------------------------------------------
// execute
// -----------------------------------------------------------------------

#[tokio::test]
async fn fav_toggles_and_reports() {
    let store = loaded_store().await;
    assert_eq!(execute(&store, parse("fav 1"), 20).await, "#1 added to favorites\n");
    assert_eq!(execute(&store, parse("fav 1"), 20).await, "#1 removed from favorites\n");
}

#[tokio::test]
async fn rm_removes_once() {
    let store = loaded_store().await;
    assert_eq!(execute(&store, parse("rm 2"), 20).await, "#2 removed\n");
    assert_eq!(execute(&store, parse("rm 2"), 20).await, "#2 not found\n");
    assert!(store.snapshot().product(2).is_none());
}

#[tokio::test]
async fn create_validates_then_assigns_next_id() {
    let store = loaded_store().await;

    let rejected = execute(
        &store,
        parse(r#"create --title Lamp --description "Desk lamp" --price 0 --category home"#),
        20,
    )
    .await;
    assert!(rejected.starts_with("error: price must be positive"));

    let created = execute(
        &store,
        parse(r#"create --title Lamp --description "Desk lamp" --price 19.99 --category home"#),
        20,
    )
    .await;
    assert_eq!(created, "created #1001 Lamp\n");
    assert_eq!(store.snapshot().products[0].id, 1001);
}

#[tokio::test]
async fn edit_rejects_blanked_field_and_applies_valid_change() {
    let store = loaded_store().await;

    let rejected = execute(&store, parse(r#"edit 1 --title "  ""#), 20).await;
    assert_eq!(rejected, "error: title is required\n");
    assert_eq!(store.snapshot().product(1).unwrap().title, "Mug");

    let updated = execute(&store, parse(r#"edit 1 --title "Big Mug" --price 6"#), 20).await;
    assert_eq!(updated, "updated #1 Big Mug\n");
    assert_eq!(store.snapshot().product(1).unwrap().price, Decimal::from(6));

    assert_eq!(execute(&store, parse("edit 99 --title X"), 20).await, "#99 not found\n");
}

#[tokio::test]
async fn list_favorites_shows_only_liked() {
    let store = loaded_store().await;
    execute(&store, parse("fav 2"), 20).await;
    let out = execute(&store, parse("list --favorites"), 20).await;
    assert!(out.contains("Kettle"));
    assert!(!out.contains("Mug"));
}

#[tokio::test]
async fn retry_after_failure_renders_error_state() {
    let store = ProductStore::new(StaticSource {
        records: Vec::new(),
        failure: Some("catalog offline"),
    });
    let out = execute(&store, SessionCommand::Retry, 20).await;
    assert!(out.contains("catalog offline"));
    assert!(out.contains("Type `retry` to try again."));
}

#[tokio::test]
async fn retry_when_loaded_reports_status() {
    let store = loaded_store().await;
    assert_eq!(
        execute(&store, SessionCommand::Retry, 20).await,
        "status: ready, 2 products\n"
    );
}
