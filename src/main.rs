mod catalog;
mod error;
mod filter;
mod loader;
mod models;
mod normalizer;
mod render;
mod routes;
mod state;
mod theme;

use anyhow::{Context, Result};
use axum::http::{header, Method};
use clap::{Args as ClapArgs, Parser, Subcommand};
use filter::TypeFilter;
use loader::{CatalogLoader, CatalogSource, DEFAULT_TIMEOUT};
use models::Addon;
use state::{AppState, UiConfig, DEFAULT_IMAGE_PLACEHOLDER};
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Addon Store catalog server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Catalog location: http(s) URL or local JSON file
    #[arg(long, env = "CATALOG_URL", default_value = "addons.json", global = true)]
    catalog: CatalogSource,

    /// Timeout for fetching the catalog, in seconds
    #[arg(long, env = "FETCH_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT.as_secs(), global = true)]
    fetch_timeout_secs: u64,

    #[command(flatten)]
    serve: ServeArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the catalog once and print the matching addons
    List(ListArgs),
}

#[derive(ClapArgs, Debug)]
struct ServeArgs {
    /// Server listen address
    #[arg(long, env = "LISTEN_URL", default_value = "0.0.0.0")]
    listen_url: String,

    /// Server listen port
    #[arg(long, env = "LISTEN_PORT", default_value = "8080")]
    listen_port: u16,

    /// Address shown to buyers of paid addons
    #[arg(long, env = "CONTACT_EMAIL", default_value = "you@example.com")]
    contact_email: String,

    /// Image used for addons without a usable icon
    #[arg(long, env = "IMAGE_PLACEHOLDER", default_value = DEFAULT_IMAGE_PLACEHOLDER)]
    image_placeholder: String,

    /// Delay before the search box submits while typing, in milliseconds
    #[arg(long, env = "SEARCH_DEBOUNCE_MS", default_value = "300")]
    debounce_ms: u64,
}

#[derive(ClapArgs, Debug)]
struct ListArgs {
    /// Text to search for in names and descriptions
    #[arg(short, long, default_value = "")]
    query: String,

    /// Addon type: all, free or paid
    #[arg(short = 't', long = "type", default_value = "all")]
    addon_type: TypeFilter,

    /// Print the matching addons as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore errors if file doesn't exist)
    let _ = dotenvy::dotenv();

    // Logs go to stderr so `list` output stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "addon_store=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Parse CLI arguments (with environment variable fallbacks)
    let args = Args::parse();

    let loader = CatalogLoader::new(Duration::from_secs(args.fetch_timeout_secs))?;

    match args.command {
        Some(Command::List(list)) => list_addons(&loader, &args.catalog, list).await,
        None => serve(loader, args.catalog, args.serve).await,
    }
}

async fn list_addons(loader: &CatalogLoader, source: &CatalogSource, args: ListArgs) -> Result<()> {
    let addons = loader
        .load(source)
        .await
        .with_context(|| format!("Failed to load catalog from {}", source))?;

    let matches = filter::filter(&addons, &args.query, args.addon_type);
    println!("{}", render_list(&matches, args.json)?);

    Ok(())
}

/// Output of the `list` command: pretty JSON, or one line per addon
fn render_list(matches: &[&Addon], json: bool) -> Result<String> {
    if json {
        return serde_json::to_string_pretty(matches).context("Failed to serialize addons");
    }

    if matches.is_empty() {
        return Ok(render::EMPTY_STATE_MESSAGE.to_string());
    }

    let lines: Vec<String> = matches.iter().map(|addon| list_line(addon)).collect();
    Ok(lines.join("\n"))
}

fn list_line(addon: &Addon) -> String {
    let target = if addon.is_paid() {
        "contact to purchase"
    } else {
        addon.file.as_str()
    };

    format!(
        "[{}] {} v{} by {}: {} ({})",
        addon.addon_type.label(),
        addon.name,
        addon.version,
        addon.author,
        addon.description,
        target
    )
}

async fn serve(loader: CatalogLoader, source: CatalogSource, args: ServeArgs) -> Result<()> {
    tracing::info!("Starting Addon Store");
    tracing::info!("Configuration:");
    tracing::info!("  Listen URL: {}", args.listen_url);
    tracing::info!("  Listen Port: {}", args.listen_port);
    tracing::info!("  Catalog: {}", source);
    tracing::info!("  Contact email: {}", args.contact_email);
    tracing::info!("  Search debounce: {} ms", args.debounce_ms);

    let ui = UiConfig {
        contact_email: args.contact_email,
        image_placeholder: args.image_placeholder,
        debounce_ms: args.debounce_ms,
    };
    let state = AppState::new(loader, source, ui);

    // Initial load runs in the background; the grid shows placeholders meanwhile
    let initial = state.clone();
    tokio::spawn(async move {
        let _ = initial.reload().await;
    });

    // Let other pages consume the JSON API
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let app = routes::router(state)
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http());

    // Bind to address
    let addr = format!("{}:{}", args.listen_url, args.listen_port);
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    tracing::info!("Server started successfully");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::io::Write;

    fn catalog() -> Vec<Addon> {
        normalizer::normalize(json!([
            {
                "name": "Foo Blaster",
                "description": "Blasts foo",
                "version": "2.0",
                "author": "Jane",
                "file": "files/foo.zip",
            },
            { "name": "Bar Tool", "type": "paid", "description": "Tools for bars" },
        ]))
        .unwrap()
    }

    fn list_args(query: &str, json: bool) -> ListArgs {
        ListArgs {
            query: query.to_string(),
            addon_type: TypeFilter::All,
            json,
        }
    }

    #[test]
    fn test_free_addon_line_points_at_file() {
        let addons = catalog();
        assert_eq!(
            list_line(&addons[0]),
            "[FREE] Foo Blaster v2.0 by Jane: Blasts foo (files/foo.zip)"
        );
    }

    #[test]
    fn test_paid_addon_line_asks_for_contact() {
        let addons = catalog();
        assert_eq!(
            list_line(&addons[1]),
            "[PAID] Bar Tool v1.0 by Unknown: Tools for bars (contact to purchase)"
        );
    }

    #[test]
    fn test_list_prints_one_line_per_match() {
        let addons = catalog();
        let matches: Vec<&Addon> = addons.iter().collect();
        let output = render_list(&matches, false).unwrap();

        assert_eq!(output.lines().count(), 2);
        assert!(output.starts_with("[FREE] Foo Blaster"));
    }

    #[test]
    fn test_empty_result_prints_empty_state() {
        let addons = catalog();
        let matches = filter::filter(&addons, "nothing matches", TypeFilter::All);
        assert_eq!(render_list(&matches, false).unwrap(), render::EMPTY_STATE_MESSAGE);
    }

    #[test]
    fn test_json_output_is_reloadable_catalog() {
        let addons = catalog();
        let matches = filter::filter(&addons, "", "paid".parse().unwrap());
        let output = render_list(&matches, true).unwrap();

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[0]["name"], "Bar Tool");
        assert_eq!(value[0]["type"], "paid");
        assert_eq!(normalizer::normalize(value).unwrap(), vec![addons[1].clone()]);

        assert_eq!(render_list(&[], true).unwrap(), "[]");
    }

    #[tokio::test]
    async fn test_list_succeeds_for_local_catalog() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"[{"name": "Foo Blaster"}]"#).unwrap();

        let loader = CatalogLoader::new(Duration::from_secs(1)).unwrap();
        let source = CatalogSource::Local(file.path().to_path_buf());
        list_addons(&loader, &source, list_args("foo", false)).await.unwrap();
    }

    #[tokio::test]
    async fn test_list_fails_when_catalog_cannot_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();

        let loader = CatalogLoader::new(Duration::from_secs(1)).unwrap();
        let source = CatalogSource::Local(file.path().to_path_buf());
        let err = list_addons(&loader, &source, list_args("", true))
            .await
            .unwrap_err();

        assert!(err.to_string().starts_with("Failed to load catalog from"));
        assert!(err.root_cause().to_string().contains("key must be a string"));
    }
}
