pub mod client;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::BookmarkId;
use client::ApiClient;

#[derive(Parser)]
#[command(name = "bookmarks")]
#[command(about = "Command-line client for the Bookmarks API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, env = "BOOKMARKS_API_URL", default_value = "http://localhost:8000", help = "Base URL of the API server")]
    pub api_url: String,

    #[arg(long, global = true, env = "API_TOKEN", hide_env_values = true, default_value = "", help = "Bearer token")]
    pub token: String,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "List all bookmarks")]
    List,

    #[command(about = "Show a single bookmark")]
    Get {
        #[arg(help = "Bookmark ID")]
        id: BookmarkId,
    },

    #[command(about = "Create a bookmark")]
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        url: String,
        #[arg(long, help = "Rating from 0 to 5")]
        rating: i64,
        #[arg(long)]
        description: Option<String>,
    },

    #[command(about = "Change some fields of a bookmark")]
    Update {
        #[arg(help = "Bookmark ID")]
        id: BookmarkId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long, help = "Rating from 0 to 5")]
        rating: Option<i64>,
        #[arg(long)]
        description: Option<String>,
    },

    #[command(about = "Delete a bookmark")]
    Delete {
        #[arg(help = "Bookmark ID")]
        id: BookmarkId,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Build a JSON body holding only the fields that were given
fn body_from_fields(
    title: Option<String>,
    url: Option<String>,
    rating: Option<i64>,
    description: Option<String>,
) -> Value {
    let mut body = Map::new();
    if let Some(title) = title {
        body.insert("title".to_string(), Value::from(title));
    }
    if let Some(url) = url {
        body.insert("url".to_string(), Value::from(url));
    }
    if let Some(rating) = rating {
        body.insert("rating".to_string(), Value::from(rating));
    }
    if let Some(description) = description {
        body.insert("description".to_string(), Value::from(description));
    }
    Value::Object(body)
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let client = ApiClient::new(&cli.api_url, &cli.token);

    match cli.command {
        Commands::List => {
            let bookmarks = client.list().await?;
            utils::output_bookmarks(&output_format, &bookmarks)
        }
        Commands::Get { id } => {
            let bookmark = client.get(id).await?;
            utils::output_bookmark(&output_format, &bookmark)
        }
        Commands::Add { title, url, rating, description } => {
            let body = body_from_fields(Some(title), Some(url), Some(rating), description);
            let bookmark = client.create(&body).await?;
            utils::output_success(
                &output_format,
                &format!("Created bookmark {}", bookmark.id),
                Some(serde_json::to_value(&bookmark)?),
            )
        }
        Commands::Update { id, title, url, rating, description } => {
            let body = body_from_fields(title, url, rating, description);
            client.update(id, &body).await?;
            utils::output_success(&output_format, &format!("Updated bookmark {}", id), None)
        }
        Commands::Delete { id } => {
            client.delete(id).await?;
            utils::output_success(&output_format, &format!("Deleted bookmark {}", id), None)
        }
    }
}
