use std::sync::Arc;

use clap::Parser;
use cooperval::cli::{
    handle_add_news, handle_add_promotion, handle_delete, handle_get, handle_list,
    handle_update_news, handle_update_promotion, AddEntity, Cli, Commands, UpdateEntity,
};
use cooperval::config::StoreConfig;
use cooperval::store::{ContentStore, HttpStore};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = match StoreConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let store: Arc<dyn ContentStore> = Arc::new(HttpStore::new(config));

    let result = match cli.command {
        Commands::Add(add) => match add.entity {
            AddEntity::News {
                title,
                excerpt,
                content,
                author,
                category,
                published,
                images,
                stdin,
                json,
            } => {
                handle_add_news(
                    store, title, excerpt, content, author, category, published, images, stdin,
                    json,
                )
                .await
            }
            AddEntity::Promotion {
                name,
                description,
                original_price,
                current_price,
                category,
                valid_until,
                image,
                json,
            } => {
                handle_add_promotion(
                    store,
                    name,
                    description,
                    original_price,
                    current_price,
                    category,
                    valid_until,
                    image,
                    json,
                )
                .await
            }
        },
        Commands::List {
            kind,
            search,
            category,
            active,
            json,
        } => handle_list(store, kind, search, category, active, json).await,
        Commands::Get { kind, id, json } => handle_get(store, kind, id, json).await,
        Commands::Update(update) => match update.entity {
            UpdateEntity::News {
                id,
                title,
                excerpt,
                content,
                author,
                category,
                published,
                images,
                stdin,
                json,
            } => {
                handle_update_news(
                    store, id, title, excerpt, content, author, category, published, images,
                    stdin, json,
                )
                .await
            }
            UpdateEntity::Promotion {
                id,
                name,
                description,
                original_price,
                current_price,
                category,
                valid_until,
                image,
                json,
            } => {
                handle_update_promotion(
                    store,
                    id,
                    name,
                    description,
                    original_price,
                    current_price,
                    category,
                    valid_until,
                    image,
                    json,
                )
                .await
            }
        },
        Commands::Delete { kind, id, force } => handle_delete(store, kind, id, force).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
