use std::net::{Ipv4Addr, SocketAddr};

use match_data_api::{AppState, app};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing/logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting match data service...");

    dotenvy::dotenv().ok();

    let connection_string = std::env::var("MONGO_CONNECTION_STRING")
        .expect("MONGO_CONNECTION_STRING must be set in .env");

    let db_name = std::env::var("DATABASE_NAME")
        .expect("DATABASE_NAME must be set in .env");

    // One client per process; connections are pooled inside the driver
    let client = mongodb::Client::with_uri_str(&connection_string)
        .await
        .expect("Failed to create MongoDB client");

    tracing::info!("Database client initialized.");

    let host: Ipv4Addr = std::env::var("HOST")
        .expect("HOST must be set in .env")
        .parse()
        .expect("HOST is not in the correct format");

    let port: u16 = std::env::var("PORT")
        .expect("PORT must be set in .env")
        .parse()
        .expect("PORT is not the correct format");

    let addr = SocketAddr::from((host, port));

    let app = app(AppState { client, db_name });

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .await
        .expect("Failed to start server.");
}
