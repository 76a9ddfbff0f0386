use std::fs;

use axum::routing::get;
use axum::Router;
use clap::Parser;
use log::{error, info};
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use tokio::main;
use tower_http::cors::CorsLayer;

use crate::endpoint_handlers::{
    artists, create_artist, create_show, create_venue, delete_venue, edit_artist_form,
    edit_venue_form, home, new_artist_form, new_show_form, new_venue_form, not_found,
    search_artists, search_venues, show_artist, show_venue, shows, update_artist, update_venue,
    venues,
};

mod endpoint_handlers;
mod forms;
mod responses;

#[derive(Clone)]
pub struct DatabaseState {
    connection: DatabaseConnection,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, short, default_value_t = 3)]
    verbosity: usize,
    #[arg(long, short, default_value_t = false)]
    quiet: bool,
    #[arg(long, short)]
    config: String,
}

#[derive(Deserialize)]
struct Config {
    port: i32,
    postgres: String,
}

pub fn router(state: DatabaseState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/venues", get(venues))
        .route("/venues/search", get(search_venues).post(search_venues))
        .route("/venues/create", get(new_venue_form).post(create_venue))
        .route("/venues/:id", get(show_venue).delete(delete_venue))
        .route("/venues/:id/edit", get(edit_venue_form).post(update_venue))
        .route("/artists", get(artists))
        .route("/artists/search", get(search_artists).post(search_artists))
        .route("/artists/create", get(new_artist_form).post(create_artist))
        .route("/artists/:id", get(show_artist))
        .route(
            "/artists/:id/edit",
            get(edit_artist_form).post(update_artist),
        )
        .route("/shows", get(shows))
        .route("/shows/create", get(new_show_form).post(create_show))
        .fallback(not_found)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[main]
async fn main() -> Result<(), sea_orm::DbErr> {
    let args = Args::parse();
    stderrlog::new()
        .verbosity(args.verbosity)
        .quiet(args.quiet)
        .timestamp(stderrlog::Timestamp::Millisecond)
        .init()
        .unwrap();

    info!("Configuration path: {}", args.config);
    let config_string_result = fs::read_to_string(args.config);
    if let Err(err) = config_string_result {
        error!("Error opening configuration file: {}", err);
        return Ok(());
    }
    let config_string = config_string_result.unwrap();
    let config_result = serde_json::from_str(config_string.as_str());
    if let Err(err) = config_result {
        error!("Malformed configuration: {}", err);
        return Ok(());
    }
    let config: Config = config_result.unwrap();

    let connection_result = sea_orm::Database::connect(config.postgres.as_str()).await;
    if let Err(err) = connection_result {
        error!("Error connecting to database: {}", err);
        return Ok(());
    }
    let connection = connection_result.unwrap();
    if let Err(err) = migration::Migrator::up(&connection, None).await {
        error!("Error running migrations: {}", err);
        return Ok(());
    }
    let state = DatabaseState { connection };

    let app = router(state);

    info!("Listening on 0.0.0.0:{}", config.port);
    info!("Welcome to Gigboard!");

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .unwrap();
    Ok(axum::serve(listener, app).await.unwrap())
}
