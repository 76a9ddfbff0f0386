use chrono::NaiveDateTime;
use serde::Serialize;

use entities::{artist, venue};

pub const START_TIME_DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format_start_time(start_time: NaiveDateTime) -> String {
    start_time.format(START_TIME_DISPLAY_FORMAT).to_string()
}

#[derive(Serialize)]
pub struct HomeResponse {
    pub(crate) flash: Option<String>,
    pub(crate) latest_posted_venues: Vec<RecentVenue>,
    pub(crate) latest_posted_artists: Vec<RecentArtist>,
}

#[derive(Serialize)]
pub struct RecentVenue {
    pub(crate) venue_id: i32,
    pub(crate) venue_name: String,
    pub(crate) venue_posting_date: NaiveDateTime,
}

#[derive(Serialize)]
pub struct RecentArtist {
    pub(crate) artist_id: i32,
    pub(crate) artist_name: String,
    pub(crate) artist_posting_date: NaiveDateTime,
}

impl HomeResponse {
    pub fn from_recent(
        venues: Vec<venue::Model>,
        artists: Vec<artist::Model>,
        flash: Option<String>,
    ) -> Self {
        Self {
            flash,
            latest_posted_venues: venues
                .into_iter()
                .map(|venue| RecentVenue {
                    venue_id: venue.id,
                    venue_name: venue.name,
                    venue_posting_date: venue.posting_date,
                })
                .collect(),
            latest_posted_artists: artists
                .into_iter()
                .map(|artist| RecentArtist {
                    artist_id: artist.id,
                    artist_name: artist.name,
                    artist_posting_date: artist.posting_date,
                })
                .collect(),
        }
    }
}

#[derive(Serialize)]
pub struct VenueAreasResponse {
    pub(crate) areas: Vec<VenueArea>,
}

#[derive(Serialize)]
pub struct VenueArea {
    pub(crate) city: String,
    pub(crate) state: String,
    pub(crate) venues: Vec<VenueSummary>,
}

#[derive(Serialize, Clone)]
pub struct VenueSummary {
    pub(crate) id: i32,
    pub(crate) name: String,
    pub(crate) num_shows: u64,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub(crate) count: usize,
    pub(crate) data: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub(crate) id: i32,
    pub(crate) name: String,
    pub(crate) num_shows: u64,
}

#[derive(Serialize)]
pub struct ArtistListItem {
    pub(crate) id: i32,
    pub(crate) name: String,
}

#[derive(Serialize)]
pub struct ShowListing {
    pub(crate) shows: Vec<ShowEntry>,
}

#[derive(Serialize)]
pub struct ShowEntry {
    pub(crate) venue_id: i32,
    pub(crate) venue_name: String,
    pub(crate) artist_id: i32,
    pub(crate) artist_name: String,
    pub(crate) artist_image_link: Option<String>,
    pub(crate) start_time: String,
}

#[derive(Serialize)]
pub struct ErrorPage {
    pub(crate) code: u16,
    pub(crate) message: String,
}

impl ErrorPage {
    pub fn not_found() -> Self {
        Self {
            code: 404,
            message: "Not Found".to_string(),
        }
    }

    pub fn server_error() -> Self {
        Self {
            code: 500,
            message: "Internal Server Error".to_string(),
        }
    }
}
