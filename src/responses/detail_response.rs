use serde::Serialize;

use entities::string_list::StringList;
use entities::{artist, show, venue};

use crate::responses::responses::format_start_time;

/// The venue page payload: every stored attribute plus the shows joined to
/// their artists, partitioned into past and upcoming.
#[derive(Serialize)]
pub struct VenueDetail {
    pub(crate) id: i32,
    pub(crate) name: String,
    pub(crate) genres: StringList,
    pub(crate) address: Option<String>,
    pub(crate) city: String,
    pub(crate) state: String,
    pub(crate) phone: Option<String>,
    pub(crate) website: Option<String>,
    pub(crate) facebook_link: Option<String>,
    pub(crate) seeking_talent: bool,
    pub(crate) seeking_talent_description: String,
    pub(crate) image_link: Option<String>,
    pub(crate) past_shows: Vec<VenueShowEntry>,
    pub(crate) upcoming_shows: Vec<VenueShowEntry>,
    pub(crate) past_shows_count: usize,
    pub(crate) upcoming_shows_count: usize,
}

#[derive(Serialize)]
pub struct VenueShowEntry {
    pub(crate) artist_id: i32,
    pub(crate) artist_name: String,
    pub(crate) artist_image_link: Option<String>,
    pub(crate) start_time: String,
}

impl VenueDetail {
    pub fn from_venue(
        venue: venue::Model,
        past: Vec<(show::Model, Option<artist::Model>)>,
        upcoming: Vec<(show::Model, Option<artist::Model>)>,
    ) -> Self {
        let past_shows = venue_show_entries(past);
        let upcoming_shows = venue_show_entries(upcoming);
        Self {
            id: venue.id,
            name: venue.name,
            genres: venue.genres,
            address: venue.address,
            city: venue.city,
            state: venue.state,
            phone: venue.phone,
            website: venue.website,
            facebook_link: venue.facebook_link,
            seeking_talent: venue.seeking_talent,
            seeking_talent_description: venue.seeking_talent_description,
            image_link: venue.image_link,
            past_shows_count: past_shows.len(),
            upcoming_shows_count: upcoming_shows.len(),
            past_shows,
            upcoming_shows,
        }
    }
}

fn venue_show_entries(rows: Vec<(show::Model, Option<artist::Model>)>) -> Vec<VenueShowEntry> {
    rows.into_iter()
        .filter_map(|(show, artist)| {
            artist.map(|artist| VenueShowEntry {
                artist_id: show.artist_id,
                artist_name: artist.name,
                artist_image_link: artist.image_link,
                start_time: format_start_time(show.start_time),
            })
        })
        .collect()
}

#[derive(Serialize)]
pub struct ArtistDetail {
    pub(crate) id: i32,
    pub(crate) name: String,
    pub(crate) genres: StringList,
    pub(crate) city: String,
    pub(crate) state: String,
    pub(crate) phone: Option<String>,
    pub(crate) website: Option<String>,
    pub(crate) albums: StringList,
    pub(crate) songs: StringList,
    pub(crate) facebook_link: Option<String>,
    pub(crate) seeking_venue: bool,
    pub(crate) seeking_venue_description: String,
    pub(crate) image_link: Option<String>,
    pub(crate) past_shows: Vec<ArtistShowEntry>,
    pub(crate) upcoming_shows: Vec<ArtistShowEntry>,
    pub(crate) past_shows_count: usize,
    pub(crate) upcoming_shows_count: usize,
}

#[derive(Serialize)]
pub struct ArtistShowEntry {
    pub(crate) venue_id: i32,
    pub(crate) venue_name: String,
    pub(crate) venue_image_link: Option<String>,
    pub(crate) start_time: String,
}

impl ArtistDetail {
    pub fn from_artist(
        artist: artist::Model,
        past: Vec<(show::Model, Option<venue::Model>)>,
        upcoming: Vec<(show::Model, Option<venue::Model>)>,
    ) -> Self {
        let past_shows = artist_show_entries(past);
        let upcoming_shows = artist_show_entries(upcoming);
        Self {
            id: artist.id,
            name: artist.name,
            genres: artist.genres,
            city: artist.city,
            state: artist.state,
            phone: artist.phone,
            website: artist.website,
            albums: artist.albums,
            songs: artist.songs,
            facebook_link: artist.facebook_link,
            seeking_venue: artist.seeking_venue,
            seeking_venue_description: artist.seeking_venue_description,
            image_link: artist.image_link,
            past_shows_count: past_shows.len(),
            upcoming_shows_count: upcoming_shows.len(),
            past_shows,
            upcoming_shows,
        }
    }
}

fn artist_show_entries(rows: Vec<(show::Model, Option<venue::Model>)>) -> Vec<ArtistShowEntry> {
    rows.into_iter()
        .filter_map(|(show, venue)| {
            venue.map(|venue| ArtistShowEntry {
                venue_id: show.venue_id,
                venue_name: venue.name,
                venue_image_link: venue.image_link,
                start_time: format_start_time(show.start_time),
            })
        })
        .collect()
}
