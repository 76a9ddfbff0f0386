use chrono::NaiveDateTime;
use entities::prelude::{Artist, Show, Venue};
use entities::string_list::StringList;
use entities::{artist, show, venue};
use log::info;
use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ModelTrait, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionError, TransactionTrait,
};

/// Payload for a validated venue submission. `posting_date` is supplied by
/// the caller so creation time is decided in one place.
pub struct NewVenue {
    pub name: String,
    pub genres: Vec<String>,
    pub address: Option<String>,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub image_link: Option<String>,
    pub seeking_talent: bool,
    pub seeking_talent_description: String,
}

pub struct NewArtist {
    pub name: String,
    pub genres: Vec<String>,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_venue_description: String,
    pub albums: Vec<String>,
    pub songs: Vec<String>,
}

pub struct NewShow {
    pub artist_id: i32,
    pub venue_id: i32,
    pub start_time: NaiveDateTime,
}

fn flatten(err: TransactionError<DbErr>) -> DbErr {
    match err {
        TransactionError::Connection(e) => e,
        TransactionError::Transaction(e) => e,
    }
}

// lower(name) LIKE '%term%' so Postgres and the SQLite test backend match the
// same rows. An empty term yields '%%', which matches every row by contract.
fn name_matches<C: ColumnTrait>(column: C, term: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column))).like(format!("%{}%", term.to_lowercase()))
}

pub async fn recent_venues(
    conn: &DatabaseConnection,
    limit: u64,
) -> Result<Vec<venue::Model>, DbErr> {
    Venue::find()
        .order_by(venue::Column::PostingDate, Order::Desc)
        .limit(limit)
        .all(conn)
        .await
}

pub async fn recent_artists(
    conn: &DatabaseConnection,
    limit: u64,
) -> Result<Vec<artist::Model>, DbErr> {
    Artist::find()
        .order_by(artist::Column::PostingDate, Order::Desc)
        .limit(limit)
        .all(conn)
        .await
}

pub async fn all_venues(conn: &DatabaseConnection) -> Result<Vec<venue::Model>, DbErr> {
    Venue::find().all(conn).await
}

pub async fn all_artists(conn: &DatabaseConnection) -> Result<Vec<artist::Model>, DbErr> {
    Artist::find().all(conn).await
}

pub async fn find_venue(
    conn: &DatabaseConnection,
    venue_id: i32,
) -> Result<Option<venue::Model>, DbErr> {
    Venue::find_by_id(venue_id).one(conn).await
}

pub async fn find_artist(
    conn: &DatabaseConnection,
    artist_id: i32,
) -> Result<Option<artist::Model>, DbErr> {
    Artist::find_by_id(artist_id).one(conn).await
}

pub async fn search_venues(
    conn: &DatabaseConnection,
    term: &str,
) -> Result<Vec<venue::Model>, DbErr> {
    Venue::find()
        .filter(name_matches(venue::Column::Name, term))
        .all(conn)
        .await
}

pub async fn search_artists(
    conn: &DatabaseConnection,
    term: &str,
) -> Result<Vec<artist::Model>, DbErr> {
    Artist::find()
        .filter(name_matches(artist::Column::Name, term))
        .all(conn)
        .await
}

pub async fn count_upcoming_shows_at_venue(
    conn: &DatabaseConnection,
    venue_id: i32,
    now: NaiveDateTime,
) -> Result<u64, DbErr> {
    Show::find()
        .filter(show::Column::VenueId.eq(venue_id))
        .filter(show::Column::StartTime.gt(now))
        .count(conn)
        .await
}

pub async fn count_upcoming_shows_by_artist(
    conn: &DatabaseConnection,
    artist_id: i32,
    now: NaiveDateTime,
) -> Result<u64, DbErr> {
    Show::find()
        .filter(show::Column::ArtistId.eq(artist_id))
        .filter(show::Column::StartTime.gt(now))
        .count(conn)
        .await
}

pub async fn past_shows_at_venue(
    conn: &DatabaseConnection,
    venue_id: i32,
    now: NaiveDateTime,
) -> Result<Vec<(show::Model, Option<artist::Model>)>, DbErr> {
    Show::find()
        .filter(show::Column::VenueId.eq(venue_id))
        .filter(show::Column::StartTime.lt(now))
        .find_also_related(Artist)
        .all(conn)
        .await
}

pub async fn upcoming_shows_at_venue(
    conn: &DatabaseConnection,
    venue_id: i32,
    now: NaiveDateTime,
) -> Result<Vec<(show::Model, Option<artist::Model>)>, DbErr> {
    Show::find()
        .filter(show::Column::VenueId.eq(venue_id))
        .filter(show::Column::StartTime.gt(now))
        .find_also_related(Artist)
        .all(conn)
        .await
}

pub async fn past_shows_by_artist(
    conn: &DatabaseConnection,
    artist_id: i32,
    now: NaiveDateTime,
) -> Result<Vec<(show::Model, Option<venue::Model>)>, DbErr> {
    Show::find()
        .filter(show::Column::ArtistId.eq(artist_id))
        .filter(show::Column::StartTime.lt(now))
        .find_also_related(Venue)
        .all(conn)
        .await
}

pub async fn upcoming_shows_by_artist(
    conn: &DatabaseConnection,
    artist_id: i32,
    now: NaiveDateTime,
) -> Result<Vec<(show::Model, Option<venue::Model>)>, DbErr> {
    Show::find()
        .filter(show::Column::ArtistId.eq(artist_id))
        .filter(show::Column::StartTime.gt(now))
        .find_also_related(Venue)
        .all(conn)
        .await
}

pub async fn all_shows_with_artists(
    conn: &DatabaseConnection,
) -> Result<Vec<(show::Model, Option<artist::Model>)>, DbErr> {
    Show::find().find_also_related(Artist).all(conn).await
}

pub async fn venues_by_ids(
    conn: &DatabaseConnection,
    venue_ids: Vec<i32>,
) -> Result<Vec<venue::Model>, DbErr> {
    Venue::find()
        .filter(venue::Column::Id.is_in(venue_ids))
        .all(conn)
        .await
}

pub async fn create_venue(
    conn: &DatabaseConnection,
    new_venue: NewVenue,
    posting_date: NaiveDateTime,
) -> Result<venue::Model, DbErr> {
    let created = conn
        .transaction::<_, venue::Model, DbErr>(|txn| {
            Box::pin(async move {
                venue::ActiveModel {
                    name: Set(new_venue.name),
                    genres: Set(StringList(new_venue.genres)),
                    address: Set(new_venue.address),
                    city: Set(new_venue.city),
                    state: Set(new_venue.state),
                    phone: Set(new_venue.phone),
                    website: Set(new_venue.website),
                    facebook_link: Set(new_venue.facebook_link),
                    image_link: Set(new_venue.image_link),
                    seeking_talent: Set(new_venue.seeking_talent),
                    seeking_talent_description: Set(new_venue.seeking_talent_description),
                    posting_date: Set(posting_date),
                    ..Default::default()
                }
                .insert(txn)
                .await
            })
        })
        .await
        .map_err(flatten)?;
    info!("Venue created: '{}' (id {})", created.name, created.id);
    Ok(created)
}

pub async fn create_artist(
    conn: &DatabaseConnection,
    new_artist: NewArtist,
    posting_date: NaiveDateTime,
) -> Result<artist::Model, DbErr> {
    let created = conn
        .transaction::<_, artist::Model, DbErr>(|txn| {
            Box::pin(async move {
                artist::ActiveModel {
                    name: Set(new_artist.name),
                    genres: Set(StringList(new_artist.genres)),
                    city: Set(new_artist.city),
                    state: Set(new_artist.state),
                    phone: Set(new_artist.phone),
                    image_link: Set(new_artist.image_link),
                    website: Set(new_artist.website),
                    facebook_link: Set(new_artist.facebook_link),
                    seeking_venue: Set(new_artist.seeking_venue),
                    seeking_venue_description: Set(new_artist.seeking_venue_description),
                    posting_date: Set(posting_date),
                    albums: Set(StringList(new_artist.albums)),
                    songs: Set(StringList(new_artist.songs)),
                    ..Default::default()
                }
                .insert(txn)
                .await
            })
        })
        .await
        .map_err(flatten)?;
    info!("Artist created: '{}' (id {})", created.name, created.id);
    Ok(created)
}

/// Inserts a show. The unique index on (artist_id, venue_id, start_time)
/// makes a double booking surface as a `DbErr`; the transaction is rolled
/// back and no row is written.
pub async fn create_show(
    conn: &DatabaseConnection,
    new_show: NewShow,
) -> Result<show::Model, DbErr> {
    let created = conn
        .transaction::<_, show::Model, DbErr>(|txn| {
            Box::pin(async move {
                show::ActiveModel {
                    artist_id: Set(new_show.artist_id),
                    venue_id: Set(new_show.venue_id),
                    start_time: Set(new_show.start_time),
                    ..Default::default()
                }
                .insert(txn)
                .await
            })
        })
        .await
        .map_err(flatten)?;
    info!(
        "Show created: artist {} at venue {} on {}",
        created.artist_id, created.venue_id, created.start_time
    );
    Ok(created)
}

/// Deletes a venue and, through the cascade rule, its shows. A missing id is
/// a no-op reported as `Ok(false)`.
pub async fn delete_venue(conn: &DatabaseConnection, venue_id: i32) -> Result<bool, DbErr> {
    let existing = match Venue::find_by_id(venue_id).one(conn).await? {
        Some(venue) => venue,
        None => return Ok(false),
    };
    conn.transaction::<_, (), DbErr>(|txn| {
        Box::pin(async move {
            existing.delete(txn).await?;
            Ok(())
        })
    })
    .await
    .map_err(flatten)?;
    info!("Venue {} deleted", venue_id);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use migration::MigratorTrait;
    use sea_orm::Database;

    async fn setup() -> DatabaseConnection {
        let conn = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&conn, None).await.unwrap();
        conn
    }

    fn venue(name: &str, city: &str, state: &str) -> NewVenue {
        NewVenue {
            name: name.to_string(),
            genres: vec!["Jazz".to_string(), "Reggae".to_string()],
            address: Some("1015 Folsom Street".to_string()),
            city: city.to_string(),
            state: state.to_string(),
            phone: None,
            website: None,
            facebook_link: None,
            image_link: Some("https://example.com/venue.png".to_string()),
            seeking_talent: true,
            seeking_talent_description: String::new(),
        }
    }

    fn artist(name: &str) -> NewArtist {
        NewArtist {
            name: name.to_string(),
            genres: vec!["Rock n Roll".to_string()],
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            phone: None,
            image_link: Some("https://example.com/artist.png".to_string()),
            website: None,
            facebook_link: None,
            seeking_venue: false,
            seeking_venue_description: String::new(),
            albums: vec!["A".to_string(), "B".to_string()],
            songs: vec!["X".to_string(), "Y".to_string()],
        }
    }

    #[tokio::test]
    async fn search_is_case_insensitive_and_partial() {
        let conn = setup().await;
        let now = Utc::now().naive_utc();
        create_venue(&conn, venue("The Musical Hop", "San Francisco", "CA"), now)
            .await
            .unwrap();
        create_venue(
            &conn,
            venue("Park Square Live Music & Coffee", "San Francisco", "CA"),
            now,
        )
        .await
        .unwrap();

        for term in ["hop", "HOP", "Hop"] {
            let hits = search_venues(&conn, term).await.unwrap();
            assert_eq!(hits.len(), 1);
            assert_eq!(hits[0].name, "The Musical Hop");
        }
        let hits = search_venues(&conn, "music").await.unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn empty_search_term_matches_every_row() {
        let conn = setup().await;
        let now = Utc::now().naive_utc();
        create_venue(&conn, venue("The Musical Hop", "San Francisco", "CA"), now)
            .await
            .unwrap();
        create_venue(&conn, venue("The Dueling Pianos Bar", "New York", "NY"), now)
            .await
            .unwrap();

        assert_eq!(search_venues(&conn, "").await.unwrap().len(), 2);
        assert_eq!(search_venues(&conn, "zzz").await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn double_booking_is_rejected() {
        let conn = setup().await;
        let now = Utc::now().naive_utc();
        let venue = create_venue(&conn, venue("The Musical Hop", "San Francisco", "CA"), now)
            .await
            .unwrap();
        let artist = create_artist(&conn, artist("Guns N Petals"), now).await.unwrap();
        let start_time = now + Duration::days(7);

        create_show(
            &conn,
            NewShow {
                artist_id: artist.id,
                venue_id: venue.id,
                start_time,
            },
        )
        .await
        .unwrap();
        let second = create_show(
            &conn,
            NewShow {
                artist_id: artist.id,
                venue_id: venue.id,
                start_time,
            },
        )
        .await;
        assert!(second.is_err());
        assert_eq!(Show::find().count(&conn).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn shows_partition_into_past_and_upcoming() {
        let conn = setup().await;
        let now = Utc::now().naive_utc();
        let venue = create_venue(&conn, venue("The Musical Hop", "San Francisco", "CA"), now)
            .await
            .unwrap();
        let artist = create_artist(&conn, artist("Guns N Petals"), now).await.unwrap();

        create_show(
            &conn,
            NewShow {
                artist_id: artist.id,
                venue_id: venue.id,
                start_time: now - Duration::days(30),
            },
        )
        .await
        .unwrap();
        create_show(
            &conn,
            NewShow {
                artist_id: artist.id,
                venue_id: venue.id,
                start_time: now + Duration::days(30),
            },
        )
        .await
        .unwrap();

        let past = past_shows_at_venue(&conn, venue.id, now).await.unwrap();
        assert_eq!(past.len(), 1);
        assert!(past[0].0.start_time < now);
        assert_eq!(past[0].1.as_ref().unwrap().name, "Guns N Petals");

        let upcoming = upcoming_shows_at_venue(&conn, venue.id, now).await.unwrap();
        assert_eq!(upcoming.len(), 1);
        assert!(upcoming[0].0.start_time > now);

        // Same partition seen from the artist's side
        assert_eq!(past_shows_by_artist(&conn, artist.id, now).await.unwrap().len(), 1);
        assert_eq!(
            count_upcoming_shows_by_artist(&conn, artist.id, now).await.unwrap(),
            1
        );
        assert_eq!(
            count_upcoming_shows_at_venue(&conn, venue.id, now).await.unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn deleting_a_venue_cascades_to_its_shows() {
        let conn = setup().await;
        let now = Utc::now().naive_utc();
        let venue = create_venue(&conn, venue("The Musical Hop", "San Francisco", "CA"), now)
            .await
            .unwrap();
        let artist = create_artist(&conn, artist("Guns N Petals"), now).await.unwrap();
        create_show(
            &conn,
            NewShow {
                artist_id: artist.id,
                venue_id: venue.id,
                start_time: now + Duration::days(7),
            },
        )
        .await
        .unwrap();

        assert!(delete_venue(&conn, venue.id).await.unwrap());
        assert_eq!(Venue::find().count(&conn).await.unwrap(), 0);
        assert_eq!(Show::find().count(&conn).await.unwrap(), 0);
        // The artist is untouched by the cascade
        assert_eq!(Artist::find().count(&conn).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn deleting_a_missing_venue_is_a_noop() {
        let conn = setup().await;
        let now = Utc::now().naive_utc();
        create_venue(&conn, venue("The Musical Hop", "San Francisco", "CA"), now)
            .await
            .unwrap();

        assert!(!delete_venue(&conn, 9999).await.unwrap());
        assert_eq!(Venue::find().count(&conn).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn recent_listings_are_newest_first_and_capped() {
        let conn = setup().await;
        let base = Utc::now().naive_utc();
        for index in 0..12 {
            create_venue(
                &conn,
                venue(&format!("Venue {}", index), "San Francisco", "CA"),
                base + Duration::minutes(index),
            )
            .await
            .unwrap();
        }

        let recent = recent_venues(&conn, 10).await.unwrap();
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].name, "Venue 11");
        assert_eq!(recent[9].name, "Venue 2");
    }

    #[tokio::test]
    async fn string_lists_keep_their_order() {
        let conn = setup().await;
        let now = Utc::now().naive_utc();
        let created = create_artist(&conn, artist("Guns N Petals"), now).await.unwrap();

        let fetched = find_artist(&conn, created.id).await.unwrap().unwrap();
        assert_eq!(fetched.albums.0, vec!["A".to_string(), "B".to_string()]);
        assert_eq!(fetched.songs.0, vec!["X".to_string(), "Y".to_string()]);
        assert_eq!(
            fetched.genres.0,
            vec!["Rock n Roll".to_string()]
        );
    }
}
