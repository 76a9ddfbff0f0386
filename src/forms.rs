use chrono::NaiveDateTime;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormError {
    #[error("required field `{0}` is empty")]
    MissingField(&'static str),
    #[error("field `{0}` is malformed")]
    Malformed(&'static str),
}

const START_TIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

fn require(field: &str, name: &'static str) -> Result<(), FormError> {
    if field.trim().is_empty() {
        return Err(FormError::MissingField(name));
    }
    Ok(())
}

fn optional(field: String) -> Option<String> {
    if field.trim().is_empty() {
        None
    } else {
        Some(field)
    }
}

/// Comma-split and trim a free-text list field. An empty field is an empty
/// list, not a one-element list.
pub fn split_list(field: &str) -> Vec<String> {
    if field.trim().is_empty() {
        return Vec::new();
    }
    field
        .split(',')
        .map(|item| item.trim().to_string())
        .collect()
}

pub fn parse_start_time(field: &str) -> Option<NaiveDateTime> {
    START_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(field.trim(), format).ok())
}

#[derive(Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub search_term: String,
}

/// Venue submission as it arrives over the wire. The `seeking_talent`
/// checkbox is only present in the body when ticked, hence `Option`.
#[derive(Deserialize)]
pub struct VenueForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub facebook_link: String,
    #[serde(default)]
    pub image_link: String,
    #[serde(default)]
    pub seeking_talent: Option<String>,
    #[serde(default)]
    pub seeking_talent_description: String,
}

impl VenueForm {
    pub fn validate(self) -> Result<queries::NewVenue, FormError> {
        require(&self.name, "name")?;
        require(&self.city, "city")?;
        require(&self.state, "state")?;
        require(&self.address, "address")?;
        Ok(queries::NewVenue {
            name: self.name,
            genres: self.genres,
            address: optional(self.address),
            city: self.city,
            state: self.state,
            phone: optional(self.phone),
            website: optional(self.website),
            facebook_link: optional(self.facebook_link),
            image_link: optional(self.image_link),
            seeking_talent: self.seeking_talent.is_some(),
            seeking_talent_description: self.seeking_talent_description,
        })
    }
}

#[derive(Deserialize)]
pub struct ArtistForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub image_link: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub facebook_link: String,
    #[serde(default)]
    pub seeking_venue: Option<String>,
    #[serde(default)]
    pub seeking_venue_description: String,
    #[serde(default)]
    pub albums: String,
    #[serde(default)]
    pub songs: String,
}

impl ArtistForm {
    pub fn validate(self) -> Result<queries::NewArtist, FormError> {
        require(&self.name, "name")?;
        require(&self.city, "city")?;
        require(&self.state, "state")?;
        Ok(queries::NewArtist {
            name: self.name,
            genres: self.genres,
            city: self.city,
            state: self.state,
            phone: optional(self.phone),
            image_link: optional(self.image_link),
            website: optional(self.website),
            facebook_link: optional(self.facebook_link),
            seeking_venue: self.seeking_venue.is_some(),
            seeking_venue_description: self.seeking_venue_description,
            albums: split_list(&self.albums),
            songs: split_list(&self.songs),
        })
    }
}

/// Ids arrive as text fields; they are parsed here rather than by the
/// extractor so a bad value becomes a flash message instead of a 422.
#[derive(Deserialize)]
pub struct ShowForm {
    #[serde(default)]
    pub artist_id: String,
    #[serde(default)]
    pub venue_id: String,
    #[serde(default)]
    pub start_time: String,
}

impl ShowForm {
    pub fn validate(self) -> Result<queries::NewShow, FormError> {
        let artist_id = self
            .artist_id
            .trim()
            .parse()
            .map_err(|_| FormError::Malformed("artist_id"))?;
        let venue_id = self
            .venue_id
            .trim()
            .parse()
            .map_err(|_| FormError::Malformed("venue_id"))?;
        let start_time =
            parse_start_time(&self.start_time).ok_or(FormError::Malformed("start_time"))?;
        Ok(queries::NewShow {
            artist_id,
            venue_id,
            start_time,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_fields_are_split_and_trimmed() {
        assert_eq!(split_list("A, B"), vec!["A", "B"]);
        assert_eq!(split_list("  One ,Two,  Three  "), vec!["One", "Two", "Three"]);
        assert!(split_list("").is_empty());
        assert!(split_list("   ").is_empty());
    }

    #[test]
    fn start_time_accepts_common_layouts() {
        assert!(parse_start_time("2026-09-01 20:00:00").is_some());
        assert!(parse_start_time("2026-09-01T20:00:00").is_some());
        assert!(parse_start_time("2026-09-01T20:00").is_some());
        assert!(parse_start_time("next friday").is_none());
    }

    #[test]
    fn venue_form_requires_the_mandatory_fields() {
        let form = VenueForm {
            name: "The Musical Hop".to_string(),
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            address: "  ".to_string(),
            genres: vec![],
            phone: String::new(),
            website: String::new(),
            facebook_link: String::new(),
            image_link: String::new(),
            seeking_talent: Some("y".to_string()),
            seeking_talent_description: String::new(),
        };
        assert!(matches!(form.validate(), Err(FormError::MissingField("address"))));
    }

    #[test]
    fn checkbox_presence_becomes_a_boolean() {
        let form = ArtistForm {
            name: "Guns N Petals".to_string(),
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            genres: vec![],
            phone: String::new(),
            image_link: String::new(),
            website: String::new(),
            facebook_link: String::new(),
            seeking_venue: Some("y".to_string()),
            seeking_venue_description: String::new(),
            albums: "A, B".to_string(),
            songs: String::new(),
        };
        let new_artist = form.validate().unwrap();
        assert!(new_artist.seeking_venue);
        assert_eq!(new_artist.albums, vec!["A", "B"]);
        assert!(new_artist.songs.is_empty());
    }

    #[test]
    fn show_form_rejects_unparseable_input() {
        let form = ShowForm {
            artist_id: "one".to_string(),
            venue_id: "2".to_string(),
            start_time: "2026-09-01 20:00:00".to_string(),
        };
        assert!(matches!(form.validate(), Err(FormError::Malformed("artist_id"))));
    }
}
