// FunimationLater - Rust client for the Funimation streaming API
// Copyright (C) 2025 FunimationLater contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


//! Catalog browsing
//!
//! # API Endpoints
//! - `GET /longlist/content/page/` - show listings, search, and season episodes
//!   (selected by the `id` query parameter)
//! - `GET /myqueue/get-items/` - the account's queue
//! - `GET /detail/?pk=<show id>` - show details with its seasons
//! - `GET /player/?id=<episode id>` - playable episode details
//!
//! Listings answer `<response><items><item>...</item>...</items></response>`.
//! Every call requires a logged-in session.

use crate::api::client::Query;
use crate::api::models::{
    as_list, document_root, Episode, EpisodeContainer, EpisodeDetails, Season, Show, ShowDetails,
};
use crate::api::session::FunimationLater;
use crate::error::{FunimationError, Result};
use serde_json::Value;

const LONGLIST_PATH: &str = "/longlist/content/page/";
const QUEUE_PATH: &str = "/myqueue/get-items/";
const DETAIL_PATH: &str = "/detail/";
const PLAYER_PATH: &str = "/player/";

const DEFAULT_TERRITORY: &str = "US";

/// Listing to browse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShowType {
    #[default]
    Shows,
    Simulcasts,
    BroadcastDubs,
    Movies,
}

impl ShowType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Shows => "shows",
            Self::Simulcasts => "simulcasts",
            Self::BroadcastDubs => "broadcast-dubs",
            Self::Movies => "movies",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    #[default]
    Alpha,
    DateAdded,
    Popularity,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alpha => "alpha",
            Self::DateAdded => "date",
            Self::Popularity => "popularity",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Paging and ordering for [`FunimationLater::get_shows`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowQuery {
    pub show_type: ShowType,
    pub sort: SortBy,
    pub sort_direction: SortDirection,
    pub offset: u32,
    pub limit: u32,
    pub territory: String,
}

impl Default for ShowQuery {
    fn default() -> Self {
        Self {
            show_type: ShowType::default(),
            sort: SortBy::default(),
            sort_direction: SortDirection::default(),
            offset: 0,
            limit: 20,
            territory: DEFAULT_TERRITORY.to_string(),
        }
    }
}

impl ShowQuery {
    fn to_query(&self) -> Query {
        Query::pairs([
            ("id", self.show_type.as_str().to_string()),
            ("sort", self.sort.as_str().to_string()),
            ("sort_direction", self.sort_direction.as_str().to_string()),
            ("offset", self.offset.to_string()),
            ("limit", self.limit.to_string()),
            ("territory", self.territory.clone()),
        ])
    }
}

/// Items of a `<response><items><item/>...</items></response>` listing
fn listing_items(document: &Value) -> Result<Vec<&Value>> {
    let root = document_root(document)?;
    Ok(as_list(root.get("items").and_then(|items| items.get("item"))))
}

fn shows_from_listing(document: &Value) -> Result<Vec<Show>> {
    listing_items(document)?
        .into_iter()
        .map(Show::from_value)
        .collect()
}

impl FunimationLater {
    /// Browse a show listing
    pub fn get_shows(&mut self, query: &ShowQuery) -> Result<Vec<Show>> {
        self.require_login()?;
        let response = self.client.get(LONGLIST_PATH, Some(query.to_query()))?;
        shows_from_listing(&response)
    }

    /// Search shows by title
    pub fn search(&mut self, term: &str) -> Result<Vec<Show>> {
        self.require_login()?;
        let query = Query::from([("id", "search"), ("q", term)]);
        let response = self.client.get(LONGLIST_PATH, Some(query))?;
        shows_from_listing(&response)
    }

    /// Shows in the account's queue
    pub fn get_my_queue(&mut self) -> Result<Vec<Show>> {
        self.require_login()?;
        let response = self.client.get(QUEUE_PATH, None)?;
        shows_from_listing(&response)
    }

    /// Full show record, including its seasons
    pub fn get_show(&mut self, show_id: &str) -> Result<ShowDetails> {
        self.require_login()?;
        let response = self.client.get(DETAIL_PATH, Some(Query::from([("pk", show_id)])))?;
        ShowDetails::from_value(document_root(&response)?)
    }

    /// Episodes of one season
    ///
    /// # Errors
    /// Returns `InvalidSeason` if the show has no season `season`
    pub fn get_season(&mut self, show_id: &str, season: u32) -> Result<Season> {
        let details = self.get_show(show_id)?;
        if !details.has_season(season) {
            return Err(FunimationError::InvalidSeason {
                show_id: show_id.to_string(),
                season,
            });
        }

        let query = Query::pairs([
            ("id", "episodes".to_string()),
            ("title_id", show_id.to_string()),
            ("season", season.to_string()),
        ]);
        let response = self.client.get(LONGLIST_PATH, Some(query))?;
        let episodes = listing_items(&response)?
            .into_iter()
            .map(Episode::from_value)
            .collect::<Result<Vec<_>>>()?;

        Ok(Season {
            show_id: show_id.to_string(),
            number: season,
            episodes,
        })
    }

    /// One episode of a season
    ///
    /// # Errors
    /// Returns `InvalidSeason` or `UnknownEpisode` when either does not exist
    pub fn get_episode(&mut self, show_id: &str, season: u32, episode: u32) -> Result<Episode> {
        let listing = self.get_season(show_id, season)?;
        listing
            .episode(episode)
            .cloned()
            .ok_or(FunimationError::UnknownEpisode { season, episode })
    }

    /// Playable details (stream URL) of an episode
    pub fn get_episode_details(&mut self, episode_id: &str) -> Result<EpisodeDetails> {
        self.require_login()?;
        let response = self.client.get(PLAYER_PATH, Some(Query::from([("id", episode_id)])))?;
        EpisodeDetails::from_value(document_root(&response)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_show_query_defaults() {
        let query = ShowQuery::default().to_query();
        assert_eq!(
            query.encode(),
            "id=shows&sort=alpha&sort_direction=ASC&offset=0&limit=20&territory=US"
        );
    }

    #[test]
    fn test_listing_with_single_item() {
        let document = json!({"response": {"items": {"item": {"id": "1", "title": "Only One"}}}});
        let shows = shows_from_listing(&document).unwrap();
        assert_eq!(shows.len(), 1);
        assert_eq!(shows[0].title, "Only One");
    }

    #[test]
    fn test_empty_listing() {
        let document = json!({"response": {"items": null}});
        assert!(shows_from_listing(&document).unwrap().is_empty());
    }

    #[test]
    fn test_catalog_requires_login() {
        let mut session = FunimationLater::new().unwrap();
        assert!(matches!(
            session.get_shows(&ShowQuery::default()),
            Err(FunimationError::LoginRequired)
        ));
        assert!(matches!(session.search("bebop"), Err(FunimationError::LoginRequired)));
        assert!(matches!(session.get_season("1", 1), Err(FunimationError::LoginRequired)));
        // Nothing was sent
        assert!(session.client().recent_requests().is_empty());
    }
}
