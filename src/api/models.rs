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


//! Catalog models
//!
//! Plain structs mapped from the parsed response tree. Every model has a
//! `from_value` constructor; a missing required field is reported as
//! `UnknownResponse` so callers never see half-built records.

use crate::error::{FunimationError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Normalize an XML collection: absent → empty, one item → one, array → all
///
/// A single repeated element parses to an object rather than a one-element
/// array, so collection fields always go through here.
pub fn as_list(value: Option<&Value>) -> Vec<&Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().collect(),
        Some(item) => vec![item],
    }
}

/// The single element under an XML document (`{ "root": node }` → `node`)
pub fn document_root(document: &Value) -> Result<&Value> {
    document
        .as_object()
        .filter(|map| map.len() == 1)
        .and_then(|map| map.values().next())
        .ok_or_else(|| FunimationError::unknown_response("Expected a single root element"))
}

/// Scalar field as a string (XML gives strings, JSON may give numbers)
pub fn text(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        // Text-bearing element with attributes
        Value::Object(map) => map.get("#text").and_then(Value::as_str).map(str::to_owned),
        _ => None,
    }
}

fn required(value: &Value, key: &str, model: &str) -> Result<String> {
    text(value, key).ok_or_else(|| {
        FunimationError::unknown_response(format!("{model} is missing required field '{key}'"))
    })
}

fn number(value: &Value, key: &str, model: &str) -> Result<u32> {
    let raw = required(value, key, model)?;
    raw.trim().parse::<u32>().map_err(|_| {
        FunimationError::unknown_response(format!("{model} field '{key}' is not a number: {raw}"))
    })
}

/// Entry of a show listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Show {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Show {
    pub fn from_value(value: &Value) -> Result<Self> {
        Ok(Self {
            id: required(value, "id", "Show")?,
            title: required(value, "title", "Show")?,
            image_url: value
                .get("thumbnail")
                .and_then(|thumb| text(thumb, "path").or_else(|| thumb.as_str().map(str::to_owned))),
        })
    }
}

/// Season entry inside [`ShowDetails`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonSummary {
    pub number: u32,
    #[serde(default)]
    pub title: Option<String>,
}

/// Full show record from the detail endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowDetails {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub seasons: Vec<SeasonSummary>,
}

impl ShowDetails {
    pub fn from_value(value: &Value) -> Result<Self> {
        let seasons = as_list(value.get("seasons").and_then(|s| s.get("season")))
            .into_iter()
            .map(|season| -> Result<SeasonSummary> {
                Ok(SeasonSummary {
                    number: number(season, "number", "Season")?,
                    title: text(season, "title"),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            id: required(value, "id", "ShowDetails")?,
            title: required(value, "title", "ShowDetails")?,
            description: text(value, "description"),
            seasons,
        })
    }

    pub fn has_season(&self, number: u32) -> bool {
        self.seasons.iter().any(|s| s.number == number)
    }
}

/// Episode entry of a season listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub id: String,
    pub number: u32,
    pub title: String,
}

impl Episode {
    pub fn from_value(value: &Value) -> Result<Self> {
        Ok(Self {
            id: required(value, "id", "Episode")?,
            number: number(value, "episodeNumber", "Episode")?,
            title: required(value, "title", "Episode")?,
        })
    }
}

/// A season with its episodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Season {
    pub show_id: String,
    pub number: u32,
    pub episodes: Vec<Episode>,
}

/// Anything holding an ordered run of episodes
pub trait EpisodeContainer {
    fn episodes(&self) -> &[Episode];

    /// Episode by its number within the container (not its position)
    fn episode(&self, number: u32) -> Option<&Episode> {
        self.episodes().iter().find(|e| e.number == number)
    }

    fn episode_count(&self) -> usize {
        self.episodes().len()
    }
}

impl EpisodeContainer for Season {
    fn episodes(&self) -> &[Episode] {
        &self.episodes
    }
}

impl EpisodeContainer for [Episode] {
    fn episodes(&self) -> &[Episode] {
        self
    }
}

/// Playable details of one episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeDetails {
    pub id: String,
    pub title: String,
    pub stream_url: String,
    #[serde(default)]
    pub duration_seconds: Option<u64>,
}

impl EpisodeDetails {
    pub fn from_value(value: &Value) -> Result<Self> {
        Ok(Self {
            id: required(value, "id", "EpisodeDetails")?,
            title: required(value, "title", "EpisodeDetails")?,
            stream_url: required(value, "videoUrl", "EpisodeDetails")?,
            duration_seconds: text(value, "duration").and_then(|d| d.trim().parse().ok()),
        })
    }
}
