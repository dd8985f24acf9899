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


//! FunimationLater API client implementation
//!
//! The transport core (`client`, `response`, `history`) builds requests, keeps
//! session headers, and turns bodies into plain value trees. The session and
//! catalog modules sit on top of it: they decide which endpoint to call and
//! raise the login/catalog errors after inspecting parsed responses.

pub mod catalog;
pub mod client;
pub mod history;
pub mod models;
pub mod response;
pub mod session;

// Re-export commonly used types
pub use catalog::{ShowQuery, ShowType, SortBy, SortDirection};
pub use client::{ClientConfig, HttpClient, Query};
pub use history::{RequestHistory, RequestInfo};
pub use models::{Episode, EpisodeContainer, EpisodeDetails, Season, Show, ShowDetails};
pub use response::{JsonParser, ResponseParser, XmlParser};
pub use session::FunimationLater;
