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


//! Blocking client for the FunimationLater streaming API
//!
//! Logs through the `log` facade; install any logger (e.g. `env_logger`) to see
//! the per-request debug trace.

pub mod api;
pub mod error;

pub use api::{FunimationLater, HttpClient, Query};
pub use error::{FunimationError, Result};
