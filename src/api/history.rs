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


//! Outgoing request records
//!
//! Every request the client builds is captured as a [`RequestInfo`] and kept in a
//! small [`RequestHistory`] for diagnostics. Records are never re-sent.

use reqwest::header::HeaderMap;
use reqwest::Method;
use std::collections::VecDeque;
use std::fmt;

/// Number of requests kept by [`RequestHistory`]
pub const MAX_RECENT_REQUESTS: usize = 5;

/// Snapshot of an outgoing request
#[derive(Debug, Clone, PartialEq)]
pub struct RequestInfo {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
}

impl RequestInfo {
    pub fn new(method: Method, url: impl Into<String>, headers: HeaderMap) -> Self {
        Self {
            method,
            url: url.into(),
            headers,
        }
    }
}

impl fmt::Display for RequestInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

/// Capped, newest-first log of recent requests
#[derive(Debug, Clone)]
pub struct RequestHistory {
    entries: VecDeque<RequestInfo>,
    capacity: usize,
}

impl Default for RequestHistory {
    fn default() -> Self {
        Self::with_capacity(MAX_RECENT_REQUESTS)
    }
}

impl RequestHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Insert at the front, evicting the oldest entry once full
    pub fn record(&mut self, request: RequestInfo) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_back();
        }
        self.entries.push_front(request);
    }

    /// Most recent request, if any
    pub fn latest(&self) -> Option<&RequestInfo> {
        self.entries.front()
    }

    /// Iterate newest to oldest
    pub fn iter(&self) -> impl Iterator<Item = &RequestInfo> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(n: usize) -> RequestInfo {
        RequestInfo::new(Method::GET, format!("https://api.example.com/{n}"), HeaderMap::new())
    }

    #[test]
    fn test_history_is_newest_first() {
        let mut history = RequestHistory::new();
        history.record(request(1));
        history.record(request(2));

        let urls: Vec<_> = history.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, vec!["https://api.example.com/2", "https://api.example.com/1"]);
        assert_eq!(history.latest().unwrap().url, "https://api.example.com/2");
    }

    #[test]
    fn test_history_evicts_oldest() {
        let mut history = RequestHistory::new();
        for n in 1..=8 {
            history.record(request(n));
            assert!(history.len() <= MAX_RECENT_REQUESTS);
        }

        assert_eq!(history.len(), MAX_RECENT_REQUESTS);
        let urls: Vec<_> = history.iter().map(|r| r.url.clone()).collect();
        let expected: Vec<_> = (4..=8).rev().map(|n| format!("https://api.example.com/{n}")).collect();
        assert_eq!(urls, expected);
    }

    #[test]
    fn test_history_zero_capacity() {
        let mut history = RequestHistory::with_capacity(0);
        history.record(request(1));
        assert!(history.is_empty());
    }

    #[test]
    fn test_request_info_display() {
        assert_eq!(request(3).to_string(), "GET https://api.example.com/3");
    }
}
