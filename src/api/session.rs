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


//! Session handling
//!
//! # API Endpoint
//! `POST https://api-funimation.dadcdigital.com/xml/auth/login/`
//!
//! Form fields: `username`, `password`, `playerId=NinjaPlayer`.
//!
//! A successful login answers:
//! ```text
//! <authentication>
//!   <token>...</token>
//!   <userType>FunimationSubscriptionUser</userType>
//! </authentication>
//! ```
//! The token is then sent as `Authorization: Token <token>` on every request.

use crate::api::client::HttpClient;
use crate::error::{FunimationError, Result};
use reqwest::header::AUTHORIZATION;

/// Base URL of the XML API
pub const API_HOST: &str = "https://api-funimation.dadcdigital.com/xml";

const LOGIN_PATH: &str = "/auth/login/";
const PLAYER_ID: &str = "NinjaPlayer";
const SUBSCRIPTION_USER: &str = "FunimationSubscriptionUser";

/// Entry point to the FunimationLater API
///
/// Holds the HTTP client and the login state. Catalog calls live in
/// [`crate::api::catalog`] and all require a prior [`FunimationLater::login`].
#[derive(Debug)]
pub struct FunimationLater {
    pub(crate) client: HttpClient,
    logged_in: bool,
}

impl FunimationLater {
    /// Create a session against the public API host
    pub fn new() -> Result<Self> {
        Ok(Self::with_client(HttpClient::new(API_HOST)?))
    }

    /// Create a session over an existing client (custom host, parser or config)
    pub fn with_client(client: HttpClient) -> Self {
        Self {
            client,
            logged_in: false,
        }
    }

    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut HttpClient {
        &mut self.client
    }

    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    /// Log in and attach the session token to the client
    ///
    /// Any previous session is dropped first, so a failed login leaves the
    /// client logged out.
    ///
    /// # Errors
    /// - `AuthenticationFailed` if the answer has no token or the account is not
    ///   a subscription account
    /// - transport and parse errors from the client, unchanged
    pub fn login(&mut self, username: &str, password: &str) -> Result<()> {
        // A failed attempt must not leave an earlier token in place
        self.logout();

        let response = self.client.post(
            LOGIN_PATH,
            &[
                ("username", username),
                ("password", password),
                ("playerId", PLAYER_ID),
            ],
        )?;

        let auth = response
            .get("authentication")
            .ok_or_else(|| FunimationError::auth_failed("Username or password is incorrect"))?;
        let user_type = auth.get("userType").and_then(|v| v.as_str());
        let token = auth.get("token").and_then(|v| v.as_str());

        match (user_type, token) {
            (Some(SUBSCRIPTION_USER), Some(token)) if !token.is_empty() => {
                self.client
                    .add_headers([(AUTHORIZATION.as_str(), format!("Token {token}"))])?;
                self.logged_in = true;
                log::info!("Logged in as {}", username);
                Ok(())
            }
            (Some(other), Some(_)) if other != SUBSCRIPTION_USER => {
                log::warn!("Login for {} rejected: account type {}", username, other);
                Err(FunimationError::auth_failed(format!(
                    "Account type {other} has no subscription"
                )))
            }
            _ => Err(FunimationError::auth_failed("Username or password is incorrect")),
        }
    }

    /// Forget the session token
    pub fn logout(&mut self) {
        self.client.remove_header(AUTHORIZATION);
        if self.logged_in {
            log::info!("Logged out");
        }
        self.logged_in = false;
    }

    /// Fail with `LoginRequired` unless logged in
    pub fn require_login(&self) -> Result<()> {
        if self.logged_in {
            Ok(())
        } else {
            Err(FunimationError::LoginRequired)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_logged_out() {
        let session = FunimationLater::new().unwrap();
        assert!(!session.is_logged_in());
        assert_eq!(session.client().host(), API_HOST);
        assert!(matches!(session.require_login(), Err(FunimationError::LoginRequired)));
    }

    #[test]
    fn test_logout_drops_token() {
        let mut session = FunimationLater::new().unwrap();
        session
            .client_mut()
            .add_headers([("Authorization", "Token abc")])
            .unwrap();
        session.logout();
        assert!(session.client().headers().get(AUTHORIZATION).is_none());
        assert!(!session.is_logged_in());
    }
}
