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


use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use funimationlater::api::session::API_HOST;
use funimationlater::api::{FunimationLater, HttpClient, JsonParser, Query, ShowQuery};

#[derive(Parser)]
#[command(name = "funimation-cli")]
#[command(about = "FunimationLater CLI - Desktop testing tool", long_about = None)]
struct Cli {
    /// Base URL for relative paths
    #[arg(long, default_value = API_HOST, global = true)]
    host: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a raw GET request and print the parsed response
    Get {
        /// Path or absolute URL
        uri: String,
        /// Query parameter as key=value (repeatable)
        #[arg(short, long = "query")]
        query: Vec<String>,
        /// Parse the body as JSON instead of XML
        #[arg(long)]
        json: bool,
    },
    /// Test authentication
    Login {
        /// Username
        #[arg(short, long)]
        username: String,
        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// Log in and list shows
    Shows {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
}

fn parse_pairs(raw: &[String]) -> anyhow::Result<Vec<(String, String)>> {
    raw.iter()
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => Ok((k.to_string(), v.to_string())),
            None => bail!("query parameter '{}' is not key=value", pair),
        })
        .collect()
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Get { uri, query, json } => {
            let mut client = if json {
                HttpClient::with_parser(cli.host, JsonParser)?
            } else {
                HttpClient::new(cli.host)?
            };
            let query = Query::from(parse_pairs(&query)?);
            let response = client
                .get(&uri, Some(query))
                .with_context(|| format!("GET {} failed", uri))?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Login { username, password } => {
            println!("Testing authentication...");
            let mut session = FunimationLater::with_client(HttpClient::new(cli.host)?);
            match session.login(&username, &password) {
                Ok(()) => println!("✓ Logged in as {}", username),
                Err(e) => println!("✗ {}", e.user_message()),
            }
        }
        Commands::Shows { username, password, limit } => {
            let mut session = FunimationLater::with_client(HttpClient::new(cli.host)?);
            session.login(&username, &password)?;
            let query = ShowQuery {
                limit,
                ..ShowQuery::default()
            };
            for show in session.get_shows(&query)? {
                println!("{:>8}  {}", show.id, show.title);
            }
        }
    }

    Ok(())
}
