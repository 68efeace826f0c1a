//! Example: Managing players-club entries from the command line
//!
//! Reads credentials with the standard loader (environment first, then
//! `goplay.json` / `goplay.toml`). A `.env` file is honoured.
//!
//! # Usage
//!
//! ```bash
//! export GOPLAY_PUBLISHER_ID=pbgspub GOPLAY_SECRET=... GOPLAY_TEST_MODE=true
//! cargo run -p goplay-infra --example players_club -- list
//! cargo run -p goplay-infra --example players_club -- save a@b.c 1990-01-01 42
//! cargo run -p goplay-infra --example players_club -- delete 42
//! cargo run -p goplay-infra --example players_club -- token
//! ```
//!
//! Set `RUST_LOG=goplay_core=debug` to see each graph call.

use anyhow::{bail, Context};
use goplay_domain::Params;
use goplay_infra::{config, connect};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = config::load().context("loading GoPlay configuration")?;
    let client = connect(&config)?;
    let club = client.publisher().resource("playersclub");

    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["list"] | [] => {
            let mut page = club.clone().get(Params::new()).await?;
            loop {
                for player in page.data().as_array().into_iter().flatten() {
                    println!("{player}");
                }
                match client.next(&page).await? {
                    Some(next) => page = next,
                    None => break,
                }
            }
        }
        ["save", email, birthday, account_id] => {
            let player = Params::new()
                .with("email", *email)
                .with("birthday", *birthday)
                .with("accountId", *account_id);
            let saved = club.clone().post(Params::new().with("players", vec![player])).await?;
            println!("{}", serde_json::to_string_pretty(saved.raw())?);
        }
        ["delete", account_id] => {
            let deleted = club.clone().delete_at(account_id, Params::new()).await?;
            println!("{}", serde_json::to_string_pretty(deleted.raw())?);
        }
        ["token"] => println!("{}", client.token().await?),
        other => bail!("unknown command {other:?}; expected list, save, delete or token"),
    }

    Ok(())
}
