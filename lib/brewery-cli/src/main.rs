#![allow(missing_docs)]
use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use brewery_client::config::ClientConfig;
use brewery_client::{ApiClient, BeerClient};

mod args;
use self::args::{Command, USAGE};

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let command = Command::parse(pico_args::Arguments::from_env()).context("parsing arguments")?;
    if command == Command::Help {
        return write_out(USAGE.as_bytes());
    }

    let config = ClientConfig::from_env().context("reading configuration")?;
    info!(root_url = %config.root_url, auth = ?config.auth_mode(), "configured");
    let client = config.build_client().context("creating client")?;

    run(&client, command).await
}

async fn run(client: &ApiClient, command: Command) -> Result<()> {
    match command {
        Command::List(query) => {
            let page = client
                .list_beers_with(&query.into())
                .await
                .context("listing beers")?;
            print_json(&page)
        }
        Command::Get(id) => {
            let beer = client
                .get_beer(id)
                .await
                .with_context(|| format!("getting beer {id}"))?;
            print_json(&beer)
        }
        Command::Create(beer) => {
            let created = client
                .create_beer(&beer)
                .await
                .context("creating beer")?;
            print_json(&created)
        }
        Command::Update(id, changes) => {
            let mut beer = client
                .get_beer(id)
                .await
                .with_context(|| format!("getting beer {id}"))?;
            changes.apply(&mut beer);
            let updated = client
                .update_beer(&beer)
                .await
                .with_context(|| format!("updating beer {id}"))?;
            print_json(&updated)
        }
        Command::Delete(id) => {
            client
                .delete_beer(id)
                .await
                .with_context(|| format!("deleting beer {id}"))?;
            info!(%id, "beer deleted");
            Ok(())
        }
        Command::Help => write_out(USAGE.as_bytes()),
    }
}

fn print_json<T>(value: &T) -> Result<()>
where
    T: Serialize,
{
    let mut json = serde_json::to_vec_pretty(value).context("serializing output")?;
    json.push(b'\n');
    write_out(&json)
}

fn write_out(bytes: &[u8]) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(bytes).context("writing output")?;
    stdout.flush().context("flushing output")
}
