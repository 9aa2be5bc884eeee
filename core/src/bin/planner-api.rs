//! Command-line probe for the planning API.
//!
//! ```bash
//! planner-api get    /orders --param status=open
//! planner-api post   /materials --body '{"name":"steel","type":"film"}'
//! planner-api put    /orders/3 --body '{"priority":2}'
//! planner-api delete /orders/3
//! ```
//!
//! `API_BASE_URL` and `API_TIMEOUT_MS` are read from the environment or a
//! `.env` file. With no base URL, `--origin` names the server that relative
//! paths resolve against.

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use reqwest::Url;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use planner_client::{ApiClient, ClientConfig, Params};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(short = 'v', long, action = ArgAction::Count, help = "Increase log verbosity: -v = Info, -vv = Debug")]
    verbose: u8,

    /// Origin used for relative paths when API_BASE_URL is empty.
    #[arg(long, value_name = "URL")]
    origin: Option<Url>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// GET an endpoint.
    Get {
        endpoint: String,
        /// Query parameter as key=value. Repeatable.
        #[arg(short, long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,
    },
    /// POST a JSON body.
    Post {
        endpoint: String,
        #[arg(short, long)]
        body: Option<String>,
    },
    /// PUT a JSON body.
    Put {
        endpoint: String,
        #[arg(short, long)]
        body: Option<String>,
    },
    /// DELETE an endpoint.
    Delete { endpoint: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .init();

    let config = ClientConfig::from_env().context("reading client configuration")?;
    let client = ApiClient::over_http(config, cli.origin).context("building HTTP transport")?;

    let payload: Value = match cli.command {
        Command::Get { endpoint, params } => {
            let query = parse_params(&params)?;
            client.get(&endpoint, Some(&query)).await?
        }
        Command::Post { endpoint, body } => {
            let body = parse_body(body.as_deref())?;
            client.post(&endpoint, body.as_ref()).await?
        }
        Command::Put { endpoint, body } => {
            let body = parse_body(body.as_deref())?;
            client.put(&endpoint, body.as_ref()).await?
        }
        Command::Delete { endpoint } => client.delete(&endpoint).await?,
    };

    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

fn parse_params(raw: &[String]) -> Result<Params> {
    let mut params = Params::new();
    for pair in raw {
        let Some((key, value)) = pair.split_once('=') else {
            bail!("query parameter {pair:?} is not key=value");
        };
        params.insert(key.to_string(), Value::String(value.to_string()));
    }
    Ok(params)
}

fn parse_body(raw: Option<&str>) -> Result<Option<Value>> {
    raw.map(|s| serde_json::from_str(s).with_context(|| format!("body is not valid JSON: {s}")))
        .transpose()
}
