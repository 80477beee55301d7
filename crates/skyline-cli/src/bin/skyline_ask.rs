//! Ask the Skyline search server a question from the command line.

use clap::Parser;
use skyline_cli::{build_request, parse_bounds, parse_center, render};
use skyline_sdk::SkylineClient;

/// Send a natural-language map query to a Skyline server
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Query text, e.g. "tallest building in Toronto"
    query: Vec<String>,

    /// Skyline server URL
    #[arg(long, default_value = "http://localhost:8000")]
    url: String,

    /// Visible map area as south,west,north,east
    #[arg(long, allow_hyphen_values = true)]
    bounds: Option<String>,

    /// Map center as lon,lat (the legacy endpoint derives it from --bounds)
    #[arg(long, allow_hyphen_values = true, conflicts_with = "legacy")]
    center: Option<String>,

    /// Use the legacy GET endpoint
    #[arg(long)]
    legacy: bool,

    /// Print the raw JSON response
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let query = args.query.join(" ");
    if query.trim().is_empty() {
        anyhow::bail!("a query is required");
    }

    let bounds = args.bounds.as_deref().map(parse_bounds).transpose()?;
    let center = args.center.as_deref().map(parse_center).transpose()?;
    let client = SkylineClient::new(&args.url);

    let response = if args.legacy {
        client.search_legacy(&query, bounds.as_ref()).await?
    } else {
        client.search(&build_request(&query, bounds, center)).await?
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        println!("{}", render(&response));
    }

    Ok(())
}
