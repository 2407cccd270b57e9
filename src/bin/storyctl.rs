use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "storyctl")]
#[command(about = "Probe CLI for a Story Teller service runtime", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check process liveness
    Status,
    /// Check readiness (storage connected, listener serving)
    Ready,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let path = match cli.command {
        Commands::Status => "/health",
        Commands::Ready => "/ready",
    };

    let res = client.get(format!("{}{}", cli.url, path)).send().await?;
    let status = res.status();
    print_response(res).await?;

    // non-2xx means not ready; make it scriptable
    if !status.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{} {}", status, serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{} {}", status, text),
    }
    Ok(())
}
