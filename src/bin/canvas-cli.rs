use clap::{Parser, Subcommand};
use reqwest::{header::LOCATION, redirect::Policy};
use serde_json::Value;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "canvas-cli")]
#[command(about = "Command-line client for the canvas relay", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the canvas bitmap
    Canvas {
        /// Write the bytes to this file instead of reporting their size
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Submit a draw request, e.g. '{"x":1,"y":2,"color":3}'
    Draw { data: String },
    /// Check relay liveness
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::builder()
        .redirect(Policy::none())
        .build()?;
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Canvas { output } => {
            let res = client.get(format!("{}/grid", base)).send().await?;
            let status = res.status();
            if !status.is_success() {
                return report_failure(res).await;
            }
            let bytes = res.bytes().await?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &bytes)?;
                    println!("Wrote {} bytes to {}", bytes.len(), path.display());
                }
                None => println!("Canvas is {} bytes", bytes.len()),
            }
        }
        Commands::Draw { data } => {
            serde_json::from_str::<Value>(&data)
                .map_err(|e| format!("draw data is not valid JSON: {}", e))?;
            let res = client
                .post(format!("{}/draw", base))
                .form(&[("myData", data.as_str())])
                .send()
                .await?;
            let status = res.status();
            if status.is_redirection() {
                let location = res
                    .headers()
                    .get(LOCATION)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("-");
                println!("Accepted ({}), redirected to {}", status, location);
            } else {
                return report_failure(res).await;
            }
        }
        Commands::Health => {
            let res = client.get(format!("{}/healthz", base)).send().await?;
            if !res.status().is_success() {
                return report_failure(res).await;
            }
            let json: Value = res.json().await?;
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }

    Ok(())
}

async fn report_failure(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    eprintln!("Error: relay returned status {}", status);
    if let Ok(text) = res.text().await {
        if !text.is_empty() {
            eprintln!("Response: {}", text);
        }
    }
    Err(format!("request failed with status {}", status).into())
}
