use clap::{Parser, Subcommand};
use serde_json::Value;

use cep_weather::http::CepRequest;

#[derive(Parser)]
#[command(name = "cep-cli")]
#[command(about = "Query a running cep-weather gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3333")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a postal code to its city and current temperature
    Lookup {
        /// 8-character postal code
        cep: String,
    },
    /// Ask a weather service directly, bypassing the gateway
    Temperature {
        /// 8-character postal code
        cep: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Lookup { cep } => {
            client
                .post(format!("{}/cep", base))
                .json(&CepRequest::new(cep))
                .send()
                .await?
        }
        Commands::Temperature { cep } => {
            client
                .get(format!("{}/", base))
                .query(&[("cep", cep)])
                .send()
                .await?
        }
    };
    print_response(res).await?;

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
