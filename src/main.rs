//! Command line client issuing one timeout-protected request.

use std::path::PathBuf;
use std::process::ExitCode;

use bytes::Bytes;
use clap::{Parser, ValueEnum};

use timeout_protection::config::{load_config, validate_config, ProtectionConfig};
use timeout_protection::observability::logging;
use timeout_protection::{HttpIssuer, OutboundRequest, Outcome, Payload, TimeoutProtected, Verb};

#[derive(Parser)]
#[command(name = "timeout-protection")]
#[command(about = "Issue an HTTP request that survives gateway timeouts by polling", long_about = None)]
struct Cli {
    /// Target URL
    url: String,

    /// HTTP verb
    #[arg(short = 'X', long, value_enum, default_value_t = Method::Get)]
    method: Method,

    /// Extra request header, `name: value` (repeatable)
    #[arg(short = 'H', long = "header")]
    headers: Vec<String>,

    /// Request body, sent as-is
    #[arg(short, long)]
    data: Option<String>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the wait budget in milliseconds
    #[arg(long)]
    poll_timeout_ms: Option<u64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Method {
    Get,
    Post,
    Put,
    Delete,
    RawPost,
}

impl From<Method> for Verb {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Verb::Get,
            Method::Post => Verb::Post,
            Method::Put => Verb::Put,
            Method::Delete => Verb::Delete,
            Method::RawPost => Verb::RawPost,
        }
    }
}

fn build_request(cli: &Cli) -> Result<OutboundRequest, Box<dyn std::error::Error>> {
    let mut request = OutboundRequest::parse(cli.method.into(), &cli.url)?;
    for header in &cli.headers {
        let (name, value) = header
            .split_once(':')
            .ok_or_else(|| format!("Invalid header '{}', expected 'name: value'", header))?;
        request = request.header(name.trim(), value.trim())?;
    }
    if let Some(data) = &cli.data {
        request = request.payload(Payload::Raw(Bytes::from(data.clone())));
    }
    Ok(request)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => ProtectionConfig::default(),
    };
    if let Some(ms) = cli.poll_timeout_ms {
        config.polling.poll_timeout_ms = ms;
        if let Err(errors) = validate_config(&config) {
            for e in errors {
                eprintln!("Error: {}", e);
            }
            return ExitCode::FAILURE;
        }
    }

    if let Err(e) = logging::init(&config.observability) {
        eprintln!("Warning: logging not initialized: {}", e);
    }

    tracing::info!(
        url = %cli.url,
        poll_timeout_ms = config.polling.poll_timeout_ms,
        on_budget_expiry = ?config.polling.on_budget_expiry,
        "Configuration loaded"
    );

    let request = match build_request(&cli) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let issuer = match HttpIssuer::new(&config.transport) {
        Ok(issuer) => issuer,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let client = TimeoutProtected::with_config(issuer, config.polling);

    match client.send(request).await {
        Outcome::Success(response) => {
            eprintln!("{}", response.status);
            println!("{}", response.text());
            ExitCode::SUCCESS
        }
        Outcome::ApplicationError(e) => {
            eprintln!("Error: {}", e);
            if let timeout_protection::Error::Status { body, .. } = &e {
                if !body.is_empty() {
                    eprintln!("Response: {}", String::from_utf8_lossy(body));
                }
            }
            ExitCode::FAILURE
        }
        Outcome::Timeout(budget) => {
            eprintln!("Error: no result after polling for {:?}", budget);
            ExitCode::FAILURE
        }
    }
}
