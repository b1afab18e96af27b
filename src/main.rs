use tracing_subscriber::EnvFilter;

use insider_network::config::Config;
use insider_network::pipeline::NetworkAnalyzer;
use insider_network::transaction::loader::load_transactions;

const USAGE: &str = "usage:
  insider-network analyze <transactions.json|csv> [config.toml] [TICKER,TICKER...]
  insider-network serve [config.toml]";

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    // Logs go to stderr so stdout carries only the report (set RUST_LOG=debug for stage detail)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }

    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("");

    match cmd {
        "analyze" => {
            let input = args
                .get(2)
                .ok_or_else(|| eyre::eyre!("Missing transactions file\n{}", USAGE))?;
            let config_path = args.get(3).map(String::as_str).unwrap_or("config.toml");
            let config = Config::load_or_default(config_path)?;

            let tickers: Vec<String> = args
                .get(4)
                .map(|list| {
                    list.split(',')
                        .map(|t| t.trim().to_uppercase())
                        .filter(|t| !t.is_empty())
                        .collect()
                })
                .unwrap_or_default();

            let transactions = load_transactions(input)?;
            let analyzer = NetworkAnalyzer::new(config.analysis);
            let report = analyzer.analyze(
                &transactions,
                &tickers,
                chrono::Utc::now().date_naive(),
            );

            serde_json::to_writer_pretty(std::io::stdout(), &report)?;
            println!();
        }
        "serve" => {
            let config_path = args.get(2).map(String::as_str).unwrap_or("config.toml");
            let config = Config::load_or_default(config_path)?;
            tracing::info!("Configuration loaded from {}", config_path);

            let analyzer = NetworkAnalyzer::new(config.analysis);
            let server = insider_network::api::serve(analyzer, &config.api.host, config.api.port);

            tokio::select! {
                result = server => {
                    if let Err(e) = result {
                        tracing::error!(error = %e, "API server failed");
                        return Err(e);
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Shutdown signal received, stopping API server");
                }
            }
        }
        _ => {
            eprintln!("{}", USAGE);
            return Err(eyre::eyre!("Unknown command '{}'", cmd));
        }
    }

    Ok(())
}
