use wanip_e2e::{cli, install_crypto_provider};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    install_crypto_provider();

    // Load .env file if it exists (optional - won't fail if missing)
    // This must happen before any config is read from environment
    if let Err(e) = dotenvy::dotenv() {
        if !e.to_string().contains("not found") {
            eprintln!("Warning: Error loading .env file: {}", e);
        }
    }

    let outcome = cli::run_cli().await?;
    if !outcome.passed {
        std::process::exit(1);
    }
    Ok(())
}
