use clap::Parser;

use salud_vital::config::ServerConfig;

#[tokio::main]
async fn main() {
    // A missing .env is fine; flags and the process environment still apply.
    let _ = dotenvy::dotenv();
    let config = ServerConfig::parse();
    salud_vital::init_tracing(&config);

    if let Err(e) = salud_vital::run(config).await {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
