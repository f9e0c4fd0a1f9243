use tracing_subscriber::EnvFilter;

use ytdl_web_lib::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ytdl_web=info,ytdl_web_lib=info,tower_http=info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    ytdl_web_lib::run(config).await
}
