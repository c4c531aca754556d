//! Upload agent binary.
//!
//! Authenticates, seeds the queues from the media folders, registers the
//! upload schedule and runs until Ctrl-C.

use chrono::Local;
use tracing::{error, info, warn};

use ytagent_agent::{init_tracing, AgentConfig, AgentRunner, UploadAgent, YoutubePlatform};
use ytagent_youtube::{
    authenticate, build_http_client, AuthConfig, Credentials, YoutubeClient, YoutubeConfig,
};

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for TLS/HTTPS)
    let _ = rustls::crypto::ring::default_provider().install_default();

    dotenvy::dotenv().ok();
    init_tracing();

    info!("Starting ytagent");

    if let Err(e) = run().await {
        error!("ytagent failed: {:#}", e);
        std::process::exit(1);
    }

    info!("ytagent shutdown complete");
}

async fn run() -> anyhow::Result<()> {
    let config = AgentConfig::from_env()?;
    info!("Agent config: {:?}", config);

    let youtube_config = YoutubeConfig::from_env();
    let http = build_http_client(&youtube_config)?;
    let tokens = authenticate(&AuthConfig::from_env(), http.clone()).await?;
    let client = YoutubeClient::with_http(http, youtube_config, Credentials::OAuth(tokens));

    let mut agent = UploadAgent::new(YoutubePlatform::new(client), config.clone());

    let seeded = agent.seed_from_folders()?;
    info!("Seeded {} jobs from media folders", seeded);

    match agent.get_trending_topics(&config.default_region, 5).await {
        Ok(items) => {
            info!("Trending Topics:");
            for (i, item) in items.iter().enumerate() {
                info!("{}. {} ({} views)", i + 1, item.title, item.views);
            }
        }
        Err(e) => warn!("Could not fetch trending topics: {}", e),
    }

    agent.schedule_uploads(Local::now().naive_local());

    let mut runner = AgentRunner::new(agent);
    let shutdown = runner.shutdown_handle();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received shutdown signal");
        shutdown.shutdown();
    });

    runner.run().await;
    Ok(())
}
