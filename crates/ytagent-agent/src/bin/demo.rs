//! Walkthrough of the agent API without starting the upload loop.

use std::path::Path;

use chrono::Local;
use tracing::{info, warn};

use ytagent_agent::{init_tracing, AgentConfig, UploadAgent, YoutubePlatform};
use ytagent_youtube::{
    authenticate, build_http_client, AuthConfig, Credentials, TrendAnalyzer, YoutubeClient,
    YoutubeConfig,
};

const SAMPLE_VIDEO: &str = "videos/sample_video.mp4";
const SAMPLE_SHORT: &str = "shorts/sample_short.mp4";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = rustls::crypto::ring::default_provider().install_default();
    dotenvy::dotenv().ok();
    init_tracing();

    info!("=== YouTube Automation Agent - Example Usage ===");

    let config = AgentConfig::from_env()?;
    let youtube_config = YoutubeConfig::from_env();
    let http = build_http_client(&youtube_config)?;
    let tokens = authenticate(&AuthConfig::from_env(), http.clone()).await?;
    let client = YoutubeClient::with_http(http, youtube_config.clone(), Credentials::OAuth(tokens));
    let mut agent = UploadAgent::new(YoutubePlatform::new(client), config.clone());
    info!("Agent initialized");

    info!("Fetching trending topics...");
    let trending = agent.get_trending_topics(&config.default_region, 5).await?;
    for (i, topic) in trending.iter().enumerate() {
        info!("   {}. {} ({} views)", i + 1, topic.title, topic.views);
    }

    if Path::new(SAMPLE_VIDEO).exists() {
        agent.add_to_video_queue(
            SAMPLE_VIDEO,
            "Amazing Content - Trending Now",
            "Check out this viral content!",
            tags(&["trending", "viral", "youtube"]),
            None,
        )?;
    } else {
        warn!("Sample video not found. Skipping video queue example.");
    }

    if Path::new(SAMPLE_SHORT).exists() {
        agent.add_to_shorts_queue(
            SAMPLE_SHORT,
            "Quick Tip #1",
            "Learn this trick in 30 seconds!",
            tags(&["shorts", "tips", "tutorial"]),
        )?;
    } else {
        warn!("Sample short not found. Skipping shorts queue example.");
    }

    info!("Setting up automated upload schedules...");
    agent.schedule_uploads(Local::now().naive_local());

    match &config.api_key {
        Some(key) => {
            let analyzer = TrendAnalyzer::new(YoutubeClient::with_api_key(youtube_config, key.clone())?);
            let keywords = analyzer.get_keyword_suggestions("AI technology", 5).await?;
            let top: Vec<_> = keywords.iter().take(5).map(String::as_str).collect();
            info!("Trending keywords for 'AI technology': {}", top.join(", "));
        }
        None => warn!("YOUTUBE_API_KEY not set. Skipping trend analyzer example."),
    }

    let status = agent.status();
    info!("Current Queue Status:");
    info!("   Videos ready: {}", status.videos_queued);
    info!("   Shorts ready: {}", status.shorts_queued);
    info!("Run the `ytagent` binary to start uploading on the schedule.");

    Ok(())
}

fn tags(t: &[&str]) -> Vec<String> {
    t.iter().map(|s| s.to_string()).collect()
}
