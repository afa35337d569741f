//! Clipstream CLI: register, submit a video with thumbnail, list the feed.
//!
//! Set CLIPSTREAM_API_URL (or API_URL) for the API and CDN_PUBLIC_KEY /
//! CDN_UPLOAD_URL for direct uploads. Ctrl+C cancels an in-flight submission.

use anyhow::Context;
use clap::{Parser, Subcommand};
use clipstream_core::models::VideoTransformation;
use clipstream_uploader::{submit_video, ApiClient, ProgressFn, UploaderSettings, VideoSubmission};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "clipstream", about = "Clipstream API CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new user
    Register {
        /// Email address
        #[arg(long)]
        email: String,
        /// Password (will be hashed server-side)
        #[arg(long)]
        password: String,
        /// Optional display name
        #[arg(long)]
        name: Option<String>,
    },
    /// Upload a video with its thumbnail and create the metadata record
    Submit {
        /// Path to the video file
        video: PathBuf,
        /// Path to the thumbnail image
        thumbnail: PathBuf,
        /// Video title (at least 3 characters)
        #[arg(long)]
        title: String,
        /// Video description (at least 10 characters)
        #[arg(long)]
        description: String,
        /// Hide player controls
        #[arg(long)]
        no_controls: bool,
        /// Playback quality 1-100 (CDN default when omitted)
        #[arg(long)]
        quality: Option<i16>,
        /// Playback width in pixels
        #[arg(long, default_value_t = 1080)]
        width: i32,
        /// Playback height in pixels
        #[arg(long, default_value_t = 1920)]
        height: i32,
    },
    /// List all videos in the feed
    List,
}

fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "clipstream=info".into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let api = ApiClient::from_env()?;

    match cli.command {
        Commands::Register {
            email,
            password,
            name,
        } => {
            let response = api.register(name.as_deref(), &email, &password).await?;
            print_json(&response)?;
        }
        Commands::Submit {
            video,
            thumbnail,
            title,
            description,
            no_controls,
            quality,
            width,
            height,
        } => {
            let settings = UploaderSettings::from_env()?;

            let cancel = CancellationToken::new();
            {
                let cancel = cancel.clone();
                tokio::spawn(async move {
                    if tokio::signal::ctrl_c().await.is_ok() {
                        eprintln!("\nCancelling upload...");
                        cancel.cancel();
                    }
                });
            }

            let submission = VideoSubmission {
                title,
                description,
                video_path: video,
                thumbnail_path: thumbnail,
                controls: !no_controls,
                transformation: VideoTransformation {
                    width,
                    height,
                    quality,
                },
            };

            let video_progress: ProgressFn = Arc::new(|pct| eprintln!("video: {}%", pct));
            let thumbnail_progress: ProgressFn = Arc::new(|pct| eprintln!("thumbnail: {}%", pct));

            let created = submit_video(
                &api,
                &settings,
                submission,
                cancel,
                Some(video_progress),
                Some(thumbnail_progress),
            )
            .await
            .map_err(|e| anyhow::anyhow!("Submission failed: {}", e))?;

            print_json(&created)?;
        }
        Commands::List => {
            let videos = api.list_videos().await?;
            print_json(&videos)?;
        }
    }

    Ok(())
}
