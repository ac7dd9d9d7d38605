//! Generate command handler
//!
//! Submits a request, then follows the job until it reaches a terminal
//! state, printing each status change as the store reports it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use veo_core::GenerationRequestBuilder;
use veo_core::domain::job::{GenerationJob, JobStatus};
use veo_jobs::{JobEvent, JobStore, LifecycleError, LifecycleManager};

use crate::config::Config;
use crate::output::{colorize_status, print_hint, print_job_details, print_videos};

#[derive(Args)]
pub struct GenerateArgs {
    /// Text description of the video
    #[arg(short, long)]
    prompt: Option<String>,

    /// Source image (.jpg, .jpeg or .png) to animate
    #[arg(short, long)]
    image: Option<PathBuf>,

    /// Number of videos to generate (1-4)
    #[arg(long, default_value_t = 1)]
    sample_count: u8,

    /// Video length in seconds (5-8)
    #[arg(long, default_value_t = 5)]
    duration: u8,

    /// Keep the prompt as written instead of letting the service rewrite it
    #[arg(long)]
    no_enhance: bool,

    /// Cloud Storage prefix receiving the videos (e.g., gs://bucket/path/)
    #[arg(long)]
    storage_uri: Option<String>,

    /// Print the operation name and exit without waiting
    #[arg(long)]
    detach: bool,

    /// Directory receiving inline videos
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,
}

pub async fn handle_generate(args: GenerateArgs, config: &Config) -> Result<()> {
    let mut builder = GenerationRequestBuilder::new()
        .sample_count(args.sample_count)
        .duration_seconds(args.duration)
        .enhance_prompt(!args.no_enhance);

    if let Some(prompt) = args.prompt {
        builder = builder.prompt(prompt);
    }

    if let Some(storage_uri) = args.storage_uri {
        builder = builder.storage_uri(storage_uri);
    }

    if let Some(path) = &args.image {
        let mime_type = image_mime_type(path).with_context(|| {
            format!(
                "Unsupported image {}: expected a .jpg, .jpeg or .png file",
                path.display()
            )
        })?;
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;

        builder = builder.image(bytes, mime_type);
        if let Some(name) = path.file_name() {
            builder = builder.image_label(name.to_string_lossy());
        }
    }

    let request = builder.build()?;

    let store = Arc::new(JobStore::new());
    let manager = Arc::new(LifecycleManager::new(
        Arc::new(config.client()),
        Arc::clone(&store),
        config.jobs.polling,
    ));

    let id = match manager.submit(request).await {
        Ok(id) => id,
        Err(e) => return Err(report(e)),
    };

    let job = store.get(id).context("Submitted job missing from store")?;
    println!("{} Submitted job {}", "✓".green(), id.to_string().cyan());
    println!("  Operation: {}", job.operation_name.dimmed());

    if args.detach {
        println!(
            "\nCheck on it later with: {}",
            format!("veo status {}", job.operation_name).bold()
        );
        return Ok(());
    }

    let mut events = store.subscribe();
    let mut handle = manager
        .start_polling(id)
        .context("Polling already active for this job")?;
    let mut last_status = job.status;
    let mut interrupted = false;

    let outcome = loop {
        tokio::select! {
            joined = &mut handle => break joined?,
            event = events.recv() => match event {
                Ok(JobEvent::Updated(job)) if job.id == id && job.status != last_status => {
                    println!("  Status:    {}", colorize_status(job.status));
                    last_status = job.status;
                }
                _ => {}
            },
            _ = tokio::signal::ctrl_c(), if !interrupted => {
                interrupted = true;
                manager.shutdown();
            }
        }
    };

    match outcome {
        Ok(job) => finish(&job, &args.output_dir).await,
        Err(LifecycleError::Cancelled(_)) => {
            println!(
                "\n{} Stopped waiting. The operation continues remotely:",
                "⚠".yellow()
            );
            println!("  veo status {}", job.operation_name);
            Ok(())
        }
        Err(e) => {
            if e.is_status_unknown() {
                println!(
                    "\n{} Status unknown. Check on it later with: veo status {}",
                    "⚠".yellow(),
                    job.operation_name
                );
            }
            Err(report(e))
        }
    }
}

async fn finish(job: &GenerationJob, output_dir: &Path) -> Result<()> {
    println!();
    print_job_details(job);

    match job.status {
        JobStatus::Completed => {
            let videos = job.result.as_deref().unwrap_or_default();
            print_videos(videos, output_dir, &job.id.to_string()).await
        }
        _ => anyhow::bail!("Generation failed"),
    }
}

/// Prints a remediation hint and converts the error for `main`
fn report(error: LifecycleError) -> anyhow::Error {
    if let LifecycleError::Client(client_error) = &error {
        print_hint(client_error);
    }
    error.into()
}

/// MIME type of a supported source image, from its extension
fn image_mime_type(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        _ => None,
    }
}
