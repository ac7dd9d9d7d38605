//! Terminal rendering and artifact files

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::*;
use veo_client::ClientError;
use veo_core::domain::job::{GenerationJob, JobStatus};
use veo_core::domain::operation::Video;

/// Colorize job status for display
pub fn colorize_status(status: JobStatus) -> ColoredString {
    let status_str = status.to_string();
    match status {
        JobStatus::Pending => status_str.yellow(),
        JobStatus::Running => status_str.cyan(),
        JobStatus::Completed => status_str.green(),
        JobStatus::Failed => status_str.red(),
    }
}

/// Print detailed job information
pub fn print_job_details(job: &GenerationJob) {
    println!("{}", "Job Details:".bold());
    println!("  ID:          {}", job.id.to_string().cyan());
    println!("  Operation:   {}", job.operation_name.dimmed());
    println!("  Status:      {}", colorize_status(job.status));
    if !job.prompt.is_empty() {
        println!("  Prompt:      {}", job.prompt);
    }
    if let Some(image) = &job.source_image {
        println!(
            "  Image:       {} ({}, {} bytes)",
            image.label.as_deref().unwrap_or("inline"),
            image.mime_type,
            image.size_bytes
        );
    }
    println!(
        "  Parameters:  {} video(s), {}s, enhance prompt: {}",
        job.parameters.sample_count, job.parameters.duration_seconds, job.parameters.enhance_prompt
    );
    println!("  Created:     {}", job.created_at.format("%Y-%m-%d %H:%M:%S"));

    if let Some(completed) = job.completed_at {
        println!("  Completed:   {}", completed.format("%Y-%m-%d %H:%M:%S"));
        let seconds = completed.signed_duration_since(job.created_at).num_seconds();
        println!("  Duration:    {}s", seconds);
    }

    if let Some(reason) = &job.failure_reason {
        println!("\n{}", "Error:".bold());
        println!("{}", reason.red());
    }
}

/// Print the artifacts of a finished operation
///
/// Inline videos are written to `output_dir` as `<stem>-<n>.mp4`.
pub async fn print_videos(videos: &[Video], output_dir: &Path, stem: &str) -> Result<()> {
    if videos.is_empty() {
        println!("{}", "Operation finished without returning any video.".yellow());
        return Ok(());
    }

    println!("\n{}", format!("{} video(s):", videos.len()).bold());
    for (index, video) in videos.iter().enumerate() {
        if let Some(uri) = &video.uri {
            println!("  {} {}", "▸".cyan(), uri);
        }

        if let Some(decoded) = video.decode_bytes() {
            let bytes = decoded.context("Video payload is not valid base64")?;
            let path = save_video(output_dir, stem, index + 1, &bytes).await?;
            println!("  {} {}", "▸".cyan(), path.display());
        }
    }

    Ok(())
}

/// Path of the n-th video of a job (1-based)
pub fn video_path(output_dir: &Path, stem: &str, n: usize) -> PathBuf {
    output_dir.join(format!("{}-{}.mp4", stem, n))
}

async fn save_video(output_dir: &Path, stem: &str, n: usize, bytes: &[u8]) -> Result<PathBuf> {
    tokio::fs::create_dir_all(output_dir)
        .await
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let path = video_path(output_dir, stem, n);
    tokio::fs::write(&path, bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(path)
}

/// Print remediation for a client error, if one is known
pub fn print_hint(error: &ClientError) {
    if let Some(hint) = error.hint() {
        eprintln!("{} {}", "hint:".yellow().bold(), hint);
    }
}
