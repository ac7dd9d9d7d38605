//! Status command handler
//!
//! Checks an operation submitted by an earlier, possibly detached, run.
//! Nothing is tracked locally: the snapshot is printed as returned.

use std::path::Path;

use anyhow::Result;
use colored::*;
use veo_client::OperationClient;
use veo_core::domain::operation::OperationOutcome;

use crate::config::Config;
use crate::output::{print_hint, print_videos};

pub async fn handle_status(operation_name: &str, output_dir: &Path, config: &Config) -> Result<()> {
    let client = config.client();

    let operation = match client.check_status(operation_name).await {
        Ok(operation) => operation,
        Err(e) => {
            print_hint(&e);
            return Err(e.into());
        }
    };

    println!("{}", "Operation:".bold());
    println!("  Name:   {}", operation.name.dimmed());

    match operation.outcome() {
        OperationOutcome::InProgress => {
            println!("  Status: {}", "running".cyan());
        }
        OperationOutcome::Succeeded(videos) => {
            println!("  Status: {}", "completed".green());
            print_videos(videos, output_dir, operation_stem(operation_name)).await?;
        }
        OperationOutcome::Failed(error) => {
            println!("  Status: {}", "failed".red());
            println!("\n{}", "Error:".bold());
            println!("{} (code {})", error.message.red(), error.code);
            anyhow::bail!("Generation failed");
        }
    }

    Ok(())
}

/// Last path segment of an operation name, used to name saved files
fn operation_stem(operation_name: &str) -> &str {
    operation_name
        .rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or("operation")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_stem() {
        assert_eq!(
            operation_stem("projects/p/locations/us-central1/publishers/google/models/m/operations/abc-123"),
            "abc-123"
        );
        assert_eq!(operation_stem("op-1"), "op-1");
        assert_eq!(operation_stem(""), "operation");
    }
}
