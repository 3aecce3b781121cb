//! Upload a prompts file and generate a batch of videos.
//!
//! Requires a running generator service at http://127.0.0.1:5000 and a
//! `prompts.txt` file (one prompt per line) in the working directory.
//!
//! ```sh
//! cargo run --example batch_generation
//! ```

use std::sync::Arc;

use veogen_rs::{
    GenerationOutcome, GenerationRequest, OverlayGuard, OverlaySurface, PromptBatch, StatusPoller,
    VeoClient,
};

/// Console stand-in for a blocking UI overlay.
struct ConsoleOverlay;

impl OverlaySurface for ConsoleOverlay {
    fn display(&self, message: &str) -> veogen_rs::Result<()> {
        println!("[overlay] {}", message);
        Ok(())
    }

    fn conceal(&self) -> veogen_rs::Result<()> {
        println!("[overlay] dismissed");
        Ok(())
    }

    fn clear_residue(&self) -> veogen_rs::Result<()> {
        Ok(())
    }
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let client = VeoClient::new("http://127.0.0.1:5000");

    // Check connection
    if !client.health().await? {
        eprintln!("Generator service is not responding");
        return Ok(());
    }
    println!("Generator is online");

    // Preview the batch locally before anything leaves the machine
    let batch = PromptBatch::from_file("prompts.txt")?;
    println!("Loaded {} prompt(s):", batch.len());
    for (i, prompt) in batch.preview(5).iter().enumerate() {
        println!("  {}: {}", i + 1, prompt);
    }

    let overlay = OverlayGuard::new(Arc::new(ConsoleOverlay));

    // Upload prompts, keeping the overlay up for the duration
    overlay.show("Uploading prompts...")?;
    let upload = client.upload_prompts("prompts.txt").await;
    overlay.hide();
    let upload = upload?;
    println!("{} ({} prompts)", upload.message, upload.prompts_count);

    // Start the batch
    let request = GenerationRequest::new()
        .aspect_ratio("16:9")
        .duration(5)
        .resolution("1080p");
    let started = client.start_generation(&request).await?;
    println!("{}", started.message);

    // Poll to completion
    let poller = StatusPoller::new(client.clone());
    let outcome = poller
        .run(|progress| match &progress.current_prompt {
            Some(prompt) => println!(
                "  {}/{} ({}%) {}",
                progress.completed,
                progress.total,
                progress.percent(),
                prompt
            ),
            None => println!(
                "  {}/{} ({}%)",
                progress.completed,
                progress.total,
                progress.percent()
            ),
        })
        .await?;

    match outcome {
        Some(GenerationOutcome::Completed { videos }) => {
            println!("Done! Generated {} video(s)", videos.len());
            for video in &videos {
                let path = client.save_video(video, ".").await?;
                println!("Saved: {}", path.display());
            }
        }
        Some(GenerationOutcome::Failed { error }) => eprintln!("Generation failed: {}", error),
        None => eprintln!("A polling run was already active"),
    }

    Ok(())
}
