//! Pick up a generation batch after a restart.
//!
//! Checks the server's status once: a batch still running is resumed
//! with live progress, a finished one just has its results listed.
//!
//! ```sh
//! cargo run --example resume_monitoring
//! ```

use veogen_rs::{GenerationOutcome, InitialStatus, StatusPoller, VeoClient};

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let client = VeoClient::new("http://127.0.0.1:5000");
    let poller = StatusPoller::new(client.clone());

    match poller.check_initial_status().await? {
        InitialStatus::InProgress => {
            println!("A batch is still running, resuming progress tracking");
            let outcome = poller
                .run(|p| println!("  {}/{} ({}%)", p.completed, p.total, p.percent()))
                .await?;
            match outcome {
                Some(GenerationOutcome::Completed { videos }) => {
                    println!("Done! {} video(s) ready", videos.len());
                }
                Some(GenerationOutcome::Failed { error }) => {
                    eprintln!("Batch failed: {}", error);
                }
                None => {}
            }
        }
        InitialStatus::Finished(videos) => {
            println!("A finished batch left {} video(s):", videos.len());
            for video in &videos {
                println!("  {}  ({})", video.download_path(), video.prompt);
            }
        }
        InitialStatus::Idle => println!("Nothing running and no results yet"),
    }

    Ok(())
}
