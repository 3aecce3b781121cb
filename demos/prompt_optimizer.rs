//! Turn a plain description into an optimized generation prompt.
//!
//! Pass the description as the first argument, or run without arguments
//! for a canned one.
//!
//! ```sh
//! cargo run --example prompt_optimizer -- "a fox running through snow"
//! ```

use veogen_rs::VeoClient;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let client = VeoClient::new("http://127.0.0.1:5000");

    let description = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "a cat playing piano on a rooftop at sunset".to_string());

    let result = client.optimize_prompt(&description).await?;
    println!("Original:  {}", description);
    println!("Optimized: {}", result.optimized_prompt);

    Ok(())
}
