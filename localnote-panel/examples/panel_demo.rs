//! Stream a generation from a local Ollama server to stdout.
//!
//! Run with a server listening on the default port:
//! `cargo run -p localnote-panel --example panel_demo`

use std::io::Write;

use localnote_panel::{Panel, PromptStyle, Settings};
use localnote_types::{DisplaySink, SinkNotice};

struct StdoutSink;

impl DisplaySink for StdoutSink {
    fn append_delta(&mut self, text: &str) {
        print!("{text}");
        let _ = std::io::stdout().flush();
    }

    fn append_notice(&mut self, notice: &SinkNotice) {
        println!("{notice}");
    }
}

#[tokio::main]
async fn main() {
    let settings = Settings::default();
    if settings.write_to_log_file {
        tracing_subscriber::fmt::init();
    }

    let mut panel = Panel::open(settings).prompt_style(PromptStyle::Raw);
    println!(
        "using {} at {}",
        panel.settings().default_model,
        panel.settings().ollama_url
    );

    match panel.available_models().await {
        Ok(models) => println!("installed models: {models:?}"),
        Err(e) => println!("could not list models: {e}"),
    }

    let generation = panel
        .begin("Why is the sky blue? Answer in one sentence.")
        .expect("panel is idle");

    let mut sink = StdoutSink;
    let outcome = generation.run(&mut sink).await;

    println!();
    println!("status: {:?}", outcome.status);
    if let Some(stats) = outcome.stats {
        println!(
            "tokens: {} in / {} out",
            stats.input_tokens, stats.output_tokens
        );
    }
}
