mod config;
mod error;
mod orchestrator;
mod storage;
mod core {
    pub mod instruction;
    pub mod materializer;
    pub mod scene;
}
mod ai {
    pub mod client;
    pub mod prompts;
}

use ai::client::OpenAiClient;
use config::{Config, Settings};
use crate::core::scene::SceneGraph;
use dotenv::dotenv;
use orchestrator::{Orchestrator, UiMessage};
use storage::FileStorage;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

/// Reads UI messages as JSON lines on stdin and writes plugin messages as
/// JSON lines on stdout. The finished scene is printed at EOF.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::builder().filter_level(log::LevelFilter::Info).parse_default_env().init();

    let settings = Settings::from_env()?;
    let client = OpenAiClient::new(&settings);
    let storage = FileStorage::new(&settings.storage_path);

    let (ui_tx, mut ui_rx) = mpsc::unbounded_channel();
    let printer = tokio::spawn(async move {
        while let Some(message) = ui_rx.recv().await {
            match serde_json::to_string(&message) {
                Ok(line) => println!("{line}"),
                Err(e) => log::error!("Could not encode UI message: {e}"),
            }
        }
    });

    let mut orchestrator =
        Orchestrator::new(Config::from_env(), client, SceneGraph::new(), storage, ui_tx);
    orchestrator.start().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<UiMessage>(&line) {
            Ok(message) => orchestrator.handle(message).await,
            Err(e) => log::warn!("Ignoring malformed UI message: {e}"),
        }
    }

    let scene = orchestrator.canvas().snapshot();
    drop(orchestrator);
    printer.await?;

    println!("{}", serde_json::to_string_pretty(&scene)?);
    Ok(())
}
