use crate::ai::client::OpenAiClient;
use crate::config::Config;
use crate::core::instruction::DesignInstruction;
use crate::core::materializer::Materializer;
use crate::core::scene::{Canvas, NodeId, NodeKind};
use crate::error::DesignError;
use crate::storage::{ClientStorage, API_KEY_STORAGE_KEY};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::mpsc::UnboundedSender;

const GENERATE_FALLBACK: &str = "Failed to generate design";
const ROOT_FRAME_NAME: &str = "Generated Design";
const ROOT_PADDING: f64 = 32.0;
const ROOT_ITEM_SPACING: f64 = 24.0;

/// Messages sent by the plugin UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum UiMessage {
    SetApiKey {
        #[serde(rename = "apiKey")]
        api_key: String,
    },
    GenerateDesign {
        prompt: String,
    },
}

/// Messages posted back to the plugin UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum PluginMessage {
    HideApiKey,
    Success,
    Error { message: String },
}

pub struct Orchestrator<C: Canvas, S: ClientStorage> {
    config: Config,
    client: OpenAiClient,
    canvas: C,
    storage: S,
    ui: UnboundedSender<PluginMessage>,
}

impl<C: Canvas, S: ClientStorage> Orchestrator<C, S> {
    pub fn new(
        config: Config,
        client: OpenAiClient,
        canvas: C,
        storage: S,
        ui: UnboundedSender<PluginMessage>,
    ) -> Self {
        Self { config, client, canvas, storage, ui }
    }

    /// Restores a persisted API key, telling the UI to hide its key field
    /// when one is found.
    pub async fn start(&mut self) {
        match self.storage.get(API_KEY_STORAGE_KEY).await {
            Ok(Some(saved)) if !saved.is_empty() => {
                log::info!("Restored saved API key");
                self.config.api_key = saved;
                self.post(PluginMessage::HideApiKey);
            }
            Ok(_) => log::debug!("No saved API key"),
            Err(e) => log::warn!("Could not read saved API key: {e}"),
        }
    }

    /// Runs one UI message to completion.
    pub async fn handle(&mut self, message: UiMessage) {
        match message {
            UiMessage::SetApiKey { api_key } => {
                self.config.api_key = api_key;
                if let Err(e) = self.storage.set(API_KEY_STORAGE_KEY, &self.config.api_key).await {
                    log::error!("Could not persist API key: {e}");
                }
            }
            UiMessage::GenerateDesign { prompt } => {
                let reply = match self.generate_design(&prompt).await {
                    Ok(root) => {
                        log::info!("Design ready under {root}");
                        PluginMessage::Success
                    }
                    Err(e) => {
                        log::error!("Design generation failed: {e:?}");
                        let message = e.to_string();
                        let message = if message.is_empty() {
                            GENERATE_FALLBACK.to_string()
                        } else {
                            message
                        };
                        PluginMessage::Error { message }
                    }
                };
                self.post(reply);
            }
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    async fn generate_design(&mut self, prompt: &str) -> Result<NodeId, DesignError> {
        log::info!("Generating design for prompt: {prompt}");
        let instructions = self.client.generate(&self.config, prompt).await?;

        let root = self.create_root_frame()?;
        let built = self.materialize_all(root, &instructions).await?;
        log::info!("Materialized {built} of {} top-level elements", instructions.len());

        self.canvas.scroll_and_zoom_into_view(&[root]);
        Ok(root)
    }

    async fn materialize_all(
        &mut self,
        root: NodeId,
        instructions: &[DesignInstruction],
    ) -> Result<usize, DesignError> {
        let mut built = 0;
        for instruction in instructions {
            let node = Materializer::materialize(&mut self.canvas, instruction, None).await?;
            if let Some(node) = node {
                self.canvas.append_child(root, node)?;
                built += 1;
            }
        }
        Ok(built)
    }

    fn create_root_frame(&mut self) -> Result<NodeId, DesignError> {
        let frame = self.canvas.create_node(NodeKind::Frame);
        let defaults: [(&str, Value); 10] = [
            ("name", json!(ROOT_FRAME_NAME)),
            ("layoutMode", json!("VERTICAL")),
            ("primaryAxisSizingMode", json!("AUTO")),
            ("counterAxisSizingMode", json!("AUTO")),
            ("paddingLeft", json!(ROOT_PADDING)),
            ("paddingRight", json!(ROOT_PADDING)),
            ("paddingTop", json!(ROOT_PADDING)),
            ("paddingBottom", json!(ROOT_PADDING)),
            ("itemSpacing", json!(ROOT_ITEM_SPACING)),
            ("fills", json!([{ "type": "SOLID", "color": { "r": 0.98, "g": 0.98, "b": 0.98 } }])),
        ];
        for (field, value) in defaults {
            self.canvas.set_property(frame, field, value)?;
        }
        Ok(frame)
    }

    fn post(&self, message: PluginMessage) {
        if self.ui.send(message).is_err() {
            log::warn!("UI channel closed; dropping message");
        }
    }
}
