use super::prompts;
use crate::config::{Config, Settings};
use crate::core::instruction::{DesignDocument, DesignInstruction};
use crate::error::DesignError;
use schemars::schema_for;
use serde_json::{json, Value};

/// Fallback when a rejected request carries no `error.message`.
const REJECTED_FALLBACK: &str = "API request failed";

pub struct OpenAiClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    temperature: f32,
    system_prompt: String,
}

impl OpenAiClient {
    pub fn new(settings: &Settings) -> Self {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        Self {
            client: builder.build().unwrap_or_default(),
            endpoint: settings.endpoint.clone(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            system_prompt: system_prompt(),
        }
    }

    /// Asks the model for a design and returns its top-level elements.
    pub async fn generate(
        &self,
        config: &Config,
        prompt: &str,
    ) -> Result<Vec<DesignInstruction>, DesignError> {
        let payload = self.request_body(prompt);

        log::info!("Requesting design from {} ({})", self.endpoint, self.model);
        let res = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&config.api_key)
            .header("OpenAI-Beta", "assistants=v1")
            .json(&payload)
            .send()
            .await
            .inspect_err(|e| log::error!("Transport failure: {e}"))?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            log::error!("API Error {status}: {body}");
            return Err(DesignError::RemoteRejection(rejection_message(&body)));
        }

        let text = res.text().await?;
        let body: Value = serde_json::from_str(&text)
            .inspect_err(|e| log::error!("Response body is not JSON: {e}"))?;
        let content = body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                log::error!("Response carried no message content");
                DesignError::MissingContent
            })?;

        let document: DesignDocument = serde_json::from_str(clean_json_block(content))
            .inspect_err(|e| log::error!("Design document did not parse: {e}"))?;

        let elements = document.into_elements();
        log::info!("Model returned {} top-level elements", elements.len());
        Ok(elements)
    }

    fn request_body(&self, prompt: &str) -> Value {
        json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": self.system_prompt },
                { "role": "user", "content": prompt }
            ],
            "response_format": { "type": "json_object" },
            "temperature": self.temperature
        })
    }
}

fn system_prompt() -> String {
    let schema = schema_for!(DesignDocument);
    let schema_text = serde_json::to_string_pretty(&schema).unwrap_or_default();
    format!("{}\nRESPONSE SCHEMA:\n{}", prompts::DESIGN_PROMPT, schema_text)
}

fn rejection_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| REJECTED_FALLBACK.to_string())
}

fn clean_json_block(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings_for(server: &MockServer) -> Settings {
        Settings {
            endpoint: format!("{}/v1/chat/completions", server.uri()),
            ..Settings::default()
        }
    }

    fn config(key: &str) -> Config {
        Config { api_key: key.into() }
    }

    fn completion(content: &str) -> Value {
        json!({ "choices": [{ "message": { "role": "assistant", "content": content } }] })
    }

    #[tokio::test]
    async fn parses_elements_from_message_content() {
        let server = MockServer::start().await;
        let content = json!({
            "elements": [
                { "type": "frame", "properties": { "name": "Card" }, "children": [
                    { "type": "text", "properties": { "characters": "Hi" } }
                ]},
                { "type": "rectangle", "properties": {} }
            ]
        })
        .to_string();
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "model": "gpt-4-1106-preview",
                "response_format": { "type": "json_object" },
                "messages": [{ "role": "system" }, { "role": "user", "content": "a login card" }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(&content)))
            .expect(1)
            .mount(&server)
            .await;

        let client = OpenAiClient::new(&settings_for(&server));
        let elements = client.generate(&config("sk-test"), "a login card").await.unwrap();

        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].children.len(), 1);
        assert_eq!(elements[1].kind, "rectangle");
    }

    #[tokio::test]
    async fn missing_elements_is_an_empty_design() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(completion(r#"{"layout": "none"}"#)),
            )
            .mount(&server)
            .await;

        let client = OpenAiClient::new(&settings_for(&server));
        assert!(client.generate(&config("k"), "anything").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn null_elements_is_an_empty_design() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(completion(r#"{"elements": null}"#)),
            )
            .mount(&server)
            .await;

        let client = OpenAiClient::new(&settings_for(&server));
        let elements = client.generate(&config("k"), "anything").await.unwrap();
        assert!(elements.is_empty());
    }

    #[tokio::test]
    async fn fenced_content_is_unwrapped() {
        let server = MockServer::start().await;
        let fenced = "```json\n{\"elements\": [{\"type\": \"line\", \"properties\": {}}]}\n```";
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(fenced)))
            .mount(&server)
            .await;

        let client = OpenAiClient::new(&settings_for(&server));
        let elements = client.generate(&config("k"), "a divider").await.unwrap();
        assert_eq!(elements[0].kind, "line");
    }

    #[tokio::test]
    async fn rejection_surfaces_remote_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(429)
                    .set_body_json(json!({ "error": { "message": "rate limited" } })),
            )
            .mount(&server)
            .await;

        let client = OpenAiClient::new(&settings_for(&server));
        let err = client.generate(&config("k"), "x").await.unwrap_err();
        assert!(matches!(err, DesignError::RemoteRejection(_)));
        assert_eq!(err.to_string(), "rate limited");
    }

    #[tokio::test]
    async fn rejection_without_message_uses_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .mount(&server)
            .await;

        let client = OpenAiClient::new(&settings_for(&server));
        let err = client.generate(&config("k"), "x").await.unwrap_err();
        assert_eq!(err.to_string(), "API request failed");
    }

    #[tokio::test]
    async fn unparseable_content_is_a_generic_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion("Sure! Here is your design.")),
            )
            .mount(&server)
            .await;

        let client = OpenAiClient::new(&settings_for(&server));
        let err = client.generate(&config("k"), "x").await.unwrap_err();
        assert!(matches!(err, DesignError::Parse(_)));
        assert_eq!(err.to_string(), "Failed to generate design instructions");
    }

    #[tokio::test]
    async fn missing_choices_is_a_generic_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .mount(&server)
            .await;

        let client = OpenAiClient::new(&settings_for(&server));
        let err = client.generate(&config("k"), "x").await.unwrap_err();
        assert!(matches!(err, DesignError::MissingContent));
    }

    #[tokio::test]
    async fn configured_timeout_is_a_transport_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion(r#"{"elements": []}"#))
                    .set_delay(std::time::Duration::from_secs(3)),
            )
            .mount(&server)
            .await;
        let settings = Settings {
            timeout: Some(std::time::Duration::from_millis(200)),
            ..settings_for(&server)
        };

        let client = OpenAiClient::new(&settings);
        let err = client.generate(&config("k"), "x").await.unwrap_err();
        assert!(matches!(err, DesignError::Transport(_)));
    }

    #[tokio::test]
    async fn transport_failure_is_a_generic_failure() {
        let settings = Settings {
            endpoint: "http://127.0.0.1:9/v1/chat/completions".into(),
            ..Settings::default()
        };
        let client = OpenAiClient::new(&settings);
        let err = client.generate(&config("k"), "x").await.unwrap_err();
        assert!(matches!(err, DesignError::Transport(_)));
        assert_eq!(err.to_string(), "Failed to generate design instructions");
    }

    #[test]
    fn system_prompt_is_fixed_and_carries_the_schema() {
        let prompt = system_prompt();
        assert_eq!(prompt, system_prompt());
        assert!(prompt.contains("Example response format"));
        assert!(prompt.contains("RESPONSE SCHEMA"));
        assert!(prompt.contains("\"elements\""));
    }

    #[test]
    fn fences_are_stripped() {
        assert_eq!(clean_json_block("```json\n{}\n```"), "{}");
        assert_eq!(clean_json_block("```\n{}\n```"), "{}");
        assert_eq!(clean_json_block("  {\"a\":1} "), "{\"a\":1}");
    }
}
