//! Gemini collaborator client
//!
//! One HTTP client serving both seams: reply text is streamed from
//! `:streamGenerateContent` over SSE, speech is a single `:generateContent`
//! call with the audio response modality. Speech payloads come back as
//! base64 PCM inside `inlineData`.

use async_trait::async_trait;
use futures::StreamExt;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::backends::{ChatRole, ChatTurn, FragmentStream, GenerationBackend, SpeechBackend};
use crate::config::Config;
use crate::{Error, Result};

/// Fragments buffered between the SSE reader task and the consumer
const FRAGMENT_CHANNEL_CAPACITY: usize = 32;

/// Client for the Gemini generation and speech APIs
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    text_model: String,
    tts_model: String,
}

impl GeminiClient {
    /// Build a client from configuration
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            text_model: config.text_model.clone(),
            tts_model: config.tts_model.clone(),
        }
    }

    fn model_url(&self, model: &str, operation: &str) -> String {
        format!("{}/models/{model}:{operation}", self.base_url)
    }
}

// --- Wire types (Gemini REST shapes) ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Deserialize, Serialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mime_type: Option<String>,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<&'static str>,
    speech_config: SpeechConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeechConfig {
    voice_config: VoiceConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceConfig {
    prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PrebuiltVoiceConfig {
    voice_name: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl Content {
    fn text(text: &str) -> Self {
        Self {
            role: None,
            parts: vec![Part {
                text: Some(text.to_string()),
                inline_data: None,
            }],
        }
    }

    fn turn(role: &str, text: &str) -> Self {
        Self {
            role: Some(role.to_string()),
            ..Self::text(text)
        }
    }
}

/// Concatenated text of the first candidate's parts
fn extract_text(response: &GenerateResponse) -> Option<String> {
    let content = response.candidates.first()?.content.as_ref()?;
    let mut text = String::new();
    for part in &content.parts {
        if let Some(t) = &part.text {
            text.push_str(t);
        }
    }
    if text.is_empty() { None } else { Some(text) }
}

/// Base64 payload of the first candidate's inline audio part
fn extract_audio(response: GenerateResponse) -> Option<String> {
    response
        .candidates
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .find_map(|part| part.inline_data)
        .map(|inline| inline.data)
}

fn history_contents(history: &[ChatTurn], user_text: &str) -> Vec<Content> {
    let mut contents: Vec<Content> = history
        .iter()
        .map(|turn| {
            let role = match turn.role {
                ChatRole::User => "user",
                ChatRole::Assistant => "model",
            };
            Content::turn(role, &turn.text)
        })
        .collect();
    contents.push(Content::turn("user", user_text));
    contents
}

/// Forward SSE `data:` lines from the response body as reply fragments
///
/// Lines may split across network chunks, so bytes are buffered until a
/// newline completes one. The channel closing marks normal end of reply;
/// transport and parse failures surface as a final `Err` item.
async fn pump_sse(response: reqwest::Response, tx: mpsc::Sender<Result<String>>) {
    let mut body = response.bytes_stream();
    let mut buffer: Vec<u8> = Vec::new();

    while let Some(chunk) = body.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                let _ = tx.send(Err(Error::Stream(e.to_string()))).await;
                return;
            }
        };

        buffer.extend_from_slice(&chunk);
        while let Some(pos) = buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line);
            let Some(payload) = line.trim().strip_prefix("data: ") else {
                continue;
            };

            match serde_json::from_str::<GenerateResponse>(payload) {
                Ok(event) => {
                    let Some(text) = extract_text(&event) else {
                        continue;
                    };
                    if tx.send(Ok(text)).await.is_err() {
                        // Consumer dropped the stream; stop reading
                        return;
                    }
                }
                Err(e) => {
                    let _ = tx
                        .send(Err(Error::Stream(format!("malformed stream event: {e}"))))
                        .await;
                    return;
                }
            }
        }
    }
}

#[async_trait]
impl GenerationBackend for GeminiClient {
    async fn stream_reply(
        &self,
        system_instruction: &str,
        history: &[ChatTurn],
        user_text: &str,
    ) -> Result<FragmentStream> {
        let request = GenerateRequest {
            contents: history_contents(history, user_text),
            system_instruction: Some(Content::text(system_instruction)),
            generation_config: None,
        };

        let url = self.model_url(&self.text_model, "streamGenerateContent?alt=sse");
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Generation(format!(
                "generation API error {status}: {body}"
            )));
        }

        tracing::debug!(model = %self.text_model, "reply stream opened");

        let (tx, rx) = mpsc::channel(FRAGMENT_CHANNEL_CAPACITY);
        tokio::spawn(pump_sse(response, tx));

        Ok(Box::pin(ReceiverStream::new(rx)))
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

#[async_trait]
impl SpeechBackend for GeminiClient {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Option<String>> {
        let request = GenerateRequest {
            contents: vec![Content::text(text)],
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                response_modalities: vec!["AUDIO"],
                speech_config: SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: voice.to_string(),
                        },
                    },
                },
            }),
        };

        let url = self.model_url(&self.tts_model, "generateContent");
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Synthesis(format!(
                "speech API error {status}: {body}"
            )));
        }

        let parsed: GenerateResponse = response.json().await?;
        let payload = extract_audio(parsed);
        if payload.is_none() {
            tracing::debug!(voice, "speech response carried no audio payload");
        }
        Ok(payload)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}
