//! Telegram adapter

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::errors::TransportError;
use crate::domain::entities::Inbound;
use crate::domain::traits::Transport;

/// Telegram API base URL
const API_BASE: &str = "https://api.telegram.org";

/// Telegram update type
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub username: Option<String>,
}

/// Bot information
#[derive(Debug, Clone)]
pub struct BotInfo {
    pub id: i64,
    pub name: String,
    pub username: String,
}

/// Telegram bot adapter
pub struct TelegramAdapter {
    token: String,
    client: Client,
    info: BotInfo,
}

impl TelegramAdapter {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            client: Client::new(),
            info: BotInfo {
                id: 0,
                name: "riel-bot".to_string(),
                username: "riel_bot".to_string(),
            },
        }
    }

    /// Get the API URL for a method
    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", API_BASE, self.token, method)
    }

    pub fn bot_info(&self) -> &BotInfo {
        &self.info
    }

    /// Fetch bot info from Telegram API
    pub async fn fetch_bot_info(&mut self) -> Result<(), TransportError> {
        #[derive(Deserialize)]
        struct Response {
            result: BotInfoResponse,
        }

        #[derive(Deserialize)]
        struct BotInfoResponse {
            id: i64,
            first_name: String,
            username: String,
        }

        let url = self.api_url("getMe");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let data: Response = response
            .json()
            .await
            .map_err(|e| TransportError::Parse(e.to_string()))?;

        self.info = BotInfo {
            id: data.result.id,
            name: data.result.first_name,
            username: data.result.username,
        };

        Ok(())
    }

    /// Get updates from Telegram using getUpdates API
    pub async fn get_updates(&self, offset: i64, timeout: i64) -> Result<Vec<Update>, TransportError> {
        #[derive(Serialize)]
        struct GetUpdatesRequest {
            offset: i64,
            timeout: i64,
            allowed_updates: Vec<String>,
        }

        #[derive(Deserialize)]
        struct Response {
            result: Vec<Update>,
        }

        let url = self.api_url("getUpdates");
        let request = GetUpdatesRequest {
            offset,
            timeout,
            allowed_updates: vec!["message".to_string()],
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(TransportError::Api(format!(
                "Telegram API error: {}",
                response.status()
            )));
        }

        let data: Response = response
            .json()
            .await
            .map_err(|e| TransportError::Parse(e.to_string()))?;

        Ok(data.result)
    }

    /// Get the next update offset
    pub fn get_next_offset(updates: &[Update]) -> i64 {
        updates.iter().map(|u| u.update_id + 1).max().unwrap_or(0)
    }

    /// Register bot commands with Telegram
    pub async fn register_commands(&self) -> Result<(), TransportError> {
        #[derive(Serialize)]
        struct Command {
            command: String,
            description: String,
        }

        #[derive(Serialize)]
        struct SetMyCommandsRequest {
            commands: Vec<Command>,
        }

        let commands = vec![
            Command {
                command: "start".to_string(),
                description: "Start the bot".to_string(),
            },
            Command {
                command: "add".to_string(),
                description: "Record an expense: /add <amount> <currency> <remark>".to_string(),
            },
            Command {
                command: "summary".to_string(),
                description: "Monthly chart and expense summary".to_string(),
            },
            Command {
                command: "clear".to_string(),
                description: "Delete all expenses except this month".to_string(),
            },
        ];

        let url = self.api_url("setMyCommands");
        let request = SetMyCommandsRequest { commands };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let error = response.text().await.unwrap_or_default();
            return Err(TransportError::Api(format!(
                "Failed to register commands: {}",
                error
            )));
        }

        tracing::info!("Registered bot commands with Telegram");
        Ok(())
    }
}

impl Message {
    /// Map a Telegram message onto the dispatcher's inbound shape.
    pub fn to_inbound(&self) -> Inbound {
        let username = self
            .chat
            .username
            .clone()
            .or_else(|| self.from.as_ref().and_then(|u| u.username.clone()))
            .or_else(|| self.from.as_ref().and_then(|u| u.first_name.clone()))
            .unwrap_or_else(|| self.chat.id.to_string());

        Inbound {
            chat_id: self.chat.id,
            username,
            is_personal: self.chat.kind == "private",
            text: self.text.clone().unwrap_or_default(),
        }
    }
}

#[async_trait]
impl Transport for TelegramAdapter {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), TransportError> {
        #[derive(Serialize)]
        struct SendMessageRequest {
            chat_id: String,
            text: String,
        }

        tracing::debug!("Sending to {}: {}", chat_id, text);

        let url = self.api_url("sendMessage");
        let request = SendMessageRequest {
            chat_id: chat_id.to_string(),
            text: text.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(TransportError::Api(format!(
                "Telegram API error: {}",
                response.status()
            )));
        }

        Ok(())
    }

    async fn send_photo(&self, chat_id: i64, bytes: &[u8]) -> Result<(), TransportError> {
        let part = reqwest::multipart::Part::bytes(bytes.to_vec())
            .file_name("chart.svg")
            .mime_str("image/svg+xml")
            .map_err(|e| TransportError::Api(e.to_string()))?;
        let form = reqwest::multipart::Form::new()
            .text("chat_id", chat_id.to_string())
            .part("photo", part);

        let url = self.api_url("sendPhoto");
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(TransportError::Api(format!(
                "Telegram API error: {}",
                response.status()
            )));
        }

        Ok(())
    }
}
