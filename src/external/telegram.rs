use crate::config::TelegramConfig;
use crate::error::{AppError, AppResult};
use crate::notifications::Notifier;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
pub struct SendMessageRequest<'a> {
    pub chat_id: i64,
    pub text: &'a str,
    pub disable_web_page_preview: bool,
}

#[derive(Debug, Deserialize)]
pub struct TelegramResponse {
    pub ok: bool,
    pub description: Option<String>,
    pub error_code: Option<i32>,
}

/// Bot API client used for counterpart notifications
#[derive(Clone)]
pub struct TelegramNotifier {
    client: Client,
    config: TelegramConfig,
}

impl TelegramNotifier {
    pub fn new(config: TelegramConfig) -> AppResult<Self> {
        if config.bot_token.is_empty() {
            return Err(AppError::ConfigError(
                "telegram.bot_token is required when notifications are enabled".to_string(),
            ));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client, config })
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.bot_token,
            method
        )
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send_message(&self, chat_id: i64, text: &str) -> AppResult<()> {
        let body = SendMessageRequest {
            chat_id,
            text,
            disable_web_page_preview: true,
        };

        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let raw = response.text().await?;
        let parsed: Option<TelegramResponse> = serde_json::from_str(&raw).ok();

        match parsed {
            Some(r) if status.is_success() && r.ok => {
                log::debug!("Telegram message delivered to {chat_id}");
                Ok(())
            }
            Some(r) => Err(AppError::ExternalApiError(format!(
                "sendMessage to {} failed ({}): {}",
                chat_id,
                r.error_code.unwrap_or(status.as_u16() as i32),
                r.description.unwrap_or_default()
            ))),
            None => Err(AppError::ExternalApiError(format!(
                "sendMessage to {chat_id} failed with status {status}: {raw}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_token() {
        let config = TelegramConfig::default();
        assert!(matches!(
            TelegramNotifier::new(config),
            Err(AppError::ConfigError(_))
        ));
    }

    #[test]
    fn test_method_url() {
        let config = TelegramConfig {
            bot_token: "123:abc".to_string(),
            api_base_url: "http://localhost:8081/".to_string(),
            enabled: true,
        };
        let notifier = TelegramNotifier::new(config).unwrap();
        assert_eq!(
            notifier.method_url("sendMessage"),
            "http://localhost:8081/bot123:abc/sendMessage"
        );
    }

    #[test]
    fn test_parse_error_response() {
        let raw = r#"{"ok":false,"error_code":403,"description":"Forbidden: bot was blocked by the user"}"#;
        let parsed: TelegramResponse = serde_json::from_str(raw).unwrap();
        assert!(!parsed.ok);
        assert_eq!(parsed.error_code, Some(403));
    }
}
