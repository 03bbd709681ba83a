use crate::models::{InlineKeyboardMarkup, SendMessageRequest, SentMessage, TelegramResponse};
use anyhow::{anyhow, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Clone)]
pub struct TelegramApi {
    client: reqwest::Client,
    base_url: String,
}

impl TelegramApi {
    pub fn new(token: String) -> Self {
        Self::new_with_base_url(format!("https://api.telegram.org/bot{}", token))
    }

    pub fn new_with_base_url(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_markup: Option<&InlineKeyboardMarkup>,
    ) -> Result<i64> {
        let body = SendMessageRequest {
            chat_id,
            text,
            parse_mode: Some("HTML"),
            reply_markup,
        };

        let sent: SentMessage = self.post("sendMessage", &body).await?;
        Ok(sent.message_id)
    }

    pub async fn set_webhook(&self, url: &str, secret_token: Option<&str>) -> Result<()> {
        let mut body = serde_json::json!({ "url": url });
        if let Some(secret) = secret_token {
            body["secret_token"] = serde_json::Value::from(secret);
        }

        let _: bool = self.post("setWebhook", &body).await?;
        Ok(())
    }

    pub async fn delete_webhook(&self) -> Result<()> {
        let _: bool = self.post("deleteWebhook", &serde_json::json!({})).await?;
        Ok(())
    }

    pub async fn get_webhook_info(&self) -> Result<serde_json::Value> {
        let url = format!("{}/getWebhookInfo", self.base_url);
        let resp: TelegramResponse<serde_json::Value> =
            self.client.get(&url).send().await?.json().await?;
        unwrap_response(resp, "getWebhookInfo")
    }

    async fn post<B, T>(&self, method: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, method);
        let resp: TelegramResponse<T> = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await?
            .json()
            .await?;
        unwrap_response(resp, method)
    }
}

fn unwrap_response<T>(resp: TelegramResponse<T>, method: &str) -> Result<T> {
    if !resp.ok {
        let error_msg = resp
            .description
            .unwrap_or_else(|| format!("{method} failed"));
        return Err(anyhow!("Telegram API error: {}", error_msg));
    }

    resp.result
        .ok_or_else(|| anyhow!("Telegram API error: missing result in response"))
}
