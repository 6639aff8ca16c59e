//! OpenAI Chat Completions 客户端
//!
//! 带着完整的会话历史调用 /v1/chat/completions，返回助手回复的文本

mod error;

use std::time::Duration;

use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

pub use error::OpenAiError;

use crate::session::ConversationTurn;

/// 聊天接口响应
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// OpenAI API 客户端
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiClient {
    /// 创建新的客户端
    pub fn new(api_key: &str, model: &str, base_url: &str) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(60)).build()?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// 发送完整会话历史，获取助手回复
    ///
    /// 调用失败（网络错误、非 2xx、空回复）一律向上传播，不在这里重试
    pub async fn chat_completion(&self, messages: &[ConversationTurn]) -> Result<String> {
        let payload = serde_json::json!({
            "model": self.model,
            "messages": messages,
        });

        debug!("发送聊天请求: model={}, {} 条消息", self.model, messages.len());

        let resp = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header(reqwest::header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(OpenAiError::RequestFailed(status.as_u16(), body).into());
        }

        let data: ChatCompletionResponse = resp.json().await?;
        let answer = data
            .choices
            .into_iter()
            .next()
            .ok_or(OpenAiError::EmptyCompletion)?
            .message
            .content
            .ok_or(OpenAiError::EmptyContent)?;

        debug!("收到助手回复: {} 字符", answer.chars().count());
        Ok(answer)
    }
}
