use async_trait::async_trait;
use relay_core::completion::error::ModelError;
use relay_core::completion::port::CompletionProvider;
use relay_core::upstream::entity::{UpstreamRequest, UpstreamTarget};
use relay_core::upstream::port::UpstreamClient;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Chat Completions 接口路径
pub const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// # Summary
/// OpenAI 兼容的文本生成实现。
///
/// # Invariants
/// - 鉴权 (Bearer) 由 `target` 负责，本结构体不持有密钥。
pub struct OpenAiCompletion {
    client: Arc<dyn UpstreamClient>,
    target: UpstreamTarget,
    model: String,
}

impl OpenAiCompletion {
    pub fn new(client: Arc<dyn UpstreamClient>, target: UpstreamTarget, model: impl Into<String>) -> Self {
        Self {
            client,
            target,
            model: model.into(),
        }
    }
}

#[derive(Serialize, Debug)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Serialize, Debug)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize, Debug)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize, Debug)]
struct ChatReply {
    content: Option<String>,
}

#[async_trait]
impl CompletionProvider for OpenAiCompletion {
    /// # Summary
    /// 调用 Chat Completions 接口生成文本。
    ///
    /// # Logic
    /// 1. 以单条 `user` 消息和 `max_tokens` 构建请求。
    /// 2. 解析响应，取第一个候选的 `message.content`。
    /// 3. 去除首尾空白后返回。
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, ModelError> {
        let payload = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens,
        };
        let body = serde_json::to_value(&payload).map_err(|e| ModelError::Malformed(e.to_string()))?;

        let response = self
            .client
            .call(&self.target, UpstreamRequest::post_json(CHAT_COMPLETIONS_PATH, body))
            .await?;

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| ModelError::Malformed(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(ModelError::EmptyCompletion)?;

        tracing::debug!(model = %self.model, max_tokens, chars = content.chars().count(), "completion received");
        Ok(content.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_core::test_utils::RecordingUpstreamClient;
    use relay_core::upstream::entity::RequestBody;
    use relay_core::upstream::error::UpstreamError;
    use std::time::Duration;

    fn target() -> UpstreamTarget {
        UpstreamTarget::new("openai", "https://api.openai.com", Duration::from_secs(60))
    }

    #[tokio::test]
    async fn test_complete_trims_first_choice() {
        let client = Arc::new(RecordingUpstreamClient::new());
        client
            .respond_ok(
                CHAT_COMPLETIONS_PATH,
                r#"{"choices":[{"message":{"role":"assistant","content":"  분석 결과\n"}},
                               {"message":{"role":"assistant","content":"second"}}]}"#,
            )
            .await;
        let provider = OpenAiCompletion::new(client.clone(), target(), "gpt-4");

        let text = provider.complete("hello", 500).await.unwrap();
        assert_eq!(text, "분석 결과");

        let calls = client.calls().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].body,
            RequestBody::Json(serde_json::json!({
                "model": "gpt-4",
                "messages": [{"role": "user", "content": "hello"}],
                "max_tokens": 500
            }))
        );
    }

    #[tokio::test]
    async fn test_empty_choices() {
        let client = Arc::new(RecordingUpstreamClient::new());
        client.respond_ok(CHAT_COMPLETIONS_PATH, r#"{"choices":[]}"#).await;
        let provider = OpenAiCompletion::new(client, target(), "gpt-4");
        assert_eq!(
            provider.complete("hello", 10).await,
            Err(ModelError::EmptyCompletion)
        );
    }

    #[tokio::test]
    async fn test_upstream_failure_is_model_error() {
        let client = Arc::new(RecordingUpstreamClient::new());
        client
            .respond_err(
                CHAT_COMPLETIONS_PATH,
                UpstreamError::Status {
                    target: "openai".to_string(),
                    status: 429,
                    body: "rate limited".to_string(),
                },
            )
            .await;
        let provider = OpenAiCompletion::new(client, target(), "gpt-4");
        let err = provider.complete("hello", 10).await.unwrap_err();
        assert!(matches!(err, ModelError::Upstream(_)));
        assert!(err.to_string().contains("429"));
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let client = Arc::new(RecordingUpstreamClient::new());
        client.respond_ok(CHAT_COMPLETIONS_PATH, "not json").await;
        let provider = OpenAiCompletion::new(client, target(), "gpt-4");
        assert!(matches!(
            provider.complete("hello", 10).await,
            Err(ModelError::Malformed(_))
        ));
    }
}
