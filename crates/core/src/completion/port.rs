use crate::completion::error::ModelError;
use async_trait::async_trait;

/// # Summary
/// 文本生成服务接口 (Port)。
///
/// # Invariants
/// - 实现必须是 `Send` 和 `Sync`。
/// - 返回的文本已去除首尾空白。
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// # Summary
    /// 以单条用户消息请求一次文本生成。
    ///
    /// # Logic
    /// 1. 将提示词作为 `user` 消息发送给模型。
    /// 2. 以 `max_tokens` 限制生成长度。
    /// 3. 取第一条候选结果并去除首尾空白。
    ///
    /// # Arguments
    /// * `prompt` - 提示词。
    /// * `max_tokens` - 生成 token 上限。
    ///
    /// # Returns
    /// 成功返回生成文本，失败返回 `ModelError`。
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, ModelError>;
}
