//! The multi-turn tool-calling exchange.
//!
//! One `run` call drives a whole chat request: compose the system
//! instruction, send the history plus tool schemas upstream, execute any
//! requested tools, feed the results back, and repeat until the model
//! answers in plain text. The loop is bounded; a model that never stops
//! asking for tools gets a `LoopExceeded` error instead of hanging the
//! request.

use serde_json::Value;

use uwork_core::ItemService;

use crate::client::ChatClient;
use crate::error::{ChatError, Result};
use crate::tools::{dispatch, tool_definitions};
use crate::types::ChatMessage;

/// Maximum request/tool-execution rounds per chat request.
pub const MAX_TOOL_ROUNDS: usize = 8;

/// Terminal result of a chat request: the assistant's text plus whatever
/// usage object the upstream reported on the final round.
#[derive(Debug)]
pub struct ChatReply {
    pub message: String,
    pub usage: Value,
}

/// Fixed persona and framework instruction prepended to every conversation.
fn system_prompt(today: &str) -> String {
    format!(
        "You are the Useful Work companion: a calm, grounded assistant that \
helps the user plan, record, and reflect on their work. Work is tracked as \
items tagged along four fixed axes:\n\
- existence: did something new come into being?\n\
- recipient: who or what is it useful for?\n\
- purpose: what problem does it solve?\n\
- elegance: is it positioned and polished enough to actually be used?\n\n\
Use the provided tools to read and modify the user's items; never invent \
item ids. When the user describes finished work, record it as completed. \
Keep replies short and reflective rather than cheerful.\n\n\
Today's date is {today}."
    )
}

/// Bridges a chat conversation onto the item service.
pub struct ToolBridge {
    client: ChatClient,
    service: ItemService,
}

impl ToolBridge {
    pub fn new(client: ChatClient, service: ItemService) -> Self {
        Self { client, service }
    }

    /// Run the exchange to completion for the caller-supplied history.
    ///
    /// Tool calls within a round are executed strictly sequentially, each
    /// result appended as a `tool`-role message before the next upstream
    /// call.
    pub async fn run(&self, history: Vec<ChatMessage>) -> Result<ChatReply> {
        let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(ChatMessage::system(system_prompt(&today)));
        messages.extend(history);

        let tools = tool_definitions();

        for round in 0..MAX_TOOL_ROUNDS {
            let response = self.client.complete(&messages, &tools).await?;
            let reply = response
                .choices
                .into_iter()
                .next()
                .ok_or(ChatError::EmptyResponse)?
                .message;

            if !reply.has_tool_calls() {
                return Ok(ChatReply {
                    message: reply.content.unwrap_or_default(),
                    usage: response.usage.unwrap_or(Value::Null),
                });
            }

            let calls = reply.tool_calls.clone().unwrap_or_default();
            tracing::debug!(round, count = calls.len(), "executing tool calls");
            messages.push(reply);

            for call in calls {
                let service = self.service.clone();
                let name = call.function.name.clone();
                let arguments = call.function.arguments.clone();
                let result =
                    tokio::task::spawn_blocking(move || dispatch(&service, &name, &arguments))
                        .await
                        .map_err(|e| ChatError::TaskJoin(e.to_string()))??;

                tracing::debug!(tool = %call.function.name, "tool call finished");
                messages.push(ChatMessage::tool_result(call.id, result.to_string()));
            }
        }

        Err(ChatError::LoopExceeded(MAX_TOOL_ROUNDS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use uwork_core::ItemStore;

    fn bridge(url: &str) -> ToolBridge {
        let client = ChatClient::new(url, "test-key", "test-model").unwrap();
        let service = ItemService::new(ItemStore::open_in_memory().unwrap());
        ToolBridge::new(client, service)
    }

    fn text_response(content: &str) -> String {
        serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": content}}],
            "usage": {"total_tokens": 10}
        })
        .to_string()
    }

    fn tool_call_response(name: &str, arguments: &str) -> String {
        serde_json::json!({
            "choices": [{"message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_1",
                    "type": "function",
                    "function": {"name": name, "arguments": arguments}
                }]
            }}]
        })
        .to_string()
    }

    #[tokio::test]
    async fn plain_reply_terminates_immediately() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(text_response("Nothing to do."))
            .create_async()
            .await;

        let bridge = bridge(&format!("{}/chat", server.url()));
        let reply = bridge.run(vec![ChatMessage::user("hi")]).await.unwrap();

        assert_eq!(reply.message, "Nothing to do.");
        assert_eq!(reply.usage["total_tokens"], 10);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn tool_call_round_then_final_reply() {
        let mut server = mockito::Server::new_async().await;

        // First request (no tool results yet) gets a tool call; the follow-up
        // request carries a tool_call_id and gets the final text. Mockito
        // prefers the most recently created matching mock, so the specific
        // matcher is registered second.
        let first = server
            .mock("POST", "/chat")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(tool_call_response(
                "add_item",
                r#"{"text":"Wrote a doc","axes":["existence"],"status":"completed"}"#,
            ))
            .create_async()
            .await;
        let second = server
            .mock("POST", "/chat")
            .match_body(Matcher::Regex("tool_call_id".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(text_response("Recorded it."))
            .create_async()
            .await;

        let bridge = bridge(&format!("{}/chat", server.url()));
        let reply = bridge
            .run(vec![ChatMessage::user("I wrote a doc today")])
            .await
            .unwrap();

        assert_eq!(reply.message, "Recorded it.");
        first.assert_async().await;
        second.assert_async().await;

        // The tool really executed: the item exists and is completed.
        let items = bridge.service.list(Some("completed")).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].text, "Wrote a doc");
        assert!(items[0].completed_at.is_some());
    }

    #[tokio::test]
    async fn endless_tool_requests_hit_the_round_cap() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(tool_call_response("get_items", "{}"))
            .expect(MAX_TOOL_ROUNDS)
            .create_async()
            .await;

        let bridge = bridge(&format!("{}/chat", server.url()));
        let err = bridge.run(vec![ChatMessage::user("loop")]).await.unwrap_err();

        assert!(matches!(err, ChatError::LoopExceeded(MAX_TOOL_ROUNDS)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn upstream_error_surfaces_status_and_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat")
            .with_status(429)
            .with_body("rate limited")
            .create_async()
            .await;

        let bridge = bridge(&format!("{}/chat", server.url()));
        let err = bridge.run(vec![ChatMessage::user("hi")]).await.unwrap_err();

        match err {
            ChatError::Upstream { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "rate limited");
            }
            other => panic!("expected Upstream, got {other:?}"),
        }
    }
}
