//! `uwork-chat` — conversational tool bridge for the Useful Work tracker.
//!
//! Lets a hosted LLM manipulate items through a constrained four-tool
//! vocabulary, driving the request/response/tool-execution exchange to
//! completion.
//!
//! # Architecture
//!
//! ```text
//! Vec<ChatMessage>  (caller-supplied history)
//!     │
//!     ▼
//! ToolBridge::run   ← prepends the system instruction, loops:
//!     │                send → branch on tool_calls → dispatch → re-send
//!     ▼
//! ChatClient        ← one POST per round to a chat-completions endpoint,
//!     │                bearer auth, per-call timeout, no retries
//!     ▼
//! tools::dispatch   ← get_items / add_item / complete_item / delete_item
//!                      executed against the injected ItemService
//! ```
//!
//! The loop is capped at [`MAX_TOOL_ROUNDS`]; exceeding it yields
//! [`ChatError::LoopExceeded`] rather than spinning until the upstream fails.

pub mod bridge;
pub mod client;
pub mod error;
pub mod tools;
pub mod types;

pub use bridge::{ChatReply, ToolBridge, MAX_TOOL_ROUNDS};
pub use client::ChatClient;
pub use error::{ChatError, Result};
pub use types::ChatMessage;
