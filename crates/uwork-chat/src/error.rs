use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    /// Non-2xx from the upstream chat-completions endpoint, body surfaced.
    #[error("upstream returned {status}: {body}")]
    Upstream { status: u16, body: String },

    /// Transport-level failure, including the per-call timeout.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The model kept requesting tools past the round cap.
    #[error("tool-calling loop exceeded {0} rounds")]
    LoopExceeded(usize),

    #[error("upstream returned no choices")]
    EmptyResponse,

    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("bad arguments for tool '{tool}': {source}")]
    BadToolArgs {
        tool: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("tool execution failed: {0}")]
    TaskJoin(String),

    #[error(transparent)]
    Core(#[from] uwork_core::CoreError),
}

pub type Result<T> = std::result::Result<T, ChatError>;
