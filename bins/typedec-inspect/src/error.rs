#[derive(Debug, thiserror::Error)]
pub enum InspectError {
    #[error("type descriptor {0}")]
    Descriptor(#[from] typedec_api::ParseError),

    #[error("payload ({context}): {detail}")]
    Payload { context: String, detail: String },

    #[error("{0}")]
    Decode(#[from] typedec_engine::DecodeError),

    #[error("output: {0}")]
    Output(#[from] serde_json::Error),
}
