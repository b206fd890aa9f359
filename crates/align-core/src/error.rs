#[derive(Debug, thiserror::Error)]
pub enum AlignError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported document schema `{0}`")]
    UnsupportedSchema(String),
    #[error("unsupported document version {found} (newest known is {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
}
