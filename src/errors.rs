#[derive(Debug, thiserror::Error)]
pub enum StyleError {
    #[error("Malformed style in rule {rule:?}: {reason}")]
    MalformedStyle { rule: String, reason: String },

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Icon {id} could not be resolved: {reason}")]
    IconResolution { id: String, reason: String },

    #[error("Filter evaluation error: {0}")]
    FilterEvaluation(String),

    #[error("Invalid style document: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

impl StyleError {
    pub(crate) fn malformed(rule: &str, reason: impl Into<String>) -> Self {
        StyleError::MalformedStyle {
            rule: rule.to_string(),
            reason: reason.into(),
        }
    }
}
