#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Http transport error, {0}")]
    Http(#[from] reqwest::Error),

    #[error("Json-rpc error, code {code}, {message}")]
    Rpc { code: i64, message: String },

    #[error("Parse json-rpc response error, {0}")]
    Json(#[from] serde_json::Error),
}
