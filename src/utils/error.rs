use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("{source_id} returned HTTP {status}")]
    UpstreamStatus { source_id: String, status: u16 },

    #[error("Failed to parse {source_id} response: {message}")]
    ParseError { source_id: String, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Aggregation failed: {message}")]
    AggregationError { message: String },
}

impl SearchError {
    pub fn parse(source_id: &str, message: impl Into<String>) -> Self {
        Self::ParseError {
            source_id: source_id.to_string(),
            message: message.into(),
        }
    }

    /// 適用於回傳給前端的訊息（隱藏底層細節）
    pub fn user_friendly_message(&self) -> String {
        match self {
            SearchError::HttpError(e) if e.is_timeout() => "요청 시간이 초과되었습니다".to_string(),
            SearchError::HttpError(e) if e.is_connect() => "사이트에 연결할 수 없습니다".to_string(),
            SearchError::HttpError(_) => "사이트 요청에 실패했습니다".to_string(),
            SearchError::UpstreamStatus { status, .. } => {
                format!("사이트가 요청을 거부했습니다 (HTTP {})", status)
            }
            SearchError::ParseError { .. } | SearchError::SerializationError(_) => {
                "검색 결과를 해석할 수 없거나 페이지 구조가 변경됨".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
