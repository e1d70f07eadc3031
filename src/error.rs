use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type BubbleResult<T> = Result<T, BubbleError>;

#[derive(Debug, Error)]
pub enum BubbleError {
    #[error("unrecognized distance bucket: {0:?}")]
    UnrecognizedDistanceBucket(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("event {0} not found")]
    EventNotFound(String),

    #[error("discount {0} not found")]
    DiscountNotFound(String),

    #[error("discount {0} has already been redeemed")]
    DiscountAlreadyUsed(String),

    #[error("insufficient points: balance {balance}, cost {cost}")]
    InsufficientPoints { balance: u32, cost: u32 },

    #[error("missing X-Bubble-Profile header")]
    MissingProfile,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<validator::ValidationErrors> for BubbleError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|field| field.to_string())
            .collect();
        fields.sort();
        BubbleError::Validation(format!("invalid fields: {}", fields.join(", ")))
    }
}

impl BubbleError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            BubbleError::UnrecognizedDistanceBucket(_)
            | BubbleError::Validation(_)
            | BubbleError::MissingProfile => StatusCode::BAD_REQUEST,
            BubbleError::EventNotFound(_) | BubbleError::DiscountNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            BubbleError::DiscountAlreadyUsed(_) => StatusCode::CONFLICT,
            BubbleError::InsufficientPoints { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            BubbleError::Database(_) | BubbleError::Cache(_) | BubbleError::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            BubbleError::UnrecognizedDistanceBucket(_) => "unrecognized_distance_bucket",
            BubbleError::Validation(_) => "invalid_input",
            BubbleError::EventNotFound(_) | BubbleError::DiscountNotFound(_) => "not_found",
            BubbleError::DiscountAlreadyUsed(_) => "discount_used",
            BubbleError::InsufficientPoints { .. } => "insufficient_points",
            BubbleError::MissingProfile => "missing_profile",
            BubbleError::Database(_) | BubbleError::Cache(_) | BubbleError::Serialization(_) => {
                "internal_error"
            }
        }
    }
}

impl IntoResponse for BubbleError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status.is_server_error() {
            tracing::error!("request failed: {:?}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (
            status,
            Json(json!({
                "success": false,
                "code": self.code(),
                "error": message,
            })),
        )
            .into_response()
    }
}
