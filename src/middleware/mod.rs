use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::error::BubbleError;

pub const PROFILE_HEADER: &str = "x-bubble-profile";

/// Names the keyspace holding a visitor's wallet state.
///
/// This replaces per-browser storage; it is not an authentication mechanism.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileKey(pub String);

impl ProfileKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for ProfileKey
where
    S: Send + Sync,
{
    type Rejection = BubbleError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(PROFILE_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(BubbleError::MissingProfile)?;

        // keys are namespaced with ':' so keep profile names out of that alphabet
        if !value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' || c == '@')
        {
            return Err(BubbleError::Validation(format!(
                "invalid profile key {:?}",
                value
            )));
        }

        Ok(ProfileKey(value.to_string()))
    }
}

/// `Query` whose rejections are reported in the API's JSON error envelope.
#[derive(Debug, Clone, Default)]
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = BubbleError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| BubbleError::Validation(rejection.body_text()))?;
        Ok(ApiQuery(value))
    }
}
