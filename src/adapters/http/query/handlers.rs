//! Query handler: credential extraction plus pipeline delegation.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use crate::adapters::http::AppState;
use crate::application::{Answer, Credential, QueryRequest};
use crate::domain::foundation::AppError;

use super::dto::QueryBody;

const API_KEY_HEADER: &str = "x-api-key";

/// POST /api/query - answers one question.
///
/// Accepts either the organization's API key in `x-api-key` or a
/// Bearer session token; the key takes precedence when both appear.
pub async fn query(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<QueryBody>,
) -> Result<Json<Answer>, AppError> {
    let credential = extract_credential(&headers)?;
    let answer = state
        .pipeline
        .run(
            credential,
            QueryRequest {
                org_id: body.org_id,
                question: body.question,
                conversation_id: body.conversation_id,
                anonymous_id: body.anonymous_id,
            },
        )
        .await?;
    Ok(Json(answer))
}

fn extract_credential(headers: &HeaderMap) -> Result<Credential, AppError> {
    if let Some(key) = headers.get(API_KEY_HEADER).and_then(|h| h.to_str().ok()) {
        return Ok(Credential::ApiKey(key.to_string()));
    }
    if let Some(token) = headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
    {
        return Ok(Credential::Session(token.to_string()));
    }
    Err(AppError::invalid_token())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorKind;

    #[test]
    fn api_key_header_wins_over_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, "rn_live_abc".parse().unwrap());
        headers.insert("Authorization", "Bearer tok".parse().unwrap());
        assert!(matches!(
            extract_credential(&headers),
            Ok(Credential::ApiKey(k)) if k == "rn_live_abc"
        ));
    }

    #[test]
    fn bearer_token_is_accepted_alone() {
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", "Bearer tok".parse().unwrap());
        assert!(matches!(
            extract_credential(&headers),
            Ok(Credential::Session(t)) if t == "tok"
        ));
    }

    #[test]
    fn missing_credentials_are_rejected() {
        let err = extract_credential(&HeaderMap::new()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidToken);
    }
}
