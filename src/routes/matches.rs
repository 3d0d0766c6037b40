use axum::{
    extract::{Path, State},
    http::{StatusCode, header::LOCATION},
    response::{IntoResponse, Json},
};

use crate::AppState;
use crate::db::MatchStore;
use crate::error::ApiError;
use crate::models::Match;

// GET /matches - List all matches
pub async fn get_matches(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let store = MatchStore::new(&state.client, &state.db_name);
    let matches = store.list_all().await.map_err(|e| {
        tracing::error!("Error fetching matches: {}", e);
        ApiError::from(e)
    })?;

    Ok((
        StatusCode::OK,
        [(LOCATION, "/api/match".to_string())],
        Json(matches),
    ))
}

// POST /matches - Create a match; the store assigns the id
pub async fn create_match(
    State(state): State<AppState>,
    body: String,
) -> Result<impl IntoResponse, ApiError> {
    // parse before touching the store; a bad body must not reach it
    let m = Match::from_json(&body)?;

    let store = MatchStore::new(&state.client, &state.db_name);
    let created = store.insert(m).await.map_err(|e| {
        tracing::error!("Error creating match: {}", e);
        ApiError::from(e)
    })?;

    let id = created.id.map(|oid| oid.to_hex()).unwrap_or_default();
    Ok((
        StatusCode::CREATED,
        [(LOCATION, format!("/api/match/{}", id))],
        Json(created),
    ))
}

// PUT /matches/{id} - Whole-document replace, then re-fetch
pub async fn update_match(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: String,
) -> Result<impl IntoResponse, ApiError> {
    let m = Match::from_json(&body)?;

    let store = MatchStore::new(&state.client, &state.db_name);
    let modified = store.replace(&id, m).await.map_err(|e| {
        tracing::error!("Error updating match with ID {}: {}", id, e);
        ApiError::from(e)
    })?;

    if modified == 0 {
        return Err(ApiError::NotFound(id));
    }

    let refreshed = store
        .find_by_id(&id)
        .await
        .map_err(|e| {
            tracing::error!("Error fetching match with ID {}: {}", id, e);
            ApiError::from(e)
        })?
        .ok_or_else(|| ApiError::NotFound(id.clone()))?;

    Ok((
        StatusCode::OK,
        [(LOCATION, format!("/api/match/{}", id))],
        Json(refreshed),
    ))
}

// DELETE /matches/{id} - Delete a match
pub async fn delete_match(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let store = MatchStore::new(&state.client, &state.db_name);
    let deleted = store.delete(&id).await.map_err(|e| {
        tracing::error!("Error deleting match with ID {}: {}", id, e);
        ApiError::from(e)
    })?;

    if deleted == 0 {
        return Err(ApiError::NotFound(id));
    }

    Ok((StatusCode::NO_CONTENT, [(LOCATION, "/api/match".to_string())]))
}

#[cfg(test)]
mod tests {
    use crate::{AppState, app};
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header::CONTENT_TYPE};
    use http_body_util::BodyExt;
    use tower::util::ServiceExt;

    // The client is lazy: no connection is made until a query runs, and every
    // request below fails during parsing, before any store round-trip.
    async fn test_app() -> axum::Router {
        let client = mongodb::Client::with_uri_str("mongodb://localhost:27017")
            .await
            .unwrap();
        app(AppState {
            client,
            db_name: "match_data_test".to_string(),
        })
    }

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn create_with_unparseable_body_is_bad_request() {
        let res = test_app()
            .await
            .oneshot(json_request("POST", "/matches", "{not json"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let body = res.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(
            body["message"]
                .as_str()
                .unwrap()
                .starts_with("Invalid match data")
        );
    }

    #[tokio::test]
    async fn create_with_non_object_body_is_bad_request() {
        let res = test_app()
            .await
            .oneshot(json_request("POST", "/matches", "[1,2,3]"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn update_with_unparseable_body_is_bad_request() {
        let res = test_app()
            .await
            .oneshot(json_request(
                "PUT",
                "/matches/68a000000000000000000000",
                "null",
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn update_with_malformed_id_is_bad_request() {
        let res = test_app()
            .await
            .oneshot(json_request(
                "PUT",
                "/matches/not-an-object-id",
                r#"{"homeTeam":"A"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn delete_with_malformed_id_is_bad_request() {
        let res = test_app()
            .await
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/matches/not-an-object-id")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn root_banner_and_health_respond() {
        let res = test_app()
            .await
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let res = test_app()
            .await
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn delete_on_collection_root_is_method_not_allowed() {
        let res = test_app()
            .await
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/matches")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
