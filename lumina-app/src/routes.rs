use crate::error::ApiError;
use crate::schemas::{
    success, BatchFactCheckRequest, ClearCacheBody, Envelope, FactCheckBody,
    MediaAnalysisRequest, SearchBody, SearchParams, SocialContextRequest, StatsBody,
    UrlSafetyForm, UrlSafetyRequest,
};
use crate::state::AppState;
use axum::extract::{DefaultBodyLimit, Multipart, Query, State};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use lumina_analysis::verdicts::{
    MediaAnalysisReport, MediaReport, SocialContextReport, UrlSafetyReport,
};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;

/// Uploads (notably videos) can exceed the default axum body limit; the
/// per-file ceiling is still enforced in the analyzer.
const BODY_LIMIT_BYTES: usize = 20 * 1024 * 1024;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/fact-check", post(fact_check))
        .route("/api/batch-fact-check", post(batch_fact_check))
        .route("/api/image-authenticity", post(image_authenticity))
        .route("/api/video-authenticity", post(video_authenticity))
        .route("/api/url-safety", post(url_safety))
        .route("/api/url-safety-form", post(url_safety_form))
        .route("/api/media-analysis", post(media_analysis))
        .route("/api/social-media-context", post(social_media_context))
        .route("/api/search", get(search))
        .route("/api/stats", get(stats))
        .route("/api/clear-cache", post(clear_cache))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "Lumina Verification API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Multipart: `claim` (may carry several claims), optional `image` whose
/// OCR text overrides the claim, optional `preferred_language`.
async fn fact_check(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Envelope<FactCheckBody>>, ApiError> {
    let mut claim = String::new();
    let mut preferred_language: Option<String> = None;
    let mut image: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("claim") => claim = field.text().await?,
            Some("preferred_language") => {
                let lang = field.text().await?;
                let lang = lang.trim();
                if !lang.is_empty() {
                    preferred_language = Some(lang.to_string());
                }
            }
            Some("image") => {
                let mime = field
                    .content_type()
                    .map(str::to_string)
                    .unwrap_or_else(|| "image/jpeg".to_string());
                let bytes = field.bytes().await?.to_vec();
                if !bytes.is_empty() {
                    image = Some((mime, bytes));
                }
            }
            _ => {}
        }
    }

    tracing::info!(target: "app", claim_len = claim.len(), has_image = image.is_some(), "fact_check.request");

    let results = state
        .analyzer
        .fact_check_submission(
            &claim,
            image.as_ref().map(|(m, b)| (m.as_str(), b.as_slice())),
            preferred_language.as_deref(),
        )
        .await?;
    Ok(success(FactCheckBody { results }))
}

async fn batch_fact_check(
    State(state): State<AppState>,
    Json(request): Json<BatchFactCheckRequest>,
) -> Result<Json<Envelope<FactCheckBody>>, ApiError> {
    let results = state.analyzer.batch_fact_check(&request.claims).await?;
    Ok(success(FactCheckBody { results }))
}

async fn image_authenticity(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Envelope<MediaReport>>, ApiError> {
    let (content_type, bytes) = read_upload(multipart, "image").await?;
    let report = state
        .analyzer
        .image_authenticity(content_type.as_deref(), &bytes)
        .await?;
    Ok(success(report))
}

async fn video_authenticity(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Envelope<MediaReport>>, ApiError> {
    let (content_type, bytes) = read_upload(multipart, "video").await?;
    let report = state
        .analyzer
        .video_authenticity(content_type.as_deref(), &bytes)
        .await?;
    Ok(success(report))
}

/// Pull one named file field out of a multipart body.
async fn read_upload(
    mut multipart: Multipart,
    field_name: &str,
) -> Result<(Option<String>, Vec<u8>), ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(field_name) {
            let content_type = field.content_type().map(str::to_string);
            let bytes = field.bytes().await?.to_vec();
            return Ok((content_type, bytes));
        }
    }
    Err(ApiError::Validation(format!(
        "Missing '{}' file field",
        field_name
    )))
}

async fn url_safety(
    State(state): State<AppState>,
    Json(request): Json<UrlSafetyRequest>,
) -> Result<Json<Envelope<UrlSafetyReport>>, ApiError> {
    let report = state.analyzer.url_safety(&request.url).await?;
    Ok(success(report))
}

async fn url_safety_form(
    State(state): State<AppState>,
    Form(form): Form<UrlSafetyForm>,
) -> Result<Json<Envelope<UrlSafetyReport>>, ApiError> {
    let report = state.analyzer.url_safety(&form.url).await?;
    Ok(success(report))
}

async fn media_analysis(
    State(state): State<AppState>,
    Json(request): Json<MediaAnalysisRequest>,
) -> Result<Json<Envelope<MediaAnalysisReport>>, ApiError> {
    let report = state.analyzer.media_analysis(&request.input).await?;
    Ok(success(report))
}

async fn social_media_context(
    State(state): State<AppState>,
    Json(request): Json<SocialContextRequest>,
) -> Result<Json<Envelope<SocialContextReport>>, ApiError> {
    let report = state.analyzer.social_context(&request.post_url).await?;
    Ok(success(report))
}

async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Envelope<SearchBody>>, ApiError> {
    let query = params.q.trim().to_string();
    if query.is_empty() {
        return Err(ApiError::Validation("Query cannot be empty".to_string()));
    }
    let max_results = params.max_results.unwrap_or(5).clamp(1, 20);
    let results = state.analyzer.search_cache().search(&query, max_results).await;
    Ok(success(SearchBody { query, results }))
}

async fn stats(State(state): State<AppState>) -> Json<Envelope<StatsBody>> {
    let cache = state.analyzer.search_cache().stats().await;
    success(StatsBody { cache })
}

async fn clear_cache(State(state): State<AppState>) -> Json<Envelope<ClearCacheBody>> {
    let cleared = state.analyzer.search_cache().clear().await;
    tracing::info!(target: "app", cleared, "cache.cleared");
    success(ClearCacheBody { cleared })
}
