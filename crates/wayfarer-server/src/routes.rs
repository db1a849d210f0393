use std::net::SocketAddr;

use anyhow::Result;
use axum::extract::{Path, State};
use axum::http::header::COOKIE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use wayfarer_core::prompt::ItineraryContext;
use wayfarer_core::{duration, extract, participation, preferences, prompt};
use wayfarer_db::models::{NewApplication, NewPlan};
use wayfarer_db::queries::{applications, participants, plans as plan_db};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.into(),
        }
    }

    pub fn internal(err: anyhow::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("{err:#}"),
        }
    }
}

impl From<wayfarer_core::Error> for AppError {
    fn from(err: wayfarer_core::Error) -> Self {
        use wayfarer_core::Error;
        let status = match &err {
            Error::InvalidInput(_) | Error::CapacityExceeded => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Unauthenticated => StatusCode::UNAUTHORIZED,
            Error::Extraction(_) | Error::Upstream(_) | Error::Persistence(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Request/response types
// ---------------------------------------------------------------------------

/// Trip-preference payload shared by the suggestion and itinerary
/// endpoints. Field names follow the frontend's camelCase convention.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendRequest {
    #[serde(default)]
    pub selected_location: Option<String>,
    #[serde(default)]
    pub travel_area: Option<String>,
    #[serde(default)]
    pub travel_duration: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub budget: Option<String>,
    #[serde(default)]
    pub travel_style: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct UsernameBody {
    #[serde(default)]
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct AskPlanRequest {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub plan: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct MenuRequest {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Deserialize)]
pub struct KeywordRequest {
    #[serde(default)]
    pub keyword: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub message: String,
    pub id: Uuid,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/plans", post(create_plan).get(list_plans))
        .route(
            "/plan/{id}",
            get(get_plan_detail).put(update_plan).delete(delete_plan),
        )
        .route("/plans/{id}/apply", post(apply_to_plan))
        .route("/plan/{id}/applications", get(list_plan_applications))
        .route("/plan/{id}/accept", post(accept_applicant))
        .route("/plan/{id}/participants", get(list_plan_participants))
        .route("/plan/{id}/participants/remove", post(remove_participant))
        .route("/plans/{id}/applied", get(check_applied))
        .route("/suggest-locations", post(suggest_locations))
        .route("/recommend", post(recommend))
        .route("/ask-plan", post(ask_plan))
        .route("/recommend-menu", post(recommend_menu))
        .route("/convert-keyword", post(convert_keyword))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(state: AppState, bind: &str, port: u16) -> Result<()> {
    let app = build_router(state);
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    tracing::info!("wayfarer listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("wayfarer shut down");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Username carried by the `user` cookie, validated upstream by the auth
/// collaborator. This core only reads it.
fn identity_from_cookies(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == "user" && !value.is_empty()).then(|| value.to_string())
    })
}

// ---------------------------------------------------------------------------
// Plan CRUD handlers
// ---------------------------------------------------------------------------

async fn create_plan(
    State(state): State<AppState>,
    Json(new): Json<NewPlan>,
) -> Result<Json<CreatedResponse>, AppError> {
    let plan = plan_db::insert_plan(&state.pool, &new)
        .await
        .map_err(AppError::internal)?;

    Ok(Json(CreatedResponse {
        message: "plan saved".to_string(),
        id: plan.id,
    }))
}

async fn list_plans(State(state): State<AppState>) -> Result<axum::response::Response, AppError> {
    let plans = plan_db::list_plans(&state.pool)
        .await
        .map_err(AppError::internal)?;

    Ok(Json(plans).into_response())
}

async fn get_plan_detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<axum::response::Response, AppError> {
    let plan = plan_db::fetch_plan_detail(&state.pool, id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::not_found(format!("plan {id} not found")))?;

    Ok(Json(plan).into_response())
}

async fn update_plan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(updated): Json<NewPlan>,
) -> Result<Json<MessageResponse>, AppError> {
    let found = plan_db::update_plan(&state.pool, id, &updated)
        .await
        .map_err(AppError::internal)?;

    if !found {
        return Err(AppError::not_found(format!("plan {id} not found")));
    }

    Ok(Json(MessageResponse {
        message: "plan updated".to_string(),
    }))
}

async fn delete_plan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let found = plan_db::delete_plan(&state.pool, id)
        .await
        .map_err(AppError::internal)?;

    if !found {
        return Err(AppError::not_found(format!("plan {id} not found")));
    }

    Ok(Json(MessageResponse {
        message: "plan deleted".to_string(),
    }))
}

// ---------------------------------------------------------------------------
// Participation handlers
// ---------------------------------------------------------------------------

async fn apply_to_plan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(application): Json<NewApplication>,
) -> Result<Json<MessageResponse>, AppError> {
    participation::apply(&state.pool, id, &application).await?;

    Ok(Json(MessageResponse {
        message: "application received".to_string(),
    }))
}

async fn list_plan_applications(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<axum::response::Response, AppError> {
    let rows = applications::list_applications(&state.pool, id)
        .await
        .map_err(AppError::internal)?;

    Ok(Json(rows).into_response())
}

async fn accept_applicant(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UsernameBody>,
) -> Result<Json<MessageResponse>, AppError> {
    participation::accept(&state.pool, id, &body.username).await?;

    Ok(Json(MessageResponse {
        message: "applicant accepted".to_string(),
    }))
}

async fn list_plan_participants(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<axum::response::Response, AppError> {
    let rows = participants::list_participants(&state.pool, id)
        .await
        .map_err(AppError::internal)?;

    Ok(Json(rows).into_response())
}

async fn remove_participant(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UsernameBody>,
) -> Result<Json<MessageResponse>, AppError> {
    participation::remove(&state.pool, id, &body.username).await?;

    Ok(Json(MessageResponse {
        message: "participant removed".to_string(),
    }))
}

async fn check_applied(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<axum::response::Response, AppError> {
    let username = identity_from_cookies(&headers);
    let applied = participation::check_applied(&state.pool, id, username.as_deref()).await?;

    Ok(Json(serde_json::json!({ "applied": applied })).into_response())
}

// ---------------------------------------------------------------------------
// AI pipeline handlers
// ---------------------------------------------------------------------------

/// Merge interests and travel style into one deduplicated, order-preserving
/// preference string for the suggestion prompt.
fn merged_preferences(request: &RecommendRequest) -> String {
    let mut seen: Vec<&str> = Vec::new();
    for tag in request.interests.iter().chain(request.travel_style.iter()) {
        if !tag.is_empty() && !seen.contains(&tag.as_str()) {
            seen.push(tag);
        }
    }
    if seen.is_empty() {
        preferences::NO_SPECIAL_PREFERENCE.to_string()
    } else {
        seen.join(", ")
    }
}

async fn suggest_locations(
    State(state): State<AppState>,
    Json(request): Json<RecommendRequest>,
) -> Result<axum::response::Response, AppError> {
    let region = request
        .travel_area
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::bad_request("travel area is required"))?;

    let interests = merged_preferences(&request);
    let prompt = prompt::build_suggestion_prompt(region, &interests, request.budget.as_deref());

    let reply = state.model.generate(&prompt).await?;
    let payload = extract::extract_first_json(&reply)?;

    Ok(Json(payload).into_response())
}

async fn recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendRequest>,
) -> Result<axum::response::Response, AppError> {
    let destination = request
        .selected_location
        .clone()
        .or_else(|| request.travel_area.clone())
        .unwrap_or_default();

    let ctx = ItineraryContext {
        destination,
        duration_days: duration::days_from_phrase(request.travel_duration.as_deref()),
        preferences: preferences::classify(&request.interests),
    };
    let prompt = prompt::build_itinerary_prompt(&ctx);

    let reply = state.model.generate(&prompt).await?;
    let payload = extract::extract_first_json(&reply)?;

    Ok(Json(payload).into_response())
}

async fn ask_plan(
    State(state): State<AppState>,
    Json(request): Json<AskPlanRequest>,
) -> Result<axum::response::Response, AppError> {
    let (Some(question), Some(plan)) = (request.question.as_deref(), request.plan.as_ref()) else {
        return Err(AppError::bad_request("question and plan are required"));
    };
    if question.is_empty() {
        return Err(AppError::bad_request("question and plan are required"));
    }

    let prompt = prompt::build_question_prompt(plan, question);
    let answer = state.model.generate(&prompt).await?;

    Ok(Json(serde_json::json!({ "answer": answer })).into_response())
}

async fn recommend_menu(
    State(state): State<AppState>,
    Json(request): Json<MenuRequest>,
) -> Result<axum::response::Response, AppError> {
    let prompt = prompt::build_menu_prompt(request.lat, request.lon);

    let reply = state.model.generate(&prompt).await?;
    // Menu suggestions are an enhancement: no payload means an empty list.
    let mut menus = extract::extract_first_json_or_empty(&reply)?;

    // Enrich each suggestion with restaurants serving it nearby.
    if let Value::Array(items) = &mut menus {
        for item in items {
            let Some(dish) = item.get("menu").and_then(Value::as_str).map(str::to_owned) else {
                continue;
            };
            let restaurants = state
                .places
                .restaurants_near(&dish, request.lat, request.lon)
                .await?;
            if let Some(entry) = item.as_object_mut() {
                let value = serde_json::to_value(restaurants)
                    .map_err(|e| AppError::internal(anyhow::anyhow!(e)))?;
                entry.insert("restaurants".to_string(), value);
            }
        }
    }

    Ok(Json(serde_json::json!({ "menus": menus })).into_response())
}

async fn convert_keyword(
    State(state): State<AppState>,
    Json(request): Json<KeywordRequest>,
) -> Result<axum::response::Response, AppError> {
    if request.keyword.is_empty() {
        return Err(AppError::bad_request("keyword is required"));
    }

    let point = state
        .places
        .locate_keyword(&request.keyword)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!("no place found for keyword '{}'", request.keyword))
        })?;

    Ok(Json(serde_json::json!({ "lat": point.lat, "lon": point.lon })).into_response())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
