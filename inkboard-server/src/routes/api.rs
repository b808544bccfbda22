//! JSON API endpoints, mounted under /api.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, put},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use inkboard_core::Event;
use inkboard_core::calendar::fetch_events;
use inkboard_core::github::{ContributionDay, contribution_grid};
use inkboard_core::hackernews::{Story, fetch_top_stories};
use inkboard_core::todo::Todo;
use inkboard_core::weather::{WeatherReport, fetch_weather};

use crate::routes::AppError;
use crate::state::AppState;

const TOP_STORY_COUNT: usize = 3;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/weather", get(weather))
        .route("/calendar", get(calendar))
        .route("/todos", get(list_todos).post(add_todo))
        .route("/todos/{id}", put(update_todo).delete(delete_todo))
        .route("/github", get(github))
        .route("/hackernews", get(hackernews))
}

/// GET /api/weather - current conditions, 500 on upstream failure
async fn weather(State(state): State<AppState>) -> Result<Json<WeatherReport>, AppError> {
    let report = fetch_weather(
        &state.http,
        state.config.weather_lat,
        state.config.weather_lon,
    )
    .await?;
    Ok(Json(report))
}

#[derive(Serialize)]
pub struct CalendarResponse {
    pub events: Vec<Event>,
    /// Current day in the display timezone, YYYY-MM-DD.
    pub date: String,
}

/// GET /api/calendar - today's events from the first non-empty source
async fn calendar(State(state): State<AppState>) -> Json<CalendarResponse> {
    let tz = state.config.display_timezone;
    let events = fetch_events(&state.event_sources(), tz).await;
    let date = Utc::now().with_timezone(&tz).format("%Y-%m-%d").to_string();
    Json(CalendarResponse { events, date })
}

/// GET /api/todos
async fn list_todos(State(state): State<AppState>) -> Json<Vec<Todo>> {
    Json(state.todos.list())
}

#[derive(Deserialize)]
pub struct AddTodoRequest {
    pub text: String,
}

/// POST /api/todos - cache-only, overwritten by the next reminders sync
async fn add_todo(State(state): State<AppState>, Json(req): Json<AddTodoRequest>) -> Json<Todo> {
    Json(state.todos.add(req.text))
}

#[derive(Deserialize)]
pub struct UpdateTodoRequest {
    pub completed: bool,
}

/// PUT /api/todos/:id - cache-only completion toggle
async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateTodoRequest>,
) -> Result<Json<Todo>, AppError> {
    state
        .todos
        .set_completed(&id, req.completed)
        .map(Json)
        .ok_or_else(|| AppError::not_found("Todo not found"))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTodoResponse {
    pub success: bool,
    pub deleted_id: String,
}

/// DELETE /api/todos/:id - cache-only removal
async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<DeleteTodoResponse> {
    let success = state.todos.remove(&id);
    Json(DeleteTodoResponse {
        success,
        deleted_id: id,
    })
}

/// GET /api/github - 49-day contribution grid, synthetic when unavailable
async fn github(State(state): State<AppState>) -> Json<Vec<ContributionDay>> {
    let today = Utc::now()
        .with_timezone(&state.config.display_timezone)
        .date_naive();
    let grid = contribution_grid(
        &state.http,
        state.config.github_username.as_deref(),
        state.config.github_token.as_deref(),
        today,
    )
    .await;
    Json(grid)
}

/// GET /api/hackernews - top stories, empty on any failure
async fn hackernews(State(state): State<AppState>) -> Json<Vec<Story>> {
    Json(fetch_top_stories(&state.http, TOP_STORY_COUNT).await)
}
