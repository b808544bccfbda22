//! Server-rendered pages for displays that cannot run scripts.

use axum::{
    Router,
    extract::State,
    response::{Html, Redirect},
    routing::get,
};
use chrono::Utc;

use inkboard_core::calendar::fetch_events;
use inkboard_core::weather::fetch_weather;

use crate::render;
use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/kindle", get(dashboard_page))
        .route("/dashboard-portrait", get(dashboard_page))
        .route("/preview-portrait", get(dashboard_page))
        // Legacy redirects
        .route("/", get(|| async { Redirect::to("/dashboard-portrait") }))
        .route(
            "/dashboard",
            get(|| async { Redirect::to("/dashboard-portrait") }),
        )
}

/// The full e-ink document. Weather and calendar are fetched together;
/// a weather failure fails the page, the calendar chain cannot fail.
async fn dashboard_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let tz = state.config.display_timezone;

    let event_sources = state.event_sources();
    let (weather, events) = tokio::join!(
        fetch_weather(
            &state.http,
            state.config.weather_lat,
            state.config.weather_lon
        ),
        fetch_events(&event_sources, tz),
    );
    let weather = weather?;
    let todos = state.todos.list();

    let now = Utc::now().with_timezone(&tz);
    Ok(Html(render::render_dashboard(
        &weather,
        &events,
        &todos,
        now,
        &state.config.location_label,
    )))
}
