//! Single-page search form served over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Form, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::{error, info};

use crate::finder::Finder;
use crate::render::html::{
    DEFAULT_EXPERTS, FormValues, MAX_EXPERTS, MIN_EXPERTS, render_error, render_form,
    render_results,
};

struct AppState {
    finder: Finder,
}

#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub question: String,
    pub num_experts: Option<u32>,
}

pub fn router(finder: Finder) -> Router {
    let state = Arc::new(AppState { finder });
    Router::new()
        .route("/", get(index))
        .route("/search", post(search))
        .route("/health", get(health))
        .with_state(state)
}

pub async fn serve(finder: Finder, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("serving expert finder on http://{}", listener.local_addr()?);
    axum::serve(listener, router(finder)).await
}

async fn index() -> Html<String> {
    Html(render_form(&FormValues::default()))
}

async fn health() -> &'static str {
    "ok"
}

async fn search(State(state): State<Arc<AppState>>, Form(form): Form<SearchForm>) -> Response {
    let num_experts = form
        .num_experts
        .unwrap_or(DEFAULT_EXPERTS)
        .clamp(MIN_EXPERTS, MAX_EXPERTS);
    let values = FormValues {
        question: &form.question,
        num_experts,
    };

    let question = form.question.trim();
    if question.is_empty() {
        return Html(render_form(&values)).into_response();
    }

    match state.finder.run(question, num_experts).await {
        Ok(found) => Html(render_results(&values, &found)).into_response(),
        Err(e) => {
            error!(error = %e, "expert search failed");
            (
                StatusCode::BAD_GATEWAY,
                Html(render_error(&values, &e.to_string())),
            )
                .into_response()
        }
    }
}
