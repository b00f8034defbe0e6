use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Form, Json, Router};
use serde::Deserialize;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use crate::action::{self, ActionResponse};
use crate::config::Config;
use crate::error::ActionError;

/// Header the front-end sets on background (XHR) requests.
pub const REQUESTED_WITH: &str = "x-requested-with";

#[derive(Clone)]
pub struct ServerState {
    config: Arc<Config>,
}

impl ServerState {
    pub fn new(config: Config) -> Self {
        ServerState {
            config: Arc::new(config),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ActionForm {
    action: Option<String>,
}

pub fn router(config: Config) -> Router {
    Router::new()
        .route("/", post(action_handler))
        .route("/cache-cleaner", post(action_handler))
        .with_state(ServerState::new(config))
}

async fn action_handler(
    State(state): State<ServerState>,
    headers: HeaderMap,
    form: Result<Form<ActionForm>, FormRejection>,
) -> Response {
    if !headers.contains_key(REQUESTED_WITH) {
        return (StatusCode::BAD_REQUEST, "expected a background request").into_response();
    }

    let name = match form {
        Ok(Form(ActionForm { action: Some(name) })) => name,
        Ok(_) => return (StatusCode::BAD_REQUEST, "missing action field").into_response(),
        Err(rejection) => {
            debug!(%rejection, "rejected action form");
            return (StatusCode::BAD_REQUEST, rejection.body_text()).into_response();
        }
    };

    debug!(action = %name, "handling action");
    let config = Arc::clone(&state.config);
    let response = match tokio::task::spawn_blocking(move || action::dispatch(&name, &config)).await
    {
        Ok(response) => response,
        Err(err) => {
            error!(?err, "action task failed");
            ActionResponse::from(ActionError::Worker(err.to_string()))
        }
    };

    (StatusCode::OK, Json(response)).into_response()
}

pub async fn serve(config: Config) -> Result<()> {
    let addr = config.listen;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(
        %addr,
        roots = ?config.targets.roots(),
        "cache cleaner endpoint listening"
    );

    axum::serve(listener, router(config))
        .await
        .context("server terminated unexpectedly")
}
