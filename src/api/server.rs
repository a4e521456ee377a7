use std::time::Duration;

use axum::{
    Json,
    Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::crate_version;
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::{
    api::{
        payload::ProductionPlanRequest,
        response::{ErrorDetail, Health, PowerDispatch},
    },
    core::error::ErrorKind,
    prelude::*,
};

pub fn router(timeout: Duration) -> Router {
    Router::new()
        .route("/productionplan", post(post_production_plan))
        .route("/health", get(get_health))
        .layer((TraceLayer::new_for_http(), TimeoutLayer::new(timeout)))
}

pub async fn serve(bind_address: &str, timeout: Duration) -> Result {
    let listener =
        TcpListener::bind(bind_address).await.context("failed to bind to the address")?;
    info!(bind_address, "Serving…");
    axum::serve(listener, router(timeout)).with_graceful_shutdown(shutdown_signal()).await?;
    info!("Stopped");
    Ok(())
}

/// Per <https://github.com/tokio-rs/axum/blob/main/examples/graceful-shutdown/src/main.rs>.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {error:#}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                error!("Failed to install the signal handler: {error:#}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("Shutting down…");
}

#[instrument(skip_all)]
async fn post_production_plan(Json(request): Json<ProductionPlanRequest>) -> Response {
    info!(load = %request.load, n_power_plants = request.powerplants.len(), "Planning…");
    match request.plan() {
        Ok(plan) => {
            info!(
                n_committed = plan.summary.n_committed,
                hourly_cost = %plan.summary.hourly_cost,
                "Planned",
            );
            Json(Vec::<PowerDispatch>::from(&plan)).into_response()
        }
        Err(error) => match error.kind() {
            ErrorKind::Configuration | ErrorKind::Infeasible => {
                warn!("Rejected: {error}");
                (StatusCode::BAD_REQUEST, Json(ErrorDetail::new(error.to_string()))).into_response()
            }
            ErrorKind::Internal => {
                error!("Failed to plan the production: {error}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorDetail::new("internal error while planning the production")),
                )
                    .into_response()
            }
        },
    }
}

async fn get_health() -> Json<Health> {
    Json(Health { status: "ok", version: crate_version!() })
}
