// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Execution Gateway Contributors

//! HTTP API: router assembly and OpenAPI document.

pub mod execution;
pub mod health;

use axum::{routing::get, routing::post, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Execution Gateway API",
        description = "Resolves execution methods, checks signer funds and runs the confirm/execute flow for multisig transactions.",
        version = env!("CARGO_PKG_VERSION"),
    ),
    paths(
        health::health,
        execution::resolve_method,
        execution::check_funds,
        execution::confirm,
    ),
    components(schemas(
        health::HealthResponse,
        execution::FeeParamsBody,
        execution::ResolveMethodRequest,
        execution::ResolveMethodResponse,
        execution::FundsCheckRequest,
        execution::FundsCheckResponse,
        execution::ConfirmRequest,
        execution::ConfirmStatus,
        execution::ConfirmResponse,
        crate::execution::ExecutionMethod,
        crate::execution::Signer,
        crate::execution::SignerKind,
        crate::execution::Route,
        crate::relay::RelayQuota,
    )),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Execution", description = "Execution method resolution, funds checks and confirm flow"),
    )
)]
pub struct ApiDoc;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .route("/health", get(health::health))
        .route(
            "/v1/chains/{chain_id}/execution/resolve",
            post(execution::resolve_method),
        )
        .route(
            "/v1/chains/{chain_id}/execution/funds-check",
            post(execution::check_funds),
        )
        .route(
            "/v1/chains/{chain_id}/execution/confirm",
            post(execution::confirm),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
