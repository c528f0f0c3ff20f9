use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use shared::{
    api::{
        error::{Nothing, ServerError},
        Object,
    },
    other_error,
};
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{cli::Cli, AppState};

mod ping;
pub use ping::*;

mod users;
pub use users::*;

mod exercises;
pub use exercises::*;

/// Every api route, without any of the http layers
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route(Object::Ping.path(), get(ping))
        .route(Object::Users.path(), get(list_users).post(create_user))
        .route(Object::UserExercises.path(), post(add_exercise))
        .route(Object::UserLogs.path(), get(exercise_log))
}

fn cors_layer(origin: Option<&str>) -> Result<CorsLayer, ServerError<Nothing>> {
    let Some(origin) = origin else {
        return Ok(CorsLayer::permissive());
    };

    let origin = HeaderValue::from_str(origin)
        .map_err(|e| other_error!("Invalid cors origin {origin:?}: {e}"))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]))
}

/// The complete application: api routes, the index page, static assets for
/// everything else, and the request layers
pub fn app(state: AppState, args: &Cli) -> Result<Router, ServerError<Nothing>> {
    Ok(api_router()
        .route_service("/", ServeFile::new(&args.index_file))
        .fallback_service(ServeDir::new(&args.assets_dir))
        .layer(RequestBodyLimitLayer::new(args.request_body_limit_bytes))
        .layer(cors_layer(args.cors_origin.as_deref())?)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state))
}
