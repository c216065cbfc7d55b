use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};

/// Logs the route template that served a request.
///
/// Installed with `route_layer` so only matched routes pass through it.
pub async fn log_matched_route(request: Request, next: Next) -> Response {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned());
    let method = request.method().clone();

    let response = next.run(request).await;

    if let Some(route) = route {
        tracing::debug!(
            %method,
            route = %route,
            status = response.status().as_u16(),
            "matched route"
        );
    }
    response
}
