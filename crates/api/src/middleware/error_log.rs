//! Server-error capture into the document error log.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::state::AppState;

/// Record 5xx responses into the error log, where the backend carries
/// activity collections. A failure to log is itself only logged; the
/// response always goes out.
pub async fn record_server_errors(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    let response = next.run(request).await;

    if response.status().is_server_error()
        && let Some(activity) = state.stores().activity.as_ref()
        && let Err(e) = activity
            .log_error(&path, &response.status().to_string())
            .await
    {
        tracing::warn!(error = %e, "failed to record error log entry");
    }

    response
}
