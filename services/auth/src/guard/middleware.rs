use axum::extract::{MatchedPath, Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::error::AuthServiceError;
use crate::guard::RequestTarget;
use crate::state::AppState;

/// Route-layer middleware enforcing the `RouteTable`.
///
/// Must be installed with `Router::route_layer` so `MatchedPath` is present;
/// permissions are keyed on the route template, not the concrete URI.
pub async fn auth_guard(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthServiceError> {
    let path = match req.extensions().get::<MatchedPath>() {
        Some(matched) => matched.as_str().to_owned(),
        None => req.uri().path().to_owned(),
    };
    let requirement = state.routes.requirement(req.method(), &path);

    let ctx = state
        .guards()
        .authenticate(
            &requirement,
            &RequestTarget {
                headers: req.headers(),
                method: req.method(),
                path: &path,
            },
        )
        .await?;

    if let Some(ctx) = ctx {
        req.extensions_mut().insert(ctx);
    }
    Ok(next.run(req).await)
}
