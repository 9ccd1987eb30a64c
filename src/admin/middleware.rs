use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use log::debug;

use crate::state::AppState;

use super::Id;

const ADMIN_ID_HEADER: &str = "x-admin-id";

/// Resolves the staff identity attached to the request through the account
/// directory and injects the full account as an extension. Session handling
/// itself belongs to the platform; by the time a request reaches this core
/// the caller's id is already carried in a trusted header.
pub async fn authenticate(
    state: State<AppState>,
    mut req: Request,
    next: Next,
) -> crate::Result<Response> {
    let id = req
        .headers()
        .get(ADMIN_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| uuid::Uuid::parse_str(s).ok())
        .map(Id)
        .ok_or(crate::Error::Unauthorized)?;

    let account = state.directory.get_admin(&id).await.map_err(|e| {
        debug!("unknown staff identity {id}: {e}");
        crate::Error::Unauthorized
    })?;

    req.extensions_mut().insert(account);

    Ok(next.run(req).await)
}
