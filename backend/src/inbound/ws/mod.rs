//! WebSocket inbound adapter streaming shelf changes to clients.
//!
//! ```text
//! GET /ws/shelf/{volumeId}
//! ```
//!
//! The upgrade needs a signed-in session. The status subscription is opened
//! before upgrading, so a missing session or a malformed volume id is
//! answered with a regular JSON error instead of a socket.

use actix_web::web::{self, Payload};
use actix_web::{HttpRequest, HttpResponse, get};
use tracing::{debug, error};

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::validation::{FieldName, parse_volume_id};

mod session;

pub mod messages;
pub mod state;

/// Upgrade to a live status feed for one volume on the caller's shelves.
#[get("/ws/shelf/{volume_id}")]
pub async fn shelf_feed(
    state: web::Data<state::WsState>,
    session: SessionContext,
    path: web::Path<String>,
    req: HttpRequest,
    body: Payload,
) -> ApiResult<HttpResponse> {
    let caller = session.caller()?;
    let volume = parse_volume_id(&path.into_inner(), FieldName::new("volumeId"))?;
    let subscription = state.shelf_query.observe_status(&caller, &volume).await?;

    let (response, ws_session, stream) = actix_ws::handle(&req, body).map_err(|err| {
        error!(error = %err, "WebSocket upgrade failed");
        Error::invalid_input("WebSocket upgrade failed")
    })?;
    debug!(%volume, "shelf feed opened");
    actix_web::rt::spawn(session::handle_feed_session(
        volume,
        subscription,
        ws_session,
        stream,
    ));
    Ok(response)
}
