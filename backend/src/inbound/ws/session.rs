//! Per-connection shelf feed.
//!
//! Pushes a `shelfStatus` frame for the current status on connect and for
//! every distinct change afterwards. The feed is server-push only: client
//! text or binary frames close the connection with a policy error. Pings go
//! out every 5s and a connection is idle after 10s without client traffic;
//! tests shorten both.

use std::time::{Duration, Instant};

use actix_ws::{CloseCode, CloseReason, Closed, Message, MessageStream, ProtocolError, Session};
use serde::Serialize;
use tokio::time;
use tracing::{debug, warn};

use crate::domain::ports::StatusSubscription;
use crate::domain::{ReadingStatus, VolumeId};
use crate::inbound::ws::messages::FeedMessage;

/// Time between heartbeats to the client.
#[cfg(not(test))]
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
#[cfg(test)]
const HEARTBEAT_INTERVAL: Duration = Duration::from_millis(50);

/// Max idle time before disconnecting the client.
#[cfg(not(test))]
const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);
#[cfg(test)]
const CLIENT_TIMEOUT: Duration = Duration::from_millis(100);

pub(super) async fn handle_feed_session(
    volume: VolumeId,
    subscription: StatusSubscription,
    session: Session,
    stream: MessageStream,
) {
    FeedSession::new(volume, subscription).run(session, stream).await;
}

enum SessionError {
    ClientClosed(Option<CloseReason>),
    StreamClosed,
    FeedEnded,
    HeartbeatTimeout,
    Protocol(ProtocolError),
    UnexpectedPayload,
    Serialize(serde_json::Error),
    Network(Closed),
}

enum CloseAction {
    None,
    Close(Option<CloseReason>),
}

struct FeedSession {
    volume: VolumeId,
    subscription: StatusSubscription,
}

impl FeedSession {
    fn new(volume: VolumeId, subscription: StatusSubscription) -> Self {
        Self {
            volume,
            subscription,
        }
    }

    async fn run(mut self, mut session: Session, mut stream: MessageStream) {
        let mut last_heartbeat = Instant::now();
        let mut heartbeat = time::interval(HEARTBEAT_INTERVAL);

        loop {
            let result = tokio::select! {
                _ = heartbeat.tick() => {
                    handle_heartbeat_tick(&mut session, &last_heartbeat).await
                }
                message = stream.recv() => {
                    handle_stream_message(&mut session, &mut last_heartbeat, message).await
                }
                status = self.subscription.next() => {
                    self.push_status(&mut session, status).await
                }
            };

            if let Err(error) = result {
                log_shutdown_reason(&self.volume, &error);
                close_session_if_needed(session, close_action_for(&error)).await;
                // Dropping `self` releases the store's change channel.
                return;
            }
        }
    }

    async fn push_status(
        &self,
        session: &mut Session,
        status: Option<Option<ReadingStatus>>,
    ) -> Result<(), SessionError> {
        let Some(status) = status else {
            return Err(SessionError::FeedEnded);
        };
        let frame = FeedMessage::shelf_status(self.volume.clone(), status);
        send_json(session, &frame).await
    }
}

async fn handle_heartbeat_tick(
    session: &mut Session,
    last_heartbeat: &Instant,
) -> Result<(), SessionError> {
    if Instant::now().duration_since(*last_heartbeat) > CLIENT_TIMEOUT {
        return Err(SessionError::HeartbeatTimeout);
    }
    session.ping(b"").await.map_err(SessionError::Network)
}

async fn handle_stream_message(
    session: &mut Session,
    last_heartbeat: &mut Instant,
    message: Option<Result<Message, ProtocolError>>,
) -> Result<(), SessionError> {
    let Some(message) = message else {
        return Err(SessionError::StreamClosed);
    };

    match message {
        Ok(Message::Ping(payload)) => {
            *last_heartbeat = Instant::now();
            session.pong(&payload).await.map_err(SessionError::Network)
        }
        Ok(Message::Pong(_) | Message::Continuation(_) | Message::Nop) => {
            *last_heartbeat = Instant::now();
            Ok(())
        }
        Ok(Message::Text(_) | Message::Binary(_)) => Err(SessionError::UnexpectedPayload),
        Ok(Message::Close(reason)) => Err(SessionError::ClientClosed(reason)),
        Err(error) => Err(SessionError::Protocol(error)),
    }
}

fn encode_frame<T: Serialize>(frame: &T) -> Result<String, SessionError> {
    serde_json::to_string(frame).map_err(SessionError::Serialize)
}

async fn send_json(session: &mut Session, frame: &FeedMessage) -> Result<(), SessionError> {
    let body = encode_frame(frame)?;
    session.text(body).await.map_err(SessionError::Network)
}

fn log_shutdown_reason(volume: &VolumeId, error: &SessionError) {
    match error {
        SessionError::HeartbeatTimeout => {
            warn!(%volume, "feed heartbeat timeout; closing connection");
        }
        SessionError::Protocol(error) => {
            warn!(%volume, error = %error, "feed protocol error");
        }
        SessionError::Network(error) => {
            warn!(%volume, error = %error, "feed send failed; closing connection");
        }
        SessionError::UnexpectedPayload => {
            warn!(%volume, "client sent data on a push-only feed");
        }
        SessionError::Serialize(error) => {
            warn!(%volume, error = %error, "failed to serialise feed frame; closing connection");
        }
        SessionError::FeedEnded => debug!(%volume, "shelf feed ended"),
        SessionError::ClientClosed(_) | SessionError::StreamClosed => {
            debug!(%volume, "feed client disconnected");
        }
    }
}

fn close_action_for(error: &SessionError) -> CloseAction {
    match error {
        SessionError::HeartbeatTimeout => CloseAction::Close(Some(CloseReason {
            code: CloseCode::Normal,
            description: Some("heartbeat timeout".to_owned()),
        })),
        SessionError::FeedEnded => CloseAction::Close(Some(CloseReason {
            code: CloseCode::Away,
            description: Some("feed ended".to_owned()),
        })),
        SessionError::Protocol(_) => CloseAction::Close(Some(CloseReason {
            code: CloseCode::Protocol,
            description: Some("protocol error".to_owned()),
        })),
        SessionError::UnexpectedPayload => CloseAction::Close(Some(CloseReason {
            code: CloseCode::Policy,
            description: Some("feed is push-only".to_owned()),
        })),
        SessionError::Serialize(_) => CloseAction::Close(Some(CloseReason {
            code: CloseCode::Error,
            description: Some("internal error".to_owned()),
        })),
        SessionError::ClientClosed(reason) => CloseAction::Close(reason.clone()),
        SessionError::StreamClosed | SessionError::Network(_) => CloseAction::None,
    }
}

async fn close_session_if_needed(session: Session, close_action: CloseAction) {
    if let CloseAction::Close(reason) = close_action {
        if let Err(error) = session.close(reason).await {
            warn!(error = %error, "failed to close feed session");
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
