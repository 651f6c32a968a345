//! Wait for ping, send pong.

use super::Signal;
use multiplex_core::{BoxError, HeartbeatError};
use std::{future::Future, time::Duration};
use tokio::{
    sync::mpsc,
    time::{self, Instant},
};

/// Answer the peer's pings until it goes silent or `is_stop` returns `true`.
///
/// Each iteration races a deadline of `ping_wait` against the next signal on
/// `ping`:
///
/// - the deadline fires first: [`HeartbeatError::PingTimeout`];
/// - the signal carries an error: [`HeartbeatError::HandlePing`], no pong is sent;
/// - a clean ping: `pong` is called, a failure yields
///   [`HeartbeatError::SendPong`], a success re-arms the deadline for a full
///   window.
///
/// A closed `ping` channel yields [`HeartbeatError::ChannelClosed`]. The
/// deadline is owned by this call and released on every return path.
pub async fn wait_ping_send_pong<F, Fut, S>(
    ping: &mut mpsc::Receiver<Signal>,
    mut pong: F,
    is_stop: S,
    ping_wait: Duration,
) -> Result<(), HeartbeatError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), BoxError>>,
    S: Fn() -> bool,
{
    let deadline = time::sleep(ping_wait);
    tokio::pin!(deadline);

    while !is_stop() {
        tokio::select! {
            () = &mut deadline => {
                return Err(HeartbeatError::PingTimeout(ping_wait));
            }
            signal = ping.recv() => {
                match signal {
                    Some(Ok(())) => {}
                    Some(Err(err)) => return Err(HeartbeatError::HandlePing(err)),
                    None => return Err(HeartbeatError::ChannelClosed("ping")),
                }

                pong().await.map_err(HeartbeatError::SendPong)?;

                #[cfg(feature = "tracing")]
                {
                    tracing::trace!("heartbeat ping answered");
                }

                deadline.as_mut().reset(Instant::now() + ping_wait);
            }
        }
    }

    #[cfg(feature = "tracing")]
    {
        tracing::debug!("heartbeat receiver stopped");
    }

    Ok(())
}
