//! Send ping, wait for pong.

use super::Signal;
use multiplex_core::{BoxError, HeartbeatError};
use std::{future::Future, sync::Arc, time::Duration};
use tokio::{
    sync::mpsc,
    task::JoinError,
    time::{self, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

type Notify = mpsc::Sender<Result<(), HeartbeatError>>;

/// The ping period for a pong wait window: half the window.
///
/// At least one extra ping goes out before the peer's pong deadline.
pub fn ping_period(pong_wait: Duration) -> Duration {
    pong_wait / 2
}

/// Ping the peer every half window and require a pong within each window.
///
/// Two tasks run until one of them reports:
///
/// - the ping task calls `ping` on every tick of [`ping_period`] and reports
///   [`HeartbeatError::SendPing`] if it fails;
/// - the pong task races a `pong_wait` deadline against `pong` signals,
///   re-arming the deadline on every clean pong, and reports
///   [`HeartbeatError::PongTimeout`], [`HeartbeatError::HandlePong`] or
///   [`HeartbeatError::ChannelClosed`].
///
/// Either task reports `Ok(())` when `is_stop` returns `true`. The first
/// report is returned; a task that panics ends the session with
/// [`HeartbeatError::Aborted`] straight away. The other task is told to
/// finish through a shared cancellation token and exits at its next select
/// point; a task that is inside the `ping` callback finishes that call first.
///
/// Must be called within a tokio runtime. A window shorter than two
/// nanoseconds is rejected with [`HeartbeatError::InvalidWindow`].
pub async fn send_ping_wait_pong<F, Fut, S>(
    ping: F,
    pong: mpsc::Receiver<Signal>,
    is_stop: S,
    pong_wait: Duration,
) -> Result<(), HeartbeatError>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
    S: Fn() -> bool + Send + Sync + 'static,
{
    let period = ping_period(pong_wait);
    if period.is_zero() {
        return Err(HeartbeatError::InvalidWindow(pong_wait));
    }

    let done = CancellationToken::new();
    let _done_guard = done.clone().drop_guard();

    let (notify, mut outcome) = mpsc::channel(2);
    let is_stop = Arc::new(is_stop);

    let mut ping_task = tokio::spawn(send_ping(
        ping,
        Arc::clone(&is_stop),
        period,
        done.clone(),
        notify.clone(),
    ));
    let mut pong_task = tokio::spawn(wait_pong(pong, is_stop, pong_wait, done, notify));

    let result = tokio::select! {
        biased;
        reported = outcome.recv() => reported.unwrap_or(Err(HeartbeatError::Aborted)),
        joined = &mut ping_task => settle(joined, &mut outcome),
        joined = &mut pong_task => settle(joined, &mut outcome),
    };

    #[cfg(feature = "tracing")]
    {
        match &result {
            Ok(()) => tracing::debug!("heartbeat sender stopped"),
            Err(err) => tracing::debug!(%err, "heartbeat sender ended"),
        }
    }

    result
}

/// Outcome once one of the tasks has ended.
///
/// A task that ends normally has already reported. One that panicked has
/// not, which makes the session [`HeartbeatError::Aborted`].
fn settle(
    joined: Result<(), JoinError>,
    outcome: &mut mpsc::Receiver<Result<(), HeartbeatError>>,
) -> Result<(), HeartbeatError> {
    if let Ok(reported) = outcome.try_recv() {
        return reported;
    }

    #[cfg(feature = "tracing")]
    {
        if let Err(err) = &joined {
            tracing::warn!(%err, "heartbeat task ended without reporting");
        }
    }
    let _ = joined;

    Err(HeartbeatError::Aborted)
}

async fn send_ping<F, Fut, S>(
    mut ping: F,
    is_stop: Arc<S>,
    period: Duration,
    done: CancellationToken,
    notify: Notify,
) where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), BoxError>>,
    S: Fn() -> bool,
{
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    while !(*is_stop)() {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(err) = ping().await {
                    let _ = notify.send(Err(HeartbeatError::SendPing(err))).await;
                    return;
                }

                #[cfg(feature = "tracing")]
                {
                    tracing::trace!("heartbeat ping sent");
                }
            }
            () = done.cancelled() => return,
        }
    }

    let _ = notify.send(Ok(())).await;
}

async fn wait_pong<S>(
    mut pong: mpsc::Receiver<Signal>,
    is_stop: Arc<S>,
    pong_wait: Duration,
    done: CancellationToken,
    notify: Notify,
) where
    S: Fn() -> bool,
{
    let deadline = time::sleep(pong_wait);
    tokio::pin!(deadline);

    while !(*is_stop)() {
        tokio::select! {
            () = &mut deadline => {
                let _ = notify.send(Err(HeartbeatError::PongTimeout(pong_wait))).await;
                return;
            }
            signal = pong.recv() => {
                let failure = match signal {
                    Some(Ok(())) => None,
                    Some(Err(err)) => Some(HeartbeatError::HandlePong(err)),
                    None => Some(HeartbeatError::ChannelClosed("pong")),
                };
                if let Some(err) = failure {
                    let _ = notify.send(Err(err)).await;
                    return;
                }

                #[cfg(feature = "tracing")]
                {
                    tracing::trace!("heartbeat pong received");
                }

                deadline.as_mut().reset(Instant::now() + pong_wait);
            }
            () = done.cancelled() => return,
        }
    }

    let _ = notify.send(Ok(())).await;
}
