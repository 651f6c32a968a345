//! # Heartbeat
//!
//! Ping/pong liveness loops for long-lived connections.
//!
//! The integrator bridges its transport to these loops: inbound ping or pong
//! frames are forwarded as [`Signal`] values on a channel (`Ok(())` for a
//! clean frame, `Err` when the read path failed), and outbound frames are
//! written by an async callback. When a loop returns an error the connection
//! should be considered dead.
//!
//! - [`wait_ping_send_pong`]: the passive side. The peer pings, we pong.
//! - [`send_ping_wait_pong`]: the active side. We ping every half window and
//!   expect a pong within the window.
//!
//! Both loops poll a stop predicate between iterations and return `Ok(())`
//! once it reports `true`.
//!
//! # Example
//!
//! ```rust,ignore
//! let (pong_tx, pong_rx) = mpsc::channel(8);
//! // read path: on every Pong frame -> pong_tx.send(Ok(())).await
//!
//! let sink = sink.clone();
//! let closed = closed.clone();
//! let result = send_ping_wait_pong(
//!     move || { let sink = sink.clone(); async move { sink.ping().await } },
//!     pong_rx,
//!     move || closed.load(Ordering::Relaxed),
//!     Duration::from_secs(60),
//! )
//! .await;
//!
//! if let Err(err) = result {
//!     connection.close(err).await;
//! }
//! ```

mod receiver;
mod sender;

pub use receiver::wait_ping_send_pong;
pub use sender::{ping_period, send_ping_wait_pong};

use multiplex_core::BoxError;

/// An inbound ping or pong as reported by the transport read path.
pub type Signal = Result<(), BoxError>;
