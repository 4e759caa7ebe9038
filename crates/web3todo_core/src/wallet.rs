//! Simulated wallet connection.
//!
//! There is no real wallet behind this: `connect` flips `connecting` on
//! immediately and a spawned timer flips `connected` on after a fixed delay.
//! The timer cannot fail and cannot be retried; it can only be discarded by
//! dropping the connector, which cancels the pending flip so a late timer
//! never touches state that is already gone.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_CONNECT_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletPhase {
    Disconnected,
    Connecting,
    Connected,
}

impl WalletPhase {
    pub fn label(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
        }
    }
}

#[derive(Debug, Default)]
struct Flags {
    connecting: AtomicBool,
    connected: AtomicBool,
}

#[derive(Debug)]
pub struct WalletConnector {
    flags: Arc<Flags>,
    cancel: CancellationToken,
    delay: Duration,
}

impl WalletConnector {
    /// Must be created inside a tokio runtime; `connect` spawns the timer.
    pub fn new(delay: Duration) -> Self {
        Self {
            flags: Arc::new(Flags::default()),
            cancel: CancellationToken::new(),
            delay,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.flags.connected.load(Ordering::SeqCst)
    }

    pub fn is_connecting(&self) -> bool {
        self.flags.connecting.load(Ordering::SeqCst)
    }

    pub fn phase(&self) -> WalletPhase {
        if self.is_connected() {
            WalletPhase::Connected
        } else if self.is_connecting() {
            WalletPhase::Connecting
        } else {
            WalletPhase::Disconnected
        }
    }

    /// Starts the simulated connection. Returns `false` without side effects
    /// when already connected or a connection is in flight.
    pub fn connect(&self) -> bool {
        if self.is_connected() || self.flags.connecting.swap(true, Ordering::SeqCst) {
            return false;
        }

        tracing::debug!(delay_ms = self.delay.as_millis() as u64, "wallet connect started");

        let flags = Arc::clone(&self.flags);
        let cancel = self.cancel.clone();
        let delay = self.delay;
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!("wallet connect discarded");
                }
                _ = tokio::time::sleep(delay) => {
                    flags.connected.store(true, Ordering::SeqCst);
                    flags.connecting.store(false, Ordering::SeqCst);
                    tracing::debug!("wallet connected");
                }
            }
        });

        true
    }
}

impl Drop for WalletConnector {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
