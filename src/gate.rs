//! Process-wide trading switch
//!
//! Starts disabled. Only the operator start/stop commands write it. The
//! flag sits in a watch channel so in-flight swaps can notice a stop.

use tokio::sync::watch;
use tracing::info;

#[derive(Debug)]
pub struct TradingGate {
    enabled: watch::Sender<bool>,
}

impl Default for TradingGate {
    fn default() -> Self {
        Self::new()
    }
}

impl TradingGate {
    pub fn new() -> Self {
        let (enabled, _) = watch::channel(false);
        Self { enabled }
    }

    /// Returns `true` if this call changed the state.
    pub fn enable(&self) -> bool {
        let changed = self.set(true);
        if changed {
            info!("Trading enabled");
        }
        changed
    }

    /// Returns `true` if this call changed the state.
    pub fn disable(&self) -> bool {
        let changed = self.set(false);
        if changed {
            info!("Trading disabled");
        }
        changed
    }

    pub fn is_enabled(&self) -> bool {
        *self.enabled.borrow()
    }

    /// Resolves once trading is disabled (immediately if it already is).
    pub async fn disabled(&self) {
        let mut rx = self.enabled.subscribe();
        if rx.wait_for(|enabled| !enabled).await.is_err() {
            // the sender lives in `self`, so this cannot happen while borrowed
            std::future::pending::<()>().await;
        }
    }

    fn set(&self, value: bool) -> bool {
        self.enabled.send_if_modified(|current| {
            if *current == value {
                return false;
            }
            *current = value;
            true
        })
    }
}
