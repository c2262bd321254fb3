//! Shutdown signal.
//!
//! Analytics owns the [`Shutdown`] handle and raises it once the final
//! report is out; every other actor holds a [`ShutdownListener`] and stops at
//! its next suspension point.

use tokio::sync::watch;

/// Sending side of the shutdown signal.
#[derive(Debug)]
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

impl Shutdown {
    /// Create an unraised signal.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// New listener for an actor.
    pub fn listener(&self) -> ShutdownListener {
        ShutdownListener { rx: self.tx.subscribe() }
    }

    /// Raise the signal. Idempotent.
    pub fn signal(&self) {
        self.tx.send_replace(true);
    }

    /// Whether the signal has been raised.
    pub fn is_signaled(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving side of the shutdown signal.
#[derive(Debug, Clone)]
pub struct ShutdownListener {
    rx: watch::Receiver<bool>,
}

impl ShutdownListener {
    /// Whether the signal has been raised.
    pub fn is_signaled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once the signal is raised, or once the [`Shutdown`] handle is
    /// dropped.
    pub async fn wait(&mut self) {
        let _ = self.rx.wait_for(|stopped| *stopped).await;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn listeners_wake_on_signal() {
        let shutdown = Shutdown::new();
        let mut listener = shutdown.listener();
        assert!(!listener.is_signaled());

        let waiter = tokio::spawn(async move {
            listener.wait().await;
            listener.is_signaled()
        });

        tokio::time::sleep(Duration::from_millis(10)).await;
        shutdown.signal();
        assert!(waiter.await.unwrap());
        assert!(shutdown.is_signaled());
    }

    #[tokio::test(start_paused = true)]
    async fn late_listener_sees_raised_signal() {
        let shutdown = Shutdown::new();
        shutdown.signal();

        let mut listener = shutdown.listener();
        listener.wait().await;
        assert!(listener.is_signaled());
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_handle_releases_waiters() {
        let shutdown = Shutdown::new();
        let mut listener = shutdown.listener();
        drop(shutdown);
        listener.wait().await;
        assert!(!listener.is_signaled());
    }
}
