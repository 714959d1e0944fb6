use tokio::sync::watch;

/// Sender half of the shutdown broadcast.
pub struct ShutdownTrigger {
    tx: watch::Sender<bool>,
}

impl ShutdownTrigger {
    pub fn trigger(&self) {
        // Receivers may all be gone already
        let _ = self.tx.send(true);
    }
}

/// Shutdown flag checked by sweeps between records.
#[derive(Clone)]
pub struct Shutdown {
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    pub fn channel() -> (ShutdownTrigger, Shutdown) {
        let (tx, rx) = watch::channel(false);
        (ShutdownTrigger { tx }, Shutdown { rx })
    }

    /// A signal that never fires, for one-off runs and tests.
    pub fn never() -> Self {
        let (_trigger, shutdown) = Self::channel();
        shutdown
    }

    pub fn is_requested(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once shutdown has been requested.
    pub async fn requested(&mut self) {
        // An error means the trigger was dropped without firing, which never
        // resolves into a shutdown.
        if self.rx.wait_for(|stop| *stop).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
