//! User interrupt, observable from any await point of a run.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::warn;

#[derive(Clone)]
pub struct Interrupt {
    rx: watch::Receiver<bool>,
}

#[derive(Clone)]
pub struct InterruptHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl InterruptHandle {
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }
}

impl Interrupt {
    pub fn pair() -> (InterruptHandle, Interrupt) {
        let (tx, rx) = watch::channel(false);
        (InterruptHandle { tx: Arc::new(tx) }, Interrupt { rx })
    }

    /// An interrupt that never fires.
    pub fn never() -> Self {
        let (_, interrupt) = Self::pair();
        interrupt
    }

    /// Fires on Ctrl-C. Must be called from within a tokio runtime.
    pub fn ctrl_c() -> Self {
        let (handle, interrupt) = Self::pair();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupt received, finishing up");
                handle.trigger();
            }
        });
        interrupt
    }

    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once the interrupt fires; pends forever if it never can.
    pub async fn triggered(&self) {
        let mut rx = self.rx.clone();
        if rx.wait_for(|fired| *fired).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
