//! Concrete future types for background key generation.
//!
//! Generation runs on the runtime's blocking pool; the result comes back
//! through a oneshot channel wrapped in [`GenerationFuture`]. A keypair keeps
//! the future in [`SharedGeneration`] so every conversion awaits the same
//! memoised outcome.

use crate::error::{Error, Result};
use crate::generation::{generate_pem_pair, GenerationRequest};
use crate::types::KeyHalves;
use futures::future::{FutureExt, Shared};
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};
use tokio::runtime::Handle;
use tokio::sync::oneshot;

/// Future resolving to a freshly generated PEM pair.
pub struct GenerationFuture {
    rx: oneshot::Receiver<Result<KeyHalves<String>>>,
}

impl GenerationFuture {
    /// Create a new generation future with the given receiver.
    pub(crate) fn new(rx: oneshot::Receiver<Result<KeyHalves<String>>>) -> Self {
        Self { rx }
    }

    /// Start generation on the current runtime's blocking pool
    ///
    /// Dropping the returned future does not stop the work; its result is
    /// discarded.
    pub(crate) fn spawn(request: GenerationRequest) -> Result<Self> {
        let handle = Handle::try_current().map_err(|e| {
            Error::configuration().context(format!(
                "Key pair generation requires a running Tokio runtime: {e}"
            ))
        })?;
        let (tx, rx) = oneshot::channel();
        handle.spawn_blocking(move || {
            let _ = tx.send(generate_pem_pair(&request));
        });
        Ok(Self::new(rx))
    }
}

impl Future for GenerationFuture {
    type Output = Result<KeyHalves<String>>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => Poll::Ready(Err(Error::internal()
                .context("Key pair generation task ended without a result"))),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Memoised generation, cheap to clone
pub type SharedGeneration = Shared<GenerationFuture>;

/// Wrap a generation future so it runs once for every clone
pub(crate) fn share(future: GenerationFuture) -> SharedGeneration {
    future.shared()
}
