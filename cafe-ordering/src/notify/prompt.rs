//! Manual fallback for a blocked deep link
//!
//! When the messaging link cannot be opened automatically the caller shows
//! a visible "open manually" affordance. The prompt hides itself after a
//! fixed duration; opening the link or dismissing cancels that timer.

use super::LinkOpener;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Visible fallback affordance for a blocked link
#[derive(Debug)]
pub struct FallbackPrompt {
    url: String,
    visible: Arc<AtomicBool>,
    cancel: CancellationToken,
}

impl FallbackPrompt {
    /// Show the prompt and arm its auto-dismiss timer
    ///
    /// Without a tokio runtime the prompt stays until dismissed.
    pub(crate) fn show(url: String, auto_dismiss: Duration) -> Self {
        let visible = Arc::new(AtomicBool::new(true));
        let cancel = CancellationToken::new();

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let visible = visible.clone();
                let cancel = cancel.clone();
                handle.spawn(async move {
                    tokio::select! {
                        _ = cancel.cancelled() => {}
                        _ = tokio::time::sleep(auto_dismiss) => {
                            visible.store(false, Ordering::SeqCst);
                            tracing::debug!("Fallback prompt auto-dismissed");
                        }
                    }
                });
            }
            Err(_) => {
                tracing::debug!("No runtime; fallback prompt has no auto-dismiss");
            }
        }

        Self {
            url,
            visible,
            cancel,
        }
    }

    /// Deep link the user can open by hand
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }

    /// Whether the auto-dismiss timer has been cancelled
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// User clicked the manual link
    pub fn open_manually(&self, opener: &dyn LinkOpener) -> bool {
        self.close();
        opener.open(&self.url)
    }

    /// User dismissed the prompt
    pub fn dismiss(&self) {
        self.close();
    }

    fn close(&self) {
        self.cancel.cancel();
        self.visible.store(false, Ordering::SeqCst);
    }
}

impl Drop for FallbackPrompt {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
