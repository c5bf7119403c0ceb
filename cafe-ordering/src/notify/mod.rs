//! Notification Dispatcher
//!
//! Formats the order summary and hands it to an external messaging channel
//! through a deep link. A link that cannot be confirmed open is "blocked":
//! the order is already persisted, so the caller gets a manual fallback
//! prompt instead of an error.

mod message;
mod phone;
mod prompt;

pub use message::compose_message;
pub use phone::{build_deep_link, normalize_phone};
pub use prompt::FallbackPrompt;

use crate::OrderingConfig;
use std::io;
use std::process::{Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Opens a URL with whatever handles links on this host
pub trait LinkOpener: Send + Sync {
    /// Returns `true` only when the handler is confirmed to have started
    fn open(&self, url: &str) -> bool;
}

/// Opener backed by the platform's URL handler
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOpener;

impl LinkOpener for SystemOpener {
    fn open(&self, url: &str) -> bool {
        let mut command = if cfg!(target_os = "windows") {
            let mut c = Command::new("cmd");
            c.args(["/C", "start", ""]);
            c
        } else if cfg!(target_os = "macos") {
            Command::new("open")
        } else {
            Command::new("xdg-open")
        };

        command.arg(url);
        match spawn_reaped(command) {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to launch URL handler");
                false
            }
        }
    }
}

/// Start a launcher process and wait on it from a background thread, so an
/// exited launcher is always reaped
fn spawn_reaped(mut command: Command) -> io::Result<JoinHandle<io::Result<ExitStatus>>> {
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    thread::Builder::new()
        .name("url-launcher".into())
        .spawn(move || {
            let status = child.wait();
            match &status {
                Ok(status) if !status.success() => {
                    tracing::debug!(%status, "URL handler exited with failure");
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "Failed to wait for URL handler"),
            }
            status
        })
}

/// Result of a delivery attempt
#[derive(Debug)]
pub enum DeliveryOutcome {
    /// The messaging channel was opened
    Opened { url: String },
    /// The link could not be opened; show the prompt
    Blocked(FallbackPrompt),
}

impl DeliveryOutcome {
    pub fn is_blocked(&self) -> bool {
        matches!(self, DeliveryOutcome::Blocked(_))
    }

    pub fn url(&self) -> &str {
        match self {
            DeliveryOutcome::Opened { url } => url,
            DeliveryOutcome::Blocked(prompt) => prompt.url(),
        }
    }
}

/// Notification dispatcher
pub struct NotificationDispatcher<O> {
    opener: O,
    messaging_host: String,
    country_code: String,
    fallback_dismiss: Duration,
}

impl<O: LinkOpener> NotificationDispatcher<O> {
    pub fn new(opener: O, config: &OrderingConfig) -> Self {
        Self {
            opener,
            messaging_host: config.messaging_host.clone(),
            country_code: config.country_code.clone(),
            fallback_dismiss: config.fallback_dismiss,
        }
    }

    pub fn opener(&self) -> &O {
        &self.opener
    }

    /// Deep link for a message to a raw phone number
    pub fn deep_link(&self, message: &str, raw_phone: &str) -> String {
        let msisdn = normalize_phone(raw_phone, &self.country_code);
        build_deep_link(&self.messaging_host, &msisdn, message)
    }

    /// Try to open the messaging channel with the message prefilled
    pub fn deliver(&self, message: &str, raw_phone: &str) -> DeliveryOutcome {
        let url = self.deep_link(message, raw_phone);
        if self.opener.open(&url) {
            tracing::info!("Opened messaging link");
            DeliveryOutcome::Opened { url }
        } else {
            tracing::warn!("Messaging link blocked, offering manual fallback");
            DeliveryOutcome::Blocked(FallbackPrompt::show(url, self.fallback_dismiss))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct FakeOpener {
        allow: AtomicBool,
    }

    impl LinkOpener for FakeOpener {
        fn open(&self, _url: &str) -> bool {
            self.allow.load(Ordering::SeqCst)
        }
    }

    fn dispatcher(allow: bool) -> NotificationDispatcher<FakeOpener> {
        NotificationDispatcher::new(
            FakeOpener {
                allow: AtomicBool::new(allow),
            },
            &OrderingConfig::default(),
        )
    }

    #[cfg(unix)]
    #[test]
    fn test_launcher_process_is_waited_on() {
        let reaper = spawn_reaped(Command::new("true")).unwrap();
        let status = reaper.join().unwrap().unwrap();
        assert!(status.success());

        assert!(spawn_reaped(Command::new("definitely-not-a-url-handler")).is_err());
    }

    #[test]
    fn test_opened_link_targets_normalized_phone() {
        let outcome = dispatcher(true).deliver("Oi", "011987654321");
        assert!(!outcome.is_blocked());
        assert_eq!(outcome.url(), "https://wa.me/5511987654321?text=Oi");
    }

    #[tokio::test(start_paused = true)]
    async fn test_blocked_link_returns_prompt() {
        let outcome = dispatcher(false).deliver("Oi", "11987654321");
        match outcome {
            DeliveryOutcome::Blocked(prompt) => {
                assert!(prompt.is_visible());
                assert_eq!(prompt.url(), "https://wa.me/5511987654321?text=Oi");

                tokio::time::sleep(Duration::from_secs(9)).await;
                assert!(!prompt.is_visible());
            }
            other => panic!("expected blocked outcome, got {other:?}"),
        }
    }
}
