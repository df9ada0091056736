//! Startup gate: keep probing the database until it answers or the attempts run out.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Upper bound on probes. Zero means no probe at all.
    pub max_attempts: u32,
    /// Fixed pause between a failed probe and the next one.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 10, delay: Duration::from_secs(5) }
    }
}

/// Stato di connettività del processo, deciso una sola volta all'avvio.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Connectivity {
    #[default]
    Unestablished,
    Established { attempts: u32 },
    Failed { attempts: u32, last_error: Option<String> },
}

impl Connectivity {
    pub fn is_established(&self) -> bool {
        matches!(self, Connectivity::Established { .. })
    }

    /// Number of probes performed to reach this state.
    pub fn attempts(&self) -> u32 {
        match self {
            Connectivity::Unestablished => 0,
            Connectivity::Established { attempts } | Connectivity::Failed { attempts, .. } => {
                *attempts
            }
        }
    }
}

/// Runs `probe` up to `policy.max_attempts` times, sleeping `policy.delay`
/// between failures. Returns as soon as a probe succeeds; never sleeps after
/// the last failed attempt.
pub async fn wait_for_db<F, Fut, E>(policy: &RetryPolicy, mut probe: F) -> Connectivity
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: Display,
{
    let max_attempts = policy.max_attempts;
    if max_attempts == 0 {
        tracing::error!("database retry budget is zero, no probe attempted");
        return Connectivity::Failed { attempts: 0, last_error: None };
    }

    let mut last_error = None;
    for attempt in 1..=max_attempts {
        match probe().await {
            Ok(()) => {
                tracing::info!(attempt, max_attempts, "connected to database");
                return Connectivity::Established { attempts: attempt };
            }
            Err(e) => {
                tracing::warn!(attempt, max_attempts, error = %e, "database not ready");
                last_error = Some(e.to_string());
                if attempt < max_attempts {
                    tokio::time::sleep(policy.delay).await;
                }
            }
        }
    }

    tracing::error!(attempts = max_attempts, "failed to connect to database");
    Connectivity::Failed { attempts: max_attempts, last_error }
}
