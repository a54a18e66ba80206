//! Schema-creation confirmation.
//!
//! After the external creation widget reports a new schema uid, the indexer
//! lags behind the chain. The confirmer polls the indexer until the schema is
//! visible, then yields the detail route. The poll is bounded and
//! cancellable: it stops after `max_attempts` ticks with an explicit error,
//! and observes its cancellation token at every await point.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::{
    error::AttestboardError,
    types::{Route, SchemaUid},
};

/// Schema lookup seam, implemented by the indexer client.
#[async_trait]
pub trait SchemaLookup {
    /// Look up a schema by uid. `None` until the indexer has seen it.
    async fn lookup_schema(
        &self,
        uid: &SchemaUid,
    ) -> Result<Option<SchemaUid>, AttestboardError>;
}

/// Confirmation poll policy.
#[derive(Clone, Debug)]
pub struct ConfirmPolicy {
    /// When false, navigate immediately without consulting the indexer.
    pub wait_for_indexer: bool,
    /// Delay between poll ticks.
    pub poll_interval: Duration,
    /// Maximum number of poll ticks before giving up.
    pub max_attempts: u32,
}

impl Default for ConfirmPolicy {
    fn default() -> Self {
        Self {
            wait_for_indexer: false,
            poll_interval: Duration::from_secs(2),
            max_attempts: 30,
        }
    }
}

/// Observable confirmation phases.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfirmPhase {
    Idle,
    Created,
    Waiting,
    Navigated,
}

/// Confirmation error.
#[derive(Error, Debug)]
pub enum ConfirmError {
    /// Poll cancelled before the schema became visible.
    #[error("confirmation cancelled")]
    Cancelled,

    /// Maximum attempts reached before the schema became visible.
    #[error("schema not indexed after {attempts} attempts")]
    Exhausted {
        attempts: u32,
        /// Last indexer failure observed, if any.
        last_error: Option<String>,
    },
}

/// Result of a confirmed (or skipped) creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Confirmation {
    /// Route to the schema detail view.
    pub route: Route,
    /// Number of indexer polls issued.
    pub polls: u32,
    /// Whether the indexer actually confirmed the schema.
    pub confirmed: bool,
}

/// Drives the post-creation confirmation poll.
#[derive(Clone)]
pub struct SchemaConfirmer {
    lookup: Arc<dyn SchemaLookup + Send + Sync>,
    policy: ConfirmPolicy,
}

impl SchemaConfirmer {
    /// Create a confirmer over a schema lookup.
    pub fn new(lookup: Arc<dyn SchemaLookup + Send + Sync>, policy: ConfirmPolicy) -> Self {
        Self { lookup, policy }
    }

    /// Get the active policy.
    pub fn policy(&self) -> &ConfirmPolicy {
        &self.policy
    }

    /// Handle a creation callback: confirm the schema and yield its route.
    ///
    /// With the wait flag disabled this resolves immediately and issues zero
    /// polls. Otherwise each tick sleeps the poll interval, then issues one
    /// lookup; a lookup failure counts as an attempt and is retried.
    pub async fn confirm(
        &self,
        uid: SchemaUid,
        cancel: CancellationToken,
    ) -> Result<Confirmation, ConfirmError> {
        tracing::debug!(phase = ?ConfirmPhase::Created, uid = %uid, "schema creation reported");

        if !self.policy.wait_for_indexer {
            tracing::info!(uid = %uid, "indexer wait disabled, navigating directly");
            return Ok(Confirmation {
                route: Route::schema_view(&uid),
                polls: 0,
                confirmed: false,
            });
        }

        let mut last_error: Option<String> = None;

        for attempt in 1..=self.policy.max_attempts {
            tokio::select! {
                _ = cancel.cancelled() => return Err(ConfirmError::Cancelled),
                _ = tokio::time::sleep(self.policy.poll_interval) => {}
            }

            tracing::debug!(phase = ?ConfirmPhase::Waiting, attempt, uid = %uid, "polling indexer");

            let lookup = tokio::select! {
                _ = cancel.cancelled() => return Err(ConfirmError::Cancelled),
                result = self.lookup.lookup_schema(&uid) => result,
            };

            match lookup {
                Ok(Some(seen)) if !seen.as_str().is_empty() => {
                    tracing::info!(
                        phase = ?ConfirmPhase::Navigated,
                        uid = %uid,
                        polls = attempt,
                        "schema confirmed by indexer"
                    );
                    return Ok(Confirmation {
                        route: Route::schema_view(&uid),
                        polls: attempt,
                        confirmed: true,
                    });
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(attempt, "indexer poll failed: {}", e);
                    last_error = Some(e.to_string());
                }
            }
        }

        Err(ConfirmError::Exhausted {
            attempts: self.policy.max_attempts,
            last_error,
        })
    }

    /// Spawn the confirmation as a task owned by the returned handle.
    ///
    /// Dropping the handle cancels the poll, so a torn-down owner cannot
    /// leak the timer.
    pub fn spawn(&self, uid: SchemaUid) -> ConfirmHandle {
        let token = CancellationToken::new();
        let child = token.child_token();
        let confirmer = self.clone();

        let join = tokio::spawn(async move { confirmer.confirm(uid, child).await });

        ConfirmHandle {
            token: token.clone(),
            guard: token.drop_guard(),
            join,
        }
    }
}

/// Handle to a spawned confirmation poll.
pub struct ConfirmHandle {
    token: CancellationToken,
    guard: DropGuard,
    join: JoinHandle<Result<Confirmation, ConfirmError>>,
}

impl ConfirmHandle {
    /// Cancel the poll.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Wait for the poll to finish.
    pub async fn join(self) -> Result<Confirmation, ConfirmError> {
        let ConfirmHandle { token: _, guard, join } = self;
        let result = join.await;
        drop(guard);
        result.unwrap_or(Err(ConfirmError::Cancelled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        collections::VecDeque,
        sync::atomic::{AtomicU32, Ordering},
        sync::Mutex,
    };

    #[derive(Default)]
    struct ScriptedLookup {
        responses: Mutex<VecDeque<Result<Option<SchemaUid>, AttestboardError>>>,
        calls: AtomicU32,
    }

    impl ScriptedLookup {
        fn with_responses(
            responses: Vec<Result<Option<SchemaUid>, AttestboardError>>,
        ) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                calls: AtomicU32::new(0),
            })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SchemaLookup for ScriptedLookup {
        async fn lookup_schema(
            &self,
            _uid: &SchemaUid,
        ) -> Result<Option<SchemaUid>, AttestboardError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Ok(None))
        }
    }

    fn waiting_policy(max_attempts: u32) -> ConfirmPolicy {
        ConfirmPolicy {
            wait_for_indexer: true,
            poll_interval: Duration::from_secs(2),
            max_attempts,
        }
    }

    #[tokio::test]
    async fn wait_disabled_navigates_without_polling() {
        let lookup = ScriptedLookup::with_responses(vec![]);
        let confirmer = SchemaConfirmer::new(lookup.clone(), ConfirmPolicy::default());

        let confirmation = confirmer
            .confirm(SchemaUid::new("abc123"), CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(confirmation.route.as_str(), "/schema/view/abc123");
        assert_eq!(confirmation.polls, 0);
        assert!(!confirmation.confirmed);
        assert_eq!(lookup.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn confirms_on_third_poll() {
        let lookup = ScriptedLookup::with_responses(vec![
            Ok(None),
            Ok(None),
            Ok(Some(SchemaUid::new("abc123"))),
        ]);
        let confirmer = SchemaConfirmer::new(lookup.clone(), waiting_policy(10));

        let confirmation = confirmer
            .confirm(SchemaUid::new("abc123"), CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(confirmation.route.as_str(), "/schema/view/abc123");
        assert_eq!(confirmation.polls, 3);
        assert!(confirmation.confirmed);
        assert_eq!(lookup.calls(), 3);

        // The timer is released on success; no further polls happen.
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(lookup.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausts_after_max_attempts() {
        let lookup = ScriptedLookup::with_responses(vec![]);
        let confirmer = SchemaConfirmer::new(lookup.clone(), waiting_policy(4));

        let err = confirmer
            .confirm(SchemaUid::new("abc123"), CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            ConfirmError::Exhausted { attempts, last_error } => {
                assert_eq!(attempts, 4);
                assert!(last_error.is_none());
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(lookup.calls(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn lookup_failure_counts_and_is_reported() {
        let lookup = ScriptedLookup::with_responses(vec![
            Err(AttestboardError::Indexer("boom".to_string())),
            Err(AttestboardError::Indexer("boom again".to_string())),
        ]);
        let confirmer = SchemaConfirmer::new(lookup.clone(), waiting_policy(2));

        let err = confirmer
            .confirm(SchemaUid::new("abc123"), CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            ConfirmError::Exhausted { attempts, last_error } => {
                assert_eq!(attempts, 2);
                assert!(last_error.unwrap().contains("boom again"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn lookup_failure_then_success_recovers() {
        let lookup = ScriptedLookup::with_responses(vec![
            Err(AttestboardError::Indexer("boom".to_string())),
            Ok(Some(SchemaUid::new("abc123"))),
        ]);
        let confirmer = SchemaConfirmer::new(lookup.clone(), waiting_policy(5));

        let confirmation = confirmer
            .confirm(SchemaUid::new("abc123"), CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(confirmation.polls, 2);
        assert!(confirmation.confirmed);
    }

    #[tokio::test]
    async fn cancelled_token_stops_the_poll() {
        let lookup = ScriptedLookup::with_responses(vec![]);
        let confirmer = SchemaConfirmer::new(lookup.clone(), waiting_policy(1000));

        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = confirmer
            .confirm(SchemaUid::new("abc123"), cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, ConfirmError::Cancelled));
        assert_eq!(lookup.calls(), 0);
    }

    #[tokio::test]
    async fn handle_cancel_resolves_to_cancelled() {
        let lookup = ScriptedLookup::with_responses(vec![]);
        let confirmer = SchemaConfirmer::new(
            lookup.clone(),
            ConfirmPolicy {
                wait_for_indexer: true,
                poll_interval: Duration::from_millis(5),
                max_attempts: 1000,
            },
        );

        let handle = confirmer.spawn(SchemaUid::new("abc123"));
        handle.cancel();
        let err = handle.join().await.unwrap_err();
        assert!(matches!(err, ConfirmError::Cancelled));
    }

    #[tokio::test]
    async fn dropping_the_handle_stops_polling() {
        let lookup = ScriptedLookup::with_responses(vec![]);
        let confirmer = SchemaConfirmer::new(
            lookup.clone(),
            ConfirmPolicy {
                wait_for_indexer: true,
                poll_interval: Duration::from_millis(2),
                max_attempts: 1000,
            },
        );

        let handle = confirmer.spawn(SchemaUid::new("abc123"));
        tokio::time::sleep(Duration::from_millis(20)).await;
        drop(handle);

        // Let any in-flight tick settle, then verify polling has stopped.
        tokio::time::sleep(Duration::from_millis(10)).await;
        let settled = lookup.calls();
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(lookup.calls(), settled);
    }
}
