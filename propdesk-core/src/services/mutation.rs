//! Confirm-and-mutate helper
//!
//! State-changing admin actions (block, approve, delete, ...) go through a
//! blocking confirmation. After a successful mutation the current list is
//! fetched again so the view shows what the server now holds; local state
//! is never patched. A failed mutation skips the refetch and leaves the
//! pre-mutation view in place.

use std::future::Future;

use serde_json::Value as JsonValue;
use tracing::warn;

use crate::domain::result::{Error, Result};

/// Asks the operator to confirm an action
pub trait Confirmer: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Confirms everything (`--force`)
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoConfirm;

impl Confirmer for AutoConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// What happened to a guarded mutation
#[derive(Debug)]
pub enum MutationOutcome<T> {
    /// The operator declined; nothing was sent
    Cancelled,
    /// The server accepted the mutation; `refreshed` is the refetched view
    Applied {
        response: JsonValue,
        refreshed: Result<T>,
    },
    /// The server rejected the mutation; no refetch happened
    Failed(Error),
}

impl<T> MutationOutcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, MutationOutcome::Applied { .. })
    }

    /// Collapse into a result: cancelled and failed both become errors
    pub fn into_result(self) -> Result<(JsonValue, Result<T>)> {
        match self {
            MutationOutcome::Applied { response, refreshed } => Ok((response, refreshed)),
            MutationOutcome::Cancelled => Err(Error::Cancelled("declined by operator".to_string())),
            MutationOutcome::Failed(e) => Err(e),
        }
    }
}

/// Confirm, mutate, then refetch on success.
pub async fn confirm_and_mutate<M, MF, R, RF, T>(
    confirmer: &dyn Confirmer,
    prompt: &str,
    mutate: M,
    refetch: R,
) -> MutationOutcome<T>
where
    M: FnOnce() -> MF,
    MF: Future<Output = Result<JsonValue>>,
    R: FnOnce() -> RF,
    RF: Future<Output = Result<T>>,
{
    if !confirmer.confirm(prompt) {
        return MutationOutcome::Cancelled;
    }

    let response = match mutate().await {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, "mutation failed");
            return MutationOutcome::Failed(e);
        }
    };

    MutationOutcome::Applied {
        response,
        refreshed: refetch().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Decline;

    impl Confirmer for Decline {
        fn confirm(&self, _prompt: &str) -> bool {
            false
        }
    }

    #[tokio::test]
    async fn test_cancelled_sends_nothing() {
        let mutations = AtomicUsize::new(0);
        let refetches = AtomicUsize::new(0);
        let (m, r) = (&mutations, &refetches);

        let outcome: MutationOutcome<()> = confirm_and_mutate(
            &Decline,
            "Delete plan?",
            move || async move {
                m.fetch_add(1, Ordering::SeqCst);
                Ok(json!({}))
            },
            move || async move {
                r.fetch_add(1, Ordering::SeqCst);
                Ok(())
            },
        )
        .await;

        assert!(matches!(outcome, MutationOutcome::Cancelled));
        assert_eq!(mutations.load(Ordering::SeqCst), 0);
        assert_eq!(refetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_success_refetches() {
        let outcome = confirm_and_mutate(
            &AutoConfirm,
            "Approve?",
            || async { Ok(json!({"success": true})) },
            || async { Ok(vec!["fresh"]) },
        )
        .await;

        match outcome {
            MutationOutcome::Applied { response, refreshed } => {
                assert_eq!(response["success"], true);
                assert_eq!(refreshed.unwrap(), vec!["fresh"]);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failure_skips_refetch() {
        let refetches = AtomicUsize::new(0);
        let r = &refetches;

        let outcome: MutationOutcome<()> = confirm_and_mutate(
            &AutoConfirm,
            "Reject?",
            || async { Err(Error::Http { status: 409, message: "already processed".into() }) },
            move || async move {
                r.fetch_add(1, Ordering::SeqCst);
                Ok(())
            },
        )
        .await;

        assert!(matches!(outcome, MutationOutcome::Failed(_)));
        assert_eq!(refetches.load(Ordering::SeqCst), 0);
        assert!(outcome.into_result().is_err());
    }
}
