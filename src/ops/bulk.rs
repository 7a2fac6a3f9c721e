//! The four bulk token operations
//!
//! Each batch follows the same skeleton: snapshot the selection, confirm,
//! loop strictly sequentially with a throttle sleep between items, isolate
//! per-item failures, abort the remainder only when the admin session itself
//! is rejected, then reconcile against the backend and emit one summary.

use std::sync::Arc;

use crate::api::TokenApi;
use crate::api::types::TestResponse;
use crate::store::TokenStore;
use crate::ui::{ConfirmGate, Notifier, ProgressSink, Renderer, Tone};

use super::{BatchDelays, BatchTally, BusyGuard};

/// Owns the token store and drives all bulk operations over it
///
/// The store is never reachable from anywhere else; every mutation goes
/// through the batch loops here or through [`TokenController::load`].
pub struct TokenController<A: TokenApi> {
    api: A,
    store: TokenStore,
    progress: Arc<dyn ProgressSink>,
    gate: Box<dyn ConfirmGate>,
    notifier: Box<dyn Notifier>,
    renderer: Box<dyn Renderer>,
    delays: BatchDelays,
}

impl<A: TokenApi> TokenController<A> {
    pub fn new(
        api: A,
        progress: Arc<dyn ProgressSink>,
        gate: Box<dyn ConfirmGate>,
        notifier: Box<dyn Notifier>,
        renderer: Box<dyn Renderer>,
        delays: BatchDelays,
    ) -> Self {
        Self {
            api,
            store: TokenStore::new(),
            progress,
            gate,
            notifier,
            renderer,
            delays,
        }
    }

    /// Initial authoritative load; `false` means the admin session was
    /// rejected and nothing useful can follow
    pub async fn load(&mut self) -> anyhow::Result<bool> {
        match self.api.list_tokens().await? {
            Some(tokens) => {
                self.store.replace_all(tokens);
                tracing::info!("Loaded {} tokens", self.store.len());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Render the current store through the injected renderer
    pub fn render(&self) {
        self.renderer.render(self.store.tokens());
    }

    /// Test every token, inactive ones first
    pub async fn test_all(&mut self) {
        if self.store.is_empty() {
            self.notifier.notify(Tone::Info, "No tokens to test");
            return;
        }

        // Snapshot the target set; inactive tokens go first so dead accounts
        // surface early. The sort is stable, store order breaks ties.
        let mut order: Vec<(bool, i64)> = self
            .store
            .tokens()
            .iter()
            .map(|t| (t.is_active, t.id))
            .collect();
        order.sort_by_key(|(active, _)| *active);
        let ids: Vec<i64> = order.into_iter().map(|(_, id)| id).collect();

        let total = ids.len();
        let prompt = format!(
            "About to test {} tokens, this may take a while. Continue?",
            total
        );
        if !self.gate.confirm(&prompt) {
            tracing::debug!("Test-all declined");
            return;
        }

        let guard = BusyGuard::start(self.progress.clone(), "Testing");
        let mut tally = BatchTally::default();
        for (done, id) in ids.into_iter().enumerate() {
            guard.tick(done + 1, total);
            match self.api.test_token(id).await {
                Ok(Some(resp)) => {
                    self.apply_test_response(id, &resp).await;
                    if resp.counts_as_success() {
                        tally.succeeded += 1;
                    } else {
                        tally.failed += 1;
                    }
                }
                Ok(None) => {
                    tally.failed += 1;
                    break;
                }
                Err(e) => {
                    tracing::warn!("Test of token #{} failed: {}", id, e);
                    tally.failed += 1;
                }
            }
            tokio::time::sleep(self.delays.test).await;
        }

        self.finish_batch("Test", tally).await;
        drop(guard);
    }

    /// Fold one test response into the local record
    ///
    /// A logical success clears the health mark; a failure with an
    /// extractable code records it, and 401/403 additionally deactivates the
    /// token with a best-effort disable call when it had been active. Either
    /// mutation triggers a partial re-render so progress is visible before
    /// the batch completes.
    async fn apply_test_response(&mut self, id: i64, resp: &TestResponse) {
        if resp.is_logical_success() {
            if let Some(token) = self.store.get_mut(id) {
                if token.status_code.is_some() {
                    token.status_code = None;
                    self.renderer.render(self.store.tokens());
                }
            }
            return;
        }

        let Some(code) = resp.extracted_status_code() else {
            return;
        };

        let mut follow_up_disable = false;
        if let Some(token) = self.store.get_mut(id) {
            let was_active = token.is_active;
            token.status_code = Some(code);
            if code == 401 || code == 403 {
                token.is_active = false;
                follow_up_disable = was_active;
            }
        }

        if follow_up_disable {
            // Best-effort only; the backend's own test path should already
            // have disabled it. Failures here are swallowed, not tallied.
            if let Err(e) = self.api.disable_token(id).await {
                tracing::debug!("Follow-up disable of token #{} failed: {}", id, e);
            }
        }

        self.renderer.render(self.store.tokens());
    }

    /// Disable every token with a tracked quota below 2
    pub async fn disable_low_quota(&mut self) {
        let targets: Vec<(i64, String, i64)> = self
            .store
            .tokens()
            .iter()
            .filter(|t| matches!(t.sora2_remaining_count, Some(n) if n < 2))
            .map(|t| (t.id, t.email.clone(), t.sora2_remaining_count.unwrap_or(0)))
            .collect();

        if targets.is_empty() {
            self.notifier
                .notify(Tone::Info, "No tokens with fewer than 2 remaining uses");
            return;
        }

        let preview: Vec<String> = targets
            .iter()
            .take(3)
            .map(|(_, email, remaining)| format!("  {} ({})", email, remaining))
            .collect();
        let ellipsis = if targets.len() > 3 { "\n  ..." } else { "" };
        let prompt = format!(
            "About to disable {} tokens with remaining uses < 2:\n{}{}\nContinue?",
            targets.len(),
            preview.join("\n"),
            ellipsis
        );
        if !self.gate.confirm(&prompt) {
            tracing::debug!("Disable-low declined");
            return;
        }

        let ids: Vec<i64> = targets.into_iter().map(|(id, _, _)| id).collect();
        let guard = BusyGuard::start(self.progress.clone(), "Disabling");
        let tally = self.run_toggle_batch(&guard, &ids, false).await;
        self.finish_batch("Disable", tally).await;
        drop(guard);
    }

    /// Enable inactive tokens that are eligible again: sora2 tier supported,
    /// not health-marked 401, tracked quota of at least 2
    pub async fn enable_eligible(&mut self, skip_confirm: bool) {
        let ids: Vec<i64> = self
            .store
            .tokens()
            .iter()
            .filter(|t| {
                !t.is_active
                    && t.sora2_supported
                    && t.status_code != Some(401)
                    && matches!(t.sora2_remaining_count, Some(n) if n >= 2)
            })
            .map(|t| t.id)
            .collect();

        if ids.is_empty() {
            self.notifier
                .notify(Tone::Info, "No eligible tokens to enable");
            return;
        }

        let prompt = format!("About to enable {} eligible tokens. Continue?", ids.len());
        if !skip_confirm && !self.gate.confirm(&prompt) {
            tracing::debug!("Enable-eligible declined");
            return;
        }

        let guard = BusyGuard::start(self.progress.clone(), "Enabling");
        let tally = self.run_toggle_batch(&guard, &ids, true).await;
        self.finish_batch("Enable", tally).await;
        drop(guard);
    }

    /// Delete every token the backend considers problematic (health 401 or
    /// expired); the selection is entirely server-side, one DELETE call
    pub async fn cleanup_problematic(&mut self) {
        let prompt = "About to delete every token marked 401 and every expired token. Continue?";
        if !self.gate.confirm(prompt) {
            tracing::debug!("Cleanup declined");
            return;
        }

        let guard = BusyGuard::start(self.progress.clone(), "Cleaning up");
        let result = self.api.cleanup_problematic().await;
        match result {
            Ok(Some(resp)) if resp.success => {
                self.reconcile().await;
                self.notifier.notify(
                    Tone::Success,
                    &format!("Deleted {} problematic tokens", resp.deleted.unwrap_or(0)),
                );
            }
            Ok(Some(resp)) => {
                self.notifier.notify(
                    Tone::Error,
                    &format!("Cleanup failed: {}", resp.failure_detail()),
                );
            }
            Ok(None) => {
                // Session rejected; the transport layer already reported it
                tracing::warn!("Cleanup aborted, admin session rejected");
            }
            Err(e) => {
                self.notifier
                    .notify(Tone::Error, &format!("Cleanup failed: {}", e));
            }
        }
        drop(guard);
    }

    /// Shared loop for the enable/disable batches; the store is not mutated
    /// optimistically here, the post-batch reconcile picks up the new states
    async fn run_toggle_batch(&mut self, guard: &BusyGuard, ids: &[i64], enable: bool) -> BatchTally {
        let total = ids.len();
        let mut tally = BatchTally::default();
        for (done, id) in ids.iter().copied().enumerate() {
            guard.tick(done + 1, total);
            let result = if enable {
                self.api.enable_token(id).await
            } else {
                self.api.disable_token(id).await
            };
            match result {
                Ok(Some(resp)) if resp.success => tally.succeeded += 1,
                Ok(Some(_)) => tally.failed += 1,
                Ok(None) => {
                    tally.failed += 1;
                    break;
                }
                Err(e) => {
                    tracing::warn!("Toggle of token #{} failed: {}", id, e);
                    tally.failed += 1;
                }
            }
            tokio::time::sleep(self.delays.toggle).await;
        }
        tally
    }

    /// Authoritative reload, re-render, and the single summary notification
    async fn finish_batch(&mut self, verb: &str, tally: BatchTally) {
        tracing::debug!("{} batch attempted {} items", verb, tally.attempted());
        self.reconcile().await;
        let tone = if tally.failed > 0 {
            Tone::Error
        } else {
            Tone::Success
        };
        self.notifier.notify(
            tone,
            &format!(
                "{} complete: {} succeeded, {} failed",
                verb, tally.succeeded, tally.failed
            ),
        );
    }

    /// Best-effort reload of the store from the backend
    ///
    /// A failure here keeps the optimistic local state; the next successful
    /// load replaces it wholesale.
    async fn reconcile(&mut self) {
        match self.api.list_tokens().await {
            Ok(Some(tokens)) => {
                self.store.replace_all(tokens);
                self.renderer.render(self.store.tokens());
            }
            Ok(None) => tracing::warn!("Skipping reload, admin session rejected"),
            Err(e) => tracing::warn!("Failed to reload tokens: {}", e),
        }
    }
}

#[cfg(test)]
impl<A: TokenApi> TokenController<A> {
    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn store(&self) -> &TokenStore {
        &self.store
    }
}
