// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Transaction Tracker
//!
//! Owns the confirmation lifecycle of one submitted call:
//!
//! ```text
//! Submitted -> Confirming -> Confirmed | Failed
//! ```
//!
//! Transitions are monotonic. A call reaches exactly one terminal state and
//! never leaves it: the status cell refuses any update once terminal, so a
//! receipt that shows up after a timeout has already been reported cannot
//! overwrite the reported outcome.
//!
//! Waiting for a receipt is the only suspension point in the pipeline. The
//! wait is a background poll task publishing into a `watch` channel (the
//! caller polls or awaits notification, never busy-waits) and it is
//! cancellable through `CancellationToken`, following the crate's background
//! task convention. Cancelling (or timing out) only stops local observation:
//! the submission stays pending on-chain and may still confirm later
//! out-of-band.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::{DEFAULT_POLL_INTERVAL, DEFAULT_RECEIPT_TIMEOUT};
use crate::contract::{CallReceipt, ContractClient, SubmissionHandle};
use crate::error::TrackerError;
use crate::models::{CompletedCall, PendingCall};

/// Observable lifecycle state of one submitted call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CallStatus {
    /// Accepted into the pending pool; no receipt poll active yet.
    Submitted,
    /// A receipt poll is active.
    Confirming,
    /// A receipt with success status was observed. Terminal.
    Confirmed(CallReceipt),
    /// Execution reverted, the wait budget elapsed, or the provider errored.
    /// Terminal.
    Failed(TrackerError),
}

impl CallStatus {
    /// Whether this state is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, CallStatus::Confirmed(_) | CallStatus::Failed(_))
    }
}

/// Per-wait configuration, caller-supplied.
#[derive(Debug, Clone, Copy)]
pub struct TrackerConfig {
    /// Interval between receipt polls.
    pub poll_interval: Duration,
    /// Wait budget before the tracker reports `Failed(Timeout)`.
    pub timeout: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_RECEIPT_TIMEOUT,
        }
    }
}

/// Monotonic status publisher. Refuses transitions out of a terminal state.
struct StatusCell {
    tx: watch::Sender<CallStatus>,
}

impl StatusCell {
    fn new(initial: CallStatus) -> (Self, watch::Receiver<CallStatus>) {
        let (tx, rx) = watch::channel(initial);
        (Self { tx }, rx)
    }

    /// Publish `next` unless the current state is already terminal.
    /// Returns whether the transition was applied.
    fn advance(&self, next: CallStatus) -> bool {
        self.tx.send_if_modified(|current| {
            if current.is_terminal() {
                return false;
            }
            *current = next;
            true
        })
    }
}

/// Spawns and owns the receipt wait for submitted calls.
pub struct TransactionTracker {
    client: Arc<dyn ContractClient>,
    config: TrackerConfig,
}

impl TransactionTracker {
    pub fn new(client: Arc<dyn ContractClient>, config: TrackerConfig) -> Self {
        Self { client, config }
    }

    /// Start watching a submitted call. Spawns the poll task and returns the
    /// caller's handle.
    pub fn watch(&self, call: PendingCall, handle: SubmissionHandle) -> CallHandle {
        let (cell, rx) = StatusCell::new(CallStatus::Submitted);
        let cancel = CancellationToken::new();

        tokio::spawn(poll_for_receipt(
            Arc::clone(&self.client),
            handle,
            call.clone(),
            cell,
            cancel.clone(),
            self.config,
        ));

        CallHandle { call, rx, cancel }
    }
}

/// Poll loop for one call. Publishes into the status cell and exits on the
/// first terminal transition or on cancellation.
async fn poll_for_receipt(
    client: Arc<dyn ContractClient>,
    handle: SubmissionHandle,
    call: PendingCall,
    cell: StatusCell,
    cancel: CancellationToken,
    config: TrackerConfig,
) {
    cell.advance(CallStatus::Confirming);
    let started = Instant::now();

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                // Stopped watching, not stopped happening: the submission
                // stays pending on-chain.
                debug!(call_id = %call.call_id, tx_hash = %call.tx_hash, "Receipt wait abandoned");
                return;
            }
            _ = tokio::time::sleep(config.poll_interval) => {}
        }

        let waited = started.elapsed();
        if waited >= config.timeout {
            warn!(
                call_id = %call.call_id,
                tx_hash = %call.tx_hash,
                waited_secs = waited.as_secs(),
                "Receipt wait budget elapsed; the call may still confirm out-of-band"
            );
            cell.advance(CallStatus::Failed(TrackerError::Timeout { waited }));
            return;
        }

        match client.receipt(&handle).await {
            Ok(Some(receipt)) if receipt.success => {
                info!(
                    call_id = %call.call_id,
                    kind = %call.kind,
                    tx_hash = %receipt.tx_hash,
                    block_number = receipt.block_number,
                    assigned_id = ?receipt.assigned_id,
                    "Call confirmed"
                );
                cell.advance(CallStatus::Confirmed(receipt));
                return;
            }
            Ok(Some(receipt)) => {
                warn!(
                    call_id = %call.call_id,
                    kind = %call.kind,
                    tx_hash = %receipt.tx_hash,
                    "Call reverted on-chain"
                );
                cell.advance(CallStatus::Failed(TrackerError::Reverted {
                    tx_hash: receipt.tx_hash,
                }));
                return;
            }
            Ok(None) => {
                debug!(call_id = %call.call_id, "No receipt yet");
            }
            Err(e) => {
                warn!(call_id = %call.call_id, error = %e, "Provider error while waiting for receipt");
                cell.advance(CallStatus::Failed(TrackerError::Provider(e.to_string())));
                return;
            }
        }
    }
}

/// Caller-facing observation handle for one submitted call.
///
/// Not cloneable: once the call is terminal, `wait` transfers the immutable
/// result record to the caller and the tracker does nothing further.
#[derive(Debug)]
pub struct CallHandle {
    call: PendingCall,
    rx: watch::Receiver<CallStatus>,
    cancel: CancellationToken,
}

impl CallHandle {
    /// The submitted call this handle observes.
    pub fn pending_call(&self) -> &PendingCall {
        &self.call
    }

    /// Current lifecycle state.
    pub fn status(&self) -> CallStatus {
        self.rx.borrow().clone()
    }

    /// Wait for the next state transition and return the new state.
    ///
    /// Returns the current state unchanged if the poll task is gone, which
    /// only happens after a terminal transition.
    pub async fn changed(&mut self) -> CallStatus {
        let _ = self.rx.changed().await;
        self.rx.borrow_and_update().clone()
    }

    /// Suspend until the call reaches its terminal state.
    pub async fn wait(mut self) -> Result<CompletedCall, TrackerError> {
        loop {
            let status = self.rx.borrow_and_update().clone();
            match status {
                CallStatus::Confirmed(receipt) => {
                    return Ok(CompletedCall {
                        call: self.call,
                        assigned_id: receipt.assigned_id,
                        block_number: receipt.block_number,
                        gas_used: receipt.gas_used,
                    });
                }
                CallStatus::Failed(error) => return Err(error),
                CallStatus::Submitted | CallStatus::Confirming => {
                    if self.rx.changed().await.is_err() {
                        // Poll task gone without a terminal state.
                        return Err(TrackerError::Provider(
                            "tracker task stopped unexpectedly".to_string(),
                        ));
                    }
                }
            }
        }
    }

    /// Stop watching. The underlying submission is unaffected and remains
    /// pending on-chain.
    pub fn abandon(self) {
        self.cancel.cancel();
    }
}
