// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Error Taxonomy
//!
//! Each stage of the submission pipeline has its own error kind so callers
//! can tell apart input that never left the process, adapter failures,
//! rejections at send time, and on-chain outcomes:
//!
//! - [`ValidationError`] - bad input, never reaches the network.
//! - [`EncryptionError`] - the adapter could not produce ciphertext + proof.
//! - [`SubmissionError`] - the wallet or node rejected the call at send time.
//! - [`TrackerError`] - terminal failure while waiting for a receipt
//!   (revert, wait budget elapsed, or provider error).
//!
//! Validation and encryption failures surface synchronously through
//! [`PipelineError`]; submission failures likewise, since no handle exists
//! yet. Receipt failures only ever surface through the tracker's terminal
//! state. Nothing here is auto-retried; resubmission is always a fresh call.

use std::time::Duration;

/// Structural input rejection. Raised before the encryption adapter or the
/// chain is ever contacted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("`{0}` must not be empty")]
    EmptyField(&'static str),

    #[error("unknown attribute type {0}")]
    UnknownAttributeType(u8),

    #[error("payload of {len} bytes exceeds the {max}-byte limit")]
    PayloadTooLarge { len: usize, max: usize },

    #[error("encrypted payload and proof must be supplied together")]
    PayloadWithoutProof,

    #[error("profile id 0 is a placeholder; supply a confirmed profile id")]
    PlaceholderProfileId,
}

/// The encryption adapter could not produce a ciphertext/proof pair.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncryptionError {
    #[error("plaintext of {len} bytes exceeds the adapter limit of {max}")]
    PlaintextTooLarge { len: usize, max: usize },

    #[error("malformed encryption context: {0}")]
    MalformedContext(String),

    #[error("encryption backend failed: {0}")]
    Backend(String),
}

/// The call was rejected before or at send time. The ledger never saw it
/// execute; resubmitting is safe once the cause is addressed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("wallet session is not connected")]
    NotConnected,

    #[error("wallet rejected the signature request: {0}")]
    SignatureRejected(String),

    #[error("invalid contract address: {0}")]
    InvalidAddress(String),

    #[error("invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("node rejected the call: {0}")]
    Rejected(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("invalid call: {0}")]
    InvalidCall(#[from] ValidationError),
}

/// Terminal failure reported by a transaction tracker.
#[derive(
    Debug, Clone, PartialEq, Eq, thiserror::Error, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TrackerError {
    /// The network executed the call but it reverted.
    #[error("transaction {tx_hash} reverted on-chain")]
    Reverted { tx_hash: String },

    /// The caller's wait budget elapsed before a receipt arrived. The
    /// underlying call stays pending on-chain and may still confirm later;
    /// this only reports that we stopped waiting in time to see it.
    #[error("no receipt after {waited:?}; the call may still confirm on-chain")]
    Timeout { waited: Duration },

    /// The provider errored while we were waiting for a receipt.
    #[error("provider error while waiting for receipt: {0}")]
    Provider(String),
}

/// Synchronous failure of a pipeline operation, before any handle is handed
/// to the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("encryption failed: {0}")]
    Encryption(#[from] EncryptionError),

    #[error("submission failed: {0}")]
    Submission(#[from] SubmissionError),
}
