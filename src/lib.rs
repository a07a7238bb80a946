// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Clear Identity - Confidential Attribute Submission Client
//!
//! This crate is the client-side core of the ClearIdentity application:
//! it encodes user-supplied profile and attribute data, produces an
//! encrypted payload plus correctness proof through a pluggable adapter,
//! submits typed calls to the identity contract, and tracks each call
//! through its confirmation lifecycle behind a single observable handle.
//!
//! Wallet connection and session management, the contract implementation,
//! and all presentation concerns live in the surrounding application.
//!
//! ## Modules
//!
//! - `encryption` - Pluggable encryption adapter + stub backend
//! - `contract` - Typed ClearIdentity call surface (alloy)
//! - `tracker` - Per-call confirmation state machine
//! - `pipeline` - Validate -> encrypt -> submit -> track orchestration

pub mod config;
pub mod contract;
pub mod encryption;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod tracker;

pub use contract::{ClearIdentityClient, ContractClient, ContractConfig, WalletSession};
pub use encryption::{EncryptionAdapter, StubAdapter};
pub use error::{
    EncryptionError, PipelineError, SubmissionError, TrackerError, ValidationError,
};
pub use pipeline::{
    AddAttributeInput, CreateProfileInput, RequestVerificationInput, SubmissionPipeline,
    UpdateProfileInput,
};
pub use tracker::{CallHandle, CallStatus, TrackerConfig};
