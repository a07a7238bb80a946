// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! ClearIdentity contract integration.
//!
//! This module provides:
//! - The contract's call surface as a `sol!` interface (`abi`)
//! - Typed call arguments with client-side validation (`call`)
//! - The [`ContractClient`] trait and its alloy-backed implementation
//!   (`client`)

pub mod abi;
pub mod call;
pub mod client;

pub use call::ContractCall;
pub use client::{
    CallReceipt, ClearIdentityClient, ContractClient, ContractConfig, SubmissionHandle,
    WalletSession,
};
