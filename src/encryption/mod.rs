// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Pluggable encryption backends for confidential attribute data.
//!
//! The pipeline never looks inside a ciphertext or proof; it only requires
//! that the two are produced together by an [`EncryptionAdapter`]. Real
//! homomorphic-encryption or zero-knowledge backends plug in behind this
//! trait without any change to the submission pipeline. The bundled
//! [`StubAdapter`] stands in when no real backend is available.

pub mod stub;

pub use stub::StubAdapter;

use crate::error::EncryptionError;
use crate::models::{AttributeType, ProfileId};

/// Context an adapter needs to bind a ciphertext to its use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeContext {
    /// Which attribute kind the plaintext represents.
    pub attribute_type: AttributeType,
    /// The target profile, when already known. Absent for profile creation,
    /// where the profile identifier does not exist yet.
    pub profile_hint: Option<ProfileId>,
}

/// A ciphertext and the proof artifact produced with it.
///
/// The two are inseparable: the pipeline never submits one without the
/// other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedPayload {
    pub ciphertext: Vec<u8>,
    pub proof: Vec<u8>,
}

/// Converts plaintext attribute values into an encrypted blob plus proof.
///
/// Implementations are side-effect-free with respect to chain state and
/// must be safe to call repeatedly. Deterministic output is NOT required:
/// adapters may use fresh randomness per call, so callers must not assume
/// two encryptions of the same plaintext compare equal.
pub trait EncryptionAdapter: Send + Sync {
    /// Encrypt `plaintext` for the given context.
    ///
    /// # Errors
    ///
    /// [`EncryptionError::PlaintextTooLarge`] when the input exceeds
    /// [`max_plaintext_len`](Self::max_plaintext_len), or
    /// [`EncryptionError::MalformedContext`] when the context cannot be
    /// bound by this backend.
    fn encrypt(
        &self,
        plaintext: &[u8],
        context: &AttributeContext,
    ) -> Result<EncryptedPayload, EncryptionError>;

    /// Largest plaintext this adapter accepts, in bytes.
    fn max_plaintext_len(&self) -> usize;
}
