// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Reference adapter used when no real encryption backend is plugged in.
//!
//! Output is NOT confidential. It is a SHA-256 keystream over the plaintext
//! and a fresh per-call nonce. What the stub does guarantee, so downstream
//! ABI-encoding logic can be exercised without a cryptographic backend:
//!
//! - ciphertext length is fixed at [`StubAdapter::DEFAULT_CIPHERTEXT_LEN`]
//!   (24 bytes) unless overridden,
//! - proof length is fixed at [`StubAdapter::DEFAULT_PROOF_LEN`] (16 bytes)
//!   unless overridden,
//! - repeat calls with the same plaintext produce different bytes (fresh
//!   nonce per call), matching the adapter contract's non-idempotence.

use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::MAX_PLAINTEXT_BYTES;
use crate::error::EncryptionError;

use super::{AttributeContext, EncryptedPayload, EncryptionAdapter};

/// Stand-in encryption backend with stable, documented output lengths.
#[derive(Debug, Clone)]
pub struct StubAdapter {
    ciphertext_len: usize,
    proof_len: usize,
    max_plaintext: usize,
}

impl StubAdapter {
    /// Default ciphertext length in bytes.
    pub const DEFAULT_CIPHERTEXT_LEN: usize = 24;
    /// Default proof length in bytes.
    pub const DEFAULT_PROOF_LEN: usize = 16;

    /// Create a stub with the default output lengths.
    pub fn new() -> Self {
        Self {
            ciphertext_len: Self::DEFAULT_CIPHERTEXT_LEN,
            proof_len: Self::DEFAULT_PROOF_LEN,
            max_plaintext: MAX_PLAINTEXT_BYTES,
        }
    }

    /// Create a stub with custom output lengths, for tests that need
    /// specific payload shapes.
    pub fn with_lengths(ciphertext_len: usize, proof_len: usize) -> Self {
        Self {
            ciphertext_len,
            proof_len,
            max_plaintext: MAX_PLAINTEXT_BYTES,
        }
    }

    /// Expand a domain-separated SHA-256 keystream to `len` bytes.
    fn keystream(domain: &[u8], nonce: &[u8], plaintext: &[u8], len: usize) -> Vec<u8> {
        let mut out = Vec::with_capacity(len);
        let mut counter: u32 = 0;
        while out.len() < len {
            let mut hasher = Sha256::new();
            hasher.update(domain);
            hasher.update(nonce);
            hasher.update(plaintext);
            hasher.update(counter.to_be_bytes());
            out.extend_from_slice(&hasher.finalize());
            counter += 1;
        }
        out.truncate(len);
        out
    }
}

impl Default for StubAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl EncryptionAdapter for StubAdapter {
    fn encrypt(
        &self,
        plaintext: &[u8],
        context: &AttributeContext,
    ) -> Result<EncryptedPayload, EncryptionError> {
        if plaintext.len() > self.max_plaintext {
            return Err(EncryptionError::PlaintextTooLarge {
                len: plaintext.len(),
                max: self.max_plaintext,
            });
        }
        if context.profile_hint == Some(0) {
            // Profile id 0 is the demo-UI placeholder, never a confirmed id.
            return Err(EncryptionError::MalformedContext(
                "profile_hint 0 is not a confirmed profile identifier".to_string(),
            ));
        }

        // Fresh nonce per call keeps repeat encryptions distinct.
        let nonce = Uuid::new_v4();
        let ciphertext = Self::keystream(
            b"clearid.stub.ct",
            nonce.as_bytes(),
            plaintext,
            self.ciphertext_len,
        );
        let proof = Self::keystream(
            b"clearid.stub.proof",
            nonce.as_bytes(),
            plaintext,
            self.proof_len,
        );

        Ok(EncryptedPayload { ciphertext, proof })
    }

    fn max_plaintext_len(&self) -> usize {
        self.max_plaintext
    }
}
