// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Domain Models
//!
//! Records for the ClearIdentity contract surface and the submission
//! lifecycle. All types derive `Serialize`/`Deserialize` so callers can
//! persist or ship them; none of them is persisted by this crate itself.
//!
//! ## Identifier Types
//!
//! Profile, attribute, and verification-request identifiers are assigned by
//! the contract when a call confirms. Before confirmation they are absent,
//! which is why the record types carry `Option<...Id>`.
//!
//! ## Model Categories
//!
//! - **On-chain records**: [`Profile`], [`Attribute`], [`VerificationRequest`]
//! - **Lifecycle records**: [`PendingCall`], [`CompletedCall`]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Contract-assigned profile identifier.
pub type ProfileId = u64;
/// Contract-assigned attribute identifier.
pub type AttributeId = u64;
/// Contract-assigned verification-request identifier.
pub type RequestId = u64;

// =============================================================================
// Wallet Address Type
// =============================================================================

/// Ethereum-compatible wallet address wrapper.
///
/// Provides type safety for wallet addresses throughout the crate.
/// Format: `0x` followed by 40 hexadecimal characters (20 bytes).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WalletAddress(pub String);

impl std::fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for WalletAddress {
    fn from(value: String) -> Self {
        WalletAddress(value)
    }
}

impl From<&str> for WalletAddress {
    fn from(value: &str) -> Self {
        WalletAddress(value.to_string())
    }
}

impl From<WalletAddress> for String {
    fn from(value: WalletAddress) -> Self {
        value.0
    }
}

// =============================================================================
// Attribute Types
// =============================================================================

/// The closed set of attribute kinds the contract accepts.
///
/// The numeric mapping is part of the wire format: `Age` is the attribute
/// encrypted at profile creation, the rest are added with `addAttribute`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    Age,
    Email,
    Phone,
    Address,
}

impl AttributeType {
    /// All supported attribute types.
    pub const ALL: [AttributeType; 4] = [
        AttributeType::Age,
        AttributeType::Email,
        AttributeType::Phone,
        AttributeType::Address,
    ];

    /// Numeric identifier used in contract calls.
    pub fn wire_id(self) -> u8 {
        match self {
            AttributeType::Age => 0,
            AttributeType::Email => 1,
            AttributeType::Phone => 2,
            AttributeType::Address => 3,
        }
    }
}

impl TryFrom<u8> for AttributeType {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(AttributeType::Age),
            1 => Ok(AttributeType::Email),
            2 => Ok(AttributeType::Phone),
            3 => Ok(AttributeType::Address),
            other => Err(ValidationError::UnknownAttributeType(other)),
        }
    }
}

impl std::fmt::Display for AttributeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AttributeType::Age => "age",
            AttributeType::Email => "email",
            AttributeType::Phone => "phone",
            AttributeType::Address => "address",
        };
        write!(f, "{name}")
    }
}

// =============================================================================
// On-Chain Records
// =============================================================================

/// A user's on-chain identity record.
///
/// Created by a confirmed `createProfile` call and mutated only by a
/// confirmed `updateProfile` call; never deleted by this layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    /// Assigned by the contract on creation; absent before confirmation.
    pub id: Option<ProfileId>,
    /// Public display name. Non-empty.
    pub public_name: String,
    /// Public biography. May be empty.
    pub public_bio: String,
    /// The wallet that owns this profile.
    pub owner: WalletAddress,
}

/// An encrypted piece of identity data attached to a profile.
///
/// Immutable once created within this layer's scope; verification is a
/// separate entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attribute {
    /// Assigned by the contract on confirmation.
    pub id: Option<AttributeId>,
    /// The profile this attribute belongs to. Must reference a previously
    /// confirmed profile; the contract is authoritative.
    pub profile_id: ProfileId,
    pub attribute_type: AttributeType,
    /// Public label shown next to the encrypted value. Non-empty.
    pub public_label: String,
    /// Opaque ciphertext produced by the encryption adapter.
    #[serde(with = "serde_bytes_hex")]
    pub encrypted_data: Vec<u8>,
    /// Proof artifact produced alongside the ciphertext. Always present
    /// when `encrypted_data` is.
    #[serde(with = "serde_bytes_hex")]
    pub data_proof: Vec<u8>,
    /// Whether the attribute is hidden from public queries.
    pub is_private: bool,
}

/// A submitted request to validate an attribute's encrypted data against
/// its proof.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerificationRequest {
    /// Assigned by the contract on confirmation.
    pub id: Option<RequestId>,
    pub profile_id: ProfileId,
    /// The attribute being verified.
    pub attribute_id: AttributeId,
    #[serde(with = "serde_bytes_hex")]
    pub verification_data: Vec<u8>,
    #[serde(with = "serde_bytes_hex")]
    pub data_proof: Vec<u8>,
    /// The wallet that requested verification.
    pub requester: WalletAddress,
}

// =============================================================================
// Lifecycle Records
// =============================================================================

/// Which contract operation a submitted call performs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CallKind {
    CreateProfile,
    AddAttribute,
    RequestVerification,
    UpdateProfile,
}

impl std::fmt::Display for CallKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CallKind::CreateProfile => "createProfile",
            CallKind::AddAttribute => "addAttribute",
            CallKind::RequestVerification => "requestVerification",
            CallKind::UpdateProfile => "updateProfile",
        };
        write!(f, "{name}")
    }
}

/// A submitted-but-not-yet-confirmed unit of work.
///
/// Owned by the tracker created for it; surfaced to the caller through the
/// call handle and, once terminal, inside the immutable [`CompletedCall`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PendingCall {
    /// Client-side identifier for correlating log lines across a submission.
    pub call_id: Uuid,
    pub kind: CallKind,
    /// Chain-assigned submission handle (transaction hash).
    pub tx_hash: String,
    /// Block-explorer link for the transaction.
    pub explorer_url: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

/// Immutable record of a call that reached `Confirmed`.
///
/// Ownership transfers to the caller; there is no further tracker activity
/// for this call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompletedCall {
    pub call: PendingCall,
    /// Identifier the contract event emitted, when the operation assigns one
    /// (`updateProfile` does not).
    pub assigned_id: Option<u64>,
    /// Block the transaction was included in.
    pub block_number: u64,
    /// Gas actually used.
    pub gas_used: u64,
}

/// Hex-encode opaque byte fields so serialized records stay readable.
mod serde_bytes_hex {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&format!("0x{}", alloy::hex::encode(bytes)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(de)?;
        alloy::hex::decode(s.trim_start_matches("0x")).map_err(serde::de::Error::custom)
    }
}
