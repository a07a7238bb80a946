// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Typed arguments for the four ClearIdentity operations.

use alloy::{primitives::U256, sol_types::SolCall};

use crate::config::MAX_PAYLOAD_BYTES;
use crate::error::ValidationError;
use crate::models::{AttributeId, AttributeType, CallKind, ProfileId};

use super::abi::IClearIdentity;

/// One fixed-arity call to the ClearIdentity contract.
///
/// Every variant mirrors the contract method of the same name. Partial
/// updates are not supported: `UpdateProfile` always carries both fields,
/// even when one is unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractCall {
    CreateProfile {
        public_name: String,
        public_bio: String,
        encrypted_age: Vec<u8>,
        age_proof: Vec<u8>,
    },
    AddAttribute {
        profile_id: ProfileId,
        attribute_type: AttributeType,
        public_label: String,
        encrypted_data: Vec<u8>,
        data_proof: Vec<u8>,
        is_private: bool,
    },
    RequestVerification {
        profile_id: ProfileId,
        attribute_id: AttributeId,
        verification_data: Vec<u8>,
        data_proof: Vec<u8>,
    },
    UpdateProfile {
        profile_id: ProfileId,
        public_name: String,
        public_bio: String,
    },
}

impl ContractCall {
    /// The operation this call performs.
    pub fn kind(&self) -> CallKind {
        match self {
            ContractCall::CreateProfile { .. } => CallKind::CreateProfile,
            ContractCall::AddAttribute { .. } => CallKind::AddAttribute,
            ContractCall::RequestVerification { .. } => CallKind::RequestVerification,
            ContractCall::UpdateProfile { .. } => CallKind::UpdateProfile,
        }
    }

    /// Structural validation, run before the contract is ever asked to
    /// accept the call: required strings non-empty, payload and proof
    /// supplied together and within byte bounds, and profile identifiers
    /// actually confirmed ones (ids are 1-based; 0 is the placeholder the
    /// demo UI used).
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            ContractCall::CreateProfile {
                public_name,
                encrypted_age,
                age_proof,
                ..
            } => {
                require_non_empty("public_name", public_name)?;
                require_payload_pair(encrypted_age, age_proof)
            }
            ContractCall::AddAttribute {
                profile_id,
                public_label,
                encrypted_data,
                data_proof,
                ..
            } => {
                require_confirmed_profile(*profile_id)?;
                require_non_empty("public_label", public_label)?;
                require_payload_pair(encrypted_data, data_proof)
            }
            ContractCall::RequestVerification {
                profile_id,
                verification_data,
                data_proof,
                ..
            } => {
                require_confirmed_profile(*profile_id)?;
                require_payload_pair(verification_data, data_proof)
            }
            ContractCall::UpdateProfile {
                profile_id,
                public_name,
                ..
            } => {
                require_confirmed_profile(*profile_id)?;
                require_non_empty("public_name", public_name)
            }
        }
    }

    /// ABI-encode the call for submission.
    pub fn calldata(&self) -> Vec<u8> {
        match self {
            ContractCall::CreateProfile {
                public_name,
                public_bio,
                encrypted_age,
                age_proof,
            } => IClearIdentity::createProfileCall {
                _publicName: public_name.clone(),
                _publicBio: public_bio.clone(),
                _age: encrypted_age.clone().into(),
                _ageProof: age_proof.clone().into(),
            }
            .abi_encode(),
            ContractCall::AddAttribute {
                profile_id,
                attribute_type,
                public_label,
                encrypted_data,
                data_proof,
                is_private,
            } => IClearIdentity::addAttributeCall {
                _profileId: U256::from(*profile_id),
                _attributeType: U256::from(attribute_type.wire_id()),
                _publicLabel: public_label.clone(),
                _encryptedData: encrypted_data.clone().into(),
                _dataProof: data_proof.clone().into(),
                _isPrivate: *is_private,
            }
            .abi_encode(),
            ContractCall::RequestVerification {
                profile_id,
                attribute_id,
                verification_data,
                data_proof,
            } => IClearIdentity::requestVerificationCall {
                _profileId: U256::from(*profile_id),
                _attributeId: U256::from(*attribute_id),
                _verificationData: verification_data.clone().into(),
                _dataProof: data_proof.clone().into(),
            }
            .abi_encode(),
            ContractCall::UpdateProfile {
                profile_id,
                public_name,
                public_bio,
            } => IClearIdentity::updateProfileCall {
                _profileId: U256::from(*profile_id),
                _publicName: public_name.clone(),
                _publicBio: public_bio.clone(),
            }
            .abi_encode(),
        }
    }
}

fn require_non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::EmptyField(field))
    } else {
        Ok(())
    }
}

fn require_confirmed_profile(profile_id: ProfileId) -> Result<(), ValidationError> {
    if profile_id == 0 {
        Err(ValidationError::PlaceholderProfileId)
    } else {
        Ok(())
    }
}

fn require_payload_pair(payload: &[u8], proof: &[u8]) -> Result<(), ValidationError> {
    if payload.is_empty() || proof.is_empty() {
        return Err(ValidationError::PayloadWithoutProof);
    }
    for part in [payload, proof] {
        if part.len() > MAX_PAYLOAD_BYTES {
            return Err(ValidationError::PayloadTooLarge {
                len: part.len(),
                max: MAX_PAYLOAD_BYTES,
            });
        }
    }
    Ok(())
}
