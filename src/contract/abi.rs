// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! ClearIdentity contract interface.
//!
//! Argument names and ordering match the contract's ABI exactly; the
//! identifier-carrying events are how confirmed calls report the id the
//! contract assigned.

use alloy::sol;

sol! {
    interface IClearIdentity {
        function createProfile(
            string _publicName,
            string _publicBio,
            bytes _age,
            bytes _ageProof
        ) external returns (uint256);

        function addAttribute(
            uint256 _profileId,
            uint256 _attributeType,
            string _publicLabel,
            bytes _encryptedData,
            bytes _dataProof,
            bool _isPrivate
        ) external returns (uint256);

        function requestVerification(
            uint256 _profileId,
            uint256 _attributeId,
            bytes _verificationData,
            bytes _dataProof
        ) external returns (uint256);

        function updateProfile(
            uint256 _profileId,
            string _publicName,
            string _publicBio
        ) external;

        event ProfileCreated(uint256 indexed profileId, address indexed owner);
        event AttributeAdded(uint256 indexed attributeId, uint256 indexed profileId);
        event VerificationRequested(uint256 indexed requestId, uint256 indexed attributeId);
        event ProfileUpdated(uint256 indexed profileId);
    }
}
