// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Contract call submission and receipt probing.
//!
//! [`ContractClient`] is the seam between the pipeline and the chain: one
//! method submits a validated call, one probes for its receipt. The
//! [`ClearIdentityClient`] implementation signs and broadcasts through an
//! alloy provider; tests substitute their own implementations.

use std::str::FromStr;

use alloy::{
    network::{Ethereum, EthereumWallet},
    primitives::{Address, U256},
    providers::{
        fillers::{
            BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller,
            WalletFiller,
        },
        Identity, Provider, ProviderBuilder, RootProvider,
    },
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
    sol_types::SolEvent,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::NetworkConfig;
use crate::error::SubmissionError;

use super::abi::IClearIdentity;
use super::call::ContractCall;

/// HTTP provider type with all fillers plus wallet signing.
type SignerProvider = FillProvider<
    JoinFill<
        JoinFill<
            Identity,
            JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
        >,
        WalletFiller<EthereumWallet>,
    >,
    RootProvider<Ethereum>,
>;

/// Where the ClearIdentity contract lives.
#[derive(Debug, Clone)]
pub struct ContractConfig {
    /// Target network
    pub network: NetworkConfig,
    /// Deployed contract address (0x-prefixed)
    pub contract_address: String,
    /// Override for the network's default RPC endpoint (`RPC_URL`).
    pub rpc_url: Option<String>,
}

/// An active signer and the address it controls.
///
/// Session management (connect/disconnect, account and chain selection) is
/// the surrounding application's concern; the client only consumes the
/// result, per call.
#[derive(Clone)]
pub struct WalletSession {
    pub wallet: EthereumWallet,
    pub address: Address,
}

impl WalletSession {
    /// Build a session from a hex-encoded private key (64 characters, no
    /// 0x prefix).
    pub fn from_private_key(private_key_hex: &str) -> Result<Self, SubmissionError> {
        let key_bytes = alloy::hex::decode(private_key_hex)
            .map_err(|e| SubmissionError::InvalidPrivateKey(e.to_string()))?;
        let signer = PrivateKeySigner::from_slice(&key_bytes)
            .map_err(|e| SubmissionError::InvalidPrivateKey(e.to_string()))?;
        let address = signer.address();
        Ok(Self {
            wallet: EthereumWallet::from(signer),
            address,
        })
    }
}

/// Opaque handle for a submitted-but-unconfirmed call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmissionHandle {
    /// Transaction hash assigned by the chain.
    pub tx_hash: String,
    /// Explorer URL for the transaction, when the network has one.
    pub explorer_url: Option<String>,
}

/// Receipt for an executed call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallReceipt {
    pub tx_hash: String,
    /// Block number where the transaction was included
    pub block_number: u64,
    /// Gas actually used
    pub gas_used: u64,
    /// Whether execution succeeded
    pub success: bool,
    /// Identifier emitted by the contract event, when the operation
    /// assigns one.
    pub assigned_id: Option<u64>,
}

/// Typed binding to the ClearIdentity call surface.
///
/// `submit` consumes exactly one signature and, on acceptance, one
/// broadcast. A rejected signature is terminal for that attempt; the
/// client never retries; the caller re-initiates if it wants another try.
#[async_trait]
pub trait ContractClient: Send + Sync {
    /// Validate, sign, and broadcast one call.
    async fn submit(&self, call: ContractCall) -> Result<SubmissionHandle, SubmissionError>;

    /// Probe for the receipt of a submitted call. `Ok(None)` while the call
    /// is still pending; never blocks waiting for inclusion.
    async fn receipt(
        &self,
        handle: &SubmissionHandle,
    ) -> Result<Option<CallReceipt>, SubmissionError>;
}

/// Alloy-backed client for a deployed ClearIdentity contract.
pub struct ClearIdentityClient {
    network: NetworkConfig,
    contract: Address,
    provider: SignerProvider,
}

impl ClearIdentityClient {
    /// Connect with an active wallet session.
    ///
    /// A disconnected wallet (`None`) is a precondition failure: the client
    /// reports [`SubmissionError::NotConnected`] rather than managing
    /// sessions itself.
    pub async fn connect(
        config: ContractConfig,
        session: Option<WalletSession>,
    ) -> Result<Self, SubmissionError> {
        let session = session.ok_or(SubmissionError::NotConnected)?;

        let contract = Address::from_str(&config.contract_address)
            .map_err(|e| SubmissionError::InvalidAddress(e.to_string()))?;

        let url: url::Url = config
            .rpc_url
            .as_deref()
            .unwrap_or(config.network.rpc_url)
            .parse()
            .map_err(|e: url::ParseError| SubmissionError::InvalidRpcUrl(e.to_string()))?;

        let provider = ProviderBuilder::new().wallet(session.wallet).connect_http(url);

        Ok(Self {
            network: config.network,
            contract,
            provider,
        })
    }

    /// The network this client submits to.
    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    /// Pull the contract-assigned identifier out of receipt logs.
    ///
    /// The id-carrying events all put the identifier in topic 1, so a
    /// topic-0 match against the known signatures is enough.
    fn assigned_id_from_logs(logs: &[alloy::rpc::types::Log]) -> Option<u64> {
        const ID_EVENTS: [alloy::primitives::B256; 3] = [
            IClearIdentity::ProfileCreated::SIGNATURE_HASH,
            IClearIdentity::AttributeAdded::SIGNATURE_HASH,
            IClearIdentity::VerificationRequested::SIGNATURE_HASH,
        ];

        for log in logs {
            let topics = log.topics();
            if topics.len() < 2 {
                continue;
            }
            if ID_EVENTS.contains(&topics[0]) {
                let raw = U256::from_be_slice(topics[1].as_slice());
                return u64::try_from(raw).ok();
            }
        }
        None
    }
}

#[async_trait]
impl ContractClient for ClearIdentityClient {
    async fn submit(&self, call: ContractCall) -> Result<SubmissionHandle, SubmissionError> {
        // The contract is never asked to accept an invalid call.
        call.validate()?;

        let kind = call.kind();
        let data = call.calldata();

        let tx = TransactionRequest::default()
            .to(self.contract)
            .input(data.into());

        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| SubmissionError::Rejected(e.to_string()))?;

        let tx_hash = format!("{:?}", pending.tx_hash());
        let explorer_url = format!("{}/tx/{}", self.network.explorer_url, tx_hash);

        tracing::info!(%kind, %tx_hash, "Submitted ClearIdentity call");

        Ok(SubmissionHandle {
            tx_hash,
            explorer_url: Some(explorer_url),
        })
    }

    async fn receipt(
        &self,
        handle: &SubmissionHandle,
    ) -> Result<Option<CallReceipt>, SubmissionError> {
        let hash = handle
            .tx_hash
            .parse()
            .map_err(|e| SubmissionError::Rpc(format!("Invalid tx hash: {e}")))?;

        let receipt = self
            .provider
            .get_transaction_receipt(hash)
            .await
            .map_err(|e| SubmissionError::Rpc(format!("Failed to get receipt: {e}")))?;

        Ok(receipt.map(|r| CallReceipt {
            tx_hash: handle.tx_hash.clone(),
            block_number: r.block_number.unwrap_or(0),
            gas_used: r.gas_used as u64,
            success: r.status(),
            assigned_id: Self::assigned_id_from_logs(r.inner.logs()),
        }))
    }
}
