// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration Constants
//!
//! This module defines environment variable names, network constants, and
//! pipeline limits. Configuration is loaded from the environment at startup
//! by the demo binary; library callers pass values in directly.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `RPC_URL` | JSON-RPC endpoint for the target network | Sepolia public RPC |
//! | `CONTRACT_ADDRESS` | Deployed ClearIdentity contract address | Required |
//! | `PRIVATE_KEY` | Hex-encoded signing key (64 chars, no 0x prefix) | Required |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info` |

use std::time::Duration;

/// Environment variable name for the JSON-RPC endpoint URL.
pub const RPC_URL_ENV: &str = "RPC_URL";

/// Environment variable name for the deployed ClearIdentity contract address.
pub const CONTRACT_ADDRESS_ENV: &str = "CONTRACT_ADDRESS";

/// Environment variable name for the hex-encoded signing key.
pub const PRIVATE_KEY_ENV: &str = "PRIVATE_KEY";

/// Environment variable name for the logging format (`json` or `pretty`).
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Ethereum network configuration.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Network name for display
    pub name: &'static str,
    /// Chain ID
    pub chain_id: u64,
    /// RPC endpoint URL
    pub rpc_url: &'static str,
    /// Block explorer URL
    pub explorer_url: &'static str,
}

/// Ethereum Sepolia testnet, where the ClearIdentity contract is deployed.
pub const ETH_SEPOLIA: NetworkConfig = NetworkConfig {
    name: "Ethereum Sepolia Testnet",
    chain_id: 11_155_111,
    rpc_url: "https://rpc.sepolia.org",
    explorer_url: "https://sepolia.etherscan.io",
};

/// Ethereum mainnet configuration.
pub const ETH_MAINNET: NetworkConfig = NetworkConfig {
    name: "Ethereum Mainnet",
    chain_id: 1,
    rpc_url: "https://eth.llamarpc.com",
    explorer_url: "https://etherscan.io",
};

/// Upper bound on plaintext handed to an encryption adapter, in bytes.
pub const MAX_PLAINTEXT_BYTES: usize = 4096;

/// Upper bound on an encrypted payload or proof submitted on-chain, in bytes.
pub const MAX_PAYLOAD_BYTES: usize = 8192;

/// Default interval between receipt polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Default wait budget before a receipt wait reports a timeout.
pub const DEFAULT_RECEIPT_TIMEOUT: Duration = Duration::from_secs(180);
