// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Demo CLI: submit one `createProfile` call and stream its lifecycle.
//!
//! ```text
//! RPC_URL=... CONTRACT_ADDRESS=0x... PRIVATE_KEY=... clearid "Alex" "bio" 25
//! ```

use std::env;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use clear_identity::config::{
    CONTRACT_ADDRESS_ENV, ETH_SEPOLIA, LOG_FORMAT_ENV, PRIVATE_KEY_ENV, RPC_URL_ENV,
};
use clear_identity::{
    CallStatus, ClearIdentityClient, ContractConfig, CreateProfileInput, StubAdapter,
    SubmissionPipeline, TrackerConfig, WalletSession,
};

#[tokio::main]
async fn main() {
    init_tracing();

    let contract_address = env::var(CONTRACT_ADDRESS_ENV)
        .expect("CONTRACT_ADDRESS must be set to the deployed ClearIdentity contract");
    let private_key =
        env::var(PRIVATE_KEY_ENV).expect("PRIVATE_KEY must be set (hex, no 0x prefix)");

    let mut args = env::args().skip(1);
    let public_name = args.next().expect("usage: clearid <name> [bio] [age]");
    let public_bio = args.next().unwrap_or_default();
    let age = args.next().unwrap_or_else(|| "25".to_string());

    let session = WalletSession::from_private_key(&private_key).expect("invalid private key");
    info!(address = %session.address, network = ETH_SEPOLIA.name, "Wallet session ready");

    let client = ClearIdentityClient::connect(
        ContractConfig {
            network: ETH_SEPOLIA,
            contract_address,
            rpc_url: env::var(RPC_URL_ENV).ok(),
        },
        Some(session),
    )
    .await
    .expect("failed to connect contract client");

    // No real encryption backend in the demo; the stub produces
    // fixed-length ciphertext and proof.
    let pipeline = SubmissionPipeline::new(
        Arc::new(StubAdapter::new()),
        Arc::new(client),
        TrackerConfig::default(),
    );

    let mut handle = pipeline
        .create_profile(CreateProfileInput {
            public_name,
            public_bio,
            age_plaintext: age.into_bytes(),
        })
        .await
        .expect("submission failed");

    info!(
        tx_hash = %handle.pending_call().tx_hash,
        explorer = handle.pending_call().explorer_url.as_deref().unwrap_or("-"),
        "Profile creation submitted"
    );

    loop {
        let status = handle.status();
        match &status {
            CallStatus::Submitted | CallStatus::Confirming => {
                info!(?status, "Waiting for receipt");
            }
            CallStatus::Confirmed(receipt) => {
                info!(
                    profile_id = ?receipt.assigned_id,
                    block_number = receipt.block_number,
                    "Profile confirmed"
                );
                return;
            }
            CallStatus::Failed(error) => {
                tracing::error!(%error, "Profile creation failed");
                std::process::exit(1);
            }
        }
        handle.changed().await;
    }
}

/// Initialize tracing from `RUST_LOG` and `LOG_FORMAT` (`json` or `pretty`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = env::var(LOG_FORMAT_ENV).is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
