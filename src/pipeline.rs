// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Submission Pipeline
//!
//! One entry point per ClearIdentity operation. Each runs the same
//! sequence for a single call:
//!
//! 1. structural validation (required fields, closed enums, byte bounds);
//!    fails synchronously with no adapter or chain contact
//! 2. encryption of the applicable fields through the adapter; failure
//!    stops the pipeline before any submission
//! 3. submission through the contract client: one signature, one broadcast
//! 4. attach a tracker and hand the caller a single [`CallHandle`]
//!
//! The pipeline performs no retries of its own. Re-submitting a
//! state-changing call without confirming the prior one's failure risks
//! duplicate profiles or attributes, so retry policy belongs to the caller
//! and a resubmission is always a fresh call.
//!
//! Independent submissions may run concurrently; every call gets its own
//! tracker and handle, and they share no mutable state.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::config::MAX_PLAINTEXT_BYTES;
use crate::contract::{ContractCall, ContractClient};
use crate::encryption::{AttributeContext, EncryptionAdapter};
use crate::error::{PipelineError, ValidationError};
use crate::models::{AttributeId, AttributeType, PendingCall, ProfileId};
use crate::tracker::{CallHandle, TrackerConfig, TransactionTracker};

/// Input for `createProfile`. The age plaintext is encrypted by the
/// pipeline; name and bio go on-chain in the clear.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProfileInput {
    pub public_name: String,
    pub public_bio: String,
    pub age_plaintext: Vec<u8>,
}

/// Input for `addAttribute`. `profile_id` must be a previously confirmed
/// profile identifier known to the caller; the contract is authoritative
/// and rejects unknown ids at execution time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddAttributeInput {
    pub profile_id: ProfileId,
    pub attribute_type: AttributeType,
    pub public_label: String,
    pub value_plaintext: Vec<u8>,
    pub is_private: bool,
}

/// Input for `requestVerification`. The attribute type is that of the
/// attribute being verified, so the adapter can bind the verification
/// payload to the same context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestVerificationInput {
    pub profile_id: ProfileId,
    pub attribute_id: AttributeId,
    pub attribute_type: AttributeType,
    pub payload_plaintext: Vec<u8>,
}

/// Input for `updateProfile`. Both fields are always submitted, even when
/// unchanged, mirroring the contract's fixed-arity call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProfileInput {
    pub profile_id: ProfileId,
    pub public_name: String,
    pub public_bio: String,
}

/// Orchestrates validate -> encrypt -> submit -> track for the four
/// ClearIdentity operations.
pub struct SubmissionPipeline {
    adapter: Arc<dyn EncryptionAdapter>,
    client: Arc<dyn ContractClient>,
    tracker: TransactionTracker,
}

impl SubmissionPipeline {
    pub fn new(
        adapter: Arc<dyn EncryptionAdapter>,
        client: Arc<dyn ContractClient>,
        tracker_config: TrackerConfig,
    ) -> Self {
        let tracker = TransactionTracker::new(Arc::clone(&client), tracker_config);
        Self {
            adapter,
            client,
            tracker,
        }
    }

    /// Create an identity profile with an encrypted age attribute.
    pub async fn create_profile(
        &self,
        input: CreateProfileInput,
    ) -> Result<CallHandle, PipelineError> {
        require_non_empty("public_name", &input.public_name)?;
        require_plaintext_bounds(&input.age_plaintext)?;

        let payload = self.adapter.encrypt(
            &input.age_plaintext,
            &AttributeContext {
                attribute_type: AttributeType::Age,
                profile_hint: None,
            },
        )?;

        self.submit_and_track(ContractCall::CreateProfile {
            public_name: input.public_name,
            public_bio: input.public_bio,
            encrypted_age: payload.ciphertext,
            age_proof: payload.proof,
        })
        .await
    }

    /// Attach an encrypted attribute to a confirmed profile.
    pub async fn add_attribute(
        &self,
        input: AddAttributeInput,
    ) -> Result<CallHandle, PipelineError> {
        require_confirmed_profile(input.profile_id)?;
        require_non_empty("public_label", &input.public_label)?;
        require_plaintext_bounds(&input.value_plaintext)?;

        tracing::debug!(
            profile_id = input.profile_id,
            attribute_type = %input.attribute_type,
            "Encrypting attribute value"
        );

        let payload = self.adapter.encrypt(
            &input.value_plaintext,
            &AttributeContext {
                attribute_type: input.attribute_type,
                profile_hint: Some(input.profile_id),
            },
        )?;

        self.submit_and_track(ContractCall::AddAttribute {
            profile_id: input.profile_id,
            attribute_type: input.attribute_type,
            public_label: input.public_label,
            encrypted_data: payload.ciphertext,
            data_proof: payload.proof,
            is_private: input.is_private,
        })
        .await
    }

    /// Request verification of an attribute's encrypted data.
    pub async fn request_verification(
        &self,
        input: RequestVerificationInput,
    ) -> Result<CallHandle, PipelineError> {
        require_confirmed_profile(input.profile_id)?;
        require_plaintext_bounds(&input.payload_plaintext)?;

        let payload = self.adapter.encrypt(
            &input.payload_plaintext,
            &AttributeContext {
                attribute_type: input.attribute_type,
                profile_hint: Some(input.profile_id),
            },
        )?;

        self.submit_and_track(ContractCall::RequestVerification {
            profile_id: input.profile_id,
            attribute_id: input.attribute_id,
            verification_data: payload.ciphertext,
            data_proof: payload.proof,
        })
        .await
    }

    /// Update a profile's public fields. Nothing is encrypted here; both
    /// fields are always sent.
    pub async fn update_profile(
        &self,
        input: UpdateProfileInput,
    ) -> Result<CallHandle, PipelineError> {
        require_confirmed_profile(input.profile_id)?;
        require_non_empty("public_name", &input.public_name)?;

        self.submit_and_track(ContractCall::UpdateProfile {
            profile_id: input.profile_id,
            public_name: input.public_name,
            public_bio: input.public_bio,
        })
        .await
    }

    /// Submit a validated call and attach its tracker. Submission failures
    /// surface here, before the caller has committed to watching a handle.
    async fn submit_and_track(&self, call: ContractCall) -> Result<CallHandle, PipelineError> {
        let kind = call.kind();
        let handle = self.client.submit(call).await?;

        let pending = PendingCall {
            call_id: Uuid::new_v4(),
            kind,
            tx_hash: handle.tx_hash.clone(),
            explorer_url: handle.explorer_url.clone(),
            submitted_at: Utc::now(),
        };

        info!(
            call_id = %pending.call_id,
            %kind,
            tx_hash = %pending.tx_hash,
            "Submission accepted; tracking receipt"
        );

        Ok(self.tracker.watch(pending, handle))
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

fn require_plaintext_bounds(plaintext: &[u8]) -> Result<(), ValidationError> {
    if plaintext.len() > MAX_PLAINTEXT_BYTES {
        Err(ValidationError::PayloadTooLarge {
            len: plaintext.len(),
            max: MAX_PLAINTEXT_BYTES,
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use crate::contract::{CallReceipt, SubmissionHandle};
    use crate::encryption::{EncryptedPayload, StubAdapter};
    use crate::error::{EncryptionError, SubmissionError, TrackerError};
    use crate::models::{CallKind, Profile};
    use crate::tracker::CallStatus;

    /// Adapter wrapper that counts invocations and can be scripted to fail.
    struct CountingAdapter {
        inner: StubAdapter,
        calls: AtomicUsize,
        fail_with: Option<EncryptionError>,
    }

    impl CountingAdapter {
        fn new() -> Self {
            Self {
                inner: StubAdapter::new(),
                calls: AtomicUsize::new(0),
                fail_with: None,
            }
        }

        fn failing(error: EncryptionError) -> Self {
            Self {
                inner: StubAdapter::new(),
                calls: AtomicUsize::new(0),
                fail_with: Some(error),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl EncryptionAdapter for CountingAdapter {
        fn encrypt(
            &self,
            plaintext: &[u8],
            context: &AttributeContext,
        ) -> Result<EncryptedPayload, EncryptionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(e) = &self.fail_with {
                return Err(e.clone());
            }
            self.inner.encrypt(plaintext, context)
        }

        fn max_plaintext_len(&self) -> usize {
            self.inner.max_plaintext_len()
        }
    }

    /// Contract client mock: counts submits and receipt probes, can reject
    /// submission, and otherwise confirms (or reverts) after one poll.
    struct MockClient {
        submits: AtomicUsize,
        probes: AtomicUsize,
        reject_submit: Option<SubmissionError>,
        receipt_result: Result<Option<CallReceipt>, SubmissionError>,
        submitted_calls: Mutex<Vec<ContractCall>>,
    }

    impl MockClient {
        fn confirming(assigned_id: Option<u64>) -> Self {
            Self {
                submits: AtomicUsize::new(0),
                probes: AtomicUsize::new(0),
                reject_submit: None,
                receipt_result: Ok(Some(CallReceipt {
                    tx_hash: "0xfeed".to_string(),
                    block_number: 42,
                    gas_used: 90_000,
                    success: true,
                    assigned_id,
                })),
                submitted_calls: Mutex::new(Vec::new()),
            }
        }

        fn reverting() -> Self {
            let mut mock = Self::confirming(None);
            mock.receipt_result = Ok(Some(CallReceipt {
                tx_hash: "0xfeed".to_string(),
                block_number: 42,
                gas_used: 90_000,
                success: false,
                assigned_id: None,
            }));
            mock
        }

        fn rejecting(error: SubmissionError) -> Self {
            let mut mock = Self::confirming(None);
            mock.reject_submit = Some(error);
            mock
        }

        fn submit_count(&self) -> usize {
            self.submits.load(Ordering::SeqCst)
        }

        fn probe_count(&self) -> usize {
            self.probes.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ContractClient for MockClient {
        async fn submit(&self, call: ContractCall) -> Result<SubmissionHandle, SubmissionError> {
            self.submits.fetch_add(1, Ordering::SeqCst);
            if let Some(e) = &self.reject_submit {
                return Err(e.clone());
            }
            self.submitted_calls.lock().unwrap().push(call);
            Ok(SubmissionHandle {
                tx_hash: "0xfeed".to_string(),
                explorer_url: Some("https://sepolia.etherscan.io/tx/0xfeed".to_string()),
            })
        }

        async fn receipt(
            &self,
            _handle: &SubmissionHandle,
        ) -> Result<Option<CallReceipt>, SubmissionError> {
            self.probes.fetch_add(1, Ordering::SeqCst);
            self.receipt_result.clone()
        }
    }

    fn pipeline(
        adapter: Arc<CountingAdapter>,
        client: Arc<MockClient>,
    ) -> SubmissionPipeline {
        SubmissionPipeline::new(
            adapter,
            client,
            TrackerConfig {
                poll_interval: Duration::from_millis(10),
                timeout: Duration::from_secs(60),
            },
        )
    }

    // End-to-end: createProfile with the stub adapter and a client that
    // confirms after one poll reports Submitted, Confirming, then Confirmed
    // with a non-null profile identifier.
    #[tokio::test(start_paused = true)]
    async fn create_profile_confirms_with_assigned_id() {
        let adapter = Arc::new(CountingAdapter::new());
        let client = Arc::new(MockClient::confirming(Some(1)));
        let pipeline = pipeline(Arc::clone(&adapter), Arc::clone(&client));

        let mut handle = pipeline
            .create_profile(CreateProfileInput {
                public_name: "Alex".to_string(),
                public_bio: "bio".to_string(),
                age_plaintext: b"25".to_vec(),
            })
            .await
            .unwrap();

        assert_eq!(handle.status(), CallStatus::Submitted);
        assert_eq!(handle.changed().await, CallStatus::Confirming);
        assert!(matches!(
            handle.changed().await,
            CallStatus::Confirmed(ref receipt) if receipt.assigned_id == Some(1)
        ));

        let completed = handle.wait().await.unwrap();
        assert_eq!(completed.call.kind, CallKind::CreateProfile);
        assert_eq!(completed.assigned_id, Some(1));
        assert_eq!(adapter.call_count(), 1);
        assert_eq!(client.submit_count(), 1);

        // The submitted ciphertext/proof have the stub's documented lengths.
        let calls = client.submitted_calls.lock().unwrap();
        match &calls[0] {
            ContractCall::CreateProfile {
                encrypted_age,
                age_proof,
                ..
            } => {
                assert_eq!(encrypted_age.len(), StubAdapter::DEFAULT_CIPHERTEXT_LEN);
                assert_eq!(age_proof.len(), StubAdapter::DEFAULT_PROOF_LEN);
            }
            other => panic!("unexpected call: {other:?}"),
        }

        // The caller builds its confirmed record from the completed call.
        let profile = Profile {
            id: completed.assigned_id,
            public_name: "Alex".to_string(),
            public_bio: "bio".to_string(),
            owner: "0x742d35Cc6634C0532925a3b844Bc9e7595f4aB12".into(),
        };
        assert_eq!(profile.id, Some(1));
    }

    // End-to-end: an empty required label fails validation with zero adapter
    // and zero client calls.
    #[tokio::test]
    async fn empty_label_fails_before_any_collaborator_is_contacted() {
        let adapter = Arc::new(CountingAdapter::new());
        let client = Arc::new(MockClient::confirming(Some(2)));
        let pipeline = pipeline(Arc::clone(&adapter), Arc::clone(&client));

        let err = pipeline
            .add_attribute(AddAttributeInput {
                profile_id: 1,
                attribute_type: AttributeType::Email,
                public_label: String::new(),
                value_plaintext: b"alex@example.org".to_vec(),
                is_private: true,
            })
            .await
            .unwrap_err();

        assert_eq!(
            err,
            PipelineError::Validation(ValidationError::EmptyField("public_label"))
        );
        assert_eq!(adapter.call_count(), 0);
        assert_eq!(client.submit_count(), 0);
    }

    #[tokio::test]
    async fn empty_name_fails_for_create_and_update() {
        let adapter = Arc::new(CountingAdapter::new());
        let client = Arc::new(MockClient::confirming(None));
        let pipeline = pipeline(Arc::clone(&adapter), Arc::clone(&client));

        let err = pipeline
            .create_profile(CreateProfileInput {
                public_name: String::new(),
                public_bio: "bio".to_string(),
                age_plaintext: b"25".to_vec(),
            })
            .await
            .unwrap_err();
        assert_eq!(
            err,
            PipelineError::Validation(ValidationError::EmptyField("public_name"))
        );

        let err = pipeline
            .update_profile(UpdateProfileInput {
                profile_id: 1,
                public_name: "   ".to_string(),
                public_bio: "bio".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(
            err,
            PipelineError::Validation(ValidationError::EmptyField("public_name"))
        );

        assert_eq!(adapter.call_count(), 0);
        assert_eq!(client.submit_count(), 0);
    }

    #[tokio::test]
    async fn oversized_plaintext_fails_validation_before_the_adapter() {
        let adapter = Arc::new(CountingAdapter::new());
        let client = Arc::new(MockClient::confirming(None));
        let pipeline = pipeline(Arc::clone(&adapter), Arc::clone(&client));

        let err = pipeline
            .create_profile(CreateProfileInput {
                public_name: "Alex".to_string(),
                public_bio: String::new(),
                age_plaintext: vec![0u8; MAX_PLAINTEXT_BYTES + 1],
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Validation(ValidationError::PayloadTooLarge { .. })
        ));
        assert_eq!(adapter.call_count(), 0);
    }

    // Encryption failure for syntactically valid input propagates as
    // EncryptionError with no ContractClient invocation.
    #[tokio::test]
    async fn encryption_failure_stops_before_submission() {
        let adapter = Arc::new(CountingAdapter::failing(EncryptionError::Backend(
            "fhevm unavailable".to_string(),
        )));
        let client = Arc::new(MockClient::confirming(None));
        let pipeline = pipeline(Arc::clone(&adapter), Arc::clone(&client));

        let err = pipeline
            .add_attribute(AddAttributeInput {
                profile_id: 1,
                attribute_type: AttributeType::Phone,
                public_label: "Phone".to_string(),
                value_plaintext: b"+31612345678".to_vec(),
                is_private: true,
            })
            .await
            .unwrap_err();

        assert_eq!(
            err,
            PipelineError::Encryption(EncryptionError::Backend("fhevm unavailable".to_string()))
        );
        assert_eq!(adapter.call_count(), 1);
        assert_eq!(client.submit_count(), 0);
    }

    // End-to-end: a signature-rejected updateProfile surfaces as
    // SubmissionError and no tracker is ever created.
    #[tokio::test]
    async fn rejected_signature_surfaces_without_a_tracker() {
        let adapter = Arc::new(CountingAdapter::new());
        let client = Arc::new(MockClient::rejecting(SubmissionError::SignatureRejected(
            "user denied".to_string(),
        )));
        let pipeline = pipeline(Arc::clone(&adapter), Arc::clone(&client));

        let err = pipeline
            .update_profile(UpdateProfileInput {
                profile_id: 1,
                public_name: "Alex".to_string(),
                public_bio: "new bio".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(
            err,
            PipelineError::Submission(SubmissionError::SignatureRejected(
                "user denied".to_string()
            ))
        );
        // No tracker was created, so nothing ever probed for a receipt.
        assert_eq!(client.probe_count(), 0);
    }

    // End-to-end: an execution revert for requestVerification reaches the
    // tracker's terminal Failed state as a receipt failure.
    #[tokio::test(start_paused = true)]
    async fn reverted_verification_fails_with_receipt_failure() {
        let adapter = Arc::new(CountingAdapter::new());
        let client = Arc::new(MockClient::reverting());
        let pipeline = pipeline(Arc::clone(&adapter), Arc::clone(&client));

        let handle = pipeline
            .request_verification(RequestVerificationInput {
                profile_id: 1,
                attribute_id: 4,
                attribute_type: AttributeType::Age,
                payload_plaintext: b"over-18".to_vec(),
            })
            .await
            .unwrap();

        let err = handle.wait().await.unwrap_err();
        assert_eq!(
            err,
            TrackerError::Reverted {
                tx_hash: "0xfeed".to_string(),
            }
        );
    }

    // Concurrent submissions are independent tracker instances.
    #[tokio::test(start_paused = true)]
    async fn concurrent_submissions_track_independently() {
        let adapter = Arc::new(CountingAdapter::new());
        let client = Arc::new(MockClient::confirming(Some(9)));
        let pipeline = pipeline(Arc::clone(&adapter), Arc::clone(&client));

        let first = pipeline
            .create_profile(CreateProfileInput {
                public_name: "Alex".to_string(),
                public_bio: String::new(),
                age_plaintext: b"25".to_vec(),
            })
            .await
            .unwrap();
        let second = pipeline
            .add_attribute(AddAttributeInput {
                profile_id: 1,
                attribute_type: AttributeType::Email,
                public_label: "Email".to_string(),
                value_plaintext: b"alex@example.org".to_vec(),
                is_private: false,
            })
            .await
            .unwrap();

        assert_ne!(
            first.pending_call().call_id,
            second.pending_call().call_id
        );

        let (a, b) = tokio::join!(first.wait(), second.wait());
        assert_eq!(a.unwrap().assigned_id, Some(9));
        assert_eq!(b.unwrap().assigned_id, Some(9));
        assert_eq!(client.submit_count(), 2);
    }

    #[tokio::test]
    async fn placeholder_profile_id_is_rejected_everywhere() {
        let adapter = Arc::new(CountingAdapter::new());
        let client = Arc::new(MockClient::confirming(None));
        let pipeline = pipeline(Arc::clone(&adapter), Arc::clone(&client));

        let err = pipeline
            .update_profile(UpdateProfileInput {
                profile_id: 0,
                public_name: "Alex".to_string(),
                public_bio: String::new(),
            })
            .await
            .unwrap_err();
        assert_eq!(
            err,
            PipelineError::Validation(ValidationError::PlaceholderProfileId)
        );

        let err = pipeline
            .request_verification(RequestVerificationInput {
                profile_id: 0,
                attribute_id: 1,
                attribute_type: AttributeType::Email,
                payload_plaintext: b"x".to_vec(),
            })
            .await
            .unwrap_err();
        assert_eq!(
            err,
            PipelineError::Validation(ValidationError::PlaceholderProfileId)
        );
        assert_eq!(adapter.call_count(), 0);
        assert_eq!(client.submit_count(), 0);
    }
}
