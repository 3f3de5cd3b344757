use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use quiz_core::model::SignInRecord;
use serde_json::Value;
use storage::repository::KeyValueStore;
use tokio::sync::watch;

use crate::error::SignInError;

/// Fixed key of the persisted sign-in record.
pub const SIGN_IN_KEY: &str = "sign_in_record";

/// Holds the current sign-in record and broadcasts every change.
///
/// The record comes from an unverified identity token; it only unlocks
/// catalog entries and is never treated as authentication.
#[derive(Clone)]
pub struct SignInService {
    store: Arc<dyn KeyValueStore>,
    state: Arc<watch::Sender<Option<SignInRecord>>>,
}

impl SignInService {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            store,
            state: Arc::new(tx),
        }
    }

    /// Build the service and seed it with the persisted record, if any.
    ///
    /// # Errors
    ///
    /// Returns `SignInError::Storage` if the store cannot be read.
    pub async fn restore(store: Arc<dyn KeyValueStore>) -> Result<Self, SignInError> {
        let service = Self::new(store);
        let record = match service.store.get(SIGN_IN_KEY).await? {
            Some(raw) => serde_json::from_str::<SignInRecord>(&raw)
                .inspect_err(|err| tracing::warn!(error = %err, "ignoring unreadable sign-in record"))
                .ok(),
            None => None,
        };
        service.state.send_replace(record);
        Ok(service)
    }

    #[must_use]
    pub fn current(&self) -> Option<SignInRecord> {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.state.borrow().is_some()
    }

    /// Receiver that observes every sign-in and sign-out.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<SignInRecord>> {
        self.state.subscribe()
    }

    /// Accept an identity token from the external sign-in callback.
    ///
    /// An empty credential is ignored. A token whose payload cannot be decoded
    /// still signs the user in with an empty record.
    ///
    /// # Errors
    ///
    /// Returns `SignInError` if the record cannot be persisted.
    pub async fn handle_credential(
        &self,
        credential: &str,
    ) -> Result<Option<SignInRecord>, SignInError> {
        let credential = credential.trim();
        if credential.is_empty() {
            return Ok(None);
        }
        let record = decode_credential(credential).unwrap_or_else(|| {
            tracing::warn!("identity token payload could not be decoded");
            SignInRecord::default()
        });
        let encoded = serde_json::to_string(&record)?;
        self.store.set(SIGN_IN_KEY, &encoded).await?;
        self.state.send_replace(Some(record.clone()));
        tracing::info!(name = record.display_name(), "signed in");
        Ok(Some(record))
    }

    /// Remove the stored record and broadcast the change.
    ///
    /// # Errors
    ///
    /// Returns `SignInError::Storage` if the store cannot be written.
    pub async fn sign_out(&self) -> Result<(), SignInError> {
        self.store.remove(SIGN_IN_KEY).await?;
        self.state.send_replace(None);
        tracing::info!("signed out");
        Ok(())
    }
}

/// Read the identity claims from a JWT payload without verifying it.
#[must_use]
pub fn decode_credential(token: &str) -> Option<SignInRecord> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: Value = serde_json::from_slice(&bytes).ok()?;
    let claim = |key: &str| {
        claims
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    Some(SignInRecord {
        name: claim("name"),
        email: claim("email"),
        picture: claim("picture"),
        subject_id: claim("sub"),
    })
}
