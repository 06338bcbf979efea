use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use revstream::funnel::{
    AccountIdentity, IdentityError, IdentityProvider, RevenuePlatform, SessionId, SessionRecord,
    SessionStore, SessionStoreError, SignInRequest,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySessionStore {
    records: Arc<Mutex<HashMap<SessionId, SessionRecord>>>,
}

impl SessionStore for InMemorySessionStore {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, SessionStoreError> {
        let mut guard = self.records.lock().expect("session mutex poisoned");
        if guard.contains_key(&record.session_id) {
            return Err(SessionStoreError::Conflict);
        }
        guard.insert(record.session_id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: SessionRecord) -> Result<(), SessionStoreError> {
        let mut guard = self.records.lock().expect("session mutex poisoned");
        if guard.contains_key(&record.session_id) {
            guard.insert(record.session_id.clone(), record);
            Ok(())
        } else {
            Err(SessionStoreError::NotFound)
        }
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, SessionStoreError> {
        let guard = self.records.lock().expect("session mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn remove(&self, id: &SessionId) -> Result<(), SessionStoreError> {
        let mut guard = self.records.lock().expect("session mutex poisoned");
        guard
            .remove(id)
            .map(|_| ())
            .ok_or(SessionStoreError::NotFound)
    }
}

/// Simulated identity provider for the lead-generation flow.
///
/// The product's onboarding is a demonstration funnel: any syntactically
/// plausible email with a non-empty password signs in. A real provider plugs
/// into the same `IdentityProvider` seam without touching the funnel.
#[derive(Default, Clone)]
pub(crate) struct MockIdentityProvider;

impl IdentityProvider for MockIdentityProvider {
    fn authenticate(&self, request: &SignInRequest) -> Result<AccountIdentity, IdentityError> {
        let email = request.email.trim();
        let local_part = email
            .split_once('@')
            .filter(|(local, domain)| !local.is_empty() && domain.contains('.'));

        let Some((local, _)) = local_part else {
            return Err(IdentityError::InvalidCredentials);
        };
        if request.password.is_empty() {
            return Err(IdentityError::InvalidCredentials);
        }

        Ok(AccountIdentity {
            account_id: format!("acct-{local}"),
            display_name: local.replace(['.', '_'], " "),
            email: email.to_string(),
        })
    }
}

pub(crate) fn parse_platform(raw: &str) -> Result<RevenuePlatform, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "patreon" => Ok(RevenuePlatform::Patreon),
        "substack" => Ok(RevenuePlatform::Substack),
        "twitch" => Ok(RevenuePlatform::Twitch),
        "stripe" => Ok(RevenuePlatform::Stripe),
        other => Err(format!(
            "unknown platform '{other}' (expected patreon, substack, twitch, or stripe)"
        )),
    }
}
