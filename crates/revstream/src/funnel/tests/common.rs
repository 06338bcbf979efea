use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::funnel::domain::{
    AccountIdentity, ConnectPlatformRequest, RevenuePlatform, SessionId, SessionRecord,
    SignInRequest,
};
use crate::funnel::service::OnboardingService;
use crate::funnel::session::{
    IdentityError, IdentityProvider, SessionStore, SessionStoreError,
};

#[derive(Default, Clone)]
pub(super) struct MemorySessionStore {
    records: Arc<Mutex<HashMap<SessionId, SessionRecord>>>,
}

impl SessionStore for MemorySessionStore {
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

/// Store double that fails every call, for exercising 500 paths.
pub(super) struct UnavailableStore;

impl SessionStore for UnavailableStore {
    fn insert(&self, _record: SessionRecord) -> Result<SessionRecord, SessionStoreError> {
        Err(SessionStoreError::Unavailable("store offline".to_string()))
    }

    fn update(&self, _record: SessionRecord) -> Result<(), SessionStoreError> {
        Err(SessionStoreError::Unavailable("store offline".to_string()))
    }

    fn fetch(&self, _id: &SessionId) -> Result<Option<SessionRecord>, SessionStoreError> {
        Err(SessionStoreError::Unavailable("store offline".to_string()))
    }

    fn remove(&self, _id: &SessionId) -> Result<(), SessionStoreError> {
        Err(SessionStoreError::Unavailable("store offline".to_string()))
    }
}

/// Identity double that accepts any submitted credentials.
#[derive(Default)]
pub(super) struct AcceptingIdentity;

impl IdentityProvider for AcceptingIdentity {
    fn authenticate(&self, request: &SignInRequest) -> Result<AccountIdentity, IdentityError> {
        Ok(AccountIdentity {
            account_id: format!("acct-{}", request.email),
            display_name: "Casey Creator".to_string(),
            email: request.email.clone(),
        })
    }
}

/// Identity double that rejects every submission.
pub(super) struct RejectingIdentity;

impl IdentityProvider for RejectingIdentity {
    fn authenticate(&self, _request: &SignInRequest) -> Result<AccountIdentity, IdentityError> {
        Err(IdentityError::InvalidCredentials)
    }
}

pub(super) fn sign_in_request() -> SignInRequest {
    SignInRequest {
        email: "casey@example.com".to_string(),
        password: "correct-horse-battery".to_string(),
    }
}

pub(super) fn connect_request() -> ConnectPlatformRequest {
    ConnectPlatformRequest {
        platform: RevenuePlatform::Patreon,
    }
}

pub(super) fn build_service() -> (
    Arc<OnboardingService<MemorySessionStore, AcceptingIdentity>>,
    MemorySessionStore,
) {
    let store = MemorySessionStore::default();
    let service = Arc::new(OnboardingService::new(
        Arc::new(store.clone()),
        Arc::new(AcceptingIdentity),
    ));
    (service, store)
}
