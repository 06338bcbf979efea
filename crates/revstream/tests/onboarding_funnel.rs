//! End-to-end onboarding scenarios exercised through the public service
//! facade, using in-memory doubles for the store and identity seams.

mod common {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use revstream::funnel::{
        AccountIdentity, IdentityError, IdentityProvider, OnboardingService, SessionId,
        SessionRecord, SessionStore, SessionStoreError, SignInRequest,
    };

    #[derive(Default, Clone)]
    pub struct MemorySessionStore {
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

    pub struct DemoIdentity;

    impl IdentityProvider for DemoIdentity {
        fn authenticate(&self, request: &SignInRequest) -> Result<AccountIdentity, IdentityError> {
            if request.email.trim().is_empty() || request.password.is_empty() {
                return Err(IdentityError::InvalidCredentials);
            }
            Ok(AccountIdentity {
                account_id: "acct-000001".to_string(),
                display_name: "Casey Creator".to_string(),
                email: request.email.clone(),
            })
        }
    }

    pub fn service() -> OnboardingService<MemorySessionStore, DemoIdentity> {
        OnboardingService::new(Arc::new(MemorySessionStore::default()), Arc::new(DemoIdentity))
    }

    pub fn sign_in_request() -> SignInRequest {
        SignInRequest {
            email: "casey@example.com".to_string(),
            password: "correct-horse-battery".to_string(),
        }
    }
}

use common::{service, sign_in_request};
use revstream::funnel::{
    AccessDecision, ConnectPlatformRequest, FunnelStep, OnboardingError, RevenuePlatform,
};

#[test]
fn a_lead_walks_the_funnel_from_sign_in_to_dashboard() {
    let service = service();

    let record = service.sign_in(sign_in_request()).expect("sign-in succeeds");
    let id = record.session_id.clone();
    assert_eq!(record.current_step, FunnelStep::ConnectPlatform);

    let record = service
        .connect_platform(
            &id,
            ConnectPlatformRequest {
                platform: RevenuePlatform::Substack,
            },
        )
        .expect("connect succeeds");
    assert_eq!(record.current_step, FunnelStep::Processing);
    assert_eq!(record.connected_platform, Some(RevenuePlatform::Substack));

    let mut current = record.current_step;
    while !current.is_terminal() {
        current = service.advance(&id).expect("advance succeeds").current_step;
    }
    assert_eq!(current, FunnelStep::Dashboard);
}

#[test]
fn revoking_the_connection_mid_session_redirects_protected_pages() {
    let service = service();
    let record = service.sign_in(sign_in_request()).expect("sign-in succeeds");
    let id = record.session_id.clone();

    service
        .connect_platform(
            &id,
            ConnectPlatformRequest {
                platform: RevenuePlatform::Patreon,
            },
        )
        .expect("connect succeeds");

    let decision = service
        .check_access(&id, FunnelStep::Dashboard)
        .expect("check succeeds");
    assert_eq!(decision, AccessDecision::Allow);

    let record = service.disconnect_platform(&id).expect("disconnect succeeds");
    assert_eq!(record.current_step, FunnelStep::ConnectPlatform);

    for step in [
        FunnelStep::Processing,
        FunnelStep::Offers,
        FunnelStep::EntityDetails,
        FunnelStep::BusinessVerification,
        FunnelStep::Contract,
        FunnelStep::Dashboard,
    ] {
        let decision = service.check_access(&id, step).expect("check succeeds");
        assert_eq!(
            decision,
            AccessDecision::Redirect {
                to: FunnelStep::ConnectPlatform
            },
            "{} must bounce to the connect page after revocation",
            step.slug()
        );
    }
}

#[test]
fn signed_out_sessions_are_gone() {
    let service = service();
    let record = service.sign_in(sign_in_request()).expect("sign-in succeeds");
    let id = record.session_id.clone();

    service.sign_out(&id).expect("sign-out succeeds");

    let result = service.check_access(&id, FunnelStep::Dashboard);
    assert!(matches!(result, Err(OnboardingError::Store(_))));
}
