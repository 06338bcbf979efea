use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

use super::domain::{
    AccessDecision, ConnectPlatformRequest, FunnelStep, SessionFlags, SessionId, SessionRecord,
    SignInRequest,
};
use super::guard::FunnelGuard;
use super::session::{IdentityError, IdentityProvider, SessionStore, SessionStoreError};

/// Service composing the identity provider, session store, and funnel guard.
pub struct OnboardingService<S, I> {
    sessions: Arc<S>,
    identity: Arc<I>,
    guard: FunnelGuard,
}

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("sess-{id:06}"))
}

impl<S, I> OnboardingService<S, I>
where
    S: SessionStore + 'static,
    I: IdentityProvider + 'static,
{
    pub fn new(sessions: Arc<S>, identity: Arc<I>) -> Self {
        Self {
            sessions,
            identity,
            guard: FunnelGuard::standard(),
        }
    }

    /// Authenticate a lead and open a session positioned on the connect page.
    pub fn sign_in(&self, request: SignInRequest) -> Result<SessionRecord, OnboardingError> {
        let account = self.identity.authenticate(&request)?;

        let record = SessionRecord {
            session_id: next_session_id(),
            account,
            flags: SessionFlags {
                authenticated: true,
                revenue_platform_connected: false,
            },
            current_step: FunnelStep::ConnectPlatform,
            connected_platform: None,
            started_at: Utc::now(),
        };

        let stored = self.sessions.insert(record)?;
        Ok(stored)
    }

    pub fn session(&self, id: &SessionId) -> Result<SessionRecord, OnboardingError> {
        let record = self
            .sessions
            .fetch(id)?
            .ok_or(SessionStoreError::NotFound)?;
        Ok(record)
    }

    /// Link a revenue platform and land the session on the processing page.
    pub fn connect_platform(
        &self,
        id: &SessionId,
        request: ConnectPlatformRequest,
    ) -> Result<SessionRecord, OnboardingError> {
        let mut record = self.session(id)?;

        if let AccessDecision::Redirect { to } =
            self.guard.check(FunnelStep::ConnectPlatform, &record.flags)
        {
            record.current_step = to;
            self.sessions.update(record)?;
            return Err(OnboardingError::AccessDenied { redirect_to: to });
        }

        record.flags.revenue_platform_connected = true;
        record.connected_platform = Some(request.platform);
        record.current_step = FunnelStep::Processing;
        self.sessions.update(record.clone())?;
        Ok(record)
    }

    /// Page-mount guard: re-evaluated on every call, so flag revocations
    /// mid-session immediately change the decision.
    pub fn check_access(
        &self,
        id: &SessionId,
        step: FunnelStep,
    ) -> Result<AccessDecision, OnboardingError> {
        let record = self.session(id)?;
        Ok(self.guard.check(step, &record.flags))
    }

    /// Move the session to a page. Backward navigation is always permitted;
    /// forward movement is limited to the next page and passes through the
    /// guard, which may bounce the session back to the earliest unmet
    /// prerequisite instead.
    pub fn navigate(
        &self,
        id: &SessionId,
        to: FunnelStep,
    ) -> Result<SessionRecord, OnboardingError> {
        let record = self.session(id)?;
        self.apply_navigation(record, to)
    }

    /// The "continue" action: advance one page forward.
    pub fn advance(&self, id: &SessionId) -> Result<SessionRecord, OnboardingError> {
        let record = self.session(id)?;
        let next = record
            .current_step
            .next()
            .ok_or(OnboardingError::FunnelComplete)?;
        self.apply_navigation(record, next)
    }

    /// Revoke the platform connection, then re-run the guard against the page
    /// the session sits on and apply any redirect.
    pub fn disconnect_platform(&self, id: &SessionId) -> Result<SessionRecord, OnboardingError> {
        let mut record = self.session(id)?;

        record.flags.revenue_platform_connected = false;
        record.connected_platform = None;

        if let AccessDecision::Redirect { to } =
            self.guard.check(record.current_step, &record.flags)
        {
            record.current_step = to;
        }

        self.sessions.update(record.clone())?;
        Ok(record)
    }

    /// Teardown: clear every flag and drop the session.
    pub fn sign_out(&self, id: &SessionId) -> Result<(), OnboardingError> {
        let mut record = self.session(id)?;
        record.flags.clear();
        self.sessions.remove(id)?;
        Ok(())
    }

    fn apply_navigation(
        &self,
        mut record: SessionRecord,
        to: FunnelStep,
    ) -> Result<SessionRecord, OnboardingError> {
        if let Some(next) = record.current_step.next() {
            if to > next {
                return Err(OnboardingError::SkipAhead {
                    attempted: to,
                    current: record.current_step,
                });
            }
        } else if to > record.current_step {
            return Err(OnboardingError::FunnelComplete);
        }

        record.current_step = match self.guard.check(to, &record.flags) {
            AccessDecision::Allow => to,
            AccessDecision::Redirect { to: entry_point } => entry_point,
        };

        self.sessions.update(record.clone())?;
        Ok(record)
    }
}

/// Error raised by the onboarding service.
#[derive(Debug, thiserror::Error)]
pub enum OnboardingError {
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    Store(#[from] SessionStoreError),
    #[error("prerequisites unmet, redirect to {}", redirect_to.slug())]
    AccessDenied { redirect_to: FunnelStep },
    #[error("cannot skip ahead to {} from {}", attempted.slug(), current.slug())]
    SkipAhead {
        attempted: FunnelStep,
        current: FunnelStep,
    },
    #[error("the funnel is complete; no further step exists")]
    FunnelComplete,
}
