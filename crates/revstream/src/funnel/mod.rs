//! Onboarding funnel: guarded navigation, session lifecycle, and the HTTP
//! surface the funnel pages drive.
//!
//! The guard is a pure decision over session flags; the service owns the
//! session lifecycle behind explicit store and identity seams so nothing in
//! the funnel reaches for ambient global state.

pub mod domain;
pub mod guard;
pub mod router;
pub mod service;
pub mod session;

#[cfg(test)]
mod tests;

pub use domain::{
    AccessDecision, AccountIdentity, ConnectPlatformRequest, FunnelStep, RevenuePlatform,
    SessionFlag, SessionFlags, SessionId, SessionRecord, SessionView, SignInRequest,
};
pub use guard::{FunnelGuard, Prerequisite};
pub use router::funnel_router;
pub use service::{OnboardingError, OnboardingService};
pub use session::{IdentityError, IdentityProvider, SessionStore, SessionStoreError};
