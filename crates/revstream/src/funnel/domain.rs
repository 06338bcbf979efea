use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for onboarding sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

/// Ordered pages of the onboarding funnel. `Dashboard` is terminal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum FunnelStep {
    SignIn,
    ConnectPlatform,
    Processing,
    Offers,
    EntityDetails,
    BusinessVerification,
    Contract,
    Dashboard,
}

impl FunnelStep {
    pub const ALL: [FunnelStep; 8] = [
        FunnelStep::SignIn,
        FunnelStep::ConnectPlatform,
        FunnelStep::Processing,
        FunnelStep::Offers,
        FunnelStep::EntityDetails,
        FunnelStep::BusinessVerification,
        FunnelStep::Contract,
        FunnelStep::Dashboard,
    ];

    pub const fn slug(self) -> &'static str {
        match self {
            FunnelStep::SignIn => "sign-in",
            FunnelStep::ConnectPlatform => "connect-platform",
            FunnelStep::Processing => "processing",
            FunnelStep::Offers => "offers",
            FunnelStep::EntityDetails => "entity-details",
            FunnelStep::BusinessVerification => "business-verification",
            FunnelStep::Contract => "contract",
            FunnelStep::Dashboard => "dashboard",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|step| step.slug() == slug)
    }

    /// The next page a "continue" action leads to, if any.
    pub fn next(self) -> Option<Self> {
        let position = Self::ALL.iter().position(|step| *step == self)?;
        Self::ALL.get(position + 1).copied()
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, FunnelStep::Dashboard)
    }
}

/// Session flags the guard predicates read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionFlags {
    pub authenticated: bool,
    pub revenue_platform_connected: bool,
}

impl SessionFlags {
    pub fn satisfies(&self, flag: SessionFlag) -> bool {
        match flag {
            SessionFlag::Authenticated => self.authenticated,
            SessionFlag::RevenuePlatformConnected => self.revenue_platform_connected,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Named guard predicates over the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionFlag {
    Authenticated,
    RevenuePlatformConnected,
}

/// Revenue sources a lead can link during onboarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevenuePlatform {
    Patreon,
    Substack,
    Twitch,
    Stripe,
}

impl RevenuePlatform {
    pub const fn label(self) -> &'static str {
        match self {
            RevenuePlatform::Patreon => "Patreon",
            RevenuePlatform::Substack => "Substack",
            RevenuePlatform::Twitch => "Twitch",
            RevenuePlatform::Stripe => "Stripe",
        }
    }
}

/// Identity returned by the provider after a successful sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountIdentity {
    pub account_id: String,
    pub display_name: String,
    pub email: String,
}

/// Credentials submitted on the sign-in page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Platform selection submitted on the connect page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectPlatformRequest {
    pub platform: RevenuePlatform,
}

/// Stored session state: flags plus the page the lead currently occupies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: SessionId,
    pub account: AccountIdentity,
    pub flags: SessionFlags,
    pub current_step: FunnelStep,
    pub connected_platform: Option<RevenuePlatform>,
    pub started_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn status_view(&self) -> SessionView {
        SessionView {
            session_id: self.session_id.clone(),
            email: self.account.email.clone(),
            current_step: self.current_step,
            authenticated: self.flags.authenticated,
            revenue_platform_connected: self.flags.revenue_platform_connected,
            connected_platform: self.connected_platform,
        }
    }
}

/// Sanitized representation of a session for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub email: String,
    pub current_step: FunnelStep,
    pub authenticated: bool,
    pub revenue_platform_connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connected_platform: Option<RevenuePlatform>,
}

/// Outcome of a guard evaluation for a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "access", rename_all = "snake_case")]
pub enum AccessDecision {
    Allow,
    Redirect { to: FunnelStep },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_are_ordered_and_dashboard_is_terminal() {
        assert!(FunnelStep::SignIn < FunnelStep::Dashboard);
        assert_eq!(FunnelStep::SignIn.next(), Some(FunnelStep::ConnectPlatform));
        assert_eq!(FunnelStep::Contract.next(), Some(FunnelStep::Dashboard));
        assert_eq!(FunnelStep::Dashboard.next(), None);
        assert!(FunnelStep::Dashboard.is_terminal());
    }

    #[test]
    fn slugs_round_trip() {
        for step in FunnelStep::ALL {
            assert_eq!(FunnelStep::from_slug(step.slug()), Some(step));
        }
        assert_eq!(FunnelStep::from_slug("checkout"), None);
    }

    #[test]
    fn access_decision_serializes_with_redirect_target() {
        let allow = serde_json::to_value(AccessDecision::Allow).expect("serializes");
        assert_eq!(allow["access"], "allow");

        let redirect = serde_json::to_value(AccessDecision::Redirect {
            to: FunnelStep::SignIn,
        })
        .expect("serializes");
        assert_eq!(redirect["access"], "redirect");
        assert_eq!(redirect["to"], "sign-in");
    }
}
