use super::domain::{AccessDecision, FunnelStep, SessionFlag, SessionFlags};

/// A single prerequisite: the flag that must hold and the page that grants it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prerequisite {
    pub flag: SessionFlag,
    pub entry_point: FunnelStep,
}

#[derive(Debug)]
struct StepRequirements {
    step: FunnelStep,
    prerequisites: &'static [Prerequisite],
}

const NO_PREREQUISITES: &[Prerequisite] = &[];

const AUTHENTICATED_ONLY: &[Prerequisite] = &[Prerequisite {
    flag: SessionFlag::Authenticated,
    entry_point: FunnelStep::SignIn,
}];

// Order matters: the guard redirects to the entry point of the first unmet
// prerequisite, so authentication is always checked before the connection.
const AUTHENTICATED_AND_CONNECTED: &[Prerequisite] = &[
    Prerequisite {
        flag: SessionFlag::Authenticated,
        entry_point: FunnelStep::SignIn,
    },
    Prerequisite {
        flag: SessionFlag::RevenuePlatformConnected,
        entry_point: FunnelStep::ConnectPlatform,
    },
];

/// Navigation guard for the onboarding funnel.
///
/// Each page declares an ordered list of (flag, entry point) pairs; a check
/// walks the list and redirects to the earliest unmet prerequisite's page.
/// Synchronous and side-effect free, so it can be re-evaluated on every page
/// mount and whenever session flags change.
#[derive(Debug)]
pub struct FunnelGuard {
    requirements: Vec<StepRequirements>,
}

impl FunnelGuard {
    pub fn standard() -> Self {
        let requirements = FunnelStep::ALL
            .into_iter()
            .map(|step| StepRequirements {
                step,
                prerequisites: match step {
                    FunnelStep::SignIn => NO_PREREQUISITES,
                    FunnelStep::ConnectPlatform => AUTHENTICATED_ONLY,
                    FunnelStep::Processing
                    | FunnelStep::Offers
                    | FunnelStep::EntityDetails
                    | FunnelStep::BusinessVerification
                    | FunnelStep::Contract
                    | FunnelStep::Dashboard => AUTHENTICATED_AND_CONNECTED,
                },
            })
            .collect();

        Self { requirements }
    }

    pub fn prerequisites(&self, step: FunnelStep) -> &[Prerequisite] {
        self.requirements
            .iter()
            .find(|requirements| requirements.step == step)
            .map(|requirements| requirements.prerequisites)
            .unwrap_or(NO_PREREQUISITES)
    }

    /// Evaluate a page's prerequisites against the session flags.
    pub fn check(&self, step: FunnelStep, flags: &SessionFlags) -> AccessDecision {
        for prerequisite in self.prerequisites(step) {
            if !flags.satisfies(prerequisite.flag) {
                return AccessDecision::Redirect {
                    to: prerequisite.entry_point,
                };
            }
        }
        AccessDecision::Allow
    }
}
