use crate::infra::{InMemorySessionStore, MockIdentityProvider};
use clap::Args;
use std::sync::Arc;
use revstream::error::AppError;
use revstream::funnel::{
    AccessDecision, ConnectPlatformRequest, FunnelStep, OnboardingService, RevenuePlatform,
    SignInRequest,
};
use revstream::pricing::{advance_offer, property_manager_commission, REPAYMENT_STEP};

#[derive(Args, Debug)]
pub(crate) struct QuoteArgs {
    /// Total repayment the slider selected, in whole currency units
    #[arg(long)]
    pub(crate) total_repayment: u64,
}

#[derive(Args, Debug)]
pub(crate) struct CommissionArgs {
    /// Monthly rent collected on the managed unit
    #[arg(long)]
    pub(crate) monthly_rent: u64,
    /// Number of months under management
    #[arg(long)]
    pub(crate) term_months: u8,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Revenue platform to link during the funnel walk (patreon, substack, twitch, stripe)
    #[arg(long, value_parser = crate::infra::parse_platform)]
    pub(crate) platform: Option<RevenuePlatform>,
    /// Skip the onboarding funnel portion of the demo
    #[arg(long)]
    pub(crate) skip_funnel: bool,
}

pub(crate) fn run_offer_quote(args: QuoteArgs) -> Result<(), AppError> {
    let offer = advance_offer(args.total_repayment);
    println!("Advance quote");
    println!("- total repayment: {}", offer.total_repayment);
    println!("- term: {} months at {}", offer.term_months, offer.fee_rate);
    println!("- fee: {}", offer.fee);
    println!("- advance today: {}", offer.advance_amount);
    Ok(())
}

pub(crate) fn run_commission_quote(args: CommissionArgs) -> Result<(), AppError> {
    let quote = property_manager_commission(args.monthly_rent, args.term_months);
    println!("Property manager commission quote");
    println!(
        "- rent roll: {} per month over {} months",
        quote.monthly_rent, quote.term_months
    );
    println!("- commission rate: {}", quote.commission_rate);
    println!("- commission: {}", quote.commission);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        platform,
        skip_funnel,
    } = args;
    let platform = platform.unwrap_or(RevenuePlatform::Patreon);

    println!("Revstream Capital demo");

    println!("\nAdvance ladder (slider stops of {REPAYMENT_STEP})");
    for step in 1..=9u64 {
        let offer = advance_offer(step * REPAYMENT_STEP);
        println!(
            "  - repay {:>6} over {} months: fee {:>6} ({}), advance {:>6}",
            offer.total_repayment, offer.term_months, offer.fee, offer.fee_rate, offer.advance_amount
        );
    }

    let commission = property_manager_commission(2_500, 6);
    println!(
        "\nProperty manager variant: {} rent x {} months -> {} commission ({})",
        commission.monthly_rent, commission.term_months, commission.commission,
        commission.commission_rate
    );

    if skip_funnel {
        return Ok(());
    }

    println!("\nOnboarding funnel walk");
    let service = OnboardingService::new(
        Arc::new(InMemorySessionStore::default()),
        Arc::new(MockIdentityProvider),
    );

    let record = match service.sign_in(SignInRequest {
        email: "casey@example.com".to_string(),
        password: "correct-horse-battery".to_string(),
    }) {
        Ok(record) => record,
        Err(err) => {
            println!("  Sign-in rejected: {err}");
            return Ok(());
        }
    };
    let id = record.session_id.clone();
    println!(
        "- Signed in {} -> {} ({})",
        record.account.email,
        record.current_step.slug(),
        id.0
    );

    match service.check_access(&id, FunnelStep::Dashboard) {
        Ok(AccessDecision::Redirect { to }) => {
            println!("- Dashboard before connecting -> redirect to {}", to.slug())
        }
        Ok(AccessDecision::Allow) => println!("- Dashboard before connecting -> allowed"),
        Err(err) => println!("  Guard check unavailable: {err}"),
    }

    let record = match service.connect_platform(&id, ConnectPlatformRequest { platform }) {
        Ok(record) => record,
        Err(err) => {
            println!("  Platform connection failed: {err}");
            return Ok(());
        }
    };
    println!(
        "- Connected {} -> {}",
        platform.label(),
        record.current_step.slug()
    );

    let mut current = record.current_step;
    while !current.is_terminal() {
        match service.advance(&id) {
            Ok(record) => {
                println!("- Continue -> {}", record.current_step.slug());
                current = record.current_step;
            }
            Err(err) => {
                println!("  Advance failed: {err}");
                return Ok(());
            }
        }
    }

    match service.disconnect_platform(&id) {
        Ok(record) => println!(
            "- Revoked the platform connection -> bounced back to {}",
            record.current_step.slug()
        ),
        Err(err) => println!("  Disconnect failed: {err}"),
    }

    match service.sign_out(&id) {
        Ok(()) => println!("- Signed out; session torn down"),
        Err(err) => println!("  Sign-out failed: {err}"),
    }

    Ok(())
}
