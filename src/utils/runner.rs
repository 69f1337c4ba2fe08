// src/utils/runner.rs
//
// Profile orchestration for the renewal client

use crate::{
    config::{PortalConfig, Profile},
    error::RunError,
    session::auth::Session,
    session::renewal::RenewalOutcome,
};
use std::fmt;
use tracing::{info, info_span, warn, Instrument, Span};

/// Tally of what happened during a run that reached its end.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub profiles: usize,
    pub auth_failures: usize,
    pub renewed: usize,
    pub too_early: usize,
    pub malformed: usize,
    pub transport_errors: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: &RenewalOutcome) {
        match outcome {
            RenewalOutcome::Renewed => self.renewed += 1,
            RenewalOutcome::TooEarly => self.too_early += 1,
            RenewalOutcome::MalformedResponse { .. } => self.malformed += 1,
            RenewalOutcome::TransportError(_) => self.transport_errors += 1,
            RenewalOutcome::UnrecognizedMessage(_) => {}
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"profiles\":{},\"auth_failures\":{},\"renewed\":{},\"too_early\":{},\"malformed\":{},\"transport_errors\":{}}}",
            self.profiles,
            self.auth_failures,
            self.renewed,
            self.too_early,
            self.malformed,
            self.transport_errors
        )
    }
}

/// Logs in with one profile and renews each of its machines in order.
///
/// The profile gets its own [`Session`], dropped before this returns whichever
/// way it returns. A failed login skips the profile and is not an error.
///
/// # Errors
///
/// * `RunError::UnrecognizedMessage` - The portal answered a renewal with a
///   message that is neither success nor too-early. Remaining machines are not
///   attempted.
/// * `RunError::Client` - The HTTP client could not be built.
pub async fn run_profile(
    config: &PortalConfig,
    profile: &Profile,
    summary: &mut RunSummary,
) -> Result<(), RunError> {
    let span = info_span!("profile", username = %profile.username);
    process_profile(config, profile, &span, summary)
        .instrument(span.clone())
        .await
}

async fn process_profile(
    config: &PortalConfig,
    profile: &Profile,
    span: &Span,
    summary: &mut RunSummary,
) -> Result<(), RunError> {
    info!("🔑 Processing user: {}", profile.username);
    summary.profiles += 1;

    let session = Session::new(config, span.clone())?;
    let session = match session
        .authenticate(&profile.username, &profile.password)
        .await
    {
        Ok(session) => session,
        Err(_) => {
            warn!(
                "Skipping {} machine(s) of {}",
                profile.machine_ids.len(),
                profile.username
            );
            summary.auth_failures += 1;
            return Ok(());
        }
    };

    for &machine_id in &profile.machine_ids {
        match session.renew_machine(machine_id).await {
            RenewalOutcome::UnrecognizedMessage(message) => {
                return Err(RunError::UnrecognizedMessage {
                    machine_id,
                    message,
                });
            }
            outcome => summary.record(&outcome),
        }
    }
    Ok(())
}

/// Runs every profile one after another, stopping at the first fatal error.
pub async fn run_profiles(
    config: &PortalConfig,
    profiles: &[Profile],
) -> Result<RunSummary, RunError> {
    let mut summary = RunSummary::default();
    for profile in profiles {
        run_profile(config, profile, &mut summary).await?;
    }
    info!("Run finished: {}", summary);
    Ok(summary)
}
