/******************************************************************************
    Author: Joaquín Béjar García
    Email: jb@taunais.com
    Date: 17/10/26
 ******************************************************************************/
use crate::constants::{renew_path, RENEWED_MESSAGE, TOO_EARLY_MESSAGE};
use crate::error::RenewError;
use crate::session::auth::AuthenticatedSession;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use tracing::{error, info, warn, Instrument};

#[derive(Debug, Serialize)]
struct RenewForm {
    month: &'static str,
    submit: &'static str,
    coupon_id: &'static str,
}

impl Default for RenewForm {
    fn default() -> Self {
        Self {
            month: "1",
            submit: "1",
            coupon_id: "0",
        }
    }
}

/// Body the portal answers a renewal with. A missing `msg` decodes as empty.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
pub struct RenewResponse {
    #[serde(default)]
    pub msg: String,
}

/// Result of one renewal attempt.
#[derive(Debug)]
pub enum RenewalOutcome {
    Renewed,
    TooEarly,
    /// The portal answered with a message we do not know. Aborts the run.
    UnrecognizedMessage(String),
    TransportError(reqwest::Error),
    MalformedResponse { body: String },
}

impl fmt::Display for RenewalOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenewalOutcome::Renewed => write!(f, "renewed"),
            RenewalOutcome::TooEarly => write!(f, "too-early"),
            RenewalOutcome::UnrecognizedMessage(_) => write!(f, "unrecognized-message"),
            RenewalOutcome::TransportError(_) => write!(f, "transport-error"),
            RenewalOutcome::MalformedResponse { .. } => write!(f, "malformed-response"),
        }
    }
}

/// Maps the portal's message onto an outcome. Only exact matches count.
pub fn classify_message(msg: &str) -> RenewalOutcome {
    match msg {
        RENEWED_MESSAGE => RenewalOutcome::Renewed,
        TOO_EARLY_MESSAGE => RenewalOutcome::TooEarly,
        other => RenewalOutcome::UnrecognizedMessage(other.to_string()),
    }
}

/// Any JSON object or `null` decodes, leaving `msg` empty when absent. Arrays,
/// bare strings and a non-string `msg` are malformed.
pub(crate) fn parse_renew_body(body: String) -> Result<RenewResponse, RenewError> {
    let decoded = serde_json::from_str::<Option<Map<String, Value>>>(&body).and_then(|object| {
        object.map_or(Ok(RenewResponse::default()), |fields| {
            serde_json::from_value(Value::Object(fields))
        })
    });
    decoded.map_err(|source| RenewError::Malformed { body, source })
}

impl AuthenticatedSession {
    /// Asks the portal to extend `machine_id` by one month.
    ///
    /// Transport and parse failures are logged and returned as outcomes; the
    /// caller decides what an unrecognized message means for the rest of the run.
    pub async fn renew_machine(&self, machine_id: u64) -> RenewalOutcome {
        async move {
            info!("🔄 Renewing server {}", machine_id);
            let outcome = match self.send_renewal(machine_id).await {
                Ok(response) => classify_message(&response.msg),
                Err(RenewError::Transport(e)) => RenewalOutcome::TransportError(e),
                Err(RenewError::Malformed { body, .. }) => {
                    RenewalOutcome::MalformedResponse { body }
                }
            };
            log_outcome(machine_id, &outcome);
            outcome
        }
        .instrument(self.span().clone())
        .await
    }

    async fn send_renewal(&self, machine_id: u64) -> Result<RenewResponse, RenewError> {
        let response = self
            .client()
            .post_form(&renew_path(machine_id), &RenewForm::default())
            .await?;
        parse_renew_body(response.body)
    }
}

fn log_outcome(machine_id: u64, outcome: &RenewalOutcome) {
    match outcome {
        RenewalOutcome::Renewed => info!("✅ Server {} renewal status: {}", machine_id, RENEWED_MESSAGE),
        RenewalOutcome::TooEarly => {
            warn!("⚠️ Server {} renewal status: {}", machine_id, TOO_EARLY_MESSAGE)
        }
        RenewalOutcome::UnrecognizedMessage(msg) => {
            error!("Check that machine id {} in FC_PROFILES is correct", machine_id);
            error!("{}", msg);
        }
        RenewalOutcome::TransportError(e) => {
            error!("❌ Renewal request for server {} failed: {}", machine_id, e)
        }
        RenewalOutcome::MalformedResponse { body } => {
            warn!("⚠️ Response for server {} is not the expected JSON, raw body:", machine_id);
            warn!("{}", body);
        }
    }
}
