//! Settlement gateway boundary
//!
//! `confirm_payment` never decides settlement outcomes itself; it asks a
//! `SettlementGateway`. A real deployment wires an adapter for the school's
//! payment processor behind this trait. `MockGateway` is the in-memory
//! fallback: deterministic, driven entirely by the confirmation payload, so
//! tests can force either outcome.

use std::collections::HashMap;

use crate::models::payment::PaymentIntent;

/// A gateway's refusal to settle an intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayDecline {
    /// Message surfaced to the caller and stored on the failed intent
    pub reason: String,
}

/// External settlement decision point.
///
/// Implementations must be side-effect-free on the ledger: posting the
/// payment and issuing the receipt are the caller's job, and only happen
/// when `settle` returns `Ok`.
pub trait SettlementGateway {
    /// Attempt to settle the intent. `payload` carries channel-specific
    /// fields (card token, teller id, ...) opaque to the core.
    fn settle(
        &mut self,
        intent: &PaymentIntent,
        payload: &HashMap<String, String>,
    ) -> Result<(), GatewayDecline>;
}

/// Deterministic in-memory gateway.
///
/// Approves every settlement unless:
/// - the payload contains `"outcome": "decline"`, or
/// - the gateway was built with `MockGateway::declining()`.
///
/// # Example
/// ```
/// use school_portal_core_rs::finance::MockGateway;
///
/// let approving = MockGateway::new();
/// let declining = MockGateway::declining("processor offline");
/// # let _ = (approving, declining);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockGateway {
    decline_all: Option<String>,
}

impl MockGateway {
    /// Gateway that approves everything (unless the payload says otherwise).
    pub fn new() -> Self {
        Self { decline_all: None }
    }

    /// Gateway that declines everything with the given reason.
    pub fn declining(reason: &str) -> Self {
        Self {
            decline_all: Some(reason.to_string()),
        }
    }
}

impl SettlementGateway for MockGateway {
    fn settle(
        &mut self,
        _intent: &PaymentIntent,
        payload: &HashMap<String, String>,
    ) -> Result<(), GatewayDecline> {
        if let Some(reason) = &self.decline_all {
            return Err(GatewayDecline {
                reason: reason.clone(),
            });
        }
        if payload.get("outcome").map(String::as_str) == Some("decline") {
            return Err(GatewayDecline {
                reason: payload
                    .get("reason")
                    .cloned()
                    .unwrap_or_else(|| "Payment was declined".to_string()),
            });
        }
        Ok(())
    }
}
