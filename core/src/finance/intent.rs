//! Payment initiation and confirmation
//!
//! `initiate_payment` validates and creates an intent with no ledger side
//! effects. `confirm_payment` claims the intent (the compare-and-swap guard
//! against duplicate confirmation), asks the gateway to settle, and on
//! approval posts the Payment and issues the Receipt together.

use std::collections::HashMap;

use sha2::{Digest, Sha256};

use crate::events::{Event, EventLog};
use crate::finance::gateway::SettlementGateway;
use crate::finance::reconcile;
use crate::finance::FinanceError;
use crate::models::payment::{Payment, PaymentIntent, PaymentMethod, Receipt};
use crate::models::state::FinanceLedger;

/// Ids produced by a successful settlement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementOutcome {
    pub payment_id: String,
    pub receipt_id: String,
}

/// Derive a payment reference from the invoice id and creation time.
///
/// SHA-256 over the inputs, truncated; unique per intent because a
/// v4 nonce is folded in.
fn generate_reference(invoice_id: &str, now_ms: u64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(invoice_id.as_bytes());
    hasher.update(now_ms.to_le_bytes());
    hasher.update(uuid::Uuid::new_v4().as_bytes());
    let digest = hasher.finalize();

    let mut reference = String::from("PAY-");
    for byte in digest.iter().take(6) {
        reference.push_str(&format!("{:02X}", byte));
    }
    reference
}

/// Create a payment intent against an invoice.
///
/// Validates that the invoice exists and `0 < amount <= balance` (balance
/// derived from Posted payments, so over-payment is rejected here, once and
/// for all). No Payment, Receipt or invoice change happens yet; a validation
/// failure leaves the ledger untouched.
///
/// # Example
///
/// ```rust
/// use school_portal_core_rs::{
///     finance::initiate_payment, EventLog, FinanceLedger, Invoice, InvoiceItem, IntentStatus,
///     PaymentMethod,
/// };
///
/// let mut ledger = FinanceLedger::new();
/// let invoice = Invoice::new(
///     "STU-001".to_string(),
///     "2025/2026".to_string(),
///     vec![InvoiceItem {
///         fee_structure_id: "FEE-1".to_string(),
///         description: "Tuition".to_string(),
///         amount: 200_000,
///     }],
///     0,
/// );
/// let invoice_id = invoice.id().to_string();
/// ledger.add_invoice(invoice);
///
/// let mut log = EventLog::new();
/// let intent =
///     initiate_payment(&mut ledger, &mut log, &invoice_id, 100_000, PaymentMethod::Transfer, 10)
///         .unwrap();
/// assert_eq!(*intent.status(), IntentStatus::Initiated);
/// ```
pub fn initiate_payment(
    ledger: &mut FinanceLedger,
    log: &mut EventLog,
    invoice_id: &str,
    amount: i64,
    method: PaymentMethod,
    now_ms: u64,
) -> Result<PaymentIntent, FinanceError> {
    let invoice = ledger
        .get_invoice(invoice_id)
        .ok_or_else(|| FinanceError::InvoiceNotFound(invoice_id.to_string()))?;

    if amount <= 0 {
        return Err(FinanceError::InvalidAmount { amount });
    }

    let balance = reconcile::balance(ledger, invoice);
    if amount > balance {
        return Err(FinanceError::AmountExceedsBalance { amount, balance });
    }

    let reference = generate_reference(invoice_id, now_ms);
    let intent = PaymentIntent::new(invoice_id.to_string(), amount, method, reference, now_ms);
    let returned = intent.clone();

    log.record(Event::IntentInitiated {
        at_ms: now_ms,
        intent_id: intent.id().to_string(),
        invoice_id: invoice_id.to_string(),
        amount,
    });
    ledger.add_intent(intent);

    Ok(returned)
}

/// Confirm an intent: claim it, settle through the gateway, post the result.
///
/// The claim (`Initiated -> Processing`) is a status compare-and-swap: any
/// intent not exactly Initiated is rejected before the gateway is consulted,
/// so a duplicate confirmation (double-click, retry) can never post twice.
///
/// On gateway approval, one Payment (Posted, carrying the intent's amount,
/// method and reference) and one Receipt are appended together and the
/// intent becomes Successful. On decline, the intent becomes Failed with the
/// decline reason, nothing is appended, and `PaymentFailed` is returned.
pub fn confirm_payment(
    ledger: &mut FinanceLedger,
    gateway: &mut dyn SettlementGateway,
    log: &mut EventLog,
    intent_id: &str,
    payload: &HashMap<String, String>,
    now_ms: u64,
) -> Result<SettlementOutcome, FinanceError> {
    // Read everything needed for posting before any mutation.
    let (invoice_id, amount, method, reference) = {
        let intent = ledger
            .get_intent(intent_id)
            .ok_or_else(|| FinanceError::IntentNotFound(intent_id.to_string()))?;
        (
            intent.invoice_id().to_string(),
            intent.amount(),
            intent.method(),
            intent.reference().to_string(),
        )
    };
    let student_id = ledger
        .get_invoice(&invoice_id)
        .ok_or_else(|| FinanceError::InvoiceNotFound(invoice_id.clone()))?
        .student_id()
        .to_string();

    // Claim the intent. This is the duplicate-confirmation guard.
    let decision = {
        let intent = ledger
            .get_intent_mut(intent_id)
            .expect("intent looked up above");
        intent.begin_processing(now_ms)?;
        gateway.settle(intent, payload)
    };

    match decision {
        Ok(()) => {
            let payment = Payment::new(
                invoice_id.clone(),
                amount,
                method,
                reference.clone(),
                now_ms,
            );
            let payment_id = payment.id().to_string();
            let receipt = Receipt::new(
                payment_id.clone(),
                invoice_id.clone(),
                student_id,
                amount,
                method,
                reference,
                now_ms,
            );
            let receipt_id = receipt.id().to_string();

            // Post both, then flip the intent; all three are in-memory
            // appends that cannot fail halfway.
            ledger.append_payment(payment);
            ledger.append_receipt(receipt);
            ledger
                .get_intent_mut(intent_id)
                .expect("intent looked up above")
                .mark_successful(now_ms)?;

            log.record(Event::PaymentPosted {
                at_ms: now_ms,
                intent_id: intent_id.to_string(),
                payment_id: payment_id.clone(),
                receipt_id: receipt_id.clone(),
                invoice_id,
                amount,
            });

            Ok(SettlementOutcome {
                payment_id,
                receipt_id,
            })
        }
        Err(decline) => {
            ledger
                .get_intent_mut(intent_id)
                .expect("intent looked up above")
                .mark_failed(decline.reason.clone(), now_ms)?;

            log.record(Event::SettlementDeclined {
                at_ms: now_ms,
                intent_id: intent_id.to_string(),
                invoice_id,
                reason: decline.reason.clone(),
            });

            Err(FinanceError::PaymentFailed {
                reason: decline.reason,
            })
        }
    }
}
