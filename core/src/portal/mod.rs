//! Student-facing finance portal boundary
//!
//! `StudentPortalFinanceApi` is the wire surface a host application talks
//! to: list my invoices and payments, create a payment intent, confirm it.
//! The core must work against either a real backend implementing this trait
//! or the in-memory fallback (`InMemoryPortal`) shipped here.
//!
//! Response shapes mirror the wire contract: `confirm_payment` reports a
//! decline in the response (`status: Failed` plus a message) rather than as
//! an error, because a declined card is an expected outcome the portal UI
//! renders, not a fault. Validation and lookup failures do surface as
//! `FinanceError`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::events::EventLog;
use crate::finance::gateway::MockGateway;
use crate::finance::{confirm_payment, initiate_payment, reconcile, FinanceError};
use crate::models::invoice::{Invoice, InvoiceStatus};
use crate::models::payment::{Payment, PaymentIntent, PaymentMethod, Receipt};
use crate::models::state::FinanceLedger;

/// Request to create a payment intent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePaymentIntentInput {
    pub invoice_id: String,
    pub amount: i64,
    pub payment_method: PaymentMethod,
}

/// Request to confirm (settle) an intent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmPaymentInput {
    pub intent_id: String,
    pub payment_method: PaymentMethod,
    pub reference: String,
    /// Channel-specific fields, opaque to the core
    pub payload: HashMap<String, String>,
}

/// Terminal outcome reported by `confirm_payment`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfirmPaymentStatus {
    Successful,
    Failed,
}

/// Wire response of `confirm_payment`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmPaymentResponse {
    pub status: ConfirmPaymentStatus,
    pub payment: Option<Payment>,
    pub receipt: Option<Receipt>,
    pub message: Option<String>,
}

/// An invoice together with its ledger-derived balance and status.
///
/// The derivation happens at read time inside the portal so callers never
/// see a stale status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceView {
    pub invoice: Invoice,
    pub balance: i64,
    pub status: InvoiceStatus,
}

/// The student portal's finance surface.
pub trait StudentPortalFinanceApi {
    /// All invoices billed to the student, with derived balance/status.
    fn get_my_invoices(&self, student_id: &str) -> Vec<InvoiceView>;

    /// All ledger entries (posted and reversed) on the student's invoices.
    fn get_my_payments(&self, student_id: &str) -> Vec<Payment>;

    /// Validate and create an intent. No ledger side effects.
    fn create_payment_intent(
        &mut self,
        input: CreatePaymentIntentInput,
    ) -> Result<PaymentIntent, FinanceError>;

    /// Settle an intent. Declines come back in the response; validation and
    /// lookup failures come back as errors.
    fn confirm_payment(
        &mut self,
        input: ConfirmPaymentInput,
    ) -> Result<ConfirmPaymentResponse, FinanceError>;
}

/// In-memory portal: owns the ledger, a mock gateway and the audit log.
///
/// Timestamps come from an internal monotonic counter advanced once per
/// state-changing call, so runs are reproducible.
///
/// # Example
///
/// ```rust
/// use school_portal_core_rs::portal::{
///     CreatePaymentIntentInput, InMemoryPortal, StudentPortalFinanceApi,
/// };
/// use school_portal_core_rs::{Invoice, InvoiceItem, PaymentMethod};
///
/// let mut portal = InMemoryPortal::new();
/// let invoice_id = portal.add_invoice(Invoice::new(
///     "STU-001".to_string(),
///     "2025/2026".to_string(),
///     vec![InvoiceItem {
///         fee_structure_id: "FEE-1".to_string(),
///         description: "Tuition".to_string(),
///         amount: 200_000,
///     }],
///     0,
/// ));
///
/// let intent = portal
///     .create_payment_intent(CreatePaymentIntentInput {
///         invoice_id,
///         amount: 100_000,
///         payment_method: PaymentMethod::Transfer,
///     })
///     .unwrap();
/// # let _ = intent;
/// ```
#[derive(Debug, Default)]
pub struct InMemoryPortal {
    ledger: FinanceLedger,
    gateway: MockGateway,
    log: EventLog,
    clock_ms: u64,
}

impl InMemoryPortal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Portal whose gateway declines everything; useful for exercising the
    /// failure path end to end.
    pub fn with_declining_gateway(reason: &str) -> Self {
        Self {
            gateway: MockGateway::declining(reason),
            ..Self::default()
        }
    }

    /// Register an invoice and return its id.
    pub fn add_invoice(&mut self, invoice: Invoice) -> String {
        let id = invoice.id().to_string();
        self.ledger.add_invoice(invoice);
        id
    }

    pub fn ledger(&self) -> &FinanceLedger {
        &self.ledger
    }

    pub fn events(&self) -> &EventLog {
        &self.log
    }

    fn tick(&mut self) -> u64 {
        self.clock_ms += 1;
        self.clock_ms
    }
}

impl StudentPortalFinanceApi for InMemoryPortal {
    fn get_my_invoices(&self, student_id: &str) -> Vec<InvoiceView> {
        let mut invoices = self.ledger.invoices_for_student(student_id);
        invoices.sort_by_key(|i| (i.created_at(), i.id().to_string()));
        invoices
            .into_iter()
            .map(|invoice| InvoiceView {
                balance: reconcile::balance(&self.ledger, invoice),
                status: reconcile::derive_status(&self.ledger, invoice),
                invoice: invoice.clone(),
            })
            .collect()
    }

    fn get_my_payments(&self, student_id: &str) -> Vec<Payment> {
        let invoice_ids: Vec<&str> = self
            .ledger
            .invoices_for_student(student_id)
            .iter()
            .map(|i| i.id())
            .collect();
        self.ledger
            .payments()
            .iter()
            .filter(|p| invoice_ids.contains(&p.invoice_id()))
            .cloned()
            .collect()
    }

    fn create_payment_intent(
        &mut self,
        input: CreatePaymentIntentInput,
    ) -> Result<PaymentIntent, FinanceError> {
        let now = self.tick();
        initiate_payment(
            &mut self.ledger,
            &mut self.log,
            &input.invoice_id,
            input.amount,
            input.payment_method,
            now,
        )
    }

    fn confirm_payment(
        &mut self,
        input: ConfirmPaymentInput,
    ) -> Result<ConfirmPaymentResponse, FinanceError> {
        let now = self.tick();
        match confirm_payment(
            &mut self.ledger,
            &mut self.gateway,
            &mut self.log,
            &input.intent_id,
            &input.payload,
            now,
        ) {
            Ok(outcome) => Ok(ConfirmPaymentResponse {
                status: ConfirmPaymentStatus::Successful,
                payment: self.ledger.get_payment(&outcome.payment_id).cloned(),
                receipt: self.ledger.get_receipt(&outcome.receipt_id).cloned(),
                message: None,
            }),
            Err(FinanceError::PaymentFailed { reason }) => Ok(ConfirmPaymentResponse {
                status: ConfirmPaymentStatus::Failed,
                payment: None,
                receipt: None,
                message: Some(reason),
            }),
            Err(other) => Err(other),
        }
    }
}
