//! Payment ledger models
//!
//! Three entities make up the payment side of the finance module:
//! - `Payment`: a posted (or reversed) monetary transaction against an invoice.
//!   Reversal is a soft-cancel; the entry stays in the ledger for audit.
//! - `PaymentIntent`: an in-flight, not-yet-settled payment attempt driving
//!   the Initiated -> Processing -> Successful | Failed state machine.
//! - `Receipt`: proof-of-payment issued exactly once per successful
//!   settlement, immutable once issued.
//!
//! CRITICAL: All money values are i64 (minor currency units)

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a payment was (or will be) made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    Cash,
    Transfer,
    #[serde(rename = "POS")]
    Pos,
    Online,
}

/// Ledger status of a posted payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// Counts toward the invoice balance
    Posted,

    /// Soft-cancelled; kept in the ledger but excluded from balance sums
    Reversed,
}

/// Errors raised by payment ledger entries
#[derive(Debug, Error, PartialEq)]
pub enum PaymentError {
    #[error("Payment already reversed")]
    AlreadyReversed,
}

/// A monetary transaction posted against an invoice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    /// Unique payment identifier (UUID)
    id: String,

    /// Invoice this payment settles (part of)
    invoice_id: String,

    /// Amount paid (i64 minor units, always positive)
    amount_paid: i64,

    /// Channel the money came through
    method: PaymentMethod,

    /// External transaction reference (gateway or teller reference)
    reference: String,

    /// Posted or Reversed
    status: PaymentStatus,

    /// Posting timestamp (unix millis, supplied by the caller)
    created_at: u64,
}

impl Payment {
    /// Post a new payment against an invoice
    ///
    /// # Panics
    /// Panics if `amount_paid` is not positive.
    pub fn new(
        invoice_id: String,
        amount_paid: i64,
        method: PaymentMethod,
        reference: String,
        created_at: u64,
    ) -> Self {
        assert!(amount_paid > 0, "amount must be positive");
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            invoice_id,
            amount_paid,
            method,
            reference,
            status: PaymentStatus::Posted,
            created_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn invoice_id(&self) -> &str {
        &self.invoice_id
    }

    pub fn amount_paid(&self) -> i64 {
        self.amount_paid
    }

    pub fn method(&self) -> PaymentMethod {
        self.method
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn status(&self) -> PaymentStatus {
        self.status
    }

    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    /// Whether this payment counts toward the invoice balance.
    pub fn is_posted(&self) -> bool {
        self.status == PaymentStatus::Posted
    }

    /// Soft-cancel the payment. The entry is kept for the audit trail; only
    /// its ledger status changes.
    pub(crate) fn reverse(&mut self) -> Result<(), PaymentError> {
        if self.status == PaymentStatus::Reversed {
            return Err(PaymentError::AlreadyReversed);
        }
        self.status = PaymentStatus::Reversed;
        Ok(())
    }
}

/// Lifecycle state of a payment intent.
///
/// `Successful` and `Failed` are terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntentStatus {
    /// Created and validated, settlement not yet attempted
    Initiated,

    /// Settlement in flight; guards against duplicate confirmation
    Processing,

    /// Settled; exactly one Payment and one Receipt exist for this intent
    Successful,

    /// Settlement declined; no Payment or Receipt was created
    Failed {
        /// Decline message surfaced to the caller
        reason: String,
    },
}

/// Errors raised by intent state transitions
#[derive(Debug, Error, PartialEq)]
pub enum IntentError {
    /// The intent is not in the state the transition requires. Duplicate
    /// confirmation of the same intent lands here, never in a second payment.
    #[error("Intent cannot be confirmed from its current state")]
    NotConfirmable,
}

/// An in-flight payment attempt against an invoice
///
/// Intents are cheap: until confirmed they have no effect on the invoice or
/// the payment ledger, and a failed intent is simply abandoned and replaced
/// by initiating a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// Unique intent identifier (UUID)
    id: String,

    /// Invoice being paid
    invoice_id: String,

    /// Amount to settle (i64 minor units, validated <= balance at initiation)
    amount: i64,

    /// Channel the payer chose
    method: PaymentMethod,

    /// Generated payment reference, carried onto the Payment when settled
    reference: String,

    /// Current state-machine position
    status: IntentStatus,

    /// Creation timestamp (unix millis)
    created_at: u64,

    /// Last transition timestamp (unix millis)
    updated_at: u64,
}

impl PaymentIntent {
    /// Create a new intent in the Initiated state.
    ///
    /// Amount validation against the invoice balance is the caller's job
    /// (`finance::initiate_payment`); this constructor only guards the sign.
    ///
    /// # Panics
    /// Panics if `amount` is not positive.
    pub fn new(
        invoice_id: String,
        amount: i64,
        method: PaymentMethod,
        reference: String,
        created_at: u64,
    ) -> Self {
        assert!(amount > 0, "amount must be positive");
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            invoice_id,
            amount,
            method,
            reference,
            status: IntentStatus::Initiated,
            created_at,
            updated_at: created_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn invoice_id(&self) -> &str {
        &self.invoice_id
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn method(&self) -> PaymentMethod {
        self.method
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn status(&self) -> &IntentStatus {
        &self.status
    }

    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    pub fn updated_at(&self) -> u64 {
        self.updated_at
    }

    /// Whether the intent has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.status,
            IntentStatus::Successful | IntentStatus::Failed { .. }
        )
    }

    /// Claim the intent for settlement: Initiated -> Processing.
    ///
    /// This is the concurrency guard. Any state other than Initiated is
    /// rejected, so a duplicate confirm call can never reach settlement.
    pub(crate) fn begin_processing(&mut self, now_ms: u64) -> Result<(), IntentError> {
        if self.status != IntentStatus::Initiated {
            return Err(IntentError::NotConfirmable);
        }
        self.status = IntentStatus::Processing;
        self.updated_at = now_ms;
        Ok(())
    }

    /// Processing -> Successful. Only valid while Processing.
    pub(crate) fn mark_successful(&mut self, now_ms: u64) -> Result<(), IntentError> {
        if self.status != IntentStatus::Processing {
            return Err(IntentError::NotConfirmable);
        }
        self.status = IntentStatus::Successful;
        self.updated_at = now_ms;
        Ok(())
    }

    /// Processing -> Failed. Only valid while Processing.
    pub(crate) fn mark_failed(&mut self, reason: String, now_ms: u64) -> Result<(), IntentError> {
        if self.status != IntentStatus::Processing {
            return Err(IntentError::NotConfirmable);
        }
        self.status = IntentStatus::Failed { reason };
        self.updated_at = now_ms;
        Ok(())
    }
}

/// Proof-of-payment issued once per successful settlement
///
/// Immutable after issue; there are no mutators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    /// Unique receipt identifier (UUID)
    id: String,

    /// Payment this receipt evidences
    payment_id: String,

    /// Invoice the payment was posted against
    invoice_id: String,

    /// Student who paid
    student_id: String,

    /// Amount evidenced (i64 minor units)
    amount: i64,

    /// Channel used
    method: PaymentMethod,

    /// Payment reference, same as on the Payment
    reference: String,

    /// Issue timestamp (unix millis)
    issued_at: u64,
}

impl Receipt {
    pub fn new(
        payment_id: String,
        invoice_id: String,
        student_id: String,
        amount: i64,
        method: PaymentMethod,
        reference: String,
        issued_at: u64,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            payment_id,
            invoice_id,
            student_id,
            amount,
            method,
            reference,
            issued_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn payment_id(&self) -> &str {
        &self.payment_id
    }

    pub fn invoice_id(&self) -> &str {
        &self.invoice_id
    }

    pub fn student_id(&self) -> &str {
        &self.student_id
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn method(&self) -> PaymentMethod {
        self.method
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn issued_at(&self) -> u64 {
        self.issued_at
    }
}
