//! Finance reconciliation and the payment-intent state machine
//!
//! The payment ledger is the single source of truth. Invoice balance and
//! status are derived by resumming Posted payments on every read, never
//! cached, so posting and reversing payments can never leave a stale number
//! behind.
//!
//! The intent state machine (`Initiated -> Processing -> Successful |
//! Failed`) is the only path that posts payments. Settlement is delegated to
//! a `SettlementGateway`; on approval, exactly one `Payment` and one
//! `Receipt` are created together, or on decline neither is.
//!
//! # Critical Invariants
//!
//! 1. **Balance**: `balance == max(0, total - sum of Posted payments)`.
//! 2. **Atomicity**: Payment and Receipt are created together, or not at all.
//! 3. **Terminality**: a Successful or Failed intent rejects confirmation;
//!    a second Payment/Receipt can never be produced from one intent.
//! 4. **No over-payment**: `amount <= balance` is enforced at initiation.

pub mod gateway;
pub mod intent;
pub mod reconcile;

use thiserror::Error;

use crate::models::payment::{IntentError, PaymentError};

// Re-export public API
pub use gateway::{GatewayDecline, MockGateway, SettlementGateway};
pub use intent::{confirm_payment, initiate_payment, SettlementOutcome};
pub use reconcile::{balance, derive_status, posted_total, reverse_payment};

/// Errors raised by the finance module
#[derive(Debug, Error, PartialEq)]
pub enum FinanceError {
    #[error("Invoice {0} not found")]
    InvoiceNotFound(String),

    #[error("Payment intent {0} not found")]
    IntentNotFound(String),

    #[error("Payment {0} not found")]
    PaymentNotFound(String),

    #[error("Payment amount must be positive, got {amount}")]
    InvalidAmount { amount: i64 },

    #[error("Payment amount {amount} exceeds outstanding balance {balance}")]
    AmountExceedsBalance { amount: i64, balance: i64 },

    #[error("Settlement declined: {reason}")]
    PaymentFailed { reason: String },

    #[error("Intent error: {0}")]
    Intent(#[from] IntentError),

    #[error("Payment error: {0}")]
    Payment(#[from] PaymentError),
}
