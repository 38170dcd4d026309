//! Invoice model
//!
//! A billable record of fee items owed by a student for a session.
//!
//! The invoice itself never stores a balance or a status. Both are derived
//! from the payment ledger on every read (see `finance::reconcile`), so they
//! cannot drift from the payments actually posted.
//!
//! CRITICAL: All money values are i64 (minor currency units)

use serde::{Deserialize, Serialize};

/// Derived settlement state of an invoice.
///
/// Never stored on the invoice; recomputed from Posted payments on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceStatus {
    Unpaid,
    PartiallyPaid,
    Paid,
}

/// One billed fee line on an invoice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceItem {
    /// Fee structure the line was billed from
    pub fee_structure_id: String,

    /// Human-facing description, e.g. "Tuition - First Term"
    pub description: String,

    /// Amount billed (i64 minor units)
    pub amount: i64,
}

/// A student's fee invoice for one session
///
/// `total_amount` is fixed at creation as the sum of the item amounts and is
/// never recomputed afterwards; item edits after creation are not supported.
///
/// # Example
/// ```
/// use school_portal_core_rs::{Invoice, InvoiceItem};
///
/// let invoice = Invoice::new(
///     "STU-001".to_string(),
///     "2025/2026".to_string(),
///     vec![InvoiceItem {
///         fee_structure_id: "FEE-TUITION".to_string(),
///         description: "Tuition".to_string(),
///         amount: 150_000,
///     }],
///     1_000,
/// );
/// assert_eq!(invoice.total_amount(), 150_000);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique invoice identifier (UUID)
    id: String,

    /// Billed student's id
    student_id: String,

    /// Academic session, e.g. "2025/2026"
    session: String,

    /// Billed fee lines
    items: Vec<InvoiceItem>,

    /// Sum of item amounts, fixed at creation (i64 minor units)
    total_amount: i64,

    /// Creation timestamp (unix millis, supplied by the caller)
    created_at: u64,
}

impl Invoice {
    /// Create a new invoice. The total is the sum of the item amounts.
    ///
    /// # Panics
    /// Panics if `items` is empty or any item amount is not positive.
    pub fn new(student_id: String, session: String, items: Vec<InvoiceItem>, created_at: u64) -> Self {
        assert!(!items.is_empty(), "invoice must have at least one item");
        assert!(
            items.iter().all(|i| i.amount > 0),
            "item amounts must be positive"
        );
        let total_amount = items.iter().map(|i| i.amount).sum();

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            student_id,
            session,
            items,
            total_amount,
            created_at,
        }
    }

    /// Restore an invoice with a known id (snapshot loading)
    pub fn from_snapshot(
        id: String,
        student_id: String,
        session: String,
        items: Vec<InvoiceItem>,
        total_amount: i64,
        created_at: u64,
    ) -> Self {
        Self {
            id,
            student_id,
            session,
            items,
            total_amount,
            created_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn student_id(&self) -> &str {
        &self.student_id
    }

    pub fn session(&self) -> &str {
        &self.session
    }

    pub fn items(&self) -> &[InvoiceItem] {
        &self.items
    }

    pub fn total_amount(&self) -> i64 {
        self.total_amount
    }

    pub fn created_at(&self) -> u64 {
        self.created_at
    }
}
