//! In-memory state stores
//!
//! Two independent stores back the two logic units:
//! - `HostelState`: blocks and allocation requests for the matcher.
//! - `FinanceLedger`: invoices, the payment ledger, intents, receipts and
//!   the expense list for the reconciliation engine.
//!
//! Both are plain owned values passed explicitly into the operation
//! functions; there are no module-level singletons. A host application
//! wanting persistence snapshots them (see `snapshot`) and stores the JSON
//! itself.
//!
//! # Critical Invariants
//!
//! 1. **Ordering**: blocks, rooms and requests keep insertion order; the
//!    matcher's first-fit fairness depends on it, so these are Vecs.
//! 2. **Ledger append-only**: payments are appended and soft-reversed,
//!    never removed.
//! 3. **Uniqueness**: each entity id appears exactly once in its store.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::block::HostelBlock;
use crate::models::invoice::Invoice;
use crate::models::payment::{Payment, PaymentIntent, Receipt};
use crate::models::request::AllocationRequest;
use crate::payroll::Expense;

/// Hostel-side state: blocks (with their rooms) and allocation requests.
///
/// # Example
///
/// ```rust
/// use school_portal_core_rs::{
///     AllocationRequest, BlockGenderPolicy, Gender, HostelBlock, HostelState, Room,
///     RoomGenderRestriction, RoomType,
/// };
///
/// let mut block = HostelBlock::new(
///     "Unity Hall".to_string(),
///     BlockGenderPolicy::Male,
///     "Mr. Okafor".to_string(),
/// );
/// block.add_room(Room::new(
///     "101".to_string(),
///     4,
///     RoomType::Dormitory,
///     RoomGenderRestriction::Male,
///     1,
/// ));
///
/// let mut state = HostelState::new(vec![block]);
/// state.add_request(AllocationRequest::new(
///     "STU-001".to_string(),
///     "Bayo Adeyemi".to_string(),
///     Gender::Male,
///     RoomType::Dormitory,
/// ));
/// assert_eq!(state.pending_count(), 1);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostelState {
    /// Blocks in admission order (scan order for the matcher)
    blocks: Vec<HostelBlock>,

    /// Requests in arrival order (priority order for the matcher)
    requests: Vec<AllocationRequest>,
}

impl HostelState {
    pub fn new(blocks: Vec<HostelBlock>) -> Self {
        Self {
            blocks,
            requests: Vec::new(),
        }
    }

    pub fn blocks(&self) -> &[HostelBlock] {
        &self.blocks
    }

    pub fn requests(&self) -> &[AllocationRequest] {
        &self.requests
    }

    pub fn add_block(&mut self, block: HostelBlock) {
        self.blocks.push(block);
    }

    /// Append a request, preserving arrival order.
    ///
    /// # Panics
    /// Panics if the request id already exists.
    pub fn add_request(&mut self, request: AllocationRequest) {
        assert!(
            !self.requests.iter().any(|r| r.id() == request.id()),
            "request id {} already exists",
            request.id()
        );
        self.requests.push(request);
    }

    pub fn get_block(&self, id: &str) -> Option<&HostelBlock> {
        self.blocks.iter().find(|b| b.id() == id)
    }

    pub(crate) fn get_block_mut(&mut self, id: &str) -> Option<&mut HostelBlock> {
        self.blocks.iter_mut().find(|b| b.id() == id)
    }

    pub fn get_request(&self, id: &str) -> Option<&AllocationRequest> {
        self.requests.iter().find(|r| r.id() == id)
    }

    pub(crate) fn get_request_mut(&mut self, id: &str) -> Option<&mut AllocationRequest> {
        self.requests.iter_mut().find(|r| r.id() == id)
    }

    /// Number of requests the matcher would consider (Pending or Approved).
    pub fn pending_count(&self) -> usize {
        self.requests.iter().filter(|r| r.awaiting_placement()).count()
    }
}

/// Finance-side state: invoices, payment ledger, intents, receipts, expenses.
///
/// Invoices and intents are looked up by id; payments and receipts keep
/// posting order (the ledger is the audit trail).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinanceLedger {
    /// All invoices, indexed by invoice id
    invoices: HashMap<String, Invoice>,

    /// Payment ledger in posting order (append-only, soft reversal)
    payments: Vec<Payment>,

    /// All payment intents, indexed by intent id
    intents: HashMap<String, PaymentIntent>,

    /// Issued receipts in issue order
    receipts: Vec<Receipt>,

    /// General-ledger expenses (payroll disbursements land here)
    expenses: Vec<Expense>,
}

impl FinanceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an invoice to the ledger
    ///
    /// # Panics
    /// Panics if the invoice id already exists.
    pub fn add_invoice(&mut self, invoice: Invoice) {
        let id = invoice.id().to_string();
        assert!(
            !self.invoices.contains_key(&id),
            "invoice id {} already exists",
            id
        );
        self.invoices.insert(id, invoice);
    }

    pub fn get_invoice(&self, id: &str) -> Option<&Invoice> {
        self.invoices.get(id)
    }

    pub fn invoices(&self) -> &HashMap<String, Invoice> {
        &self.invoices
    }

    /// Invoices for one student, in no particular order.
    pub fn invoices_for_student(&self, student_id: &str) -> Vec<&Invoice> {
        self.invoices
            .values()
            .filter(|i| i.student_id() == student_id)
            .collect()
    }

    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    /// Payments (posted or reversed) against one invoice, in posting order.
    pub fn payments_for_invoice(&self, invoice_id: &str) -> Vec<&Payment> {
        self.payments
            .iter()
            .filter(|p| p.invoice_id() == invoice_id)
            .collect()
    }

    pub fn get_payment(&self, id: &str) -> Option<&Payment> {
        self.payments.iter().find(|p| p.id() == id)
    }

    pub(crate) fn get_payment_mut(&mut self, id: &str) -> Option<&mut Payment> {
        self.payments.iter_mut().find(|p| p.id() == id)
    }

    pub(crate) fn append_payment(&mut self, payment: Payment) {
        self.payments.push(payment);
    }

    pub fn get_intent(&self, id: &str) -> Option<&PaymentIntent> {
        self.intents.get(id)
    }

    pub(crate) fn get_intent_mut(&mut self, id: &str) -> Option<&mut PaymentIntent> {
        self.intents.get_mut(id)
    }

    pub(crate) fn add_intent(&mut self, intent: PaymentIntent) {
        self.intents.insert(intent.id().to_string(), intent);
    }

    pub fn receipts(&self) -> &[Receipt] {
        &self.receipts
    }

    pub fn get_receipt(&self, id: &str) -> Option<&Receipt> {
        self.receipts.iter().find(|r| r.id() == id)
    }

    pub(crate) fn append_receipt(&mut self, receipt: Receipt) {
        self.receipts.push(receipt);
    }

    /// Receipts issued per intent reference; used to assert the
    /// one-receipt-per-settlement invariant in tests.
    pub fn receipts_for_invoice(&self, invoice_id: &str) -> Vec<&Receipt> {
        self.receipts
            .iter()
            .filter(|r| r.invoice_id() == invoice_id)
            .collect()
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub(crate) fn append_expense(&mut self, expense: Expense) {
        self.expenses.push(expense);
    }
}
