//! Audit event logging
//!
//! Every state-changing operation appends an event, so an administrator can
//! reconstruct who got which bed and why an invoice balance moved. Events
//! are append-only and carry the caller-supplied timestamp of the operation
//! that produced them.

use serde::{Deserialize, Serialize};

/// A recorded state change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Matcher assigned a request to a room
    RoomAllocated {
        at_ms: u64,
        request_id: String,
        student_id: String,
        block_id: String,
        room_id: String,
    },

    /// Matcher could not place a request; it keeps awaiting placement
    AllocationFailed {
        at_ms: u64,
        request_id: String,
        student_id: String,
    },

    /// Administrator assigned a room by hand
    ManualAllocation {
        at_ms: u64,
        request_id: String,
        block_id: String,
        room_id: String,
        /// Present when gender/type constraints were bypassed
        override_reason: Option<String>,
    },

    /// An allocation was withdrawn and the bed freed
    Unallocated {
        at_ms: u64,
        request_id: String,
        block_id: String,
        room_id: String,
    },

    /// Payment intent created
    IntentInitiated {
        at_ms: u64,
        intent_id: String,
        invoice_id: String,
        amount: i64,
    },

    /// Settlement succeeded; payment posted and receipt issued
    PaymentPosted {
        at_ms: u64,
        intent_id: String,
        payment_id: String,
        receipt_id: String,
        invoice_id: String,
        amount: i64,
    },

    /// Settlement declined; intent failed, nothing posted
    SettlementDeclined {
        at_ms: u64,
        intent_id: String,
        invoice_id: String,
        reason: String,
    },

    /// A posted payment was soft-reversed
    PaymentReversed {
        at_ms: u64,
        payment_id: String,
        invoice_id: String,
        amount: i64,
    },

    /// A payroll run was disbursed and its expense posted
    PayrollDisbursed {
        at_ms: u64,
        run_id: String,
        total_net_pay: i64,
    },
}

impl Event {
    /// Timestamp of the operation that produced this event.
    pub fn at_ms(&self) -> u64 {
        match self {
            Event::RoomAllocated { at_ms, .. }
            | Event::AllocationFailed { at_ms, .. }
            | Event::ManualAllocation { at_ms, .. }
            | Event::Unallocated { at_ms, .. }
            | Event::IntentInitiated { at_ms, .. }
            | Event::PaymentPosted { at_ms, .. }
            | Event::SettlementDeclined { at_ms, .. }
            | Event::PaymentReversed { at_ms, .. }
            | Event::PayrollDisbursed { at_ms, .. } => *at_ms,
        }
    }
}

/// Append-only event log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
