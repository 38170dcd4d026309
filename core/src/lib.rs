//! School Portal Core - Rust Engine
//!
//! Allocation matching and finance reconciliation for a school-management
//! portal, with explicit in-memory state and deterministic behavior.
//!
//! # Architecture
//!
//! - **models**: Domain types (blocks, rooms, requests, invoices, payments)
//! - **allocation**: Hostel auto-allocation matcher (greedy first-fit)
//! - **finance**: Invoice reconciliation and the payment-intent state machine
//! - **payroll**: Net-pay aggregation and payroll run lifecycle
//! - **portal**: StudentPortalFinanceApi boundary + in-memory fallback
//! - **events**: Append-only audit log
//! - **snapshot**: JSON state snapshots with SHA-256 integrity hashes
//!
//! # Critical Invariants
//!
//! 1. All money values are i64 (minor currency units)
//! 2. Invoice balance/status are derived from the ledger, never stored
//! 3. Room occupancy never exceeds capacity
//! 4. FFI boundary is minimal and safe

// Module declarations
pub mod allocation;
pub mod events;
pub mod finance;
pub mod models;
pub mod payroll;
pub mod portal;
pub mod snapshot;

// Re-exports for convenience
pub use allocation::{auto_allocate, manual_allocate, unallocate, AllocationError, AllocationReport, OverrideReason};
pub use events::{Event, EventLog};
pub use finance::{FinanceError, MockGateway, SettlementGateway, SettlementOutcome};
pub use models::{
    block::{BlockGenderPolicy, Gender, HostelBlock, Room, RoomGenderRestriction, RoomType},
    invoice::{Invoice, InvoiceItem, InvoiceStatus},
    payment::{
        IntentError, IntentStatus, Payment, PaymentError, PaymentIntent, PaymentMethod,
        PaymentStatus, Receipt,
    },
    request::{AllocationRequest, RequestError, RequestStatus},
    state::{FinanceLedger, HostelState},
};
pub use payroll::{
    net_pay, Expense, PayrollEntry, PayrollError, PayrollRun, RunStatus, SalaryComponent,
    SalaryStructure, StaffSalaryAssignment,
};
pub use portal::{
    ConfirmPaymentInput, ConfirmPaymentResponse, ConfirmPaymentStatus, CreatePaymentIntentInput,
    InMemoryPortal, InvoiceView, StudentPortalFinanceApi,
};
pub use snapshot::{PortalSnapshot, SnapshotError};

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn school_portal_core_rs(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<ffi::portal::PyStudentPortal>()?;
    Ok(())
}
