//! Domain models for the school portal core

pub mod block;
pub mod invoice;
pub mod payment;
pub mod request;
pub mod state;

// Re-exports
pub use block::{BlockGenderPolicy, Gender, HostelBlock, Room, RoomGenderRestriction, RoomType};
pub use invoice::{Invoice, InvoiceItem, InvoiceStatus};
pub use payment::{
    IntentError, IntentStatus, Payment, PaymentError, PaymentIntent, PaymentMethod, PaymentStatus,
    Receipt,
};
pub use request::{AllocationRequest, RequestError, RequestStatus};
pub use state::{FinanceLedger, HostelState};
