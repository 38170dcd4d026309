//! State snapshots
//!
//! The core keeps everything in memory; a host application that wants
//! durability serializes a snapshot and stores the JSON itself. A snapshot
//! carries a SHA-256 hash of its canonical JSON so the host can detect
//! corruption or tampering on load.
//!
//! # Critical Invariants
//!
//! - **Capacity**: no room in a snapshot has `occupied > capacity`.
//! - **Referential integrity**: every payment and receipt references an
//!   invoice that exists; every allocated request references a room that
//!   exists.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::events::EventLog;
use crate::models::state::{FinanceLedger, HostelState};

/// Errors raised while saving or loading snapshots
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("State hash mismatch: expected {expected}, got {actual}")]
    HashMismatch { expected: String, actual: String },

    #[error("State validation failed: {0}")]
    Validation(String),
}

/// Complete portal state snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalSnapshot {
    /// Hostel blocks and allocation requests
    pub hostel: HostelState,

    /// Invoices, payments, intents, receipts and expenses
    pub ledger: FinanceLedger,

    /// Audit trail up to the snapshot point
    pub events: EventLog,

    /// SHA-256 over the canonical JSON of the three fields above
    pub state_hash: String,
}

/// SHA-256 of the canonical JSON of a serializable value.
///
/// Object keys are sorted recursively so HashMap iteration order cannot
/// change the hash.
pub fn compute_state_hash<T: Serialize>(value: &T) -> Result<String, SnapshotError> {
    use serde_json::Value;
    use std::collections::BTreeMap;

    let value = serde_json::to_value(value)
        .map_err(|e| SnapshotError::Serialization(e.to_string()))?;

    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    let json = serde_json::to_string(&canonicalize(value))
        .map_err(|e| SnapshotError::Serialization(e.to_string()))?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

#[derive(Serialize)]
struct HashInput<'a> {
    hostel: &'a HostelState,
    ledger: &'a FinanceLedger,
    events: &'a EventLog,
}

/// Capture a snapshot of the full portal state.
pub fn save_snapshot(
    hostel: &HostelState,
    ledger: &FinanceLedger,
    events: &EventLog,
) -> Result<PortalSnapshot, SnapshotError> {
    let state_hash = compute_state_hash(&HashInput {
        hostel,
        ledger,
        events,
    })?;
    Ok(PortalSnapshot {
        hostel: hostel.clone(),
        ledger: ledger.clone(),
        events: events.clone(),
        state_hash,
    })
}

/// Serialize a snapshot to a JSON string.
pub fn to_json(snapshot: &PortalSnapshot) -> Result<String, SnapshotError> {
    serde_json::to_string(snapshot).map_err(|e| SnapshotError::Serialization(e.to_string()))
}

/// Load a snapshot from JSON, verifying the state hash and invariants.
pub fn from_json(json: &str) -> Result<PortalSnapshot, SnapshotError> {
    let snapshot: PortalSnapshot =
        serde_json::from_str(json).map_err(|e| SnapshotError::Serialization(e.to_string()))?;

    let actual = compute_state_hash(&HashInput {
        hostel: &snapshot.hostel,
        ledger: &snapshot.ledger,
        events: &snapshot.events,
    })?;
    if actual != snapshot.state_hash {
        return Err(SnapshotError::HashMismatch {
            expected: snapshot.state_hash,
            actual,
        });
    }

    validate_snapshot(&snapshot)?;
    Ok(snapshot)
}

/// Check the snapshot's structural invariants.
pub fn validate_snapshot(snapshot: &PortalSnapshot) -> Result<(), SnapshotError> {
    // 1. Room capacity
    for block in snapshot.hostel.blocks() {
        for room in block.rooms() {
            if room.occupied() > room.capacity() {
                return Err(SnapshotError::Validation(format!(
                    "room {} occupied {} exceeds capacity {}",
                    room.id(),
                    room.occupied(),
                    room.capacity()
                )));
            }
        }
    }

    // 2. Allocated requests point at existing rooms
    for request in snapshot.hostel.requests() {
        if let Some((block_id, room_id)) = request.assigned_room() {
            let room_exists = snapshot
                .hostel
                .get_block(block_id)
                .map(|b| b.get_room(room_id).is_some())
                .unwrap_or(false);
            if !room_exists {
                return Err(SnapshotError::Validation(format!(
                    "request {} assigned to unknown room {}/{}",
                    request.id(),
                    block_id,
                    room_id
                )));
            }
        }
    }

    // 3. Payments and receipts point at existing invoices
    for payment in snapshot.ledger.payments() {
        if snapshot.ledger.get_invoice(payment.invoice_id()).is_none() {
            return Err(SnapshotError::Validation(format!(
                "payment {} references unknown invoice {}",
                payment.id(),
                payment.invoice_id()
            )));
        }
    }
    for receipt in snapshot.ledger.receipts() {
        if snapshot.ledger.get_invoice(receipt.invoice_id()).is_none() {
            return Err(SnapshotError::Validation(format!(
                "receipt {} references unknown invoice {}",
                receipt.id(),
                receipt.invoice_id()
            )));
        }
        if snapshot.ledger.get_payment(receipt.payment_id()).is_none() {
            return Err(SnapshotError::Validation(format!(
                "receipt {} references unknown payment {}",
                receipt.id(),
                receipt.payment_id()
            )));
        }
    }

    Ok(())
}
