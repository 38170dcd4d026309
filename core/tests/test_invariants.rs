//! Property tests for the binding invariants
//!
//! - Balance: `balance == max(0, total - sum of Posted payments)` after any
//!   sequence of posts and reversals.
//! - Capacity: `0 <= occupied <= capacity` for every room after any
//!   allocation sequence.
//! - Conservation: `allocated + failed == pending before` per pass, and a
//!   second pass with no state change allocates nothing.

use std::collections::HashMap;

use proptest::prelude::*;

use school_portal_core_rs::{
    allocation::auto_allocate,
    finance::{balance, confirm_payment, derive_status, initiate_payment, reverse_payment, MockGateway},
    AllocationRequest, BlockGenderPolicy, EventLog, FinanceError, FinanceLedger, Gender,
    HostelBlock, HostelState, Invoice, InvoiceItem, InvoiceStatus, PaymentMethod, Room,
    RoomGenderRestriction, RoomType,
};

#[derive(Debug, Clone)]
enum LedgerOp {
    /// Try to pay this amount through the intent flow
    Pay(i64),
    /// Reverse the n-th still-posted payment (modulo count)
    Reverse(usize),
}

fn ledger_op() -> impl Strategy<Value = LedgerOp> {
    prop_oneof![
        (1i64..=120_000).prop_map(LedgerOp::Pay),
        (0usize..8).prop_map(LedgerOp::Reverse),
    ]
}

fn gender() -> impl Strategy<Value = Gender> {
    prop_oneof![Just(Gender::Male), Just(Gender::Female)]
}

fn restriction() -> impl Strategy<Value = RoomGenderRestriction> {
    prop_oneof![
        Just(RoomGenderRestriction::Male),
        Just(RoomGenderRestriction::Female),
        Just(RoomGenderRestriction::CoEd),
    ]
}

fn room_type() -> impl Strategy<Value = RoomType> {
    prop_oneof![
        Just(RoomType::Single),
        Just(RoomType::Double),
        Just(RoomType::Dormitory),
    ]
}

fn policy() -> impl Strategy<Value = BlockGenderPolicy> {
    prop_oneof![
        Just(BlockGenderPolicy::Male),
        Just(BlockGenderPolicy::Female),
        Just(BlockGenderPolicy::Mixed),
    ]
}

proptest! {
    #[test]
    fn balance_invariant_holds_under_posts_and_reversals(
        total in 1i64..=500_000,
        ops in proptest::collection::vec(ledger_op(), 1..30),
    ) {
        let mut ledger = FinanceLedger::new();
        let mut log = EventLog::new();
        let mut gateway = MockGateway::new();

        let invoice = Invoice::new(
            "STU-001".to_string(),
            "2025/2026".to_string(),
            vec![InvoiceItem {
                fee_structure_id: "FEE-1".to_string(),
                description: "Tuition".to_string(),
                amount: total,
            }],
            0,
        );
        let invoice_id = invoice.id().to_string();
        ledger.add_invoice(invoice);

        let mut now = 0u64;
        for op in ops {
            now += 1;
            match op {
                LedgerOp::Pay(amount) => {
                    match initiate_payment(
                        &mut ledger, &mut log, &invoice_id, amount, PaymentMethod::Transfer, now,
                    ) {
                        Ok(intent) => {
                            confirm_payment(
                                &mut ledger, &mut gateway, &mut log,
                                intent.id(), &HashMap::new(), now,
                            ).unwrap();
                        }
                        Err(FinanceError::AmountExceedsBalance { .. }) => {}
                        Err(other) => panic!("unexpected initiation error: {other:?}"),
                    }
                }
                LedgerOp::Reverse(n) => {
                    let posted: Vec<String> = ledger
                        .payments_for_invoice(&invoice_id)
                        .iter()
                        .filter(|p| p.is_posted())
                        .map(|p| p.id().to_string())
                        .collect();
                    if !posted.is_empty() {
                        let target = &posted[n % posted.len()];
                        reverse_payment(&mut ledger, &mut log, target, now).unwrap();
                    }
                }
            }

            // The invariant, re-derived from scratch
            let posted_sum: i64 = ledger
                .payments_for_invoice(&invoice_id)
                .iter()
                .filter(|p| p.is_posted())
                .map(|p| p.amount_paid())
                .sum();
            let invoice = ledger.get_invoice(&invoice_id).unwrap();
            prop_assert_eq!(balance(&ledger, invoice), (total - posted_sum).max(0));
            prop_assert!(posted_sum <= total, "over-payment must be impossible");

            let status = derive_status(&ledger, invoice);
            match (posted_sum == total, posted_sum > 0) {
                (true, _) => prop_assert_eq!(status, InvoiceStatus::Paid),
                (false, true) => prop_assert_eq!(status, InvoiceStatus::PartiallyPaid),
                (false, false) => prop_assert_eq!(status, InvoiceStatus::Unpaid),
            }
        }
    }

    #[test]
    fn allocation_preserves_capacity_and_conservation(
        rooms in proptest::collection::vec((1u32..=4, restriction(), room_type()), 1..6),
        room_policy in policy(),
        requests in proptest::collection::vec((gender(), room_type()), 0..12),
    ) {
        let mut block = HostelBlock::new(
            "Block".to_string(),
            room_policy,
            "Caretaker".to_string(),
        );
        for (i, (capacity, g, t)) in rooms.iter().enumerate() {
            block.add_room(Room::new(format!("{}", 100 + i), *capacity, *t, *g, 1));
        }
        let mut state = HostelState::new(vec![block]);
        for (i, (g, t)) in requests.iter().enumerate() {
            state.add_request(AllocationRequest::new(
                format!("STU-{i}"),
                format!("Student {i}"),
                *g,
                *t,
            ));
        }

        let pending_before = state.pending_count();
        let mut log = EventLog::new();
        let report = auto_allocate(&mut state, &mut log, 0);

        prop_assert_eq!(report.allocated + report.failed, pending_before);
        for room in state.blocks()[0].rooms() {
            prop_assert!(room.occupied() <= room.capacity());
        }

        // Allocated requests point at rooms that actually accept them
        for request in state.requests() {
            if let Some((block_id, room_id)) = request.assigned_room() {
                let room = state
                    .get_block(block_id)
                    .and_then(|b| b.get_room(room_id))
                    .expect("assigned room exists");
                prop_assert_eq!(room.room_type(), request.requested_type());
                prop_assert!(room.gender().admits(request.gender()));
            }
        }

        // Second pass with no change allocates nothing
        let second = auto_allocate(&mut state, &mut log, 1);
        prop_assert_eq!(second.allocated, 0);
        prop_assert_eq!(second.failed, report.failed);
    }
}
