//! Hostel allocation matcher
//!
//! Assigns pending accommodation requests to compatible rooms across blocks.
//!
//! # Matching rules
//!
//! A request may be placed in a room when, in order:
//! 1. The block admits the student's gender (`Mixed` admits everyone).
//! 2. The room's type equals the requested type, the room's gender
//!    restriction admits the student (`CoEd` admits everyone), and a bed is
//!    free.
//!
//! # Algorithm
//!
//! Greedy first-fit, deliberately not optimal-fit: requests are walked in
//! arrival order, blocks in admission order, rooms in list order, and each
//! request takes the first room that satisfies both rules. Occupancy is
//! bumped immediately, so later requests in the same pass see the bed as
//! taken. There is no backtracking; a request with no eligible room keeps
//! its status and counts as failed, and a later pass will pick it up once
//! capacity frees.
//!
//! # Critical Invariants
//!
//! - **Capacity**: `occupied <= capacity` for every room, always.
//! - **Conservation**: `allocated + failed` equals the number of requests
//!   awaiting placement (Pending or Approved) at the start of the pass.
//! - **Idempotence**: a second pass with no state change allocates nothing.

use thiserror::Error;

use crate::events::{Event, EventLog};
use crate::models::request::RequestError;
use crate::models::state::HostelState;

/// Errors raised by manual allocation and un-allocation
#[derive(Debug, Error, PartialEq)]
pub enum AllocationError {
    #[error("Request {0} not found")]
    RequestNotFound(String),

    #[error("Block {0} not found")]
    BlockNotFound(String),

    #[error("Room {0} not found in block")]
    RoomNotFound(String),

    #[error("Room is full ({occupied}/{capacity})")]
    RoomFull { occupied: u32, capacity: u32 },

    #[error("Block does not admit the student's gender")]
    BlockGenderMismatch,

    #[error("Room gender restriction does not match the student")]
    RoomGenderMismatch,

    #[error("Room type does not match the requested type")]
    RoomTypeMismatch,

    #[error("Request error: {0}")]
    Request(#[from] RequestError),
}

/// Outcome counts of one auto-allocation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AllocationReport {
    /// Requests placed in a room this pass
    pub allocated: usize,

    /// Requests that found no eligible room and kept their status
    pub failed: usize,
}

/// Reason recorded when an administrator bypasses gender/type matching.
///
/// Capacity is never bypassed; an override only relaxes the compatibility
/// rules, and the reason lands in the audit log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideReason(pub String);

/// Run one greedy first-fit pass over all requests awaiting placement
/// (Pending or Approved).
///
/// Rejected and already-Allocated requests are untouched. Every placement
/// and every failure is recorded in the event log.
///
/// # Example
///
/// ```rust
/// use school_portal_core_rs::{
///     allocation::auto_allocate, AllocationRequest, BlockGenderPolicy, EventLog, Gender,
///     HostelBlock, HostelState, Room, RoomGenderRestriction, RoomType,
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
///
/// let mut log = EventLog::new();
/// let report = auto_allocate(&mut state, &mut log, 0);
/// assert_eq!(report.allocated, 1);
/// assert_eq!(report.failed, 0);
/// ```
pub fn auto_allocate(state: &mut HostelState, log: &mut EventLog, now_ms: u64) -> AllocationReport {
    let mut report = AllocationReport::default();

    let pending: Vec<usize> = state
        .requests()
        .iter()
        .enumerate()
        .filter(|(_, r)| r.awaiting_placement())
        .map(|(i, _)| i)
        .collect();

    for idx in pending {
        let (gender, requested, request_id, student_id) = {
            let req = &state.requests()[idx];
            (
                req.gender(),
                req.requested_type(),
                req.id().to_string(),
                req.student_id().to_string(),
            )
        };

        // First-fit scan: blocks in admission order, rooms in list order.
        let slot = state
            .blocks()
            .iter()
            .filter(|b| b.policy().admits(gender))
            .find_map(|b| {
                b.rooms()
                    .iter()
                    .find(|r| r.accepts(gender, requested))
                    .map(|r| (b.id().to_string(), r.id().to_string()))
            });

        match slot {
            Some((block_id, room_id)) => {
                // Take the bed before moving to the next request, so this
                // pass sees its own placements.
                let room = state
                    .get_block_mut(&block_id)
                    .and_then(|b| b.get_room_mut(&room_id))
                    .expect("matched room must exist");
                let taken = room.take_bed();
                debug_assert!(taken, "matched room must have a free bed");

                state
                    .get_request_mut(&request_id)
                    .expect("request must exist")
                    .allocate(block_id.clone(), room_id.clone())
                    .expect("awaiting request must be allocatable");

                log.record(Event::RoomAllocated {
                    at_ms: now_ms,
                    request_id,
                    student_id,
                    block_id,
                    room_id,
                });
                report.allocated += 1;
            }
            None => {
                log.record(Event::AllocationFailed {
                    at_ms: now_ms,
                    request_id,
                    student_id,
                });
                report.failed += 1;
            }
        }
    }

    report
}

/// Assign one request to one specific room by hand.
///
/// Enforces the same gender/type compatibility rules as `auto_allocate`.
/// Passing an `OverrideReason` bypasses gender and type matching (the reason
/// is written to the audit log); a full room is rejected either way.
pub fn manual_allocate(
    state: &mut HostelState,
    log: &mut EventLog,
    request_id: &str,
    block_id: &str,
    room_id: &str,
    override_reason: Option<OverrideReason>,
    now_ms: u64,
) -> Result<(), AllocationError> {
    let (gender, requested) = {
        let req = state
            .get_request(request_id)
            .ok_or_else(|| AllocationError::RequestNotFound(request_id.to_string()))?;
        if !req.awaiting_placement() {
            return Err(RequestError::NotPending.into());
        }
        (req.gender(), req.requested_type())
    };

    {
        let block = state
            .get_block(block_id)
            .ok_or_else(|| AllocationError::BlockNotFound(block_id.to_string()))?;
        let room = block
            .get_room(room_id)
            .ok_or_else(|| AllocationError::RoomNotFound(room_id.to_string()))?;

        if override_reason.is_none() {
            if !block.policy().admits(gender) {
                return Err(AllocationError::BlockGenderMismatch);
            }
            if !room.gender().admits(gender) {
                return Err(AllocationError::RoomGenderMismatch);
            }
            if room.room_type() != requested {
                return Err(AllocationError::RoomTypeMismatch);
            }
        }

        // Capacity is never overridable
        if !room.has_space() {
            return Err(AllocationError::RoomFull {
                occupied: room.occupied(),
                capacity: room.capacity(),
            });
        }
    }

    let room = state
        .get_block_mut(block_id)
        .and_then(|b| b.get_room_mut(room_id))
        .expect("room checked above");
    let taken = room.take_bed();
    debug_assert!(taken, "room checked to have space");

    state
        .get_request_mut(request_id)
        .expect("request checked above")
        .allocate(block_id.to_string(), room_id.to_string())?;

    log.record(Event::ManualAllocation {
        at_ms: now_ms,
        request_id: request_id.to_string(),
        block_id: block_id.to_string(),
        room_id: room_id.to_string(),
        override_reason: override_reason.map(|r| r.0),
    });

    Ok(())
}

/// Withdraw an allocation: the request returns to Pending and its bed frees.
///
/// The freed bed becomes visible to the next `auto_allocate` pass.
pub fn unallocate(
    state: &mut HostelState,
    log: &mut EventLog,
    request_id: &str,
    now_ms: u64,
) -> Result<(), AllocationError> {
    let (block_id, room_id) = {
        let req = state
            .get_request_mut(request_id)
            .ok_or_else(|| AllocationError::RequestNotFound(request_id.to_string()))?;
        req.unallocate()?
    };

    if let Some(room) = state
        .get_block_mut(&block_id)
        .and_then(|b| b.get_room_mut(&room_id))
    {
        room.release_bed();
    }

    log.record(Event::Unallocated {
        at_ms: now_ms,
        request_id: request_id.to_string(),
        block_id,
        room_id,
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::block::{
        BlockGenderPolicy, Gender, HostelBlock, Room, RoomGenderRestriction, RoomType,
    };
    use crate::models::request::{AllocationRequest, RequestStatus};

    fn block_with_room(
        name: &str,
        policy: BlockGenderPolicy,
        capacity: u32,
        room_gender: RoomGenderRestriction,
        room_type: RoomType,
    ) -> HostelBlock {
        let mut block = HostelBlock::new(name.to_string(), policy, "Caretaker".to_string());
        block.add_room(Room::new("101".to_string(), capacity, room_type, room_gender, 1));
        block
    }

    fn request(gender: Gender, requested: RoomType) -> AllocationRequest {
        AllocationRequest::new(
            "STU-001".to_string(),
            "Bayo Adeyemi".to_string(),
            gender,
            requested,
        )
    }

    #[test]
    fn test_first_fit_prefers_earlier_block() {
        let mut state = HostelState::new(vec![
            block_with_room("A", BlockGenderPolicy::Male, 2, RoomGenderRestriction::Male, RoomType::Double),
            block_with_room("B", BlockGenderPolicy::Male, 2, RoomGenderRestriction::Male, RoomType::Double),
        ]);
        let first_block_id = state.blocks()[0].id().to_string();
        state.add_request(request(Gender::Male, RoomType::Double));

        let mut log = EventLog::new();
        let report = auto_allocate(&mut state, &mut log, 0);

        assert_eq!(report, AllocationReport { allocated: 1, failed: 0 });
        let (block_id, _) = state.requests()[0].assigned_room().unwrap();
        assert_eq!(block_id, first_block_id);
        assert_eq!(state.blocks()[1].total_occupied(), 0);
    }

    #[test]
    fn test_pass_sees_its_own_placements() {
        // One double room, three requests: the third must fail because the
        // first two filled the room within the same pass.
        let mut state = HostelState::new(vec![block_with_room(
            "A",
            BlockGenderPolicy::Male,
            2,
            RoomGenderRestriction::Male,
            RoomType::Double,
        )]);
        for _ in 0..3 {
            state.add_request(request(Gender::Male, RoomType::Double));
        }

        let mut log = EventLog::new();
        let report = auto_allocate(&mut state, &mut log, 0);

        assert_eq!(report, AllocationReport { allocated: 2, failed: 1 });
        assert_eq!(state.blocks()[0].rooms()[0].occupied(), 2);
        assert!(state.requests()[2].is_pending());
    }

    #[test]
    fn test_arrival_order_is_priority_order() {
        let mut state = HostelState::new(vec![block_with_room(
            "A",
            BlockGenderPolicy::Male,
            1,
            RoomGenderRestriction::Male,
            RoomType::Single,
        )]);
        state.add_request(request(Gender::Male, RoomType::Single));
        state.add_request(request(Gender::Male, RoomType::Single));
        let first_id = state.requests()[0].id().to_string();

        let mut log = EventLog::new();
        auto_allocate(&mut state, &mut log, 0);

        // The earlier arrival got the only bed
        assert!(state.get_request(&first_id).unwrap().is_allocated());
        assert!(state.requests()[1].is_pending());
    }

    #[test]
    fn test_coed_room_takes_either_gender() {
        let mut state = HostelState::new(vec![block_with_room(
            "C",
            BlockGenderPolicy::Mixed,
            2,
            RoomGenderRestriction::CoEd,
            RoomType::Double,
        )]);
        state.add_request(request(Gender::Male, RoomType::Double));
        state.add_request(request(Gender::Female, RoomType::Double));

        let mut log = EventLog::new();
        let report = auto_allocate(&mut state, &mut log, 0);

        assert_eq!(report, AllocationReport { allocated: 2, failed: 0 });
        assert_eq!(state.blocks()[0].rooms()[0].occupied(), 2);
    }

    #[test]
    fn test_approved_requests_are_matched() {
        let mut state = HostelState::new(vec![block_with_room(
            "A",
            BlockGenderPolicy::Male,
            4,
            RoomGenderRestriction::Male,
            RoomType::Dormitory,
        )]);
        let mut req = request(Gender::Male, RoomType::Dormitory);
        req.approve().unwrap();
        state.add_request(req);

        let mut log = EventLog::new();
        let report = auto_allocate(&mut state, &mut log, 0);

        assert_eq!(report, AllocationReport { allocated: 1, failed: 0 });
        assert!(state.requests()[0].is_allocated());
    }

    #[test]
    fn test_rejected_requests_are_untouched() {
        let mut state = HostelState::new(vec![block_with_room(
            "A",
            BlockGenderPolicy::Male,
            4,
            RoomGenderRestriction::Male,
            RoomType::Dormitory,
        )]);
        let mut req = request(Gender::Male, RoomType::Dormitory);
        req.reject().unwrap();
        state.add_request(req);

        let mut log = EventLog::new();
        let report = auto_allocate(&mut state, &mut log, 0);

        assert_eq!(report, AllocationReport { allocated: 0, failed: 0 });
        assert_eq!(*state.requests()[0].status(), RequestStatus::Rejected);
        assert!(log.is_empty());
    }

    #[test]
    fn test_manual_allocate_enforces_gender_by_default() {
        let mut state = HostelState::new(vec![block_with_room(
            "B",
            BlockGenderPolicy::Female,
            4,
            RoomGenderRestriction::Female,
            RoomType::Dormitory,
        )]);
        state.add_request(request(Gender::Male, RoomType::Dormitory));

        let request_id = state.requests()[0].id().to_string();
        let block_id = state.blocks()[0].id().to_string();
        let room_id = state.blocks()[0].rooms()[0].id().to_string();

        let mut log = EventLog::new();
        let result = manual_allocate(&mut state, &mut log, &request_id, &block_id, &room_id, None, 0);

        assert_eq!(result, Err(AllocationError::BlockGenderMismatch));
        assert_eq!(state.blocks()[0].rooms()[0].occupied(), 0);
    }

    #[test]
    fn test_manual_override_bypasses_gender_but_not_capacity() {
        let mut state = HostelState::new(vec![block_with_room(
            "B",
            BlockGenderPolicy::Female,
            1,
            RoomGenderRestriction::Female,
            RoomType::Dormitory,
        )]);
        state.add_request(request(Gender::Male, RoomType::Dormitory));
        state.add_request(request(Gender::Male, RoomType::Dormitory));

        let req_a = state.requests()[0].id().to_string();
        let req_b = state.requests()[1].id().to_string();
        let block_id = state.blocks()[0].id().to_string();
        let room_id = state.blocks()[0].rooms()[0].id().to_string();

        let mut log = EventLog::new();
        manual_allocate(
            &mut state,
            &mut log,
            &req_a,
            &block_id,
            &room_id,
            Some(OverrideReason("medical exemption".to_string())),
            0,
        )
        .unwrap();
        assert_eq!(state.blocks()[0].rooms()[0].occupied(), 1);

        // Room now full - override cannot create a bed
        let result = manual_allocate(
            &mut state,
            &mut log,
            &req_b,
            &block_id,
            &room_id,
            Some(OverrideReason("second exemption".to_string())),
            0,
        );
        assert_eq!(
            result,
            Err(AllocationError::RoomFull { occupied: 1, capacity: 1 })
        );

        // Override reason is audited
        assert!(matches!(
            &log.events()[0],
            Event::ManualAllocation { override_reason: Some(r), .. } if r == "medical exemption"
        ));
    }

    #[test]
    fn test_unallocate_frees_bed_for_next_pass() {
        let mut state = HostelState::new(vec![block_with_room(
            "A",
            BlockGenderPolicy::Male,
            1,
            RoomGenderRestriction::Male,
            RoomType::Single,
        )]);
        state.add_request(request(Gender::Male, RoomType::Single));
        state.add_request(request(Gender::Male, RoomType::Single));
        let first_id = state.requests()[0].id().to_string();

        let mut log = EventLog::new();
        let report = auto_allocate(&mut state, &mut log, 0);
        assert_eq!(report, AllocationReport { allocated: 1, failed: 1 });

        unallocate(&mut state, &mut log, &first_id, 1).unwrap();
        assert_eq!(state.blocks()[0].rooms()[0].occupied(), 0);

        // Both are Pending again; list order still decides, so the earlier
        // arrival reclaims the freed bed.
        let report = auto_allocate(&mut state, &mut log, 2);
        assert_eq!(report, AllocationReport { allocated: 1, failed: 1 });
        assert!(state.requests()[0].is_allocated());
        assert!(state.requests()[1].is_pending());
    }
}
