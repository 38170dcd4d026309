//! Allocation request model
//!
//! A student's ask for hostel accommodation. Requests start Pending; an
//! administrator may endorse one as Approved (it keeps waiting for a room)
//! or turn it down as Rejected. The matcher (or a manual assignment) moves
//! Pending and Approved requests to Allocated, which carries the assigned
//! block/room ids so the bed can be freed again if the allocation is
//! withdrawn.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::block::{Gender, RoomType};

/// Lifecycle state of an allocation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStatus {
    /// Awaiting a room assignment
    Pending,

    /// Approved by an administrator, still awaiting a room
    Approved,

    /// Turned down; the matcher never touches rejected requests
    Rejected,

    /// Assigned to a specific room
    Allocated {
        block_id: String,
        room_id: String,
    },
}

/// Errors raised by request state transitions
#[derive(Debug, Error, PartialEq)]
pub enum RequestError {
    #[error("Request is not pending (status transition not allowed)")]
    NotPending,

    #[error("Request is not allocated")]
    NotAllocated,
}

/// A student's hostel accommodation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationRequest {
    /// Unique request identifier (UUID)
    id: String,

    /// Requesting student's id
    student_id: String,

    /// Requesting student's display name
    student_name: String,

    /// Student gender, matched against block policy and room restriction
    gender: Gender,

    /// Room category the student asked for
    requested_type: RoomType,

    /// Current lifecycle state
    status: RequestStatus,
}

impl AllocationRequest {
    pub fn new(student_id: String, student_name: String, gender: Gender, requested_type: RoomType) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            student_id,
            student_name,
            gender,
            requested_type,
            status: RequestStatus::Pending,
        }
    }

    /// Restore a request with a known id and status (snapshot loading)
    pub fn from_snapshot(
        id: String,
        student_id: String,
        student_name: String,
        gender: Gender,
        requested_type: RoomType,
        status: RequestStatus,
    ) -> Self {
        Self {
            id,
            student_id,
            student_name,
            gender,
            requested_type,
            status,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn student_id(&self) -> &str {
        &self.student_id
    }

    pub fn student_name(&self) -> &str {
        &self.student_name
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn requested_type(&self) -> RoomType {
        self.requested_type
    }

    pub fn status(&self) -> &RequestStatus {
        &self.status
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.status, RequestStatus::Pending)
    }

    pub fn is_approved(&self) -> bool {
        matches!(self.status, RequestStatus::Approved)
    }

    /// Whether the matcher should consider this request (Pending or
    /// Approved).
    pub fn awaiting_placement(&self) -> bool {
        self.is_pending() || self.is_approved()
    }

    pub fn is_allocated(&self) -> bool {
        matches!(self.status, RequestStatus::Allocated { .. })
    }

    /// Assigned room, if any.
    pub fn assigned_room(&self) -> Option<(&str, &str)> {
        match &self.status {
            RequestStatus::Allocated { block_id, room_id } => Some((block_id, room_id)),
            _ => None,
        }
    }

    /// Endorse a Pending request. The request keeps waiting for a room.
    pub fn approve(&mut self) -> Result<(), RequestError> {
        if !self.is_pending() {
            return Err(RequestError::NotPending);
        }
        self.status = RequestStatus::Approved;
        Ok(())
    }

    /// Mark the request allocated to a room. Only requests awaiting
    /// placement may be allocated.
    pub(crate) fn allocate(&mut self, block_id: String, room_id: String) -> Result<(), RequestError> {
        if !self.awaiting_placement() {
            return Err(RequestError::NotPending);
        }
        self.status = RequestStatus::Allocated { block_id, room_id };
        Ok(())
    }

    /// Turn down a request that has not been placed yet.
    pub fn reject(&mut self) -> Result<(), RequestError> {
        if !self.awaiting_placement() {
            return Err(RequestError::NotPending);
        }
        self.status = RequestStatus::Rejected;
        Ok(())
    }

    /// Return an allocated request to Pending. The caller is responsible for
    /// freeing the bed it held.
    pub(crate) fn unallocate(&mut self) -> Result<(String, String), RequestError> {
        match std::mem::replace(&mut self.status, RequestStatus::Pending) {
            RequestStatus::Allocated { block_id, room_id } => Ok((block_id, room_id)),
            other => {
                self.status = other;
                Err(RequestError::NotAllocated)
            }
        }
    }
}
