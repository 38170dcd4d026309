//! Hostel block and room models
//!
//! A block is a hostel building (or wing) with a gender policy and a set of
//! rooms it exclusively owns. A room is a bookable unit with a fixed bed
//! capacity, a room type and a gender restriction.
//!
//! Aggregates over rooms (total room count, total bed capacity) are computed
//! on read, never stored, so they cannot drift from the room list.

use serde::{Deserialize, Serialize};

/// Student gender as carried on allocation requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

/// Gender policy of a whole block.
///
/// `Mixed` blocks accept requests of either gender (individual rooms still
/// enforce their own restriction).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockGenderPolicy {
    Male,
    Female,
    Mixed,
}

impl BlockGenderPolicy {
    /// Whether a student of the given gender may be housed in this block.
    pub fn admits(&self, gender: Gender) -> bool {
        match self {
            BlockGenderPolicy::Mixed => true,
            BlockGenderPolicy::Male => gender == Gender::Male,
            BlockGenderPolicy::Female => gender == Gender::Female,
        }
    }
}

/// Gender restriction of an individual room.
///
/// `CoEd` rooms admit students of either gender; the owning block's policy
/// is still checked first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomGenderRestriction {
    Male,
    Female,
    #[serde(rename = "Co-ed")]
    CoEd,
}

impl RoomGenderRestriction {
    /// Whether a student of the given gender may occupy this room.
    pub fn admits(&self, gender: Gender) -> bool {
        match self {
            RoomGenderRestriction::CoEd => true,
            RoomGenderRestriction::Male => gender == Gender::Male,
            RoomGenderRestriction::Female => gender == Gender::Female,
        }
    }
}

/// Room category requested by students and advertised by rooms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomType {
    Single,
    Double,
    Dormitory,
}

/// A bookable room inside a block
///
/// # Example
/// ```
/// use school_portal_core_rs::{Room, RoomGenderRestriction, RoomType};
///
/// let room = Room::new(
///     "101".to_string(),
///     4,
///     RoomType::Dormitory,
///     RoomGenderRestriction::Male,
///     1,
/// );
/// assert_eq!(room.free_beds(), 4);
/// assert!(room.has_space());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// Unique room identifier (UUID)
    id: String,

    /// Human-facing room number, e.g. "101"
    number: String,

    /// Total bed capacity (always > 0)
    capacity: u32,

    /// Beds currently taken (0 ..= capacity)
    occupied: u32,

    /// Room category
    room_type: RoomType,

    /// Gender restriction of this specific room
    gender: RoomGenderRestriction,

    /// Floor the room sits on
    floor: u32,
}

impl Room {
    /// Create a new empty room
    ///
    /// # Panics
    /// Panics if `capacity` is zero.
    pub fn new(
        number: String,
        capacity: u32,
        room_type: RoomType,
        gender: RoomGenderRestriction,
        floor: u32,
    ) -> Self {
        assert!(capacity > 0, "capacity must be positive");
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            number,
            capacity,
            occupied: 0,
            room_type,
            gender,
            floor,
        }
    }

    /// Restore a room with a known id and occupancy (snapshot loading)
    ///
    /// # Panics
    /// Panics if `capacity` is zero or `occupied > capacity`.
    pub fn from_snapshot(
        id: String,
        number: String,
        capacity: u32,
        occupied: u32,
        room_type: RoomType,
        gender: RoomGenderRestriction,
        floor: u32,
    ) -> Self {
        assert!(capacity > 0, "capacity must be positive");
        assert!(occupied <= capacity, "occupied must not exceed capacity");
        Self {
            id,
            number,
            capacity,
            occupied,
            room_type,
            gender,
            floor,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn occupied(&self) -> u32 {
        self.occupied
    }

    pub fn room_type(&self) -> RoomType {
        self.room_type
    }

    pub fn gender(&self) -> RoomGenderRestriction {
        self.gender
    }

    pub fn floor(&self) -> u32 {
        self.floor
    }

    /// Beds still free in this room.
    pub fn free_beds(&self) -> u32 {
        self.capacity - self.occupied
    }

    /// Whether at least one bed is free.
    pub fn has_space(&self) -> bool {
        self.occupied < self.capacity
    }

    /// Whether this room can take a student of the given gender and
    /// requested type.
    pub fn accepts(&self, gender: Gender, requested: RoomType) -> bool {
        self.room_type == requested && self.gender.admits(gender) && self.has_space()
    }

    /// Take one bed. Returns `false` (and changes nothing) if the room is full.
    pub(crate) fn take_bed(&mut self) -> bool {
        if self.occupied < self.capacity {
            self.occupied += 1;
            true
        } else {
            false
        }
    }

    /// Free one bed. Returns `false` (and changes nothing) if the room is empty.
    pub(crate) fn release_bed(&mut self) -> bool {
        if self.occupied > 0 {
            self.occupied -= 1;
            true
        } else {
            false
        }
    }
}

/// A hostel block: a building with a gender policy, a caretaker and rooms
///
/// # Example
/// ```
/// use school_portal_core_rs::{BlockGenderPolicy, HostelBlock, Room, RoomGenderRestriction, RoomType};
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
/// assert_eq!(block.total_rooms(), 1);
/// assert_eq!(block.total_capacity(), 4);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostelBlock {
    /// Unique block identifier (UUID)
    id: String,

    /// Block name, e.g. "Unity Hall"
    name: String,

    /// Gender policy applied before any room is considered
    policy: BlockGenderPolicy,

    /// Caretaker in charge of the block
    caretaker: String,

    /// Rooms owned exclusively by this block
    rooms: Vec<Room>,
}

impl HostelBlock {
    pub fn new(name: String, policy: BlockGenderPolicy, caretaker: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            policy,
            caretaker,
            rooms: Vec::new(),
        }
    }

    /// Restore a block with a known id and rooms (snapshot loading)
    pub fn from_snapshot(
        id: String,
        name: String,
        policy: BlockGenderPolicy,
        caretaker: String,
        rooms: Vec<Room>,
    ) -> Self {
        Self {
            id,
            name,
            policy,
            caretaker,
            rooms,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn policy(&self) -> BlockGenderPolicy {
        self.policy
    }

    pub fn caretaker(&self) -> &str {
        &self.caretaker
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn add_room(&mut self, room: Room) {
        self.rooms.push(room);
    }

    pub fn get_room(&self, room_id: &str) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id() == room_id)
    }

    pub(crate) fn get_room_mut(&mut self, room_id: &str) -> Option<&mut Room> {
        self.rooms.iter_mut().find(|r| r.id() == room_id)
    }

    /// Number of rooms in the block (derived, never stored).
    pub fn total_rooms(&self) -> usize {
        self.rooms.len()
    }

    /// Total bed capacity across all rooms (derived, never stored).
    pub fn total_capacity(&self) -> u32 {
        self.rooms.iter().map(|r| r.capacity()).sum()
    }

    /// Total beds currently taken across all rooms (derived, never stored).
    pub fn total_occupied(&self) -> u32 {
        self.rooms.iter().map(|r| r.occupied()).sum()
    }
}
