use std::fmt::Display;

/// An item instance as referenced by a slot entry.
///
/// Identifier, stack count and metadata fully describe the instance; no
/// catalog lookup happens here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Item {
    pub id: i16,
    pub count: u8,
    pub metadata: i16,
}

impl Item {
    pub const fn new(id: i16, count: u8, metadata: i16) -> Self {
        Self {
            id,
            count,
            metadata,
        }
    }

    pub const fn air() -> Self {
        Self::new(0, 0, 0)
    }
}

impl Display for Item {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "id: {}, count: {}, metadata: {}",
            self.id, self.count, self.metadata
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockCoordinates {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockCoordinates {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

impl Display for BlockCoordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}, {}", self.x, self.y, self.z)
    }
}
