//! Level object components: what a placed entity is, where it sits, how big it is.

use super::common::{BoundingBox, Vec3};
use serde::{Deserialize, Serialize};

/// Kind of object the generator materializes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObjectKind {
    // Structure
    Wall,
    Platform,

    // Decorations
    Trap,
    Coin,
    Key,
    Door,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 6] = [
        ObjectKind::Wall,
        ObjectKind::Platform,
        ObjectKind::Trap,
        ObjectKind::Coin,
        ObjectKind::Key,
        ObjectKind::Door,
    ];

    /// Decorations replace a wall or platform slot in place.
    pub fn is_decoration(&self) -> bool {
        !matches!(self, ObjectKind::Wall | ObjectKind::Platform)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ObjectKind::Wall => "wall",
            ObjectKind::Platform => "platform",
            ObjectKind::Trap => "trap",
            ObjectKind::Coin => "coin",
            ObjectKind::Key => "key",
            ObjectKind::Door => "door",
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Marks an entity as a generated level object
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Placed {
    pub kind: ObjectKind,
}

/// World-space centre of a placed object
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Position(pub Vec3);

/// Full size of a placed object's axis-aligned box
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Footprint(pub Vec3);

impl Footprint {
    /// Half-extents on the horizontal plane (x, z)
    pub fn horizontal_extents(&self) -> (f32, f32) {
        (self.0.x / 2.0, self.0.z / 2.0)
    }

    pub fn bounds_at(&self, center: Vec3) -> BoundingBox {
        BoundingBox::from_center_size(center, self.0)
    }
}
