use serde::{Deserialize, Serialize};

/// A position on a single floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn on_floor(self, z: i32) -> Pos3 {
        Pos3 { x: self.x, y: self.y, z }
    }
}

/// A position in the stacked world volume; `z` is the floor index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos3 {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Pos3 {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub const fn planar(self) -> Pos {
        Pos { x: self.x, y: self.y }
    }

    /// Straight-line distance on the floor plane, ignoring `z`.
    pub fn planar_distance(self, other: Self) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        (dx * dx + dy * dy).sqrt()
    }
}

/// The semantic type of a grid cell. Serialized as its one-character symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TileKind {
    #[serde(rename = "0")]
    Wall,
    #[serde(rename = "1")]
    Hallway,
    #[serde(rename = "2")]
    Door,
    #[serde(rename = "L")]
    LockedDoor,
    #[serde(rename = "3")]
    DungeonRoom,
    #[serde(rename = "4")]
    Shop,
    #[serde(rename = "5")]
    BossRoom,
    #[serde(rename = "S")]
    Entry,
    #[serde(rename = "E")]
    Exit,
    #[serde(rename = "U")]
    Ascent,
    #[serde(rename = "D")]
    Descent,
}

impl TileKind {
    pub const fn symbol(self) -> char {
        match self {
            Self::Wall => '0',
            Self::Hallway => '1',
            Self::Door => '2',
            Self::LockedDoor => 'L',
            Self::DungeonRoom => '3',
            Self::Shop => '4',
            Self::BossRoom => '5',
            Self::Entry => 'S',
            Self::Exit => 'E',
            Self::Ascent => 'U',
            Self::Descent => 'D',
        }
    }

    /// Entry, Exit, Ascent and Descent: the fixed connectivity points of a floor.
    pub const fn is_anchor(self) -> bool {
        matches!(self, Self::Entry | Self::Exit | Self::Ascent | Self::Descent)
    }

    pub(crate) const fn code(self) -> u8 {
        match self {
            Self::Wall => 0,
            Self::Hallway => 1,
            Self::Door => 2,
            Self::LockedDoor => 3,
            Self::DungeonRoom => 4,
            Self::Shop => 5,
            Self::BossRoom => 6,
            Self::Entry => 7,
            Self::Exit => 8,
            Self::Ascent => 9,
            Self::Descent => 10,
        }
    }
}

/// Render-only marker. Never consulted by generation or search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Highlight {
    Entry,
    Exit,
    Ascent,
    Descent,
    Corridor,
    /// A tile on the route certified by the connectivity check.
    Route,
}

impl Highlight {
    pub(crate) const fn code(self) -> u8 {
        match self {
            Self::Entry => 1,
            Self::Exit => 2,
            Self::Ascent => 3,
            Self::Descent => 4,
            Self::Corridor => 5,
            Self::Route => 6,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub kind: TileKind,
    pub highlight: Option<Highlight>,
}

impl Cell {
    pub const WALL: Self = Self { kind: TileKind::Wall, highlight: None };

    pub const fn new(kind: TileKind, highlight: Option<Highlight>) -> Self {
        Self { kind, highlight }
    }
}

/// Search strategy used by the path search engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchAlgorithm {
    BreadthFirst,
    #[default]
    GreedyBestFirst,
    AStar,
}
