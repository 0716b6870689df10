use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use crate::Error;

/// One of the four cardinal directions between neighbouring cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards row zero.
    North,
    /// Towards the last column.
    East,
    /// Towards the last row.
    South,
    /// Towards column zero.
    West,
}

/// All directions, in the order propagation visits neighbours.
pub const ALL_DIRECTIONS: [Direction; 4] = [
    Direction::North,
    Direction::East,
    Direction::South,
    Direction::West,
];

impl Direction {
    /// Position of this direction in [`ALL_DIRECTIONS`], used to index rule masks.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::North => 0,
            Self::East => 1,
            Self::South => 2,
            Self::West => 3,
        }
    }

    /// The direction pointing back the way this one came.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// Row and column offsets of the neighbour in this direction.
    #[must_use]
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Self::North => (-1, 0),
            Self::East => (0, 1),
            Self::South => (1, 0),
            Self::West => (0, -1),
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let name = match self {
            Self::North => "north",
            Self::East => "east",
            Self::South => "south",
            Self::West => "west",
        };
        f.pad(name)
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "n" | "north" => Ok(Self::North),
            "e" | "east" => Ok(Self::East),
            "s" | "south" => Ok(Self::South),
            "w" | "west" => Ok(Self::West),
            _ => Err(Error::InvalidDirection(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_an_involution() {
        for dir in ALL_DIRECTIONS {
            assert_ne!(dir, dir.opposite());
            assert_eq!(dir, dir.opposite().opposite());
        }
    }

    #[test]
    fn index_matches_position_in_all_directions() {
        for (i, dir) in ALL_DIRECTIONS.iter().enumerate() {
            assert_eq!(dir.index(), i);
        }
    }

    #[test]
    fn opposite_deltas_cancel() {
        for dir in ALL_DIRECTIONS {
            let (dr, dc) = dir.delta();
            let (or, oc) = dir.opposite().delta();
            assert_eq!((dr + or, dc + oc), (0, 0));
        }
    }

    #[test]
    fn parses_short_and_long_names() {
        assert_eq!("n".parse::<Direction>().unwrap(), Direction::North);
        assert_eq!("East".parse::<Direction>().unwrap(), Direction::East);
        assert_eq!(" S ".parse::<Direction>().unwrap(), Direction::South);
        assert_eq!("west".parse::<Direction>().unwrap(), Direction::West);
    }

    #[test]
    fn rejects_unknown_direction() {
        match "up".parse::<Direction>() {
            Err(Error::InvalidDirection(text)) => assert_eq!(text, "up"),
            other => panic!("expected InvalidDirection, got {other:?}"),
        }
    }
}
