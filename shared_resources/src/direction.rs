#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    pub fn as_string(self) -> String {
        match self {
            Direction::Up => String::from("up"),
            Direction::Down => String::from("down"),
        }
    }

    /// Floors between `from` and `to`, assuming `to` lies on or ahead of
    /// `from` in this direction.
    pub fn distance(self, from: u32, to: u32) -> u32 {
        match self {
            Direction::Up => to - from,
            Direction::Down => from - to,
        }
    }
}
