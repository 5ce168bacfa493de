use shared_resources::direction::Direction;

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarMode {
    Wait,
    Up,
    Down,
    Open,
    Alight,
    Board,
    Close,
    Full,
}

impl CarMode {
    pub fn travelling(direction: Direction) -> Self {
        match direction {
            Direction::Up => CarMode::Up,
            Direction::Down => CarMode::Down,
        }
    }

    pub fn as_string(&self) -> String {
        match self {
            CarMode::Wait => String::from("wait"),
            CarMode::Up => String::from("up"),
            CarMode::Down => String::from("down"),
            CarMode::Open => String::from("open"),
            CarMode::Alight => String::from("alight"),
            CarMode::Board => String::from("board"),
            CarMode::Close => String::from("close"),
            CarMode::Full => String::from("full"),
        }
    }
}
