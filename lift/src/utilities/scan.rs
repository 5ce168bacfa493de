/// ----- SCAN -----
/// Picks the next stop for a car moving in one direction. Both candidates
/// must lie on or ahead of the current floor; the nearer one wins and a
/// pickup wins a tie. A chosen pickup still has to be committed against the
/// shared pickup requests before the car may travel there.

use shared_resources::direction::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Pickup(u32),
    DropOff(u32),
}

impl Target {
    pub fn floor(self) -> u32 {
        match self {
            Target::Pickup(floor) | Target::DropOff(floor) => floor,
        }
    }
}

pub fn choose(pickup: Option<u32>, drop_off: Option<u32>, floor: u32, direction: Direction) -> Option<Target> {
    match (pickup, drop_off) {
        (None, None) => None,
        (None, Some(d)) => Some(Target::DropOff(d)),
        (Some(p), None) => Some(Target::Pickup(p)),
        (Some(p), Some(d)) => {
            if direction.distance(floor, d) >= direction.distance(floor, p) {
                Some(Target::Pickup(p))
            } else {
                Some(Target::DropOff(d))
            }
        },
    }
}
