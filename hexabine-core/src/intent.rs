//! Arrow-key chords to hex directions
//!
//! The hex board has no straight up/down move, so vertical arrows only
//! count in combination with a horizontal one.

use crate::board::Direction;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Arrow {
    Left,
    Right,
    Up,
    Down,
}

/// Arrow keys currently held
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ArrowKeys {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl ArrowKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, arrow: Arrow) {
        *self.slot(arrow) = true;
    }

    pub fn release(&mut self, arrow: Arrow) {
        *self.slot(arrow) = false;
    }

    pub fn is_empty(&self) -> bool {
        !(self.left || self.right || self.up || self.down)
    }

    /// Resolve the held chord. Diagonals win over plain left/right.
    pub fn intent(&self) -> Option<Direction> {
        let Self { left, right, up, down } = *self;
        if left && up {
            Some(Direction::UL)
        } else if right && up {
            Some(Direction::UR)
        } else if left && down {
            Some(Direction::DL)
        } else if right && down {
            Some(Direction::DR)
        } else if left {
            Some(Direction::L)
        } else if right {
            Some(Direction::R)
        } else {
            None
        }
    }

    fn slot(&mut self, arrow: Arrow) -> &mut bool {
        match arrow {
            Arrow::Left => &mut self.left,
            Arrow::Right => &mut self.right,
            Arrow::Up => &mut self.up,
            Arrow::Down => &mut self.down,
        }
    }
}

impl FromIterator<Arrow> for ArrowKeys {
    fn from_iter<I: IntoIterator<Item = Arrow>>(iter: I) -> Self {
        let mut keys = ArrowKeys::new();
        for arrow in iter {
            keys.press(arrow);
        }
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chord(arrows: &[Arrow]) -> Option<Direction> {
        arrows.iter().copied().collect::<ArrowKeys>().intent()
    }

    #[test]
    fn test_single_keys() {
        assert_eq!(chord(&[Arrow::Left]), Some(Direction::L));
        assert_eq!(chord(&[Arrow::Right]), Some(Direction::R));
        assert_eq!(chord(&[Arrow::Up]), None);
        assert_eq!(chord(&[Arrow::Down]), None);
        assert_eq!(chord(&[]), None);
    }

    #[test]
    fn test_diagonal_chords() {
        assert_eq!(chord(&[Arrow::Up, Arrow::Left]), Some(Direction::UL));
        assert_eq!(chord(&[Arrow::Right, Arrow::Up]), Some(Direction::UR));
        assert_eq!(chord(&[Arrow::Down, Arrow::Left]), Some(Direction::DL));
        assert_eq!(chord(&[Arrow::Down, Arrow::Right]), Some(Direction::DR));
    }

    #[test]
    fn test_conflicting_chords_follow_priority() {
        // Up beats down, left beats right
        assert_eq!(
            chord(&[Arrow::Left, Arrow::Right, Arrow::Up, Arrow::Down]),
            Some(Direction::UL)
        );
        assert_eq!(chord(&[Arrow::Left, Arrow::Right]), Some(Direction::L));
    }

    #[test]
    fn test_press_release() {
        let mut keys = ArrowKeys::new();
        keys.press(Arrow::Right);
        keys.press(Arrow::Down);
        assert_eq!(keys.intent(), Some(Direction::DR));
        keys.release(Arrow::Down);
        assert_eq!(keys.intent(), Some(Direction::R));
        keys.release(Arrow::Right);
        assert!(keys.is_empty());
    }
}
