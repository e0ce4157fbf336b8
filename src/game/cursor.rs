/// Position in a game's ply sequence, always within `[0, len]`.
///
/// `index` plies have been played; `0` is the start position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    index: usize,
    len: usize,
}

impl Cursor {
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn at_start(&self) -> bool {
        self.index == 0
    }

    pub fn at_end(&self) -> bool {
        self.index == self.len
    }

    /// Returns false (and stays put) at the end of the game.
    pub fn forward(&mut self) -> bool {
        if self.index < self.len {
            self.index += 1;
            true
        } else {
            false
        }
    }

    /// Returns false (and stays put) at the start position.
    pub fn back(&mut self) -> bool {
        if self.index > 0 {
            self.index -= 1;
            true
        } else {
            false
        }
    }

    pub fn to_start(&mut self) -> bool {
        let moved = self.index != 0;
        self.index = 0;
        moved
    }

    pub fn to_end(&mut self) -> bool {
        let moved = self.index != self.len;
        self.index = self.len;
        moved
    }

    /// Full-move number and side of the ply that led to the current position.
    pub fn last_move_label(&self) -> Option<String> {
        if self.index == 0 {
            return None;
        }
        let ply = self.index - 1;
        let number = ply / 2 + 1;
        Some(if ply % 2 == 0 {
            format!("{}.", number)
        } else {
            format!("{}...", number)
        })
    }
}
