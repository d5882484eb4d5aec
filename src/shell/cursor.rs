//! Row cursor for the tree pane.
//!
//! Invariant: `pos < len`, or `pos == 0` when the list is empty. Movement
//! methods return whether the position changed, which is what turns a key
//! press into a selection-changed event.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    pos: usize,
    len: usize,
}

impl Cursor {
    pub fn new(len: usize) -> Self {
        Self { pos: 0, len }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn move_up(&mut self) -> bool {
        self.set_pos(self.pos.saturating_sub(1))
    }

    pub fn move_down(&mut self) -> bool {
        self.set_pos(self.pos + 1)
    }

    pub fn home(&mut self) -> bool {
        self.set_pos(0)
    }

    pub fn end(&mut self) -> bool {
        self.set_pos(self.len.saturating_sub(1))
    }

    pub fn page_down(&mut self, amount: usize) -> bool {
        self.set_pos(self.pos.saturating_add(amount.max(1)))
    }

    pub fn page_up(&mut self, amount: usize) -> bool {
        self.set_pos(self.pos.saturating_sub(amount.max(1)))
    }

    /// Resize the list, clamping the position
    pub fn update_len(&mut self, len: usize) {
        self.len = len;
        if self.pos >= len {
            self.pos = len.saturating_sub(1);
        }
    }

    /// Clamped jump; returns whether the position changed
    pub fn set_pos(&mut self, pos: usize) -> bool {
        let clamped = pos.min(self.len.saturating_sub(1));
        let changed = clamped != self.pos;
        self.pos = clamped;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_within_bounds() {
        let mut c = Cursor::new(3);
        assert!(!c.move_up());
        assert!(c.move_down());
        assert!(c.move_down());
        assert!(!c.move_down());
        assert_eq!(c.pos(), 2);
        assert!(c.home());
        assert!(c.end());
        assert!(!c.end());
    }

    #[test]
    fn test_empty_cursor_never_moves() {
        let mut c = Cursor::new(0);
        assert!(!c.move_down());
        assert!(!c.page_down(10));
        assert!(!c.end());
        assert_eq!(c.pos(), 0);
        assert!(c.is_empty());
    }

    #[test]
    fn test_update_len_clamps() {
        let mut c = Cursor::new(10);
        c.set_pos(8);
        c.update_len(4);
        assert_eq!(c.pos(), 3);
        c.update_len(0);
        assert_eq!(c.pos(), 0);
    }

    #[test]
    fn test_paging() {
        let mut c = Cursor::new(50);
        assert!(c.page_down(20));
        assert_eq!(c.pos(), 20);
        assert!(c.page_down(100));
        assert_eq!(c.pos(), 49);
        assert!(c.page_up(30));
        assert_eq!(c.pos(), 19);
    }
}
