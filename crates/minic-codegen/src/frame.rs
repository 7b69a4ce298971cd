//! Stack frame layout for IA-32.
//!
//! Scaled down from `faxc`'s `StackFrame` (System V x86-64: six integer
//! argument registers, 8-byte slots, red zone) to this target's narrower
//! contract: no argument registers at all (the only call site, `print`,
//! takes its one argument on the stack), four-byte slots, no red zone.
//! Locals are addressed as negative offsets from `%ebp`, descending as each
//! declaration is assigned a slot and restored when its enclosing block
//! exits, the same way `faxc-lir`'s frame hands out local offsets but
//! without needing to track per-local type size or FP/int class.

use crate::emit::WORDSIZE;

pub struct StackFrame {
    next_offset: i32,
    min_offset: i32,
}

impl StackFrame {
    pub fn new() -> Self {
        StackFrame {
            next_offset: 0,
            min_offset: 0,
        }
    }

    /// Hands out the next local slot, descending from the current frame
    /// top, and returns its `%ebp`-relative offset.
    pub fn allocate(&mut self) -> i32 {
        self.next_offset -= WORDSIZE;
        if self.next_offset < self.min_offset {
            self.min_offset = self.next_offset;
        }
        self.next_offset
    }

    /// Snapshot of the current frame top, to restore when a block's scope
    /// exits and its locals' slots become free for reuse.
    pub fn mark(&self) -> i32 {
        self.next_offset
    }

    pub fn restore(&mut self, mark: i32) {
        self.next_offset = mark;
    }

    /// Total bytes ever in use below `%ebp`, rounded up to a 16-byte
    /// boundary so the body can assume the stack is aligned on entry.
    pub fn frame_size(&self) -> i32 {
        let raw = -self.min_offset;
        let rem = raw % 16;
        if rem == 0 {
            raw
        } else {
            raw + (16 - rem)
        }
    }
}

impl Default for StackFrame {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_descends_by_wordsize() {
        let mut frame = StackFrame::new();
        assert_eq!(frame.allocate(), -4);
        assert_eq!(frame.allocate(), -8);
    }

    #[test]
    fn restore_frees_slots_for_reuse_by_a_sibling_scope() {
        let mut frame = StackFrame::new();
        let mark = frame.mark();
        frame.allocate();
        frame.allocate();
        frame.restore(mark);
        assert_eq!(frame.allocate(), -4);
    }

    #[test]
    fn frame_size_tracks_the_deepest_offset_reached_even_after_restore() {
        let mut frame = StackFrame::new();
        let mark = frame.mark();
        frame.allocate();
        frame.allocate();
        frame.restore(mark);
        frame.allocate();
        assert_eq!(frame.frame_size(), 16);
    }

    #[test]
    fn empty_frame_has_zero_size() {
        let frame = StackFrame::new();
        assert_eq!(frame.frame_size(), 0);
    }
}
