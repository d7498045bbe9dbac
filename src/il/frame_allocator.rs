use super::tac::Address;

/// Slot width in bytes for locals and temporaries.
const SLOT_SIZE: i64 = 8;

/// Hands out frame offsets for one function. Declared locals and generated
/// temporaries draw from the same monotonic counter, so no two entities in a
/// function scope can ever share an offset.
pub struct FrameAllocator {
    next_offset: i64,
}
impl FrameAllocator {
    pub fn new() -> Self {
        Self { next_offset: 0 }
    }

    /// Allocates a slot for a fresh temporary.
    pub fn next_temp(&mut self) -> Address {
        self.next_slot()
    }

    /// Allocates a slot for a declared local variable.
    pub fn alloc_local(&mut self) -> Address {
        self.next_slot()
    }

    /// The total frame size claimed so far, in bytes.
    pub fn frame_size(&self) -> i64 {
        self.next_offset
    }

    fn next_slot(&mut self) -> Address {
        let address = Address::local(self.next_offset);
        self.next_offset += SLOT_SIZE;
        address
    }
}
impl Default for FrameAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn temps_advance_by_slot_size() {
        let mut frame = FrameAllocator::new();

        assert_eq!("local:0", frame.next_temp().to_string());
        assert_eq!("local:8", frame.next_temp().to_string());
        assert_eq!(16, frame.frame_size());
    }

    #[test]
    fn locals_and_temps_never_collide() {
        let mut frame = FrameAllocator::new();
        let mut seen = HashSet::new();

        for step in 0..20 {
            let address = if step % 3 == 0 {
                frame.alloc_local()
            } else {
                frame.next_temp()
            };
            assert!(seen.insert(address.to_string()));
        }
    }
}
