use super::tac::Address;

/// Hands out fresh label addresses. One allocator lives for the whole
/// compilation; labels are never recycled.
pub struct LabelAllocator {
    next: usize,
}
impl LabelAllocator {
    pub fn new() -> Self {
        Self { next: 0 }
    }

    /// Returns a fresh, unique label address.
    pub fn next_label(&mut self) -> Address {
        let label = Address::label(self.next);
        self.next += 1;
        label
    }
}
impl Default for LabelAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_label_generates_ascending_labels() {
        let mut labels = LabelAllocator::new();

        assert_eq!("label:0", labels.next_label().to_string());
        assert_eq!("label:1", labels.next_label().to_string());
        assert_eq!("label:2", labels.next_label().to_string());
    }

    #[test]
    fn fresh_allocator_restarts_numbering() {
        let mut first = LabelAllocator::new();
        first.next_label();
        first.next_label();

        let mut second = LabelAllocator::new();
        assert_eq!("label:0", second.next_label().to_string());
    }
}
