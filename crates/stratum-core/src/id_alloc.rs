use std::collections::HashSet;

/// Hands out identifiers shared by objects, snapshots, and frames. All three
/// kinds are drawn from one counter so a value handed out for one kind is
/// guaranteed never to collide with a value handed out for another.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next: u64,
    allocated: HashSet<u64>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next free id, or reserve a caller-supplied one.
    ///
    /// Panics if `required` names an id already handed out by this
    /// allocator — reusing an id across objects, snapshots, or frames is a
    /// programming error, not a recoverable one.
    pub fn allocate(&mut self, required: Option<u64>) -> u64 {
        match required {
            Some(id) => {
                if !self.allocated.insert(id) {
                    panic!("duplicate id: {id} has already been allocated");
                }
                if id >= self.next {
                    self.next = id + 1;
                }
                id
            }
            None => {
                let mut id = self.next;
                while self.allocated.contains(&id) {
                    id += 1;
                }
                self.allocated.insert(id);
                self.next = id + 1;
                id
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_allocation_never_repeats() {
        let mut alloc = IdAllocator::new();
        let a = alloc.allocate(None);
        let b = alloc.allocate(None);
        assert_ne!(a, b);
    }

    #[test]
    fn required_id_is_reserved_against_future_allocation() {
        let mut alloc = IdAllocator::new();
        let reserved = alloc.allocate(Some(5));
        assert_eq!(reserved, 5);
        let next = alloc.allocate(None);
        assert_ne!(next, 5);
        assert!(next > 5);
    }

    #[test]
    #[should_panic(expected = "duplicate id")]
    fn reusing_a_required_id_panics() {
        let mut alloc = IdAllocator::new();
        alloc.allocate(Some(1));
        alloc.allocate(Some(1));
    }
}
