//! Stable entity ids.

/// Generates `prefix_N` ids, monotonically increasing.
///
/// Ids are the only correlation key between a structure's entities and the
/// highlight state; they survive in-place value changes.
#[derive(Debug, Clone)]
pub struct IdSequence {
    prefix: &'static str,
    next: u64,
}

impl IdSequence {
    pub const fn new(prefix: &'static str) -> Self {
        Self { prefix, next: 0 }
    }

    /// Allocate the next id.
    pub fn next_id(&mut self) -> String {
        let id = format!("{}_{}", self.prefix, self.next);
        self.next += 1;
        id
    }

    /// Number of ids handed out so far.
    pub fn issued(&self) -> u64 {
        self.next
    }

    /// Restart numbering from zero.
    pub fn reset(&mut self) {
        self.next = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_sequential() {
        let mut ids = IdSequence::new("bst");
        assert_eq!(ids.next_id(), "bst_0");
        assert_eq!(ids.next_id(), "bst_1");
        assert_eq!(ids.issued(), 2);

        ids.reset();
        assert_eq!(ids.next_id(), "bst_0");
    }
}
