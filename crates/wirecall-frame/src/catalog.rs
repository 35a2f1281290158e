/// Fixed mapping from command identifier to exact message length.
///
/// One entry per identifier that can appear on the wire, with the
/// total encoded length in bytes (identifier byte included). Built at
/// compile time by the stub generator output; immutable at runtime.
pub struct CommandCatalog {
    lengths: [u16; 256],
}

impl CommandCatalog {
    /// Build a catalog from `(identifier, wire length)` pairs.
    ///
    /// Lengths include the identifier byte, so every valid entry is at
    /// least 1. Duplicate identifiers and zero lengths are generator
    /// bugs and panic at construction (in `const` contexts, at compile
    /// time).
    pub const fn new(entries: &[(u8, u16)]) -> Self {
        let mut lengths = [0u16; 256];
        let mut i = 0;
        while i < entries.len() {
            let (id, len) = entries[i];
            assert!(len >= 1, "message length must include the identifier byte");
            assert!(lengths[id as usize] == 0, "duplicate command identifier");
            lengths[id as usize] = len;
            i += 1;
        }
        Self { lengths }
    }

    /// Total wire length for `id`, or `None` for unknown identifiers.
    pub fn wire_len(&self, id: u8) -> Option<usize> {
        match self.lengths[id as usize] {
            0 => None,
            len => Some(len as usize),
        }
    }

    /// Whether `id` can appear on the wire.
    pub fn contains(&self, id: u8) -> bool {
        self.lengths[id as usize] != 0
    }

    /// All `(identifier, wire length)` entries, in identifier order.
    pub fn entries(&self) -> impl Iterator<Item = (u8, usize)> + '_ {
        self.lengths
            .iter()
            .enumerate()
            .filter(|(_, &len)| len != 0)
            .map(|(id, &len)| (id as u8, len as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: CommandCatalog = CommandCatalog::new(&[(3, 5), (5, 89)]);

    #[test]
    fn known_identifiers_resolve() {
        assert_eq!(CATALOG.wire_len(3), Some(5));
        assert_eq!(CATALOG.wire_len(5), Some(89));
        assert!(CATALOG.contains(3));
    }

    #[test]
    fn unknown_identifiers_are_rejected_not_guessed() {
        assert_eq!(CATALOG.wire_len(0), None);
        assert_eq!(CATALOG.wire_len(4), None);
        assert_eq!(CATALOG.wire_len(255), None);
        assert!(!CATALOG.contains(4));
    }

    #[test]
    fn entries_iterate_in_identifier_order() {
        let entries: Vec<_> = CATALOG.entries().collect();
        assert_eq!(entries, vec![(3, 5), (5, 89)]);
    }

    #[test]
    #[should_panic(expected = "duplicate command identifier")]
    fn duplicate_identifier_panics() {
        let _ = CommandCatalog::new(&[(3, 5), (3, 7)]);
    }

    #[test]
    #[should_panic(expected = "identifier byte")]
    fn zero_length_panics() {
        let _ = CommandCatalog::new(&[(3, 0)]);
    }
}
