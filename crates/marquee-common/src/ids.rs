//! Sequential entry ids.
//!
//! Entry ids are re-derived on every scan. They are only stable for a given
//! directory listing, so nothing persistent may key on them.

use crate::types::Category;

/// Monotonic id generator producing `<prefix><n>` starting at 1.
#[derive(Debug, Clone)]
pub struct IdSequence {
    prefix: &'static str,
    next: u32,
}

impl IdSequence {
    /// Create a sequence with an explicit prefix.
    pub fn new(prefix: &'static str) -> Self {
        Self { prefix, next: 1 }
    }

    /// Create a sequence using the category's id prefix.
    pub fn for_category(category: Category) -> Self {
        Self::new(category.id_prefix())
    }

    /// Return the next id and advance.
    pub fn next_id(&mut self) -> String {
        let id = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_is_monotonic() {
        let mut ids = IdSequence::for_category(Category::Shows);
        assert_eq!(ids.next_id(), "tv1");
        assert_eq!(ids.next_id(), "tv2");
        assert_eq!(ids.next_id(), "tv3");
    }

    #[test]
    fn test_sequence_continues_across_passes() {
        fn take_two(ids: &mut IdSequence) -> Vec<String> {
            vec![ids.next_id(), ids.next_id()]
        }

        let mut ids = IdSequence::new("d");
        let active = take_two(&mut ids);
        let archived = take_two(&mut ids);
        assert_eq!(active, vec!["d1", "d2"]);
        assert_eq!(archived, vec!["d3", "d4"]);
    }
}
