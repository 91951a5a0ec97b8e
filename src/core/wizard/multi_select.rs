//! Toggle semantics for multi-select fields.

/// Return a new collection with `value` removed if present, appended otherwise.
///
/// Removal keeps the order of the remaining entries. The input is never
/// modified, so callers can compare old and new collections to detect change.
pub fn toggle(collection: &[String], value: &str) -> Vec<String> {
    if collection.iter().any(|item| item == value) {
        collection
            .iter()
            .filter(|item| item.as_str() != value)
            .cloned()
            .collect()
    } else {
        let mut next = Vec::with_capacity(collection.len() + 1);
        next.extend_from_slice(collection);
        next.push(value.to_string());
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let once = toggle(&[], "React");
        assert_eq!(once, owned(&["React"]));
        assert!(toggle(&once, "React").is_empty());
    }

    #[test]
    fn test_removal_keeps_order() {
        let start = owned(&["Go", "React", "Rust", "Vue"]);
        assert_eq!(toggle(&start, "React"), owned(&["Go", "Rust", "Vue"]));
    }

    #[test]
    fn test_append_goes_to_end() {
        let start = owned(&["Go", "Rust"]);
        assert_eq!(toggle(&start, "Vue"), owned(&["Go", "Rust", "Vue"]));
        // Input untouched
        assert_eq!(start, owned(&["Go", "Rust"]));
    }
}
