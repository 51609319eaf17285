use crate::Item;

/// Search already-fetched items for a named resource. Matching is exact after
/// trimming surrounding whitespace on both sides, and case-sensitive. Pure and
/// local: no further network calls.
pub fn find_named_item<'a>(items: &'a [Item], target: &str) -> Option<&'a Item> {
    let target = target.trim();
    items.iter().find(|item| item.name.trim() == target)
}
