//! Positional moves shared by field and step reordering

/// Move the item at `from` to position `to`, shifting the items in between.
///
/// Returns `false` and leaves the list untouched when `from == to` or either index is
/// outside the list.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from == to || from >= items.len() || to >= items.len() {
        return false;
    }
    let item = items.remove(from);
    items.insert(to, item);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_move_forward_and_back() {
        let mut items = vec!['a', 'b', 'c', 'd'];
        assert!(move_item(&mut items, 0, 2));
        assert_eq!(items, ['b', 'c', 'a', 'd']);
        assert!(move_item(&mut items, 3, 0));
        assert_eq!(items, ['d', 'b', 'c', 'a']);
    }

    #[test]
    fn test_noop_cases() {
        let mut items = vec![1, 2, 3];
        assert!(!move_item(&mut items, 1, 1));
        assert!(!move_item(&mut items, 0, 3));
        assert!(!move_item(&mut items, 5, 0));
        assert_eq!(items, [1, 2, 3]);
    }

    proptest! {
        #[test]
        fn prop_move_is_a_permutation(len in 0usize..12, from in 0usize..14, to in 0usize..14) {
            let original: Vec<usize> = (0..len).collect();
            let mut moved = original.clone();
            let changed = move_item(&mut moved, from, to);

            let mut sorted = moved.clone();
            sorted.sort_unstable();
            prop_assert_eq!(&sorted, &original);
            if changed {
                prop_assert_eq!(moved[to], from);
            } else {
                prop_assert_eq!(&moved, &original);
            }
        }
    }
}
