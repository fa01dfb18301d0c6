//! Reordering inside a possibly filtered view of a sequence.

/// Moves the view element at `from` so that it ends up at `to`.
///
/// `slots[k]` is the underlying index of the `k`-th view element and must be
/// strictly increasing. Underlying elements outside `slots` keep their
/// positions; only the order of the viewed subsequence changes.
/// Callers bounds-check `from` and `to` against `slots.len()`.
pub(crate) fn move_in_view<T>(items: &mut [T], slots: &[usize], from: usize, to: usize) {
    if from < to {
        for k in from..to {
            items.swap(slots[k], slots[k + 1]);
        }
    } else {
        for k in (to..from).rev() {
            items.swap(slots[k], slots[k + 1]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::move_in_view;

    #[test]
    fn unfiltered_move_forward_and_backward() {
        let mut items = vec!['a', 'b', 'c', 'd'];
        let all = [0, 1, 2, 3];
        move_in_view(&mut items, &all, 0, 2);
        assert_eq!(items, vec!['b', 'c', 'a', 'd']);

        move_in_view(&mut items, &all, 3, 0);
        assert_eq!(items, vec!['d', 'b', 'c', 'a']);
    }

    #[test]
    fn filtered_move_keeps_other_slots() {
        let mut items = vec!["A1", "B2", "C1", "D2", "E1"];
        move_in_view(&mut items, &[0, 2, 4], 2, 0);
        assert_eq!(items, vec!["E1", "B2", "A1", "D2", "C1"]);
    }

    #[test]
    fn same_position_is_noop() {
        let mut items = vec![1, 2, 3];
        move_in_view(&mut items, &[0, 1, 2], 1, 1);
        assert_eq!(items, vec![1, 2, 3]);
    }
}
