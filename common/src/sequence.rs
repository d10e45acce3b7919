//! Ordered sequence utilities.

use derive_more::{Display, Error};

/// Moves the element at the `from` index of the provided `items` to the `to`
/// index, shifting the elements in between.
///
/// All the other elements keep their relative order.
///
/// # Errors
///
/// Errors if any of the indices is out of bounds. The `items` are left
/// untouched in such case.
pub fn reorder<T>(
    items: &mut Vec<T>,
    from: usize,
    to: usize,
) -> Result<(), OutOfBounds> {
    let len = items.len();
    if from >= len || to >= len {
        return Err(OutOfBounds { from, to, len });
    }
    if from != to {
        let item = items.remove(from);
        items.insert(to, item);
    }
    Ok(())
}

/// Error of [`reorder`]ing with an index out of bounds.
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
#[display("cannot move item {from} to {to} in a sequence of {len} items")]
pub struct OutOfBounds {
    /// Index the item was requested to be moved from.
    pub from: usize,

    /// Index the item was requested to be moved to.
    pub to: usize,

    /// Length of the sequence.
    pub len: usize,
}

#[cfg(test)]
mod spec {
    use super::{reorder, OutOfBounds};

    #[test]
    fn moves_item_to_front() {
        let mut items = vec!['a', 'b', 'c', 'd', 'e'];

        reorder(&mut items, 2, 0).unwrap();

        assert_eq!(items, ['c', 'a', 'b', 'd', 'e']);
    }

    #[test]
    fn moves_item_to_back() {
        let mut items = vec!['a', 'b', 'c', 'd', 'e'];

        reorder(&mut items, 1, 4).unwrap();

        assert_eq!(items, ['a', 'c', 'd', 'e', 'b']);
    }

    #[test]
    fn same_index_is_noop() {
        let mut items = vec!['a', 'b', 'c'];

        reorder(&mut items, 1, 1).unwrap();

        assert_eq!(items, ['a', 'b', 'c']);
    }

    #[test]
    fn rejects_out_of_bounds() {
        let mut items = vec!['a', 'b', 'c'];

        assert_eq!(
            reorder(&mut items, 3, 0),
            Err(OutOfBounds {
                from: 3,
                to: 0,
                len: 3,
            }),
        );
        assert!(reorder(&mut items, 0, 3).is_err());
        assert_eq!(items, ['a', 'b', 'c']);

        assert!(reorder(&mut Vec::<char>::new(), 0, 0).is_err());
    }
}
