use std::collections::BTreeSet;

/// Type alias for sets, we use this to hide which type of `HashSet` we are actually using.
pub type Set<S> = fxhash::FxHashSet<S>;
/// Type alias for maps, we use this to hide which type of `HashMap` we are actually using.
pub type Map<K, V> = fxhash::FxHashMap<K, V>;

/// A set that remembers the order of insertion. Every element is associated with its
/// position, which makes this the type of choice for interning values into dense indices.
pub type IndexedSet<S> = indexmap::IndexSet<S, fxhash::FxBuildHasher>;
/// A map that iterates its entries in the order in which the keys were first inserted.
pub type IndexedMap<K, V> = indexmap::IndexMap<K, V, fxhash::FxBuildHasher>;

/// A partition is a different view on an equivalence relation, by grouping elements of
/// type `I` into their respective classes under the relation.
///
/// The classes are kept in a canonical order (sorted by their least element), so two
/// partitions compare equal precisely if they group the same elements together, no matter
/// in which order the classes were given.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Partition<I: Ord>(Vec<BTreeSet<I>>);

impl<I: Ord> std::ops::Deref for Partition<I> {
    type Target = [BTreeSet<I>];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a, I: Ord> IntoIterator for &'a Partition<I> {
    type Item = &'a BTreeSet<I>;
    type IntoIter = std::slice::Iter<'a, BTreeSet<I>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<I: Ord> Partition<I> {
    /// Builds a new partition from an iterator that yields iterators which yield elements of
    /// type `I`. Empty classes are dropped.
    pub fn new<X: IntoIterator<Item = I>, Y: IntoIterator<Item = X>>(iter: Y) -> Self {
        let mut classes: Vec<BTreeSet<I>> = iter
            .into_iter()
            .map(|it| it.into_iter().collect::<BTreeSet<_>>())
            .filter(|class| !class.is_empty())
            .collect();
        classes.sort_by(|x, y| x.first().cmp(&y.first()));
        Self(classes)
    }

    /// Returns the size of the partition, i.e. the number of classes.
    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// Returns the position of the class containing `element`, if any.
    pub fn class_of(&self, element: &I) -> Option<usize> {
        self.0.iter().position(|class| class.contains(element))
    }

    /// Returns `true` iff `left` and `right` both occur and sit in the same class.
    pub fn same_class(&self, left: &I, right: &I) -> bool {
        self.0
            .iter()
            .any(|class| class.contains(left) && class.contains(right))
    }

    /// Returns the total number of elements over all classes.
    pub fn element_count(&self) -> usize {
        self.0.iter().map(|class| class.len()).sum()
    }
}

impl<I: Ord> From<Vec<BTreeSet<I>>> for Partition<I> {
    fn from(value: Vec<BTreeSet<I>>) -> Self {
        Self::new(value)
    }
}

impl<I: Ord> FromIterator<Vec<I>> for Partition<I> {
    fn from_iter<T: IntoIterator<Item = Vec<I>>>(iter: T) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::Partition;

    #[test]
    fn partition_equality_ignores_order() {
        let left = Partition::new([vec![3, 1], vec![2], vec![]]);
        let right = Partition::new([vec![2], vec![1, 3]]);
        assert_eq!(left, right);
        assert_eq!(left.size(), 2);
        assert_eq!(left.element_count(), 3);
        assert_eq!(left.class_of(&3), Some(0));
        assert!(left.same_class(&1, &3));
        assert!(!left.same_class(&1, &2));
        assert_eq!(left.class_of(&7), None);
    }
}
