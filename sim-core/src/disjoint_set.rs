/// Index-based union-find over `0..len`.
///
/// Every element starts as its own root. [`DisjointSet::find`] compresses
/// the path it walks, so repeated lookups stay cheap. Which root survives a
/// union is decided by the caller through [`DisjointSet::link`], since the
/// narrow phase picks winners by body mass rather than by rank.
///
/// The buffer is meant to be reused between clusters: call
/// [`DisjointSet::reset`] to resize it and turn every element back into a
/// singleton without reallocating.
#[derive(Debug, Default)]
pub struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    /// Creates a set of `len` singletons.
    pub fn with_len(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
        }
    }

    /// Resizes to `len` elements and makes each of them a singleton again.
    pub fn reset(&mut self, len: usize) {
        self.parent.clear();
        self.parent.extend(0..len);
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Returns the root of `x`, pointing every element on the way directly
    /// at it.
    ///
    /// ### Panics
    /// Panics if `x` is out of bounds.
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        let mut cur = x;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    /// Makes `root` the parent of `child`.
    ///
    /// Both must currently be roots; linking from a non-root would silently
    /// detach the rest of its set.
    ///
    /// ### Panics
    /// Panics if either index is out of bounds, and in debug builds if either
    /// is not a root.
    pub fn link(&mut self, child: usize, root: usize) {
        debug_assert_eq!(self.parent[child], child, "link from a non-root");
        debug_assert_eq!(self.parent[root], root, "link to a non-root");
        self.parent[child] = root;
    }

    /// `true` if `a` and `b` belong to the same set.
    pub fn same_set(&mut self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_len_starts_with_singletons() {
        let mut set = DisjointSet::with_len(4);
        assert_eq!(set.len(), 4);
        for i in 0..4 {
            assert_eq!(set.find(i), i);
        }
    }

    #[test]
    fn link_merges_sets_under_the_chosen_root() {
        let mut set = DisjointSet::with_len(4);
        set.link(0, 2);
        set.link(3, 1);

        assert_eq!(set.find(0), 2);
        assert_eq!(set.find(3), 1);
        assert!(set.same_set(0, 2));
        assert!(!set.same_set(0, 3));

        let (a, b) = (set.find(0), set.find(3));
        set.link(a, b);
        assert!(set.same_set(0, 3));
        assert_eq!(set.find(2), 1);
    }

    #[test]
    fn find_compresses_long_chains() {
        let mut set = DisjointSet::with_len(5);
        // 0 -> 1 -> 2 -> 3 -> 4
        for i in 0..4 {
            set.link(i, i + 1);
        }

        assert_eq!(set.find(0), 4);
        for i in 0..4 {
            assert_eq!(set.parent[i], 4);
        }
    }

    #[test]
    fn reset_resizes_and_clears() {
        let mut set = DisjointSet::with_len(3);
        set.link(0, 1);

        set.reset(3);
        assert!(!set.same_set(0, 1));

        set.reset(6);
        assert_eq!(set.len(), 6);
        assert_eq!(set.find(5), 5);

        set.reset(0);
        assert!(set.is_empty());
    }

    #[test]
    #[should_panic]
    fn find_panics_out_of_bounds() {
        let mut set = DisjointSet::with_len(2);
        set.find(2);
    }
}
