//! The AVL tree backing [`BalancedTree`].

use std::borrow::Borrow;
use std::cmp::{self, Ordering};
use std::fmt;
use std::mem;
use std::ops::{Bound, RangeBounds};

use crate::error::TreeError;

mod iter;
pub use iter::{IntoIter, Iter, Range};

/// An ordered map implemented with an AVL tree.
///
/// The defaults make it a map from `String` keys to `i64` values;
/// lookups accept any borrowed form of the key, e.g. `&str`.
///
/// ```
/// use balanced_tree::BalancedTree;
/// let mut tree: BalancedTree = BalancedTree::new();
/// assert!(tree.insert("F".to_string(), 70));
/// assert!(!tree.insert("F".to_string(), 71));
/// assert_eq!(tree.get("F"), Some(&70));
/// assert!(tree.remove("F"));
/// assert!(tree.is_empty());
/// ```
pub struct BalancedTree<K = String, V = i64> {
    root: Link<K, V>,
    num_nodes: usize,
}

type Link<K, V> = Option<Box<Node<K, V>>>;

struct Node<K, V> {
    key: K,
    value: V,
    left: Link<K, V>,
    right: Link<K, V>,
    height: usize,
}

impl<K, V> BalancedTree<K, V> {
    /// Creates an empty tree.
    /// No memory is allocated until the first item is inserted.
    pub fn new() -> Self {
        Self {
            root: None,
            num_nodes: 0,
        }
    }

    /// Returns true if the tree contains no elements.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of elements in the tree.
    pub fn len(&self) -> usize {
        self.num_nodes
    }

    /// Same as [`len`](Self::len).
    pub fn size(&self) -> usize {
        self.num_nodes
    }

    /// Returns the height of the root node.
    /// A single leaf has height 0, an empty tree has height -1.
    pub fn height(&self) -> isize {
        Node::height_of(&self.root)
    }

    /// Clears the tree, deallocating all nodes.
    pub fn clear(&mut self) {
        self.root = None;
        self.num_nodes = 0;
    }

    /// Gets an iterator over the entries of the tree in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.root, self.num_nodes)
    }

    /// Returns all keys in ascending order.
    pub fn keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.iter().map(|(key, _)| key.clone()).collect()
    }

    /// Returns the entry with the smallest key.
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        let mut node = self.root.as_deref()?;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        Some((&node.key, &node.value))
    }

    /// Returns the entry with the largest key.
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        let mut node = self.root.as_deref()?;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        Some((&node.key, &node.value))
    }

    /// Restores the AVL condition at the subtree rooted in `link` and adjusts heights.
    /// Children must already be balanced, with a height difference of at most 2 between them.
    fn rebalance(link: &mut Link<K, V>) {
        let Some(node) = link.as_mut() else {
            return;
        };
        node.adjust_height();
        let balance = node.balance_factor();
        debug_assert!(balance.abs() <= 2);
        if balance > 1 {
            // Left-right case if the left child leans right
            let double = node
                .left
                .as_ref()
                .is_some_and(|left| left.balance_factor() < 0);
            if double {
                Self::rotate_left(&mut node.left);
            }
            Self::rotate_right(link);
        } else if balance < -1 {
            // Right-left case if the right child leans left
            let double = node
                .right
                .as_ref()
                .is_some_and(|right| right.balance_factor() > 0);
            if double {
                Self::rotate_right(&mut node.right);
            }
            Self::rotate_left(link);
        }
    }

    fn rotate_left(link: &mut Link<K, V>) {
        if let Some(mut node) = link.take() {
            match node.right.take() {
                Some(mut right) => {
                    node.right = right.left.take();
                    node.adjust_height();
                    right.left = Some(node);
                    right.adjust_height();
                    *link = Some(right);
                }
                None => *link = Some(node),
            }
        }
    }

    fn rotate_right(link: &mut Link<K, V>) {
        if let Some(mut node) = link.take() {
            match node.left.take() {
                Some(mut left) => {
                    node.left = left.right.take();
                    node.adjust_height();
                    left.right = Some(node);
                    left.adjust_height();
                    *link = Some(left);
                }
                None => *link = Some(node),
            }
        }
    }

    /// Unlinks the leftmost node below `link` and rebalances the path up to `link`.
    fn remove_min(link: &mut Link<K, V>) -> Option<(K, V)> {
        let node = link.as_mut()?;
        if node.left.is_some() {
            let min = Self::remove_min(&mut node.left);
            Self::rebalance(link);
            min
        } else {
            let node = link.take()?;
            let Node {
                key, value, right, ..
            } = *node;
            *link = right;
            Some((key, value))
        }
    }

    /// Removes the node at `link` and returns its former entry.
    /// The caller rebalances `link` afterwards.
    fn unlink_node(link: &mut Link<K, V>) -> Option<(K, V)> {
        let node = link.as_mut()?;
        if node.left.is_some() && node.right.is_some() {
            // Node keeps its position and takes over the payload of its in-order successor
            let (key, value) = Self::remove_min(&mut node.right)?;
            let key = mem::replace(&mut node.key, key);
            let value = mem::replace(&mut node.value, value);
            Some((key, value))
        } else {
            // Stem or leaf, replace by its only child (if any)
            let node = link.take()?;
            let Node {
                key,
                value,
                left,
                right,
                ..
            } = *node;
            *link = left.or(right);
            Some((key, value))
        }
    }

    #[cfg(any(test, feature = "consistency_check"))]
    fn preorder<'a, F: FnMut(&'a Node<K, V>)>(&'a self, mut f: F) {
        let mut stack: Vec<&Node<K, V>> = self.root.as_deref().into_iter().collect();
        while let Some(node) = stack.pop() {
            f(node);
            stack.extend(node.right.as_deref());
            stack.extend(node.left.as_deref());
        }
    }

    /// Renders the tree shape in pre-order, e.g. `K(F,X)` or `F(,K)`.
    #[cfg(test)]
    pub(crate) fn shape(&self) -> String
    where
        K: fmt::Display,
    {
        fn render<K: fmt::Display, V>(link: &Link<K, V>, out: &mut String) {
            if let Some(node) = link {
                out.push_str(&node.key.to_string());
                if node.left.is_some() || node.right.is_some() {
                    out.push('(');
                    render(&node.left, out);
                    out.push(',');
                    render(&node.right, out);
                    out.push(')');
                }
            }
        }
        let mut out = String::new();
        render(&self.root, &mut out);
        out
    }
}

impl<K: Ord, V> BalancedTree<K, V> {
    /// Inserts a key-value pair into the tree.
    /// Returns false and leaves the tree untouched if the key is already present.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        let inserted = Self::insert_at(&mut self.root, key, value);
        if inserted {
            self.num_nodes += 1;
        }
        inserted
    }

    /// Inserts a key-value pair into the tree, reporting an existing key as an error.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<(), TreeError> {
        if self.insert(key, value) {
            Ok(())
        } else {
            Err(TreeError::DuplicateKey)
        }
    }

    /// Removes a key from the tree.
    /// Returns whether the key was previously in the tree.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.remove_entry(key).is_some()
    }

    /// Removes a key from the tree.
    /// Returns the stored key-value pair if the key was previously in the tree.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let entry = Self::remove_at(&mut self.root, key)?;
        debug_assert!(self.num_nodes >= 1);
        self.num_nodes -= 1;
        Some(entry)
    }

    /// Returns true if the tree contains the key.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Returns a reference to the value corresponding to the key.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|node| &node.value)
    }

    /// Returns references to the key-value pair corresponding to the key.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|node| (&node.key, &node.value))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    /// Updating a value in place never changes the tree structure.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root.as_deref_mut();
        while let Some(node) = current {
            current = match key.cmp(node.key.borrow()) {
                Ordering::Equal => return Some(&mut node.value),
                Ordering::Less => node.left.as_deref_mut(),
                Ordering::Greater => node.right.as_deref_mut(),
            };
        }
        None
    }

    /// Replaces the value stored for an existing key and returns the previous one.
    /// Fails with [`TreeError::KeyNotFound`] without inserting if the key is absent.
    pub fn set_value<Q>(&mut self, key: &Q, value: V) -> Result<V, TreeError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let slot = self.get_mut(key).ok_or(TreeError::KeyNotFound)?;
        Ok(mem::replace(slot, value))
    }

    /// Gets an iterator over a sub-range of entries in ascending key order.
    ///
    /// An empty or inverted range yields no entries.
    pub fn range<Q, R>(&self, range: R) -> Range<'_, K, V>
    where
        K: Borrow<Q>,
        R: RangeBounds<Q>,
        Q: Ord + ?Sized,
    {
        Range::new(&self.root, range)
    }

    /// Returns the values of all keys within `low..=high` in ascending key order.
    pub fn find_range<Q>(&self, low: &Q, high: &Q) -> Vec<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
        V: Clone,
    {
        self.range::<Q, _>((Bound::Included(low), Bound::Included(high)))
            .map(|(_, value)| value.clone())
            .collect()
    }

    /// Asserts that the internal tree structure is consistent.
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self) {
        let mut num_nodes = 0;
        self.preorder(|node| {
            let left_height = Node::height_of(&node.left);
            let right_height = Node::height_of(&node.right);

            // Check order against child nodes
            if let Some(left) = node.left.as_deref() {
                assert!(left.key < node.key);
            }
            if let Some(right) = node.right.as_deref() {
                assert!(right.key > node.key);
            }

            // Check height
            assert_eq!(
                node.height as isize,
                1 + cmp::max(left_height, right_height)
            );

            // Check AVL condition (nearly balance)
            assert!(left_height <= right_height + 1);
            assert!(right_height <= left_height + 1);

            num_nodes += 1;
        });

        // Check number of nodes
        assert_eq!(num_nodes, self.num_nodes);

        // Check global order
        let mut iter = self.iter();
        if let Some((mut prev, _)) = iter.next() {
            for (key, _) in iter {
                assert!(prev < key);
                prev = key;
            }
        }
    }

    fn find<Q>(&self, key: &Q) -> Option<&Node<K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match key.cmp(node.key.borrow()) {
                Ordering::Equal => return Some(node),
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
            };
        }
        None
    }

    fn insert_at(link: &mut Link<K, V>, key: K, value: V) -> bool {
        let node = match link {
            None => {
                *link = Some(Node::create(key, value));
                return true;
            }
            Some(node) => node,
        };
        let inserted = match key.cmp(&node.key) {
            Ordering::Equal => return false,
            Ordering::Less => Self::insert_at(&mut node.left, key, value),
            Ordering::Greater => Self::insert_at(&mut node.right, key, value),
        };
        if inserted {
            Self::rebalance(link);
        }
        inserted
    }

    fn remove_at<Q>(link: &mut Link<K, V>, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = link.as_mut()?;
        let removed = match key.cmp(node.key.borrow()) {
            Ordering::Less => Self::remove_at(&mut node.left, key),
            Ordering::Greater => Self::remove_at(&mut node.right, key),
            Ordering::Equal => Self::unlink_node(link),
        };
        if removed.is_some() {
            Self::rebalance(link);
        }
        removed
    }
}

impl<K, V> Node<K, V> {
    fn create(key: K, value: V) -> Box<Self> {
        Box::new(Node {
            key,
            value,
            left: None,
            right: None,
            height: 0,
        })
    }

    fn height_of(link: &Link<K, V>) -> isize {
        match link {
            None => -1,
            Some(node) => node.height as isize,
        }
    }

    fn adjust_height(&mut self) {
        let left_height = Self::height_of(&self.left);
        let right_height = Self::height_of(&self.right);
        self.height = (1 + cmp::max(left_height, right_height)) as usize;
    }

    fn balance_factor(&self) -> isize {
        Self::height_of(&self.left) - Self::height_of(&self.right)
    }
}

impl<K: Clone, V: Clone> Node<K, V> {
    // Pre-order: the node itself, then its left and right subtrees
    fn copy(link: &Link<K, V>) -> Link<K, V> {
        link.as_ref().map(|node| {
            Box::new(Node {
                key: node.key.clone(),
                value: node.value.clone(),
                height: node.height,
                left: Self::copy(&node.left),
                right: Self::copy(&node.right),
            })
        })
    }
}

impl<K, V> Default for BalancedTree<K, V> {
    /// Creates an empty tree.
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, V: Clone> Clone for BalancedTree<K, V> {
    fn clone(&self) -> Self {
        Self {
            root: Node::copy(&self.root),
            num_nodes: self.num_nodes,
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.clear();
        self.root = Node::copy(&source.root);
        self.num_nodes = source.num_nodes;
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for BalancedTree<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq> Eq for BalancedTree<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for BalancedTree<K, V> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_map().entries(self.iter()).finish()
    }
}

/// Writes one `{key: value}` line per entry in ascending key order.
impl<K: fmt::Display, V: fmt::Display> fmt::Display for BalancedTree<K, V> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        for (key, value) in self {
            writeln!(fmt, "{{{key}: {value}}}")?;
        }
        Ok(())
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for BalancedTree<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

/// Keys already present keep their value, as with [`BalancedTree::insert`].
impl<K: Ord, V> Extend<(K, V)> for BalancedTree<K, V> {
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        iter.into_iter().for_each(move |(key, value)| {
            self.insert(key, value);
        });
    }
}

impl<'a, K, V> IntoIterator for &'a BalancedTree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> IntoIterator for BalancedTree<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;
    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.root, self.num_nodes)
    }
}
