//! In-order iterators over a [`BalancedTree`](super::BalancedTree).
//!
//! All iterators keep an explicit stack of pending ancestors,
//! so their memory is bounded by the tree height.

use std::borrow::Borrow;
use std::fmt;
use std::iter::FusedIterator;
use std::ops::{Bound, RangeBounds};
use std::ptr;

use super::{Link, Node};

/// An iterator over the entries of a tree in ascending key order.
pub struct Iter<'a, K, V> {
    stack: Vec<&'a Node<K, V>>,
    remaining: usize,
}

/// An iterator over a sub-range of entries of a tree in ascending key order.
pub struct Range<'a, K, V> {
    stack: Vec<&'a Node<K, V>>,
    last: Option<&'a Node<K, V>>,
}

/// An owning iterator over the entries of a tree in ascending key order.
pub struct IntoIter<K, V> {
    stack: Vec<Box<Node<K, V>>>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(super) fn new(root: &'a Link<K, V>, len: usize) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            remaining: len,
        };
        iter.push_left(root.as_deref());
        iter
    }

    fn push_left(&mut self, mut current: Option<&'a Node<K, V>>) {
        while let Some(node) = current {
            self.stack.push(node);
            current = node.left.as_deref();
        }
    }
}

impl<'a, K, V> Range<'a, K, V> {
    pub(super) fn new<Q, R>(root: &'a Link<K, V>, range: R) -> Self
    where
        K: Borrow<Q> + Ord,
        R: RangeBounds<Q>,
        Q: Ord + ?Sized,
    {
        // Path to the smallest key within the lower bound,
        // subtrees left of it are pruned
        let mut stack = Vec::new();
        let mut current = root.as_deref();
        while let Some(node) = current {
            if above_start(range.start_bound(), node.key.borrow()) {
                stack.push(node);
                current = node.left.as_deref();
            } else {
                current = node.right.as_deref();
            }
        }

        // Largest key within the upper bound, iteration stops there
        let mut last = None;
        let mut current = root.as_deref();
        while let Some(node) = current {
            if below_end(range.end_bound(), node.key.borrow()) {
                last = Some(node);
                current = node.right.as_deref();
            } else {
                current = node.left.as_deref();
            }
        }

        // Inverted or empty range
        let non_empty = match (stack.last(), last) {
            (Some(first), Some(last)) => first.key <= last.key,
            _ => false,
        };
        if non_empty {
            Self { stack, last }
        } else {
            Self {
                stack: Vec::new(),
                last: None,
            }
        }
    }

    fn push_left(&mut self, mut current: Option<&'a Node<K, V>>) {
        while let Some(node) = current {
            self.stack.push(node);
            current = node.left.as_deref();
        }
    }
}

impl<K, V> IntoIter<K, V> {
    pub(super) fn new(root: Link<K, V>, len: usize) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            remaining: len,
        };
        iter.push_left(root);
        iter
    }

    fn push_left(&mut self, mut current: Link<K, V>) {
        while let Some(mut node) = current {
            current = node.left.take();
            self.stack.push(node);
        }
    }
}

fn above_start<Q: Ord + ?Sized>(bound: Bound<&Q>, key: &Q) -> bool {
    match bound {
        Bound::Included(start) => key >= start,
        Bound::Excluded(start) => key > start,
        Bound::Unbounded => true,
    }
}

fn below_end<Q: Ord + ?Sized>(bound: Bound<&Q>, key: &Q) -> bool {
    match bound {
        Bound::Included(end) => key <= end,
        Bound::Excluded(end) => key < end,
        Bound::Unbounded => true,
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left(node.right.as_deref());
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<'a, K, V> Iterator for Range<'a, K, V> {
    type Item = (&'a K, &'a V);
    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if self.last.is_some_and(|last| ptr::eq(node, last)) {
            self.stack.clear();
            self.last = None;
        } else {
            self.push_left(node.right.as_deref());
        }
        Some((&node.key, &node.value))
    }
}

impl<K, V> FusedIterator for Range<'_, K, V> {}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);
    fn next(&mut self) -> Option<Self::Item> {
        let mut node = self.stack.pop()?;
        self.push_left(node.right.take());
        self.remaining -= 1;
        let node = *node;
        Some((node.key, node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> FusedIterator for IntoIter<K, V> {}

// Auto derived clone seems to have an invalid type bound of K: Clone, V: Clone
impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}

impl<K, V> Clone for Range<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
            last: self.last,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Range<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}
