//! An ordered map from unique keys to values, implemented with an AVL tree.
//!
//! [`BalancedTree`] keeps the height balance of every node within one level after
//! each insertion and removal, so lookups, inserts and removals take O(log n).
//! Its default type parameters make it a map from `String` keys to `i64` values.
//!
//! ```
//! use balanced_tree::BalancedTree;
//!
//! let mut tree: BalancedTree = ["F", "K", "X", "C", "A"]
//!     .iter()
//!     .map(|key| (key.to_string(), key.as_bytes()[0] as i64))
//!     .collect();
//! assert_eq!(tree.keys(), ["A", "C", "F", "K", "X"]);
//! assert_eq!(tree.find_range("B", "K"), [67, 70, 75]);
//!
//! tree.set_value("A", 108).unwrap();
//! assert_eq!(tree.to_string().lines().next(), Some("{A: 108}"));
//! ```

mod error;
mod tree;

pub use error::TreeError;
pub use tree::{BalancedTree, IntoIter, Iter, Range};
