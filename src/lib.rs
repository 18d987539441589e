//! weakcache: memoization keyed by paths of object identities.
//!
//! A [`WeakMemo`] maps an ordered sequence of key objects (`Rc<T>` / `Arc<T>`)
//! to a computed value. The cache only holds weak references to its keys:
//! once any key in a path is dropped, the entry for that path and everything
//! nested under it become reclaimable, so a long-lived cache indexed by
//! short-lived objects does not leak.
//!
//! ```
//! use std::rc::Rc;
//!
//! use weakcache::{WeakMemo, path};
//!
//! let memo = WeakMemo::new();
//! let first = Rc::new(());
//! let second = Rc::new(());
//! let mut next = 0;
//! let mut tagged = || {
//!     next += 1;
//!     Rc::new(next)
//! };
//!
//! let a = memo.resolve(&mut tagged, path![first, second]).unwrap();
//! let b = memo.resolve(&mut tagged, path![first, second]).unwrap();
//! let c = memo.resolve(&mut tagged, path![second, first]).unwrap();
//! assert!(Rc::ptr_eq(&a, &b));
//! assert!(!Rc::ptr_eq(&a, &c));
//! ```
//!
//! See [`ds::trie`] for the underlying structure and its reclamation rules.

pub mod builder;
pub mod ds;
pub mod error;
pub mod memo;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod prelude;
pub mod traits;

pub use error::EmptyPathError;
pub use memo::WeakMemo;
pub use traits::KeyObject;
