//! # Key Object Trait
//!
//! Everything the cache knows about a key goes through [`KeyObject`]: an
//! allocation identity to index by, and a way to obtain a non-owning handle
//! to store next to the entry.
//!
//! ## Implementors
//!
//! | Type            | Identity                  | Stored handle     |
//! |-----------------|---------------------------|-------------------|
//! | `Rc<T>`         | `Rc::as_ptr` address      | `rc::Weak<T>`     |
//! | `Arc<T>`        | `Arc::as_ptr` address     | `sync::Weak<T>`   |
//! | `&K`            | same as `K`               | same as `K`       |
//!
//! `T` must be `'static`: the stored handle is type-erased and outlives any
//! borrow, so `Rc<Node<'a>>` is not a key. Wrap borrowed data in an owned
//! type first.
//!
//! `T` may be unsized (`Rc<str>`, `Rc<dyn Trait>`). Plain values such as
//! integers or owned strings do not implement the trait, so a key path made
//! of non-reference values is a compile error rather than a runtime one:
//!
//! ```compile_fail
//! use weakcache::{WeakMemo, path};
//!
//! let memo: WeakMemo<u32> = WeakMemo::new();
//! let id = 42u64;
//! memo.resolve(|| 1, path![id]);
//! ```
//!
//! The trait is sealed. Other crates cannot implement it, so identities and
//! stored handles always come from a real shared allocation:
//!
//! ```compile_fail
//! use weakcache::ds::{KeyId, WeakKey};
//! use weakcache::traits::KeyObject;
//!
//! struct Plain(u64);
//!
//! impl KeyObject for Plain {
//!     fn key_id(&self) -> KeyId {
//!         unimplemented!()
//!     }
//!
//!     fn downgrade_key(&self) -> WeakKey {
//!         unimplemented!()
//!     }
//! }
//! ```
//!
//! ## Building paths
//!
//! Key paths are slices of `&dyn KeyObject`, so one path can mix key types.
//! The [`path!`](crate::path) macro performs the coercions:
//!
//! ```
//! use std::rc::Rc;
//! use std::sync::Arc;
//!
//! use weakcache::{WeakMemo, path};
//!
//! let schema = Rc::new("schema");
//! let table = Arc::new(vec![1, 2, 3]);
//!
//! let memo: WeakMemo<usize> = WeakMemo::new();
//! let rows = memo.resolve(|| table.len(), path![schema, table]).unwrap();
//! assert_eq!(rows, 3);
//! ```

use std::rc::Rc;
use std::sync::Arc;

use crate::ds::weak_key::{KeyId, WeakKey};

mod sealed {
    use std::rc::Rc;
    use std::sync::Arc;

    pub trait Sealed {}

    impl<T: ?Sized + 'static> Sealed for Rc<T> {}
    impl<T: ?Sized + 'static> Sealed for Arc<T> {}
    impl<K: Sealed + ?Sized> Sealed for &K {}
}

/// A reference-type value usable as one element of a key path.
///
/// Identity is by allocation, never by value: two `Rc`s holding equal data
/// are different keys, two clones of one `Rc` are the same key.
///
/// Sealed: implemented only for `Rc<T>`, `Arc<T>` and references to them.
pub trait KeyObject: sealed::Sealed {
    /// Allocation identity of this key.
    fn key_id(&self) -> KeyId;

    /// Non-owning handle that observes whether this key is still alive.
    fn downgrade_key(&self) -> WeakKey;
}

impl<T: ?Sized + 'static> KeyObject for Rc<T> {
    #[inline]
    fn key_id(&self) -> KeyId {
        KeyId::from_ptr(Rc::as_ptr(self))
    }

    fn downgrade_key(&self) -> WeakKey {
        WeakKey::from_rc(self)
    }
}

impl<T: ?Sized + 'static> KeyObject for Arc<T> {
    #[inline]
    fn key_id(&self) -> KeyId {
        KeyId::from_ptr(Arc::as_ptr(self))
    }

    fn downgrade_key(&self) -> WeakKey {
        WeakKey::from_arc(self)
    }
}

impl<K: KeyObject + ?Sized> KeyObject for &K {
    #[inline]
    fn key_id(&self) -> KeyId {
        (**self).key_id()
    }

    fn downgrade_key(&self) -> WeakKey {
        (**self).downgrade_key()
    }
}

/// Builds a key path (`&[&dyn KeyObject]`) from key objects of any type.
///
/// Each argument is borrowed, never moved.
///
/// ```
/// use std::rc::Rc;
///
/// use weakcache::path;
/// use weakcache::traits::KeyObject;
///
/// let a = Rc::new(1);
/// let b = Rc::new("two");
/// let p: &[&dyn KeyObject] = path![a, b];
/// assert_eq!(p.len(), 2);
/// ```
#[macro_export]
macro_rules! path {
    ($($key:expr),+ $(,)?) => {
        &[$(&$key as &dyn $crate::traits::KeyObject),+]
    };
}
