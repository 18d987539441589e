//! Identity handles for key objects.
//!
//! A key object is a shared allocation (`Rc<T>` / `Arc<T>`). Its identity is
//! the address of that allocation, captured as a [`KeyId`]. The trie stores a
//! [`WeakKey`] next to every entry: the identity plus a type-erased `Weak`
//! handle used to ask whether the object is still alive.
//!
//! ## Identity stability
//!
//! ```text
//!   Rc::new(x) ──► [ strong | weak | x ]   ◄── KeyId = address of x
//!                          ▲
//!   WeakKey ───────────────┘  (holds a weak count)
//!
//!   drop(last Rc):  x is dropped, strong = 0
//!                   allocation stays reserved while weak > 0
//! ```
//!
//! Because the entry's own `Weak` keeps the allocation reserved, no other
//! object can be allocated at the same address while the entry exists. A
//! live caller-supplied key therefore never collides with an expired entry,
//! and lookups can compare identities without checking liveness.

use std::fmt;
use std::rc;
use std::sync;

/// Allocation identity of a key object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyId(usize);

impl KeyId {
    /// Identity of the allocation behind `ptr`. Metadata of fat pointers is
    /// discarded, so `Rc<T>` and `Rc<dyn Trait>` of one allocation agree.
    #[inline]
    pub(crate) fn from_ptr<T: ?Sized>(ptr: *const T) -> Self {
        Self(ptr.cast::<()>() as usize)
    }

    /// Raw address value.
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0
    }
}

/// Liveness probe over a type-erased weak pointer.
trait WeakProbe {
    fn is_alive(&self) -> bool;
}

impl<T: ?Sized> WeakProbe for rc::Weak<T> {
    #[inline]
    fn is_alive(&self) -> bool {
        self.strong_count() > 0
    }
}

impl<T: ?Sized> WeakProbe for sync::Weak<T> {
    #[inline]
    fn is_alive(&self) -> bool {
        self.strong_count() > 0
    }
}

/// Non-owning reference to a key object, stored alongside each trie entry.
pub struct WeakKey {
    id: KeyId,
    probe: Box<dyn WeakProbe>,
}

impl WeakKey {
    /// Downgrades an `Rc` key.
    pub(crate) fn from_rc<T: ?Sized + 'static>(key: &rc::Rc<T>) -> Self {
        Self {
            id: KeyId::from_ptr(rc::Rc::as_ptr(key)),
            probe: Box::new(rc::Rc::downgrade(key)),
        }
    }

    /// Downgrades an `Arc` key.
    pub(crate) fn from_arc<T: ?Sized + 'static>(key: &sync::Arc<T>) -> Self {
        Self {
            id: KeyId::from_ptr(sync::Arc::as_ptr(key)),
            probe: Box::new(sync::Arc::downgrade(key)),
        }
    }

    /// Identity of the referenced object.
    #[inline]
    pub fn id(&self) -> KeyId {
        self.id
    }

    /// Returns `true` while at least one strong reference to the key exists.
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.probe.is_alive()
    }
}

impl fmt::Debug for WeakKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakKey")
            .field("id", &format_args!("{:#x}", self.id.0))
            .field("alive", &self.is_alive())
            .finish()
    }
}
