pub mod trie;
pub mod weak_key;

pub use trie::{DEFAULT_SWEEP_THRESHOLD, InsertStats, SweepPolicy, TrieNode};
pub use weak_key::{KeyId, WeakKey};
