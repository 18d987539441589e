pub use crate::builder::WeakMemoBuilder;
pub use crate::ds::{KeyId, SweepPolicy, TrieNode, WeakKey};
pub use crate::error::{ConfigError, EmptyPathError, InvariantError};
pub use crate::memo::WeakMemo;
#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::MemoMetricsSnapshot;
pub use crate::path;
pub use crate::traits::KeyObject;
