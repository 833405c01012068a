mod envelope;
mod error;
mod invalidation;
mod keys;
mod patterns;
mod serialization;
mod traits;

pub use envelope::{decode_envelope, encode_envelope, expiry_after, CacheEnvelope};
pub use error::{CacheError, Result};
pub use invalidation::{evictions, MutationEvent};
pub use keys::{CacheKey, KeyFamily};
pub use patterns::{pattern_matches, substring_pattern};
pub use serialization::{from_cache_value, to_cache_value};
pub use traits::{Cache, KeyValueStore};
