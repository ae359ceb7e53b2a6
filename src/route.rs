//! Key routing: signed integer keys to bucket indices.

use core::fmt::Debug;

/// Fixed-width signed integer usable as a map key.
///
/// `fold` reinterprets the key's bits as the unsigned integer of the same
/// width, so negative keys land deterministically in the unsigned index
/// space (`-1i32` folds to `u32::MAX`).
pub trait RouteKey: Copy + Eq + Debug + Send + 'static {
    fn fold(self) -> u64;
}

macro_rules! impl_route_key {
    ($($signed:ty => $unsigned:ty),* $(,)?) => {
        $(
            impl RouteKey for $signed {
                #[inline]
                fn fold(self) -> u64 {
                    self as $unsigned as u64
                }
            }
        )*
    };
}

impl_route_key!(i8 => u8, i16 => u16, i32 => u32, i64 => u64, isize => usize);

/// Bucket index of `key` in a table of `capacity` buckets.
#[inline]
pub(crate) fn bucket_index<K: RouteKey>(key: K, capacity: usize) -> usize {
    debug_assert!(capacity > 0);
    (key.fold() % capacity as u64) as usize
}
