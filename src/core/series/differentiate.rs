use std::ops::{Range, Sub};

use itertools::Itertools;

impl<T> Differentiate for T where T: ?Sized {}

pub trait Differentiate {
    /// Pair up the adjacent points and yield the key range with the value increment.
    fn deltas<K, V>(self) -> impl Iterator<Item = (Range<K>, <V as Sub>::Output)>
    where
        Self: Iterator<Item = (K, V)> + Sized,
        K: Copy,
        V: Copy + Sub,
    {
        self.tuple_windows().map(|((from_key, from_value), (to_key, to_value))| {
            (from_key..to_key, to_value - from_value)
        })
    }
}
