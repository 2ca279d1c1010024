use std::iter::repeat_n;

impl<T> Resample for T where T: ?Sized {}

pub trait Resample {
    /// Upsample the values by repeating each of them `factor` times in place.
    #[must_use]
    fn repeat_each<V>(self, factor: usize) -> impl Iterator<Item = V>
    where
        Self: IntoIterator<Item = V> + Sized,
        V: Clone,
    {
        self.into_iter().flat_map(move |value| repeat_n(value, factor))
    }
}
