use std::{iter::Sum, ops::Mul};

pub trait Correlate<V> {
    /// Slide the kernel over the series and yield the dot product for every window
    /// that fits entirely, starting from the first value.
    ///
    /// # Panics
    ///
    /// Panics if the kernel is empty.
    fn correlate<'a, K, O>(&'a self, kernel: &'a [K]) -> impl Iterator<Item = O> + 'a
    where
        V: Copy + 'a,
        K: Copy + Mul<V, Output = O> + 'a,
        O: Sum<O>;
}

impl<V> Correlate<V> for [V] {
    fn correlate<'a, K, O>(&'a self, kernel: &'a [K]) -> impl Iterator<Item = O> + 'a
    where
        V: Copy + 'a,
        K: Copy + Mul<V, Output = O> + 'a,
        O: Sum<O>,
    {
        assert!(!kernel.is_empty(), "the kernel must not be empty");
        self.windows(kernel.len())
            .map(move |window| kernel.iter().zip(window).map(|(lhs, rhs)| *lhs * *rhs).sum())
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;

    #[test]
    fn test_correlate() {
        let series: [f64; 4] = [10.0, 1.0, 1.0, 10.0];
        let sums = series.correlate::<f64, f64>(&[2.0, 3.0, -1.0]).collect_vec();
        assert_eq!(sums, [18.0, -5.0]);
    }

    #[test]
    fn test_correlate_kernel_longer_than_series() {
        let series: [f64; 2] = [1.0, 2.0];
        assert_eq!(series.correlate::<f64, f64>(&[1.0, 1.0, 1.0]).count(), 0);
    }

    #[test]
    fn test_correlate_exact_fit() {
        let series: [f64; 3] = [1.0, 2.0, 3.0];
        let sums = series.correlate::<f64, f64>(&[1.0, 1.0, 1.0]).collect_vec();
        assert_eq!(sums, [6.0]);
    }
}
