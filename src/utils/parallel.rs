//! Switch between Rayon and serial iteration at compile time.
//!
//! With the `parallel` feature the Rayon traits are re-exported unchanged. Without it, the
//! same method names resolve to plain iterators, so call sites such as bond perception are
//! written once.

#[cfg(feature = "parallel")]
pub use rayon::prelude::{IntoParallelIterator, IntoParallelRefIterator, ParallelIterator};

#[cfg(not(feature = "parallel"))]
pub use self::serial::*;

#[cfg(not(feature = "parallel"))]
mod serial {
    pub use std::iter::Iterator as ParallelIterator;

    /// `into_par_iter()` for anything iterable by value.
    pub trait IntoParallelIterator {
        type Item;
        type Iter: Iterator<Item = Self::Item>;
        fn into_par_iter(self) -> Self::Iter;
    }

    impl<I: IntoIterator> IntoParallelIterator for I {
        type Item = I::Item;
        type Iter = I::IntoIter;
        fn into_par_iter(self) -> Self::Iter {
            self.into_iter()
        }
    }

    /// `par_iter()` for anything iterable by reference.
    pub trait IntoParallelRefIterator<'data> {
        type Item;
        type Iter: Iterator<Item = Self::Item>;
        fn par_iter(&'data self) -> Self::Iter;
    }

    impl<'data, I: 'data + ?Sized> IntoParallelRefIterator<'data> for I
    where
        &'data I: IntoIterator,
    {
        type Item = <&'data I as IntoIterator>::Item;
        type Iter = <&'data I as IntoIterator>::IntoIter;
        fn par_iter(&'data self) -> Self::Iter {
            self.into_iter()
        }
    }
}
