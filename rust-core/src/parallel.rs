//! Per-channel dispatch
//!
//! Channels share no mutable state, so each one can run as its own task.
//! With the `parallel` feature the work goes to rayon's pool and is joined
//! before returning; without it the channels run in order. Results come back
//! in input order either way.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Map `f` over `items`, one task per item
#[cfg(feature = "parallel")]
pub fn map_channels<I, T, F>(items: Vec<I>, f: F) -> Vec<T>
where
    I: Send,
    T: Send,
    F: Fn(I) -> T + Sync + Send,
{
    items.into_par_iter().map(f).collect()
}

/// Map `f` over `items`, one task per item
#[cfg(not(feature = "parallel"))]
pub fn map_channels<I, T, F>(items: Vec<I>, f: F) -> Vec<T>
where
    I: Send,
    T: Send,
    F: Fn(I) -> T + Sync + Send,
{
    items.into_iter().map(f).collect()
}
