//! Shared thread pool for parallel replicate computation.
//!
//! Replicates walk the slice index recursively, one stack frame per
//! hierarchy level plus the partitioning above it. The shared pool uses a
//! larger stack than rayon's default so deep hierarchies resampled from many
//! tests at once do not overflow worker stacks.

#[cfg(feature = "parallel")]
use rayon::ThreadPool;

#[cfg(feature = "parallel")]
use std::sync::OnceLock;

#[cfg(feature = "parallel")]
static THREAD_POOL: OnceLock<ThreadPool> = OnceLock::new();

/// Get or initialize the shared pool: one thread per logical CPU, 8 MB
/// stacks.
#[cfg(feature = "parallel")]
fn get_thread_pool() -> &'static ThreadPool {
    THREAD_POOL.get_or_init(|| {
        rayon::ThreadPoolBuilder::new()
            .stack_size(8 * 1024 * 1024)
            .build()
            .expect("failed to build bootstrap thread pool")
    })
}

/// Run `op` on the shared pool, so every parallel bootstrap in the process
/// uses the same stack configuration.
#[cfg(feature = "parallel")]
pub fn install<OP, R>(op: OP) -> R
where
    OP: FnOnce() -> R + Send,
    R: Send,
{
    get_thread_pool().install(op)
}

#[cfg(not(feature = "parallel"))]
pub fn install<OP, R>(op: OP) -> R
where
    OP: FnOnce() -> R,
{
    op()
}
