//! Worker pool driving every connection.
//!
//! A [`Reactor`] is a multi-threaded tokio runtime: readiness events of all
//! sockets are dispatched to a fixed number of worker threads, and any worker
//! may poll any connection task. A connection is one task, so its own steps
//! never run concurrently.

use std::future::Future;
use std::io;
use std::num::NonZeroUsize;

use tokio::runtime::{Builder, Handle, Runtime};
use tracing::debug;

const WORKER_THREAD_NAME: &str = "mini-web-worker";

#[derive(Debug)]
pub struct Reactor {
    runtime: Runtime,
    threads: NonZeroUsize,
}

impl Reactor {
    pub fn new(threads: NonZeroUsize) -> io::Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(threads.get())
            .thread_name(WORKER_THREAD_NAME)
            .enable_all()
            .build()?;

        debug!(threads = threads.get(), "reactor started");
        Ok(Self { runtime, threads })
    }

    #[inline]
    pub fn threads(&self) -> usize {
        self.threads.get()
    }

    pub fn handle(&self) -> &Handle {
        self.runtime.handle()
    }

    /// Runs `future` to completion on the calling thread while the workers
    /// serve every task it spawns.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawned_tasks_run_on_workers() {
        let reactor = Reactor::new(NonZeroUsize::new(2).unwrap()).unwrap();
        assert_eq!(reactor.threads(), 2);

        let name = reactor.block_on(async { tokio::spawn(async { std::thread::current().name().map(str::to_owned) }).await.unwrap() });

        assert_eq!(name.as_deref(), Some(WORKER_THREAD_NAME));
    }

    #[test]
    fn handle_spawns_onto_the_pool() {
        let reactor = Reactor::new(NonZeroUsize::MIN).unwrap();

        let task = reactor.handle().spawn(async { 40 + 2 });
        assert_eq!(reactor.block_on(task).unwrap(), 42);
    }
}
