//! Progress reporting for long-running loads and decompositions

/// Receives progress updates from the loader and the peeling engines.
///
/// `done` and `total` count vertices, edges or partitions depending on the
/// stage; `total` is zero when the stage has no known size.
pub trait Progress {
    fn report(&self, stage: &str, done: u64, total: u64);
}

/// Discards every update
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn report(&self, _stage: &str, _done: u64, _total: u64) {}
}

/// Forwards updates to the `log` facade at debug level
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl Progress for LogProgress {
    fn report(&self, stage: &str, done: u64, total: u64) {
        if total > 0 {
            log::debug!("{}: {}/{}", stage, done, total);
        } else {
            log::debug!("{}: {}", stage, done);
        }
    }
}

impl<F> Progress for F
where
    F: Fn(&str, u64, u64),
{
    fn report(&self, stage: &str, done: u64, total: u64) {
        self(stage, done, total)
    }
}
