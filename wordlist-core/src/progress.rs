//! Progress reporting hooks used by output sinks

/// Receives progress notifications from a sink
pub trait ProgressReporter {
    /// Called once the expected grand total of input lines is known
    fn start(&mut self, total: u64);

    /// Called after every written line
    fn update(&mut self, written: u64, total: u64, percent: u8);

    /// Called when the sink is finalized
    fn finish(&mut self);
}

impl<P: ProgressReporter + ?Sized> ProgressReporter for Box<P> {
    fn start(&mut self, total: u64) {
        (**self).start(total);
    }

    fn update(&mut self, written: u64, total: u64, percent: u8) {
        (**self).update(written, total, percent);
    }

    fn finish(&mut self) {
        (**self).finish();
    }
}

/// Reporter that ignores every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn start(&mut self, _total: u64) {}

    fn update(&mut self, _written: u64, _total: u64, _percent: u8) {}

    fn finish(&mut self) {}
}

/// Percentage of `written` against `total`, clamped to 100
///
/// Writes are never bounded by the total, so the ratio can exceed one; an
/// unknown or zero total reports 0.
pub fn percent(written: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = u128::from(written) * 100 / u128::from(total);
    pct.min(100) as u8
}
