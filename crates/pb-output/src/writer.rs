//! The `OutputWriter` trait implemented by backend writers.

use crate::{OutputResult, PilotSnapshotRow, TickSummaryRow};

/// Sink for trace rows.
///
/// All methods are infallible from the observer's perspective: errors are
/// stored internally and retrieved with [`TraceObserver::take_error`].
///
/// [`TraceObserver::take_error`]: crate::TraceObserver::take_error
pub trait OutputWriter {
    /// Write a batch of pilot snapshots.
    fn write_snapshots(&mut self, rows: &[PilotSnapshotRow]) -> OutputResult<()>;

    /// Write one tick summary row.
    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Flush all underlying handles.
    ///
    /// Idempotent; safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
