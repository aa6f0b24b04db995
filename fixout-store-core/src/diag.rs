use std::fmt;

/// Receives intermediate values of the store path computation.
///
/// The computation itself stays pure; tracing happens only through
/// whatever sink the caller injects, instead of a process-wide debug
/// toggle. [`NoopSink`] discards everything, [`LogSink`] bridges to the
/// `log` facade at debug level.
///
/// Sinks must be `Sync`: a `&dyn DiagnosticSink` is held across the
/// await point in `fixout-store-add`.
pub trait DiagnosticSink: Sync {
    fn record(&self, stage: &str, detail: fmt::Arguments<'_>);
}

/// Discards all records.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn record(&self, _stage: &str, _detail: fmt::Arguments<'_>) {}
}

/// Forwards records to [`log::debug!`].
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn record(&self, stage: &str, detail: fmt::Arguments<'_>) {
        log::debug!("{stage}: {detail}");
    }
}
