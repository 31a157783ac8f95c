use crate::types::ThreadId;

/// Sink for diagnostic events emitted by the synchronization core.
///
/// A process-wide singleton logger is a convenience, not a design
/// constraint, so events are routed through an injected sink instead:
/// `SafeSequence::new` uses `NoopSink` and costs nothing; `SafeSequence::with_trace`
/// accepts any `TraceSink` implementation.
pub trait TraceSink: Send + Sync {
    /// Called for each notable ledger transition (admit, debit, credit).
    /// `thread` is the thread the event concerns, not necessarily the
    /// calling thread (see cross-thread destruction in DESIGN.md).
    fn event(&self, thread: ThreadId, msg: &str);
}

/// Default sink: discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl TraceSink for NoopSink {
    fn event(&self, _thread: ThreadId, _msg: &str) {}
}
