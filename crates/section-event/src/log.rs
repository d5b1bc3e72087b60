/// Sink for the user-visible publish line.
///
/// In production: [`TracingLog`] (forwards to `tracing`).
/// In tests: a capturing sink that records each line.
pub trait EventLog: Send + Sync {
    fn log(&self, line: &str);
}

/// Forwards each line to `tracing::info!` under the `section_event` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl EventLog for TracingLog {
    fn log(&self, line: &str) {
        tracing::info!(target: "section_event", "{line}");
    }
}

impl<L: EventLog + ?Sized> EventLog for std::sync::Arc<L> {
    fn log(&self, line: &str) {
        (**self).log(line)
    }
}
