//! Diagnostic sink injected into pipeline components
//!
//! Components receive an `Arc<dyn DiagnosticSink>` at construction and hold
//! it for their lifetime. The default sink forwards to `tracing`.

use std::sync::Arc;

/// Receiver of pipeline diagnostics
pub trait DiagnosticSink: Send + Sync {
    /// Routine progress information
    fn debug(&self, component: &'static str, message: &str);

    /// Degraded output or dropped data
    fn warn(&self, component: &'static str, message: &str);
}

/// Sink that forwards to the `tracing` subscriber installed by the host
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn debug(&self, component: &'static str, message: &str) {
        tracing::debug!(component, "{message}");
    }

    fn warn(&self, component: &'static str, message: &str) {
        tracing::warn!(component, "{message}");
    }
}

/// Sink that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn debug(&self, _component: &'static str, _message: &str) {}

    fn warn(&self, _component: &'static str, _message: &str) {}
}

/// Shared handle to the default `tracing` sink
pub fn tracing_sink() -> Arc<dyn DiagnosticSink> {
    Arc::new(TracingSink)
}

#[cfg(test)]
pub(crate) mod testing {
    use super::DiagnosticSink;
    use parking_lot::Mutex;

    /// Sink that records warnings for assertions
    #[derive(Default)]
    pub(crate) struct MemorySink {
        pub(crate) warnings: Mutex<Vec<(&'static str, String)>>,
    }

    impl MemorySink {
        pub(crate) fn warnings_from(&self, component: &str) -> Vec<String> {
            self.warnings
                .lock()
                .iter()
                .filter(|(c, _)| *c == component)
                .map(|(_, m)| m.clone())
                .collect()
        }
    }

    impl DiagnosticSink for MemorySink {
        fn debug(&self, _component: &'static str, _message: &str) {}

        fn warn(&self, component: &'static str, message: &str) {
            self.warnings.lock().push((component, message.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::io;

    #[derive(Clone, Default)]
    struct CapturedOutput(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedOutput {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture(f: impl FnOnce()) -> String {
        let output = CapturedOutput::default();
        let writer = output.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);

        let bytes = output.0.lock().clone();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    #[test]
    fn test_tracing_sink_forwards_events() {
        let sink = tracing_sink();
        let logs = capture(|| {
            sink.debug("window_analyzer", "segment length 800 samples");
            sink.warn("sample_buffer", "ring buffer full, dropped 12 samples");
        });

        let lines: Vec<&str> = logs.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("DEBUG"));
        assert!(lines[0].contains("window_analyzer"));
        assert!(lines[0].contains("segment length 800 samples"));
        assert!(lines[1].contains("WARN"));
        assert!(lines[1].contains("sample_buffer"));
        assert!(lines[1].contains("dropped 12 samples"));
    }

    #[test]
    fn test_null_sink_emits_nothing() {
        let sink = NullSink;
        let logs = capture(|| sink.warn("sample_buffer", "ignored"));
        assert!(logs.is_empty());
    }
}
