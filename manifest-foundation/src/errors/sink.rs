use tracing::warn;

use crate::errors::Diagnostic;

/// Diagnostic sink - anything that can collect diagnostics for later display.
pub trait DiagnosticSink {
    fn emit(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for () {
    fn emit(&mut self, _: Diagnostic) {}
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Keeps only the most severe diagnostic; the first one wins among equals.
impl DiagnosticSink for Option<Diagnostic> {
    #[track_caller]
    fn emit(&mut self, new: Diagnostic) {
        *self = Some(match self.take() {
            Some(old) if old.severity >= new.severity => {
                warn!("new diagnostic dropped from Option<Diagnostic>");
                old
            }
            _ => new,
        });
    }
}

pub fn pipe_all_diagnostics_into<I>(sink: &mut dyn DiagnosticSink, source: I)
where
    I: IntoIterator<Item = Diagnostic>,
{
    source
        .into_iter()
        .for_each(|diagnostic| sink.emit(diagnostic))
}

#[cfg(test)]
mod tests {
    use crate::errors::{Diagnostic, Severity};

    use super::{pipe_all_diagnostics_into, DiagnosticSink};

    #[test]
    fn option_sink_keeps_most_severe() {
        let mut sink: Option<Diagnostic> = None;
        sink.emit(Diagnostic::new(Severity::Warning, "first"));
        sink.emit(Diagnostic::error("second"));
        sink.emit(Diagnostic::error("third"));
        assert_eq!(sink.map(|d| d.message).as_deref(), Some("second"));
    }

    #[test]
    fn pipe_into_vec() {
        let mut sink: Vec<Diagnostic> = vec![];
        pipe_all_diagnostics_into(
            &mut sink,
            [Diagnostic::error("a"), Diagnostic::new(Severity::Note, "b")],
        );
        assert_eq!(sink.len(), 2);
        pipe_all_diagnostics_into(&mut (), [Diagnostic::error("dropped")]);
    }
}
