//! Terminal output for placard commands.
//!
//! Progress and diagnostics go to stderr so that stdout carries only
//! command results (marker names, JSON) and stays safe to pipe.

use console::{Style, Term};

#[derive(Clone, Copy)]
enum Tone {
    Plain,
    Good,
    Caution,
    Bad,
    Heading,
}

pub(crate) struct Output {
    messages: Term,
    results: Term,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            messages: Term::stderr(),
            results: Term::stdout(),
        }
    }

    fn emit(&self, tone: Tone, msg: &str) {
        let style = match tone {
            Tone::Plain => Style::new(),
            Tone::Good => Style::new().green(),
            Tone::Caution => Style::new().yellow(),
            Tone::Bad => Style::new().red(),
            Tone::Heading => Style::new().cyan().bold(),
        };
        // A closed stderr is not worth failing a command over
        let _ = self.messages.write_line(&style.apply_to(msg).to_string());
    }

    pub(crate) fn info(&self, msg: &str) {
        self.emit(Tone::Plain, msg);
    }

    pub(crate) fn success(&self, msg: &str) {
        self.emit(Tone::Good, msg);
    }

    pub(crate) fn warning(&self, msg: &str) {
        self.emit(Tone::Caution, msg);
    }

    pub(crate) fn error(&self, msg: &str) {
        self.emit(Tone::Bad, msg);
    }

    pub(crate) fn highlight(&self, msg: &str) {
        self.emit(Tone::Heading, msg);
    }

    /// One line per generated document, green on success and yellow otherwise.
    pub(crate) fn document(&self, kind: &str, ok: bool, detail: &str) {
        let tone = if ok { Tone::Good } else { Tone::Caution };
        self.emit(tone, &format!("{kind}: {detail}"));
    }

    /// Write a result line to stdout.
    pub(crate) fn data(&self, line: &str) {
        let _ = self.results.write_line(line);
    }
}
