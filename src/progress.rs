use std::io::IsTerminal;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressFinish, ProgressStyle};

/// Reports the outcome of the one network call an invocation makes.
pub trait Progress {
    fn succeed(&mut self, message: &str);
    fn fail(&mut self, message: &str);
}

/// Terminal spinner on stderr. Hidden when stderr is not a terminal.
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    pub fn start(message: &str) -> Self {
        let bar = if std::io::stderr().is_terminal() {
            let bar = ProgressBar::new_spinner().with_finish(ProgressFinish::AndClear);
            bar.set_style(
                ProgressStyle::with_template("{spinner:.cyan} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar.enable_steady_tick(Duration::from_millis(80));
            bar
        } else {
            ProgressBar::hidden()
        };
        bar.set_message(message.to_string());
        Self { bar }
    }

    fn finish(&self, symbol: &'static str, message: &str) {
        self.bar.set_style(
            ProgressStyle::with_template("{prefix} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        self.bar.set_prefix(symbol);
        self.bar.finish_with_message(message.to_string());
    }
}

impl Progress for Spinner {
    fn succeed(&mut self, message: &str) {
        tracing::info!("{message}");
        self.finish("✔", message);
    }

    fn fail(&mut self, message: &str) {
        tracing::info!("{message}");
        self.finish("✖", message);
    }
}
