use std::io::{self, BufRead, Write};

use bookdesk_core::{AccessDeniedPresenter, Acknowledge};

/// Prints the access-denied notice and waits for Enter before acknowledging.
pub struct TerminalPresenter;

impl AccessDeniedPresenter for TerminalPresenter {
    fn show(&self, message: &str, on_acknowledge: Acknowledge) {
        eprintln!("\n{}", message);
        eprint!("Press Enter to continue...");
        let _ = io::stderr().flush();

        let mut line = String::new();
        let _ = io::stdin().lock().read_line(&mut line);
        on_acknowledge();
    }
}
