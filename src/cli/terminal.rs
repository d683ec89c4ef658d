//! Terminal implementation of the UI seams.

use std::cell::Cell;
use std::io::{self, BufRead, Write};

use tracing::debug;

use crate::ui::{Confirm, Dialog, DialogHost, Navigator, Notification, Notifier, Route};

/// Prints notifications and dialogs to stdout and prompts on stdin.
#[derive(Debug, Default)]
pub struct Terminal {
    assume_yes: bool,
    route: Cell<Option<Route>>,
}

impl Terminal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every confirmation with "yes" without prompting.
    pub fn assume_yes(mut self, yes: bool) -> Self {
        self.assume_yes = yes;
        self
    }

    /// The most recent navigation target, if any.
    pub fn route(&self) -> Option<Route> {
        self.route.get()
    }
}

impl Notifier for Terminal {
    fn notify(&self, notification: Notification) {
        println!("{}", notification.message);
    }
}

impl Navigator for Terminal {
    fn navigate(&self, route: Route) {
        debug!(route = %route, "Navigate");
        self.route.set(Some(route));
    }
}

impl DialogHost for Terminal {
    fn open(&self, dialog: &dyn Dialog) {
        println!();
        print!("{}", dialog.render());
        println!();
    }
}

impl Confirm for Terminal {
    fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        print!("{} [y/N]: ", message);
        if io::stdout().flush().is_err() {
            return false;
        }
        read_answer(io::stdin().lock())
    }
}

fn read_answer(mut input: impl BufRead) -> bool {
    let mut answer = String::new();
    if input.read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
