//! Seams between the view models and whatever front end drives them.
//!
//! The views never print or prompt on their own; they go through these
//! traits, which the CLI implements for a terminal.

use std::fmt;
use std::time::Duration;

/// Screens the application can navigate between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Welcome,
    Movies,
    Favorites,
    Profile,
}

impl Route {
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Welcome => "welcome",
            Route::Movies => "movies",
            Route::Favorites => "favorites",
            Route::Profile => "profile",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default lifetime of a transient notification.
pub const NOTIFICATION_DURATION: Duration = Duration::from_millis(2000);

/// A transient message with a dismiss action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub action: String,
    pub duration: Duration,
}

impl Notification {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            action: "OK".to_string(),
            duration: NOTIFICATION_DURATION,
        }
    }
}

pub trait Notifier {
    fn notify(&self, notification: Notification);
}

pub trait Navigator {
    fn navigate(&self, route: Route);
}

/// Asks the user a yes/no question.
pub trait Confirm {
    fn confirm(&self, message: &str) -> bool;
}

/// A modal showing a fixed descriptive record.
pub trait Dialog {
    /// Heading, e.g. the genre or director name.
    fn title(&self) -> &str;
    /// What the body describes ("Description", "Bio", "Synopsis").
    fn label(&self) -> &'static str;
    fn body(&self) -> &str;

    fn render(&self) -> String {
        format!("=== {} ===\n\n{}:\n{}\n", self.title(), self.label(), self.body())
    }
}

/// Shows dialogs. `open` returns once the dialog has been closed.
pub trait DialogHost {
    fn open(&self, dialog: &dyn Dialog);
}

/// Everything a view needs from the front end.
pub trait Ui: Notifier + Navigator + DialogHost + Confirm {}

impl<T: Notifier + Navigator + DialogHost + Confirm + ?Sized> Ui for T {}
