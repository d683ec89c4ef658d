use crate::session::SessionStore;
use crate::ui::{Route, Ui};

/// Top-level navigation shown once logged in.
pub struct Navbar<'a> {
    session: &'a dyn SessionStore,
    ui: &'a dyn Ui,
}

impl<'a> Navbar<'a> {
    pub fn new(session: &'a dyn SessionStore, ui: &'a dyn Ui) -> Self {
        Self { session, ui }
    }

    pub fn to_movies(&self) {
        self.ui.navigate(Route::Movies);
    }

    pub fn to_favorites(&self) {
        self.ui.navigate(Route::Favorites);
    }

    pub fn to_profile(&self) {
        self.ui.navigate(Route::Profile);
    }

    /// Return to the welcome screen and forget the session.
    pub fn sign_out(&self) -> crate::Result<()> {
        self.ui.navigate(Route::Welcome);
        self.session.clear()?;
        tracing::info!("Signed out");
        Ok(())
    }
}
