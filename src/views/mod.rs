//! View models for each screen.
//!
//! Each view owns no more state than the screen it backs. Mutations are
//! never applied locally: after every successful call the view re-fetches
//! what it shows.

pub mod auth;
pub mod dialogs;
pub mod movies;
pub mod navbar;
pub mod profile;

pub use auth::{LoginForm, RegistrationForm};
pub use dialogs::{DirectorDialog, GenreDialog, SynopsisDialog};
pub use movies::{favorite_movies, Catalog, FavoritesView, MovieCard, MovieListView};
pub use navbar::Navbar;
pub use profile::{ProfileEditor, ProfileForm, SaveOutcome};

use tracing::warn;

use crate::api::{ApiClient, ApiError, ErrorKind};
use crate::ui::{Notification, Route, Ui};

/// Show a failed call to the user.
///
/// An unauthorized response means the held token is gone or expired, so
/// the session is dropped and the user sent back to the welcome screen.
pub(crate) fn report_failure(api: &ApiClient, ui: &dyn Ui, err: &ApiError) {
    ui.notify(Notification::new(err.user_message()));

    if err.kind() == ErrorKind::Unauthorized {
        if let Err(e) = api.session().clear() {
            warn!(error = %e, "Failed to clear session");
        }
        ui.navigate(Route::Welcome);
    }
}
