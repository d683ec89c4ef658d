//! Login and registration forms.

use tracing::info;

use crate::api::ApiClient;
use crate::models::{Credentials, User, UserDetails};
use crate::ui::{Notification, Route, Ui};

pub struct LoginForm<'a> {
    api: &'a ApiClient,
    ui: &'a dyn Ui,
}

impl<'a> LoginForm<'a> {
    pub fn new(api: &'a ApiClient, ui: &'a dyn Ui) -> Self {
        Self { api, ui }
    }

    /// Log in, persist the session and move on to the movie list.
    pub async fn submit(&self, credentials: &Credentials) -> crate::Result<User> {
        let response = match self.api.login(credentials).await {
            Ok(response) => response,
            Err(e) => {
                self.ui.notify(Notification::new(e.user_message()));
                return Err(e.into());
            }
        };

        if let Err(e) = self
            .api
            .session()
            .set_session(&response.user.username, &response.token)
        {
            self.ui.notify(Notification::new(crate::api::GENERIC_ERROR_MESSAGE));
            return Err(e.into());
        }
        info!(username = %response.user.username, "Logged in");

        self.ui.navigate(Route::Movies);
        self.ui.notify(Notification::new("log in successful"));
        Ok(response.user)
    }
}

pub struct RegistrationForm<'a> {
    api: &'a ApiClient,
    ui: &'a dyn Ui,
}

impl<'a> RegistrationForm<'a> {
    pub fn new(api: &'a ApiClient, ui: &'a dyn Ui) -> Self {
        Self { api, ui }
    }

    /// Create the account. The session is left untouched; the user logs in
    /// separately afterwards.
    pub async fn submit(&self, details: &UserDetails) -> crate::Result<User> {
        match self.api.register(details).await {
            Ok(user) => {
                info!(username = %user.username, "Registered");
                self.ui
                    .notify(Notification::new("Registration successful! Please log in."));
                Ok(user)
            }
            Err(e) => {
                self.ui.notify(Notification::new(e.registration_message()));
                Err(e.into())
            }
        }
    }
}
