//! Profile screen: edit the current user or delete the account.

use chrono::NaiveDate;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::report_failure;
use crate::api::{ApiClient, ApiError};
use crate::models::{User, UserUpdate};
use crate::ui::{Notification, Route, Ui};

pub const DELETE_CONFIRMATION: &str = "All your data will be lost - this cannot be undone!";

/// Editable copy of the user record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub username: String,
    /// Left empty unless the user wants a new password.
    pub password: String,
    pub email: String,
    /// `yyyy-mm-dd`, empty when the server has no birthday on record.
    pub birthday: String,
}

impl ProfileForm {
    pub fn from_user(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            password: String::new(),
            email: user.email.clone(),
            birthday: user
                .birthday_date()
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        }
    }

    /// Fill fields the caller left blank from `user`. The password stays as is.
    fn fill_blanks(&mut self, user: &User) {
        let loaded = Self::from_user(user);
        if self.username.is_empty() {
            self.username = loaded.username;
        }
        if self.email.is_empty() {
            self.email = loaded.email;
        }
        if self.birthday.is_empty() {
            self.birthday = loaded.birthday;
        }
    }

    /// Build the update body, leaving out an empty password or birthday.
    pub fn to_update(&self) -> Result<UserUpdate, chrono::ParseError> {
        let birthday = match self.birthday.trim() {
            "" => None,
            raw => Some(NaiveDate::parse_from_str(raw, "%Y-%m-%d")?),
        };

        Ok(UserUpdate {
            username: Some(self.username.clone()),
            password: (!self.password.is_empty()).then(|| self.password.clone()),
            email: Some(self.email.clone()),
            birthday,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// Profile saved; the session is still valid.
    Updated(User),
    /// Username or password changed; the session was cleared.
    CredentialsChanged,
}

pub struct ProfileEditor<'a> {
    api: &'a ApiClient,
    ui: &'a dyn Ui,
    user: Option<User>,
    form: ProfileForm,
}

impl<'a> ProfileEditor<'a> {
    pub fn new(api: &'a ApiClient, ui: &'a dyn Ui) -> Self {
        Self {
            api,
            ui,
            user: None,
            form: ProfileForm::default(),
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn form(&self) -> &ProfileForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ProfileForm {
        &mut self.form
    }

    pub fn favorite_ids(&self) -> &[String] {
        self.user
            .as_ref()
            .map(|u| u.favorite_movies.as_slice())
            .unwrap_or_default()
    }

    /// Fetch the current user and reset the form from it.
    pub async fn load(&mut self) -> crate::Result<&ProfileForm> {
        match self.api.get_current_user().await {
            Ok(user) => {
                self.form = ProfileForm::from_user(&user);
                self.user = Some(user);
                Ok(&self.form)
            }
            Err(e) => {
                report_failure(self.api, self.ui, &e);
                Err(e.into())
            }
        }
    }

    /// Send the form to the server.
    ///
    /// When the returned username or password hash differs from the record
    /// loaded earlier, the old token no longer matches the account: the
    /// session is cleared and the user is sent back to log in.
    pub async fn save(&mut self) -> crate::Result<SaveOutcome> {
        // Without a prior load, fetch only the baseline record so pending
        // edits in the form survive.
        if self.user.is_none() {
            let user = match self.api.get_current_user().await {
                Ok(user) => user,
                Err(e) => {
                    report_failure(self.api, self.ui, &e);
                    return Err(e.into());
                }
            };
            self.form.fill_blanks(&user);
            self.user = Some(user);
        }

        let update = match self.form.to_update() {
            Ok(update) => update,
            Err(e) => {
                self.ui.notify(Notification::new("Birthday must be a date (yyyy-mm-dd)"));
                return Err(crate::Error::InvalidInput(format!("birthday: {}", e)));
            }
        };

        let updated = match self.api.update_user(&update).await {
            Ok(user) => user,
            Err(e) => {
                report_failure(self.api, self.ui, &e);
                return Err(e.into());
            }
        };

        let credentials_changed = match &self.user {
            Some(previous) => {
                previous.username != updated.username || previous.password != updated.password
            }
            None => false,
        };

        if credentials_changed {
            info!(username = %updated.username, "Credentials changed, clearing session");
            self.api.session().clear()?;
            self.user = None;
            self.ui.navigate(Route::Welcome);
            self.ui.notify(Notification::new(
                "Credentials updated! Please login using your new credentials",
            ));
            return Ok(SaveOutcome::CredentialsChanged);
        }

        self.form = ProfileForm::from_user(&updated);
        self.user = Some(updated.clone());
        self.ui
            .notify(Notification::new("User information has been updated!"));
        Ok(SaveOutcome::Updated(updated))
    }

    /// Delete the account after the user confirms.
    ///
    /// Navigation and the farewell notification happen immediately; the
    /// delete request runs on its own task and clears the session once the
    /// server accepts it. They are not ordered after the response, so the
    /// user is told the account is gone even if the request later fails.
    /// Returns `None` when the user declines.
    pub fn delete_account(&self) -> Option<JoinHandle<Result<String, ApiError>>> {
        if !self.ui.confirm(DELETE_CONFIRMATION) {
            return None;
        }

        let api = self.api.clone();
        let handle = tokio::spawn(async move {
            let result = api.delete_user().await;
            match &result {
                Ok(message) => {
                    info!(response = %message, "Account deleted");
                    if let Err(e) = api.session().clear() {
                        warn!(error = %e, "Failed to clear session");
                    }
                }
                Err(e) => error!(error = %e, "Account deletion failed"),
            }
            result
        });

        self.ui.navigate(Route::Welcome);
        self.ui.notify(Notification::new(
            "You have successfully deleted your account - we are sorry to see you go!",
        ));
        Some(handle)
    }
}
