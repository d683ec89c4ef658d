//! Genre, director and synopsis dialogs.

use crate::models::Movie;
use crate::ui::Dialog;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreDialog {
    pub name: String,
    pub description: String,
}

impl GenreDialog {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

impl From<&Movie> for GenreDialog {
    fn from(movie: &Movie) -> Self {
        Self::new(&movie.genre.name, &movie.genre.description)
    }
}

impl Dialog for GenreDialog {
    fn title(&self) -> &str {
        &self.name
    }
    fn label(&self) -> &'static str {
        "Description"
    }
    fn body(&self) -> &str {
        &self.description
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectorDialog {
    pub name: String,
    pub bio: String,
}

impl DirectorDialog {
    pub fn new(name: impl Into<String>, bio: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bio: bio.into(),
        }
    }
}

impl From<&Movie> for DirectorDialog {
    fn from(movie: &Movie) -> Self {
        Self::new(&movie.director.name, &movie.director.bio)
    }
}

impl Dialog for DirectorDialog {
    fn title(&self) -> &str {
        &self.name
    }
    fn label(&self) -> &'static str {
        "Bio"
    }
    fn body(&self) -> &str {
        &self.bio
    }
}

/// Movie title plus its description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynopsisDialog {
    pub name: String,
    pub synopsis: String,
}

impl SynopsisDialog {
    pub fn new(name: impl Into<String>, synopsis: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            synopsis: synopsis.into(),
        }
    }
}

impl From<&Movie> for SynopsisDialog {
    fn from(movie: &Movie) -> Self {
        Self::new(&movie.title, &movie.description)
    }
}

impl Dialog for SynopsisDialog {
    fn title(&self) -> &str {
        &self.name
    }
    fn label(&self) -> &'static str {
        "Synopsis"
    }
    fn body(&self) -> &str {
        &self.synopsis
    }
}
