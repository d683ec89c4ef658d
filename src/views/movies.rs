//! Movie list and favorites screens.

use std::collections::HashSet;

use tracing::debug;

use super::dialogs::{DirectorDialog, GenreDialog, SynopsisDialog};
use super::report_failure;
use crate::api::{ApiClient, ApiError};
use crate::models::Movie;
use crate::ui::{Notification, Ui};

/// Movies from `movies` whose id is in `favorite_ids`, in catalog order.
pub fn favorite_movies<'a>(movies: &'a [Movie], favorite_ids: &HashSet<String>) -> Vec<&'a Movie> {
    movies
        .iter()
        .filter(|movie| favorite_ids.contains(&movie.id))
        .collect()
}

/// The full catalog joined with the current user's favorites.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub movies: Vec<Movie>,
    pub favorite_ids: HashSet<String>,
}

impl Catalog {
    /// Fetch all movies, then the current user for their favorite ids.
    pub async fn fetch(api: &ApiClient) -> Result<Self, ApiError> {
        let movies = api.list_movies().await?;
        let user = api.get_current_user().await?;
        Ok(Self {
            movies,
            favorite_ids: user.favorite_movies.into_iter().collect(),
        })
    }

    pub fn is_favorite(&self, movie_id: &str) -> bool {
        self.favorite_ids.contains(movie_id)
    }

    pub fn favorites(&self) -> Vec<&Movie> {
        favorite_movies(&self.movies, &self.favorite_ids)
    }

    pub fn find(&self, movie_id: &str) -> Option<&Movie> {
        self.movies.iter().find(|m| m.id == movie_id)
    }
}

/// A movie annotated with whether the user has favorited it.
#[derive(Debug, Clone, Copy)]
pub struct MovieCard<'a> {
    pub movie: &'a Movie,
    pub is_favorite: bool,
}

/// Backs both the movie list and the favorites screen.
pub struct MovieListView<'a> {
    api: &'a ApiClient,
    ui: &'a dyn Ui,
    catalog: Catalog,
}

/// The favorites screen reads the same catalog as the movie list.
pub type FavoritesView<'a> = MovieListView<'a>;

impl<'a> MovieListView<'a> {
    pub fn new(api: &'a ApiClient, ui: &'a dyn Ui) -> Self {
        Self {
            api,
            ui,
            catalog: Catalog::default(),
        }
    }

    /// Fetch the catalog and favorites, replacing whatever was shown.
    pub async fn load(&mut self) -> crate::Result<()> {
        match Catalog::fetch(self.api).await {
            Ok(catalog) => {
                debug!(
                    movies = catalog.movies.len(),
                    favorites = catalog.favorite_ids.len(),
                    "Catalog loaded"
                );
                self.catalog = catalog;
                Ok(())
            }
            Err(e) => {
                report_failure(self.api, self.ui, &e);
                Err(e.into())
            }
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Every movie, flagged when it is a favorite.
    pub fn cards(&self) -> Vec<MovieCard<'_>> {
        self.catalog
            .movies
            .iter()
            .map(|movie| MovieCard {
                movie,
                is_favorite: self.catalog.is_favorite(&movie.id),
            })
            .collect()
    }

    /// Only the user's favorites.
    pub fn favorites(&self) -> Vec<&Movie> {
        self.catalog.favorites()
    }

    pub async fn add_favorite(&mut self, movie_id: &str) -> crate::Result<()> {
        if let Err(e) = self.api.add_favorite(movie_id).await {
            report_failure(self.api, self.ui, &e);
            return Err(e.into());
        }
        self.ui.notify(Notification::new("Movie added to favorites"));
        self.load().await
    }

    pub async fn remove_favorite(&mut self, movie_id: &str) -> crate::Result<()> {
        if let Err(e) = self.api.remove_favorite(movie_id).await {
            report_failure(self.api, self.ui, &e);
            return Err(e.into());
        }
        self.ui.notify(Notification::new("Movie deleted"));
        self.load().await
    }

    pub fn open_genre_dialog(&self, movie: &Movie) {
        self.ui.open(&GenreDialog::from(movie));
    }

    pub fn open_director_dialog(&self, movie: &Movie) {
        self.ui.open(&DirectorDialog::from(movie));
    }

    pub fn open_synopsis_dialog(&self, movie: &Movie) {
        self.ui.open(&SynopsisDialog::from(movie));
    }
}
