//! CLI module for the myFlix terminal client.
//!
//! Provides subcommands for interacting with the myFlix API:
//! - `register` / `login` / `logout` / `whoami` - Account and session
//! - `movies` - Browse the catalog, favorites marked
//! - `movie`, `director`, `genre`, `synopsis` - Details for one entry
//! - `favorites` - List, add or remove favorites
//! - `profile` - Show, edit or delete the account
//! - `config check` - Validate configuration file

mod terminal;

pub use terminal::Terminal;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use crate::api::{ApiClient, ApiError};
use crate::config::Config;
use crate::models::{Credentials, Movie, UserDetails};
use crate::session::{FileSessionStore, SessionStore};
use crate::ui::Route;
use crate::views::{
    self, FavoritesView, LoginForm, MovieCard, MovieListView, Navbar, ProfileEditor,
    ProfileForm, RegistrationForm, SaveOutcome,
};

/// CLI arguments structure
#[derive(Parser, Debug)]
#[command(name = "myflix")]
#[command(author, version, about = "Browse the myFlix movie catalog from the terminal", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "myflix.toml")]
    pub config: PathBuf,

    /// Override log level
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// API URL to connect to (overrides the configuration file)
    #[arg(long, env = "MYFLIX_API_URL")]
    pub api_url: Option<String>,

    /// Session file holding the username and token
    #[arg(long, env = "MYFLIX_SESSION_FILE")]
    pub session_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new account
    Register {
        #[arg(short, long)]
        username: String,
        #[arg(short, long, env = "MYFLIX_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(short, long)]
        email: String,
        /// Birthday as yyyy-mm-dd
        #[arg(short, long)]
        birthday: Option<NaiveDate>,
    },

    /// Log in and store the session
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long, env = "MYFLIX_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Sign out and forget the session
    Logout,

    /// Show who is logged in
    Whoami,

    /// List all movies
    Movies,

    /// Show a movie by title
    Movie {
        title: String,
    },

    /// Show a movie by ID
    MovieId {
        id: String,
    },

    /// Show a director and their movies
    Director {
        name: String,
    },

    /// Show a genre and its movies
    Genre {
        name: String,
    },

    /// Show the synopsis of a movie
    Synopsis {
        title: String,
    },

    /// Favorite movies
    Favorites {
        #[command(subcommand)]
        action: Option<FavoritesCommands>,
    },

    /// Profile of the logged-in user
    Profile {
        #[command(subcommand)]
        action: Option<ProfileCommands>,
    },

    /// Configuration management commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Favorites subcommands
#[derive(Subcommand, Debug)]
pub enum FavoritesCommands {
    /// List favorite movies (default)
    List,
    /// Add a movie to favorites
    Add {
        movie_id: String,
    },
    /// Remove a movie from favorites
    Remove {
        movie_id: String,
    },
}

/// Profile subcommands
#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Show profile details (default)
    Show,
    /// Update profile fields
    Edit(ProfileEdits),
    /// Delete the account
    Delete {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(clap::Args, Debug, Default)]
pub struct ProfileEdits {
    #[arg(short, long)]
    pub username: Option<String>,
    #[arg(short, long)]
    pub password: Option<String>,
    #[arg(short, long)]
    pub email: Option<String>,
    /// Birthday as yyyy-mm-dd
    #[arg(short, long)]
    pub birthday: Option<NaiveDate>,
}

impl ProfileEdits {
    fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.password.is_none()
            && self.email.is_none()
            && self.birthday.is_none()
    }

    fn apply(&self, form: &mut ProfileForm) {
        if let Some(username) = &self.username {
            form.username = username.clone();
        }
        if let Some(password) = &self.password {
            form.password = password.clone();
        }
        if let Some(email) = &self.email {
            form.email = email.clone();
        }
        if let Some(birthday) = &self.birthday {
            form.birthday = birthday.format("%Y-%m-%d").to_string();
        }
    }
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Validate configuration file
    Check,
}

// ============================================================================
// CLI Command Handlers
// ============================================================================

struct CommandContext {
    api: ApiClient,
    terminal: Terminal,
}

impl CommandContext {
    fn new(cli: &Cli, config: &Config) -> Result<Self> {
        let base_url = cli.api_url.as_deref().unwrap_or(&config.api.base_url);
        let session_path = cli
            .session_file
            .clone()
            .unwrap_or_else(|| config.session.path.clone());
        let session: Arc<dyn SessionStore> = Arc::new(FileSessionStore::new(session_path));

        let assume_yes = matches!(
            cli.command,
            Commands::Profile {
                action: Some(ProfileCommands::Delete { yes: true })
            }
        );

        Ok(Self {
            api: ApiClient::new(base_url, config.api.request_timeout(), session)?,
            terminal: Terminal::new().assume_yes(assume_yes),
        })
    }

    /// Show a failed direct API call to the user and hand it back as an error.
    fn failed(&self, err: ApiError) -> anyhow::Error {
        views::report_failure(&self.api, &self.terminal, &err);
        crate::Error::from(err).into()
    }
}

/// Run a CLI command
pub async fn run_command(cli: &Cli, config: &Config) -> Result<()> {
    match &cli.command {
        // Validating the config must not depend on building a client from it.
        Commands::Config(ConfigCommands::Check) => cmd_config_check(cli),
        _ => {
            let ctx = CommandContext::new(cli, config)?;
            run_api_command(cli, &ctx).await?;
            print_route_hint(ctx.terminal.route());
            Ok(())
        }
    }
}

async fn run_api_command(cli: &Cli, ctx: &CommandContext) -> Result<()> {
    match &cli.command {
        Commands::Register {
            username,
            password,
            email,
            birthday,
        } => {
            let details = UserDetails {
                username: username.clone(),
                password: password.clone(),
                email: email.clone(),
                birthday: *birthday,
            };
            RegistrationForm::new(&ctx.api, &ctx.terminal)
                .submit(&details)
                .await?;
        }
        Commands::Login { username, password } => {
            let credentials = Credentials {
                username: username.clone(),
                password: password.clone(),
            };
            LoginForm::new(&ctx.api, &ctx.terminal)
                .submit(&credentials)
                .await?;
        }
        Commands::Logout => {
            Navbar::new(ctx.api.session().as_ref(), &ctx.terminal).sign_out()?;
            println!("Signed out.");
        }
        Commands::Whoami => cmd_whoami(ctx),
        Commands::Movies => cmd_movies(ctx).await?,
        Commands::Movie { title } => {
            let movie = ctx.api.get_movie(title).await.map_err(|e| ctx.failed(e))?;
            print_movie(&movie);
        }
        Commands::MovieId { id } => {
            let movie = ctx
                .api
                .get_movie_by_id(id)
                .await
                .map_err(|e| ctx.failed(e))?;
            print_movie(&movie);
        }
        Commands::Director { name } => {
            let movies = ctx
                .api
                .get_movies_by_director(name)
                .await
                .map_err(|e| ctx.failed(e))?;
            match movies.first() {
                Some(movie) => {
                    MovieListView::new(&ctx.api, &ctx.terminal).open_director_dialog(movie);
                    print_titles(&movies);
                }
                None => println!("No movies found for director: {}", name),
            }
        }
        Commands::Genre { name } => {
            let movies = ctx
                .api
                .get_movies_by_genre(name)
                .await
                .map_err(|e| ctx.failed(e))?;
            match movies.first() {
                Some(movie) => {
                    MovieListView::new(&ctx.api, &ctx.terminal).open_genre_dialog(movie);
                    print_titles(&movies);
                }
                None => println!("No movies found for genre: {}", name),
            }
        }
        Commands::Synopsis { title } => {
            let movie = ctx.api.get_movie(title).await.map_err(|e| ctx.failed(e))?;
            MovieListView::new(&ctx.api, &ctx.terminal).open_synopsis_dialog(&movie);
        }
        Commands::Favorites { action } => match action {
            None | Some(FavoritesCommands::List) => cmd_favorites_list(ctx).await?,
            Some(FavoritesCommands::Add { movie_id }) => {
                let mut view = FavoritesView::new(&ctx.api, &ctx.terminal);
                view.add_favorite(movie_id).await?;
                print_favorites(&view);
            }
            Some(FavoritesCommands::Remove { movie_id }) => {
                let mut view = FavoritesView::new(&ctx.api, &ctx.terminal);
                view.remove_favorite(movie_id).await?;
                print_favorites(&view);
            }
        },
        Commands::Profile { action } => match action {
            None | Some(ProfileCommands::Show) => cmd_profile_show(ctx).await?,
            Some(ProfileCommands::Edit(edits)) => cmd_profile_edit(ctx, edits).await?,
            Some(ProfileCommands::Delete { .. }) => cmd_profile_delete(ctx).await?,
        },
        Commands::Config(ConfigCommands::Check) => cmd_config_check(cli)?,
    }
    Ok(())
}

fn cmd_whoami(ctx: &CommandContext) {
    let session = ctx.api.session().load();
    match (&session.username, session.is_authenticated()) {
        (Some(username), true) => println!("Logged in as {}", username),
        _ => println!("Not logged in."),
    }
}

async fn cmd_movies(ctx: &CommandContext) -> Result<()> {
    let mut view = MovieListView::new(&ctx.api, &ctx.terminal);
    view.load().await?;

    let cards = view.cards();
    if cards.is_empty() {
        println!("No movies found.");
        return Ok(());
    }

    println!();
    print!("{}", movie_table(&cards));
    println!();
    println!("* = favorite");
    println!();
    Ok(())
}

async fn cmd_favorites_list(ctx: &CommandContext) -> Result<()> {
    let mut view = FavoritesView::new(&ctx.api, &ctx.terminal);
    view.load().await?;
    print_favorites(&view);
    Ok(())
}

fn print_favorites(view: &FavoritesView<'_>) {
    let favorites: Vec<MovieCard<'_>> = view
        .favorites()
        .into_iter()
        .map(|movie| MovieCard {
            movie,
            is_favorite: true,
        })
        .collect();

    if favorites.is_empty() {
        println!("No favorite movies yet.");
        return;
    }

    println!();
    print!("{}", movie_table(&favorites));
    println!();
}

async fn cmd_profile_show(ctx: &CommandContext) -> Result<()> {
    let mut editor = ProfileEditor::new(&ctx.api, &ctx.terminal);
    let form = editor.load().await?.clone();

    println!();
    println!("=== Profile: {} ===", form.username);
    println!();
    println!("Username:   {}", form.username);
    println!("Email:      {}", form.email);
    println!(
        "Birthday:   {}",
        if form.birthday.is_empty() {
            "-"
        } else {
            &form.birthday
        }
    );

    let favorites = editor.favorite_ids();
    println!("Favorites:  {}", favorites.len());
    for id in favorites {
        println!("  - {}", id);
    }
    println!();
    Ok(())
}

async fn cmd_profile_edit(ctx: &CommandContext, edits: &ProfileEdits) -> Result<()> {
    if edits.is_empty() {
        anyhow::bail!("Nothing to update. Pass at least one of --username, --password, --email, --birthday.");
    }

    let mut editor = ProfileEditor::new(&ctx.api, &ctx.terminal);
    editor.load().await?;
    edits.apply(editor.form_mut());

    if let SaveOutcome::Updated(user) = editor.save().await? {
        println!("Username:   {}", user.username);
        println!("Email:      {}", user.email);
    }
    Ok(())
}

async fn cmd_profile_delete(ctx: &CommandContext) -> Result<()> {
    let editor = ProfileEditor::new(&ctx.api, &ctx.terminal);
    let Some(handle) = editor.delete_account() else {
        println!("Account deletion cancelled.");
        return Ok(());
    };

    // Keep the process alive until the request settles.
    let result = handle.await.context("Account deletion task failed")?;
    result.context("Account deletion request failed")?;
    Ok(())
}

/// Validate configuration file
fn cmd_config_check(cli: &Cli) -> Result<()> {
    let config_path = &cli.config;

    println!("Checking configuration file: {}", config_path.display());
    println!();

    if !config_path.exists() {
        println!(
            "[!!] Configuration file not found: {}",
            config_path.display()
        );
        println!();
        println!("Defaults will be used.");
        return Ok(());
    }

    match Config::load(config_path) {
        Ok(config) => {
            println!("[OK] Configuration file is valid!");
            println!();
            println!("=== Configuration Summary ===");
            println!();
            println!("API:");
            println!("  Base URL:     {}", config.api.base_url);
            println!(
                "  Timeout:      {}",
                config
                    .api
                    .request_timeout_secs
                    .map(|s| format!("{}s", s))
                    .unwrap_or_else(|| "none".to_string())
            );
            println!();
            println!("Session:");
            println!("  File:         {}", config.session.path.display());
            println!();
            println!("Logging:");
            println!("  Level:        {}", config.logging.level);
            println!();

            if let Err(e) = reqwest::Url::parse(&config.api.base_url) {
                println!("Warnings:");
                println!("  [!] api.base_url is not a valid URL: {}", e);
                println!();
            }
            Ok(())
        }
        Err(e) => {
            println!("[!!] Configuration file is invalid!");
            println!();
            println!("Error: {:#}", e);
            println!();
            println!("Please check the configuration file syntax and try again.");
            anyhow::bail!("Invalid configuration file");
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn print_movie(movie: &Movie) {
    println!();
    println!("=== {} ===", movie.title);
    println!();
    println!("ID:          {}", movie.id);
    println!("Genre:       {}", movie.genre.name);
    println!("Director:    {}", movie.director.name);
    if let Some(image) = &movie.image_path {
        println!("Image:       {}", image);
    }
    if !movie.actors.is_empty() {
        println!("Actors:      {}", movie.actors.join(", "));
    }
    println!();
    println!("{}", movie.description);
    println!();
}

fn print_titles(movies: &[Movie]) {
    println!("Movies:");
    for movie in movies {
        println!("  - {} ({})", movie.title, movie.id);
    }
    println!();
}

fn print_route_hint(route: Option<Route>) {
    match route {
        Some(Route::Movies) => println!("Use 'myflix movies' to browse the catalog."),
        Some(Route::Welcome) => println!("Use 'myflix login' to sign in."),
        _ => {}
    }
}

/// Render movie cards as a fixed-width table.
fn movie_table(cards: &[MovieCard<'_>]) -> String {
    let mut out = format!(
        "{:<2} {:<26}  {:<30}  {:<14}  {:<22}\n",
        "", "ID", "TITLE", "GENRE", "DIRECTOR"
    );
    out.push_str(&"-".repeat(100));
    out.push('\n');

    for card in cards {
        out.push_str(&format!(
            "{:<2} {:<26}  {:<30}  {:<14}  {:<22}\n",
            if card.is_favorite { "*" } else { "" },
            truncate(&card.movie.id, 26),
            truncate(&card.movie.title, 30),
            truncate(&card.movie.genre.name, 14),
            truncate(&card.movie.director.name, 22),
        ));
    }
    out
}

/// Truncate a string to max length with ellipsis
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_register() {
        let cli = Cli::try_parse_from([
            "myflix",
            "register",
            "--username",
            "alice",
            "--password",
            "pw",
            "--email",
            "alice@example.com",
            "--birthday",
            "1990-04-12",
        ])
        .unwrap();

        match cli.command {
            Commands::Register { birthday, .. } => {
                assert_eq!(birthday, NaiveDate::from_ymd_opt(1990, 4, 12));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_bad_birthday() {
        let result = Cli::try_parse_from([
            "myflix", "profile", "edit", "--birthday", "April 12",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_profile_edits_apply() {
        let mut form = ProfileForm {
            username: "alice".into(),
            password: String::new(),
            email: "alice@example.com".into(),
            birthday: "1990-04-12".into(),
        };
        let edits = ProfileEdits {
            email: Some("new@example.com".into()),
            birthday: NaiveDate::from_ymd_opt(1991, 1, 2),
            ..Default::default()
        };

        assert!(!edits.is_empty());
        assert!(ProfileEdits::default().is_empty());

        edits.apply(&mut form);
        assert_eq!(form.username, "alice");
        assert_eq!(form.email, "new@example.com");
        assert_eq!(form.birthday, "1991-01-02");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Inception", 30), "Inception");
        assert_eq!(truncate("The Lord of the Rings", 10), "The Lor...");
        assert_eq!(truncate("Amélie Poulain", 7), "Amél...");
    }

    #[test]
    fn test_movie_table_marks_favorites() {
        let movies = test_support::catalog();
        let cards: Vec<MovieCard<'_>> = movies
            .iter()
            .map(|movie| MovieCard {
                movie,
                is_favorite: movie.id == "m2",
            })
            .collect();

        let table = movie_table(&cards);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 5);
        assert!(lines[0].contains("TITLE"));
        assert!(lines[3].starts_with('*'));
        assert!(lines[3].contains("The Dark Knight"));
        assert!(!lines[2].starts_with('*'));
    }

    #[tokio::test]
    async fn test_config_check_does_not_build_a_client() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("myflix.toml");
        std::fs::write(&path, "[api]\nbase_url = \"not a url\"\n").unwrap();

        let cli = Cli::try_parse_from([
            "myflix",
            "--config",
            path.to_str().unwrap(),
            "config",
            "check",
        ])
        .unwrap();
        let config = Config::load(&path).unwrap();

        assert!(CommandContext::new(&cli, &config).is_err());
        assert!(run_command(&cli, &config).await.is_ok());
    }

    #[test]
    fn test_delete_flag_answers_confirmation() {
        let cli = Cli::try_parse_from(["myflix", "profile", "delete", "--yes"]).unwrap();
        let ctx = CommandContext::new(&cli, &Config::default()).unwrap();
        assert!(crate::ui::Confirm::confirm(&ctx.terminal, "sure?"));
    }
}
