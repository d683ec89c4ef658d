//! In-process fake of the myFlix backend plus a recording UI for tests.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::json;

use crate::api::ApiClient;
use crate::models::{Director, Genre, Movie, User, UserDetails, UserUpdate};
use crate::session::{MemorySessionStore, Session};
use crate::ui::{Confirm, Dialog, DialogHost, Navigator, Notification, Notifier, Route};

pub(crate) fn catalog() -> Vec<Movie> {
    let nolan = Director {
        name: "Christopher Nolan".into(),
        bio: "British-American filmmaker.".into(),
        birth: Some("1970".into()),
        death: None,
    };
    let sci_fi = Genre {
        name: "Sci-Fi".into(),
        description: "Speculative stories about science and technology.".into(),
    };

    vec![
        Movie {
            id: "m1".into(),
            title: "Inception".into(),
            description: "A thief steals secrets through dream-sharing.".into(),
            genre: sci_fi.clone(),
            director: nolan.clone(),
            image_path: Some("inception.png".into()),
            featured: Some(true),
            actors: vec![],
        },
        Movie {
            id: "m2".into(),
            title: "The Dark Knight".into(),
            description: "Batman faces the Joker.".into(),
            genre: Genre {
                name: "Action".into(),
                description: "High-energy set pieces.".into(),
            },
            director: nolan,
            image_path: Some("dark-knight.png".into()),
            featured: Some(false),
            actors: vec![],
        },
        Movie {
            id: "m3".into(),
            title: "Arrival".into(),
            description: "A linguist learns an alien language.".into(),
            genre: sci_fi,
            director: Director {
                name: "Denis Villeneuve".into(),
                bio: "Canadian filmmaker.".into(),
                birth: Some("1967".into()),
                death: None,
            },
            image_path: None,
            featured: None,
            actors: vec![],
        },
    ]
}

fn hash_password(password: &str) -> String {
    format!("$hashed${}", password)
}

struct Account {
    user: User,
    password: String,
}

#[derive(Default)]
struct Inner {
    movies: Vec<Movie>,
    accounts: HashMap<String, Account>,
    tokens: HashMap<String, String>,
    requests: usize,
    fail_with: Option<StatusCode>,
}

/// Backend state shared between the fake server and the test body.
#[derive(Default)]
pub(crate) struct MockState {
    inner: Mutex<Inner>,
}

impl MockState {
    fn seeded() -> Self {
        let state = Self::default();
        {
            let mut inner = state.inner.lock();
            inner.movies = catalog();
            inner.accounts.insert(
                "alice".into(),
                Account {
                    user: User {
                        id: Some("u1".into()),
                        username: "alice".into(),
                        password: Some(hash_password("secret")),
                        email: "alice@example.com".into(),
                        birthday: Some("1990-04-12T00:00:00.000Z".into()),
                        favorite_movies: vec!["m1".into()],
                    },
                    password: "secret".into(),
                },
            );
            inner
                .tokens
                .insert("alice".into(), uuid::Uuid::new_v4().to_string());
        }
        state
    }

    pub fn request_count(&self) -> usize {
        self.inner.lock().requests
    }

    pub fn token_for(&self, username: &str) -> Option<String> {
        self.inner.lock().tokens.get(username).cloned()
    }

    pub fn session_for(&self, username: &str) -> Session {
        Session {
            username: Some(username.to_string()),
            token: self.token_for(username),
        }
    }

    pub fn has_user(&self, username: &str) -> bool {
        self.inner.lock().accounts.contains_key(username)
    }

    /// Make every following request fail with `status`.
    pub fn fail_with(&self, status: StatusCode) {
        self.inner.lock().fail_with = Some(status);
    }
}

pub(crate) struct MockBackend {
    pub base_url: String,
    pub state: Arc<MockState>,
}

impl MockBackend {
    pub fn client_with_session(&self, session: Session) -> ApiClient {
        ApiClient::new(
            &self.base_url,
            None,
            Arc::new(MemorySessionStore::with_session(session)),
        )
        .unwrap()
    }

    pub fn client_for(&self, username: &str) -> ApiClient {
        self.client_with_session(self.state.session_for(username))
    }
}

pub(crate) async fn spawn_backend() -> MockBackend {
    let state = Arc::new(MockState::seeded());

    let app = Router::new()
        .route("/users", post(register))
        .route("/login", post(login))
        .route("/movies", get(list_movies))
        .route("/movies/:title", get(get_movie))
        .route("/movies/directors/:name", get(movies_by_director))
        .route("/movies/genre/:name", get(movies_by_genre))
        .route(
            "/users/:username",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route(
            "/users/:username/movies/:movie_id",
            post(add_favorite).delete(remove_favorite),
        )
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockBackend {
        base_url: format!("http://{}", addr),
        state,
    }
}

// ----------------------------------------------------------------------------
// Handlers
// ----------------------------------------------------------------------------

type Reply = Result<Response, Response>;

/// Count the request, apply a forced failure, and check the bearer token
/// when `headers` is given.
fn begin(state: &MockState, headers: Option<&HeaderMap>) -> Result<(), Response> {
    let mut inner = state.inner.lock();
    inner.requests += 1;

    if let Some(status) = inner.fail_with {
        return Err((status, "forced failure").into_response());
    }

    if let Some(headers) = headers {
        let token = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));
        let valid = token.is_some_and(|t| inner.tokens.values().any(|issued| issued == t));
        if !valid {
            return Err((StatusCode::UNAUTHORIZED, "Unauthorized").into_response());
        }
    }
    Ok(())
}

fn not_found(what: &str) -> Response {
    (StatusCode::NOT_FOUND, format!("{} not found", what)).into_response()
}

async fn register(State(state): State<Arc<MockState>>, Json(details): Json<UserDetails>) -> Reply {
    begin(&state, None)?;
    let mut inner = state.inner.lock();

    if inner.accounts.contains_key(&details.username) {
        let body = json!({"error": {"errors": [{"msg": "Username already taken"}]}});
        return Err((StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response());
    }

    let user = User {
        id: Some(uuid::Uuid::new_v4().to_string()),
        username: details.username.clone(),
        password: Some(hash_password(&details.password)),
        email: details.email,
        birthday: details
            .birthday
            .map(|d| format!("{}T00:00:00.000Z", d.format("%Y-%m-%d"))),
        favorite_movies: vec![],
    };
    inner.accounts.insert(
        details.username,
        Account {
            user: user.clone(),
            password: details.password,
        },
    );
    Ok((StatusCode::CREATED, Json(user)).into_response())
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct LoginQuery {
    username: String,
    password: String,
}

async fn login(State(state): State<Arc<MockState>>, Query(query): Query<LoginQuery>) -> Reply {
    begin(&state, None)?;
    let mut inner = state.inner.lock();

    let user = match inner.accounts.get(&query.username) {
        Some(account) if account.password == query.password => account.user.clone(),
        _ => {
            let body = json!({"message": "Incorrect username or password.", "user": false});
            return Err((StatusCode::BAD_REQUEST, Json(body)).into_response());
        }
    };

    let token = inner
        .tokens
        .entry(query.username)
        .or_insert_with(|| uuid::Uuid::new_v4().to_string())
        .clone();
    Ok(Json(json!({"user": user, "token": token})).into_response())
}

async fn list_movies(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Reply {
    begin(&state, Some(&headers))?;
    Ok(Json(state.inner.lock().movies.clone()).into_response())
}

async fn get_movie(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(key): Path<String>,
) -> Reply {
    begin(&state, Some(&headers))?;
    let inner = state.inner.lock();
    inner
        .movies
        .iter()
        .find(|m| m.title == key || m.id == key)
        .map(|m| Json(m.clone()).into_response())
        .ok_or_else(|| not_found("Movie"))
}

async fn movies_by_director(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(name): Path<String>,
) -> Reply {
    begin(&state, Some(&headers))?;
    let movies: Vec<Movie> = state
        .inner
        .lock()
        .movies
        .iter()
        .filter(|m| m.director.name == name)
        .cloned()
        .collect();
    Ok(Json(movies).into_response())
}

async fn movies_by_genre(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(name): Path<String>,
) -> Reply {
    begin(&state, Some(&headers))?;
    let movies: Vec<Movie> = state
        .inner
        .lock()
        .movies
        .iter()
        .filter(|m| m.genre.name == name)
        .cloned()
        .collect();
    Ok(Json(movies).into_response())
}

async fn get_user(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(username): Path<String>,
) -> Reply {
    begin(&state, Some(&headers))?;
    let inner = state.inner.lock();
    inner
        .accounts
        .get(&username)
        .map(|a| Json(a.user.clone()).into_response())
        .ok_or_else(|| not_found("User"))
}

async fn update_user(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(username): Path<String>,
    Json(update): Json<UserUpdate>,
) -> Reply {
    begin(&state, Some(&headers))?;
    let mut inner = state.inner.lock();
    let mut account = inner
        .accounts
        .remove(&username)
        .ok_or_else(|| not_found("User"))?;

    if let Some(email) = update.email {
        account.user.email = email;
    }
    if let Some(birthday) = update.birthday {
        account.user.birthday = Some(format!("{}T00:00:00.000Z", birthday.format("%Y-%m-%d")));
    }
    if let Some(password) = update.password {
        account.user.password = Some(hash_password(&password));
        account.password = password;
    }
    if let Some(new_name) = update.username {
        if new_name != username {
            if let Some(token) = inner.tokens.remove(&username) {
                inner.tokens.insert(new_name.clone(), token);
            }
        }
        account.user.username = new_name;
    }

    let user = account.user.clone();
    inner.accounts.insert(user.username.clone(), account);
    Ok(Json(user).into_response())
}

async fn delete_user(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(username): Path<String>,
) -> Reply {
    begin(&state, Some(&headers))?;
    let mut inner = state.inner.lock();
    inner
        .accounts
        .remove(&username)
        .ok_or_else(|| not_found("User"))?;
    inner.tokens.remove(&username);
    Ok(format!("{} was deleted.", username).into_response())
}

async fn add_favorite(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path((username, movie_id)): Path<(String, String)>,
) -> Reply {
    begin(&state, Some(&headers))?;
    let mut inner = state.inner.lock();
    let account = inner
        .accounts
        .get_mut(&username)
        .ok_or_else(|| not_found("User"))?;
    if !account.user.favorite_movies.contains(&movie_id) {
        account.user.favorite_movies.push(movie_id);
    }
    Ok(Json(account.user.clone()).into_response())
}

async fn remove_favorite(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path((username, movie_id)): Path<(String, String)>,
) -> Reply {
    begin(&state, Some(&headers))?;
    let mut inner = state.inner.lock();
    let account = inner
        .accounts
        .get_mut(&username)
        .ok_or_else(|| not_found("User"))?;
    account.user.favorite_movies.retain(|id| id != &movie_id);
    Ok(Json(account.user.clone()).into_response())
}

// ----------------------------------------------------------------------------
// Recording UI
// ----------------------------------------------------------------------------

#[derive(Default)]
struct Recorded {
    notifications: Vec<Notification>,
    routes: Vec<Route>,
    dialogs: Vec<(String, &'static str)>,
    confirmations: Vec<String>,
}

/// Records everything the views ask of the front end.
pub(crate) struct RecordingUi {
    answer: bool,
    recorded: Mutex<Recorded>,
}

impl Default for RecordingUi {
    fn default() -> Self {
        Self {
            answer: true,
            recorded: Mutex::new(Recorded::default()),
        }
    }
}

impl RecordingUi {
    /// A UI whose user answers "no" to every confirmation.
    pub fn declining() -> Self {
        Self {
            answer: false,
            ..Self::default()
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.recorded
            .lock()
            .notifications
            .iter()
            .map(|n| n.message.clone())
            .collect()
    }

    pub fn routes(&self) -> Vec<Route> {
        self.recorded.lock().routes.clone()
    }

    pub fn dialogs(&self) -> Vec<(String, &'static str)> {
        self.recorded.lock().dialogs.clone()
    }

    pub fn confirmations(&self) -> Vec<String> {
        self.recorded.lock().confirmations.clone()
    }
}

impl Notifier for RecordingUi {
    fn notify(&self, notification: Notification) {
        self.recorded.lock().notifications.push(notification);
    }
}

impl Navigator for RecordingUi {
    fn navigate(&self, route: Route) {
        self.recorded.lock().routes.push(route);
    }
}

impl DialogHost for RecordingUi {
    fn open(&self, dialog: &dyn Dialog) {
        self.recorded
            .lock()
            .dialogs
            .push((dialog.title().to_string(), dialog.label()));
    }
}

impl Confirm for RecordingUi {
    fn confirm(&self, message: &str) -> bool {
        self.recorded.lock().confirmations.push(message.to_string());
        self.answer
    }
}
