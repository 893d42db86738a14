use std::collections::VecDeque;
use std::sync::{Mutex, OnceLock};

use leptos::prelude::*;
use tokio::sync::oneshot;

use super::*;
use crate::state::session::PersistedSession;
use crate::net::api::LOGIN_FAILED_MESSAGE;
use crate::util::persistence::MemoryStorage;

// =========================================================================
// MockAuthApi
// =========================================================================

#[derive(Default)]
struct MockAuthApi {
    login_results: Mutex<VecDeque<Result<LoginData, ApiError>>>,
    create_results: Mutex<VecDeque<Result<(), ApiError>>>,
    fetch_results: Mutex<VecDeque<Result<User, ApiError>>>,
    login_gates: Mutex<VecDeque<oneshot::Receiver<Result<LoginData, ApiError>>>>,
    signup_payloads: Mutex<Vec<SignupPayload>>,
    fetch_calls: Mutex<Vec<(String, String)>>,
    observed: OnceLock<ArcRwSignal<Session>>,
    loading_seen_in_flight: Mutex<Vec<bool>>,
}

impl MockAuthApi {
    fn observe(&self, store: &SessionStore) {
        let _ = self.observed.set(store.state());
    }

    fn record_loading(&self) {
        if let Some(state) = self.observed.get() {
            self.loading_seen_in_flight.lock().unwrap().push(state.with_untracked(|s| s.is_loading));
        }
    }
}

#[async_trait::async_trait(?Send)]
impl AuthApi for MockAuthApi {
    async fn login(&self, _credentials: &Credentials) -> Result<LoginData, ApiError> {
        self.record_loading();
        let gate = self.login_gates.lock().unwrap().pop_front();
        if let Some(gate) = gate {
            return gate.await.unwrap();
        }
        self.login_results.lock().unwrap().pop_front().expect("unexpected login call")
    }

    async fn create_user(&self, payload: &SignupPayload) -> Result<(), ApiError> {
        self.record_loading();
        self.signup_payloads.lock().unwrap().push(payload.clone());
        self.create_results.lock().unwrap().pop_front().expect("unexpected create_user call")
    }

    async fn fetch_user(&self, user_id: &str, token: &str) -> Result<User, ApiError> {
        self.fetch_calls.lock().unwrap().push((user_id.to_owned(), token.to_owned()));
        self.fetch_results.lock().unwrap().pop_front().expect("unexpected fetch_user call")
    }
}

fn user(id: &str) -> User {
    User { id: id.to_owned(), ..User::default() }
}

fn login_ok(id: &str, token: &str) -> Result<LoginData, ApiError> {
    Ok(LoginData { user: user(id), token: token.to_owned() })
}

fn credentials(email: &str, password: &str) -> Credentials {
    Credentials { email: email.to_owned(), password: password.to_owned() }
}

fn signup_form(email: &str) -> SignupForm {
    SignupForm {
        first_name: "Ada".to_owned(),
        last_name: "Lovelace".to_owned(),
        email: email.to_owned(),
        password: "correct horse".to_owned(),
    }
}

fn hydrated_store(api: &Arc<MockAuthApi>, storage: &Arc<MemoryStorage>) -> SessionStore {
    let store = SessionStore::new(api.clone(), storage.clone());
    store.hydrate();
    api.observe(&store);
    store
}

fn stored_envelope(storage: &MemoryStorage) -> PersistEnvelope {
    serde_json::from_str(&storage.get_item(STORAGE_KEY).expect("nothing persisted")).unwrap()
}

fn assert_signed_out(session: &Session) {
    assert!(session.user.is_none());
    assert!(session.token.is_none());
    assert!(!session.is_authenticated);
}

// =========================================================================
// login
// =========================================================================

#[tokio::test]
async fn login_success_commits_identity_and_clears_flags() {
    let api = Arc::new(MockAuthApi::default());
    api.login_results.lock().unwrap().push_back(login_ok("u1", "t1"));
    let storage = Arc::new(MemoryStorage::new());
    let store = hydrated_store(&api, &storage);
    store.set_error("stale message");

    store.login(credentials("a@b.com", "pw")).await.unwrap();

    let session = store.snapshot();
    assert_eq!(session.user, Some(user("u1")));
    assert_eq!(session.token.as_deref(), Some("t1"));
    assert!(session.is_authenticated);
    assert!(!session.is_loading);
    assert!(session.error.is_none());
}

#[tokio::test]
async fn login_rejection_mirrors_message_and_returns_error() {
    let api = Arc::new(MockAuthApi::default());
    api.login_results
        .lock()
        .unwrap()
        .push_back(Err(ApiError::Rejected("Invalid credentials".to_owned())));
    let storage = Arc::new(MemoryStorage::new());
    let store = hydrated_store(&api, &storage);

    let err = store.login(credentials("a@b.com", "bad")).await.unwrap_err();

    assert_eq!(err.to_string(), "Invalid credentials");
    let session = store.snapshot();
    assert_signed_out(&session);
    assert_eq!(session.error.as_deref(), Some("Invalid credentials"));
    assert!(!session.is_loading);
}

#[tokio::test]
async fn login_failure_clears_previous_session() {
    let api = Arc::new(MockAuthApi::default());
    {
        let mut results = api.login_results.lock().unwrap();
        results.push_back(login_ok("u1", "t1"));
        results.push_back(Err(ApiError::Rejected(LOGIN_FAILED_MESSAGE.to_owned())));
    }
    let storage = Arc::new(MemoryStorage::new());
    let store = hydrated_store(&api, &storage);

    store.login(credentials("a@b.com", "pw")).await.unwrap();
    assert!(store.login(credentials("a@b.com", "pw")).await.is_err());

    let session = store.snapshot();
    assert_signed_out(&session);
    assert_eq!(session.error.as_deref(), Some(LOGIN_FAILED_MESSAGE));
}

#[tokio::test]
async fn login_network_failure_uses_generic_message() {
    let api = Arc::new(MockAuthApi::default());
    api.login_results
        .lock()
        .unwrap()
        .push_back(Err(ApiError::Network("Failed to fetch".to_owned())));
    let storage = Arc::new(MemoryStorage::new());
    let store = hydrated_store(&api, &storage);

    let err = store.login(credentials("a@b.com", "pw")).await.unwrap_err();

    assert!(err.is_network());
    assert_eq!(store.snapshot().error.as_deref(), Some(crate::net::error::NETWORK_ERROR_MESSAGE));
    assert!(!store.snapshot().is_loading);
}

#[tokio::test]
async fn loading_is_true_only_while_request_in_flight() {
    let api = Arc::new(MockAuthApi::default());
    api.login_results.lock().unwrap().push_back(login_ok("u1", "t1"));
    api.create_results.lock().unwrap().push_back(Ok(()));
    let storage = Arc::new(MemoryStorage::new());
    let store = hydrated_store(&api, &storage);

    assert!(!store.snapshot().is_loading);
    store.login(credentials("a@b.com", "pw")).await.unwrap();
    assert!(!store.snapshot().is_loading);
    store.signup(signup_form("a@b.com")).await.unwrap();
    assert!(!store.snapshot().is_loading);

    assert_eq!(*api.loading_seen_in_flight.lock().unwrap(), vec![true, true]);
}

#[tokio::test]
async fn login_outcomes_are_never_partial() {
    let api = Arc::new(MockAuthApi::default());
    {
        let mut results = api.login_results.lock().unwrap();
        results.push_back(login_ok("u1", "t1"));
        results.push_back(Err(ApiError::Status { status: 500, message: "Login failed".to_owned() }));
        results.push_back(Err(ApiError::Decode("bad".to_owned())));
        results.push_back(login_ok("u2", "t2"));
    }
    let storage = Arc::new(MemoryStorage::new());
    let store = hydrated_store(&api, &storage);

    for _ in 0..4 {
        let outcome = store.login(credentials("a@b.com", "pw")).await;
        let s = store.snapshot();
        let signed_in = s.is_authenticated && s.user.is_some() && s.token.is_some() && s.error.is_none();
        let signed_out = !s.is_authenticated && s.user.is_none() && s.token.is_none() && s.error.is_some();
        assert!(signed_in ^ signed_out, "partial state after {outcome:?}: {s:?}");
        assert_eq!(outcome.is_ok(), signed_in);
    }
}

#[tokio::test]
async fn stale_login_result_is_discarded() {
    let api = Arc::new(MockAuthApi::default());
    let (first_tx, first_rx) = oneshot::channel();
    let (second_tx, second_rx) = oneshot::channel();
    {
        let mut gates = api.login_gates.lock().unwrap();
        gates.push_back(first_rx);
        gates.push_back(second_rx);
    }
    let storage = Arc::new(MemoryStorage::new());
    let store = hydrated_store(&api, &storage);

    let driver = async move {
        tokio::task::yield_now().await;
        second_tx.send(login_ok("u2", "t2")).unwrap();
        tokio::task::yield_now().await;
        first_tx.send(Err(ApiError::Rejected("late failure".to_owned()))).unwrap();
    };
    let (first, second, ()) = tokio::join!(
        store.login(credentials("first@b.com", "pw")),
        store.login(credentials("second@b.com", "pw")),
        driver,
    );

    assert_eq!(first.unwrap_err(), ApiError::Rejected("late failure".to_owned()));
    assert!(second.is_ok());
    let session = store.snapshot();
    assert_eq!(session.user, Some(user("u2")));
    assert!(session.is_authenticated);
    assert!(session.error.is_none());
    assert!(!session.is_loading);
}

#[tokio::test]
async fn loading_stays_set_until_latest_request_settles() {
    let api = Arc::new(MockAuthApi::default());
    let (first_tx, first_rx) = oneshot::channel();
    let (second_tx, second_rx) = oneshot::channel();
    {
        let mut gates = api.login_gates.lock().unwrap();
        gates.push_back(first_rx);
        gates.push_back(second_rx);
    }
    let storage = Arc::new(MemoryStorage::new());
    let store = hydrated_store(&api, &storage);
    let observer = store.clone();

    let driver = async move {
        tokio::task::yield_now().await;
        first_tx.send(login_ok("u1", "t1")).unwrap();
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
        let mid = observer.snapshot();
        second_tx.send(login_ok("u2", "t2")).unwrap();
        mid
    };
    let (first, second, mid) = tokio::join!(
        store.login(credentials("first@b.com", "pw")),
        store.login(credentials("second@b.com", "pw")),
        driver,
    );

    assert!(first.is_ok());
    assert!(second.is_ok());
    assert!(mid.is_loading);
    assert!(!mid.is_authenticated);
    assert_eq!(store.snapshot().user, Some(user("u2")));
    assert!(!store.snapshot().is_loading);
}

#[tokio::test]
async fn signup_during_pending_login_does_not_discard_it() {
    let api = Arc::new(MockAuthApi::default());
    let (login_tx, login_rx) = oneshot::channel();
    api.login_gates.lock().unwrap().push_back(login_rx);
    api.create_results.lock().unwrap().push_back(Ok(()));
    let storage = Arc::new(MemoryStorage::new());
    let store = hydrated_store(&api, &storage);
    let observer = store.clone();

    let driver = async move {
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
        let mid = observer.snapshot();
        login_tx.send(login_ok("u1", "t1")).unwrap();
        mid
    };
    let (login, signup, mid) = tokio::join!(
        store.login(credentials("a@b.com", "pw")),
        store.signup(signup_form("new@b.com")),
        driver,
    );

    assert!(login.is_ok());
    assert!(signup.is_ok());
    assert!(mid.is_loading, "login still outstanding after signup settled");
    let session = store.snapshot();
    assert_eq!(session.user, Some(user("u1")));
    assert_eq!(session.token.as_deref(), Some("t1"));
    assert!(session.is_authenticated);
    assert!(!session.is_loading);
    assert_eq!(stored_envelope(&storage).state.user, Some(user("u1")));
}

// =========================================================================
// signup
// =========================================================================

#[tokio::test]
async fn signup_success_does_not_authenticate() {
    let api = Arc::new(MockAuthApi::default());
    api.create_results.lock().unwrap().push_back(Ok(()));
    let storage = Arc::new(MemoryStorage::new());
    let store = hydrated_store(&api, &storage);

    store.signup(signup_form("New.Member@Maison.fr")).await.unwrap();

    let session = store.snapshot();
    assert_signed_out(&session);
    assert!(session.error.is_none());
    assert!(!session.is_loading);

    let payloads = api.signup_payloads.lock().unwrap();
    assert_eq!(payloads.len(), 1);
    assert_eq!(payloads[0].username, "newmembermaisonfr");
    assert_eq!(payloads[0].preferred_language, "en");
    assert_eq!(payloads[0].form.email, "New.Member@Maison.fr");
}

#[tokio::test]
async fn signup_success_keeps_existing_session_untouched() {
    let api = Arc::new(MockAuthApi::default());
    api.login_results.lock().unwrap().push_back(login_ok("u1", "t1"));
    api.create_results.lock().unwrap().push_back(Ok(()));
    let storage = Arc::new(MemoryStorage::new());
    let store = hydrated_store(&api, &storage);

    store.login(credentials("a@b.com", "pw")).await.unwrap();
    store.signup(signup_form("other@b.com")).await.unwrap();

    assert_eq!(store.snapshot().user, Some(user("u1")));
}

#[tokio::test]
async fn signup_failure_mirrors_error_and_returns_it() {
    let api = Arc::new(MockAuthApi::default());
    api.create_results
        .lock()
        .unwrap()
        .push_back(Err(ApiError::Rejected("Email already registered".to_owned())));
    let storage = Arc::new(MemoryStorage::new());
    let store = hydrated_store(&api, &storage);

    let err = store.signup(signup_form("a@b.com")).await.unwrap_err();

    assert_eq!(err.to_string(), "Email already registered");
    let session = store.snapshot();
    assert_eq!(session.error.as_deref(), Some("Email already registered"));
    assert!(!session.is_loading);
    assert!(!session.is_authenticated);
}

// =========================================================================
// logout
// =========================================================================

#[tokio::test]
async fn logout_always_yields_empty_session() {
    let api = Arc::new(MockAuthApi::default());
    api.login_results.lock().unwrap().push_back(login_ok("u1", "t1"));
    let storage = Arc::new(MemoryStorage::new());
    let store = hydrated_store(&api, &storage);

    store.logout();
    assert_signed_out(&store.snapshot());
    assert!(store.snapshot().error.is_none());

    store.login(credentials("a@b.com", "pw")).await.unwrap();
    store.set_error("something");
    store.logout();

    let session = store.snapshot();
    assert_signed_out(&session);
    assert!(session.error.is_none());
    assert!(session.has_hydrated);
}

#[test]
fn logout_recovers_inconsistent_state() {
    let api = Arc::new(MockAuthApi::default());
    let storage = Arc::new(MemoryStorage::new());
    let store = hydrated_store(&api, &storage);
    store.set_token(Some("t1".to_owned()));
    store.state().update(|s| s.is_authenticated = true);

    store.logout();

    assert!(!store.snapshot().is_inconsistent());
    assert_signed_out(&store.snapshot());
}

// =========================================================================
// refresh_user
// =========================================================================

#[tokio::test]
async fn refresh_without_session_is_noop() {
    let api = Arc::new(MockAuthApi::default());
    let storage = Arc::new(MemoryStorage::new());
    let store = hydrated_store(&api, &storage);

    store.refresh_user().await;
    store.set_token(Some("t1".to_owned()));
    store.refresh_user().await;

    assert!(api.fetch_calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn refresh_replaces_user_with_bearer_token() {
    let api = Arc::new(MockAuthApi::default());
    api.login_results.lock().unwrap().push_back(login_ok("u1", "t1"));
    let refreshed = User { id: "u1".to_owned(), is_verified: true, ..User::default() };
    api.fetch_results.lock().unwrap().push_back(Ok(refreshed.clone()));
    let storage = Arc::new(MemoryStorage::new());
    let store = hydrated_store(&api, &storage);
    store.login(credentials("a@b.com", "pw")).await.unwrap();

    store.refresh_user().await;

    assert_eq!(*api.fetch_calls.lock().unwrap(), vec![("u1".to_owned(), "t1".to_owned())]);
    assert_eq!(store.snapshot().user, Some(refreshed));
    assert!(store.snapshot().is_authenticated);
}

#[tokio::test]
async fn refresh_failure_leaves_session_untouched() {
    let api = Arc::new(MockAuthApi::default());
    api.login_results.lock().unwrap().push_back(login_ok("u1", "t1"));
    api.fetch_results.lock().unwrap().push_back(Err(ApiError::Status { status: 401, message: "Request failed".to_owned() }));
    let storage = Arc::new(MemoryStorage::new());
    let store = hydrated_store(&api, &storage);
    store.login(credentials("a@b.com", "pw")).await.unwrap();
    let before = store.snapshot();

    store.refresh_user().await;

    assert_eq!(store.snapshot(), before);
}

// =========================================================================
// hydration + persistence
// =========================================================================

#[test]
fn hydrate_restores_persisted_subset_once() {
    let raw = r#"{"state":{"user":{"id":"u1"},"token":"t1","isAuthenticated":true},"version":0}"#;
    let storage = Arc::new(MemoryStorage::with_item(STORAGE_KEY, raw));
    let store = SessionStore::new(Arc::new(MockAuthApi::default()), storage.clone());
    assert!(!store.snapshot().has_hydrated);

    store.hydrate();
    let session = store.snapshot();
    assert!(session.has_hydrated);
    assert_eq!(session.user, Some(user("u1")));
    assert_eq!(session.token.as_deref(), Some("t1"));
    assert!(session.is_authenticated);
    assert!(!session.is_loading);
    assert!(session.error.is_none());

    storage.remove_item(STORAGE_KEY);
    store.hydrate();
    assert_eq!(store.snapshot().user, Some(user("u1")));
}

#[test]
fn hydrate_with_empty_or_corrupt_storage_yields_empty_session() {
    for storage in [MemoryStorage::new(), MemoryStorage::with_item(STORAGE_KEY, "garbage")] {
        let store = SessionStore::new(Arc::new(MockAuthApi::default()), Arc::new(storage));
        store.hydrate();
        let session = store.snapshot();
        assert!(session.has_hydrated);
        assert_signed_out(&session);
    }
}

#[tokio::test]
async fn every_commit_writes_persisted_subset() {
    let api = Arc::new(MockAuthApi::default());
    api.login_results.lock().unwrap().push_back(login_ok("u1", "t1"));
    let storage = Arc::new(MemoryStorage::new());
    let store = hydrated_store(&api, &storage);

    store.login(credentials("a@b.com", "pw")).await.unwrap();
    let envelope = stored_envelope(&storage);
    assert_eq!(envelope.version, 0);
    assert_eq!(envelope.state.user, Some(user("u1")));
    assert_eq!(envelope.state.token.as_deref(), Some("t1"));
    assert!(envelope.state.is_authenticated);

    store.logout();
    assert_eq!(stored_envelope(&storage).state, PersistedSession::default());
}

#[test]
fn nothing_is_persisted_before_hydration() {
    let raw = r#"{"state":{"user":{"id":"u1"},"token":"t1","isAuthenticated":true},"version":0}"#;
    let storage = Arc::new(MemoryStorage::with_item(STORAGE_KEY, raw));
    let store = SessionStore::new(Arc::new(MockAuthApi::default()), storage.clone());

    store.set_loading(true);
    store.set_error("early");

    assert_eq!(storage.get_item(STORAGE_KEY).as_deref(), Some(raw));
}

#[tokio::test]
async fn persisted_session_survives_restart() {
    let api = Arc::new(MockAuthApi::default());
    api.login_results.lock().unwrap().push_back(login_ok("u1", "t1"));
    let storage = Arc::new(MemoryStorage::new());
    let store = hydrated_store(&api, &storage);
    store.login(credentials("a@b.com", "pw")).await.unwrap();
    store.set_error("transient");

    let restarted = SessionStore::new(Arc::new(MockAuthApi::default()), storage.clone());
    restarted.hydrate();

    let session = restarted.snapshot();
    assert_eq!(session.user, Some(user("u1")));
    assert!(session.is_authenticated);
    assert!(session.error.is_none());
}

// =========================================================================
// setters
// =========================================================================

#[test]
fn set_user_keeps_authenticated_flag_in_sync() {
    let store = SessionStore::new(Arc::new(MockAuthApi::default()), Arc::new(MemoryStorage::new()));
    store.set_user(Some(user("u1")));
    assert!(store.snapshot().is_authenticated);
    store.set_user(None);
    assert!(!store.snapshot().is_authenticated);
}

#[test]
fn plain_setters_assign_fields() {
    let store = SessionStore::new(Arc::new(MockAuthApi::default()), Arc::new(MemoryStorage::new()));
    store.set_token(Some("t9".to_owned()));
    store.set_loading(true);
    store.set_error("nope");
    store.set_has_hydrated(true);
    let session = store.snapshot();
    assert_eq!(session.token.as_deref(), Some("t9"));
    assert!(session.is_loading);
    assert_eq!(session.error.as_deref(), Some("nope"));
    assert!(session.has_hydrated);

    store.clear_error();
    assert!(store.snapshot().error.is_none());
}
