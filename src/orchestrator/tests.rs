use super::*;
use crate::acquire::{Browser, BrowserContext, BrowserError, Page};
use crate::core::RetryPolicy;
use crate::credentials::SessionCookie;
use crate::error::ErrorKind;
use crate::platforms::{EspnOptions, SleeperOptions};
use crate::types::Season;
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

const SETTINGS: &str = include_str!("../../tests/fixtures/espn_settings.html");
const ROSTERS: &str = include_str!("../../tests/fixtures/espn_rosters.html");
const LOGIN: &str = include_str!("../../tests/fixtures/espn_login.html");

const SETTINGS_PATH: &str = "/football/league/settings";
const ROSTERS_PATH: &str = "/football/league/rosters";

#[derive(Clone, Copy)]
enum Route {
    Html(&'static str),
    LoginRedirect,
    Hang,
    Detached,
}

/// Scripted stand-in for a real browser, keyed by URL path.
struct FakeState {
    routes: HashMap<&'static str, Route>,
    delay: Duration,
    launches: AtomicU32,
    contexts: AtomicU32,
    closes: AtomicU32,
    navigations: AtomicU32,
}

impl FakeState {
    fn new(routes: &[(&'static str, Route)]) -> Arc<Self> {
        Self::with_delay(routes, Duration::ZERO)
    }

    fn with_delay(routes: &[(&'static str, Route)], delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            routes: routes.iter().copied().collect(),
            delay,
            launches: AtomicU32::new(0),
            contexts: AtomicU32::new(0),
            closes: AtomicU32::new(0),
            navigations: AtomicU32::new(0),
        })
    }

    fn count(counter: &AtomicU32) -> u32 {
        counter.load(Ordering::SeqCst)
    }
}

struct FakeLauncher(Arc<FakeState>);
struct FakeBrowser(Arc<FakeState>);
struct FakeContext(Arc<FakeState>);

#[async_trait]
impl BrowserLauncher for FakeLauncher {
    async fn launch(&self) -> std::result::Result<Arc<dyn Browser>, BrowserError> {
        self.0.launches.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(FakeBrowser(Arc::clone(&self.0))))
    }
}

#[async_trait]
impl Browser for FakeBrowser {
    async fn new_context(&self) -> std::result::Result<Box<dyn BrowserContext>, BrowserError> {
        self.0.contexts.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeContext(Arc::clone(&self.0))))
    }
}

#[async_trait]
impl BrowserContext for FakeContext {
    async fn set_cookies(
        &mut self,
        _origin: &Url,
        _cookies: &[SessionCookie],
    ) -> std::result::Result<(), BrowserError> {
        Ok(())
    }

    async fn goto(&mut self, url: &Url) -> std::result::Result<Page, BrowserError> {
        self.0.navigations.fetch_add(1, Ordering::SeqCst);
        if !self.0.delay.is_zero() {
            tokio::time::sleep(self.0.delay).await;
        }
        let page = |url: Url, status: u16, html: &str| Page {
            url,
            status,
            html: html.to_string(),
        };
        match self.0.routes.get(url.path()).copied() {
            Some(Route::Html(html)) => Ok(page(url.clone(), 200, html)),
            Some(Route::LoginRedirect) => {
                let login = Url::parse("https://registerdisney.go.com/jgc/v8/guest/login")
                    .map_err(|e| BrowserError::Navigation(e.to_string()))?;
                Ok(page(login, 200, LOGIN))
            }
            Some(Route::Hang) => std::future::pending().await,
            Some(Route::Detached) => Err(BrowserError::DetachedFrame),
            None => Ok(page(url.clone(), 404, "<h1>Not Found</h1>")),
        }
    }

    async fn close(self: Box<Self>) {
        self.0.closes.fetch_add(1, Ordering::SeqCst);
    }
}

fn config() -> ImportConfig {
    let mut config = ImportConfig::default();
    config.endpoints.espn = "https://fantasy.espn.test".to_string();
    config.catalog_cache.dir = None;
    config.retry = RetryPolicy {
        max_retries: 2,
        base_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(4),
    };
    config
}

fn importer(state: &Arc<FakeState>, config: ImportConfig) -> Importer {
    Importer::with_launcher(config, Arc::new(FakeLauncher(Arc::clone(state)))).unwrap()
}

fn espn_options() -> ImportOptions {
    ImportOptions::Espn(EspnOptions {
        league_id: 123456,
        season: Season::new(2025),
    })
}

fn espn_cookies(swid: &str) -> Credentials {
    Credentials::SessionCookies(vec![
        SessionCookie::new("SWID", swid),
        SessionCookie::new("espn_s2", "AEBxyz"),
    ])
}

fn league_routes() -> Vec<(&'static str, Route)> {
    vec![(SETTINGS_PATH, Route::Html(SETTINGS)), (ROSTERS_PATH, Route::Html(ROSTERS))]
}

#[tokio::test]
async fn test_espn_import_end_to_end() {
    let state = FakeState::new(&league_routes());
    let importer = importer(&state, config());

    let result = importer
        .import_league(Platform::Espn, espn_options(), espn_cookies("{A}"))
        .await
        .unwrap();

    assert_eq!(result.league_id, "123456");
    assert_eq!(result.league_name.as_deref(), Some("Gridiron Syndicate"));
    assert_eq!(result.teams.len(), 2);
    assert_eq!(result.scoring_settings.get("passing_td"), Some(&4.0));
    assert_eq!(FakeState::count(&state.contexts), 1);
    assert_eq!(FakeState::count(&state.closes), 1);
    assert_eq!(importer.browser_pool().open_contexts(), 0);
    assert_eq!(importer.in_flight(), 0);
}

#[tokio::test]
async fn test_platform_mismatch_is_configuration_error() {
    let state = FakeState::new(&[]);
    let importer = importer(&state, config());

    let err = importer
        .import_league(Platform::Yahoo, espn_options(), Credentials::None)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert!(!importer.browser_pool().is_launched());
}

#[tokio::test]
async fn test_missing_cookies_fail_before_any_io() {
    let state = FakeState::new(&league_routes());
    let importer = importer(&state, config());

    let err = importer
        .import_league(Platform::Espn, espn_options(), Credentials::None)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert_eq!(FakeState::count(&state.launches), 0);
    assert_eq!(FakeState::count(&state.navigations), 0);
}

#[tokio::test]
async fn test_login_redirect_is_not_retried() {
    let state = FakeState::new(&[(SETTINGS_PATH, Route::LoginRedirect)]);
    let importer = importer(&state, config());

    let err = importer
        .import_league(Platform::Espn, espn_options(), espn_cookies("{A}"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Authentication);
    assert_eq!(FakeState::count(&state.contexts), 1);
    assert_eq!(FakeState::count(&state.closes), 1);
    assert_eq!(importer.browser_pool().open_contexts(), 0);
}

#[tokio::test]
async fn test_transient_failures_retry_up_to_cap() {
    let state = FakeState::new(&[(SETTINGS_PATH, Route::Detached)]);
    let importer = importer(&state, config());

    let err = importer
        .import_league(Platform::Espn, espn_options(), espn_cookies("{A}"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transient);
    // first attempt plus max_retries, each in a fresh context
    assert_eq!(FakeState::count(&state.contexts), 3);
    assert_eq!(FakeState::count(&state.closes), 3);
    assert_eq!(importer.browser_pool().open_contexts(), 0);
}

#[tokio::test]
async fn test_missing_league_page_is_not_found() {
    let state = FakeState::new(&[]);
    let importer = importer(&state, config());

    let err = importer
        .import_league(Platform::Espn, espn_options(), espn_cookies("{A}"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(FakeState::count(&state.contexts), 1);
}

#[tokio::test]
async fn test_empty_league_is_not_found() {
    let state = FakeState::new(&[
        (SETTINGS_PATH, Route::Html(SETTINGS)),
        (ROSTERS_PATH, Route::Html("<html><body>No teams</body></html>")),
    ]);
    let importer = importer(&state, config());

    let err = importer
        .import_league(Platform::Espn, espn_options(), espn_cookies("{A}"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_budget_exhaustion_times_out_and_releases_context() {
    let state = FakeState::new(&[(SETTINGS_PATH, Route::Hang)]);
    let mut config = config();
    config.job_budget = Duration::from_millis(150);
    config.cancel_grace = Duration::from_millis(100);
    let importer = importer(&state, config);

    let started = Instant::now();
    let err = importer
        .import_league(Platform::Espn, espn_options(), espn_cookies("{A}"))
        .await
        .unwrap_err();

    assert_eq!(err, ImportError::Timeout { budget_ms: 150 });
    assert!(started.elapsed() < Duration::from_millis(150 + 100 + 200));
    assert_eq!(FakeState::count(&state.contexts), 1);
    assert_eq!(FakeState::count(&state.closes), 1);
    assert_eq!(importer.browser_pool().open_contexts(), 0);
    assert_eq!(importer.in_flight(), 0);
}

#[tokio::test]
async fn test_identical_requests_share_one_job() {
    let state = FakeState::with_delay(&league_routes(), Duration::from_millis(50));
    let importer = importer(&state, config());

    let (a, b) = tokio::join!(
        importer.import_league(Platform::Espn, espn_options(), espn_cookies("{A}")),
        importer.import_league(Platform::Espn, espn_options(), espn_cookies("{A}")),
    );

    let (a, b) = (a.unwrap(), b.unwrap());
    assert_eq!(a, b);
    assert_eq!(FakeState::count(&state.contexts), 1);
    assert_eq!(FakeState::count(&state.navigations), 2);
    assert_eq!(importer.in_flight(), 0);
}

#[tokio::test]
async fn test_different_callers_do_not_share_jobs() {
    let state = FakeState::with_delay(&league_routes(), Duration::from_millis(20));
    let importer = importer(&state, config());

    let (a, b) = tokio::join!(
        importer.import_league(Platform::Espn, espn_options(), espn_cookies("{A}")),
        importer.import_league(Platform::Espn, espn_options(), espn_cookies("{B}")),
    );

    assert!(a.unwrap().same_content(&b.unwrap()));
    assert_eq!(FakeState::count(&state.contexts), 2);
    assert_eq!(FakeState::count(&state.launches), 1);
}

#[tokio::test]
async fn test_sequential_imports_are_idempotent() {
    let state = FakeState::new(&league_routes());
    let importer = importer(&state, config());

    let first = importer
        .import_league(Platform::Espn, espn_options(), espn_cookies("{A}"))
        .await
        .unwrap();
    let second = importer
        .import_league(Platform::Espn, espn_options(), espn_cookies("{A}"))
        .await
        .unwrap();

    assert!(first.same_content(&second));
    assert_eq!(FakeState::count(&state.contexts), 2);
}

#[tokio::test]
async fn test_abandoned_job_is_dropped() {
    let state = FakeState::new(&[(SETTINGS_PATH, Route::Hang)]);
    let importer = importer(&state, config());

    let task = {
        let importer = importer.clone();
        tokio::spawn(async move {
            importer
                .import_league(Platform::Espn, espn_options(), espn_cookies("{A}"))
                .await
        })
    };

    while FakeState::count(&state.navigations) == 0 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(importer.in_flight(), 1);
    assert_eq!(importer.browser_pool().open_contexts(), 1);

    task.abort();
    assert!(task.await.unwrap_err().is_cancelled());

    assert_eq!(importer.in_flight(), 0);
    assert_eq!(importer.browser_pool().open_contexts(), 0);

    for _ in 0..50 {
        if FakeState::count(&state.closes) == 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(FakeState::count(&state.closes), 1);
}

#[tokio::test]
async fn test_invalid_config_is_rejected() {
    let state = FakeState::new(&[]);
    let mut config = config();
    config.retry.base_delay = Duration::from_secs(10);
    config.retry.max_delay = Duration::from_secs(1);

    let err = Importer::with_launcher(config, Arc::new(FakeLauncher(state)))
        .err()
        .unwrap();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[tokio::test]
async fn test_sleeper_bad_id_never_touches_browser() {
    let state = FakeState::new(&[]);
    let importer = importer(&state, config());

    let err = importer
        .import_league(
            Platform::Sleeper,
            ImportOptions::Sleeper(SleeperOptions {
                league_id: "not-a-number".to_string(),
            }),
            Credentials::None,
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert!(!importer.browser_pool().is_launched());
}

#[test]
fn test_job_status_display() {
    assert_eq!(JobStatus::Pending.to_string(), "pending");
    assert_eq!(JobStatus::Succeeded.to_string(), "succeeded");
    assert_eq!(
        serde_json::to_string(&JobStatus::Failed).unwrap(),
        "\"failed\""
    );
}
