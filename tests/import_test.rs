//! End-to-end imports through the public API against a mock platform server.

use league_import::config::ImportConfig;
use league_import::core::RetryPolicy;
use league_import::{
    CbsOptions, Credentials, ErrorKind, EspnOptions, ImportOptions, Importer, Platform,
    PlayerStatus, Position, RosterSlot, Season, SessionCookie, SleeperOptions, YahooOptions,
};
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{header_regex, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fixture(name: &str) -> String {
    let path = format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"));
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("fixture {path}: {e}"))
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8")
}

fn test_config(server: &MockServer) -> ImportConfig {
    let mut config = ImportConfig::default();
    config.endpoints.espn = server.uri();
    config.endpoints.yahoo = server.uri();
    config.endpoints.sleeper_api = server.uri();
    config.endpoints.sleeper_web = server.uri();
    // leagues are subdomains of the suffix; the mock server's `127` plays the league
    config.endpoints.cbs_host_suffix = "0.0.1".to_string();
    config.catalog_cache.dir = None;
    config.navigation_timeout = Duration::from_secs(5);
    config.retry = RetryPolicy {
        max_retries: 2,
        base_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(4),
    };
    config
}

fn espn_options() -> ImportOptions {
    ImportOptions::Espn(EspnOptions {
        league_id: 123456,
        season: Season::new(2024),
    })
}

fn espn_cookies() -> Credentials {
    Credentials::SessionCookies(vec![
        SessionCookie::new("SWID", "{4D2B-TEST}"),
        SessionCookie::new("espn_s2", "s2token"),
    ])
}

async fn mount_espn_page(server: &MockServer, page: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/football/league/{page}")))
        .and(query_param("leagueId", "123456"))
        .and(query_param("seasonId", "2024"))
        .and(header_regex("cookie", "espn_s2=s2token"))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_espn_import_through_session() {
    let server = MockServer::start().await;
    mount_espn_page(&server, "settings", html(fixture("espn_settings.html"))).await;
    mount_espn_page(&server, "rosters", html(fixture("espn_rosters.html"))).await;

    let importer = Importer::new(test_config(&server)).unwrap();
    let league = importer
        .import_league(Platform::Espn, espn_options(), espn_cookies())
        .await
        .unwrap();

    assert_eq!(league.source_platform, Platform::Espn);
    assert_eq!(league.league_id, "123456");
    assert_eq!(league.league_name.as_deref(), Some("Gridiron Syndicate"));
    assert_eq!(league.raw_source_version, "espn-dom-v1/map-v1");
    assert_eq!(league.scoring_settings.get("passing_td"), Some(&4.0));
    assert_eq!(league.scoring_settings.get("interceptions_thrown"), Some(&-2.0));
    assert!(league.warnings.is_empty(), "{:?}", league.warnings);

    let ids: Vec<&str> = league.teams.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, ["1", "2"]);

    let allen = league.team("1").unwrap();
    assert_eq!(allen.name, "Allen Wrenches");
    assert_eq!(allen.owner_display_name, "Jordan Miller");
    assert_eq!(allen.roster.len(), 4);

    let jefferson = &allen.roster[1];
    assert_eq!(jefferson.team.as_deref(), Some("MIN"));
    assert_eq!(jefferson.status, PlayerStatus::Questionable);
    assert_eq!(jefferson.roster_slot, RosterSlot::Starter);

    let defense = &allen.roster[2];
    assert_eq!(defense.id, "-16002");
    assert_eq!(defense.position, Position::DEF);

    let cmc = &allen.roster[3];
    assert_eq!(cmc.roster_slot, RosterSlot::Bench);
    assert_eq!(cmc.status, PlayerStatus::Out);

    let ir = &league.team("2").unwrap().roster[2];
    assert_eq!(ir.roster_slot, RosterSlot::InjuredReserve);
    assert_eq!(ir.team, None);

    assert_eq!(importer.browser_pool().open_contexts(), 0);
    importer.shutdown().await;
}

#[tokio::test]
async fn test_espn_login_redirect_is_authentication_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/football/league/settings"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("location", format!("{}/login?returnUrl=settings", server.uri())),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(html(fixture("espn_login.html")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/football/league/rosters"))
        .respond_with(html(fixture("espn_rosters.html")))
        .expect(0)
        .mount(&server)
        .await;

    let importer = Importer::new(test_config(&server)).unwrap();
    let err = importer
        .import_league(Platform::Espn, espn_options(), espn_cookies())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Authentication);
    assert!(!err.to_string().contains("s2token"));
    assert_eq!(importer.browser_pool().open_contexts(), 0);
}

#[tokio::test]
async fn test_espn_server_errors_are_retried_then_transient() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/football/league/settings"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let importer = Importer::new(test_config(&server)).unwrap();
    let err = importer
        .import_league(Platform::Espn, espn_options(), espn_cookies())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transient);
    assert_eq!(importer.browser_pool().open_contexts(), 0);
}

#[tokio::test]
async fn test_yahoo_import_visits_every_team_page() {
    let server = MockServer::start().await;
    for (p, file) in [
        ("/f1/12345", "yahoo_standings.html"),
        ("/f1/12345/1", "yahoo_team_1.html"),
        ("/f1/12345/2", "yahoo_team_2.html"),
        ("/f1/12345/settings", "yahoo_settings.html"),
    ] {
        Mock::given(method("GET"))
            .and(path(p))
            .respond_with(html(fixture(file)))
            .expect(1)
            .mount(&server)
            .await;
    }

    let importer = Importer::new(test_config(&server)).unwrap();
    let league = importer
        .import_league(
            Platform::Yahoo,
            ImportOptions::Yahoo(YahooOptions {
                league_key: "449.l.12345".to_string(),
            }),
            Credentials::from_cookie_header("T=z=abc; Y=v=1").unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(league.league_id, "449.l.12345");
    assert_eq!(league.league_name.as_deref(), Some("Sunday Scaries"));
    assert_eq!(league.teams.len(), 2);
    assert_eq!(league.scoring_settings.get("receptions"), Some(&1.0));

    let taylor = league.team("1").unwrap();
    assert_eq!(taylor.owner_display_name, "Casey");
    assert_eq!(taylor.roster[1].roster_slot, RosterSlot::Starter);
    assert_eq!(taylor.roster[1].status, PlayerStatus::Questionable);
    assert_eq!(taylor.roster[2].position, Position::DEF);
    assert_eq!(taylor.roster[3].status, PlayerStatus::Out);

    // Team page without a manager: default owner, one warning
    let bijan = league.team("2").unwrap();
    assert_eq!(bijan.name, "Bijan Mustard");
    assert_eq!(bijan.owner_display_name, "Unknown Owner");
    assert_eq!(league.warnings.len(), 1);
    assert_eq!(league.warnings[0].team_id.as_deref(), Some("2"));
    assert_eq!(league.warnings[0].field, "ownerDisplayName");
}

#[tokio::test]
async fn test_cbs_import_keeps_partial_rosters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/teams/all"))
        .respond_with(html(fixture("cbs_rosters.html")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/league/rules/scoring"))
        .respond_with(html(fixture("cbs_scoring.html")))
        .mount(&server)
        .await;

    let importer = Importer::new(test_config(&server)).unwrap();
    let league = importer
        .import_league(
            Platform::Cbs,
            ImportOptions::Cbs(CbsOptions {
                league_url: server.uri(),
            }),
            Credentials::from_cookie_header("pid=abc").unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(league.league_name.as_deref(), Some("Monday Night Madness"));
    assert_eq!(league.scoring_settings.get("passing_td"), Some(&6.0));
    assert_eq!(league.scoring_settings.get("reception"), Some(&0.5));

    let hurts = league.team("3").unwrap();
    assert_eq!(hurts.roster.len(), 2);
    assert_eq!(hurts.roster[1].roster_slot, RosterSlot::Bench);
    assert_eq!(hurts.roster[1].status, PlayerStatus::Questionable);

    let lamb = league.team("4").unwrap();
    assert_eq!(lamb.owner_display_name, "Unknown Owner");
    assert_eq!(lamb.roster.len(), 1);

    let fields: Vec<&str> = league.warnings.iter().map(|w| w.field.as_str()).collect();
    assert_eq!(fields, ["ownerDisplayName", "id"]);
}

#[tokio::test]
async fn test_cbs_rejects_foreign_host_without_io() {
    let server = MockServer::start().await;
    let importer = Importer::new(test_config(&server)).unwrap();

    let err = importer
        .import_league(
            Platform::Cbs,
            ImportOptions::Cbs(CbsOptions {
                league_url: "https://evil.example.com".to_string(),
            }),
            Credentials::from_cookie_header("pid=abc").unwrap(),
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert!(!importer.browser_pool().is_launched());
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

fn ten_team_league() -> (Value, Value, Value, Value) {
    let league = json!({
        "league_id": "987654321",
        "name": "Dynasty Degenerates",
        "scoring_settings": { "rec": 1.0, "pass_td": 6.0 }
    });
    let rosters: Vec<Value> = (1..=10)
        .map(|n| {
            json!({
                "roster_id": n,
                "owner_id": format!("u{n}"),
                "players": [format!("{}", 1000 + n)],
                "starters": [format!("{}", 1000 + n)]
            })
        })
        .collect();
    let users: Vec<Value> = (1..=10)
        .map(|n| {
            let name = if n == 3 || n == 7 {
                Value::Null
            } else {
                json!(format!("manager{n}"))
            };
            json!({ "user_id": format!("u{n}"), "display_name": name, "metadata": {} })
        })
        .collect();
    let mut players = serde_json::Map::new();
    for n in 1..=10 {
        players.insert(
            format!("{}", 1000 + n),
            json!({ "full_name": format!("Player {n}"), "position": "RB", "team": "NYJ" }),
        );
    }
    (league, json!(rosters), json!(users), Value::Object(players))
}

async fn mount_json(server: &MockServer, p: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(p))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_sleeper_ten_team_league_with_unnamed_owners() {
    let server = MockServer::start().await;
    let (league, rosters, users, players) = ten_team_league();
    mount_json(&server, "/league/987654321", league).await;
    mount_json(&server, "/league/987654321/rosters", rosters).await;
    mount_json(&server, "/league/987654321/users", users).await;
    mount_json(&server, "/players/nfl", players).await;
    Mock::given(method("GET"))
        .and(path("/leagues/987654321"))
        .respond_with(html(
            r#"<html><body><span data-owner-id="u3">carol</span></body></html>"#.to_string(),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let importer = Importer::new(test_config(&server)).unwrap();
    let league = importer
        .import_league(
            Platform::Sleeper,
            ImportOptions::Sleeper(SleeperOptions {
                league_id: "987654321".to_string(),
            }),
            Credentials::None,
        )
        .await
        .unwrap();

    assert_eq!(league.teams.len(), 10);
    assert_eq!(league.player_count(), 10);
    assert_eq!(league.raw_source_version, "sleeper-api-v1/map-v1");
    assert_eq!(league.scoring_settings.get("pass_td"), Some(&6.0));
    assert_eq!(league.team("1").unwrap().owner_display_name, "manager1");
    assert_eq!(league.team("3").unwrap().owner_display_name, "carol");
    assert_eq!(league.team("7").unwrap().owner_display_name, "Unknown Owner");
    assert_eq!(league.team("7").unwrap().name, "Team 7");
    assert!(league
        .teams
        .iter()
        .all(|t| t.roster[0].roster_slot == RosterSlot::Starter));

    assert_eq!(league.warnings.len(), 1);
    assert_eq!(league.warnings[0].team_id.as_deref(), Some("7"));
    assert_eq!(importer.in_flight(), 0);
}

#[tokio::test]
async fn test_sleeper_unresolved_owners_get_default_name() {
    let server = MockServer::start().await;
    let (league, rosters, users, players) = ten_team_league();
    mount_json(&server, "/league/987654321", league).await;
    mount_json(&server, "/league/987654321/rosters", rosters).await;
    mount_json(&server, "/league/987654321/users", users).await;
    mount_json(&server, "/players/nfl", players).await;
    Mock::given(method("GET"))
        .and(path("/leagues/987654321"))
        .respond_with(html(
            r#"<html><body><span data-owner-id="u99">stranger</span></body></html>"#.to_string(),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let importer = Importer::new(test_config(&server)).unwrap();
    let league = importer
        .import_league(
            Platform::Sleeper,
            ImportOptions::Sleeper(SleeperOptions {
                league_id: "987654321".to_string(),
            }),
            Credentials::None,
        )
        .await
        .unwrap();

    assert_eq!(league.teams.len(), 10);
    assert!(league.teams.iter().all(|t| !t.roster.is_empty()));
    assert_eq!(league.team("3").unwrap().owner_display_name, "Unknown Owner");
    assert_eq!(league.team("7").unwrap().owner_display_name, "Unknown Owner");
    assert_eq!(league.team("4").unwrap().owner_display_name, "manager4");

    let mut flagged: Vec<&str> = league
        .warnings
        .iter()
        .filter_map(|w| w.team_id.as_deref())
        .collect();
    flagged.sort_unstable();
    assert_eq!(flagged, ["3", "7"]);
    assert!(league
        .warnings
        .iter()
        .all(|w| w.field == "ownerDisplayName" && w.player_id.is_none()));
    assert_eq!(league.warnings.len(), 2);
}

#[tokio::test]
async fn test_sleeper_concurrent_requests_share_one_job() {
    let server = MockServer::start().await;
    let (league, rosters, mut users, players) = ten_team_league();
    for user in users.as_array_mut().unwrap() {
        user["display_name"] = json!("named");
    }
    Mock::given(method("GET"))
        .and(path("/league/987654321"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(league)
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_json(&server, "/league/987654321/rosters", rosters).await;
    mount_json(&server, "/league/987654321/users", users).await;
    mount_json(&server, "/players/nfl", players).await;

    let importer = Importer::new(test_config(&server)).unwrap();
    let options = ImportOptions::Sleeper(SleeperOptions {
        league_id: "987654321".to_string(),
    });
    let (a, b) = tokio::join!(
        importer.import_league(Platform::Sleeper, options.clone(), Credentials::None),
        importer.import_league(Platform::Sleeper, options, Credentials::None),
    );

    let (a, b) = (a.unwrap(), b.unwrap());
    assert_eq!(a, b);
    assert!(a.warnings.is_empty());
}
