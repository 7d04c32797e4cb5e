use std::fs;
use std::net::TcpListener;
use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use tempfile::tempdir;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

fn write_session(home: &Path, token: &str) {
    fs::write(
        home.join("session.json"),
        json!({ "accessToken": token }).to_string(),
    )
    .unwrap();
}

fn eventdesk(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("eventdesk");
    cmd.env("EVENTDESK_HOME", home)
        .env_remove("EVENTDESK_API_URL")
        .env_remove("EVENTDESK_PASSWORD")
        .env_remove("EVENTDESK_LOG");
    cmd
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_login_stores_access_token() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/admin-login"))
        .and(body_json(json!({ "email": "root@test.com", "password": "1234" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "accessToken": "abc" })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    eventdesk(dir.path())
        .args(["--api-url", &server.uri()])
        .args(["login", "--email", "root@test.com", "--password", "1234"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in as root@test.com"));

    let session = fs::read_to_string(dir.path().join("session.json")).unwrap();
    let session: serde_json::Value = serde_json::from_str(&session).unwrap();
    assert_eq!(session["accessToken"], "abc");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_login_failure_shows_server_message() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/admin-login"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid credentials"))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    eventdesk(dir.path())
        .env("EVENTDESK_API_URL", server.uri())
        .args(["login", "--email", "root@test.com", "--password", "wrong"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Invalid credentials"));

    assert!(!dir.path().join("session.json").exists());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_quizzes_prints_table_and_summary() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/quizzes"))
        .and(query_param("page", "1"))
        .and(header("authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [
                { "id": 11, "questionText": "Capital of France?", "type": "CHOICE" },
                { "id": 12, "type": "OX" }
            ],
            "page": 1,
            "size": 2,
            "totalPages": 3,
            "totalElements": 6,
            "first": false,
            "last": false
        })))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    write_session(dir.path(), "abc");
    eventdesk(dir.path())
        .args(["--api-url", &server.uri(), "quizzes", "--page", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Capital of France?"))
        .stdout(predicate::str::contains("Quiz 12"))
        .stdout(predicate::str::contains("6 items · page 2 / 3"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_quizzes_empty_page() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/quizzes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "content": [] })))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    write_session(dir.path(), "abc");
    eventdesk(dir.path())
        .args(["--api-url", &server.uri(), "quizzes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No quizzes."))
        .stdout(predicate::str::contains("0 items · page 1 / 1"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_events_json_output() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/events"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{ "id": 7, "name": "Spring week", "status": "OPEN" }])),
        )
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    write_session(dir.path(), "abc");
    let output = eventdesk(dir.path())
        .args(["--api-url", &server.uri(), "events", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let events: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(events[0]["id"], 7);
    assert_eq!(events[0]["name"], "Spring week");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_quizzes_json_prints_body_as_sent() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let body = json!({
        "content": [{ "id": 1, "extraField": "x" }],
        "page": 0,
        "totalPages": 1
    });
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/quizzes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    write_session(dir.path(), "abc");
    let output = eventdesk(dir.path())
        .args(["--api-url", &server.uri(), "quizzes", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let printed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(printed, body);
    assert_eq!(printed["content"][0]["extraField"], "x");
    assert!(!String::from_utf8_lossy(&output.stdout).contains("null"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_events_error_uses_status_fallback() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/events"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    write_session(dir.path(), "abc");
    eventdesk(dir.path())
        .args(["--api-url", &server.uri(), "events"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("event list request failed (status 500)"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_policies_empty_list() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/reward-policies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    write_session(dir.path(), "abc");
    eventdesk(dir.path())
        .args(["--api-url", &server.uri(), "policies"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No reward policies."));
}

#[test]
fn test_list_requires_login() {
    let dir = tempdir().unwrap();

    eventdesk(dir.path())
        .args(["--api-url", "https://admin.example.com", "events"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Not logged in. Run `eventdesk login` first.",
        ));
}

#[test]
fn test_missing_api_url_is_reported() {
    let dir = tempdir().unwrap();
    write_session(dir.path(), "abc");

    eventdesk(dir.path())
        .arg("quizzes")
        .assert()
        .failure()
        .stderr(predicate::str::contains("API URL is not configured"));
}

#[test]
fn test_logout_clears_session_and_status_reports_it() {
    let dir = tempdir().unwrap();
    write_session(dir.path(), "eyJhbGciOiJIUzI1NiJ9.secret-payload");

    eventdesk(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Session: eyJhbGciOiJI..."))
        .stdout(predicate::str::contains("secret-payload").not());

    eventdesk(dir.path())
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out."));
    assert!(!dir.path().join("session.json").exists());

    eventdesk(dir.path())
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in."));
}
