//! End-to-end suite runs against a local mock server.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use httpmock::prelude::*;

use httpspec_core::{FailureReason, Outcome};
use httpspec_runner::{run_pool, ErrorSink, FileRunner, HttpTransport, Tally, DEFAULT_TIMEOUT};

fn write_suite(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

fn run_one(path: &Path) -> (httpspec_core::FileReport, httpspec_core::Counts) {
    let transport = HttpTransport::new(DEFAULT_TIMEOUT).unwrap();
    let sink = ErrorSink::discard();
    let tally = Tally::new();
    let report = FileRunner::new(&transport, &sink, &tally).run_file(path);
    (report, tally.snapshot())
}

#[test]
fn status_mismatch_fails_with_expected_and_actual() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/status/404");
        then.status(404);
    });

    let dir = tempfile::tempdir().unwrap();
    let path = write_suite(
        dir.path(),
        "status.http",
        &format!(
            "### example\nGET {}\n//# status == 403\n",
            server.url("/status/404")
        ),
    );

    let (report, counts) = run_one(&path);
    assert_eq!(report.outcome, Outcome::Fail);
    assert_eq!(report.failures.len(), 1);
    let failure = &report.failures[0];
    assert_eq!(failure.reason, FailureReason::StatusMismatch);
    assert_eq!(failure.expected, "403");
    assert_eq!(failure.actual, "404");
    assert_eq!(failure.request_name.as_deref(), Some("example"));
    assert_eq!(counts.fail, 1);
}

#[test]
fn second_request_failure_skips_the_third() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/first");
        then.status(200);
    });
    server.mock(|when, then| {
        when.method(GET).path("/second");
        then.status(500);
    });
    let third = server.mock(|when, then| {
        when.method(GET).path("/third");
        then.status(200);
    });

    let dir = tempfile::tempdir().unwrap();
    let path = write_suite(
        dir.path(),
        "chain.http",
        &format!(
            "GET {}\n//# status == 200\n\
             ###\n\
             GET {}\n//# status == 200\n\
             ###\n\
             GET {}\n//# status == 200\n",
            server.url("/first"),
            server.url("/second"),
            server.url("/third"),
        ),
    );

    let (report, counts) = run_one(&path);
    assert_eq!(report.outcome, Outcome::Fail);
    assert_eq!(report.failures.len(), 1);
    third.assert_hits(0);
    assert_eq!(counts.total, 1);
    assert_eq!(counts.fail, 1);
}

#[test]
fn missing_header_equal_fails_but_negated_contains_passes() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/plain");
        then.status(200).body("ok");
    });

    let dir = tempfile::tempdir().unwrap();
    let url = server.url("/plain");

    let failing = write_suite(
        dir.path(),
        "missing_eq.http",
        &format!("GET {url}\n//# header[\"x-trace\"] == abc\n"),
    );
    let (report, _) = run_one(&failing);
    assert_eq!(report.outcome, Outcome::Fail);
    assert_eq!(report.failures[0].reason, FailureReason::HeaderMissing);

    let passing = write_suite(
        dir.path(),
        "missing_not.http",
        &format!("GET {url}\n//# header[\"x-trace\"] not_contains z\n"),
    );
    let (report, _) = run_one(&passing);
    assert_eq!(report.outcome, Outcome::Pass);
}

#[test]
fn regex_assertions_on_status_and_headers() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/json");
        then.status(200)
            .header("content-type", "application/json")
            .body("{\"id\": 42}");
    });

    let dir = tempfile::tempdir().unwrap();
    let path = write_suite(
        dir.path(),
        "regex.http",
        &format!(
            "GET {}\n\
             //# status matches_regex ^2..$\n\
             //# status not_matches_regex ^5..$\n\
             //# header[\"content-type\"] matches_regex json$\n\
             //# body matches_regex \"id\": [0-9]+\n",
            server.url("/json")
        ),
    );

    let (report, _) = run_one(&path);
    assert_eq!(report.outcome, Outcome::Pass, "{:?}", report.failures);
}

#[test]
fn request_headers_and_body_reach_the_server() {
    let server = MockServer::start();
    let created = server.mock(|when, then| {
        when.method(POST)
            .path("/items")
            .header("content-type", "application/json")
            .body("{\"name\": \"widget\"}\n");
        then.status(201).header("location", "/items/1");
    });

    let dir = tempfile::tempdir().unwrap();
    let path = write_suite(
        dir.path(),
        "create.http",
        &format!(
            "POST {}\n\
             Content-Type: application/json\n\
             \n\
             {{\"name\": \"widget\"}}\n\
             //# status == 201\n\
             //# header[\"location\"] starts_with /items/\n",
            server.url("/items")
        ),
    );

    let (report, _) = run_one(&path);
    assert_eq!(report.outcome, Outcome::Pass, "{:?}", report.failures);
    created.assert();
}

#[test]
fn connection_refused_classifies_invalid() {
    let dir = tempfile::tempdir().unwrap();
    // Reserve a port and close the listener so nothing accepts.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let path = write_suite(
        dir.path(),
        "refused.http",
        &format!("GET http://127.0.0.1:{port}/\n//# status == 200\n"),
    );

    let (report, counts) = run_one(&path);
    assert_eq!(report.outcome, Outcome::Invalid);
    assert!(report.error.is_some());
    assert_eq!(counts.invalid, 1);
}

#[test]
fn parallel_aggregation_over_a_mixed_corpus() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/ok");
        then.status(200).body("fine");
    });
    server.mock(|when, then| {
        when.method(GET).path("/broken");
        then.status(500);
    });

    let dir = tempfile::tempdir().unwrap();
    let mut paths = Vec::new();
    for i in 0..6 {
        paths.push(write_suite(
            dir.path(),
            &format!("pass{i}.http"),
            &format!("GET {}\n//# status == 200\n", server.url("/ok")),
        ));
    }
    for i in 0..3 {
        paths.push(write_suite(
            dir.path(),
            &format!("fail{i}.http"),
            &format!("GET {}\n//# status == 200\n", server.url("/broken")),
        ));
    }
    paths.push(write_suite(
        dir.path(),
        "invalid.http",
        &format!("GET {}\n//# status almost 200\n", server.url("/ok")),
    ));

    let transports: Vec<_> = (0..4)
        .map(|_| HttpTransport::new(DEFAULT_TIMEOUT).unwrap())
        .collect();
    let sink = ErrorSink::discard();
    let tally = Tally::new();
    let reports = run_pool(&paths, transports, &sink, &tally);

    let counts = tally.snapshot();
    assert_eq!(counts.total, 10);
    assert_eq!(counts.pass, 6);
    assert_eq!(counts.fail, 3);
    assert_eq!(counts.invalid, 1);
    assert_eq!(reports.len(), 10);
    assert!(!counts.is_success());
}
