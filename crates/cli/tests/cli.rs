// ABOUTME: Integration tests for the bbref CLI binary.
// ABOUTME: Covers spider listing, argument errors, a mock crawl and offline page parsing.

use assert_cmd::assert::OutputAssertExt;
use assert_cmd::cargo::CommandCargoExt;
use httpmock::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn bbref_cmd() -> Command {
    let mut cmd = Command::cargo_bin("bbref").unwrap();
    cmd.env_remove("BBREF_LOG");
    cmd
}

#[test]
fn lists_spiders() {
    bbref_cmd()
        .arg("spiders")
        .assert()
        .success()
        .stdout(predicate::str::contains("boxscores"))
        .stdout(predicate::str::contains("playoff_schedule"));
}

#[test]
fn unknown_spider_fails() {
    bbref_cmd()
        .args(["crawl", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown spider: nope"));
}

#[test]
fn invalid_spider_argument_fails_before_fetching() {
    let out = TempDir::new().unwrap();
    bbref_cmd()
        .args(["crawl", "boxscores", "-a", "months=13", "-a", "seasons=2023"])
        .arg("--output-dir")
        .arg(out.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("months"));

    bbref_cmd()
        .args(["crawl", "player", "-a", "=j"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected key=value"));

    assert!(fs::read_dir(out.path()).unwrap().next().is_none());
}

#[test]
fn crawl_writes_playoff_schedule() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/playoffs/NBA_2019_games.html");
        then.status(200)
            .header("content-type", "text/html; charset=utf-8")
            .body(
                r#"<table id="schedule"><tbody><tr>
                    <th data-stat="date_game" csk="201904130GSW">Sat, Apr 13, 2019</th>
                    <td data-stat="home_team_name" csk="GSW.201904130GSW">Golden State Warriors</td>
                </tr></tbody></table>"#,
            );
    });

    let out = TempDir::new().unwrap();
    bbref_cmd()
        .args(["--quiet", "crawl", "playoff_schedule", "-a", "seasons=2019"])
        .arg("--base-url")
        .arg(server.base_url())
        .arg("-o")
        .arg(out.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("1 pages fetched"));

    mock.assert();
    let csv = fs::read_to_string(out.path().join("schedule/playoffs/2019.csv")).unwrap();
    assert!(csv.starts_with("game_id,date,"));
    assert!(csv.contains("Golden State Warriors,GSW"));
}

#[test]
fn parse_saved_box_score() {
    let temp_dir = TempDir::new().unwrap();
    let html_path = temp_dir.path().join("game.html");
    fs::write(
        &html_path,
        r#"<html><body>
        <table id="box-LAL-game-basic"><tbody><tr>
          <th data-stat="player" data-append-csv="jamesle01"><a href="/players/j/jamesle01.html">LeBron James</a></th>
          <td data-stat="pts">35</td>
        </tr></tbody></table>
        </body></html>"#,
    )
    .unwrap();
    let out = temp_dir.path().join("data");

    bbref_cmd()
        .arg("parse")
        .arg("--html")
        .arg(&html_path)
        .arg("--url")
        .arg("https://www.basketball-reference.com/boxscores/202301150LAL.html")
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("01150LAL.csv"));

    let csv = fs::read_to_string(out.join("games/boxscores/basic/2023/01150LAL.csv")).unwrap();
    assert!(csv.contains("LeBron James"));
}

#[test]
fn parse_requires_a_page_type_for_unknown_urls() {
    let temp_dir = TempDir::new().unwrap();
    let html_path = temp_dir.path().join("page.html");
    fs::write(&html_path, "<html></html>").unwrap();

    bbref_cmd()
        .arg("parse")
        .arg("--html")
        .arg(&html_path)
        .arg("--url")
        .arg("https://example.com/")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--page"));
}
