// ABOUTME: Integration tests for the page parsers against inline page fixtures.
// ABOUTME: Covers schedule, box score, player profile and shot chart extraction end to end.

use bbref_extract::{
    parse_box_score, parse_player_profile, parse_schedule, parse_shot_chart, Page, Payload,
    ProfileOptions, RecordKind, TableKind, Value,
};
use pretty_assertions::assert_eq;

const BASE: &str = "https://www.basketball-reference.com";

fn page(path: &str, body: &str) -> Page {
    Page::new(format!("{}{}", BASE, path), body)
}

const SCHEDULE_PAGE: &str = r#"<html><body>
<table id="schedule"><thead><tr><th>Date</th></tr></thead><tbody>
  <tr>
    <th data-stat="date_game" csk="202301150LAL"><a href="/x">Sun, Jan 15, 2023</a></th>
    <td data-stat="visitor_team_name" csk="PHI.202301150LAL"><a href="/teams/PHI/2023.html">Philadelphia 76ers</a></td>
    <td data-stat="visitor_pts">113</td>
    <td data-stat="home_team_name" csk="LAL.202301150LAL"><a href="/teams/LAL/2023.html">Los Angeles Lakers</a></td>
    <td data-stat="home_pts">112</td>
    <td data-stat="box_score_text"><a href="/boxscores/202301150LAL.html">Box Score</a></td>
    <td data-stat="overtimes">OT</td>
  </tr>
  <tr class="thead"><th>Date</th></tr>
  <tr>
    <th data-stat="date_game" csk="202301160BOS"><a href="/x">Mon, Jan 16, 2023</a></th>
    <td data-stat="visitor_team_name" csk="CHO.202301160BOS"><a href="/teams/CHO/2023.html">Charlotte Hornets</a></td>
    <td data-stat="home_team_name" csk="BOS.202301160BOS"><a href="/teams/BOS/2023.html">Boston Celtics</a></td>
    <td data-stat="box_score_text"><a href="/boxscores/202301160BOS.html">Box Score</a></td>
  </tr>
</tbody></table>
<a href="/boxscores/shot-chart/202301150LAL.html">Shot chart</a>
</body></html>"#;

#[test]
fn schedule_rows_and_links() {
    let out = parse_schedule(&page("/leagues/NBA_2023_games-january.html", SCHEDULE_PAGE)).unwrap();

    assert_eq!(
        out.links,
        vec![
            "/boxscores/202301150LAL.html".to_string(),
            "/boxscores/202301160BOS.html".to_string()
        ]
    );

    let record = &out.records[0];
    assert_eq!(record.kind, RecordKind::Schedule);
    let rows = record.entries().unwrap();
    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0].get("game_id"), Some(&Value::from("202301150LAL")));
    assert_eq!(rows[0].get("date"), Some(&Value::from("2023-01-15")));
    assert_eq!(rows[0].get("overtimes"), Some(&Value::from("OT")));
    assert_eq!(rows[1].get("visitor_pts"), Some(&Value::Missing));

    for row in rows {
        for field in ["visitor_team_id", "home_team_id"] {
            let code = row.get(field).and_then(Value::as_str).unwrap();
            assert_eq!(code.len(), 3);
        }
        let game_id = row.get("game_id").and_then(Value::as_str).unwrap();
        let home = row.get("home_team_id").and_then(Value::as_str).unwrap();
        assert!(game_id.ends_with(home));
    }
}

const BOX_SCORE_PAGE: &str = r#"<html><body>
<table id="box-PHI-game-basic"><tbody>
  <tr>
    <th data-stat="player" csk="Embiid,Joel" data-append-csv="embiijo01"><a href="/players/e/embiijo01.html">Joel Embiid</a></th>
    <td data-stat="mp" csk="2160">36:00</td>
    <td data-stat="pts">35</td>
    <td data-stat="game_score">30.1</td>
  </tr>
  <tr>
    <th data-stat="player" csk="Harden,James" data-append-csv="hardeja01"><a href="/players/h/hardeja01.html">James Harden</a></th>
    <td data-stat="mp" csk="2100">35:00</td>
    <td data-stat="pts">20</td>
  </tr>
  <tr class="thead"><th>Reserves</th></tr>
  <tr>
    <th data-stat="player" csk="House,Danuel" data-append-csv="houseda01"><a href="/players/h/houseda01.html">Danuel House</a></th>
    <td data-stat="reason">Did Not Play</td>
  </tr>
</tbody><tfoot><tr><th data-stat="player">Team Totals</th></tr></tfoot></table>
<table id="box-LAL-game-basic"><tbody>
  <tr>
    <th data-stat="player" data-append-csv="jamesle01"><a href="/players/j/jamesle01.html">LeBron James</a></th>
    <td data-stat="mp" csk="2340">39:00</td>
    <td data-stat="pts">35</td>
    <td>unlabelled</td>
  </tr>
</tbody></table>
<table id="box-LAL-game-advanced"><tbody>
  <tr>
    <th data-stat="player" data-append-csv="jamesle01"><a href="/players/j/jamesle01.html">LeBron James</a></th>
    <td data-stat="mp" csk="2340">39:00</td>
    <td data-stat="ts_pct">.612</td>
  </tr>
</tbody></table>
<table id="box-LAL-q1-basic"><tbody>
  <tr>
    <th data-stat="player" data-append-csv="jamesle01"><a href="/players/j/jamesle01.html">LeBron James</a></th>
    <td data-stat="pts">9</td>
  </tr>
</tbody></table>
</body></html>"#;

#[test]
fn box_score_batches_per_variant() {
    let out = parse_box_score(&page("/boxscores/202301150LAL.html", BOX_SCORE_PAGE)).unwrap();
    assert_eq!(out.records.len(), 2);

    let advanced = &out.records[0];
    assert_eq!(advanced.dir, "games/boxscores/advanced/2023");
    assert_eq!(advanced.file_name, "01150LAL");
    assert_eq!(advanced.schema.unwrap().kind, TableKind::AdvancedBoxScore);
    let adv_rows = advanced.entries().unwrap();
    assert_eq!(adv_rows.len(), 1);
    assert_eq!(adv_rows[0].get("ts_pct"), Some(&Value::from(".612")));
    assert_eq!(adv_rows[0].get("box_type"), Some(&Value::from("game-advanced")));

    let basic = &out.records[1];
    assert_eq!(basic.dir, "games/boxscores/basic/2023");
    assert_eq!(basic.file_name, "01150LAL");
    let rows = basic.entries().unwrap();
    assert_eq!(rows.len(), 5);

    let embiid = &rows[0];
    assert_eq!(embiid.get("team_id"), Some(&Value::from("PHI")));
    assert_eq!(embiid.get("ishome"), Some(&Value::Bool(false)));
    assert_eq!(embiid.get("date"), Some(&Value::from("2023-01-15")));
    assert_eq!(embiid.get("player"), Some(&Value::from("Joel Embiid")));
    assert_eq!(embiid.get("player_href"), Some(&Value::from("/players/e/embiijo01.html")));
    assert_eq!(embiid.get("player_csk"), Some(&Value::from("Embiid,Joel")));
    assert_eq!(embiid.get("player_id"), Some(&Value::from("embiijo01")));
    assert_eq!(embiid.get("mp"), Some(&Value::from("36:00")));
    assert_eq!(embiid.get("sp"), Some(&Value::from("2160")));
    assert_eq!(embiid.get("pts"), Some(&Value::from("35")));

    let house = &rows[2];
    assert_eq!(house.get("reason"), Some(&Value::from("Did Not Play")));
    assert_eq!(house.get("mp"), Some(&Value::Int(0)));
    assert_eq!(house.get("sp"), Some(&Value::Int(0)));
    assert_eq!(house.get("pts"), Some(&Value::Missing));

    let lebron = &rows[3];
    assert_eq!(lebron.get("team_id"), Some(&Value::from("LAL")));
    assert_eq!(lebron.get("ishome"), Some(&Value::Bool(true)));

    let quarter = &rows[4];
    assert_eq!(quarter.get("box_type"), Some(&Value::from("q1-basic")));
}

#[test]
fn box_score_pnum_restarts_per_table() {
    let out = parse_box_score(&page("/boxscores/202301150LAL.html", BOX_SCORE_PAGE)).unwrap();
    let rows = out.records[1].entries().unwrap();
    let numbered: Vec<(String, i64)> = rows
        .iter()
        .map(|r| {
            let box_id = format!(
                "{}-{}",
                r.get("team_id").and_then(Value::as_str).unwrap(),
                r.get("box_type").and_then(Value::as_str).unwrap()
            );
            match r.get("pnum") {
                Some(Value::Int(n)) => (box_id, *n),
                other => panic!("pnum not an integer: {:?}", other),
            }
        })
        .collect();
    assert_eq!(
        numbered,
        vec![
            ("PHI-game-basic".to_string(), 1),
            ("PHI-game-basic".to_string(), 2),
            ("PHI-game-basic".to_string(), 3),
            ("LAL-game-basic".to_string(), 1),
            ("LAL-q1-basic".to_string(), 1),
        ]
    );
}

#[test]
fn box_score_rows_conform_to_schema() {
    let out = parse_box_score(&page("/boxscores/202301150LAL.html", BOX_SCORE_PAGE)).unwrap();
    for record in &out.records {
        let schema = record.schema.unwrap();
        for row in record.entries().unwrap() {
            let names: Vec<&str> = row.fields().map(|(name, _)| name).collect();
            assert_eq!(names, schema.fields.to_vec());
        }
    }
}

#[test]
fn box_score_without_tables_emits_nothing() {
    let out = parse_box_score(&page("/boxscores/202301150LAL.html", "<html></html>")).unwrap();
    assert!(out.records.is_empty());
}

const PROFILE_PAGE: &str = r#"<html><body>
<div id="all_per_game"><div class="placeholder"></div>
<!--
<table class="stats_table sortable" id="per_game"><tbody>
  <tr id="per_game.2004">
    <th data-stat="season"><a href="/players/j/jamesle01/gamelog/2004">2003-04</a></th>
    <td data-stat="age">19</td>
    <td data-stat="team_id"><a href="/teams/CLE/2004.html">CLE</a></td>
    <td data-stat="pts_per_g">20.9</td>
    <td>no label</td>
  </tr>
  <tr class="thead"><th>Season</th></tr>
  <tr id="per_game.2005">
    <th data-stat="season"><a href="/players/j/jamesle01/gamelog/2005">2004-05</a></th>
    <td data-stat="age">20</td>
    <td data-stat="g">80</td>
  </tr>
</tbody></table>
-->
</div>
<table class="stats_table" id="playoffs_per_game"><tbody>
  <tr>
    <th data-stat="season">2005-06</th>
    <td data-stat="player" data-append-csv="jamesle01">Léon</td>
  </tr>
</tbody></table>
<table class="suppress_all" id="other"><tbody><tr><td data-stat="x">1</td></tr></tbody></table>
</body></html>"#;

#[test]
fn profile_unwraps_hidden_tables() {
    let out = parse_player_profile(
        &page("/players/j/jamesle01.html", PROFILE_PAGE),
        ProfileOptions::default(),
    )
    .unwrap();
    assert_eq!(out.records.len(), 1);

    let record = &out.records[0];
    assert_eq!(record.kind, RecordKind::Player);
    assert_eq!(record.dir, "players/data/j");
    assert_eq!(record.file_name, "jamesle01");
    assert!(record.schema.is_none());

    let Payload::Tables(tables) = &record.payload else {
        panic!("expected grouped tables");
    };
    let ids: Vec<&str> = tables.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["per_game", "playoffs_per_game"]);

    let per_game = tables.iter().next().unwrap();
    assert_eq!(per_game.entries.len(), 2);
    let first = &per_game.entries[0];
    let keys: Vec<&str> = first.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec!["player_id", "table_id", "season", "season_href", "age", "team_id", "team_id_href", "pts_per_g"]
    );
    assert_eq!(first["season"], "2003-04");
    assert_eq!(first["team_id_href"], "/teams/CLE/2004.html");
    assert_eq!(first["table_id"], "per_game");

    let playoff = &tables.iter().nth(1).unwrap().entries[0];
    assert_eq!(playoff["player_data_append_csv"], "jamesle01");
    assert_eq!(playoff["player"], "Léon");
}

#[test]
fn profile_json_keeps_non_ascii() {
    let out = parse_player_profile(
        &page("/players/j/jamesle01.html", PROFILE_PAGE),
        ProfileOptions::default(),
    )
    .unwrap();
    let Payload::Tables(tables) = &out.records[0].payload else {
        panic!("expected grouped tables");
    };
    let json = serde_json::to_string(tables).unwrap();
    assert!(json.contains("Léon"));
    assert!(json.starts_with(r#"{"per_game":[{"player_id":"jamesle01""#));
}

#[test]
fn profile_season_stats_rows() {
    let out = parse_player_profile(
        &page("/players/j/jamesle01.html", PROFILE_PAGE),
        ProfileOptions { season_stats: true },
    )
    .unwrap();
    assert_eq!(out.records.len(), 2);

    let stats = &out.records[1];
    assert_eq!(stats.kind, RecordKind::PlayerStats);
    assert_eq!(stats.dir, "players/stats/j");
    let rows = stats.entries().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].get("stat_type"), Some(&Value::from("per_game")));
    assert_eq!(rows[0].get("isplayoff"), Some(&Value::Bool(false)));
    assert_eq!(rows[0].get("season_href"), Some(&Value::from("/players/j/jamesle01/gamelog/2004")));
    assert_eq!(rows[1].get("g"), Some(&Value::from("80")));
    assert_eq!(rows[2].get("isplayoff"), Some(&Value::Bool(true)));
    assert_eq!(rows[2].get("player_id"), Some(&Value::from("jamesle01")));
}

const SHOT_PAGE: &str = r#"<html><body>
<div id="shots-PHI" class="shot-area">
  <img src="court.png">
  <div style="top:52px;left:30px;" tip="1st Qtr, 11:26.0 remaining<br>Joel Embiid made 3-pointer from 25 ft" class="tooltip p-embiijo01 make">&#x25CF;</div>
  <div style="top:80px;left:240px;" tip="1st Qtr, 10:01.0 remaining<br>Joel Embiid missed 2-pointer from 3 ft" class="tooltip p-embiijo01 miss">&#xD7;</div>
</div>
<div id="shots-LAL" class="shot-area">
  <div style="top:300px;left:250px;" tip="4th Qtr, 0:01.2 remaining<br>LeBron James missed 3-pointer from 30 ft" class="tooltip p-jamesle01 miss">&#xD7;</div>
</div>
</body></html>"#;

#[test]
fn shot_chart_single_batch_for_both_teams() {
    let out = parse_shot_chart(&page("/boxscores/shot-chart/202301150LAL.html", SHOT_PAGE)).unwrap();
    assert_eq!(out.records.len(), 1);

    let record = &out.records[0];
    assert_eq!(record.dir, "games/shots/2023");
    assert_eq!(record.file_name, "01150LAL");
    let rows = record.entries().unwrap();
    assert_eq!(rows.len(), 3);

    let teams: Vec<&str> = rows.iter().map(|r| r.get("team_id").and_then(Value::as_str).unwrap()).collect();
    assert_eq!(teams, vec!["PHI", "PHI", "LAL"]);

    for row in rows {
        assert!(matches!(row.get("points"), Some(Value::Int(2)) | Some(Value::Int(3))));
        assert!(matches!(row.get("make"), Some(Value::Bool(_))));
        match row.get("distance_cm") {
            Some(Value::Int(d)) => assert!(*d >= 0),
            other => panic!("distance not computed: {:?}", other),
        }
    }
    assert_eq!(rows[0].get("make"), Some(&Value::Bool(true)));
    assert_eq!(rows[2].get("quarter"), Some(&Value::from("4th Qtr")));
    assert_eq!(rows[2].get("player_id"), Some(&Value::from("jamesle01")));
}
