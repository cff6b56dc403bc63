use std::fs;

use calendar_harvest::{WorldCupConfig, WorldCupError, world_cup};
use tempfile::TempDir;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

const TOURNAMENTS: &str = "\
key_id,tournament_id,tournament_name,year,start_date,end_date,host_country
1,WC-2002,2002 FIFA World Cup,2002,2002-05-31,2002-06-30,Japan & South Korea
2,WC-2010,2010 FIFA World Cup,2010,2010-06-11,2010-07-11,South Africa
";

const MATCHES: &str = "\
key_id,tournament_id,match_id,match_date,home_team_name,away_team_name
1,WC-2002,M-2002-01,2002-05-31,France,Senegal
2,WC-2002,M-2002-02,2002-06-02,England,Sweden
3,WC-2010,M-2010-01,2010-06-11,South Africa,Mexico
";

async fn mount_csv(server: &MockServer, csv_path: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(csv_path))
        .and(header("accept", "text/csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

fn config(server: &MockServer, output: &TempDir) -> WorldCupConfig {
    WorldCupConfig {
        tournaments_url: format!("{}/data-csv/tournaments.csv", server.uri()),
        matches_url: format!("{}/data-csv/matches.csv", server.uri()),
        start_year: 2002,
        end_year: 2002,
        output_dir: output.path().to_path_buf(),
        ..Default::default()
    }
}

#[tokio::test]
async fn co_hosts_each_get_a_daily_calendar() {
    let server = MockServer::start().await;
    mount_csv(&server, "/data-csv/tournaments.csv", TOURNAMENTS).await;
    mount_csv(&server, "/data-csv/matches.csv", MATCHES).await;

    let output = TempDir::new().unwrap();
    let summary = world_cup::collect(&config(&server, &output)).await.unwrap();

    assert_eq!(summary.hosts, 2);
    assert_eq!(summary.rows, 6);

    let contents = fs::read_to_string(&summary.output_path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(
        lines[0],
        "country,date,year,month,is_world_cup_day,is_match_day,matches_that_day"
    );
    assert_eq!(lines[1], "Japan,2002-05-31,2002,May,1,1,1");
    assert_eq!(lines[2], "Japan,2002-06-01,2002,June,1,0,0");
    assert_eq!(lines[3], "Japan,2002-06-02,2002,June,1,1,1");
    assert_eq!(lines[4], "South Korea,2002-05-31,2002,May,1,1,1");
    assert_eq!(lines.len(), 7);
}

#[tokio::test]
async fn unreachable_table_is_reported() {
    let server = MockServer::start().await;
    mount_csv(&server, "/data-csv/tournaments.csv", TOURNAMENTS).await;

    let output = TempDir::new().unwrap();
    let err = world_cup::collect(&config(&server, &output))
        .await
        .unwrap_err();
    assert!(matches!(err, WorldCupError::Fetch(ref fetch) if fetch.is_not_found()));
}
