//! End-to-end replay of recorded feeds through the public API.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{NaiveTime, TimeDelta};
use snowline::{
    CompetitorStatus, FeedProvider, LapIndexing, MemorySink, OutcomeKind, RaceConfig, RaceError,
    RaceStateMachine, Replay, ReplaySummary, WriterSink,
};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("test-data").join(name)
}

async fn replay_sample() -> (RaceStateMachine<MemorySink>, ReplaySummary) {
    let config = RaceConfig::load(fixture("config.json")).unwrap();
    let mut feed = FeedProvider::open(fixture("events")).await.unwrap();
    let mut race = RaceStateMachine::new(config, MemorySink::new());

    let summary = Replay::run(&mut feed, &mut race).await.unwrap();
    (race, summary)
}

#[tokio::test]
async fn sample_feed_matches_expected_log() {
    let (race, summary) = replay_sample().await;

    let expected = fs::read_to_string(fixture("expected_output.log")).unwrap();
    let expected: Vec<&str> = expected.lines().collect();
    assert_eq!(race.sink().rendered(), expected);

    assert_eq!(summary, ReplaySummary { processed: 37, rejected: 2, skipped: 3 });
}

#[tokio::test]
async fn sample_feed_final_standings() {
    let (race, _) = replay_sample().await;

    let statuses: Vec<_> = race.competitors().map(|c| (c.id, c.status())).collect();
    assert_eq!(
        statuses,
        vec![
            (1, CompetitorStatus::Disqualified),
            (2, CompetitorStatus::Finished),
            (3, CompetitorStatus::Disqualified),
        ]
    );

    let winner = race.competitor(2).unwrap();
    assert_eq!(winner.laps_completed, 2);
    assert_eq!(winner.penalty_laps, 0);
    assert_eq!(winner.shooting.total_hits(), 10);
    assert_eq!(winner.total_time, Some(TimeDelta::milliseconds(3_239_750)));

    let forest = race.competitor(1).unwrap();
    assert_eq!(forest.shooting.total_hits(), 4);
    assert_eq!(forest.penalty_laps, 0);
    assert_eq!(forest.events_count, 14);

    let outcomes: Vec<_> = race.outcomes().iter().map(|o| (o.kind, o.competitor)).collect();
    assert_eq!(
        outcomes,
        vec![
            (OutcomeKind::Disqualified, 3),
            (OutcomeKind::Disqualified, 1),
            (OutcomeKind::Finished, 2),
        ]
    );
}

#[tokio::test]
async fn yaml_config_with_per_competitor_laps() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("race.yaml");
    fs::write(
        &config_path,
        "\
laps: 2
lapLen: 4000
penaltyLen: 150
firingLines: 2
start: \"12:00:00\"
startDelta: \"00:01:00\"
lapIndexing: perCompetitor
",
    )
    .unwrap();

    let config = RaceConfig::load(&config_path).unwrap();
    assert_eq!(config.lap_indexing, LapIndexing::PerCompetitor);
    assert_eq!(config.official_start, NaiveTime::from_hms_opt(12, 0, 0).unwrap());

    // Competitor 1 runs ahead; competitor 2 still shoots on its own first lap
    let mut feed = FeedProvider::from_text(
        "\
[11:00:00.000] 1 1
[11:00:01.000] 1 2
[12:00:10.000] 4 1
[12:00:20.000] 4 2
[12:10:00.000] 10 1
[12:11:00.000] 5 2 2
[12:11:01.000] 6 2 1
[12:11:02.000] 7 2
",
    );
    let mut race = RaceStateMachine::new(config, MemorySink::new());
    let summary = Replay::run(&mut feed, &mut race).await.unwrap();

    assert_eq!(summary.rejected, 0);
    let trailing = race.competitor(2).unwrap();
    assert_eq!(trailing.shooting.shots(0, 0), Some(&[true][..]));
    assert_eq!(trailing.penalty_laps, 4);
}

#[tokio::test]
async fn race_log_written_to_file() {
    let mut output = tempfile::NamedTempFile::new().unwrap();
    let config = RaceConfig::load(fixture("config.json")).unwrap();
    let mut feed = FeedProvider::open(fixture("events")).await.unwrap();

    let mut race = RaceStateMachine::new(config, WriterSink::new(output.as_file_mut()));
    Replay::run(&mut feed, &mut race).await.unwrap();
    let mut sink = race.into_sink();
    sink.flush().unwrap();
    assert_eq!(sink.failed_writes(), 0);
    drop(sink);
    output.flush().unwrap();

    let written = fs::read_to_string(output.path()).unwrap();
    let expected = fs::read_to_string(fixture("expected_output.log")).unwrap();
    assert_eq!(written, expected);
}

#[tokio::test]
async fn missing_inputs_are_fatal() {
    let dir = tempfile::tempdir().unwrap();

    let err = RaceConfig::load(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, RaceError::File { .. }));

    assert!(FeedProvider::open(dir.path().join("absent-events")).await.is_err());
}
