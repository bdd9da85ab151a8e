// tests/history_log.rs
use news_sentiment_monitor::history::{CsvLog, Observation};

#[test]
fn appends_never_touch_earlier_rows() {
    let dir = tempfile::tempdir().unwrap();
    let log = CsvLog::new(dir.path().join("headlines.csv"));

    let mut expected = Vec::new();
    let mut snapshots: Vec<Vec<u8>> = Vec::new();

    for cycle in 0..4 {
        let batch: Vec<Observation> = (0..=cycle)
            .map(|i| {
                Observation::now(
                    format!("src{i}"),
                    format!("cycle {cycle}, headline {i}"),
                    (i as f64 - 1.5) / 4.0,
                )
            })
            .collect();
        log.append(&batch).unwrap();
        expected.extend(batch);
        snapshots.push(std::fs::read(log.path()).unwrap());
    }

    // Every earlier file state is a byte prefix of every later one.
    for w in snapshots.windows(2) {
        assert!(w[1].starts_with(&w[0]));
    }

    let all = log.read_all().unwrap();
    assert_eq!(all.len(), 1 + 2 + 3 + 4);
    assert_eq!(all, expected);
}

#[test]
fn second_writer_instance_appends_after_existing_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("headlines.csv");

    CsvLog::new(&path)
        .append(&[Observation::now("A", "first", 0.1)])
        .unwrap();
    CsvLog::new(&path)
        .append(&[Observation::now("B", "second", -0.1)])
        .unwrap();

    let all = CsvLog::new(&path).read_all().unwrap();
    let heads: Vec<_> = all.iter().map(|o| o.headline.as_str()).collect();
    assert_eq!(heads, vec!["first", "second"]);
    let raw = std::fs::read_to_string(&path).unwrap();
    assert_eq!(raw.lines().filter(|l| l.starts_with("Timestamp")).count(), 1);
}
