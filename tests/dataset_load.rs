// tests/dataset_load.rs
use chrono::Weekday;
use chronomood::{
    config::ENV_CONFIG_PATH, AppConfig, Dataset, MoodLabel, RecordFilter, SentimentAnalyzer,
};
use std::{env, fs};

const ROWS: &str = r#"[
  {"datetime": "2020-04-06 09:01:00", "text": "Loving the sunshine this morning :)", "sentiment": "positive"},
  {"datetime": "2020-04-06 09:40:00", "text": "Coffee is great, lockdown is not", "sentiment": "positive", "score": 0.42},
  {"datetime": "2020-04-07 09:15:00", "text": "Worst. Lockdown. Ever.", "sentiment": "negative", "score": -0.62},
  {"datetime": "2020-04-07T22:30:00", "text": "bus at 10", "sentiment": "neutral", "score": 0.0},
  {"datetime": "2020-04-12 22:45:00+02:00", "text": "lockdown sunday vibes, love it", "sentiment": "positive", "score": 0.64}
]"#;

#[test]
fn load_from_file_and_query() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tweets.json");
    fs::write(&path, ROWS).unwrap();

    let ds = Dataset::load(&path).unwrap();
    assert_eq!(ds.len(), 5);
    assert_eq!(ds.days(), vec![Weekday::Mon, Weekday::Tue, Weekday::Sun]);

    // First row had no score and was scored from its text
    assert!(ds.records()[0].score > 0.0);

    let all = ds.aggregate(None).unwrap();
    assert_eq!(all.hour(9).unwrap().records, 3);
    assert_eq!(all.hour(22).unwrap().records, 2);
    assert_eq!(all.total_records(), 5);

    let tue = ds.aggregate(Some(&RecordFilter::any().day(Weekday::Tue))).unwrap();
    assert_eq!(tue.total_records(), 2);
    assert_eq!(tue.hour(9).unwrap().counts.get(MoodLabel::Negative), 1);

    let terms = ds
        .top_terms(&RecordFilter::any(), MoodLabel::Positive, 3, &[])
        .unwrap();
    assert_eq!(terms[0].term, "lockdown");
    assert_eq!(terms[0].count, 2);

    // Handles are cheap to share
    let clone = ds.clone();
    std::thread::spawn(move || assert_eq!(clone.len(), 5))
        .join()
        .unwrap();
}

#[test]
fn json_lines_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tweets.jsonl");
    fs::write(
        &path,
        "{\"datetime\":\"2020-04-06 09:00:00\",\"text\":\"good\",\"sentiment\":\"pos\",\"score\":0.4}\n\
         {\"datetime\":\"2020-04-06 10:00:00\",\"text\":\"bad\",\"sentiment\":\"NEG\",\"score\":-0.5}\n",
    )
    .unwrap();
    let ds = Dataset::load(&path).unwrap();
    assert_eq!(ds.len(), 2);
    assert_eq!(ds.records()[1].label, MoodLabel::Negative);
}

#[test]
fn load_errors_carry_context() {
    let dir = tempfile::tempdir().unwrap();
    assert!(Dataset::load(&dir.path().join("missing.json")).is_err());

    let path = dir.path().join("bad.json");
    fs::write(
        &path,
        r#"[{"datetime": "tomorrow", "text": "x", "sentiment": "neutral"}]"#,
    )
    .unwrap();
    let err = Dataset::load(&path).unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("bad.json"), "{msg}");
    assert!(msg.contains("row 0"), "{msg}");
}

#[serial_test::serial]
#[test]
fn config_env_path_drives_terms_settings() {
    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("chronomood.toml");
    fs::write(
        &cfg_path,
        r#"
[terms]
limit = 2
extra_stopwords = ["Lockdown"]
"#,
    )
    .unwrap();

    env::set_var(ENV_CONFIG_PATH, cfg_path.display().to_string());
    let cfg = AppConfig::load_default().unwrap();
    env::remove_var(ENV_CONFIG_PATH);

    assert_eq!(cfg.terms.limit, 2);
    let ds = Dataset::from_json_str(ROWS).unwrap();
    let terms = ds
        .top_terms(
            &RecordFilter::any(),
            MoodLabel::Positive,
            cfg.terms.limit,
            &cfg.terms.extra_stopwords,
        )
        .unwrap();
    assert_eq!(terms.len(), 2);
    assert!(terms.iter().all(|t| t.term != "lockdown"));
}

#[test]
fn extra_lexicon_scores_unscored_rows() {
    let dir = tempfile::tempdir().unwrap();
    let lex_path = dir.path().join("extra.json");
    fs::write(&lex_path, r#"{"stonks": 3.5}"#).unwrap();
    let cfg_path = dir.path().join("chronomood.toml");
    fs::write(
        &cfg_path,
        format!("[lexicon]\nextra_path = {:?}\n", lex_path.display().to_string()),
    )
    .unwrap();
    let data_path = dir.path().join("tweets.jsonl");
    fs::write(
        &data_path,
        "{\"datetime\":\"2020-04-06 09:00:00\",\"text\":\"stonks only go up\",\"sentiment\":\"positive\"}\n",
    )
    .unwrap();

    let cfg = AppConfig::load_from(&cfg_path).unwrap();
    let analyzer = SentimentAnalyzer::with_lexicon(cfg.build_lexicon().unwrap());

    let plain = Dataset::load(&data_path).unwrap();
    let configured = Dataset::load_with(&data_path, &analyzer).unwrap();
    assert_eq!(plain.records()[0].score, 0.0);
    assert!(configured.records()[0].score > 0.5);
    assert_eq!(
        configured.records()[0].score,
        analyzer.score("stonks only go up").compound
    );
}
