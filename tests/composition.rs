// Composition tests: verifying that the pipeline stages chain together.
//
// These tests exercise the data flow between modules:
//   export file -> loader -> selection -> scorer -> weight file
//   export file -> loader -> time-of-day histogram -> CSV
// The only filesystem side effects are files under the system temp dir.

use std::collections::HashMap;
use std::path::PathBuf;

use chatcloud::activity::time_of_day::{build_histogram, ActivityOptions};
use chatcloud::export::loader::{load_chats, select_chat};
use chatcloud::output::weights::{to_json, write_weights};
use chatcloud::words::counter::MessageFilter;
use chatcloud::words::exclusion::ExclusionSet;
use chatcloud::words::frequency::{RelativeFrequencyScorer, UNSEEN_PROBABILITY};
use chatcloud::words::traits::WordScorer;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("chatcloud-{}-{name}", std::process::id()))
}

fn write_export(name: &str) -> PathBuf {
    let export = r#"{"chats": {"list": [
        {"name": "Work", "messages": [
            {"type": "message", "date_unixtime": "1677674096", "text": "Deploy the release, please!",
             "text_entities": [{"type": "plain", "text": "Deploy the release, please!"}]},
            {"type": "message", "date_unixtime": "1677674400", "text": "Release notes: deploy tonight.",
             "text_entities": [{"type": "plain", "text": "Release notes: deploy tonight."}]},
            {"type": "service", "action": "pin_message"}
        ]},
        {"name": "Family", "messages": [
            {"type": "message", "date_unixtime": "1677700000", "text": "Dinner tonight? Please bring bread.",
             "text_entities": [{"type": "plain", "text": "Dinner tonight? Please bring bread."}]}
        ]},
        {"name": "Friends", "messages": [
            {"type": "message", "text": ["Tonight ", {"type": "bold", "text": "party"}]},
            {"type": "message", "text": "the party is tonight"}
        ]}
    ]}}"#;
    let path = temp_path(name);
    std::fs::write(&path, export).unwrap();
    path
}

#[test]
fn export_to_weight_file() {
    let export = write_export("export-weights.json");
    let chats = load_chats(&export).unwrap();
    let (target, others) = select_chat(&chats, Some("Work")).unwrap();

    let scorer = RelativeFrequencyScorer::new(ExclusionSet::parse_list("the"))
        .with_filter(MessageFilter::MessagesOnly);
    let scores = scorer.score(target, &others);

    // Work: deploy 2, release 2, please 1, notes 1, tonight 1 -> total 7
    // Others: dinner tonight please bring bread party is tonight -> total 8
    assert!(!scores.contains("the"));
    assert_eq!(scores.get("deploy"), Some((2.0 / 7.0) / UNSEEN_PROBABILITY));
    let tonight = scores.get("tonight").unwrap();
    assert!((tonight - (1.0 / 7.0) / (2.0 / 8.0)).abs() < 1e-12);
    assert_eq!(scores.get("bread"), Some(0.0));

    let ranked = scores.ranked(Some(2));
    let top: Vec<&str> = ranked.iter().map(|(w, _)| *w).collect();
    assert_eq!(top, vec!["deploy", "release"]);

    let out = temp_path("weights.json");
    write_weights(&scores, &out).unwrap();
    let written = std::fs::read_to_string(&out).unwrap();
    assert_eq!(written, to_json(&scores).unwrap());
    let parsed: HashMap<String, f64> = serde_json::from_str(&written).unwrap();
    assert_eq!(parsed.len(), scores.len());

    let _ = std::fs::remove_file(out);
    let _ = std::fs::remove_file(export);
}

#[test]
fn export_to_activity_csv() {
    let export = write_export("export-activity.json");
    let chats = load_chats(&export).unwrap();

    let options = ActivityOptions {
        min_total_words: 5,
        ..ActivityOptions::default()
    };
    let histogram = build_histogram(&chats, &options).unwrap();

    // Family has 5 words; Friends has no timestamps so it totals 0 and is dropped
    assert_eq!(histogram.names(), &["Work".to_string(), "Family".to_string()]);
    let totals = histogram.totals();
    assert_eq!(totals, vec![("Work", 8), ("Family", 5)]);

    let csv = histogram.to_csv();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("time,Work,Family"));
    assert_eq!(csv.lines().count(), 1 + 144);
    assert!(csv.contains("\n12:30:00,4,0\n"));

    let _ = std::fs::remove_file(export);
}
