//! End-to-end `dump` output over a canned snapshot source.

use async_trait::async_trait;
use feedview_console::dump::{dump_text, dump_view, render_json, DumpOptions};
use feedview_console::{DisplayConfig, Tab, TabBody};
use feedview_network::SnapshotSource;
use feedview_protocol::{DataSnapshot, FetchError};

const BODY: &str = r#"{
    "vocab_feedback_log": [
        {"id": "1", "sentence": "저는 학생이에요", "guess": "student", "answer": "student",
         "feedback": "Well done", "created_at": "2024-01-02T00:00:00Z", "anon_id": "a"},
        {"id": "2", "sentence": "물 주세요", "guess": "fire", "answer": "water",
         "feedback": "That's incorrect", "created_at": "2024-01-01T00:00:00Z", "anon_id": "b"},
        {"id": "3", "sentence": "저는 학생이에요", "guess": "studnet", "answer": "student",
         "feedback": "Almost", "created_at": "2024-01-03T00:00:00Z", "anon_id": "b"}
    ],
    "beta_waitlist": [
        {"id": "w1", "email": "first@example.com", "created_at": "2024-02-01T08:00:00Z"}
    ]
}"#;

struct Canned(Result<DataSnapshot, FetchError>);

#[async_trait]
impl SnapshotSource for Canned {
    async fn fetch_snapshot(&self) -> Result<DataSnapshot, FetchError> {
        self.0.clone()
    }
}

fn canned() -> Canned {
    Canned(DataSnapshot::from_json(BODY.as_bytes()))
}

fn utc() -> DisplayConfig {
    DisplayConfig {
        utc: true,
        ..DisplayConfig::default()
    }
}

#[tokio::test]
async fn test_dump_all_ascending() {
    let text = dump_text(&canned(), &utc(), DumpOptions::default()).await.unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "== All (sort: oldest first ▲) ==");
    assert!(lines[2].starts_with("2024.01.01 00:00\tUser 2\t물 주세요"));
    assert!(lines[4].starts_with("2024.01.03 00:00\tUser 2"));
    assert_eq!(*lines.last().unwrap(), "3 feedback entries in total.");
}

#[tokio::test]
async fn test_dump_all_descending() {
    let opts = DumpOptions {
        descending: true,
        ..DumpOptions::default()
    };
    let text = dump_text(&canned(), &utc(), opts).await.unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert!(lines[2].starts_with("2024.01.03 00:00"));
}

#[tokio::test]
async fn test_dump_by_user_largest_first() {
    let opts = DumpOptions {
        tab: Tab::ByUser,
        ..DumpOptions::default()
    };
    let text = dump_text(&canned(), &utc(), opts).await.unwrap();
    let headers: Vec<&str> = text.lines().filter(|l| l.starts_with("## ")).collect();
    assert_eq!(headers, vec!["## User 2 (2 responses)", "## User 1 (1 responses)"]);
}

#[tokio::test]
async fn test_dump_by_sentence_collapsed_unless_expanded() {
    let collapsed = DumpOptions {
        tab: Tab::BySentence,
        ..DumpOptions::default()
    };
    let vm = dump_view(&canned(), &utc(), collapsed).await.unwrap();
    let TabBody::BySentence(groups) = &vm.body else { panic!("expected sentence view") };
    assert_eq!(groups[0].sentence, "저는 학생이에요");
    assert!(groups.iter().all(|g| g.rows.is_empty()));

    let expanded = DumpOptions {
        expand_all: true,
        ..collapsed
    };
    let text = dump_text(&canned(), &utc(), expanded).await.unwrap();
    assert!(text.contains("## ▼ 저는 학생이에요 (2 responses)"));
    assert!(text.contains("2024.01.03 00:00\tUser 2\tstudnet"));
}

#[tokio::test]
async fn test_dump_waitlist() {
    let opts = DumpOptions {
        tab: Tab::Waitlist,
        ..DumpOptions::default()
    };
    let text = dump_text(&canned(), &utc(), opts).await.unwrap();
    assert!(text.starts_with("== Waitlist (1) =="));
    assert!(text.contains("1\tfirst@example.com\t2024.02.01 08:00"));
    assert!(text.ends_with("1 people on the beta waitlist.\n"));
}

#[tokio::test]
async fn test_dump_json_shape() {
    let opts = DumpOptions {
        tab: Tab::Waitlist,
        ..DumpOptions::default()
    };
    let vm = dump_view(&canned(), &utc(), opts).await.unwrap();
    let json: serde_json::Value = serde_json::from_str(&render_json(&vm).unwrap()).unwrap();
    assert_eq!(json["waitlist_count"], 1);
    assert_eq!(json["body"]["view"], "waitlist");
    assert_eq!(json["body"]["items"][0]["email"], "first@example.com");
}

#[tokio::test]
async fn test_dump_surfaces_fetch_error() {
    let source = Canned(Err(FetchError::Http(500)));
    let err = dump_text(&source, &utc(), DumpOptions::default()).await.unwrap_err();
    assert_eq!(err, FetchError::Http(500));
}

#[tokio::test]
async fn test_dump_empty_snapshot() {
    let source = Canned(DataSnapshot::from_json(
        br#"{"vocab_feedback_log": [], "beta_waitlist": []}"#,
    ));
    for tab in Tab::ALL {
        let opts = DumpOptions {
            tab,
            ..DumpOptions::default()
        };
        let vm = dump_view(&source, &utc(), opts).await.unwrap();
        assert!(vm.body.is_empty());
        assert_eq!(vm.feedback_count, 0);
        assert_eq!(vm.waitlist_count, 0);
    }
}
