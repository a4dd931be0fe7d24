//! Tests for `#[derive(Record)]`.

use std::collections::{BTreeMap, HashMap};

use lazyseq::serde_json::{json, Value};
use lazyseq::{from, Dir, Entries, Record};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
enum Status {
    Open,
    Closed,
}

#[derive(Debug, Clone, Record)]
struct Task {
    title: String,
    #[record(rename = "prio")]
    priority: u8,
    status: Status,
    tags: Vec<String>,
    due: Option<u32>,
    #[record(skip)]
    #[allow(dead_code)]
    internal_id: u64,
}

fn task(title: &str, priority: u8, status: Status, due: Option<u32>) -> Task {
    Task {
        title: title.to_string(),
        priority,
        status,
        tags: vec!["work".to_string()],
        due,
        internal_id: 42,
    }
}

fn tasks() -> Vec<Task> {
    vec![
        task("Write docs", 3, Status::Open, Some(5)),
        task("Fix bug", 5, Status::Closed, None),
        task("Review", 3, Status::Closed, Some(2)),
    ]
}

#[test]
fn generates_field_constants() {
    assert_eq!(Task::TITLE, "title");
    assert_eq!(Task::PRIO, "prio");
    assert_eq!(Task::STATUS, "status");
    assert_eq!(Task::TAGS, "tags");
    assert_eq!(Task::DUE, "due");
}

#[test]
fn reads_fields_by_exposed_name() {
    let t = task("Write docs", 3, Status::Open, None);

    assert_eq!(t.field(Task::TITLE), Some(json!("Write docs")));
    assert_eq!(t.field(Task::PRIO), Some(json!(3)));
    assert_eq!(t.field("priority"), None);
    assert_eq!(t.field(Task::STATUS), Some(json!("Open")));
    assert_eq!(t.field(Task::TAGS), Some(json!(["work"])));
    assert_eq!(t.field(Task::DUE), Some(Value::Null));
    assert!(t.has_field(Task::DUE));
}

#[test]
fn skipped_fields_are_hidden() {
    let t = task("Write docs", 3, Status::Open, None);

    assert_eq!(t.field("internal_id"), None);
    assert!(!t.has_field("internal_id"));
    assert!(t.entries().iter().all(|(name, _)| name != "internal_id"));
}

#[test]
fn entries_follow_declaration_order() {
    let t = task("Fix bug", 5, Status::Closed, Some(1));
    let names: Vec<String> = t.entries().into_iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["title", "prio", "status", "tags", "due"]);

    let pairs = from(Entries(t)).to_vec();
    assert_eq!(pairs.len(), 5);
    assert_eq!(pairs[1], ("prio".to_string(), json!(5)));
}

#[test]
fn works_with_field_operations() {
    let seq = from(tasks());

    let by_status = seq
        .group_by_field(Task::STATUS)
        .map(|g| (g.key().clone(), g.items().len()))
        .to_vec();
    assert_eq!(by_status, vec![(json!("Open"), 1), (json!("Closed"), 2)]);

    let titles = seq
        .sort_by_field(Task::PRIO, Dir::Desc)
        .then_by_field(Task::DUE, Dir::Asc)
        .map(|t| t.title)
        .to_vec();
    assert_eq!(titles, vec!["Fix bug", "Review", "Write docs"]);

    let picked = seq.take(1).pick(&[Task::TITLE, Task::DUE]).to_vec();
    assert_eq!(picked, vec![json!({"title": "Write docs", "due": 5})]);
}

#[derive(Record)]
struct Labeled<T: Serialize> {
    label: &'static str,
    value: T,
}

#[test]
fn generic_structs() {
    let item = Labeled {
        label: "n",
        value: BTreeMap::from([("x", 1)]),
    };
    assert_eq!(item.field(Labeled::<()>::VALUE), Some(json!({"x": 1})));
    assert_eq!(item.field("label"), Some(json!("n")));
}

#[derive(Record)]
struct Empty {}

#[test]
fn empty_struct_has_no_entries() {
    assert!(Empty {}.entries().is_empty());
    assert_eq!(Empty {}.field("anything"), None);
}

#[derive(Clone, Record)]
struct Board {
    name: &'static str,
    grid: HashMap<(i32, i32), i32>,
}

#[test]
fn unserializable_fields_read_as_null() {
    let board = Board {
        name: "b1",
        grid: HashMap::from([((0, 0), 1)]),
    };

    assert_eq!(board.field(Board::GRID), Some(Value::Null));
    assert_eq!(board.field(Board::NAME), Some(json!("b1")));

    let groups = from(vec![board])
        .group_by_field(Board::GRID)
        .map(|g| g.key().clone())
        .to_vec();
    assert_eq!(groups, vec![Value::Null]);
}
