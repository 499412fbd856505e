use super::*;

fn puzzle(id: &str, letter: &str, items: &[&str]) -> Puzzle {
    Puzzle {
        id: id.to_owned(),
        prompt: "Name 4 things".to_owned(),
        rule: format!("Starting with {letter}"),
        letter: letter.to_owned(),
        items: items.iter().map(|s| (*s).to_owned()).collect(),
    }
}

fn scratch(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("quizreel-unit").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn letter_check_is_case_insensitive() {
    let p = puzzle("p", "b", &["Banana", "blueberry", "BLACKBERRY", "Bread"]);
    assert!(p.validate().is_ok());
}

#[test]
fn wrong_letter_or_count_is_rejected() {
    let bad_letter = puzzle("p", "b", &["Banana", "Apple", "Bread", "Bean"]);
    assert!(matches!(bad_letter.validate(), Err(QuizError::Validation(_))));
    let three = puzzle("p", "b", &["Banana", "Bread", "Bean"]);
    assert!(matches!(three.validate(), Err(QuizError::Validation(_))));
}

#[test]
fn one_invalid_puzzle_fails_the_catalogue() {
    let good = puzzle("a", "c", &["Cat", "Cow", "Crab", "Camel"]);
    let bad = puzzle("b", "c", &["Cat", "Dog", "Crab", "Camel"]);
    assert!(JsonPuzzleFile::from_puzzles(vec![good, bad]).is_err());
    assert!(JsonPuzzleFile::from_puzzles(Vec::new()).is_err());
}

#[test]
fn selects_first_unused_then_wraps_to_first() {
    let mut src = JsonPuzzleFile::from_puzzles(vec![
        puzzle("a", "c", &["Cat", "Cow", "Crab", "Camel"]),
        puzzle("b", "d", &["Dog", "Duck", "Deer", "Dove"]),
    ])
    .unwrap();
    let mut used = HashSet::new();
    assert_eq!(src.next_puzzle(&used).unwrap().id, "a");
    used.insert("a".to_owned());
    assert_eq!(src.next_puzzle(&used).unwrap().id, "b");
    used.insert("b".to_owned());
    assert_eq!(src.next_puzzle(&used).unwrap().id, "a");
}

#[test]
fn loads_json_catalogue() {
    let dir = scratch("puzzles-json");
    let path = dir.join("puzzles.json");
    std::fs::write(
        &path,
        r#"[{"id":"x","prompt":"P","rule":"R","letter":"s","items":["Sun","Star","Sky","Sea"]}]"#,
    )
    .unwrap();
    let src = JsonPuzzleFile::load(&path).unwrap();
    assert_eq!(src.puzzles()[0].items[3], "Sea");
    assert!(matches!(
        JsonPuzzleFile::load(&dir.join("missing.json")),
        Err(QuizError::Config(_))
    ));
}

#[test]
fn ledger_appends_and_reads_back() {
    let dir = scratch("ledger");
    let ledger = UsedPuzzleLedger::new(dir.join("nested").join("used.txt"));
    assert!(ledger.load().unwrap().is_empty());
    ledger.mark_used("a").unwrap();
    ledger.mark_used("b").unwrap();
    let used = ledger.load().unwrap();
    assert_eq!(used.len(), 2);
    assert!(used.contains("a") && used.contains("b"));
}
