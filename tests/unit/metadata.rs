use super::*;

fn job() -> RenderJob {
    RenderJob::builder("fruit-07")
        .hook("Name 4 fruits")
        .instruction("Starting with B")
        .items(["Banana", "Blueberry", "Blackberry", "Breadfruit"])
        .images(["1.png", "2.png", "3.png", "4.png"])
        .tags(["quiz", "shorts"])
        .build()
        .unwrap()
}

#[test]
fn sidecar_has_the_upload_contract_keys() {
    let meta = RenderMetadata::from_job(&job(), 15, 30);
    let value = serde_json::to_value(&meta).unwrap();
    let obj = value.as_object().unwrap();
    let mut keys: Vec<_> = obj.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        vec![
            "description",
            "fps",
            "hook",
            "instruction",
            "items",
            "puzzle_id",
            "tags",
            "timer_seconds",
            "title",
        ]
    );
    assert_eq!(obj["timer_seconds"], 15);
    assert_eq!(obj["items"][3], "Breadfruit");
}

#[test]
fn default_description_reaches_the_sidecar() {
    let meta = RenderMetadata::from_job(&job(), 15, 30);
    assert!(meta.description.contains("(Puzzle: fruit-07)"));
}

#[test]
fn write_then_load_preserves_unicode() {
    let path = std::path::PathBuf::from("target")
        .join("quizreel-unit")
        .join("meta")
        .join("m.json");
    let mut meta = RenderMetadata::from_job(&job(), 15, 30);
    meta.title = "Can you answer it? \u{1F914}".to_owned();
    meta.write(&path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains('\u{1F914}'));
    assert_eq!(RenderMetadata::load(&path).unwrap(), meta);
}
