use super::*;

const SYSTEM_FONT: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf";

fn system_engine() -> Option<TextLayoutEngine> {
    let path = Path::new(SYSTEM_FONT);
    if !path.is_file() {
        return None;
    }
    Some(TextLayoutEngine::from_files(path, path).unwrap())
}

#[test]
fn missing_font_file_is_config_error() {
    let missing = Path::new("target/quizreel-unit/missing.ttf");
    let err = TextLayoutEngine::from_files(missing, missing)
        .err()
        .unwrap();
    assert!(matches!(err, QuizError::Config(_)));
    assert!(err.to_string().contains("primary font"));
}

#[test]
fn non_font_bytes_are_rejected() {
    let err = TextLayoutEngine::from_bytes(b"nope".to_vec(), b"nope".to_vec())
        .err()
        .unwrap();
    assert!(matches!(err, QuizError::Config(_)));
}

#[test]
fn layouts_are_cached_per_style_and_text() {
    let Some(mut engine) = system_engine() else {
        return;
    };
    let a = engine.layout("15s", TextStyle::Timer).unwrap();
    let b = engine.layout("15s", TextStyle::Timer).unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    engine.layout("15s", TextStyle::Hook).unwrap();
    assert_eq!(engine.cached(), 2);
}

#[test]
fn multi_line_text_breaks_into_lines() {
    let Some(mut engine) = system_engine() else {
        return;
    };
    let layout = engine
        .layout("first line\nsecond line", TextStyle::OutroText)
        .unwrap();
    assert_eq!(layout.lines().count(), 2);
    let single = engine.layout("first line", TextStyle::OutroText).unwrap();
    assert!(layout.height() > single.height());
    assert!(layout.width() > 0.0);
}
