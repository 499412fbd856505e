use std::collections::HashMap;

use super::*;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_match_shorts_format() {
    let cfg = RenderConfig::default();
    assert_eq!(
        cfg.canvas(),
        Canvas {
            width: 1080,
            height: 1920
        }
    );
    assert_eq!(cfg.video.fps, 30);
    assert_eq!(cfg.video.crf, 20);
    assert_eq!(cfg.video.preset, "medium");
    assert_eq!(cfg.timing.countdown_seconds, 15);
    assert_eq!(cfg.outro.actions.len(), 3);
    cfg.validate().unwrap();
}

#[test]
fn partial_json_fills_defaults() {
    let cfg: RenderConfig =
        serde_json::from_str(r#"{ "video": { "fps": 24 }, "seed": 7 }"#).unwrap();
    assert_eq!(cfg.video.fps, 24);
    assert_eq!(cfg.video.width, 1080);
    assert_eq!(cfg.seed, Some(7));
    assert_eq!(cfg.timing, TimingConfig::default());
}

#[test]
fn env_overrides_apply() {
    let cfg = RenderConfig::default()
        .with_overrides_from(lookup(&[
            ("FPS", "60"),
            ("PRESET", "veryfast"),
            ("ENABLE_MUSIC", "off"),
            ("MUSIC_VOLUME", "0.3"),
            ("OUTPUT_DIR", "/srv/out"),
        ]))
        .unwrap();
    assert_eq!(cfg.video.fps, 60);
    assert_eq!(cfg.video.preset, "veryfast");
    assert!(!cfg.audio.enable_music);
    assert_eq!(cfg.audio.music_volume, 0.3);
    assert_eq!(cfg.paths.videos_dir(), PathBuf::from("/srv/out/videos"));
}

#[test]
fn malformed_env_number_is_config_error() {
    let err = RenderConfig::default()
        .with_overrides_from(lookup(&[("FPS", "thirty")]))
        .unwrap_err();
    assert!(matches!(err, QuizError::Config(_)));
    assert!(err.to_string().contains("QUIZREEL_FPS"));
}

#[test]
fn validation_rejects_bad_values() {
    let mut cfg = RenderConfig::default();
    cfg.video.width = 1081;
    assert!(cfg.validate().is_err());

    let mut cfg = RenderConfig::default();
    cfg.video.crf = 52;
    assert!(cfg.validate().is_err());

    let mut cfg = RenderConfig::default();
    cfg.timing.outro_seconds = 0.0;
    assert!(cfg.validate().is_err());

    let mut cfg = RenderConfig::default();
    cfg.audio.music_volume = f64::NAN;
    assert!(cfg.validate().is_err());
}

#[test]
fn missing_fonts_fail_precondition() {
    let mut cfg = RenderConfig::default();
    cfg.paths.font_primary = PathBuf::from("target/definitely/missing.ttf");
    let err = cfg.check_fonts().unwrap_err();
    assert!(matches!(err, QuizError::Config(_)));
    assert!(err.to_string().contains("primary font not found"));
}

#[test]
fn derived_paths_follow_layout() {
    let paths = PathsConfig::default();
    assert_eq!(paths.icon_path("like"), PathBuf::from("assets/icons/like.png"));
    assert_eq!(paths.work_root(), PathBuf::from("cache/tmp"));
    assert_eq!(paths.meta_dir(), PathBuf::from("output/meta"));
}
