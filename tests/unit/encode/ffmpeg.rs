use std::collections::VecDeque;

use super::*;

#[derive(Default)]
struct ScriptedRunner {
    outcomes: VecDeque<CommandOutcome>,
    calls: Vec<CommandSpec>,
}

impl ScriptedRunner {
    fn with(outcomes: impl IntoIterator<Item = CommandOutcome>) -> Self {
        Self {
            outcomes: outcomes.into_iter().collect(),
            calls: Vec::new(),
        }
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&mut self, spec: &CommandSpec) -> QuizResult<CommandOutcome> {
        self.calls.push(spec.clone());
        Ok(self.outcomes.pop_front().unwrap_or_else(CommandOutcome::ok))
    }
}

fn settings() -> EncodeSettings {
    EncodeSettings::from_config(&RenderConfig::default()).unwrap()
}

fn scratch(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("quizreel-unit").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn encode_command_matches_delivery_format() {
    let spec = encode_command(
        &settings(),
        Path::new("work/frame_%05d.png"),
        Path::new("out/v.mp4"),
    );
    assert_eq!(spec.program, "ffmpeg");
    assert_eq!(
        spec.args_lossy(),
        vec![
            "-y",
            "-loglevel",
            "error",
            "-stats",
            "-framerate",
            "30",
            "-i",
            "work/frame_%05d.png",
            "-vf",
            "scale=1080:1920:force_original_aspect_ratio=decrease,pad=1080:1920:(ow-iw)/2:(oh-ih)/2,format=yuv420p",
            "-c:v",
            "libx264",
            "-preset",
            "medium",
            "-crf",
            "20",
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
            "out/v.mp4",
        ]
    );
}

#[test]
fn mix_command_attenuates_music_and_maps_mixed_audio() {
    let spec = mix_command(
        Path::new("v.nomusic.mp4"),
        Path::new("m.mp3"),
        0.15,
        Path::new("v.mp4"),
    );
    let args = spec.args_lossy();
    assert!(args.contains(
        &"[1:a]volume=0.15[bg];[0:a][bg]amix=inputs=2:duration=shortest[aout]".to_owned()
    ));
    assert!(args.windows(2).any(|w| w == ["-map", "[aout]"]));
    assert!(args.windows(2).any(|w| w == ["-b:a", "192k"]));
    assert!(spec.has_arg("-shortest"));
    assert_eq!(args.last().map(String::as_str), Some("v.mp4"));
}

#[test]
fn music_only_command_copies_video_and_maps_music() {
    let spec = music_only_command(Path::new("a.mp4"), Path::new("m.mp3"), Path::new("b.mp4"));
    let args = spec.args_lossy();
    assert!(args.windows(4).any(|w| w == ["-map", "0:v:0", "-map", "1:a:0"]));
    assert!(args.windows(2).any(|w| w == ["-c:v", "copy"]));
    assert!(!spec.has_arg("-filter_complex"));
}

#[test]
fn intermediate_sits_next_to_output() {
    assert_eq!(
        intermediate_path(Path::new("out/videos/x.mp4")),
        PathBuf::from("out/videos/x.nomusic.mp4")
    );
}

#[test]
fn encode_failure_is_fatal_with_diagnostics() {
    let dir = scratch("ffmpeg-encode-fail");
    let mut enc = FfmpegEncoder::new(ScriptedRunner::with([CommandOutcome::failed(
        1,
        "Unknown encoder 'libx264'",
    )]));
    let err = enc
        .encode_frames(&settings(), &dir.join("frame_%05d.png"), &dir.join("v.mp4"))
        .unwrap_err();
    match err {
        QuizError::Process { stderr, .. } => assert!(stderr.contains("libx264")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn mix_success_needs_one_call() {
    let mut enc = FfmpegEncoder::new(ScriptedRunner::default());
    let outcome = enc
        .mux_music(Path::new("a.mp4"), Path::new("m.mp3"), 0.15, Path::new("b.mp4"))
        .unwrap();
    assert_eq!(outcome, MuxOutcome::Mixed);
    assert_eq!(enc.runner().calls.len(), 1);
}

#[test]
fn mix_failure_falls_back_to_music_only() {
    let mut enc = FfmpegEncoder::new(ScriptedRunner::with([
        CommandOutcome::failed(1, "Stream specifier ':a' matches no streams"),
        CommandOutcome::ok(),
    ]));
    let outcome = enc
        .mux_music(Path::new("a.mp4"), Path::new("m.mp3"), 0.15, Path::new("b.mp4"))
        .unwrap();
    assert_eq!(outcome, MuxOutcome::MusicOnly);
    let calls = enc.into_runner().calls;
    assert_eq!(calls.len(), 2);
    assert!(calls[0].has_arg("-filter_complex"));
    assert!(calls[1].has_arg("1:a:0"));
}

#[test]
fn fallback_failure_is_fatal() {
    let mut enc = FfmpegEncoder::new(ScriptedRunner::with([
        CommandOutcome::failed(1, "mix"),
        CommandOutcome::failed(1, "fallback broke"),
    ]));
    let err = enc
        .mux_music(Path::new("a.mp4"), Path::new("m.mp3"), 0.15, Path::new("b.mp4"))
        .unwrap_err();
    assert!(err.to_string().contains("fallback broke"));
}

#[test]
fn finalize_without_music_promotes_intermediate() {
    let dir = scratch("ffmpeg-promote");
    let out = dir.join("v.mp4");
    let intermediate = intermediate_path(&out);
    std::fs::write(&intermediate, b"video").unwrap();

    let mut enc = FfmpegEncoder::new(ScriptedRunner::default());
    let outcome = enc.finalize(&intermediate, None, 0.15, &out).unwrap();

    assert_eq!(outcome, MuxOutcome::NoMusic);
    assert!(!intermediate.exists());
    assert_eq!(std::fs::read(&out).unwrap(), b"video");
    assert!(enc.runner().calls.is_empty());
}

#[test]
fn finalize_with_music_removes_intermediate() {
    let dir = scratch("ffmpeg-mux");
    let out = dir.join("v.mp4");
    let intermediate = intermediate_path(&out);
    std::fs::write(&intermediate, b"video").unwrap();

    let mut enc = FfmpegEncoder::new(ScriptedRunner::default());
    let outcome = enc
        .finalize(&intermediate, Some(Path::new("m.mp3")), 0.15, &out)
        .unwrap();

    assert_eq!(outcome, MuxOutcome::Mixed);
    assert!(!intermediate.exists());
}

#[test]
fn encode_and_finalize_runs_encode_then_mux() {
    let dir = scratch("ffmpeg-full");
    let out = dir.join("v.mp4");
    let mut enc = FfmpegEncoder::new(ScriptedRunner::with([
        CommandOutcome::ok(),
        CommandOutcome::failed(1, "no audio"),
        CommandOutcome::ok(),
    ]));
    let outcome = enc
        .encode_and_finalize(
            &settings(),
            &dir.join("frame_%05d.png"),
            Some(Path::new("m.mp3")),
            0.15,
            &out,
        )
        .unwrap();
    assert_eq!(outcome, MuxOutcome::MusicOnly);
    let calls = enc.into_runner().calls;
    assert_eq!(calls.len(), 3);
    let encoded_to = calls[0].args_lossy().last().cloned().unwrap();
    assert!(encoded_to.ends_with("v.nomusic.mp4"));
}

/// Writes the output file before reporting the scripted outcome, like an ffmpeg that dies
/// mid-write.
struct PartialWriter(ScriptedRunner);

impl CommandRunner for PartialWriter {
    fn run(&mut self, spec: &CommandSpec) -> QuizResult<CommandOutcome> {
        if let Some(out) = spec.args.last() {
            std::fs::write(out, b"partial").unwrap();
        }
        self.0.run(spec)
    }
}

#[test]
fn failed_encode_leaves_no_partial_intermediate() {
    let dir = scratch("ffmpeg-partial-encode");
    let out = dir.join("v.mp4");
    let mut enc = FfmpegEncoder::new(PartialWriter(ScriptedRunner::with([
        CommandOutcome::failed(1, "killed"),
    ])));

    let err = enc
        .encode_and_finalize(&settings(), &dir.join("frame_%05d.png"), None, 0.15, &out)
        .unwrap_err();

    assert!(matches!(err, QuizError::Process { .. }));
    assert!(!intermediate_path(&out).exists());
    assert!(!out.exists());
}

#[test]
fn failed_fallback_mux_removes_intermediate_and_output() {
    let dir = scratch("ffmpeg-partial-mux");
    let out = dir.join("v.mp4");
    let mut enc = FfmpegEncoder::new(PartialWriter(ScriptedRunner::with([
        CommandOutcome::ok(),
        CommandOutcome::failed(1, "mix"),
        CommandOutcome::failed(1, "fallback broke"),
    ])));

    let err = enc
        .encode_and_finalize(
            &settings(),
            &dir.join("frame_%05d.png"),
            Some(Path::new("m.mp3")),
            0.15,
            &out,
        )
        .unwrap_err();

    assert!(err.to_string().contains("fallback broke"));
    assert!(!intermediate_path(&out).exists());
    assert!(!out.exists());
    assert_eq!(enc.into_runner().0.calls.len(), 3);
}
