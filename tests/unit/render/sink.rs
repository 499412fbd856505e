use super::*;

fn cfg(total: u64) -> SinkConfig {
    SinkConfig {
        width: 2,
        height: 2,
        fps: Fps::new(30).unwrap(),
        total_frames: total,
    }
}

fn scratch(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("quizreel-unit").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[test]
fn frame_digits_grow_past_five() {
    assert_eq!(frame_digits(0), 5);
    assert_eq!(frame_digits(600), 5);
    assert_eq!(frame_digits(100_000), 5);
    assert_eq!(frame_digits(100_001), 6);
    assert_eq!(frame_digits(12_000_000), 8);
}

#[test]
fn png_sink_numbers_frames_and_exposes_pattern() {
    let dir = scratch("sink-png");
    let mut sink = PngSequenceSink::new(&dir, [0, 0, 0]);
    sink.begin(cfg(3)).unwrap();
    let frame = FrameRGBA::solid(2, 2, [9, 9, 9, 255]);
    for i in 0..3 {
        sink.push_frame(FrameIndex(i), &frame).unwrap();
    }
    sink.end().unwrap();

    assert!(dir.join("frame_00000.png").is_file());
    assert!(dir.join("frame_00002.png").is_file());
    assert_eq!(sink.input_pattern(), dir.join("frame_%05d.png"));
    assert_eq!(sink.written(), 3);
}

#[test]
fn png_sink_rejects_out_of_order_and_mismatched_frames() {
    let dir = scratch("sink-order");
    let mut sink = PngSequenceSink::new(&dir, [0, 0, 0]);
    sink.begin(cfg(2)).unwrap();
    let frame = FrameRGBA::solid(2, 2, [0, 0, 0, 255]);
    sink.push_frame(FrameIndex(1), &frame).unwrap();
    assert!(sink.push_frame(FrameIndex(1), &frame).is_err());
    let wrong = FrameRGBA::solid(4, 2, [0, 0, 0, 255]);
    let err = sink.push_frame(FrameIndex(2), &wrong).unwrap_err();
    assert!(matches!(err, QuizError::Render(_)));
}

#[test]
fn png_sink_end_checks_frame_count() {
    let dir = scratch("sink-count");
    let mut sink = PngSequenceSink::new(&dir, [0, 0, 0]);
    sink.begin(cfg(2)).unwrap();
    sink.push_frame(FrameIndex(0), &FrameRGBA::solid(2, 2, [0, 0, 0, 255]))
        .unwrap();
    assert!(matches!(sink.end(), Err(QuizError::Render(_))));
}

#[test]
fn push_before_begin_fails() {
    let mut sink = PngSequenceSink::new(scratch("sink-unstarted"), [0, 0, 0]);
    let frame = FrameRGBA::solid(2, 2, [0, 0, 0, 255]);
    assert!(sink.push_frame(FrameIndex(0), &frame).is_err());
}

#[test]
fn in_memory_sink_captures_frames() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg(1)).unwrap();
    sink.push_frame(FrameIndex(0), &FrameRGBA::solid(2, 2, [1, 1, 1, 255]))
        .unwrap();
    sink.end().unwrap();
    assert_eq!(sink.frames().len(), 1);
    assert_eq!(sink.config().unwrap().total_frames, 1);
}
