use super::*;

#[test]
fn command_builder_keeps_argument_order() {
    let spec = CommandSpec::new("ffmpeg")
        .arg("-y")
        .args(["-loglevel", "error"])
        .arg(std::path::Path::new("out.mp4"));
    assert_eq!(spec.args_lossy(), vec!["-y", "-loglevel", "error", "out.mp4"]);
    assert!(spec.has_arg("error"));
    assert!(!spec.has_arg("err"));
}

#[test]
fn failed_outcome_becomes_process_error_with_stderr() {
    let err = CommandOutcome::failed(1, "  no audio stream\n")
        .into_result("ffmpeg")
        .unwrap_err();
    match err {
        QuizError::Process {
            program,
            status,
            stderr,
        } => {
            assert_eq!(program, "ffmpeg");
            assert_eq!(status, "exit code 1");
            assert_eq!(stderr, "no audio stream");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(CommandOutcome::ok().into_result("ffmpeg").is_ok());
}

#[test]
fn signal_termination_is_not_success() {
    let outcome = CommandOutcome {
        code: None,
        stderr: String::new(),
    };
    assert!(!outcome.success());
    assert_eq!(outcome.status_text(), "terminated by signal");
}

#[test]
fn missing_program_is_a_config_error() {
    let spec = CommandSpec::new("quizreel-definitely-not-a-real-program");
    let err = SystemCommandRunner.run(&spec).unwrap_err();
    assert!(matches!(err, QuizError::Config(_)));
}

#[cfg(unix)]
#[test]
fn system_runner_captures_exit_code_and_stderr() {
    let spec = CommandSpec::new("sh").args(["-c", "echo oops >&2; exit 3"]);
    let outcome = SystemCommandRunner.run(&spec).unwrap();
    assert_eq!(outcome.code, Some(3));
    assert_eq!(outcome.stderr.trim(), "oops");
}
