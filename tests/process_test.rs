mod common;

use std::path::Path;

use anyhow::Result;
use common::RecordingConsole;
use devboot::{
    bootstrap::Outcome,
    process::{python, CommandSpec, Launcher, SystemLauncher},
    session::{self, FAILURE_MESSAGE},
};

#[test]
fn bare_name_resolves_on_search_path() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let bin = dir.path().join("bin");
    std::fs::create_dir_all(&bin)?;
    std::fs::write(bin.join("python3"), b"")?;

    let found = python::resolve_in(
        Path::new("python3"),
        vec![dir.path().join("empty"), bin.clone()],
        &[],
    );
    assert_eq!(found, Some(bin.join("python3")));

    assert_eq!(python::resolve_in(Path::new("python3"), vec![dir.path().to_path_buf()], &[]), None);
    Ok(())
}

#[test]
fn windows_style_extension_is_tried() -> Result<()> {
    let dir = tempfile::tempdir()?;
    std::fs::write(dir.path().join("python.exe"), b"")?;

    let found = python::resolve_in(Path::new("python"), vec![dir.path().to_path_buf()], &[".exe".into()]);
    assert_eq!(found, Some(dir.path().join("python.exe")));
    Ok(())
}

#[test]
fn explicit_path_must_exist_as_given() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let present = dir.path().join("python");
    std::fs::write(&present, b"")?;

    assert_eq!(python::resolve_in(&present, Vec::new(), &[]), Some(present.clone()));
    assert_eq!(python::resolve_in(&dir.path().join("nope"), Vec::new(), &[]), None);
    // A directory is not an interpreter.
    assert_eq!(python::resolve_in(dir.path(), Vec::new(), &[]), None);
    Ok(())
}

#[test]
fn zero_outcome_is_silent() {
    let console = RecordingConsole::default();
    assert_eq!(session::conclude(Outcome::Success, &console, true), 0);
    assert!(console.messages.borrow().is_empty());
    assert!(!console.paused.get());
}

#[test]
fn nonzero_outcome_reports_and_pauses() {
    let console = RecordingConsole::default();
    let code = session::conclude(Outcome::Failed { code: Some(3) }, &console, true);
    assert_eq!(code, 3);
    assert_eq!(console.messages.borrow().as_slice(), [format!("{} (exit code 3)", FAILURE_MESSAGE)]);
    assert!(console.paused.get());
}

#[test]
fn failure_without_code_exits_one_and_respects_no_pause() {
    let console = RecordingConsole::default();
    let code = session::conclude(Outcome::Failed { code: None }, &console, false);
    assert_eq!(code, 1);
    assert_eq!(console.messages.borrow().len(), 1);
    assert!(!console.paused.get());
}

#[test]
fn abort_names_the_error() {
    let console = RecordingConsole::default();
    let err = anyhow::anyhow!("Python interpreter not found at /nowhere/python");
    assert_eq!(session::abort(&err, &console, true), 1);
    assert!(console.messages.borrow()[0].contains("/nowhere/python"));
    assert!(console.paused.get());
}

#[cfg(unix)]
#[tokio::test]
async fn system_launcher_reports_exit_codes() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let ok = CommandSpec::new("sh")
        .args(["-c", "test \"$(pwd -P)\" = \"$0\""])
        .arg(dir.path().canonicalize()?)
        .current_dir(dir.path());
    assert_eq!(SystemLauncher.run(&ok).await?, Some(0));

    let fail = CommandSpec::new("sh").args(["-c", "exit 3"]);
    assert_eq!(SystemLauncher.run(&fail).await?, Some(3));

    let missing = CommandSpec::new(dir.path().join("no-such-binary"));
    assert!(SystemLauncher.run(&missing).await.is_err());
    Ok(())
}
