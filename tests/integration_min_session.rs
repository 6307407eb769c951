// Minimal integration test that drives the compiled binary through a PTY.
// This exercises the real event loop and crossterm input handling across
// the main boundaries without relying on internal modules.
//
// Notes:
// - Requires a TTY; uses expectrl which allocates a pseudo terminal.
// - Marked Unix-only and ignored by default to avoid CI/platform issues.
// - Run manually via: `cargo test --test integration_min_session -- --ignored`.

#![cfg(unix)]

use std::io::Write;
use std::time::Duration;

use expectrl::{spawn, Eof};

#[test]
#[ignore]
fn minimal_test_session_completes_and_exits() -> Result<(), Box<dyn std::error::Error>> {
    // A one-word list so a single answer exhausts the test pool
    let mut words = tempfile::NamedTempFile::new()?;
    writeln!(words, "word,isCorrect")?;
    writeln!(words, "necessary,true")?;

    // Keep config and logs away from the developer's own home
    let home = tempfile::tempdir()?;

    let bin = assert_cmd::cargo::cargo_bin("spellcard");
    let cmd = format!(
        "env HOME={home} XDG_CONFIG_HOME={home}/config XDG_STATE_HOME={home}/state {bin} --language english --mode test --no-history --english-file {words}",
        home = home.path().display(),
        bin = bin.display(),
        words = words.path().display()
    );

    // Spawn the TUI inside a pseudo terminal
    let mut p = spawn(cmd)?;

    // Give the app a moment to initialize the terminal/alternate screen
    std::thread::sleep(Duration::from_millis(200));

    // Left arrow: "spelled correctly"
    p.send("\x1b[D")?;

    // Small delay to allow processing and results transition
    std::thread::sleep(Duration::from_millis(200));

    // ESC leaves the result screen and the app
    p.send("\x1b")?;

    p.expect(Eof)?;
    Ok(())
}
