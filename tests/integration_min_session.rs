// Drives the compiled binary through a PTY to exercise the real event loop
// and crossterm input handling.
//
// - Requires a TTY; expectrl allocates a pseudo terminal.
// - Unix-only and ignored by default.
// - Run manually via: `cargo test --test integration_min_session -- --ignored`.

#![cfg(unix)]

use std::time::Duration;

use expectrl::{spawn, Eof};

#[test]
#[ignore]
fn minimal_interview_completes_and_exits() -> Result<(), Box<dyn std::error::Error>> {
    let bin = assert_cmd::cargo::cargo_bin("cloudquiz");
    let cmd = format!("{} -n Ana -q 1 -k 0 --seed 1", bin.display());

    let mut p = spawn(cmd)?;
    std::thread::sleep(Duration::from_millis(200));

    // start, pick the first answer, advance to results
    p.send("\r")?;
    std::thread::sleep(Duration::from_millis(100));
    p.send("1")?;
    p.send("n")?;
    std::thread::sleep(Duration::from_millis(200));

    p.send("\x1b")?; // ESC
    p.expect(Eof)?;
    Ok(())
}

#[test]
fn list_clouds_prints_every_cloud() {
    let output = assert_cmd::Command::cargo_bin("cloudquiz")
        .unwrap()
        .arg("--list-clouds")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for cloud in ["marketing", "sales", "service", "commerce", "cpq", "pardot"] {
        assert!(stdout.contains(cloud), "missing {cloud} in:\n{stdout}");
    }
}
