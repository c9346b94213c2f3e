use std::io::Write;
use std::process::{Command, Stdio};
use tempfile::tempdir;

fn bin() -> String {
    env!("CARGO_BIN_EXE_lzss-trace").to_string()
}

#[test]
fn cli_trace_sample() {
    let out = Command::new(bin())
        .args(["trace", "--sample"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.starts_with("54 65 73 74 20 20 20 20 (13,4)"));
    assert!(stdout.trim_end().ends_with("(677,16) EOF"));
}

#[test]
fn cli_trace_hex_argument() {
    let out = Command::new(bin())
        .args(["trace", "--hex", "aa 00 00"])
        .output()
        .unwrap();
    assert!(out.status.success());
    assert_eq!(String::from_utf8(out.stdout).unwrap(), "54 EOF\n");
}

#[test]
fn cli_trace_raw_file_with_offsets() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("stream.bin");
    std::fs::write(&input, [0xAAu8, 0x00, 0x00]).unwrap();

    let out = Command::new(bin())
        .args(["trace", "--raw", "--offsets"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(out.status.success());
    assert_eq!(String::from_utf8(out.stdout).unwrap(), "0\t54\n9\tEOF\n");
}

#[test]
fn cli_trace_stdin_hex() {
    let mut child = Command::new(bin())
        .arg("trace")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"AA 00 00\n")
        .unwrap();
    let out = child.wait_with_output().unwrap();
    assert!(out.status.success());
    assert_eq!(String::from_utf8(out.stdout).unwrap(), "54 EOF\n");
}

#[test]
fn cli_truncated_stream_still_succeeds() {
    let out = Command::new(bin())
        .args(["--quiet", "trace", "--hex", "80"])
        .output()
        .unwrap();
    assert!(out.status.success());
    assert_eq!(
        String::from_utf8(out.stdout).unwrap(),
        "Unexpected EOF\n"
    );
}

#[test]
fn cli_invalid_digit_fails() {
    let out = Command::new(bin())
        .args(["trace", "--hex", "AG"])
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(out.stdout.is_empty());
    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.contains("invalid hex digit"), "stderr: {stderr}");
}

#[test]
fn cli_missing_file_fails() {
    let dir = tempdir().unwrap();
    let st = Command::new(bin())
        .arg("trace")
        .arg(dir.path().join("missing.hex"))
        .status()
        .unwrap();
    assert!(!st.success());
}

#[test]
fn cli_json_summary() {
    let out = Command::new(bin())
        .args(["--json", "trace", "--sample"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.contains("\"termination\": \"end_of_stream\""), "stderr: {stderr}");
    assert!(stderr.contains("\"bits_consumed\": 864"), "stderr: {stderr}");
    assert!(stderr.contains("\"last_token\": \"end_of_stream\""), "stderr: {stderr}");
}

#[test]
fn cli_bits_grouped() {
    let out = Command::new(bin())
        .args(["bits", "--group", "4", "--hex", "F0"])
        .output()
        .unwrap();
    assert!(out.status.success());
    assert_eq!(String::from_utf8(out.stdout).unwrap(), "1111 0000\n");
}

#[test]
fn cli_format_works() {
    let out = Command::new(bin()).arg("format").output().unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.contains("HISTORY_INDEX_BITS=13"));
    assert!(stdout.contains("MAX_MATCH_LENGTH=18"));
}

#[test]
fn cli_double_verbose_logs_tokens_before_summary() {
    let out = Command::new(bin())
        .env_remove("RUST_LOG")
        .args(["-vv", "trace", "--hex", "AA 00 00"])
        .output()
        .unwrap();
    assert!(out.status.success());
    assert_eq!(String::from_utf8(out.stdout).unwrap(), "54 EOF\n");

    let stderr = String::from_utf8(out.stderr).unwrap();
    let first = stderr.find("bit 0: 54").expect("per-token trace line");
    let last = stderr.find("bit 9: EOF").expect("terminator trace line");
    let summary = stderr.find("decode finished").expect("summary line");
    assert!(first < last && last < summary, "stderr: {stderr}");
}

#[test]
fn cli_single_verbose_omits_token_lines() {
    let out = Command::new(bin())
        .env_remove("RUST_LOG")
        .args(["-v", "trace", "--hex", "AA 00 00"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.contains("decode finished"), "stderr: {stderr}");
    assert!(!stderr.contains("bit 0: 54"), "stderr: {stderr}");
}

#[test]
fn cli_warns_when_terminator_missing() {
    let out = Command::new(bin())
        .env_remove("RUST_LOG")
        .args(["trace", "--hex", "A0D068341"])
        .output()
        .unwrap();
    assert!(out.status.success());
    assert_eq!(String::from_utf8(out.stdout).unwrap(), "41 41 41 41\n");
    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(
        stderr.contains("without finding a terminator"),
        "stderr: {stderr}"
    );

    let out = Command::new(bin())
        .env_remove("RUST_LOG")
        .args(["-q", "trace", "--hex", "A0D068341"])
        .output()
        .unwrap();
    assert!(out.status.success());
    assert_eq!(String::from_utf8(out.stdout).unwrap(), "41 41 41 41\n");
    assert!(out.stderr.is_empty());
}
