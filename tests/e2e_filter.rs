#![cfg(feature = "cli")]

use std::io::Write;
use std::process::{Command, Output, Stdio};

fn sk_algo_bin() -> &'static str {
    env!("CARGO_BIN_EXE_sk-algo")
}

fn filter(args: &[&str], input: &str) -> Output {
    let mut child = Command::new(sk_algo_bin())
        .args(args)
        .env("SKIM_ALGO_DEFAULT_OPTIONS", "")
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("run sk-algo");
    // sk-algo may exit before reading its input
    let _ = child.stdin.take().expect("stdin is piped").write_all(input.as_bytes());
    child.wait_with_output().expect("wait for sk-algo")
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout).lines().map(str::to_string).collect()
}

#[test]
fn filter_prints_best_matches_first() {
    let output = filter(&["fbb"], "foo_bar\nfoo bar baz\nfooBarBaz\nnothing here\n");

    assert!(output.status.success(), "sk-algo failed: status={:?}", output.status.code());
    // same score, the shorter match wins
    assert_eq!(stdout_lines(&output), vec!["fooBarBaz", "foo bar baz"]);
}

#[test]
fn filter_exit_code_is_one_on_no_match() {
    let output = filter(&["xyz"], "foo\nbar\n");

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

#[test]
fn filter_exit_code_is_two_on_bad_arguments() {
    let output = filter(&["--algo", "v3", "foo"], "foo\n");

    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
}

#[test]
fn filter_prints_scores_and_positions() {
    let output = filter(&["--print-score", "--positions", "fbb"], "foo bar baz\n");

    assert!(output.status.success());
    assert_eq!(stdout_lines(&output), vec!["70\tfoo bar baz\t0,4,8"]);
}

#[test]
fn filter_with_anchored_algorithms() {
    let input = "foobar\n  foo\nbarfoo\nfoo\n";

    let output = filter(&["--algo", "prefix", "foo"], input);
    assert_eq!(stdout_lines(&output).len(), 3);
    assert!(!stdout_lines(&output).contains(&"barfoo".to_string()));

    let output = filter(&["--algo", "suffix", "foo"], input);
    assert_eq!(stdout_lines(&output).len(), 3);
    assert!(!stdout_lines(&output).contains(&"foobar".to_string()));

    let output = filter(&["--algo", "equal", "foo"], input);
    assert_eq!(stdout_lines(&output), vec!["foo", "  foo"]);
}

#[test]
fn filter_tiebreak_and_limit() {
    let input = "abc\nab\nabcd\n";

    let output = filter(&["--tiebreak", "length", "ab"], input);
    assert_eq!(stdout_lines(&output), vec!["ab", "abc", "abcd"]);

    let output = filter(&["--tiebreak=-index", "--limit", "2", "ab"], input);
    assert_eq!(stdout_lines(&output), vec!["abcd", "ab"]);
}

#[test]
fn filter_default_options_from_env() {
    let output = Command::new(sk_algo_bin())
        .arg("BAR")
        .env("SKIM_ALGO_DEFAULT_OPTIONS", "--case ignore --algo exact")
        .stdin(Stdio::null())
        .output()
        .expect("run sk-algo");

    // empty input never matches
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn filter_normalizes_input() {
    let output = filter(&["cafe"], "café\ncafe\ntea\n");
    assert_eq!(stdout_lines(&output), vec!["café", "cafe"]);

    let output = filter(&["--literal", "cafe"], "café\ncafe\ntea\n");
    assert_eq!(stdout_lines(&output), vec!["cafe"]);
}

#[test]
fn filter_many_threads_keeps_order() {
    let input: String = (0..500).map(|i| format!("line {i} foo\n")).collect();
    let output = filter(&["--threads", "4", "--tiebreak", "index", "foo"], &input);

    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 500);
    assert_eq!(lines.first().map(String::as_str), Some("line 0 foo"));
    assert_eq!(lines.last().map(String::as_str), Some("line 499 foo"));
}

#[test]
fn filter_order_does_not_depend_on_positions() {
    // "a ab" has an earlier 'a' than its best alignment
    let input = "a ab\n_ab\n";

    let plain = filter(&["ab"], input);
    assert_eq!(stdout_lines(&plain), vec!["_ab", "a ab"]);

    let with_positions = filter(&["--positions", "ab"], input);
    assert_eq!(stdout_lines(&with_positions), vec!["_ab\t1,2", "a ab\t2,3"]);
}

#[test]
fn filter_extended_query() {
    let input = "src/main.rs\nsrc/test.rs\nREADME.md\nlib/main.rs\n";

    let output = filter(&["-x", "^src rs$ !test"], input);
    assert_eq!(stdout_lines(&output), vec!["src/main.rs"]);

    let output = filter(&["--extended", "md$ | ^lib"], input);
    let mut lines = stdout_lines(&output);
    lines.sort();
    assert_eq!(lines, vec!["README.md", "lib/main.rs"]);

    // without the flag the decorations are part of the query
    let output = filter(&["^src"], input);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn filter_extended_positions_are_merged() {
    let output = filter(&["-x", "--positions", "foo baz"], "foo bar baz\nfoo bar\n");
    assert_eq!(stdout_lines(&output), vec!["foo bar baz\t0,1,2,8,9,10"]);
}

#[test]
fn filter_extended_exact_by_default_with_exact_algo() {
    let input = "foo bar\nfbr\n";

    let output = filter(&["-x", "--algo", "exact", "fbr"], input);
    assert_eq!(stdout_lines(&output), vec!["fbr"]);

    let output = filter(&["-x", "--algo", "exact", "'fbr"], input);
    assert_eq!(stdout_lines(&output).len(), 2);
}
