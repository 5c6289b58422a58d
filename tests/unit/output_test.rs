// Tests for table formatting

use kubetriage::output::format_table_raw;
use owo_colors::OwoColorize;

#[test]
fn test_format_table_basic_alignment() {
    let rows = vec![
        vec!["web-1".to_string(), "Running".to_string()],
        vec!["db".to_string(), "CrashLoopBackOff".to_string()],
    ];
    let table = format_table_raw(&["NAME", "STATUS"], &rows);
    let lines: Vec<&str> = table.lines().collect();

    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("NAME"));
    assert!(lines[0].contains("STATUS"));
    // Column one is padded to the widest cell plus two spaces.
    assert_eq!(lines[1], "web-1  Running");
    assert_eq!(lines[2], "db     CrashLoopBackOff");
}

#[test]
fn test_format_table_no_trailing_whitespace() {
    let rows = vec![vec!["a".to_string(), "b".to_string()]];
    let table = format_table_raw(&["LONG-HEADER", "X"], &rows);
    for line in table.lines() {
        assert_eq!(line, line.trim_end());
    }
}

#[test]
fn test_format_table_header_only() {
    let table = format_table_raw(&["FIELD", "VALUE"], &[]);
    assert_eq!(table.lines().count(), 1);
    assert!(table.contains("FIELD"));
}

#[test]
fn test_format_table_ignores_ansi_codes_for_width() {
    let colored = "Running".red().to_string();
    let rows = vec![
        vec![colored.clone(), "x".to_string()],
        vec!["CrashLoopBackOff".to_string(), "y".to_string()],
    ];
    let table = format_table_raw(&["STATUS", "POD"], &rows);
    let lines: Vec<&str> = table.lines().collect();

    // "Running" counts as 7 visible chars, so it gets padded out to the
    // 16-wide column even though the raw string is longer.
    let expected = format!("{}{}x", colored, " ".repeat(16 - 7 + 2));
    assert_eq!(lines[1], expected);
    assert_eq!(lines[2], "CrashLoopBackOff  y");
}

#[test]
fn test_format_table_extra_cells_are_dropped() {
    let rows = vec![vec![
        "a".to_string(),
        "b".to_string(),
        "overflow".to_string(),
    ]];
    let table = format_table_raw(&["A", "B"], &rows);
    assert!(!table.contains("overflow"));
}
