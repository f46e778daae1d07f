//! # Render Integration Tests / 渲染集成测试
//!
//! These tests replay complete event streams through the terminal reporter
//! and compare the rendered report byte for byte.
//!
//! 这些测试通过终端报告器重放完整的事件流，并逐字节比较渲染的报告。

mod common;

use common::*;
use lingua_report::core::config::{ColorChoice, ReporterConfig, TbStyle};
use lingua_report::core::models::ExitStatus;

const TRACEBACK: &str = "def test_two():\n>       assert 0\nE       assert 0";

/// A line holding `head`, padded so the progress `marker` ends one column
/// before the edge of a 40 columns terminal.
fn progress_line(head: &str, marker: &str) -> String {
    let fill = 40 - head.chars().count() - marker.len() - 1;
    format!("{}{}{}\n", head, " ".repeat(fill), marker)
}

fn collection_start() -> String {
    r#"{"event":"collection_start"}"#.to_string()
}

/// Two files, three tests, one failure and one warning.
fn mixed_run() -> String {
    let mut events = vec![session_start(), collection_start(), collected(3)];
    events.extend(full_test("test_a.py::test_one", "passed"));
    events.push(run_start("test_a.py::test_two"));
    events.push(report("test_a.py::test_two", "setup", "passed"));
    events.push(failure("test_a.py::test_two", TRACEBACK, "test_a.py:3: assert 0"));
    events.push(report("test_a.py::test_two", "teardown", "passed"));
    events.extend(full_test("test_b.py::test_three", "passed"));
    events.push(warning("deprecated call", Some("test_a.py::test_one")));
    events.push(session_finish("tests_failed"));
    lines(&events)
}

#[cfg(test)]
mod default_verbosity_tests {
    use super::*;

    #[test]
    fn test_mixed_run_in_english() {
        let (status, out) = render_with(&mixed_run(), plain_config(), "en", false);
        assert_eq!(status, Some(ExitStatus::TestsFailed));

        let expected = [
            "========= test session starts ==========\n".to_string(),
            "platform linux -- pytest-3.4.0\n".to_string(),
            "rootdir: /work\n".to_string(),
            "collected 3 items\n".to_string(),
            "\n".to_string(),
            progress_line("test_a.py .F", " [ 66%]"),
            progress_line("test_b.py .", " [100%]"),
            "\n".to_string(),
            "=============== FAILURES ===============\n".to_string(),
            "_______________ test_two _______________\n".to_string(),
            format!("{}\n", TRACEBACK),
            "=========== warnings summary ===========\n".to_string(),
            "test_a.py::test_one\n".to_string(),
            "  deprecated call\n".to_string(),
            "\n".to_string(),
            "-- Docs: http://doc.pytest.org/en/latest/warnings.html\n".to_string(),
            "= 1 failed, 2 passed, 1 warnings in 0.12 seconds =\n".to_string(),
        ]
        .concat();
        assert_eq!(out, expected);
    }

    #[test]
    fn test_mixed_run_in_spanish() {
        let out = render(&mixed_run(), plain_config(), "es");

        let expected = [
            "===== comienza la sesión de prueba =====\n".to_string(),
            "plataforma linux -- pytest-3.4.0\n".to_string(),
            "rootdir: /work\n".to_string(),
            "coleccionado 3 ítems\n".to_string(),
            "\n".to_string(),
            progress_line("test_a.py .F", " [ 66%]"),
            progress_line("test_b.py .", " [100%]"),
            "\n".to_string(),
            "=============== FALLADOS ===============\n".to_string(),
            "_______________ test_two _______________\n".to_string(),
            format!("{}\n", TRACEBACK),
            "======= resumen de advertencias ========\n".to_string(),
            "test_a.py::test_one\n".to_string(),
            "  deprecated call\n".to_string(),
            "\n".to_string(),
            "-- Docs: http://doc.pytest.org/en/latest/warnings.html\n".to_string(),
            "= 1 fallado, 2 pasado, 1 advertencias en 0.12 segundos =\n".to_string(),
        ]
        .concat();
        assert_eq!(out, expected);
    }

    #[test]
    fn test_classic_style_prints_no_progress() {
        let config = ReporterConfig {
            console_output_style: lingua_report::core::config::ConsoleOutputStyle::Classic,
            ..plain_config()
        };
        let out = render(&mixed_run(), config, "en");
        assert!(out.contains("\ntest_a.py .F\ntest_b.py .\n"));
        assert!(!out.contains('%'));
    }

    #[test]
    fn test_replaying_twice_is_byte_identical() {
        let first = render(&mixed_run(), plain_config(), "en");
        let second = render(&mixed_run(), plain_config(), "en");
        assert_eq!(first, second);
    }

    #[test]
    fn test_long_lines_wrap_with_progress() {
        let mut events = vec![collected(30)];
        for i in 0..30 {
            events.extend(full_test(&format!("test_long.py::test_{}", i), "passed"));
        }
        events.push(session_finish("ok"));
        let out = render(&lines(&events), plain_config(), "en");

        // "test_long.py " is 13 columns and the marker wraps the line once
        // it holds 40 - 7 - 1 columns: 19 results on the first line, then 11.
        let first_line = format!("test_long.py {} [ 63%]\n", ".".repeat(19));
        assert!(out.contains(&first_line), "output was:\n{}", out);
        assert!(out.contains(&progress_line(&".".repeat(11), " [100%]")));
        assert!(out.ends_with("====== 30 passed in 0.12 seconds =======\n"));
    }
}

#[cfg(test)]
mod verbosity_tests {
    use super::*;

    #[test]
    fn test_verbose_prints_location_lines_and_words() {
        let config = ReporterConfig {
            verbose: 1,
            ..plain_config()
        };
        let out = render(&mixed_run(), config, "en");

        let expected_head = [
            "========= test session starts ==========\n".to_string(),
            "platform linux -- pytest-3.4.0\n".to_string(),
            "rootdir: /work\n".to_string(),
            "collecting ... collected 3 items\n".to_string(),
            "\n".to_string(),
            progress_line("test_a.py::test_one PASSED", " [ 33%]"),
            progress_line("test_a.py::test_two FAILED", " [ 66%]"),
            progress_line("test_b.py::test_three PASSED", " [100%]"),
            "\n".to_string(),
            "=============== FAILURES ===============\n".to_string(),
        ]
        .concat();
        assert!(out.starts_with(&expected_head), "output was:\n{}", out);
    }

    #[test]
    fn test_verbose_words_are_localized() {
        let config = ReporterConfig {
            verbose: 1,
            ..plain_config()
        };
        let out = render(&mixed_run(), config, "es");
        assert!(out.contains("test_a.py::test_one PASADO"));
        assert!(out.contains("test_a.py::test_two FALLADO"));
        assert!(out.contains("coleccionando ... coleccionado 3 ítems\n"));
    }

    #[test]
    fn test_quiet_prints_bare_letters() {
        let config = ReporterConfig {
            verbose: -1,
            ..plain_config()
        };
        let out = render(&mixed_run(), config, "en");

        let expected = [
            ".F.\n",
            "=============== FAILURES ===============\n",
            "_______________ test_two _______________\n",
            TRACEBACK,
            "\n",
            "=========== warnings summary ===========\n",
            "test_a.py::test_one\n",
            "  deprecated call\n",
            "\n",
            "-- Docs: http://doc.pytest.org/en/latest/warnings.html\n",
            "1 failed, 2 passed, 1 warnings in 0.12 seconds\n",
        ]
        .concat();
        assert_eq!(out, expected);
    }

    #[test]
    fn test_more_quiet_omits_the_stats_line() {
        let config = ReporterConfig {
            verbose: -2,
            tb_style: TbStyle::No,
            disable_warnings: true,
            ..plain_config()
        };
        let out = render(&mixed_run(), config, "en");
        assert_eq!(out, ".F.\n");
    }
}

#[cfg(test)]
mod section_tests {
    use super::*;

    #[test]
    fn test_setup_and_collection_errors() {
        let events = [
            r#"{"event":"collect_report","outcome":"failed","record":{"location":{"file":"test_bad.py","domain":"test_bad.py"},"body":{"longrepr":"SyntaxError: invalid syntax"}}}"#.to_string(),
            collected(1),
            run_start("test_x.py::test_x"),
            r#"{"event":"report","outcome":"failed","record":{"node_id":"test_x.py::test_x","phase":"setup","location":{"file":"test_x.py","line":1,"domain":"test_x"},"body":{"longrepr":"fixture 'db' not found"}}}"#.to_string(),
            report("test_x.py::test_x", "teardown", "passed"),
            session_finish("tests_failed"),
        ];
        let out = render(&lines(&events), plain_config(), "en");

        let expected = [
            "collected 1 item / 1 errors\n".to_string(),
            "\n".to_string(),
            progress_line("test_x.py E", " [100%]"),
            "\n".to_string(),
            "================ ERRORS ================\n".to_string(),
            "_____ ERROR collecting test_bad.py _____\n".to_string(),
            "SyntaxError: invalid syntax\n".to_string(),
            "_______ ERROR at setup of test_x _______\n".to_string(),
            "fixture 'db' not found\n".to_string(),
            "======= 2 error in 0.12 seconds ========\n".to_string(),
        ]
        .concat();
        assert_eq!(out, expected);
    }

    #[test]
    fn test_teardown_sections_follow_the_failure() {
        let events = [
            collected(1),
            run_start("test_a.py::test_two"),
            failure("test_a.py::test_two", TRACEBACK, "test_a.py:3: assert 0"),
            r#"{"event":"report","outcome":"passed","record":{"node_id":"test_a.py::test_two","phase":"teardown","body":{"sections":[{"name":"Captured stdout teardown","content":"closing\n"},{"name":"Captured stdout setup","content":"opening\n"}]}}}"#.to_string(),
            session_finish("tests_failed"),
        ];
        let out = render(&lines(&events), plain_config(), "en");
        assert!(out.contains(&format!(
            "{}\n------- Captured stdout teardown -------\nclosing\n",
            TRACEBACK
        )));
        assert!(!out.contains("opening"));
    }

    #[test]
    fn test_line_style_prints_crash_lines() {
        let config = ReporterConfig {
            tb_style: TbStyle::Line,
            ..plain_config()
        };
        let out = render(&mixed_run(), config, "en");
        assert!(out.contains("=============== FAILURES ===============\ntest_a.py:3: assert 0\n"));
        assert!(!out.contains("_ test_two _"));
    }

    #[test]
    fn test_previously_shown_failures_are_counted_but_not_rendered() {
        let events = [
            collected(1),
            r#"{"event":"report","outcome":"failed","record":{"node_id":"t.py::t","phase":"call","pdb_shown":true,"body":{"longrepr":"already seen"}}}"#.to_string(),
            session_finish("tests_failed"),
        ];
        let out = render(&lines(&events), plain_config(), "en");
        assert!(!out.contains("FAILURES"));
        assert!(!out.contains("already seen"));
        assert!(out.contains("1 failed in 0.12 seconds"));
    }

    #[test]
    fn test_passes_and_short_summary_on_request() {
        let config = ReporterConfig {
            report_chars: "fP".into(),
            disable_warnings: true,
            ..plain_config()
        };
        let out = render(&mixed_run(), config, "en");
        let tail = [
            "================ PASSES ================\n",
            "_______________ test_one _______________\n",
            "______________ test_three ______________\n",
            "======= short test summary info ========\n",
            "FAILED test_a.py::test_two\n",
            "PASSED test_a.py::test_one\n",
            "PASSED test_b.py::test_three\n",
        ]
        .concat();
        assert!(out.contains(&tail), "output was:\n{}", out);
        assert!(!out.contains("warnings summary"));
    }

    #[test]
    fn test_deselected_items_are_reported() {
        let events = [
            collected(1),
            r#"{"event":"deselected","node_ids":["t.py::a","t.py::b"]}"#.to_string(),
            run_start("t.py::c"),
            report("t.py::c", "call", "passed"),
            session_finish("ok"),
        ];
        let out = render(&lines(&events), plain_config(), "en");
        assert!(out.ends_with(
            "========== 2 tests deselected ==========\n= 1 passed, 2 deselected in 0.12 seconds =\n"
        ));
    }

    #[test]
    fn test_plugin_categories_turn_the_line_yellow() {
        let events = [
            collected(2),
            r#"{"event":"report","outcome":"passed","category":"rerun","letter":"R","word":"RERUN","record":{"node_id":"t.py::a","phase":"call"}}"#.to_string(),
            r#"{"event":"report","outcome":"passed","record":{"node_id":"t.py::a","phase":"call"}}"#.to_string(),
            session_finish("ok"),
        ];
        let out = render(&lines(&events), plain_config(), "en");
        assert!(out.contains("t.py R."));
        assert!(out.contains("1 passed, 1 rerun in 0.12 seconds"));
    }

    #[test]
    fn test_nothing_ran() {
        let events = [collected(0), session_finish("no_tests_collected")];
        let (status, out) = render_with(&lines(&events), plain_config(), "en", false);
        assert_eq!(status, Some(ExitStatus::NoTestsCollected));
        assert_eq!(
            out,
            "collected 0 items\n\n===== no tests ran in 0.12 seconds =====\n"
        );
    }

    #[test]
    fn test_non_text_payloads_keep_the_failure() {
        let events = [
            collected(1),
            r#"{"event":"report","outcome":"failed","record":{"node_id":"t.py::t","phase":"call","body":{"longrepr":{"message":"boom"},"sections":[{"name":7,"content":"x"}]}}}"#.to_string(),
            session_finish("tests_failed"),
        ];
        let out = render(&lines(&events), plain_config(), "en");
        assert!(out.contains("=============== FAILURES ===============
"));
        assert!(out.contains("{\"message\":\"boom\"}\n"));
        assert!(out.contains("------------------ 7 -------------------\nx\n"));
        assert!(out.ends_with("======= 1 failed in 0.12 seconds =======\n"));
    }
}

#[cfg(test)]
mod session_end_tests {
    use super::*;

    fn interrupted_run() -> String {
        let mut events = vec![collected(2)];
        events.extend(full_test("test_a.py::test_one", "passed"));
        events.push(
            r#"{"event":"keyboard_interrupt","message":"KeyboardInterrupt","crash":"/work/test_a.py:6: KeyboardInterrupt","traceback":"def test_interrupt_me():\n>       raise KeyboardInterrupt\n"}"#
                .to_string(),
        );
        events.push(session_finish("interrupted"));
        lines(&events)
    }

    #[test]
    fn test_keyboard_interrupt_hint() {
        let out = render(&interrupted_run(), plain_config(), "en");
        let expected_tail = [
            "!!!!!!!!!! KeyboardInterrupt !!!!!!!!!!!\n",
            "to show a full traceback on KeyboardInterrupt use --fulltrace\n",
            "/work/test_a.py:6: KeyboardInterrupt\n",
            "======= 1 passed in 0.12 seconds =======\n",
        ]
        .concat();
        assert!(out.ends_with(&expected_tail), "output was:\n{}", out);
    }

    #[test]
    fn test_keyboard_interrupt_hint_in_spanish() {
        let out = render(&interrupted_run(), plain_config(), "es");
        assert!(out.contains("usa --fulltrace para mostrar un rastreo completo con KeyboardInterrupt\n"));
    }

    #[test]
    fn test_keyboard_interrupt_fulltrace() {
        let config = ReporterConfig {
            fulltrace: true,
            ..plain_config()
        };
        let out = render(&interrupted_run(), config, "en");
        assert!(out.contains("!!!!!!!!!! KeyboardInterrupt !!!!!!!!!!!\ndef test_interrupt_me():\n>       raise KeyboardInterrupt\n"));
        assert!(!out.contains("--fulltrace"));
    }

    #[test]
    fn test_interrupt_without_session_finish_is_reported_at_the_end() {
        let events = [
            collected(1),
            r#"{"event":"keyboard_interrupt","message":"KeyboardInterrupt"}"#.to_string(),
        ];
        let (status, out) = render_with(&lines(&events), plain_config(), "en", false);
        assert_eq!(status, None);
        assert!(out.ends_with(
            "!!!!!!!!!! KeyboardInterrupt !!!!!!!!!!!\nto show a full traceback on KeyboardInterrupt use --fulltrace\n"
        ));
    }

    #[test]
    fn test_internal_error_skips_the_sections() {
        let mut events = vec![collected(1)];
        events.push(failure("test_a.py::test_two", TRACEBACK, "test_a.py:3: assert 0"));
        events.push(r#"{"event":"internal_error","text":"Traceback\n  boom"}"#.to_string());
        events.push(session_finish("internal_error"));
        let (status, out) = render_with(&lines(&events), plain_config(), "es", false);
        assert_eq!(status, Some(ExitStatus::InternalError));
        assert!(out.contains("\nERROR INTERNO> Traceback\nERROR INTERNO>   boom\n"));
        assert!(!out.contains("FALLADOS"));
        assert!(out.ends_with("====== 1 fallado en 0.12 segundos ======\n"));
    }

    #[test]
    fn test_tty_collection_line_is_rewritten() {
        let events = [
            r#"{"event":"collect_report","outcome":"passed","items":2}"#.to_string(),
            collected(2),
            session_finish("ok"),
        ];
        let config = ReporterConfig {
            color: ColorChoice::No,
            ..plain_config()
        };
        let (_, out) = render_with(&lines(&events), config, "en", true);
        let collecting = format!("\rcollecting 2 items{}", " ".repeat(21));
        let collected = format!("\rcollected 2 items{}\n", " ".repeat(22));
        assert!(out.starts_with(&format!("{}{}", collecting, collected)), "output was {:?}", out);
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let events = format!(
            "{}\nnot an event\n{}\n",
            collected(0),
            session_finish("no_tests_collected")
        );
        let (status, out) = render_with(&events, plain_config(), "en", false);
        assert_eq!(status, Some(ExitStatus::NoTestsCollected));
        assert!(out.contains("no tests ran"));
    }
}

#[cfg(test)]
mod collect_only_tests {
    use super::*;

    fn failed_collection() -> String {
        let events = [
            r#"{"event":"plugin_registered","plugin":"cacheprovider"}"#.to_string(),
            r#"{"event":"collect_report","outcome":"failed","record":{"location":{"file":"test_bad.py","domain":"test_bad.py"},"body":{"longrepr":"raise ValueError(0)"}}}"#.to_string(),
            collected(0),
            session_finish("interrupted"),
        ];
        lines(&events)
    }

    #[test]
    fn test_collection_failures_follow_the_collect_line() {
        let config = ReporterConfig {
            collect_only: true,
            ..plain_config()
        };
        let out = render(&failed_collection(), config, "es");
        assert!(out.starts_with(
            "coleccionado 0 ítems / 1 errores\n!!!!!!!!! fallas de colección !!!!!!!!!!\nraise ValueError(0)\n"
        ), "output was:\n{}", out);
    }

    #[test]
    fn test_collection_failures_in_english() {
        let config = ReporterConfig {
            collect_only: true,
            ..plain_config()
        };
        let out = render(&failed_collection(), config, "en");
        assert!(out.contains("!!!!!!!!! collection failures !!!!!!!!!!\nraise ValueError(0)\n"));
    }

    #[test]
    fn test_regular_runs_have_no_collection_failures_section() {
        let out = render(&failed_collection(), plain_config(), "en");
        assert!(!out.contains("collection failures"));
        assert!(!out.contains("PLUGIN registered"));
        assert!(out.contains("_____ ERROR collecting test_bad.py _____\n"));
    }

    #[test]
    fn test_plugin_registrations_are_echoed_with_traceconfig() {
        let config = ReporterConfig {
            traceconfig: true,
            ..plain_config()
        };
        let out = render(&failed_collection(), config, "en");
        assert!(out.starts_with("PLUGIN registered: cacheprovider\ncollected 0 items / 1 errors\n"));
    }
}
