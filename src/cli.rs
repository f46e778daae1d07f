// src/cli.rs
use anyhow::Result;
use clap::{Arg, ArgAction, Command};
use std::{env, path::PathBuf, process::ExitCode};

use crate::core::config::{ColorChoice, ConsoleOutputStyle, TbStyle};
use crate::infra::i18n::{resolve_language, DEFAULT_LANGUAGE};
use crate::infra::t;

pub mod commands;

use commands::render::RenderOptions;

/// Pre-parses the command line arguments to find the language setting.
/// This allows the help text to be localized before the full CLI is built.
/// It looks for `--language <VALUE>` or `--language=<VALUE>`.
fn pre_parse_language() -> Option<String> {
    let args: Vec<String> = env::args().collect();
    if let Some(pos) = args.iter().position(|arg| arg == "--language") {
        return args.get(pos + 1).cloned();
    }
    args.iter()
        .find_map(|arg| arg.strip_prefix("--language=").map(str::to_string))
}

fn build_cli(locale: &str) -> Command {
    Command::new("lingua-report")
        .version(env!("CARGO_PKG_VERSION"))
        .about(t!("cli.about", locale = locale).to_string())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("language")
                .long("language")
                .help(t!("cli.lang", locale = locale).to_string())
                .value_name("LANGUAGE")
                .global(true)
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help(t!("cli.arg_debug", locale = locale).to_string())
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("render")
                .about(t!("cli.cmd_render_about", locale = locale).to_string())
                .arg(
                    Arg::new("events")
                        .help(t!("cli.arg_events", locale = locale).to_string())
                        .value_name("EVENTS")
                        .default_value("-")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("verbose")
                        .short('v')
                        .long("verbose")
                        .help(t!("cli.arg_verbose", locale = locale).to_string())
                        .action(ArgAction::Count),
                )
                .arg(
                    Arg::new("quiet")
                        .short('q')
                        .long("quiet")
                        .help(t!("cli.arg_quiet", locale = locale).to_string())
                        .action(ArgAction::Count),
                )
                .arg(
                    Arg::new("report-chars")
                        .short('r')
                        .help(t!("cli.arg_report_chars", locale = locale).to_string())
                        .value_name("CHARS")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("tb")
                        .long("tb")
                        .help(t!("cli.arg_tb", locale = locale).to_string())
                        .value_name("STYLE")
                        .value_parser(clap::value_parser!(TbStyle))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("color")
                        .long("color")
                        .help(t!("cli.arg_color", locale = locale).to_string())
                        .value_name("COLOR")
                        .value_parser(clap::value_parser!(ColorChoice))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("disable-warnings")
                        .long("disable-warnings")
                        .help(t!("cli.arg_disable_warnings", locale = locale).to_string())
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("fulltrace")
                        .long("fulltrace")
                        .visible_alias("full-trace")
                        .help(t!("cli.arg_fulltrace", locale = locale).to_string())
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("collect-only")
                        .long("collect-only")
                        .visible_alias("co")
                        .help(t!("cli.arg_collect_only", locale = locale).to_string())
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("traceconfig")
                        .long("traceconfig")
                        .visible_alias("trace-config")
                        .help(t!("cli.arg_traceconfig", locale = locale).to_string())
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("width")
                        .long("width")
                        .help(t!("cli.arg_width", locale = locale).to_string())
                        .value_name("COLUMNS")
                        .value_parser(clap::value_parser!(usize))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("console-output-style")
                        .long("console-output-style")
                        .help(t!("cli.arg_console_output_style", locale = locale).to_string())
                        .value_name("STYLE")
                        .value_parser(clap::value_parser!(ConsoleOutputStyle))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .help(t!("cli.arg_config", locale = locale).to_string())
                        .value_name("CONFIG")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                ),
        )
        .subcommand(
            Command::new("languages")
                .about(t!("cli.cmd_languages_about", locale = locale).to_string()),
        )
}

pub fn run() -> Result<ExitCode> {
    // Pre-parse language so the help text is already localized.
    let requested = pre_parse_language();
    let locale = resolve_language(requested.as_deref())
        .unwrap_or_else(|_| DEFAULT_LANGUAGE.to_string());
    rust_i18n::set_locale(&locale);

    let matches = build_cli(&locale).get_matches();
    crate::init_logging(matches.get_flag("debug"))?;
    let language = matches.get_one::<String>("language").cloned();

    match matches.subcommand() {
        Some(("render", render_matches)) => {
            let options = RenderOptions {
                events: render_matches.get_one::<PathBuf>("events").cloned(),
                config: render_matches.get_one::<PathBuf>("config").cloned(),
                language,
                verbose: render_matches.get_count("verbose"),
                quiet: render_matches.get_count("quiet"),
                report_chars: render_matches.get_one::<String>("report-chars").cloned(),
                tb_style: render_matches.get_one::<TbStyle>("tb").copied(),
                color: render_matches.get_one::<ColorChoice>("color").copied(),
                disable_warnings: render_matches.get_flag("disable-warnings"),
                fulltrace: render_matches.get_flag("fulltrace"),
                collect_only: render_matches.get_flag("collect-only"),
                traceconfig: render_matches.get_flag("traceconfig"),
                width: render_matches.get_one::<usize>("width").copied(),
                console_output_style: render_matches
                    .get_one::<ConsoleOutputStyle>("console-output-style")
                    .copied(),
            };
            let code = commands::render::execute(options)?;
            Ok(ExitCode::from(code))
        }
        Some(("languages", _)) => {
            if language.is_none() {
                eprintln!("{}", t!("cli.system_language_detected", locale = &locale, lang = &locale));
            }
            commands::languages::execute(&locale)?;
            Ok(ExitCode::SUCCESS)
        }
        _ => {
            // Clap has already printed the help for a missing subcommand.
            Ok(ExitCode::SUCCESS)
        }
    }
}
