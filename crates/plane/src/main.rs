//! SQL formatter CLI
//!
//! A small command-line front end over plane_format.

use std::io::{self, Read, Write};

use plane_format::{DocumentFormattingParams, FormatConfig, FormattingOptions};

// ANSI color codes
const RED: &str = "\x1b[31m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    let mut options = FormattingOptions {
        tab_size: 2,
        insert_spaces: true,
    };
    let mut config = FormatConfig::default();
    let mut sql_arg: Option<String> = None;
    let mut no_color = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                return;
            }
            "--tab-size" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --tab-size requires a number");
                    std::process::exit(1);
                }
                options.tab_size = args[i].parse().unwrap_or(2);
            }
            "--tabs" => {
                options.insert_spaces = false;
            }
            "--lowercase-keywords" => {
                config.lowercase_keywords = true;
            }
            "--no-color" => {
                no_color = true;
            }
            "-" => {
                // Read from stdin
                sql_arg = Some(read_stdin());
            }
            arg if arg.starts_with('-') => {
                eprintln!("Unknown option: {}", arg);
                eprintln!("Use --help for usage information");
                std::process::exit(1);
            }
            _ => {
                sql_arg = Some(args[i].clone());
            }
        }
        i += 1;
    }

    let sql = match sql_arg {
        Some(s) => s,
        None => {
            if atty::is(atty::Stream::Stdin) {
                // Interactive mode - show help
                print_help();
                return;
            }
            read_stdin()
        }
    };

    let use_color = !no_color && atty::is(atty::Stream::Stderr);

    let params = DocumentFormattingParams { options };
    match plane_format::format(&sql, &params, &config) {
        Ok(edits) => {
            for edit in edits {
                println!("{}", edit.new_text);
            }
            let _ = io::stdout().flush();
        }
        Err(err) => {
            if use_color {
                eprintln!("{RED}{BOLD}Error:{RESET} {err}");
            } else {
                eprintln!("Error: {err}");
            }
            std::process::exit(1);
        }
    }
}

fn read_stdin() -> String {
    let mut input = String::new();
    if io::stdin().read_to_string(&mut input).is_err() {
        eprintln!("Error: failed to read from stdin");
        std::process::exit(1);
    }
    input
}

fn print_help() {
    eprintln!(
        r#"plane - SQL formatter

USAGE:
    plane [OPTIONS] [SQL]
    echo "SELECT * FROM users" | plane

OPTIONS:
    -h, --help              Print this help message
    --tab-size <N>          Spaces per indent level (default: 2)
    --tabs                  Indent with tabs instead of spaces
    --lowercase-keywords    Render reserved words in lowercase
    --no-color              Disable colored error output
    -                       Read SQL from stdin

EXAMPLES:
    # Format a query
    plane "SELECT a, b FROM users WHERE active = 1"

    # Format from stdin with lowercase keywords
    echo "SELECT * FROM users" | plane --lowercase-keywords

    # Indent with tabs
    cat query.sql | plane --tabs
"#
    );
}
