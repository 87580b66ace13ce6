mod formatter;
mod runner;

use std::io::IsTerminal;
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut format_name = String::from("color");

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--color" => format_name = String::from("color"),
            "--plain" => format_name = String::from("plain"),
            "--help" | "-h" => {
                print_help();
                return ExitCode::SUCCESS;
            }
            other => {
                eprintln!("Error: unknown option {other}");
                print_help();
                return ExitCode::FAILURE;
            }
        }
    }

    // Auto-downgrade to no-color when stdout isn't a terminal
    if !std::io::stdout().is_terminal() {
        format_name = String::from("plain");
    }

    let mut fmt = formatter::create(&format_name);
    let mut stdin = std::io::stdin().lock();
    let mut stdout = std::io::stdout().lock();

    match runner::run(&mut stdin, fmt.as_mut(), &mut stdout) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn print_help() {
    println!(
        "\
testwire-console — render a testwire event stream for humans

USAGE:
    <producer> | testwire-console [OPTIONS]

OPTIONS:
    --color    Colored dots and summary (default)
    --plain    No color, wraps at 80 columns
    -h, --help Print this help message

Reads one JSON event per line from stdin. Lines that are not valid events
are skipped, so the stream may interleave other output. Exits non-zero if
any test case failed or any suite reported failures.

EXAMPLES:
    my-test-runner --json | testwire-console
    my-test-runner --json | testwire-console --plain > report.txt"
    );
}
