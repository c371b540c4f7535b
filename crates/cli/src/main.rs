use std::process::ExitCode;

fn main() -> ExitCode {
    cascade_cli::run()
}
