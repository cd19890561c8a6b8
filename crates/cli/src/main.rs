use std::process::ExitCode;

fn main() -> ExitCode {
    callcenter_cli::run()
}
