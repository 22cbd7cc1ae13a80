use std::process::ExitCode;

fn main() -> ExitCode {
    hm_cli::run()
}
