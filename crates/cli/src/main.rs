use std::process::ExitCode;

fn main() -> ExitCode {
    creditsim_cli::run()
}
