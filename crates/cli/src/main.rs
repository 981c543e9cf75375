use std::process::ExitCode;

fn main() -> ExitCode {
    hotdeal_cli::run()
}
