use std::process::ExitCode;

fn main() -> ExitCode {
    tawqit_cli::run()
}
