use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    lingo_cli::main_entry().await
}
