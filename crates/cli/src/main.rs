use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    deskflow_cli::run().await
}
