// src/main.rs

use dist_executor::run;

#[tokio::main]
async fn main() {
    let outcome = run().await;

    if let Some(err) = outcome.error {
        eprintln!("dist-executor: {err}");
    }
    std::process::exit(outcome.exit_code);
}
