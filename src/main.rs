use std::io;

use md_utility::action::cli::process_args;

#[tokio::main]
async fn main() -> io::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let summary = process_args(args).await?;
    log::info!("程式執行完成：{}", summary);
    Ok(())
}
