use std::{env, process::exit};

#[tokio::main]
async fn main() {
    if env::var_os("RUST_LOG").is_none() {
        env::set_var("RUST_LOG", "info");
    }

    pretty_env_logger::init();

    match ethers_deployer::cli::run().await {
        Ok(results) => {
            log::debug!("{} contracts deployed", results.len());
            exit(0);
        }
        Err(err) => {
            eprintln!("{:?}", err);
            exit(1);
        }
    }
}
