use std::{
    fs::write,
    path::Path,
    process::{Command, Output},
};

use serde_json::{json, Value};

/// Runs the deployer binary in `root` against an unreachable local node.
fn run_deployer(root: &Path, contracts: Value) -> Output {
    let plan = root.join("deploy.json");

    write(
        &plan,
        json!({
            "defaultNetwork": "localhost",
            "networks": {
                "localhost": { "url": "http://127.0.0.1:9" }
            },
            "contracts": contracts
        })
        .to_string(),
    )
    .unwrap();

    Command::new(env!("CARGO_BIN_EXE_ethers-deployer"))
        .current_dir(root)
        .env("DEPLOY_PLAN", &plan)
        .env("RUST_LOG", "debug")
        .env_remove("HARDHAT_NETWORK")
        .env_remove("DEPLOYER_ADDRESS")
        .env_remove("TENDERLY_ACCESS_KEY")
        .env_remove("TENDERLY_API_URL")
        .output()
        .unwrap()
}

#[test]
fn test_exit_code_on_failure() {
    let dir = tempfile::tempdir().unwrap();

    let output = run_deployer(dir.path(), json!([{ "name": "Bad" }]));

    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(stderr.contains("Bad"), "{}", stderr);

    assert!(!dir.path().join("artifacts/Bad.address").exists());
}

#[test]
fn test_exit_code_on_success() {
    let dir = tempfile::tempdir().unwrap();

    let output = run_deployer(dir.path(), json!([]));

    assert_eq!(
        output.status.code(),
        Some(0),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );
}
