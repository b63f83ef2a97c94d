use std::{
    collections::BTreeMap,
    fs::{create_dir_all, write},
    path::Path,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use ethers_deployer::{
    cli::check_chain_id,
    config::Network,
    primitives::{Address, H256, U256},
    providers::connect_to,
    registry::{ContractRegistry, HardhatRegistry},
    Overrides, RegistryError,
};
use serde_json::{json, Value};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
};

const DEPLOYER: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
const CONTRACT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
const TX_HASH: &str = "0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470";

/// Json-rpc method handler, `Err` is returned as a json-rpc error object.
type Handler = Arc<dyn Fn(&Value) -> Result<Value, String> + Send + Sync>;

/// Starts an http json-rpc node on a random local port, returns its url.
async fn start_mock_node(handler: Handler) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();

    let url = format!("http://{}", listener.local_addr().unwrap());

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(handle_client(stream, handler.clone()));
        }
    });

    url
}

async fn read_request(stream: &mut TcpStream) -> Option<Value> {
    let mut buf = vec![];
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }

        let read = stream.read(&mut chunk).await.ok()?;

        if read == 0 {
            return None;
        }

        buf.extend_from_slice(&chunk[..read]);
    };

    let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();

    let content_length: usize = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let read = stream.read(&mut chunk).await.ok()?;

        if read == 0 {
            return None;
        }

        buf.extend_from_slice(&chunk[..read]);
    }

    serde_json::from_slice(&buf[header_end..header_end + content_length]).ok()
}

async fn handle_client(mut stream: TcpStream, handler: Handler) {
    while let Some(request) = read_request(&mut stream).await {
        let mut response = json!({ "jsonrpc": "2.0", "id": request["id"] });

        match handler(&request) {
            Ok(result) => response["result"] = result,
            Err(message) => response["error"] = json!({ "code": -32000, "message": message }),
        }

        let body = response.to_string();

        let http = format!(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\n\r\n{}",
            body.len(),
            body
        );

        if stream.write_all(http.as_bytes()).await.is_err() {
            break;
        }
    }
}

fn receipt(status: &str, contract_address: Value) -> Value {
    json!({
        "transactionHash": TX_HASH,
        "blockNumber": "0x1",
        "contractAddress": contract_address,
        "gasUsed": "0x5208",
        "effectiveGasPrice": "0x3b9aca00",
        "status": status,
        "logs": []
    })
}

fn transaction() -> Value {
    json!({
        "hash": TX_HASH,
        "from": DEPLOYER,
        "to": null,
        "value": "0x0",
        "gas": "0x16e360",
        "gasPrice": "0x77359400",
        "blockNumber": "0x1"
    })
}

/// Hardhat like node: one unlocked account, the receipt shows up at the second poll.
fn hardhat_node(
    receipt: Value,
    transaction: Result<Value, String>,
    sent: Arc<Mutex<Vec<Value>>>,
) -> Handler {
    let polls = Arc::new(AtomicUsize::new(0));

    Arc::new(move |request: &Value| match request["method"].as_str().unwrap_or_default() {
        "eth_chainId" => Ok(json!("0x7a69")),
        "eth_accounts" => Ok(json!([DEPLOYER])),
        "eth_sendTransaction" => {
            sent.lock().unwrap().push(request["params"][0].clone());

            Ok(json!(TX_HASH))
        }
        "eth_getTransactionReceipt" => {
            if polls.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(Value::Null)
            } else {
                Ok(receipt.clone())
            }
        }
        "eth_getTransactionByHash" => transaction.clone(),
        method => Err(format!("Method {} not found", method)),
    })
}

fn write_artifact(root: &Path) {
    let dir = root.join("contracts/Token.sol");

    create_dir_all(&dir).unwrap();

    write(
        dir.join("Token.json"),
        json!({
            "_format": "hh-sol-artifact-1",
            "contractName": "Token",
            "sourceName": "contracts/Token.sol",
            "abi": [{
                "type": "constructor",
                "stateMutability": "nonpayable",
                "inputs": [{ "name": "supply", "type": "uint256" }]
            }],
            "bytecode": "0x6080",
            "deployedBytecode": "0x6001",
            "linkReferences": {},
            "deployedLinkReferences": {}
        })
        .to_string(),
    )
    .unwrap();
}

async fn deploy_token(handler: Handler) -> anyhow::Result<ethers_deployer::DeployedContract> {
    let dir = tempfile::tempdir().unwrap();

    write_artifact(dir.path());

    let url = start_mock_node(handler).await;

    let registry = HardhatRegistry::new(connect_to(url), dir.path())
        .with_poll_interval(Duration::from_millis(10));

    let factory = registry.resolve("Token", &BTreeMap::new()).await?;

    factory.deploy(&[json!(1)], &Overrides::default()).await
}

#[tokio::test]
async fn test_deploy() {
    _ = pretty_env_logger::try_init();

    let sent = Arc::new(Mutex::new(vec![]));

    let deployed = deploy_token(hardhat_node(
        receipt("0x1", json!(CONTRACT)),
        Ok(transaction()),
        sent.clone(),
    ))
    .await
    .unwrap();

    assert_eq!(deployed.name, "Token");
    assert_eq!(deployed.address, CONTRACT.parse::<Address>().unwrap());

    let tx = deployed.deploy_transaction.expect("Deploy transaction");

    assert_eq!(tx.hash, TX_HASH.parse::<H256>().unwrap());
    assert_eq!(tx.gas_limit, Some(U256::from(1_500_000u64)));
    assert_eq!(tx.gas_price, Some(U256::from(2_000_000_000u64)));

    let sent = sent.lock().unwrap();

    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0]["from"], DEPLOYER);
    assert_eq!(sent[0]["data"], format!("0x6080{:064x}", 1));
    assert!(sent[0].get("to").is_none());
}

#[tokio::test]
async fn test_deploy_reverted() {
    _ = pretty_env_logger::try_init();

    let err = deploy_token(hardhat_node(
        receipt("0x0", json!(CONTRACT)),
        Ok(transaction()),
        Default::default(),
    ))
    .await
    .err()
    .expect("Reverted deploy tx");

    assert!(matches!(
        err.downcast_ref::<RegistryError>(),
        Some(RegistryError::TxFailure(hash)) if *hash == TX_HASH.parse::<H256>().unwrap()
    ));
}

#[tokio::test]
async fn test_deploy_without_contract_address() {
    _ = pretty_env_logger::try_init();

    let err = deploy_token(hardhat_node(
        receipt("0x1", Value::Null),
        Ok(transaction()),
        Default::default(),
    ))
    .await
    .err()
    .expect("Receipt without contract address");

    assert!(matches!(
        err.downcast_ref::<RegistryError>(),
        Some(RegistryError::DeployContract(_))
    ));
}

#[tokio::test]
async fn test_deploy_without_gas_info() {
    _ = pretty_env_logger::try_init();

    for transaction in [Ok(Value::Null), Err("Internal error".to_owned())] {
        let deployed = deploy_token(hardhat_node(
            receipt("0x1", json!(CONTRACT)),
            transaction,
            Default::default(),
        ))
        .await
        .unwrap();

        assert_eq!(deployed.address, CONTRACT.parse::<Address>().unwrap());

        let tx = deployed.deploy_transaction.expect("Deploy transaction");

        assert_eq!(tx.hash, TX_HASH.parse::<H256>().unwrap());
        assert_eq!(tx.gas_limit, None);
        assert_eq!(tx.gas_price, None);
    }
}

#[tokio::test]
async fn test_check_chain_id() {
    _ = pretty_env_logger::try_init();

    let url = start_mock_node(hardhat_node(
        receipt("0x1", json!(CONTRACT)),
        Ok(transaction()),
        Default::default(),
    ))
    .await;

    let provider = connect_to(url);

    assert_eq!(provider.eth_chain_id().await.unwrap(), U256::from(31337u64));

    assert!(check_chain_id(&provider, &Network::Localhost).await);
    assert!(!check_chain_id(&provider, &Network::Kovan).await);
    assert!(check_chain_id(&provider, &"devnet".into()).await);

    // unreachable node is not fatal
    assert!(check_chain_id(&connect_to("http://127.0.0.1:9"), &Network::Kovan).await);
}
