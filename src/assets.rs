//! Uploaded ipfs assets, referenced by contracts as `bytes32` ids.

use std::{fs::read_to_string, path::Path};

use ethers_primitives::{keccak256, H256};
use serde_json::{Map, Value};

/// Constructor arg placeholder replaced by the array of asset ids.
pub const ASSETS_ARG: &str = "$assets";

pub type AssetId = H256;

/// `keccak256` of the asset ipfs hash, same as ethers `utils.id`.
pub fn asset_id(ipfs_hash: &str) -> AssetId {
    keccak256(ipfs_hash.as_bytes()).into()
}

/// Load asset ids from the `uploaded.json` manifest, an object keyed by ipfs hash.
///
/// Returns an empty list if the manifest does not exist.
pub fn load_asset_ids<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<AssetId>> {
    let path = path.as_ref();

    if !path.exists() {
        log::debug!(target: "assets", "{:?} not found, no assets", path);
        return Ok(vec![]);
    }

    let uploaded: Map<String, Value> = serde_json::from_str(&read_to_string(path)?)?;

    Ok(uploaded
        .keys()
        .map(|ipfs_hash| {
            let id = asset_id(ipfs_hash);

            log::info!(target: "assets", "IPFS: {}", ipfs_hash);
            log::info!(target: "assets", "hashed: {}", id);

            id
        })
        .collect())
}

/// Replace every [`ASSETS_ARG`] placeholder in `args` with the json array of `ids`.
pub fn expand_assets(args: Vec<Value>, ids: &[AssetId]) -> Vec<Value> {
    args.into_iter()
        .map(|arg| match arg {
            Value::String(s) if s == ASSETS_ARG => {
                Value::Array(ids.iter().map(|id| Value::String(id.to_string())).collect())
            }
            arg => arg,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use serde_json::json;

    use super::*;

    #[test]
    fn test_asset_id() {
        assert_eq!(
            asset_id("hello").to_string(),
            "0x1c8aff950685c2ed4bc3174f3472287b56d9517b9c948127319a09a7a36deac8"
        );
    }

    #[test]
    fn test_load_asset_ids() {
        _ = pretty_env_logger::try_init();

        let dir = tempfile::tempdir().unwrap();

        let path = dir.path().join("uploaded.json");

        assert!(load_asset_ids(&path).unwrap().is_empty());

        write(
            &path,
            r#"{"hello": {"name": "Particle"}, "world": {"name": "Plant"}}"#,
        )
        .unwrap();

        assert_eq!(
            load_asset_ids(&path).unwrap(),
            vec![asset_id("hello"), asset_id("world")]
        );

        write(&path, "[").unwrap();

        load_asset_ids(&path).expect_err("Malformed manifest");
    }

    #[test]
    fn test_expand_assets() {
        let ids = vec![asset_id("hello")];

        assert_eq!(
            expand_assets(vec![json!("$assets"), json!(5)], &ids),
            vec![
                json!(["0x1c8aff950685c2ed4bc3174f3472287b56d9517b9c948127319a09a7a36deac8"]),
                json!(5)
            ]
        );

        assert_eq!(expand_assets(vec![json!("assets")], &ids), vec![json!("assets")]);
    }
}
