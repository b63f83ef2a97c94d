//! On disk deployment records: `<dir>/<Name>.address` and `<dir>/<Name>.args`.

use std::{
    fs::{create_dir_all, read_to_string, remove_file, write},
    path::{Path, PathBuf},
};

use ethers_primitives::{hex, Address, FromEtherHex};
use serde_json::Value;

use crate::{error::StoreError, DeploymentResult};

/// Paths written by [`ArtifactStore::write`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRecord {
    pub address_path: PathBuf,
    /// `None` if the deployment has no constructor args.
    pub args_path: Option<PathBuf>,
}

/// Deployment records directory, last write wins.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn address_path(&self, contract_name: &str) -> PathBuf {
        self.dir.join(format!("{}.address", contract_name))
    }

    pub fn args_path(&self, contract_name: &str) -> PathBuf {
        self.dir.join(format!("{}.args", contract_name))
    }

    /// Write the address record and, if not empty, the hex encoded constructor args.
    ///
    /// The args record of a previous deployment is removed when the new one has no args.
    pub fn write(&self, result: &DeploymentResult) -> Result<ArtifactRecord, StoreError> {
        create_dir_all(&self.dir)?;

        let address_path = self.address_path(&result.contract_name);

        write(&address_path, result.address.to_string())?;

        let args_path = self.args_path(&result.contract_name);

        match &result.encoded_constructor_args {
            Some(args) if !args.is_empty() => {
                write(&args_path, hex::encode(args))?;

                log::debug!(target: "store", "write {:?}", args_path);

                Ok(ArtifactRecord {
                    address_path,
                    args_path: Some(args_path),
                })
            }
            _ => {
                if args_path.exists() {
                    log::debug!(target: "store", "remove stale {:?}", args_path);
                    remove_file(&args_path)?;
                }

                Ok(ArtifactRecord {
                    address_path,
                    args_path: None,
                })
            }
        }
    }

    pub fn read_address(&self, contract_name: &str) -> Result<Address, StoreError> {
        let content = read_to_string(self.address_path(contract_name))?;

        Ok(content.trim().parse()?)
    }

    /// Returns `None` if no args record exists.
    pub fn read_encoded_args(&self, contract_name: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let path = self.args_path(contract_name);

        if !path.exists() {
            return Ok(None);
        }

        let content = read_to_string(path)?;

        Ok(Some(Vec::<u8>::from_eth_hex(content.trim())?))
    }
}

/// Load json constructor args of `contract_name` from `<dir>/<contract_name>.args`.
///
/// Missing or malformed files yield an empty list, the latter is logged.
pub fn load_constructor_args<P: AsRef<Path>>(dir: P, contract_name: &str) -> Vec<Value> {
    let path = dir.as_ref().join(format!("{}.args", contract_name));

    if !path.exists() {
        return vec![];
    }

    let content = match read_to_string(&path) {
        Ok(content) => content,
        Err(err) => {
            log::error!(target: "store", "read {:?} failed, {}", path, err);
            return vec![];
        }
    };

    match serde_json::from_str(&content) {
        Ok(args) => args,
        Err(err) => {
            log::error!(target: "store", "parse {:?} failed, {}", path, err);
            vec![]
        }
    }
}
