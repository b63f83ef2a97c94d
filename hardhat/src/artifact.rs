use std::{
    collections::{BTreeMap, BTreeSet},
    fs::File,
    io::{self, BufReader},
    path::Path,
};

use ethers_abi::Abi;
use ethers_primitives::{hex, strip_eth_hex_marker, Address, FromEtherHex};
use serde::{Deserialize, Serialize};

use crate::error::HardhatError;

/// Position of one library address placeholder in the bytecode, in bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkOffset {
    pub start: usize,
    pub length: usize,
}

/// `source name => library name => placeholder offsets`
pub type LinkReferences = BTreeMap<String, BTreeMap<String, Vec<LinkOffset>>>;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HardhatArtifact {
    pub contract_name: String,
    pub source_name: String,
    pub abi: Abi,
    pub bytecode: String,
    pub deployed_bytecode: String,
    #[serde(default)]
    pub link_references: LinkReferences,
    #[serde(default)]
    pub deployed_link_references: LinkReferences,
}

impl HardhatArtifact {
    /// Loads artifact from json.
    pub fn load<T: io::Read>(reader: T) -> anyhow::Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Loads artifact from json file.
    pub fn load_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();

        log::trace!(target: "HARDHAT", "load artifact {}", path.to_string_lossy());

        Self::load(BufReader::new(File::open(path)?))
    }

    /// Returns the fully qualified name, `contracts/Foo.sol:Foo`
    pub fn fully_qualified_name(&self) -> String {
        format!("{}:{}", self.source_name, self.contract_name)
    }

    /// Returns the creation bytecode with `libraries` addresses linked in.
    ///
    /// `libraries` keys are either library names or fully qualified names.
    /// Every library referenced by the bytecode must be provided, and every
    /// provided library must be referenced.
    pub fn link(&self, libraries: &BTreeMap<String, Address>) -> Result<Vec<u8>, HardhatError> {
        let code = strip_eth_hex_marker(&self.bytecode).unwrap_or(&self.bytecode);

        if code.is_empty() {
            return Err(HardhatError::NoBytecode(self.contract_name.clone()));
        }

        let mut code = code.as_bytes().to_vec();

        let mut used = BTreeSet::new();

        for (source, refs) in &self.link_references {
            for (library, offsets) in refs {
                let fully_qualified = format!("{}:{}", source, library);

                let (key, address) = libraries
                    .get_key_value(&fully_qualified)
                    .or_else(|| libraries.get_key_value(library))
                    .ok_or_else(|| HardhatError::MissingLibrary {
                        contract: self.contract_name.clone(),
                        library: fully_qualified.clone(),
                    })?;

                used.insert(key.clone());

                let address = hex::encode(address.0);

                for offset in offsets {
                    let start = offset.start * 2;
                    let end = start + offset.length * 2;

                    if end > code.len() || offset.length != 20 {
                        return Err(HardhatError::Bytecode(self.contract_name.clone()));
                    }

                    code[start..end].copy_from_slice(address.as_bytes());
                }
            }
        }

        if let Some(unknown) = libraries.keys().find(|name| !used.contains(*name)) {
            return Err(HardhatError::UnknownLibrary {
                contract: self.contract_name.clone(),
                library: unknown.clone(),
            });
        }

        let code =
            String::from_utf8(code).map_err(|_| HardhatError::Bytecode(self.contract_name.clone()))?;

        Vec::<u8>::from_eth_hex(code).map_err(|_| HardhatError::Bytecode(self.contract_name.clone()))
    }
}
