//! Hardhat build info, the solc input/output a set of artifacts was compiled from.

use std::{
    collections::BTreeMap,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use serde::{de::IgnoredAny, Deserialize};

/// `<Name>.dbg.json`, stored next to each artifact.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DebugFile {
    /// Relative to the debug file directory.
    build_info: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfo {
    pub solc_version: String,
    pub input: CompilerInput,
    #[serde(default)]
    pub output: CompilerOutput,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompilerInput {
    #[serde(default)]
    pub language: String,
    pub sources: BTreeMap<String, SourceFile>,
    #[serde(default)]
    pub settings: CompilerSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceFile {
    pub content: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerSettings {
    #[serde(default)]
    pub optimizer: Optimizer,
    #[serde(default)]
    pub evm_version: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Optimizer {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub runs: Option<u64>,
}

/// Only contract names are kept, `source name => contract name => _`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompilerOutput {
    #[serde(default)]
    pub contracts: BTreeMap<String, BTreeMap<String, IgnoredAny>>,
}

impl BuildInfo {
    pub fn load_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();

        log::trace!(target: "HARDHAT", "load build info {}", path.to_string_lossy());

        Ok(serde_json::from_reader(BufReader::new(File::open(path)?))?)
    }

    /// Loads the build info of the artifact at `artifact_path` through its `.dbg.json` file.
    pub fn for_artifact<P: AsRef<Path>>(artifact_path: P) -> anyhow::Result<Self> {
        let debug_path = artifact_path.as_ref().with_extension("dbg.json");

        let debug: DebugFile = serde_json::from_reader(BufReader::new(File::open(&debug_path)?))?;

        let dir = debug_path.parent().unwrap_or_else(|| Path::new("."));

        Self::load_file(dir.join(debug.build_info))
    }

    /// Contract names declared in `source_name`.
    pub fn contract_names(&self, source_name: &str) -> Vec<&str> {
        self.output
            .contracts
            .get(source_name)
            .map(|contracts| contracts.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use std::fs::{create_dir_all, write};

    use serde_json::json;

    use super::*;

    #[test]
    fn test_for_artifact() {
        _ = pretty_env_logger::try_init();

        let dir = tempfile::tempdir().unwrap();

        let token_dir = dir.path().join("contracts/Token.sol");
        let build_info_dir = dir.path().join("build-info");

        create_dir_all(&token_dir).unwrap();
        create_dir_all(&build_info_dir).unwrap();

        write(
            token_dir.join("Token.dbg.json"),
            r#"{"_format": "hh-sol-dbg-1", "buildInfo": "../../build-info/f00d.json"}"#,
        )
        .unwrap();

        write(
            build_info_dir.join("f00d.json"),
            json!({
                "_format": "hh-sol-build-info-1",
                "solcVersion": "0.8.4",
                "solcLongVersion": "0.8.4+commit.c7e474f2",
                "input": {
                    "language": "Solidity",
                    "sources": {
                        "contracts/Token.sol": { "content": "contract Token {}" }
                    },
                    "settings": {
                        "optimizer": { "enabled": true, "runs": 200 },
                        "outputSelection": {}
                    }
                },
                "output": {
                    "contracts": {
                        "contracts/Token.sol": { "Token": { "abi": [] } }
                    },
                    "sources": {}
                }
            })
            .to_string(),
        )
        .unwrap();

        let build_info = BuildInfo::for_artifact(token_dir.join("Token.json")).unwrap();

        assert_eq!(build_info.solc_version, "0.8.4");
        assert!(build_info.input.settings.optimizer.enabled);
        assert_eq!(build_info.input.settings.optimizer.runs, Some(200));
        assert_eq!(build_info.input.settings.evm_version, None);
        assert_eq!(build_info.contract_names("contracts/Token.sol"), vec!["Token"]);
        assert!(build_info.contract_names("contracts/Math.sol").is_empty());

        BuildInfo::for_artifact(token_dir.join("Missing.json")).expect_err("No debug file");
    }
}
