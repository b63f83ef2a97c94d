use std::path::{Path, PathBuf};

use async_process::Command;

use crate::error::HardhatError;

/// Returns hardhat base command instance
pub fn hardhat_command<P>(hardhat_root: P) -> Command
where
    P: Into<PathBuf>,
{
    let mut command = Command::new("npx");

    command.arg("hardhat");

    command.current_dir(hardhat_root.into());

    command
}

/// Checks if it is a solidity source name, editor swap files are excluded.
pub fn is_solidity(file_name: &str) -> bool {
    file_name.contains(".sol") && !file_name.contains(".swp") && !file_name.contains(".swap")
}

/// Find the artifact json of `contract_name` under hardhat `artifacts_dir`.
///
/// `contract_name` is either a bare contract name or a fully qualified name
/// `contracts/Foo.sol:Foo`. Debug files (`*.dbg.json`) are ignored.
pub fn find_artifact<P: AsRef<Path>>(
    artifacts_dir: P,
    contract_name: &str,
) -> Result<PathBuf, HardhatError> {
    let artifacts_dir = artifacts_dir.as_ref();

    if let Some((source_name, name)) = contract_name.rsplit_once(':') {
        let path = artifacts_dir
            .join(source_name)
            .join(format!("{}.json", name));

        return if path.is_file() {
            Ok(path)
        } else {
            Err(HardhatError::ArtifactNotFound(contract_name.to_owned()))
        };
    }

    let file_name = format!("{}.json", contract_name);

    let mut found = vec![];

    fn search(dir: &Path, file_name: &str, found: &mut Vec<PathBuf>) {
        log::trace!(target:"HARDHAT","Search artifact {} in {}", file_name, dir.to_string_lossy());

        let entries = match dir.read_dir() {
            Ok(entries) => entries,
            Err(err) => {
                log::debug!(target:"HARDHAT","Skip {}, {}", dir.to_string_lossy(), err);
                return;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();

            if path.is_dir() {
                search(&path, file_name, found);
                continue;
            }

            let in_source_dir = dir
                .file_name()
                .map(|name| is_solidity(&name.to_string_lossy()))
                .unwrap_or(false);

            if in_source_dir && entry.file_name() == file_name {
                found.push(path);
            }
        }
    }

    search(artifacts_dir, &file_name, &mut found);

    match found.len() {
        0 => Err(HardhatError::ArtifactNotFound(contract_name.to_owned())),
        1 => Ok(found.remove(0)),
        _ => Err(HardhatError::AmbiguousArtifact(contract_name.to_owned())),
    }
}
