use async_process::ExitStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HardhatError {
    #[error("Hardhat project path is not exists or is not directory, {0}")]
    HardhatDirectory(String),

    #[error("Child process '{0}' {1}")]
    ChildProcess(String, ExitStatus),

    #[error("Hardhat command '{0}' not started")]
    NotStarted(String),

    #[error("Nodejs env not found")]
    NodejsRequired,

    #[error("Hardhat artifact for contract {0} not found")]
    ArtifactNotFound(String),

    #[error("Multiple hardhat artifacts found for contract {0}, use the fully qualified name")]
    AmbiguousArtifact(String),

    #[error("Contract {0} has no bytecode, abstract contract or interface can't be deployed")]
    NoBytecode(String),

    #[error("Contract {contract} requires library {library}, but no address was provided")]
    MissingLibrary { contract: String, library: String },

    #[error("Contract {contract} doesn't need library {library}")]
    UnknownLibrary { contract: String, library: String },

    #[error("Invalid bytecode of contract {0}")]
    Bytecode(String),

    #[error("Source {0} not found in build info")]
    MissingSource(String),
}
