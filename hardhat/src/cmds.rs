use std::{io::ErrorKind, marker::PhantomData, path::PathBuf};

use async_process::{Child, Command, ExitStatus, Stdio};
use futures::{io::BufReader, AsyncBufReadExt, TryStreamExt};

use crate::{error::HardhatError, utils::hardhat_command};

#[async_trait::async_trait]
pub trait HardhatCommandContext {
    /// Name used in logs and errors, e.g `npx hardhat compile`
    fn name() -> &'static str;

    /// Execute hardhat command in current_path `hardhat_root`
    ///
    #[allow(unused)]
    fn init_command(hardhat_root: PathBuf, c: &mut Command) -> anyhow::Result<()> {
        Ok(())
    }

    #[allow(unused)]
    async fn start_command(c: &mut Child) -> anyhow::Result<()> {
        Ok(())
    }
}

#[derive(Debug)]
pub struct HardhatCommand<C: HardhatCommandContext> {
    hardhat_root: PathBuf,
    command: Command,
    /// Started hardhat child process
    child_process: Option<Child>,

    _marked: PhantomData<C>,
}

impl<C> HardhatCommand<C>
where
    C: HardhatCommandContext,
{
    /// Create new hardhat command with hardhat project root path.
    pub fn new_with<P>(hardhat_root: P) -> anyhow::Result<Self>
    where
        P: Into<PathBuf>,
    {
        let hardhat_root: PathBuf = hardhat_root.into();

        if !hardhat_root.is_dir() {
            return Err(
                HardhatError::HardhatDirectory(hardhat_root.to_string_lossy().into_owned()).into(),
            );
        }

        log::debug!("{} in directory: {:?}", C::name(), hardhat_root);

        let mut command = hardhat_command(hardhat_root.clone());

        C::init_command(hardhat_root.clone(), &mut command)?;

        Ok(Self {
            hardhat_root,
            child_process: None,
            command,
            _marked: Default::default(),
        })
    }

    pub fn hardhat_root(&self) -> &PathBuf {
        &self.hardhat_root
    }

    /// Returns if child process started.
    pub fn is_started(&self) -> bool {
        self.child_process.is_some()
    }

    /// Start hardhat child process.
    ///
    /// If already started, returns false.
    pub async fn start(&mut self) -> anyhow::Result<bool> {
        if self.is_started() {
            return Ok(false);
        }

        let mut child = match self.command.spawn() {
            Ok(child) => child,
            Err(err) => {
                if err.kind() == ErrorKind::NotFound {
                    return Err(HardhatError::NodejsRequired.into());
                } else {
                    return Err(err.into());
                }
            }
        };

        C::start_command(&mut child).await?;

        self.child_process = Some(child);

        Ok(true)
    }

    /// Wait until child process stopped and returns status code.
    pub async fn status(&mut self) -> anyhow::Result<ExitStatus> {
        if let Some(mut child_process) = self.child_process.take() {
            Ok(child_process.status().await?)
        } else {
            Err(HardhatError::NotStarted(C::name().to_owned()).into())
        }
    }

    /// Start the command, wait for it to exit and check the exit status.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        self.start().await?;

        let status = self.status().await?;

        if !status.success() {
            return Err(HardhatError::ChildProcess(C::name().to_owned(), status).into());
        }

        Ok(())
    }
}

impl<C> Drop for HardhatCommand<C>
where
    C: HardhatCommandContext,
{
    fn drop(&mut self) {
        if let Some(mut child_process) = self.child_process.take() {
            let kill_result = child_process.kill();

            log::debug!("drop {}, kill result {:?}", C::name(), kill_result);
        }
    }
}

/// `npx hardhat compile`, compiler output is forwarded to the log.
#[derive(Debug)]
pub struct CompileContext;

#[async_trait::async_trait]
impl HardhatCommandContext for CompileContext {
    fn name() -> &'static str {
        "npx hardhat compile"
    }

    fn init_command(hardhat_root: PathBuf, c: &mut Command) -> anyhow::Result<()> {
        log::debug!(
            "try build hardhat project {}",
            hardhat_root.to_string_lossy()
        );

        c.arg("compile").stdout(Stdio::piped());

        Ok(())
    }

    async fn start_command(child_process: &mut Child) -> anyhow::Result<()> {
        if let Some(stdout) = child_process.stdout.take() {
            let mut lines = BufReader::new(stdout).lines();

            while let Some(line) = lines.try_next().await? {
                log::info!(target:"hardhat compile", "{}", line);
            }
        }

        Ok(())
    }
}

/// Command for compiling hardhat project.
pub type HardhatCompile = HardhatCommand<CompileContext>;

/// Compile the hardhat project at `hardhat_root`.
pub async fn compile<P: Into<PathBuf>>(hardhat_root: P) -> anyhow::Result<()> {
    HardhatCompile::new_with(hardhat_root)?.run().await
}
