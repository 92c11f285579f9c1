//! Assembler and linker invocation.
//!
//! The generated assembly is written to a fixed intermediate file, assembled
//! into an ELF64 object with `nasm` and linked into an executable with `ld`.
//! Either tool can be swapped through the environment.

use std::{
    env,
    path::{Path, PathBuf},
    process::Command,
};

use anyhow::{bail, Context, Result};
use tracing::{debug, info};

pub const ASSEMBLER_VAR: &str = "ZEN_ASSEMBLER";
pub const LINKER_VAR: &str = "ZEN_LINKER";

/// Where the build writes its artifacts and which tools it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    pub asm_path: PathBuf,
    pub object_path: PathBuf,
    pub exe_path: PathBuf,
    pub assembler: String,
    pub linker: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            asm_path: PathBuf::from("out.asm"),
            object_path: PathBuf::from("out.o"),
            exe_path: PathBuf::from("out"),
            assembler: String::from("nasm"),
            linker: String::from("ld"),
        }
    }
}

impl BuildConfig {
    /// Default artifacts, with `ZEN_ASSEMBLER` / `ZEN_LINKER` overriding the
    /// tool names when set.
    pub fn from_env() -> Self {
        let mut config = BuildConfig::default();

        if let Ok(assembler) = env::var(ASSEMBLER_VAR) {
            config.assembler = assembler;
        }
        if let Ok(linker) = env::var(LINKER_VAR) {
            config.linker = linker;
        }

        config
    }

    /// Places every artifact inside `dir`, keeping the default file names.
    pub fn in_dir(mut self, dir: &Path) -> Self {
        self.asm_path = dir.join("out.asm");
        self.object_path = dir.join("out.o");
        self.exe_path = dir.join("out");
        self
    }

    /// Checks that both tools can be found on `PATH`.
    pub fn tools_available(&self) -> bool {
        which::which(&self.assembler).is_ok() && which::which(&self.linker).is_ok()
    }
}

/// Runs one external tool to completion, failing on a non-zero exit status.
fn run_tool(tool: &str, args: &[&str]) -> Result<()> {
    let path = which::which(tool).with_context(|| format!("`{}` was not found on PATH", tool))?;

    info!(tool, ?args, "running");
    let output = Command::new(&path)
        .args(args)
        .output()
        .with_context(|| format!("failed to start `{}`", path.display()))?;

    if !output.status.success() {
        bail!(
            "`{}` exited with {}:\n{}",
            tool,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim_end()
        );
    }

    debug!(tool, "finished");
    Ok(())
}

fn path_arg(path: &Path) -> Result<&str> {
    path.to_str()
        .with_context(|| format!("path `{}` is not valid UTF-8", path.display()))
}

/// Assembles `config.asm_path` and links the result into `config.exe_path`.
pub fn assemble_and_link(config: &BuildConfig) -> Result<()> {
    let asm = path_arg(&config.asm_path)?;
    let object = path_arg(&config.object_path)?;
    let exe = path_arg(&config.exe_path)?;

    run_tool(&config.assembler, &["-felf64", asm, "-o", object])?;
    run_tool(&config.linker, &["-o", exe, object])?;

    Ok(())
}

/// Writes `assembly` to `config.asm_path`, then assembles and links it.
pub fn build(assembly: &str, config: &BuildConfig) -> Result<()> {
    std::fs::write(&config.asm_path, assembly)
        .with_context(|| format!("failed to write `{}`", config.asm_path.display()))?;

    assemble_and_link(config)
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::BuildConfig;

    #[test]
    fn test_default_config() {
        let config = BuildConfig::default();

        assert_eq!(config.asm_path, PathBuf::from("out.asm"));
        assert_eq!(config.object_path, PathBuf::from("out.o"));
        assert_eq!(config.exe_path, PathBuf::from("out"));
        assert_eq!(config.assembler, "nasm");
        assert_eq!(config.linker, "ld");
    }

    #[test]
    fn test_config_in_dir() {
        let config = BuildConfig::default().in_dir(Path::new("/tmp/zen"));

        assert_eq!(config.asm_path, PathBuf::from("/tmp/zen/out.asm"));
        assert_eq!(config.object_path, PathBuf::from("/tmp/zen/out.o"));
        assert_eq!(config.exe_path, PathBuf::from("/tmp/zen/out"));
        assert_eq!(config.linker, "ld");
    }

    #[test]
    fn test_missing_tool_is_an_error() {
        let config = BuildConfig {
            assembler: String::from("zen-no-such-assembler"),
            ..BuildConfig::default().in_dir(&std::env::temp_dir())
        };

        assert!(!config.tools_available());
        let error = super::assemble_and_link(&config).unwrap_err();
        assert!(error.to_string().contains("zen-no-such-assembler"));
    }
}
