use crate::errors::{MultimodError, Result};
use std::path::Path;
use std::process::Command;

/// Creates a `Command` that can resolve `.cmd` and `.bat` scripts on Windows.
///
/// `make` and `go` are commonly installed as batch shims on Windows, which
/// `std::process::Command` does not resolve on its own (see rust-lang/rust#37519),
/// so the invocation is routed through `cmd.exe /C` there.
pub fn command(program: &str) -> Command {
    if cfg!(windows) {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", program]);
        cmd
    } else {
        Command::new(program)
    }
}

/// Run `program` with `args` inside `cwd`, inheriting stdout so tool output stays visible.
pub fn run_in(program: &str, args: &[&str], cwd: &Path) -> Result<()> {
    let rendered = std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ");
    tracing::info!("running `{rendered}` in {}", cwd.display());

    let output = command(program)
        .args(args)
        .current_dir(cwd)
        .stdout(std::process::Stdio::inherit())
        .output()
        .map_err(|e| MultimodError::Command {
            command: rendered.clone(),
            message: e.to_string(),
        })?;

    if output.status.success() {
        Ok(())
    } else {
        Err(MultimodError::Command {
            command: rendered,
            message: format!(
                "exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        })
    }
}
