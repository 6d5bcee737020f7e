//! `simtree completions`: shell completion scripts and where to put them.

use std::io;

use clap::Command;
use clap_complete::Shell;
use colored::Colorize;
use serde::Serialize;

use crate::output::{Output, OutputFormat, TableDisplay};

const BIN_NAME: &str = "simtree";

/// Where a generated script goes and how the shell picks it up.
#[derive(Debug, Serialize)]
pub struct CompletionSetup {
    pub shell: String,
    /// Command that writes the script to disk, if the shell loads it from a file.
    pub install: Option<String>,
    /// Line to add to the shell's startup file.
    pub activate: Option<String>,
}

impl CompletionSetup {
    fn for_shell(shell: Shell) -> Self {
        let script = format!("{BIN_NAME} completions {shell}");
        let (install, activate) = match shell {
            Shell::Bash => (None, Some(format!("source <({script})  # ~/.bashrc"))),
            Shell::Zsh => (
                Some(format!("{script} > \"${{fpath[1]}}/_{BIN_NAME}\"")),
                None,
            ),
            Shell::Fish => (
                Some(format!(
                    "{script} > ~/.config/fish/completions/{BIN_NAME}.fish"
                )),
                None,
            ),
            Shell::PowerShell => (
                None,
                Some(format!("{script} | Out-String | Invoke-Expression  # $PROFILE")),
            ),
            _ => (None, Some(format!("eval ({script} | slurp)  # rc.elv"))),
        };
        Self {
            shell: shell.to_string(),
            install,
            activate,
        }
    }
}

impl TableDisplay for CompletionSetup {
    fn to_table(&self) -> String {
        let mut output = format!("{} ({})\n", "Completion setup".bold(), self.shell.yellow());
        if let Some(install) = &self.install {
            output.push_str(&format!("  install:  {}\n", install));
        }
        if let Some(activate) = &self.activate {
            output.push_str(&format!("  activate: {}\n", activate));
        }
        output
    }
}

pub fn run(
    shell: Shell,
    show_setup: bool,
    cmd: &mut Command,
    format: OutputFormat,
) -> anyhow::Result<()> {
    if show_setup {
        return Output::new(CompletionSetup::for_shell(shell), format).render();
    }
    clap_complete::generate(shell, cmd, BIN_NAME, &mut io::stdout());
    Ok(())
}
