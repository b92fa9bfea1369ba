//! `credvault completions`: print a shell completion script to stdout.
//!
//!   credvault completions bash > ~/.local/share/bash-completion/completions/credvault
//!   credvault completions zsh > ~/.zfunc/_credvault

use std::io::{self, Write};

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::errors::Result;

/// Execute the `completions` command.
pub fn execute(shell: Shell) -> Result<()> {
    let script = render(shell);
    io::stdout().write_all(&script)?;
    Ok(())
}

/// Build the completion script for `shell` from the clap definition.
fn render(shell: Shell) -> Vec<u8> {
    let mut cmd = Cli::command();
    let bin = cmd.get_name().to_string();
    let mut buf = Vec::new();
    generate(shell, &mut cmd, bin, &mut buf);
    buf
}
