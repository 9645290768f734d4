//! Completions command implementation
//!
//! Handles the `asar-trim completions` command which generates
//! shell completion scripts for bash, zsh, fish, etc.

use clap::Command;
use clap_complete::{generate, Shell};
use std::io::Write;

/// Generate shell completion scripts for `cmd` into `out`
///
/// The binary passes its own clap definition so completions never drift
/// from the real flags.
///
/// # Examples
///
/// ```bash
/// # Bash
/// asar-trim completions bash > /etc/bash_completion.d/asar-trim
///
/// # Zsh
/// asar-trim completions zsh > ~/.zfunc/_asar-trim
///
/// # Fish
/// asar-trim completions fish > ~/.config/fish/completions/asar-trim.fish
/// ```
pub fn cmd_completions(shell: Shell, cmd: &mut Command, out: &mut dyn Write) {
    let bin_name = cmd.get_name().to_string();
    generate(shell, cmd, bin_name, out);
}
