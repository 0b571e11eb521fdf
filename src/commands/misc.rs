use clap::CommandFactory;
use clap_complete::{generate, Shell};
use std::io;

pub fn generate_completions(shell: Shell) {
    let mut cmd = crate::Cli::command();
    generate(shell, &mut cmd, "gitexplore", &mut io::stdout());

    eprintln!();
    eprintln!("Save the output to the appropriate location for your shell:");
    match shell {
        Shell::Bash => {
            eprintln!("  gitexplore completions bash > ~/.local/share/bash-completion/completions/gitexplore");
        }
        Shell::Zsh => {
            eprintln!("  gitexplore completions zsh > ~/.zsh/completions/_gitexplore");
            eprintln!("  # (Add 'fpath=(~/.zsh/completions $fpath)' before 'compinit' in .zshrc)");
        }
        Shell::Fish => {
            eprintln!("  gitexplore completions fish > ~/.config/fish/completions/gitexplore.fish");
        }
        _ => {}
    }
}
