//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// giclone - a small local version-control engine
#[derive(Parser, Debug)]
#[command(name = "giclone")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if giclone was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    ///
    /// Unlike `Parser::parse`, this leaves exiting to the caller so usage
    /// errors share the binary's exit-code table.
    pub fn try_parse_args() -> Result<Self, clap::Error> {
        <Self as Parser>::try_parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an empty repository
    #[command(
        long_about = "Create an empty repository.\n\n\
            Creates the .giclone state directory with an object store, an unborn \
            default branch and a default ignore file. Running init in an existing \
            repository changes nothing.",
        after_help = "\
EXAMPLES:
    # Initialize the current directory
    giclone init

    # Initialize a new directory with a different default branch
    giclone init project --default-branch trunk"
    )]
    Init {
        /// Directory to initialize (defaults to the current directory)
        path: Option<PathBuf>,

        /// Name of the branch the first commit creates
        #[arg(long, value_name = "NAME")]
        default_branch: Option<String>,
    },

    /// Stage files for the next commit
    #[command(
        long_about = "Stage files for the next commit.\n\n\
            Each file's content is stored and its path recorded in the staging index. \
            Directories are added recursively. Paths matching the ignore file are \
            skipped and reported.",
        after_help = "\
EXAMPLES:
    giclone add README.md src/main.rs
    giclone add ."
    )]
    Add {
        /// Files or directories to stage
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Record staged changes as a new commit
    Commit {
        /// Commit message
        #[arg(short, long)]
        message: String,
    },

    /// Create a branch at the current commit, or list branches
    #[command(after_help = "\
EXAMPLES:
    # List branches; the current one is marked with *
    giclone branch

    # Create a branch at HEAD
    giclone branch feature")]
    Branch {
        /// Name of the branch to create
        name: Option<String>,
    },

    /// Switch to a branch or commit and restore its files
    #[command(
        long_about = "Switch to a branch or commit and restore its files.\n\n\
            A branch name attaches HEAD to that branch. A full commit digest detaches \
            HEAD at that commit. Every file in the target snapshot is written into the \
            working tree; files the snapshot does not track are left alone."
    )]
    Checkout {
        /// Branch name or full commit digest
        target: String,
    },

    /// Show commit history from HEAD
    Log,

    /// Compare the files two revisions track
    #[command(after_help = "\
EXAMPLES:
    giclone diff main feature
    giclone diff HEAD main")]
    Diff {
        /// First revision (branch, commit digest or HEAD)
        a: String,
        /// Second revision (branch, commit digest or HEAD)
        b: String,
    },

    /// Merge a branch into the current HEAD
    #[command(
        long_about = "Merge a branch into the current HEAD.\n\n\
            Files the branch adds are merged in. A file both sides track with \
            different contents is a conflict; on any conflict nothing is changed and \
            every conflicting path is listed. The working tree is not modified."
    )]
    Merge {
        /// Branch to merge
        branch: String,
    },

    /// Copy this repository to a new directory
    Clone {
        /// Destination directory (must not exist)
        dest: PathBuf,
    },

    /// Show HEAD and staged files
    Status,

    /// Generate shell completion scripts
    #[command(after_help = "\
EXAMPLES:
    giclone completion bash > /etc/bash_completion.d/giclone
    giclone completion zsh > ~/.zfunc/_giclone")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
