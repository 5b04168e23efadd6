use anyhow::Result;
use clap::{Parser, Subcommand};
use minus::Pager;
use twig::areas::repository::Repository;
use twig::artifacts::core::{PagerWriter, paging_enabled};

#[derive(Parser)]
#[command(
    name = "twig",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A miniature version control system",
    long_about = "twig keeps snapshots of a directory as content-addressed commits, \
    with branches, a staging area and three-way merges. \
    It is a small single-user engine, not a replacement for a real VCS.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command creates a .twig directory in the current directory \
        with an initial commit and a master branch."
    )]
    Init,
    #[command(
        name = "add",
        about = "Stage a file for the next commit",
        long_about = "This command stages the current content of a file. \
        Content identical to the current commit unstages the file instead."
    )]
    Add {
        #[arg(index = 1, help = "The file to stage")]
        file: String,
    },
    #[command(
        name = "rm",
        about = "Unstage a file or stage its removal",
        long_about = "This command unstages a file staged for addition. \
        If the current commit tracks the file, it is staged for removal and deleted from the working tree."
    )]
    Rm {
        #[arg(index = 1, help = "The file to remove")]
        file: String,
    },
    #[command(
        name = "commit",
        about = "Create a new commit with the specified message",
        long_about = "This command records the staged changes in a new commit on the current branch."
    )]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(
        name = "log",
        about = "Show the history of the current branch",
        long_about = "This command shows every commit from HEAD back to the initial commit, \
        following first parents."
    )]
    Log,
    #[command(
        name = "global-log",
        about = "Show every commit ever made",
        long_about = "This command shows every commit in the object database, in digest order."
    )]
    GlobalLog,
    #[command(
        name = "find",
        about = "Print the ids of the commits with the given message",
        long_about = "This command prints the digest of every commit whose message matches exactly."
    )]
    Find {
        #[arg(index = 1, help = "The commit message to look for")]
        message: String,
    },
    #[command(
        name = "status",
        about = "Show the working tree status",
        long_about = "This command lists branches, staged and removed files, \
        unstaged modifications and untracked files."
    )]
    Status,
    #[command(
        name = "checkout",
        about = "Switch branches or restore a file",
        long_about = "`checkout <branch>` switches to a branch. \
        `checkout [<commit>] -- <file>` restores a file as recorded by a commit (HEAD by default)."
    )]
    Checkout {
        #[arg(help = "The branch to switch to, or the commit to restore from")]
        target: Option<String>,
        #[arg(last = true, help = "The file to restore")]
        file: Option<String>,
    },
    #[command(
        name = "branch",
        about = "Create a new branch at HEAD",
        long_about = "This command creates a branch pointing at the current commit without switching to it."
    )]
    Branch {
        #[arg(index = 1, help = "The name of the new branch")]
        name: String,
    },
    #[command(
        name = "rm-branch",
        about = "Delete a branch",
        long_about = "This command deletes a branch pointer. The commits it pointed to are kept."
    )]
    RmBranch {
        #[arg(index = 1, help = "The branch to delete")]
        name: String,
    },
    #[command(
        name = "reset",
        about = "Check out a commit and move the current branch to it",
        long_about = "This command replaces the working tree with the given commit, \
        clears the staging area and moves the current branch."
    )]
    Reset {
        #[arg(index = 1, help = "The commit to reset to")]
        commit: String,
    },
    #[command(
        name = "merge",
        about = "Merge a branch into the current branch",
        long_about = "This command performs a three-way merge of the given branch into the current one. \
        Conflicting files are committed with conflict markers."
    )]
    Merge {
        #[arg(index = 1, help = "The branch to merge")]
        branch: String,
    },
}

fn open_repository(writer: Box<dyn std::io::Write>) -> Result<Repository> {
    let pwd = std::env::current_dir()?;
    Repository::new(&pwd.to_string_lossy(), writer)
}

fn repository() -> Result<Repository> {
    open_repository(Box::new(std::io::stdout()))
}

/// Run `command` with its output going through the pager when enabled
fn with_pager(command: impl FnOnce(&Repository) -> Result<()>) -> Result<()> {
    if !paging_enabled() {
        return command(&repository()?);
    }

    let pager = Pager::new();
    let repository = open_repository(Box::new(PagerWriter::new(pager.clone())))?;
    command(&repository)?;
    minus::page_all(pager)?;

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Init => repository()?.init()?,
        Commands::Add { file } => repository()?.add(file)?,
        Commands::Rm { file } => repository()?.rm(file)?,
        Commands::Commit { message } => {
            repository()?.commit(message)?;
        }
        Commands::Log => with_pager(|repository| repository.log())?,
        Commands::GlobalLog => with_pager(|repository| repository.global_log())?,
        Commands::Find { message } => {
            repository()?.find(message)?;
        }
        Commands::Status => {
            repository()?.status()?;
        }
        Commands::Checkout { target, file } => match (target, file) {
            (target, Some(file)) => repository()?.checkout_file(target.as_deref(), file)?,
            (Some(branch), None) => repository()?.checkout_branch(branch)?,
            (None, None) => anyhow::bail!("Incorrect operands."),
        },
        Commands::Branch { name } => repository()?.branch(name)?,
        Commands::RmBranch { name } => repository()?.remove_branch(name)?,
        Commands::Reset { commit } => {
            repository()?.reset(commit)?;
        }
        Commands::Merge { branch } => {
            repository()?.merge(branch)?;
        }
    }

    Ok(())
}
