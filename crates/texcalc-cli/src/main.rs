use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};

use texcalc_expr::{MacroBody, MacroCommand, Session, SessionEntry};
use texcalc_symbolic::Rewrite;

#[derive(Parser)]
#[command(name = "texcalc")]
#[command(about = "texcalc session tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every session entry as a display-math calculation line
    Render {
        /// Path to the session .json file
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },
    /// Emit one LaTeX macro definition per session entry
    Macros {
        /// Path to the session .json file
        #[arg(value_name = "FILE")]
        path: PathBuf,
        #[arg(long, value_enum, default_value_t = CommandKind::Def)]
        command: CommandKind,
    },
    /// Print the numeric result of one entry
    Eval {
        /// Path to the session .json file
        #[arg(value_name = "FILE")]
        path: PathBuf,
        /// Entry name
        name: String,
    },
    /// Print an entry with its operation tree simplified
    Simplify {
        /// Path to the session .json file
        #[arg(value_name = "FILE")]
        path: PathBuf,
        /// Entry name
        name: String,
        /// Treat valued variables as their numeric values
        #[arg(long)]
        substitute: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum CommandKind {
    Def,
    Newcommand,
    Renewcommand,
}

impl From<CommandKind> for MacroCommand {
    fn from(kind: CommandKind) -> Self {
        match kind {
            CommandKind::Def => MacroCommand::Def,
            CommandKind::Newcommand => MacroCommand::NewCommand,
            CommandKind::Renewcommand => MacroCommand::RenewCommand,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Render { path } => {
            let session = load(path)?;
            for entry in session.iter() {
                println!("$$ {entry} $$");
            }
        }
        Commands::Macros { path, command } => {
            let session = load(path)?;
            for entry in session.iter() {
                let name = macro_name(entry.name());
                let line = match entry {
                    SessionEntry::Variable(v) => {
                        v.latex_macro(&name, MacroBody::Result, (*command).into())
                    }
                    SessionEntry::Expression(e) => {
                        e.latex_macro(&name, MacroBody::Result, (*command).into())
                    }
                }
                .with_context(|| format!("cannot export `{}`", entry.name()))?;
                println!("{line}");
            }
        }
        Commands::Eval { path, name } => {
            let session = load(path)?;
            let entry = find(&session, name)?;
            let value = entry
                .eval()
                .with_context(|| format!("cannot evaluate `{name}`"))?;
            println!("{value}");
        }
        Commands::Simplify {
            path,
            name,
            substitute,
        } => {
            let session = load(path)?;
            match find(&session, name)? {
                SessionEntry::Expression(e) => {
                    let simplified = e
                        .simplify(*substitute)
                        .with_context(|| format!("cannot simplify `{name}`"))?;
                    println!("$$ {simplified} $$");
                }
                SessionEntry::Variable(v) => println!("$$ {v} $$"),
            }
        }
    }
    Ok(())
}

fn load(path: &PathBuf) -> anyhow::Result<Session> {
    Session::load(path).with_context(|| format!("cannot load session {}", path.display()))
}

fn find<'s>(session: &'s Session, name: &str) -> anyhow::Result<&'s SessionEntry> {
    match session.get(name) {
        Some(entry) => Ok(entry),
        None => bail!("no entry named `{name}` in session"),
    }
}

/// LaTeX macro names are letters only; anything else in an entry name is
/// dropped.
fn macro_name(entry_name: &str) -> String {
    entry_name.chars().filter(|c| c.is_ascii_alphabetic()).collect()
}
