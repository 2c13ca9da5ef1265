use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use jmp::commands;
use jmp::db::PathFrecency;
use jmp::outcome::{EXTENDED_EXITCODES_ENV, Outcome};
use jmp::runtime::{RealRuntime, Runtime};

/// jmp - a fast frecency-based directory jumper
///
/// Run `jmp init <shell>` and eval the output from your shell's rc file to
/// get the `z` command. Directories you cd into are tracked automatically;
/// `z <query>` then jumps to the best match.
#[derive(Parser, Debug)]
#[command(name = "jmp", version = env!("JMP_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Data directory holding the database (also via JMP_HOME)
    #[arg(long = "data-dir", env = "JMP_HOME", value_name = "PATH", global = true)]
    data_dir: Option<PathBuf>,

    /// Print debug information to stderr (also via JMP_DEBUG)
    #[arg(long, env = "JMP_DEBUG", global = true)]
    debug: bool,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print initialization code for the given shell, to be eval'd
    Init {
        /// One of: bash, zsh, fish
        shell: String,
    },

    /// Print the directory best matching a query
    Jump(JumpArgs),

    /// Record a visit to a directory
    Visit {
        /// The directory that was visited
        dir: String,
    },

    /// Print the tracked directories ranked by frecency
    View,

    /// Edit the database in $JMP_EDITOR / $EDITOR
    Edit,

    /// Import from another autojump program
    Import {
        /// The program to import from; only 'fasd' is supported
        source: String,
    },

    /// Packaging descriptor tooling (maintainers)
    #[command(subcommand)]
    Pkg(PkgCommands),
}

#[derive(clap::Args, Debug)]
struct JumpArgs {
    /// The pattern to match against tracked directories
    query: Option<String>,

    /// Interactively choose between matches
    #[arg(short, long)]
    interactive: bool,

    /// Choose between matches with an external filter program (e.g. fzf)
    #[arg(long, value_name = "CMD", conflicts_with = "interactive")]
    pipe: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
enum PkgCommands {
    /// Validate a package descriptor file
    Check {
        /// The descriptor to validate
        file: PathBuf,

        /// A previous descriptor this one supersedes
        #[arg(long, value_name = "FILE")]
        against: Option<PathBuf>,
    },

    /// Run a descriptor's install command against a prefix
    Install {
        /// The descriptor to install from
        file: PathBuf,

        /// Destination prefix (defaults to /usr/local or ~/.local)
        #[arg(long, value_name = "PATH")]
        prefix: Option<PathBuf>,

        /// Directory holding the unpacked source tree
        #[arg(long, value_name = "PATH", default_value = ".")]
        source: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    let default_filter = if cli.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let runtime = RealRuntime;
    let outcome = match run(&runtime, cli) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("jmp: {:#}", e);
            Outcome::Error
        }
    };

    let extended = runtime.env_var(EXTENDED_EXITCODES_ENV).is_ok();
    if extended {
        std::process::exit(outcome.extended_exit_code());
    }
    std::process::exit(outcome.exit_code());
}

fn run<R: Runtime>(runtime: &R, cli: Cli) -> Result<Outcome> {
    // Commands that never touch the database.
    match &cli.command {
        Some(Commands::Init { shell }) => return commands::init(shell),
        Some(Commands::Pkg(PkgCommands::Check { file, against })) => {
            return commands::pkg_check(runtime, file, against.as_deref());
        }
        Some(Commands::Pkg(PkgCommands::Install {
            file,
            prefix,
            source,
        })) => {
            return commands::pkg_install(runtime, file, prefix.clone(), source);
        }
        _ => {}
    }

    let db_path = commands::database_path(runtime, cli.data_dir)?;
    let mut db = PathFrecency::load(runtime, &db_path)?;

    let outcome = match cli.command {
        Some(Commands::Jump(args)) => {
            let opts = commands::JumpOpts {
                query: args.query,
                interactive: args.interactive,
                pipe: args.pipe,
            };
            commands::jump(runtime, &mut db, &opts, std::io::stdout())?
        }
        Some(Commands::Visit { dir }) => commands::visit(&mut db, &dir)?,
        Some(Commands::Edit) => commands::edit(runtime, &mut db)?,
        Some(Commands::Import { source }) => commands::import(runtime, &mut db, &source)?,
        Some(Commands::View) | None => commands::view(&db, std::io::stdout())?,
        Some(Commands::Init { .. }) | Some(Commands::Pkg(_)) => unreachable!(),
    };

    db.save(runtime)?;
    Ok(outcome)
}
