//! crepl: compile and run C/C++ one line at a time.

use std::io;
use std::path::{Path, PathBuf};

use clap::{Parser as ClapParser, Subcommand};
use crepl_cli::colors::{self, bold, red, status_label};
use crepl_cli::config::{CreplConfig, Overrides, CONFIG_FILE};
use crepl_cli::error_chain::format_error_chain;
use crepl_cli::logging;
use crepl_cli::repl;
use crepl_cli::toolchain::Offline;

#[derive(ClapParser)]
#[command(name = "crepl", version, about = "An incremental C/C++ REPL")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Use this config file instead of searching for crepl.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Compiler command line, e.g. "clang++ -std=c++20"
    #[arg(long, global = true)]
    compiler: Option<String>,

    /// Directory the compiler and the program run in
    #[arg(long, global = true)]
    work_dir: Option<PathBuf>,

    /// Name of the generated source file
    #[arg(long, global = true)]
    source_file: Option<PathBuf>,

    /// Program the compiler produces
    #[arg(long, global = true)]
    binary: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive session (the default)
    Repl,
    /// Feed a file of REPL input lines through a session
    Run {
        /// File of lines, as they would be typed at the prompt
        #[arg()]
        script: PathBuf,
    },
    /// Print the program a script of REPL input builds, without compiling
    Emit {
        #[arg()]
        script: PathBuf,

        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Create a crepl.toml config file in the current directory
    Init,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    colors::set_enabled(colors::detect());

    let overrides = Overrides {
        compiler: cli.compiler,
        work_dir: cli.work_dir,
        source_file: cli.source_file,
        binary: cli.binary,
    };
    let config = || load_config(cli.config.as_deref(), &overrides);

    match cli.command.unwrap_or(Commands::Repl) {
        Commands::Repl => cmd_repl(&config()),
        Commands::Run { script } => cmd_run(&script, &config()),
        Commands::Emit { script, output } => cmd_emit(&script, output, &config()),
        Commands::Init => cmd_init(),
    }
}

fn load_config(explicit: Option<&Path>, overrides: &Overrides) -> CreplConfig {
    let loaded = match explicit {
        Some(path) => CreplConfig::load_from(path),
        None => CreplConfig::load(),
    };
    let mut config = loaded.unwrap_or_else(|e| fail(&e));
    if let Err(e) = config.apply(overrides) {
        fail(&e);
    }
    config
}

fn fail(err: &dyn std::error::Error) -> ! {
    eprintln!("{}", red(&format_error_chain(err)));
    std::process::exit(1);
}

fn read_script(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!(
            "{} cannot read file '{}': {}",
            red("error:"),
            bold(&path.display().to_string()),
            e
        );
        std::process::exit(1);
    })
}

fn cmd_repl(config: &CreplConfig) {
    if let Err(e) = repl::run_repl(config) {
        fail(&e);
    }
    println!("Goodbye!");
}

fn cmd_run(script: &Path, config: &CreplConfig) {
    let source = read_script(script);
    println!("{} {}", status_label("Running"), script.display());
    if let Err(e) = repl::run_script_with_toolchain(&source, config) {
        fail(&e);
    }
}

fn cmd_emit(script: &Path, output: Option<PathBuf>, config: &CreplConfig) {
    let source = read_script(script);

    // Session messages go to stderr so stdout carries only the program.
    let driver = repl::run_script(&source, repl::seed_from(config), Offline, io::stderr())
        .unwrap_or_else(|e| fail(&e));
    let program = driver.session().assemble();

    if let Some(ref out_path) = output {
        eprintln!("{} source to {}", status_label("Emitting"), out_path.display());
        std::fs::write(out_path, &program).unwrap_or_else(|e| {
            eprintln!("{} writing to '{}': {}", red("error:"), out_path.display(), e);
            std::process::exit(1);
        });
    } else {
        print!("{}", program);
    }
}

fn cmd_init() {
    let path = PathBuf::from(CONFIG_FILE);
    if path.exists() {
        eprintln!("{} {} already exists, not overwriting", red("error:"), CONFIG_FILE);
        std::process::exit(1);
    }
    std::fs::write(&path, CreplConfig::default_template()).unwrap_or_else(|e| {
        eprintln!("{} writing {}: {}", red("error:"), CONFIG_FILE, e);
        std::process::exit(1);
    });
    println!("{} {}", status_label("Created"), CONFIG_FILE);
}
