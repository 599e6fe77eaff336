// wordcode: runs programs spelled as words on a small register machine

use std::error::Error;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use wordcode::codec;
use wordcode::interpreter::constants::DEFAULT_SNAPSHOT_LIMIT;
use wordcode::interpreter::engine::{Interpreter, RunConfig};
use wordcode::interpreter::io::{CharSource, ScriptedSource, TerminalSource};
use wordcode::interpreter::opcode::disassemble;
use wordcode::parser::parse_sentence;
use wordcode::ui::App;

#[derive(Parser, Debug)]
#[command(name = "wordcode")]
#[command(version, about = "Run programs written as words on a tiny register machine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Execute a program file
    Run {
        /// Program source; every run of letters is one word
        file: PathBuf,

        /// Print the final machine state after execution
        #[arg(long)]
        dump: bool,

        /// Browse the execution history word by word afterwards
        #[arg(long)]
        inspect: bool,

        /// Abort after this many instructions
        #[arg(long, value_name = "N")]
        max_steps: Option<u64>,

        /// Feed the program this text instead of reading the keyboard
        #[arg(long, value_name = "TEXT")]
        input: Option<String>,

        /// Memory budget for the execution history, in bytes
        #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_SNAPSHOT_LIMIT)]
        snapshot_limit: usize,
    },

    /// Show the microcode of every word in a program file
    Disasm {
        file: PathBuf,
    },

    /// Print the opcode digits of each word
    Encode {
        #[arg(required = true)]
        words: Vec<String>,
    },

    /// Print the word that compiles to the given opcode digits
    Assemble {
        #[arg(required = true)]
        digits: Vec<u8>,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = dispatch(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn dispatch(command: Command) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Run {
            file,
            dump,
            inspect,
            max_steps,
            input,
            snapshot_limit,
        } => {
            let config = RunConfig {
                max_steps,
                record_history: inspect,
                snapshot_limit,
            };
            run(&file, config, input, dump, inspect)
        }
        Command::Disasm { file } => disasm(&file),
        Command::Encode { words } => {
            for word in &words {
                let digits = codec::encode(word)?;
                println!("{}: {:?}", word, digits);
            }
            Ok(())
        }
        Command::Assemble { digits } => {
            println!("{}", codec::decode(&digits)?);
            Ok(())
        }
    }
}

fn read_source(path: &Path) -> Result<String, Box<dyn Error>> {
    fs::read_to_string(path)
        .map_err(|e| format!("cannot read '{}': {}", path.display(), e).into())
}

fn run(
    path: &Path,
    config: RunConfig,
    input: Option<String>,
    dump: bool,
    inspect: bool,
) -> Result<(), Box<dyn Error>> {
    let source = read_source(path)?;
    info!("Parsing {}...", path.display());

    let input: Box<dyn CharSource> = match input {
        Some(text) => Box::new(ScriptedSource::new(&text)),
        None => Box::new(TerminalSource::new()),
    };
    let mut interpreter = Interpreter::from_source(&source, input, Box::new(io::stdout()), config)?;

    info!("Executing {} words...", interpreter.sentence().len());
    let outcome = interpreter.run();

    if dump {
        println!();
        println!("=== End Of Execution ===");
        println!("{}", interpreter.state());
    }

    if !inspect {
        return outcome.map_err(Into::into);
    }

    let fault = match outcome {
        Ok(()) => {
            info!("Execution completed. Total snapshots: {}", interpreter.total_snapshots());
            None
        }
        Err(e) => {
            warn!("Runtime error: {}. Entering inspector with partial history", e);
            Some(e.to_string())
        }
    };

    // Rewind to the beginning for the inspector
    if let Err(e) = interpreter.rewind_to_start() {
        warn!("Failed to rewind to start: {}", e);
    }

    inspect_history(interpreter, fault)
}

fn inspect_history(interpreter: Interpreter, fault: Option<String>) -> Result<(), Box<dyn Error>> {
    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(interpreter, fault);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.map_err(Into::into)
}

fn disasm(path: &Path) -> Result<(), Box<dyn Error>> {
    let sentence = parse_sentence(&read_source(path)?);
    for (index, word) in sentence.iter().enumerate() {
        let digits = codec::encode(word.as_str())?;
        println!("#{} {} {:?}", index, word, digits);
        for line in disassemble(&digits) {
            println!("    {}", line);
        }
    }
    Ok(())
}
