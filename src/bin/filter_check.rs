use clap::Parser;
use filter_expr::{Compiler, CompilerConfig, parser::build};

/// Compiles filter expressions read from stdin, one per line.
#[derive(Parser, Debug)]
#[command(name = "filter_check")]
struct Args {
    /// Target backend (defaults to $FILTER_EXPR_DRIVER, then postgres)
    #[arg(short, long)]
    driver: Option<String>,

    /// Reject anything the parser can't classify
    #[arg(long)]
    strict: bool,

    /// Also print the parsed tree
    #[arg(long)]
    tree: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let mut config = CompilerConfig::from_env()?;
    if let Some(driver) = args.driver {
        config.driver = driver;
    }
    config.strict |= args.strict;
    let compiler = Compiler::from_config(&config)?;

    for line in std::io::stdin().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        if args.tree {
            match build(&line) {
                Ok(tree) => println!("{tree:#?}"),
                Err(e) => println!("Error parsing input: {e}"),
            }
        }
        let now = std::time::Instant::now();
        let res = compiler.compile(&line);
        print!("[in {}μs] ", now.elapsed().as_micros());
        match res {
            Ok(sql) => println!("{sql}"),
            Err(e) => println!("{e}"),
        }
    }
    Ok(())
}
