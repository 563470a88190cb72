use lox_scanner::{scanner::Scanner, Error, Result};
use std::{
    env,
    io::{self, Write},
    sync::Once,
};

static TRACING_INIT: Once = Once::new();

/// Installs a tracing subscriber, but only when `RUST_LOG` is set.
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr).with_target(true))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}

fn main() {
    init_tracing();

    let mut stdout = io::stdout();
    let mut stderr = io::stderr();

    let args: Vec<String> = env::args().collect();
    let result = match args.len() {
        1 => run_prompt(&mut stdout, &mut stderr),
        2 => run_file(args[1].as_str(), &mut stdout, &mut stderr),
        _ => {
            let _ = writeln!(stdout, "Usage: lox-scan [script]");
            std::process::exit(64);
        },
    };

    if let Err(e) = result {
        let _ = writeln!(stderr, "{}", e);
        std::process::exit(65);
    }
}

fn run_file(path: &str, out: &mut io::Stdout, err_out: &mut io::Stderr) -> Result<()> {
    let contents = std::fs::read_to_string(path)?;
    let mut lox = Lox::new(out, err_out);
    lox.run(contents.as_str())?;
    if lox.had_error {
        std::process::exit(65);
    }
    Ok(())
}

fn run_prompt(out: &mut io::Stdout, err_out: &mut io::Stderr) -> Result<()> {
    let mut buffer = String::new();
    let stdin = io::stdin();

    let mut lox = Lox::new(out, err_out);

    loop {
        write!(lox.out, "> ")?;
        lox.out.flush()?;

        buffer.clear();

        let num_bytes = stdin.read_line(&mut buffer)?;
        if num_bytes == 0 { break };

        lox.run(buffer.as_str())?;
        lox.had_error = false;
    }

    Ok(())
}

struct Lox<Out, ErrOut> {
    out: Out,
    err_out: ErrOut,
    had_error: bool,
}

impl <Out: Write, ErrOut: Write> Lox<Out, ErrOut> {
    fn new(out: Out, err_out: ErrOut) -> Self {
        Self { out, err_out, had_error: false }
    }

    fn run(&mut self, source: &str) -> Result<()> {
        let mut errors: Vec<Error> = Vec::new();
        let tokens = Scanner::new(source, &mut errors).scan_tokens();

        for e in errors.iter() {
            writeln!(self.err_out, "{}", e)?;
        }
        self.had_error |= !errors.is_empty();

        for token in tokens.iter() {
            let (line, column) = (token.line(), token.column());
            writeln!(self.out, "{:>4}:{:<3} {}", line, column, token)?;
        }

        Ok(())
    }
}
