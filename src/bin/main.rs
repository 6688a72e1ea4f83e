use std::env;

use rlox::Lox;

fn main() -> Result<(), anyhow::Error> {
    env_logger::init();

    let mut args = env::args().skip(1).collect::<Vec<_>>();

    let mut lox = Lox::new();
    match args.pop() {
        None => lox.run_prompt(),
        Some(filename) if args.is_empty() => match lox.run_file(&filename) {
            Ok(status) => std::process::exit(status.code()),
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(74);
            }
        },
        Some(_) => {
            let bin_name = env!("CARGO_BIN_NAME");
            println!("Usage: {} [script]", bin_name);
            std::process::exit(64);
        }
    }
}
