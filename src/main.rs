use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use rich_street::board::Rules;
use rich_street::engine::{Output, OutputBlock};
use rich_street::{Game, load_rules_from_file};
use tracing_subscriber::EnvFilter;

fn flush_output(out: Output) -> io::Result<()> {
    let mut printed_anything = false;
    let mut started_events = false;

    for block in out.blocks {
        match block {
            OutputBlock::Title(t) => {
                println!("\n== {} ==", t);
                printed_anything = true;
            }
            OutputBlock::Text(line) => {
                println!("{}", line);
                printed_anything = true;
            }
            OutputBlock::Event(ev) => {
                if !started_events {
                    if printed_anything {
                        println!(); // visual separation before first event
                    }
                    started_events = true;
                }
                println!("* {}", ev);
                printed_anything = true;
            }
            OutputBlock::Prompt(p) => {
                if p.ends_with(' ') {
                    print!("{}", p);
                } else {
                    print!("{} ", p);
                }
            }
        }
    }
    io::stdout().flush()
}

#[derive(Default)]
struct Args {
    preset: Option<PathBuf>,
    rules: Option<PathBuf>,
    seed: Option<u64>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args::default();
    let mut it = env::args().skip(1);
    while let Some(flag) = it.next() {
        match flag.as_str() {
            "-i" => args.preset = Some(it.next().ok_or("-i needs a preset file")?.into()),
            "--rules" => args.rules = Some(it.next().ok_or("--rules needs a TOML file")?.into()),
            "--seed" => {
                let raw = it.next().ok_or("--seed needs a number")?;
                args.seed = Some(raw.parse().map_err(|_| format!("bad seed '{raw}'"))?);
            }
            other => return Err(format!("unknown argument '{other}'")),
        }
    }
    Ok(args)
}

fn read_line(stdin: &mut impl BufRead) -> io::Result<Option<String>> {
    let mut line = String::new();
    if stdin.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Ask for starting funds and a roster until both are acceptable.
fn setup_game(rules: Rules, seed: Option<u64>, stdin: &mut impl BufRead) -> io::Result<Option<Game>> {
    let fund = loop {
        print!(
            "Starting funds ({}-{}, enter for {}): ",
            rules.min_fund, rules.max_fund, rules.default_fund
        );
        io::stdout().flush()?;
        let Some(line) = read_line(stdin)? else {
            return Ok(None);
        };
        if line.is_empty() {
            break rules.default_fund;
        }
        match line.parse::<i64>() {
            Ok(fund) if rules.fund_in_range(fund) => break fund,
            _ => println!("Please enter a number between {} and {}.", rules.min_fund, rules.max_fund),
        }
    };

    println!("Characters:");
    for c in rich_street::board::ROSTER.iter() {
        println!("  {}. {} ({})", c.id, c.display_name, c.name);
    }
    loop {
        print!("Pick 2-4 characters by number, e.g. 1234: ");
        io::stdout().flush()?;
        let Some(line) = read_line(stdin)? else {
            return Ok(None);
        };
        match Game::from_roster(rules.clone(), &line, fund, seed) {
            Ok(game) => return Ok(Some(game)),
            Err(e) => println!("{e}"),
        }
    }
}

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = match parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("usage: rich_street [-i preset.json] [--rules rules.toml] [--seed N]");
            std::process::exit(2);
        }
    };

    let rules = match &args.rules {
        Some(path) => match load_rules_from_file(path) {
            Ok(r) => {
                println!("Using rules file: {}", path.display());
                r
            }
            Err(e) => {
                eprintln!("Failed to load rules file '{}': {e}", path.display());
                std::process::exit(1);
            }
        },
        None => Rules::default(),
    };

    let mut stdin = io::stdin().lock();

    let preset = args.preset.as_ref().and_then(|path| {
        match Game::from_preset(&rules, path, args.seed) {
            Ok(game) => Some(game),
            Err(e) => {
                eprintln!("Failed to load preset '{}': {e}", path.display());
                println!("Starting a new game instead.");
                None
            }
        }
    });

    let mut game = match preset {
        Some(game) => game,
        None => {
            println!("Welcome to Rich Street!\n");
            match setup_game(rules, args.seed, &mut stdin)? {
                Some(game) => game,
                None => {
                    println!("\nGoodbye.");
                    return Ok(());
                }
            }
        }
    };

    flush_output(game.initialize())?;

    loop {
        let Some(input) = read_line(&mut stdin)? else {
            println!("\nGoodbye.");
            break;
        };
        if input.is_empty() {
            continue;
        }

        let (out, quit) = game.step(&input);
        flush_output(out)?;

        if quit {
            println!();
            break;
        }
    }

    Ok(())
}
