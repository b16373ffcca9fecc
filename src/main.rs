mod debug_report;

use rogerian::{Options, ResponseEngine, SimpleMatcher, respond_verbose_with};
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "ROGERIAN_LOG";

fn main() {
    init_tracing();

    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let responder = build_responder(&config);

    let result = match &config.input {
        Some(input) => {
            answer(&responder, input, &config);
            Ok(())
        }
        None => converse(&responder, &config),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

struct CliConfig {
    input: Option<String>,
    rules: Option<(PathBuf, PathBuf)>,
    options: Options,
    simple: bool,
    verbose: bool,
    color: bool,
}

enum Responder {
    Rules(ResponseEngine),
    Simple(SimpleMatcher),
}

/// Rule files that fail to load are reported once, then the simple matcher
/// takes over.
fn build_responder(config: &CliConfig) -> Responder {
    if config.simple {
        return Responder::Simple(SimpleMatcher::new(&config.options));
    }

    let engine = match &config.rules {
        Some((responses, substitutions)) => ResponseEngine::from_files(responses, substitutions, &config.options),
        None => ResponseEngine::builtin(&config.options),
    };

    match engine {
        Ok(engine) => Responder::Rules(engine),
        Err(err) => {
            eprintln!("warning: {err}");
            eprintln!("warning: falling back to the built-in simple matcher");
            Responder::Simple(SimpleMatcher::new(&config.options))
        }
    }
}

fn answer(responder: &Responder, input: &str, config: &CliConfig) {
    match responder {
        Responder::Rules(engine) if config.verbose => {
            let reply = respond_verbose_with(engine, input);
            debug_report::print_reply(input, &reply, config.color);
        }
        Responder::Rules(engine) => println!("{}", engine.respond_to(input)),
        Responder::Simple(matcher) => {
            let reply = matcher.respond_to(input);
            if config.verbose {
                debug_report::print_simple(input, &reply, config.color);
            } else {
                println!("{reply}");
            }
        }
    }
}

/// Answer stdin line by line until EOF or `quit`/`exit`.
fn converse(responder: &Responder, config: &CliConfig) -> io::Result<()> {
    let interactive = io::stdin().is_terminal();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        if interactive {
            print!("> ");
            io::stdout().flush()?;
        }

        let Some(line) = lines.next().transpose()? else {
            break;
        };
        let line = line.trim();

        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            break;
        }

        answer(responder, line, config);
    }

    Ok(())
}

fn parse_args() -> Result<CliConfig, String> {
    let mut input: Option<String> = None;
    let mut responses: Option<PathBuf> = None;
    let mut substitutions: Option<PathBuf> = None;
    let mut options = Options::default();
    let mut simple = false;
    let mut verbose = false;
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("rogerian {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--simple" => simple = true,
            "--reflect" => options.reflect_unmatched = true,
            "-v" | "--verbose" => verbose = true,
            "--seed" => {
                let value = args.next().ok_or_else(|| "error: --seed expects a value".to_string())?;
                options.seed = Some(parse_seed(&value)?);
            }
            "--responses" => {
                let value = args.next().ok_or_else(|| "error: --responses expects a path".to_string())?;
                responses = Some(PathBuf::from(value));
            }
            "--substitutions" => {
                let value = args.next().ok_or_else(|| "error: --substitutions expects a path".to_string())?;
                substitutions = Some(PathBuf::from(value));
            }
            "--input" | "-i" => {
                let value = args.next().ok_or_else(|| "error: --input expects a value".to_string())?;
                set_input(&mut input, value)?;
            }
            "--" => {
                let rest = args.collect::<Vec<_>>().join(" ");
                if !rest.trim().is_empty() {
                    set_input(&mut input, rest)?;
                }
                break;
            }
            _ if arg.starts_with("--seed=") => {
                options.seed = Some(parse_seed(arg.trim_start_matches("--seed="))?);
            }
            _ if arg.starts_with("--responses=") => {
                responses = Some(PathBuf::from(arg.trim_start_matches("--responses=")));
            }
            _ if arg.starts_with("--substitutions=") => {
                substitutions = Some(PathBuf::from(arg.trim_start_matches("--substitutions=")));
            }
            _ if arg.starts_with("--input=") => {
                set_input(&mut input, arg.trim_start_matches("--input=").to_string())?;
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                let rest = std::iter::once(arg).chain(args).collect::<Vec<_>>().join(" ");
                set_input(&mut input, rest)?;
                break;
            }
        }
    }

    let rules = match (responses, substitutions) {
        (Some(responses), Some(substitutions)) => Some((responses, substitutions)),
        (None, None) => None,
        _ => return Err("error: --responses and --substitutions must be given together".to_string()),
    };

    if simple && rules.is_some() {
        return Err("error: --simple cannot be combined with rule files".to_string());
    }

    Ok(CliConfig { input, rules, options, simple, verbose, color })
}

fn set_input(input: &mut Option<String>, value: String) -> Result<(), String> {
    if input.is_some() {
        return Err("error: input provided multiple times".to_string());
    }
    *input = Some(value);
    Ok(())
}

fn parse_seed(value: &str) -> Result<u64, String> {
    value.parse().map_err(|_| format!("error: invalid --seed '{value}' (expected an unsigned integer)"))
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "rogerian {version}

ELIZA-style conversational responder.

Usage:
  rogerian [OPTIONS] [--] <input...>
  rogerian [OPTIONS] --input <text>
  rogerian [OPTIONS]                  (answer stdin line by line)

Options:
  -i, --input <text>         Single utterance to answer. If omitted, reads
                             remaining args, or stdin lines when there are none.
  --responses <path>         Response rule file (requires --substitutions).
  --substitutions <path>     Substitution rule file (requires --responses).
                             Default: the rules bundled with this binary.
  --simple                   Use the built-in simple matcher instead of rules.
  --reflect                  Reflect captured words no substitution matched.
  --seed <n>                 Seed random choices for reproducible replies.
  -v, --verbose              Print how each reply was built.
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Environment:
  {log_env}               Log filter (e.g. debug, rogerian=trace). Default: warn

Exit codes:
  0  Success.
  1  I/O error.
  2  Invalid arguments.
",
        version = env!("CARGO_PKG_VERSION"),
        log_env = LOG_ENV,
    )
}
