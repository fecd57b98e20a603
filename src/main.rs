use clap::Parser;
use std::io::{self, BufRead, IsTerminal, Write};

use shellsy::shellsy::Shellsy;

#[derive(Parser)]
#[command(name = "shellsy")]
#[command(about = "An extensible shell with typed commands")]
#[command(version)]
struct Cli {
    /// Evaluate a single line and exit
    #[arg(short = 'c')]
    line: Option<String>,

    /// Output the result as JSON (value or error)
    #[arg(long = "json")]
    json: bool,

    /// Script file to evaluate, one command per line
    #[arg()]
    script_file: Option<String>,
}

fn eval_and_report(shell: &mut Shellsy, line: &str, json: bool) -> i32 {
    match shell.eval(line) {
        Ok(value) => {
            if json {
                println!("{}", serde_json::json!({ "value": value.to_string() }));
            } else {
                println!("{}", value);
            }
            0
        }
        Err(err) => {
            let rendered = shell.render_error(&err);
            if json {
                println!("{}", serde_json::json!({ "error": rendered }));
            } else {
                eprint!("{}", rendered);
            }
            1
        }
    }
}

fn run_script(shell: &mut Shellsy, content: &str, json: bool) -> i32 {
    for line in content.lines() {
        let code = eval_and_report(shell, line, json);
        if code != 0 {
            return code;
        }
        if !shell.is_running() {
            break;
        }
    }
    0
}

fn repl(shell: &mut Shellsy) {
    let stdin = io::stdin();
    let interactive = stdin.is_terminal();

    loop {
        if interactive {
            print!("shellsy> ");
            let _ = io::stdout().flush();
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }

        match shell.eval(line.trim_end()) {
            Ok(value) => println!("{}", value),
            Err(err) => eprint!("{}", shell.render_error(&err)),
        }

        if !shell.is_running() {
            break;
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let mut shell = Shellsy::new();

    if let Some(line) = cli.line {
        std::process::exit(eval_and_report(&mut shell, &line, cli.json));
    }

    if let Some(file) = cli.script_file {
        match std::fs::read_to_string(&file) {
            Ok(content) => std::process::exit(run_script(&mut shell, &content, cli.json)),
            Err(err) => {
                eprintln!("shellsy: cannot read script file {}: {}", file, err);
                std::process::exit(1);
            }
        }
    }

    repl(&mut shell);
}
