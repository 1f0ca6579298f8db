use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use graindash::{Command, Dashboard, Datasets, HELP, Outcome};

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::ShellArgs) -> Result<()> {
    let config = super::load_config(cli)?;
    let datasets = Datasets::load(&config)?;
    let mut dashboard = Dashboard::new(&datasets, &config);

    let render = |dashboard: &Dashboard| -> Result<()> {
        let figure = dashboard.render();
        super::write_figure(&figure, &args.figure)?;
        println!("{} -> {}", figure.title, args.figure.output.display());
        Ok(())
    };

    render(&dashboard)?;
    println!("Type \"help\" for commands.");

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("graindash> ");
        std::io::stdout().flush().context("Failed to flush stdout")?;

        let Some(line) = lines.next() else { break };
        let line = line.context("Failed to read from stdin")?;

        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => { eprintln!("error: {err}"); continue }
        };

        match dashboard.apply(command) {
            Ok(Outcome::Rerender | Outcome::Show) => render(&dashboard)?,
            Ok(Outcome::Help) => println!("{HELP}"),
            Ok(Outcome::Quit) => break,
            Err(err) => eprintln!("error: {err}"),
        }
    }

    Ok(())
}
