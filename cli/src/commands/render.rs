use anyhow::Result;
use graindash::{Command, Dashboard, Datasets};

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::RenderArgs) -> Result<()> {
    let config = super::load_config(cli)?;
    let datasets = Datasets::load(&config)?;

    let mut dashboard = Dashboard::new(&datasets, &config);
    let mut commands = vec![Command::Crop(args.crop), Command::Rivers(!args.no_rivers)];
    if let Some(year) = args.year { commands.push(Command::Year(year)) }
    for command in commands {
        dashboard.apply(command)?;
    }

    let figure = dashboard.render();
    super::write_figure(&figure, &args.figure)?;
    println!("{} -> {}", figure.title, args.figure.output.display());

    Ok(())
}
