use anyhow::Result;
use graindash::{Crop, NassClient};

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::FetchArgs) -> Result<()> {
    let config = super::load_config(cli)?;
    let client = NassClient::from_config(&config)?;

    let crops = match args.crop {
        Some(crop) => vec![crop],
        None => Crop::ALL.to_vec(),
    };
    let years = if args.years.is_empty() { config.years.iter().collect() } else { args.years.clone() };

    for crop in crops {
        for &year in &years {
            eprintln!("[fetch] {crop} {year}");
            let path = client.fetch_production(&config.production_dir, crop, year)?;
            println!("Wrote {}", path.display());
        }
    }

    Ok(())
}
