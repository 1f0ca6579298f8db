use anyhow::Result;

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::PrepareRiversArgs) -> Result<()> {
    let mut config = super::load_config(cli)?;
    if let Some(input) = &args.input { config.river_shapefile = input.clone() }
    if let Some(tolerance) = args.tolerance { config.simplify_tolerance = tolerance }
    config.validate()?;

    eprintln!("[prepare-rivers] {} -> {}", config.river_shapefile.display(), config.rivers_geojson.display());
    let rivers = graindash::prepare_rivers(&config)?;
    println!("Wrote {} rivers to {}", rivers.len(), config.rivers_geojson.display());

    Ok(())
}
