use camino::Utf8PathBuf;
use colored::Colorize;
use signpack_engine::{selection_from_settings, Catalog, ReplacementEngine, Settings};

use super::{load_packs, load_world};
use crate::errors::CliError;
use crate::println_pad;

#[derive(Debug, Clone)]
pub struct ApplyPacksArgs {
    pub packs: String,
    pub world: String,
    pub signs: Option<String>,
    pub speed: Option<String>,
    pub settings: String,
}

pub fn apply_packs(args: ApplyPacksArgs) -> miette::Result<()> {
    let raw = load_packs(&args.packs)?;
    let mut world = load_world(&args.world)?;

    let settings_path = Utf8PathBuf::from(&args.settings);
    let mut settings = Settings::load(&settings_path);

    let catalog = Catalog::build(&raw, &world.assets);
    let mut engine = ReplacementEngine::new(catalog);

    // Explicit flags win; missing ones fall back to the saved selections.
    let (saved_signs, saved_speed) = selection_from_settings(engine.catalog(), &settings);
    let signs = args.signs.or_else(|| saved_signs.map(|p| p.name.clone()));
    let speed = args.speed.or_else(|| saved_speed.map(|p| p.name.clone()));

    println_pad!(
        "{} {} / {}",
        "Applying:".bright_blue().bold(),
        signs.as_deref().unwrap_or("(unchanged)").bright_cyan(),
        speed.as_deref().unwrap_or("(unchanged)").bright_cyan()
    );

    let report = engine.apply_by_name(
        &mut world.items,
        &world.assets,
        signs.as_deref(),
        speed.as_deref(),
    );

    if report.is_noop() {
        println_pad!(
            "{}",
            "Nothing to do, selections already applied.".bright_yellow()
        );
        return Ok(());
    }

    let world_path = Utf8PathBuf::from(&args.world);
    world
        .save(&world_path)
        .map_err(|source| CliError::WorldWriteFailed {
            path: world_path.clone(),
            source,
        })?;

    for category in &report.committed {
        settings.record(*category, engine.applied_pack(*category).name.clone());
    }
    settings
        .save(&settings_path)
        .map_err(|source| CliError::SettingsWriteFailed {
            path: settings_path.clone(),
            source,
        })?;

    println_pad!(
        "{} {} replaced, {} reverted in {:.1?}",
        "Done:".bright_green().bold(),
        report.replaced.to_string().bright_white().bold(),
        report.reverted.to_string().bright_white().bold(),
        report.elapsed
    );

    if !report.missing_assets.is_empty() {
        println_pad!(
            "{} {}",
            "Missing assets:".bright_yellow().bold(),
            report.missing_assets.join(", ").bright_white()
        );
    }

    Ok(())
}
