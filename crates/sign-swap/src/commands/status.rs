use camino::Utf8PathBuf;
use colored::Colorize;
use signpack_engine::{selection_from_settings, Catalog, Settings};
use signpack_model::Category;

use super::load_packs;
use crate::println_pad;

#[derive(Debug, Clone)]
pub struct ShowStatusArgs {
    pub settings: String,
    pub packs: Option<String>,
}

fn print_selection(name: &str, selection: Option<&str>) {
    match selection {
        Some(pack) => println_pad!(
            "{} {}",
            format!("{}:", name).bright_white(),
            pack.bright_cyan()
        ),
        None => println_pad!(
            "{} {}",
            format!("{}:", name).bright_white(),
            "(vanilla)".bright_yellow()
        ),
    }
}

pub fn show_status(args: ShowStatusArgs) -> miette::Result<()> {
    let path = Utf8PathBuf::from(&args.settings);
    let settings = Settings::load(&path);

    println!();
    println_pad!("{} {}", "settings_file:".bright_white(), path);
    print_selection("sign_pack", settings.selection(Category::General));
    print_selection("speed_pack", settings.selection(Category::Speed));

    // With a pack file at hand, show the rules the saved selections put in
    // effect. Identity rules are elided; they map a sign to itself.
    if let Some(ref packs_path) = args.packs {
        let raw = load_packs(packs_path)?;
        let catalog = Catalog::build(&raw, &|_: &str| true);
        let (signs, speed) = selection_from_settings(&catalog, &settings);

        println!();
        println_pad!("{}", "active rules:".bright_blue().bold());
        for pack in [signs, speed].into_iter().flatten() {
            for rule in &pack.rules {
                if rule.target_name == rule.replacement_name {
                    continue;
                }
                println_pad!(
                    "  {} {} {} ({}°)",
                    rule.target_name.bright_white(),
                    "->".bright_black(),
                    rule.replacement_name.bright_cyan(),
                    rule.rotation
                );
            }
        }
    }

    println!();
    Ok(())
}
