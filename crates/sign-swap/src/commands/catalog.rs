use colored::Colorize;
use signpack_engine::registry::VANILLA_PACK_NAME;
use signpack_engine::Catalog;
use signpack_model::Category;

use super::{load_packs, load_world};
use crate::println_pad;

#[derive(Debug, Clone)]
pub struct ShowCatalogArgs {
    pub packs: String,
    pub world: Option<String>,
}

pub fn show_catalog(args: ShowCatalogArgs) -> miette::Result<()> {
    let raw = load_packs(&args.packs)?;

    // Without a world to check subscriptions against, every prefix counts
    // as available.
    let catalog = match args.world {
        Some(ref world_path) => {
            let world = load_world(world_path)?;
            Catalog::build(&raw, &world.assets)
        }
        None => Catalog::build(&raw, &|_: &str| true),
    };

    for category in [Category::General, Category::Speed] {
        println!();
        println_pad!("{}", format!("{} packs:", category).bright_blue().bold());

        for pack in catalog.packs(category) {
            if pack.name == VANILLA_PACK_NAME {
                println_pad!(
                    "  {} {}",
                    pack.name.bright_cyan().bold(),
                    "(built-in)".bright_black()
                );
                continue;
            }

            let rule_count = match pack.rules.len() {
                1 => "1 rule".to_string(),
                n => format!("{} rules", n),
            };
            println_pad!("  {} {}", pack.name.bright_cyan(), rule_count.bright_black());
        }
    }

    println!();
    Ok(())
}
