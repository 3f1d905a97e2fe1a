mod app;
mod host;
mod renderer;

use std::path::PathBuf;

use anyhow::{Context, Result};
use panscroll_core::{EngineConfig, SectionList};

fn demo_sections() -> SectionList {
    SectionList::from_entries([
        ("00", "Home", "Home"),
        ("01", "About", "About Us"),
        ("02", "Drink Bars", "Services"),
        ("03", "Events", "Events"),
        ("04", "Contact Us", "Contact"),
    ])
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 2 {
        eprintln!("Usage: panscroll-preview [config.json]");
        std::process::exit(1);
    }

    let config = match args.get(1) {
        Some(arg) => {
            let path = PathBuf::from(arg);
            let data = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            EngineConfig::from_json(&data)
                .with_context(|| format!("parsing {}", path.display()))?
        }
        None => EngineConfig::default(),
    };

    let (cols, rows) = crossterm::terminal::size()?;
    let mut app = app::App::new(config, demo_sections(), cols, rows);
    renderer::run(&mut app)
}
