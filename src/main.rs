use code_launcher::columns::{ChildRef, PaneView};
use code_launcher::logging;
use code_launcher::ranking::{EntryTarget, RankedEntry};
use code_launcher::search::SearchResults;
use code_launcher::settings::{default_settings_path, Settings};
use code_launcher::{Launcher, Renderer, Snapshot};
use std::path::PathBuf;

/// Plain-text view for terminals.
struct TextRenderer;

fn describe(entry: &RankedEntry) -> String {
    let star = if entry.favorite { "*" } else { " " };
    match &entry.target {
        EntryTarget::Category(_) => format!("{star} [{}] {}/", entry.icon, entry.name),
        EntryTarget::Leaf { path, kind } => {
            format!("{star} [{}] {} ({kind}: {})", entry.icon, entry.name, path.display())
        }
    }
}

fn is_selected(pane: &PaneView, entry: &RankedEntry) -> bool {
    pane.selected.as_ref() == Some(&ChildRef::from(&entry.target))
}

impl Renderer for TextRenderer {
    fn render(&mut self, snapshot: &Snapshot) {
        match &snapshot.results {
            Some(SearchResults::Recent(list)) => {
                println!("Recent ({}):", list.len());
                for view in list {
                    let star = if view.favorite { "*" } else { " " };
                    println!("{star} {} ({})", view.entry.name, view.entry.path.display());
                }
            }
            Some(SearchResults::Matches(list)) => {
                println!("Matches ({}):", list.len());
                for entry in list {
                    println!("{}", describe(entry));
                }
            }
            None => {
                for pane in &snapshot.panes {
                    println!("== {} ==", pane.bound);
                    for entry in &pane.entries {
                        let marker = if is_selected(pane, entry) { ">" } else { " " };
                        println!("{marker}{}", describe(entry));
                    }
                }
            }
        }
    }
}

fn parse_args() -> anyhow::Result<(Option<PathBuf>, Option<String>)> {
    let mut settings = None;
    let mut query: Vec<String> = Vec::new();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--settings" => match args.next() {
                Some(path) => settings = Some(PathBuf::from(path)),
                None => anyhow::bail!("--settings needs a file argument"),
            },
            "-h" | "--help" => {
                println!("usage: code-launcher [--settings <file>] [query]");
                std::process::exit(0);
            }
            _ => query.push(arg),
        }
    }
    let query = (!query.is_empty()).then(|| query.join(" "));
    Ok((settings, query))
}

fn main() -> anyhow::Result<()> {
    let (settings_path, query) = parse_args()?;
    let settings_path = settings_path.unwrap_or_else(default_settings_path);
    let settings = Settings::load(&settings_path)?;
    logging::init(settings.debug_logging, settings.log_file.clone());
    tracing::debug!("settings loaded from {}", settings_path.display());

    let mut launcher = Launcher::from_settings(&settings);
    match query {
        Some(q) => {
            launcher.set_query(&q);
        }
        None => {
            launcher.select_first_category();
        }
    }
    TextRenderer.render(&launcher.snapshot());
    Ok(())
}
