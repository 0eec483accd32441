use anyhow::Result;
use serde::Serialize;

use snapdeck_core::{AppConfig, Deck};

#[derive(Debug, Serialize)]
struct PositionReport {
    pages: Vec<PageRow>,
    total_height: i64,
    initially_mounted: usize,
}

#[derive(Debug, Serialize)]
struct PageRow {
    index: usize,
    title: String,
    height: i64,
    offset: i64,
}

fn report(config: &AppConfig) -> PositionReport {
    let deck = Deck::new(config.pages.clone(), config.deck_config());
    let positions = deck.positions();

    let pages = deck
        .pages()
        .iter()
        .enumerate()
        .map(|(index, page)| PageRow {
            index,
            title: page.title.clone(),
            height: positions.height_of(index).unwrap_or_default(),
            offset: positions.offset(index).unwrap_or_default(),
        })
        .collect();

    PositionReport {
        pages,
        total_height: positions.total_height(),
        initially_mounted: deck.mounted_count(),
    }
}

pub fn run(config: &AppConfig, json: bool) -> Result<()> {
    let report = report(config);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if report.pages.is_empty() {
        println!("No pages configured.");
        return Ok(());
    }

    println!("Pages ({}):\n", report.pages.len());
    for row in &report.pages {
        println!(
            "  {:>3}  {:>6}%  height {:>4}%  {}",
            row.index + 1,
            row.offset,
            row.height,
            row.title
        );
    }
    println!();
    println!("Stack height: {}%", report.total_height);
    println!("Mounted at start: {}", report.initially_mounted);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapdeck_core::Page;

    #[test]
    fn test_report_uses_default_heights() {
        let mut config = AppConfig::default();
        config.pages = vec![
            Page::new("a", ""),
            Page::new("b", "").with_height(50),
            Page::new("c", "").with_height(0),
        ];
        let report = report(&config);

        let offsets: Vec<i64> = report.pages.iter().map(|p| p.offset).collect();
        assert_eq!(offsets, vec![0, -100, -150]);
        assert_eq!(report.pages[2].height, 100);
        assert_eq!(report.total_height, 250);
        assert_eq!(report.initially_mounted, 3);
    }

    #[test]
    fn test_report_serializes() {
        let json = serde_json::to_value(report(&AppConfig::default())).unwrap();
        assert_eq!(json["pages"][1]["offset"], -100);
        assert_eq!(json["initially_mounted"], 2);
    }
}
