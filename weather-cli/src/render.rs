use std::fmt;

use weather_core::{Card, CardState, Icon, WeatherReport};

/// Text rendering of one card.
struct CardView<'a>(&'a Card);

impl fmt::Display for CardView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let card = self.0;
        match &card.state {
            CardState::Loading => writeln!(f, "{}\n  loading...", card.query),
            CardState::Failed(message) => writeln!(f, "{}\n  ✗ {message}", card.query),
            CardState::Loaded(report) => write!(f, "{}", ReportView(report)),
        }
    }
}

struct ReportView<'a>(&'a WeatherReport);

impl fmt::Display for ReportView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        writeln!(f, "{} {}°C", report.icon.glyph(), report.temperature_c)?;
        writeln!(f, "{}", report.location)?;
        writeln!(f, "  {}", report.condition)?;
        writeln!(f, "  Humidity:   {}%", report.humidity_pct)?;
        writeln!(f, "  Wind Speed: {:.1} Km/h", report.wind_speed_kmh)?;
        if let Some(at) = report.observed_at {
            writeln!(f, "  Updated:    {}", at.format("%Y-%m-%d %H:%M UTC"))?;
        }
        Ok(())
    }
}

pub fn card(card: &Card) -> String {
    CardView(card).to_string()
}

/// All cards, blank line between them.
pub fn cards(cards: &[Card]) -> String {
    cards.iter().map(card).collect::<Vec<_>>().join("\n")
}

pub fn json(cards: &[Card]) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(cards)?)
}

pub fn icon_table() -> String {
    let rows = Icon::table()
        .iter()
        .map(|(code, icon)| format!("{code}  {}  {icon}\n", icon.glyph()));
    let fallback = format!("*    {}  {} (any other code)\n", Icon::Clear.glyph(), Icon::Clear);
    rows.chain(std::iter::once(fallback)).collect()
}
