use serde::{Deserialize, Serialize};

/// Icon shown on a city card, derived from the OpenWeather `weather[0].icon` code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Icon {
    #[default]
    Clear,
    Cloud,
    Drizzle,
    Rain,
    Snow,
}

/// Known OpenWeather codes. Day (`d`) and night (`n`) variants share an icon.
const CODE_TABLE: &[(&str, Icon)] = &[
    ("01d", Icon::Clear),
    ("01n", Icon::Clear),
    ("02d", Icon::Cloud),
    ("02n", Icon::Cloud),
    ("03d", Icon::Cloud),
    ("03n", Icon::Cloud),
    ("04d", Icon::Drizzle),
    ("04n", Icon::Drizzle),
    ("09d", Icon::Rain),
    ("09n", Icon::Rain),
    ("10d", Icon::Clear),
    ("10n", Icon::Clear),
    ("13d", Icon::Snow),
    ("13n", Icon::Snow),
];

impl Icon {
    /// Map an icon code to an icon. Unknown codes fall back to [`Icon::Clear`].
    pub fn from_code(code: &str) -> Self {
        CODE_TABLE
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, icon)| *icon)
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Icon::Clear => "clear",
            Icon::Cloud => "cloud",
            Icon::Drizzle => "drizzle",
            Icon::Rain => "rain",
            Icon::Snow => "snow",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            Icon::Clear => "☀",
            Icon::Cloud => "☁",
            Icon::Drizzle => "🌦",
            Icon::Rain => "🌧",
            Icon::Snow => "❄",
        }
    }

    /// The full code table, in the order it is matched.
    pub fn table() -> &'static [(&'static str, Icon)] {
        CODE_TABLE
    }
}

impl std::fmt::Display for Icon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
