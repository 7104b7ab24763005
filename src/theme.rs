use serde::Serialize;

/// Glyph and colors used to style a reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConditionTheme {
    pub name: &'static str,
    #[serde(skip)]
    pub keywords: &'static [&'static str],
    pub glyph: &'static str,
    pub background: &'static str,
    pub foreground: &'static str,
    pub accent: &'static str,
}

/// Ordered lookup table; the first entry with a keyword contained in the
/// condition wins. Thunder precedes rain ("thunderstorm with rain") and
/// drizzle precedes rain ("light intensity drizzle rain").
pub static THEMES: &[ConditionTheme] = &[
    ConditionTheme {
        name: "clear",
        keywords: &["clear", "sun"],
        glyph: "☀️",
        background: "#facc15",
        foreground: "#0f172a",
        accent: "#b45309",
    },
    ConditionTheme {
        name: "storm",
        keywords: &["thunder", "storm"],
        glyph: "⛈️",
        background: "#4c1d95",
        foreground: "#f5f3ff",
        accent: "#facc15",
    },
    ConditionTheme {
        name: "drizzle",
        keywords: &["drizzle"],
        glyph: "🌦️",
        background: "#38bdf8",
        foreground: "#0f172a",
        accent: "#0369a1",
    },
    ConditionTheme {
        name: "rain",
        keywords: &["rain", "shower"],
        glyph: "🌧️",
        background: "#0ea5e9",
        foreground: "#f0f9ff",
        accent: "#0c4a6e",
    },
    ConditionTheme {
        name: "snow",
        keywords: &["snow", "sleet"],
        glyph: "❄️",
        background: "#e0f2fe",
        foreground: "#0f172a",
        accent: "#0284c7",
    },
    ConditionTheme {
        name: "cloud",
        keywords: &["cloud", "overcast"],
        glyph: "☁️",
        background: "#64748b",
        foreground: "#f8fafc",
        accent: "#cbd5e1",
    },
    ConditionTheme {
        name: "mist",
        keywords: &["mist", "fog", "haze", "smoke", "dust", "sand", "ash"],
        glyph: "🌫️",
        background: "#94a3b8",
        foreground: "#0f172a",
        accent: "#475569",
    },
    ConditionTheme {
        name: "wind",
        keywords: &["tornado", "squall"],
        glyph: "🌪️",
        background: "#334155",
        foreground: "#f1f5f9",
        accent: "#f97316",
    },
];

/// Used when no keyword matches
pub static DEFAULT_THEME: ConditionTheme = ConditionTheme {
    name: "default",
    keywords: &[],
    glyph: "🌡️",
    background: "#1e293b",
    foreground: "#e2e8f0",
    accent: "#38bdf8",
};

/// Pick the theme for a condition string. Never fails.
pub fn theme_for(condition: &str) -> &'static ConditionTheme {
    let condition = condition.to_lowercase();
    THEMES
        .iter()
        .find(|theme| theme.keywords.iter().any(|k| condition.contains(k)))
        .unwrap_or(&DEFAULT_THEME)
}

/// Parse "#rrggbb" into components
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}
