/// Closed visual palette the model is allowed to pick from. Theme names
/// arriving from anywhere else are coerced onto this table, so the hex pairs
/// here are the only ones that ever reach a stored form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThemePalette {
    pub name: &'static str,
    pub primary_color: &'static str,
    pub background_color: &'static str,
}

pub const THEME_PALETTE: [ThemePalette; 6] = [
    ThemePalette {
        name: "Indigo",
        primary_color: "#4F46E5",
        background_color: "#EEF2FF",
    },
    ThemePalette {
        name: "Slate",
        primary_color: "#475569",
        background_color: "#F8FAFC",
    },
    ThemePalette {
        name: "Rose",
        primary_color: "#E11D48",
        background_color: "#FFF1F2",
    },
    ThemePalette {
        name: "Amber",
        primary_color: "#D97706",
        background_color: "#FFFBEB",
    },
    ThemePalette {
        name: "Emerald",
        primary_color: "#059669",
        background_color: "#ECFDF5",
    },
    ThemePalette {
        name: "Sky",
        primary_color: "#0284C7",
        background_color: "#F0F9FF",
    },
];

pub const DEFAULT_PALETTE: ThemePalette = THEME_PALETTE[0];

pub fn palette_for(name: &str) -> Option<&'static ThemePalette> {
    THEME_PALETTE
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name.trim()))
}
