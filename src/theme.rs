use catppuccin::PALETTE;
use ratatui::style::Color;
use ratatui::widgets::BorderType;

const fn rgb(c: &catppuccin::Color) -> Color {
    Color::Rgb(c.rgb.r, c.rgb.g, c.rgb.b)
}

/// Colours used across the dashboard and its overlays.
///
/// Only the palette slots the UI actually draws with are kept. Roles such as
/// "backdrop" or "danger" are exposed as methods so widgets never pick raw
/// palette entries for semantic purposes.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub base: Color,
    pub crust: Color,
    pub surface0: Color,
    pub surface1: Color,
    pub overlay0: Color,
    pub overlay1: Color,
    pub text: Color,
    pub subtext0: Color,

    pub mauve: Color,
    pub lavender: Color,
    pub red: Color,
    pub peach: Color,
    pub yellow: Color,
    pub green: Color,
    pub sky: Color,

    pub border_type: BorderType,
}

impl Theme {
    const fn from_catppuccin(flavor: &catppuccin::Flavor) -> Self {
        let c = &flavor.colors;
        Self {
            base: rgb(&c.base),
            crust: rgb(&c.crust),
            surface0: rgb(&c.surface0),
            surface1: rgb(&c.surface1),
            overlay0: rgb(&c.overlay0),
            overlay1: rgb(&c.overlay1),
            text: rgb(&c.text),
            subtext0: rgb(&c.subtext0),
            mauve: rgb(&c.mauve),
            lavender: rgb(&c.lavender),
            red: rgb(&c.red),
            peach: rgb(&c.peach),
            yellow: rgb(&c.yellow),
            green: rgb(&c.green),
            sky: rgb(&c.sky),
            border_type: BorderType::Rounded,
        }
    }

    #[must_use]
    pub fn catppuccin_mocha() -> Self {
        Self::from_catppuccin(&PALETTE.mocha)
    }

    #[must_use]
    pub fn catppuccin_macchiato() -> Self {
        Self::from_catppuccin(&PALETTE.macchiato)
    }

    #[must_use]
    pub fn catppuccin_frappe() -> Self {
        Self::from_catppuccin(&PALETTE.frappe)
    }

    #[must_use]
    pub fn catppuccin_latte() -> Self {
        Self::from_catppuccin(&PALETTE.latte)
    }

    #[must_use]
    pub const fn base(&self) -> Color {
        self.base
    }

    #[must_use]
    pub const fn surface0(&self) -> Color {
        self.surface0
    }

    #[must_use]
    pub const fn overlay0(&self) -> Color {
        self.overlay0
    }

    #[must_use]
    pub const fn overlay1(&self) -> Color {
        self.overlay1
    }

    #[must_use]
    pub const fn text(&self) -> Color {
        self.text
    }

    #[must_use]
    pub const fn subtext0(&self) -> Color {
        self.subtext0
    }

    #[must_use]
    pub const fn mauve(&self) -> Color {
        self.mauve
    }

    #[must_use]
    pub const fn lavender(&self) -> Color {
        self.lavender
    }

    #[must_use]
    pub const fn peach(&self) -> Color {
        self.peach
    }

    #[must_use]
    pub const fn yellow(&self) -> Color {
        self.yellow
    }

    // Dialog kinds
    #[must_use]
    pub const fn info(&self) -> Color {
        self.sky
    }

    #[must_use]
    pub const fn warning(&self) -> Color {
        self.yellow
    }

    #[must_use]
    pub const fn success(&self) -> Color {
        self.green
    }

    #[must_use]
    pub const fn danger(&self) -> Color {
        self.red
    }

    // Overlays
    /// Foreground applied to everything under an open modal.
    #[must_use]
    pub const fn backdrop_fg(&self) -> Color {
        self.overlay0
    }

    #[must_use]
    pub const fn backdrop_bg(&self) -> Color {
        self.crust
    }

    #[must_use]
    pub const fn panel_border(&self) -> Color {
        self.lavender
    }

    // Screen chrome
    #[must_use]
    pub const fn border(&self) -> Color {
        self.surface1
    }

    #[must_use]
    pub const fn selection_bg(&self) -> Color {
        self.surface1
    }

    #[must_use]
    pub const fn header(&self) -> Color {
        self.yellow
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::catppuccin_mocha()
    }
}

/// Names accepted by [`theme_from_name`].
pub const THEME_NAMES: &[&str] = &[
    "Catppuccin Mocha",
    "Catppuccin Macchiato",
    "Catppuccin Frappé",
    "Catppuccin Latte",
];

/// Look up a built-in theme by name, ignoring case.
///
/// Unknown names fall back to the default theme.
pub fn theme_from_name(name: &str) -> Theme {
    let name = name.trim().to_lowercase();
    match name.as_str() {
        "catppuccin macchiato" | "macchiato" => Theme::catppuccin_macchiato(),
        "catppuccin frappé" | "catppuccin frappe" | "frappe" | "frappé" => {
            Theme::catppuccin_frappe()
        }
        "catppuccin latte" | "latte" => Theme::catppuccin_latte(),
        "catppuccin mocha" | "mocha" => Theme::catppuccin_mocha(),
        _ => {
            tracing::warn!(theme = %name, available = ?THEME_NAMES, "Unknown theme, using default");
            Theme::default()
        }
    }
}
