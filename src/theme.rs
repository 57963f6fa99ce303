//! Colour themes built from the Catppuccin palette.

use catppuccin::PALETTE;
use ratatui::style::Color;

const fn rgb(c: &catppuccin::Color) -> Color {
    Color::Rgb(c.rgb.r, c.rgb.g, c.rgb.b)
}

/// Generates the palette struct, its Catppuccin constructor and one accessor per colour.
macro_rules! palette {
    ($($name:ident),+ $(,)?) => {
        /// Resolved colours of one flavor.
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct Theme {
            $($name: Color,)+
        }

        impl Theme {
            const fn from_flavor(flavor: &catppuccin::Flavor) -> Self {
                Self {
                    $($name: rgb(&flavor.colors.$name),)+
                }
            }

            $(
                #[must_use]
                pub const fn $name(&self) -> Color {
                    self.$name
                }
            )+
        }
    };
}

palette!(
    base, mantle, surface0, surface1, surface2, overlay0, overlay1, text, subtext0, subtext1,
    mauve, red, peach, yellow, green, sky, lavender,
);

impl Theme {
    /// Lost reports, errors and destructive actions.
    #[must_use]
    pub const fn error(&self) -> Color {
        self.red
    }

    /// Found reports and confirmations.
    #[must_use]
    pub const fn success(&self) -> Color {
        self.green
    }

    #[must_use]
    pub const fn warning(&self) -> Color {
        self.yellow
    }

    #[must_use]
    pub const fn border(&self) -> Color {
        self.surface1
    }

    #[must_use]
    pub const fn border_focused(&self) -> Color {
        self.lavender
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
        Self::from_flavor(&PALETTE.mocha)
    }
}

/// A named theme as listed in the theme selector.
#[derive(Debug, Clone)]
pub struct ThemeInfo {
    pub name: &'static str,
    pub theme: Theme,
}

/// Built-in themes, dark flavors first.
pub fn available_themes() -> Vec<ThemeInfo> {
    [
        ("Catppuccin Mocha", &PALETTE.mocha),
        ("Catppuccin Macchiato", &PALETTE.macchiato),
        ("Catppuccin Frappé", &PALETTE.frappe),
        ("Catppuccin Latte", &PALETTE.latte),
    ]
    .into_iter()
    .map(|(name, flavor)| ThemeInfo {
        name,
        theme: Theme::from_flavor(flavor),
    })
    .collect()
}

/// Look up a theme by name, falling back to Mocha.
pub fn theme_from_name(name: &str) -> Theme {
    available_themes()
        .into_iter()
        .find(|info| info.name == name)
        .map(|info| info.theme)
        .unwrap_or_default()
}
