use crate::config::ThemeName;
use ratatui::style::{Color, Modifier, Style};

/// Color scheme for the dashboard
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: ThemeName,

    pub foreground: Color,
    pub muted: Color,
    pub border: Color,
    pub border_focused: Color,

    pub header_fg: Color,
    pub selected_fg: Color,
    pub selected_bg: Color,
    pub row_alt_bg: Color,

    /// Cycled through for bars, points and boxes
    pub chart_palette: [Color; 6],

    pub success: Color,
    pub error: Color,
    pub warning: Color,
    pub info: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl From<ThemeName> for Theme {
    fn from(name: ThemeName) -> Self {
        match name {
            ThemeName::Dark => Self::dark(),
            ThemeName::Light => Self::light(),
        }
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: ThemeName::Dark,
            foreground: Color::Gray,
            muted: Color::DarkGray,
            border: Color::DarkGray,
            border_focused: Color::Cyan,
            header_fg: Color::Cyan,
            selected_fg: Color::Black,
            selected_bg: Color::Cyan,
            row_alt_bg: Color::Rgb(25, 25, 35),
            chart_palette: [
                Color::Cyan,
                Color::Magenta,
                Color::Yellow,
                Color::Green,
                Color::LightBlue,
                Color::LightRed,
            ],
            success: Color::Green,
            error: Color::Red,
            warning: Color::Yellow,
            info: Color::Blue,
        }
    }

    pub fn light() -> Self {
        Self {
            name: ThemeName::Light,
            foreground: Color::Black,
            muted: Color::Gray,
            border: Color::Gray,
            border_focused: Color::Blue,
            header_fg: Color::Blue,
            selected_fg: Color::White,
            selected_bg: Color::Blue,
            row_alt_bg: Color::Rgb(240, 240, 240),
            chart_palette: [
                Color::Blue,
                Color::Rgb(170, 0, 120),
                Color::Rgb(200, 150, 0),
                Color::Rgb(0, 130, 60),
                Color::Rgb(0, 110, 160),
                Color::Red,
            ],
            success: Color::Rgb(0, 130, 60),
            error: Color::Red,
            // Darker yellow for light backgrounds
            warning: Color::Rgb(200, 150, 0),
            info: Color::Blue,
        }
    }

    /// Palette color for the n-th series, wrapping around
    pub fn series_color(&self, n: usize) -> Color {
        self.chart_palette[n % self.chart_palette.len()]
    }

    pub fn header_style(&self) -> Style {
        Style::default()
            .fg(self.header_fg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn selected_style(&self) -> Style {
        Style::default()
            .fg(self.selected_fg)
            .bg(self.selected_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn normal_style(&self) -> Style {
        Style::default().fg(self.foreground)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn alt_row_style(&self) -> Style {
        Style::default().fg(self.foreground).bg(self.row_alt_bg)
    }

    /// Border style, highlighted when the panel has focus
    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.border_focused)
        } else {
            Style::default().fg(self.border)
        }
    }

    pub fn success_style(&self) -> Style {
        Style::default().fg(self.success)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error).add_modifier(Modifier::BOLD)
    }

    pub fn warning_style(&self) -> Style {
        Style::default().fg(self.warning)
    }

    pub fn info_style(&self) -> Style {
        Style::default().fg(self.info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_from_name() {
        assert_eq!(Theme::from(ThemeName::Dark).name, ThemeName::Dark);
        let light = Theme::from(ThemeName::Light);
        assert_eq!(light.name, ThemeName::Light);
        assert_eq!(light.foreground, Color::Black);
    }

    #[test]
    fn test_series_color_wraps() {
        let theme = Theme::dark();
        assert_eq!(theme.series_color(0), theme.series_color(6));
        assert_ne!(theme.series_color(0), theme.series_color(1));
    }

    #[test]
    fn test_border_style_tracks_focus() {
        let theme = Theme::dark();
        assert_eq!(theme.border_style(true).fg, Some(theme.border_focused));
        assert_eq!(theme.border_style(false).fg, Some(theme.border));
    }

    #[test]
    fn test_selected_style_is_bold() {
        let theme = Theme::light();
        let selected = theme.selected_style();
        assert!(selected.add_modifier.contains(Modifier::BOLD));
        assert_eq!(selected.bg, Some(theme.selected_bg));
    }
}
