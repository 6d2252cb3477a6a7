use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ThemeVariant {
    #[default]
    Light,
    Dark,
}

/// Style palette applied to renderer-retained grid chrome.
#[derive(Clone, Debug, PartialEq)]
pub struct Theme {
    pub variant: ThemeVariant,
    pub text_primary: Style,
    pub text_muted: Style,
    pub header: Style,
    pub row: Style,
    pub row_alt: Style,
    pub selected_cell: Style,
    pub selected_row: Style,
    pub checkbox: Style,
    pub chip: Style,
    pub chip_active: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

impl Theme {
    pub fn light() -> Self {
        Self {
            variant: ThemeVariant::Light,
            text_primary: Style::default(),
            text_muted: Style::default().fg(Color::DarkGray),
            header: Style::default().add_modifier(Modifier::BOLD),
            row: Style::default(),
            row_alt: Style::default().fg(Color::Gray),
            selected_cell: Style::default().bg(Color::Blue).fg(Color::White),
            selected_row: Style::default().bg(Color::Blue).fg(Color::White),
            checkbox: Style::default().fg(Color::DarkGray),
            chip: Style::default().fg(Color::Blue),
            chip_active: Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        }
    }

    pub fn dark() -> Self {
        Self {
            variant: ThemeVariant::Dark,
            text_primary: Style::default().fg(Color::White).bg(Color::Black),
            text_muted: Style::default().fg(Color::Gray).bg(Color::Black),
            header: Style::default()
                .fg(Color::White)
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
            row: Style::default().fg(Color::White).bg(Color::Black),
            row_alt: Style::default().fg(Color::White).bg(Color::DarkGray),
            selected_cell: Style::default().bg(Color::LightBlue).fg(Color::Black),
            selected_row: Style::default().bg(Color::LightBlue).fg(Color::Black),
            checkbox: Style::default().fg(Color::Gray).bg(Color::Black),
            chip: Style::default().fg(Color::LightBlue).bg(Color::Black),
            chip_active: Style::default()
                .fg(Color::Black)
                .bg(Color::LightBlue)
                .add_modifier(Modifier::BOLD),
        }
    }

    pub fn for_variant(variant: ThemeVariant) -> Self {
        match variant {
            ThemeVariant::Light => Self::light(),
            ThemeVariant::Dark => Self::dark(),
        }
    }
}

/// Re-applies theme styling to renderer-retained chrome after structural
/// events, because renderer-recreated content reverts to its own defaults.
///
/// Idempotent. The light theme is the renderer default and needs no repaint.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThemeRepainter {
    variant: ThemeVariant,
}

impl ThemeRepainter {
    pub fn new(variant: ThemeVariant) -> Self {
        Self { variant }
    }

    pub fn variant(&self) -> ThemeVariant {
        self.variant
    }

    pub fn repaint<R: crate::adapter::GridRenderer + ?Sized>(&self, renderer: &mut R) {
        if self.variant == ThemeVariant::Light {
            return;
        }
        if !renderer.mounted() {
            log::debug!("repaint skipped: renderer not mounted");
            return;
        }
        renderer.restyle(&Theme::for_variant(self.variant));
    }
}
