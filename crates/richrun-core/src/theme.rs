use ratatui::style::Style;

/// Terminal styles used when rendering runs with [`crate::text::RichText::render`].
#[derive(Clone, Debug)]
pub struct Theme {
    pub text_primary: Style,
    pub text_muted: Style,
    pub code_inline: Style,
    pub link: Style,
    /// Columns a tab (list indentation unit) expands to.
    pub tab_width: u16,
}

impl Default for Theme {
    fn default() -> Self {
        use ratatui::style::Stylize;

        Self {
            text_primary: Style::default(),
            text_muted: Style::default().dark_gray(),
            code_inline: Style::default().cyan(),
            link: Style::default().cyan().underlined(),
            tab_width: 4,
        }
    }
}
