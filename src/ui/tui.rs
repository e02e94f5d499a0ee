use std::io;

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::Paragraph;
use ratatui::{DefaultTerminal, Frame};

use crate::event::KeyListener;
use crate::format::truncate_unicode;
use crate::shutdown::Shutdown;
use crate::system::sampler::Renderer;
use crate::system::snapshot::{HostIdentity, UtilizationSnapshot};
use crate::ui::screen::{self, Paint, Placed, Tone};
use crate::ui::theme::Theme;

pub struct TuiRenderer {
    terminal: Option<DefaultTerminal>,
    keys: Option<KeyListener>,
    theme: Theme,
}

impl TuiRenderer {
    pub fn new(theme: Theme, shutdown: Shutdown) -> io::Result<Self> {
        let terminal = ratatui::try_init()?;
        Ok(Self {
            terminal: Some(terminal),
            keys: Some(KeyListener::spawn(shutdown)),
            theme,
        })
    }

    fn draw_lines(&mut self, lines: &[Placed]) -> io::Result<()> {
        let theme = &self.theme;
        if let Some(terminal) = self.terminal.as_mut() {
            terminal.draw(|frame| draw(frame, lines, theme))?;
        }
        Ok(())
    }
}

impl Renderer for TuiRenderer {
    fn start(&mut self, host: &HostIdentity) -> io::Result<()> {
        self.draw_lines(&screen::waiting_layout(host))
    }

    fn render(&mut self, host: &HostIdentity, snapshot: &UtilizationSnapshot) -> io::Result<()> {
        self.draw_lines(&screen::layout(host, snapshot))
    }

    fn finish(&mut self) -> io::Result<()> {
        self.keys = None;
        if self.terminal.take().is_some() {
            ratatui::try_restore()?;
        }
        Ok(())
    }
}

impl Drop for TuiRenderer {
    fn drop(&mut self) {
        if self.terminal.take().is_some() {
            ratatui::restore();
        }
    }
}

fn style_for(paint: Paint, theme: &Theme) -> Style {
    match paint {
        Paint::Plain(Tone::Title) => Style::default()
            .fg(theme.title)
            .add_modifier(Modifier::BOLD),
        Paint::Plain(Tone::Label) => Style::default().fg(theme.label),
        Paint::Plain(Tone::Muted) => Style::default().fg(theme.muted),
        Paint::Heat(pct) => Style::default().fg(theme.heat(pct)),
    }
}

/// Paints positioned text into the frame. Anything outside the frame is
/// clipped; text running past the right edge is truncated.
pub fn draw(frame: &mut Frame, lines: &[Placed], theme: &Theme) {
    let area = frame.area();
    for placed in lines {
        if placed.row >= area.height || placed.col >= area.width {
            continue;
        }
        let width = area.width - placed.col;
        let rect = Rect::new(area.x + placed.col, area.y + placed.row, width, 1);
        let text = truncate_unicode(&placed.text, width as usize);
        let span = Span::styled(text, style_for(placed.paint, theme));
        frame.render_widget(Paragraph::new(span), rect);
    }
}
