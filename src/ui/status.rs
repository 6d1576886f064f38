use crate::app::{App, View};
use crate::util::single_line;
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

/// Render the status bar.
///
/// Shows the latest status message (usually the spoken form of the focused
/// element) and falls back to key hints for the current view.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        single_line(msg.as_ref())
    } else {
        match app.view {
            View::List => Cow::Borrowed(
                "[j/k]move [Tab]focus [Enter]open [1-5]rate [a]action [r]eload [?]help [q]uit",
            ),
            View::Detail => Cow::Borrowed("[b]ack [j/k]scroll [r]eload [?]help [q]uit"),
        }
    };

    let paragraph = Paragraph::new(text).style(app.style("status_bar"));
    f.render_widget(paragraph, area);
}
