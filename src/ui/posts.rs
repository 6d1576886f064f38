use crate::accessibility::spoken_date;
use crate::app::{App, Focus};
use crate::feed::{LoadState, Post};
use crate::rating::Rating;
use crate::util::{single_line, truncate_to_width};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

/// Loading spinner animation frames.
pub(super) const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

fn border_style(app: &App, focused: bool) -> ratatui::style::Style {
    if focused {
        app.style("panel_border_focused")
    } else {
        app.style("panel_border")
    }
}

/// Render the star rating control.
pub fn render_rating(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let focused = app.focus == Focus::Rating;
    let mut spans: Vec<Span> = (Rating::MIN..=Rating::MAX)
        .map(|i| {
            let star = if app.rating.is_filled(i) { "★ " } else { "☆ " };
            Span::styled(star, app.style("rating_star"))
        })
        .collect();
    spans.push(Span::styled(
        format!(" {}", app.rating),
        app.style("rating_label"),
    ));

    let title = if focused {
        " Rating (←/→, 1-5) "
    } else {
        " Rating "
    };

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style(app, focused))
            .title(title),
    );
    f.render_widget(paragraph, area);
}

/// Render the post list, or the loading/error/empty placeholder.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let focused = app.focus == Focus::Posts;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(app, focused))
        .title(" Posts ");

    let posts = match app.loader.state() {
        LoadState::Loading => {
            let text = format!("{} Loading...", SPINNER[app.spinner_frame % SPINNER.len()]);
            f.render_widget(
                Paragraph::new(text).style(app.style("loading")).block(block),
                area,
            );
            return;
        }
        LoadState::Failed(message) => {
            let lines = vec![
                Line::from(Span::styled(
                    format!("Error loading: {}", single_line(message)),
                    app.style("error"),
                )),
                Line::from(""),
                Line::from(Span::styled("Press r to retry", app.style("post_byline"))),
            ];
            f.render_widget(
                Paragraph::new(lines)
                    .wrap(Wrap { trim: false })
                    .block(block),
                area,
            );
            return;
        }
        LoadState::Loaded(posts) if posts.is_empty() => {
            f.render_widget(Paragraph::new("No posts").block(block), area);
            return;
        }
        LoadState::Loaded(posts) => posts,
    };

    // Leave room for borders and the highlight marker
    let max_width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = posts
        .iter()
        .map(|post| post_item(app, post, max_width))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(app.style("post_selected"))
        .highlight_symbol("> ");

    let mut state = ListState::default().with_selected(Some(app.selected));
    f.render_stateful_widget(list, area, &mut state);
}

/// Two-line row: title, then the byline.
fn post_item(app: &App, post: &Post, max_width: usize) -> ListItem<'static> {
    let title = single_line(&post.title);
    let title = truncate_to_width(&title, max_width).into_owned();

    let byline = format!("by u/{} on {}", single_line(&post.author), spoken_date(&post.created_at));
    let byline = truncate_to_width(&byline, max_width).into_owned();

    ListItem::new(vec![
        Line::from(Span::styled(title, app.style("post_title"))),
        Line::from(Span::styled(byline, app.style("post_byline"))),
    ])
}
