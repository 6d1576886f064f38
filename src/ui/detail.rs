use crate::accessibility::spoken_date;
use crate::app::{App, MAX_SCROLL};
use crate::util::{display_width, single_line};
use ratatui::{
    layout::Rect,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Render the detail view for the selected post
pub fn render(f: &mut Frame, app: &mut App, area: Rect) {
    // Guard against zero-sized rects during extreme terminal resizes
    if area.width < 3 || area.height < 3 {
        return;
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.style("panel_border_focused"))
        .title(" Post ");

    let Some(post) = app.selected_post() else {
        f.render_widget(Paragraph::new("No post selected").block(block), area);
        return;
    };

    let image_line = match &post.thumbnail_url {
        Some(url) => Line::from(vec![
            Span::styled("Image: ", app.style("detail_metadata")),
            Span::styled(url.to_string(), app.style("detail_link")),
        ]),
        None => Line::from(Span::styled(
            "No image available",
            app.style("detail_metadata"),
        )),
    };

    let lines = vec![
        Line::from(Span::styled(
            single_line(&post.title).into_owned(),
            app.style("detail_heading"),
        )),
        Line::from(Span::styled(
            format!(
                "by u/{} on {}",
                single_line(&post.author),
                spoken_date(&post.created_at)
            ),
            app.style("detail_metadata"),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Link: ", app.style("detail_metadata")),
            Span::styled(post.identity.to_string(), app.style("detail_link")),
        ]),
        image_line,
    ];

    // Clamp before rendering so a resize never shows an invalid offset
    let viewport_width = area.width.saturating_sub(2) as usize;
    let visible_lines = area.height.saturating_sub(2) as usize;
    let content_lines = lines
        .iter()
        .map(|l| wrapped_line_count(l, viewport_width))
        .sum();
    app.clamp_scroll(content_lines, visible_lines);

    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .style(app.style("detail_body"))
        .wrap(Wrap { trim: false })
        .scroll((app.scroll_offset.min(MAX_SCROLL) as u16, 0));

    f.render_widget(paragraph, area);
}

/// Number of display rows a line occupies once wrapped.
fn wrapped_line_count(line: &Line<'_>, viewport_width: usize) -> usize {
    if viewport_width == 0 {
        return 1;
    }
    let width: usize = line.spans.iter().map(|s| display_width(&s.content)).sum();
    width.div_ceil(viewport_width).max(1)
}
