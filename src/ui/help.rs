//! Help overlay listing every keybinding, grouped by where it applies.
//!
//! Reflects user overrides from config since it reads the live registry.

use crate::app::App;
use crate::keybindings::{Context, KeybindingRegistry};
use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table},
    Frame,
};

/// Context display order and section labels.
const SECTIONS: [(Context, &str); 4] = [
    (Context::Global, "Anywhere"),
    (Context::Rating, "Rating control"),
    (Context::PostList, "Post list"),
    (Context::Detail, "Post detail"),
];

/// One line of the help table.
#[derive(Debug, PartialEq, Eq)]
enum HelpLine {
    Section(&'static str),
    Binding { key: String, description: &'static str },
    Blank,
}

/// Flatten the registry into section headers and binding lines.
fn help_lines(registry: &KeybindingRegistry) -> Vec<HelpLine> {
    let bindings = registry.all_bindings();
    let mut lines = Vec::new();

    for (ctx, label) in SECTIONS {
        let mut section = bindings
            .iter()
            .filter(|(c, _, _, _)| *c == ctx)
            .peekable();
        if section.peek().is_none() {
            continue;
        }

        if !lines.is_empty() {
            lines.push(HelpLine::Blank);
        }
        lines.push(HelpLine::Section(label));
        lines.extend(section.map(|(_, key, _, description)| HelpLine::Binding {
            key: key.clone(),
            description: *description,
        }));
    }

    lines
}

/// Render the help overlay on top of the current view.
pub fn render(f: &mut Frame, app: &App) {
    let overlay = centered_rect(80, 80, f.area());
    if overlay.width < 20 || overlay.height < 6 {
        return;
    }

    f.render_widget(Clear, overlay);

    let lines = help_lines(&app.keybindings);

    let visible_height = overlay.height.saturating_sub(3) as usize; // borders + header
    let max_scroll = lines.len().saturating_sub(visible_height);
    let scroll = app.help_scroll_offset.min(max_scroll);

    let rows: Vec<Row> = lines
        .into_iter()
        .skip(scroll)
        .take(visible_height)
        .map(|line| match line {
            HelpLine::Section(label) => Row::new(vec![
                Line::from(Span::styled(
                    format!("-- {} --", label),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
            ])
            .style(app.style("detail_heading")),
            HelpLine::Binding { key, description } => {
                Row::new(vec![format!("  {}", key), description.to_string()])
            }
            HelpLine::Blank => Row::new(vec![String::new(), String::new()]),
        })
        .collect();

    let title = if max_scroll > 0 {
        format!(" Help ({}/{}) ", scroll + 1, max_scroll + 1)
    } else {
        " Help (? to close) ".to_string()
    };

    let table = Table::new(rows, [Constraint::Length(16), Constraint::Min(20)])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("panel_border_focused"))
                .title(title),
        )
        .header(
            Row::new(vec!["Key", "Action"])
                .style(Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED))
                .bottom_margin(1),
        )
        .style(app.style("detail_body"));

    f.render_widget(table, overlay);

    if scroll < max_scroll {
        let hint_area = Rect {
            x: overlay.x + 1,
            y: overlay.y + overlay.height.saturating_sub(1),
            width: overlay.width.saturating_sub(2),
            height: 1,
        };
        f.render_widget(
            Paragraph::new(Span::styled(
                " j/k to scroll, ? or Esc to close ",
                app.style("detail_metadata"),
            )),
            hint_area,
        );
    }
}

/// Create a centered rectangle with the given percentage of the parent area.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = area.width * percent_x / 100;
    let height = area.height * percent_y / 100;
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_in_order() {
        let lines = help_lines(&KeybindingRegistry::new());
        let sections: Vec<&str> = lines
            .iter()
            .filter_map(|l| match l {
                HelpLine::Section(s) => Some(*s),
                _ => None,
            })
            .collect();
        assert_eq!(
            sections,
            vec!["Anywhere", "Rating control", "Post detail"]
        );
        assert_eq!(lines[0], HelpLine::Section("Anywhere"));
    }

    #[test]
    fn test_override_shows_in_help() {
        let mut registry = KeybindingRegistry::new();
        registry.apply_overrides(&std::collections::HashMap::from([(
            "refresh".to_string(),
            "F5".to_string(),
        )]));
        let lines = help_lines(&registry);
        assert!(lines.contains(&HelpLine::Binding {
            key: "F5".to_string(),
            description: "Reload the feed",
        }));
    }

    #[test]
    fn test_centered_rect() {
        let r = centered_rect(50, 50, Rect::new(0, 0, 100, 40));
        assert_eq!(r, Rect::new(25, 10, 50, 20));
    }
}
