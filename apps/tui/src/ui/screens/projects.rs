use crate::app::store::ViewerState;
use crate::app::{App, ProjectFocus};
use crate::ui::widgets::status::{render_error, render_loading};
use crate::ui::widgets::tables::{optional_value, scroll_offset};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

fn selected_style() -> Style {
    Style::default()
        .bg(Color::Rgb(0, 0, 238))
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    }
}

pub fn render_projects(app: &App, f: &mut Frame<'_>, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(area);

    render_project_list(app, f, columns[0]);
    render_site_list(app, f, columns[1]);
}

fn render_project_list(app: &App, f: &mut Frame<'_>, area: Rect) {
    match &app.context.projects {
        ViewerState::Loading => return render_loading(app, f, area, "Projects"),
        ViewerState::Failed(code) => return render_error(f, area, *code),
        ViewerState::Idle | ViewerState::Ready(_) => {}
    }

    let focused = app.project_focus == ProjectFocus::Projects;
    let projects = app.project_list();
    let max_visible_rows = area.height.saturating_sub(3) as usize;
    let offset = scroll_offset(projects.len(), max_visible_rows, app.selected_project_index);

    let rows = projects
        .iter()
        .enumerate()
        .skip(offset)
        .take(max_visible_rows)
        .map(|(index, (id, name))| {
            let active = app.context.project_id.as_deref() == Some(id.as_str());
            let style = if focused && index == app.selected_project_index {
                selected_style()
            } else if active {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            Row::new(vec![Cell::from(id.clone()), Cell::from(name.clone())]).style(style)
        });

    let table = Table::new(rows, [Constraint::Length(12), Constraint::Min(10)])
        .header(
            Row::new(vec![Cell::from("ID"), Cell::from("Name")])
                .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        )
        .block(
            Block::default()
                .title(format!("Projects ({})", projects.len()))
                .borders(Borders::ALL)
                .border_style(border_style(focused)),
        );

    f.render_widget(table, area);
}

fn render_site_list(app: &App, f: &mut Frame<'_>, area: Rect) {
    let metadata = match &app.context.metadata {
        ViewerState::Idle => {
            let paragraph = Paragraph::new("Select a project to list its sites")
                .block(Block::default().title("Sites").borders(Borders::ALL))
                .alignment(ratatui::layout::Alignment::Center);
            f.render_widget(paragraph, area);
            return;
        }
        ViewerState::Loading => return render_loading(app, f, area, "Sites"),
        ViewerState::Failed(code) => return render_error(f, area, *code),
        ViewerState::Ready(metadata) => metadata,
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(3)])
        .split(area);

    let focused = app.project_focus == ProjectFocus::Sites;
    let site_ids = app.visible_sites();
    let max_visible_rows = chunks[0].height.saturating_sub(3) as usize;
    let offset = scroll_offset(site_ids.len(), max_visible_rows, app.selected_site_index);

    let rows = site_ids
        .iter()
        .enumerate()
        .skip(offset)
        .take(max_visible_rows)
        .filter_map(|(index, id)| {
            let site = metadata.sites.0.get(id)?;
            let active = app.context.station_id.as_deref() == Some(id.as_str());
            let style = if focused && index == app.selected_site_index {
                selected_style()
            } else if active {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            Some(
                Row::new(vec![
                    Cell::from(id.clone()),
                    Cell::from(site.name.clone()),
                    Cell::from(format!("{:.4}", site.lat)),
                    Cell::from(format!("{:.4}", site.lon)),
                    Cell::from(optional_value(site.vs30, 0)),
                ])
                .style(style),
            )
        });

    let widths = [
        Constraint::Length(10),
        Constraint::Min(16),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(6),
    ];
    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["Station", "Name", "Lat", "Lon", "Vs30"])
                .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        )
        .block(
            Block::default()
                .title(format!(
                    "Sites ({} of {})",
                    site_ids.len(),
                    metadata.sites.0.len()
                ))
                .borders(Borders::ALL)
                .border_style(border_style(focused)),
        );
    f.render_widget(table, chunks[0]);

    let search_style = if app.search_active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let search = Paragraph::new(TextLine::from(vec![
        Span::styled("/ ", search_style),
        Span::raw(app.search_query.clone()),
        Span::styled(if app.search_active { "_" } else { "" }, search_style),
    ]))
    .block(
        Block::default()
            .title("Filter")
            .borders(Borders::ALL)
            .border_style(search_style),
    );
    f.render_widget(search, chunks[1]);
}
