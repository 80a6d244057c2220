//! Table rendering functions for the terminal UI.
//!
//! Draws the header with sort indicators and the filter row, the visible
//! window of the current page, the pagination readout and the preview panel.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
};

use crate::column::Column;
use crate::controller::TableView;
use crate::data::Row as DataRow;
use crate::sort::SortState;
use crate::state::{App, AppMode};

/// Width of the preview panel, including borders.
const PREVIEW_WIDTH: u16 = 32;

/// Header height: label line plus filter line.
const HEADER_HEIGHT: u16 = 2;

/// Calculate auto-sized column widths for the given rows.
/// Returns width for each column sized to fit the widest of the label (with
/// its sort indicator), the filter summary and the cells, + 1 for padding.
pub(crate) fn calculate_auto_widths(
    columns: &[Column],
    rows: &[&DataRow],
    filter_summaries: &[String],
) -> Vec<u16> {
    let mut widths: Vec<usize> = columns
        .iter()
        .map(|c| c.label.chars().count() + 1 + SortState::None.indicator().chars().count())
        .collect();

    for (i, summary) in filter_summaries.iter().enumerate().take(widths.len()) {
        widths[i] = widths[i].max(summary.chars().count());
    }

    for row in rows {
        for (i, width) in widths.iter_mut().enumerate() {
            *width = (*width).max(row.value(i).to_string().chars().count());
        }
    }

    widths.iter().map(|w| (*w + 1).min(u16::MAX as usize) as u16).collect()
}

/// Filter-row text for every column, empty where no filter is set.
fn filter_summaries(app: &App) -> Vec<String> {
    app.controller
        .columns()
        .iter()
        .map(|col| {
            app.controller
                .filter_for(&col.key)
                .map(|spec| spec.summary(col.filter_type))
                .unwrap_or_default()
        })
        .collect()
}

/// Build the table title with the pagination readout.
pub fn build_title(view: &TableView) -> String {
    let row_info = if view.filtered_count == view.total_count {
        format!("{} rows", view.total_count)
    } else {
        format!("{} of {} rows", view.filtered_count, view.total_count)
    };
    format!(
        " Page {}/{} | {} per page | {} ",
        view.current_page, view.total_pages, view.page_size, row_info
    )
}

/// Build the controls hint shown in the bottom bar.
pub fn build_controls_hint() -> String {
    "j/k: row, h/l: column, s: sort, /: filter, x: clear, r: reset, n/p: page, :: go to, z: size, q: quit"
        .to_string()
}

/// Draw a full frame. Also reports the body height to the controller and
/// records the body area for mouse hit tests.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let vertical = Layout::vertical([Constraint::Min(HEADER_HEIGHT + 3), Constraint::Length(3)])
        .split(frame.area());
    let horizontal = Layout::horizontal([Constraint::Min(20), Constraint::Length(PREVIEW_WIDTH)])
        .split(vertical[0]);
    let table_area = horizontal[0];

    // Body sits inside the border, below the two-line header
    let inner = Block::default().borders(Borders::ALL).inner(table_area);
    let body_height = inner.height.saturating_sub(HEADER_HEIGHT);
    app.body_area = Rect {
        x: inner.x,
        y: inner.y + HEADER_HEIGHT.min(inner.height),
        width: inner.width,
        height: body_height,
    };
    app.controller.set_viewport_height(body_height as usize);

    let summaries = filter_summaries(app);
    let view = app.controller.view();
    render_table(frame, table_area, &view, &summaries, app.focused_col);
    render_preview(frame, horizontal[1], &view);

    match app.mode {
        AppMode::Normal => {
            let text = app.status_message.clone().unwrap_or_else(build_controls_hint);
            let bar = Paragraph::new(text)
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(bar, vertical[1]);
        }
        mode => {
            let label = view
                .columns
                .get(app.focused_col)
                .map(|c| c.label.as_str())
                .unwrap_or("");
            render_input_bar(frame, vertical[1], mode, &app.input_buffer, label);
        }
    }
}

/// Render the table pane: header, filter row and visible body rows.
pub fn render_table(
    frame: &mut Frame,
    area: Rect,
    view: &TableView,
    summaries: &[String],
    focused_col: usize,
) {
    let widths: Vec<Constraint> = calculate_auto_widths(view.columns, &view.rows, summaries)
        .into_iter()
        .map(Constraint::Length)
        .collect();

    let header_cells: Vec<Cell> = view
        .columns
        .iter()
        .enumerate()
        .map(|(i, col)| {
            let state = view.sort_state_of(i);
            let mut style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
            if i == focused_col {
                style = style.fg(Color::Cyan);
            }
            let summary = summaries.get(i).cloned().unwrap_or_default();
            Cell::from(Text::from(vec![
                Line::from(format!("{} {}", col.label, state.indicator())),
                Line::from(summary).style(Style::default().fg(Color::Green)),
            ]))
            .style(style)
        })
        .collect();
    let header_row = Row::new(header_cells).height(HEADER_HEIGHT);

    let height = area.height.saturating_sub(2 + HEADER_HEIGHT) as usize;
    let data_rows: Vec<Row> = view
        .rows
        .iter()
        .enumerate()
        .skip(view.viewport.offset)
        .take(height)
        .map(|(i, row)| {
            let cells: Vec<Cell> = (0..view.columns.len())
                .map(|c| Cell::from(row.value(c).to_string()))
                .collect();
            let row_widget = Row::new(cells);
            if i == view.selected_index {
                row_widget.style(Style::default().add_modifier(Modifier::REVERSED))
            } else {
                row_widget
            }
        })
        .collect();

    let table = Table::new(data_rows, widths).header(header_row).block(
        Block::default()
            .title(build_title(view))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );

    frame.render_widget(table, area);
}

/// Render the preview panel for the selected row.
pub fn render_preview(frame: &mut Frame, area: Rect, view: &TableView) {
    let mut lines = vec![Line::from(vec![
        Span::styled("Preview: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(if view.preview.is_empty() {
            "(none)".to_string()
        } else {
            view.preview.clone()
        }),
    ])];

    if let Some(row) = view.rows.get(view.selected_index) {
        lines.push(Line::from(""));
        for (i, col) in view.columns.iter().enumerate() {
            lines.push(Line::from(vec![
                Span::styled(format!("{}: ", col.label), Style::default().fg(Color::Yellow)),
                Span::raw(row.value(i).to_string()),
            ]));
        }
    }

    let panel = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().title(" Selected ").borders(Borders::ALL));
    frame.render_widget(panel, area);
}

/// Render input bar for filter/page/page-size modes.
pub fn render_input_bar(
    frame: &mut Frame,
    area: Rect,
    mode: AppMode,
    input_buffer: &str,
    column_label: &str,
) {
    let (prefix, style) = match mode {
        AppMode::FilterInput => (
            format!("/{} (Tab: values): ", column_label),
            Style::default().fg(Color::Yellow),
        ),
        AppMode::PageInput => ("Page: ".to_string(), Style::default().fg(Color::Cyan)),
        AppMode::PageSizeInput => ("Rows per page: ".to_string(), Style::default().fg(Color::Green)),
        AppMode::Normal => (String::new(), Style::default()),
    };

    let input_widget = Paragraph::new(format!("{}{}", prefix, input_buffer))
        .style(style)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(input_widget, area);
}
