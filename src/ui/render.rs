// src/ui/render.rs

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    prelude::{Backend, Frame},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};

use crate::types::LineKind;

use super::model::{Phase, UiModel, ViewLine};

pub(super) const MIN_WIDTH: u16 = 80;
pub(super) const MIN_HEIGHT: u16 = 20;
const MIN_LEFT_WIDTH: u16 = 40;
/// Rows outside the output viewport: two panel borders and the shortcut line.
pub(super) const CHROME_ROWS: u16 = 3;

const LAVENDER: Color = Color::Rgb(0xcb, 0xa6, 0xf7);
const BLUE: Color = Color::Rgb(0x89, 0xb4, 0xfa);
const GREEN: Color = Color::Rgb(0xa6, 0xe3, 0xa1);
const RED: Color = Color::Rgb(0xf3, 0x8b, 0xa8);
const YELLOW: Color = Color::Rgb(0xf9, 0xe2, 0xaf);
const SUBTEXT: Color = Color::Rgb(0xa6, 0xad, 0xc8);
const SURFACE1: Color = Color::Rgb(0x58, 0x5b, 0x70);
const SURFACE2: Color = Color::Rgb(0x6c, 0x70, 0x86);

pub fn draw_frame<B: Backend>(f: &mut Frame<'_, B>, model: &UiModel) {
    let size = f.size();
    if size.width < MIN_WIDTH || size.height < MIN_HEIGHT {
        let warning = Paragraph::new("Terminal too small (minimum 80x20)")
            .alignment(Alignment::Center)
            .style(Style::default().fg(RED));
        f.render_widget(warning, size);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(size);
    let (body, footer) = match rows.as_ref() {
        [a, b] => (*a, *b),
        _ => return,
    };

    let left_width = left_panel_width(model, size.width);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(left_width), Constraint::Min(0)])
        .split(body);
    let (left, right) = match columns.as_ref() {
        [a, b] => (*a, *b),
        _ => return,
    };

    render_status_panel(f, model, left);
    render_output_panel(f, model, right);

    let shortcuts = Paragraph::new(model.shortcuts())
        .alignment(Alignment::Center)
        .style(Style::default().fg(SURFACE2));
    f.render_widget(shortcuts, footer);
}

/// Height available for output lines inside the right panel.
pub(super) fn output_view_height(total_height: u16) -> usize {
    usize::from(total_height.saturating_sub(CHROME_ROWS))
}

/// First terminal column of the output panel for a terminal `width` wide.
pub(super) fn output_panel_column(model: &UiModel, width: u16) -> u16 {
    left_panel_width(model, width)
}

fn panel_block(title: &str, color: Color) -> Block<'_> {
    Block::default()
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(SURFACE1))
}

fn left_panel_width(model: &UiModel, total: u16) -> u16 {
    let widest = left_lines_text(model)
        .iter()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0);
    let wanted = u16::try_from(widest.saturating_add(4)).unwrap_or(u16::MAX);
    wanted.max(MIN_LEFT_WIDTH).min(total / 2)
}

fn left_lines_text(model: &UiModel) -> Vec<String> {
    let mut lines = vec![model.config().display_command()];
    lines.extend(model.calibration_warning().map(str::to_string));
    if let Some(phrase) = &model.config().phrase {
        lines.push(format!("Phrase: \"{phrase}\""));
    }
    lines.extend(model.config_lines());
    lines.push(model.status_line());
    lines.extend(model.timing_lines());
    lines
}

fn render_status_panel<B: Backend>(f: &mut Frame<'_, B>, model: &UiModel, area: Rect) {
    let block = panel_block("chrono", LAVENDER);

    let mut lines: Vec<Line<'_>> = Vec::new();
    if let Some(err) = model.error() {
        lines.push(Line::from(Span::styled(
            format!("Error: {err}"),
            Style::default().fg(RED).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
    }
    if let Some(warning) = model.calibration_warning() {
        lines.push(Line::from(Span::styled(
            warning,
            Style::default().fg(YELLOW).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
    }

    let command_style = Style::default().fg(BLUE).add_modifier(Modifier::BOLD);
    lines.push(Line::from(Span::styled(
        model.config().display_command(),
        command_style,
    )));
    if let Some(phrase) = &model.config().phrase {
        lines.push(Line::from(Span::styled(
            format!("Phrase: \"{phrase}\""),
            command_style,
        )));
    }
    lines.push(Line::from(""));

    for line in model.config_lines() {
        lines.push(Line::from(Span::styled(line, Style::default().fg(SUBTEXT))));
    }
    lines.push(Line::from(""));

    let status_color = match model.phase() {
        Phase::Calibrating => LAVENDER,
        Phase::Warmup => YELLOW,
        Phase::Benchmarking => BLUE,
        Phase::Completed => GREEN,
    };
    lines.push(Line::from(Span::styled(
        model.status_line(),
        Style::default().fg(status_color).add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));

    for line in model.timing_lines() {
        let style = if line.ends_with("timeout") {
            Style::default().fg(RED)
        } else if line.starts_with("Final Results") {
            Style::default().fg(GREEN).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(line, style)));
    }

    if model.dropped_lines() > 0 {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("{} output lines skipped", model.dropped_lines()),
            Style::default().fg(SURFACE2),
        )));
    }

    let panel = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(panel, area);
}

fn render_output_panel<B: Backend>(f: &mut Frame<'_, B>, model: &UiModel, area: Rect) {
    let title = if model.is_following() {
        "Output"
    } else {
        "Output (scrolled)"
    };
    let block = panel_block(title, BLUE);
    let inner_height = usize::from(area.height.saturating_sub(2));

    let lines: Vec<Line<'_>> = model
        .visible_output(inner_height)
        .into_iter()
        .map(|line| Line::from(Span::styled(line.to_string(), view_line_style(line))))
        .collect();

    let panel = Paragraph::new(lines).block(block);
    f.render_widget(panel, area);
}

fn view_line_style(line: &ViewLine) -> Style {
    match line {
        ViewLine::Output(output) => match output.kind {
            LineKind::MatchMarker => Style::default().fg(GREEN).add_modifier(Modifier::BOLD),
            LineKind::Stderr => Style::default().fg(YELLOW),
            LineKind::Stdout => Style::default(),
        },
        ViewLine::RunHeader(_) => Style::default().fg(LAVENDER).add_modifier(Modifier::BOLD),
        ViewLine::Blank => Style::default(),
    }
}
