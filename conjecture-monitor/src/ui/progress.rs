//! Step checklist and connection status panel

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

use conjecture_client::{ConnectionStatus, StepStatus};

use crate::app::App;

pub fn render_progress(f: &mut Frame, area: Rect, app: &App) {
    let session = app.monitor.session();

    let block = Block::default().borders(Borders::ALL).title(format!(
        " Phase {}: {} ",
        session.phase.number(),
        session.phase.title()
    ));
    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let mut items: Vec<ListItem> = session
        .steps
        .iter()
        .map(|step| {
            let (symbol, color) = match step.status {
                StepStatus::Pending => ("-", Color::DarkGray),
                StepStatus::Running => (">", Color::Yellow),
                StepStatus::Complete => ("+", Color::Green),
                StepStatus::Error => ("x", Color::Red),
            };

            let mut title = vec![
                Span::styled(format!(" {symbol} "), Style::default().fg(color)),
                Span::styled(
                    step.name,
                    Style::default()
                        .fg(if step.status == StepStatus::Running {
                            Color::White
                        } else {
                            Color::Gray
                        })
                        .add_modifier(if step.status == StepStatus::Running {
                            Modifier::BOLD
                        } else {
                            Modifier::empty()
                        }),
                ),
            ];
            if let Some(progress) = step.progress {
                title.push(Span::styled(
                    format!("  {progress}%"),
                    Style::default().fg(Color::Yellow),
                ));
            }

            let mut lines = vec![Line::from(title)];
            if let Some(message) = &step.message {
                lines.push(Line::from(Span::styled(
                    format!("     {message}"),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            ListItem::new(lines)
        })
        .collect();

    items.push(ListItem::new(Line::from("")));

    let mut info = vec![Span::styled(
        format!(" iteration {}", session.iteration),
        Style::default().fg(Color::DarkGray),
    )];
    if let Some(critic_status) = &session.artifacts.critic_status {
        info.push(Span::raw("   "));
        info.push(Span::styled(
            format!("critic: {critic_status}"),
            Style::default().fg(if critic_status == "PASS" {
                Color::Green
            } else {
                Color::Yellow
            }),
        ));
    }
    items.push(ListItem::new(Line::from(info)));

    let (connection, color) = match app.monitor.status() {
        ConnectionStatus::Idle => ("idle", Color::DarkGray),
        ConnectionStatus::Connecting => ("connecting...", Color::Yellow),
        ConnectionStatus::Connected => ("connected", Color::Green),
        ConnectionStatus::Disconnected => ("disconnected", Color::DarkGray),
    };
    let mut connection_line = vec![Span::styled(
        format!(" * {connection}"),
        Style::default().fg(color),
    )];
    if let Some(at) = &app.last_update {
        connection_line.push(Span::styled(
            format!("   last event {}", at.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ));
    }
    items.push(ListItem::new(Line::from(connection_line)));

    f.render_widget(List::new(items), inner_area);
}
