//! Rendering for the monitor TUI
//!
//! Strictly declarative: every widget is a projection of the session held by
//! the monitor, nothing here mutates state.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use conjecture_client::Terminal as Outcome;

use crate::app::App;

mod output;
mod progress;

pub use output::render_output;
pub use progress::render_progress;

pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, chunks[0], app);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(38), Constraint::Percentage(62)])
        .split(chunks[1]);
    render_progress(f, body[0], app);
    render_output(f, body[1], app);

    render_footer(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let session = app.monitor.session();
    let mut spans = vec![
        Span::styled(
            "Conjecture Monitor",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
    ];
    if let Some(job_id) = &session.job_id {
        spans.push(Span::styled(
            format!("job {job_id}"),
            Style::default().fg(Color::DarkGray),
        ));
        spans.push(Span::raw("   "));
    }
    match &session.terminal {
        Outcome::None => {}
        Outcome::Completed => {
            let verdict = session
                .quality
                .as_ref()
                .and_then(|q| {
                    q.score.map(|score| {
                        let category = q
                            .category
                            .map(|c| c.as_str())
                            .unwrap_or("unrated");
                        format!("complete ({score:.1}, {category})")
                    })
                })
                .unwrap_or_else(|| "complete".to_string());
            spans.push(Span::styled(verdict, Style::default().fg(Color::Green)));
        }
        Outcome::Errored(_) => {
            spans.push(Span::styled("failed", Style::default().fg(Color::Red)));
        }
    }

    let header = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let session = app.monitor.session();

    let line = if let Some(decision) = &session.pending_decision {
        let mut spans = vec![
            Span::styled(
                "Action required: ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(decision.prompt.clone(), Style::default().fg(Color::Yellow)),
            Span::raw("  "),
        ];
        for (i, option) in decision.options.iter().enumerate() {
            spans.push(Span::styled(
                format!("[{}] {option}  ", i + 1),
                Style::default().fg(Color::White),
            ));
        }
        Line::from(spans)
    } else {
        match &session.terminal {
            Outcome::Errored(message) => Line::from(Span::styled(
                format!("Error: {message}"),
                Style::default().fg(Color::Red),
            )),
            Outcome::Completed => {
                let pointer = app
                    .started_arxiv_id
                    .as_deref()
                    .map(|id| format!("Workflow complete. Results saved to papers/{id}/ on the server."))
                    .unwrap_or_else(|| "Workflow complete.".to_string());
                Line::from(Span::styled(pointer, Style::default().fg(Color::Green)))
            }
            Outcome::None if app.running => Line::from(Span::styled(
                "a abort   q quit   Tab switch output   Up/Down scroll",
                Style::default().fg(Color::DarkGray),
            )),
            Outcome::None => Line::from(vec![
                Span::styled("arXiv ID: ", Style::default().fg(Color::Gray)),
                Span::styled(
                    format!("{}_", app.input),
                    Style::default().fg(Color::White),
                ),
                Span::styled(
                    "   (Enter to start, Esc to quit)",
                    Style::default().fg(Color::DarkGray),
                ),
            ]),
        }
    };

    let footer = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, area);
}
