//! Artifact panes: accumulated text output and the quality verdict

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, OutputTab};

pub fn render_output(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    render_tab_bar(f, chunks[0], app);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", app.output_tab.title()));

    if app.output_tab == OutputTab::Quality {
        render_quality(f, chunks[1], app, block);
        return;
    }

    let session = app.monitor.session();
    let text = match app.output_tab {
        OutputTab::Summary => session.artifacts.summary.as_deref(),
        OutputTab::Critique => session.artifacts.critique.as_deref(),
        OutputTab::Mechanism => session.artifacts.mechanism.as_deref(),
        OutputTab::Report => session.artifacts.final_report.as_deref(),
        OutputTab::Quality => unreachable!(),
    };

    let paragraph = match text {
        Some(text) => Paragraph::new(text.to_string())
            .wrap(Wrap { trim: false })
            .scroll((app.output_scroll, 0)),
        None => Paragraph::new("Nothing here yet.").style(Style::default().fg(Color::DarkGray)),
    };
    f.render_widget(paragraph.block(block), chunks[1]);
}

fn render_tab_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = Vec::new();
    for tab in OutputTab::ALL {
        let style = if tab == app.output_tab {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!(" {} ", tab.title()), style));
        spans.push(Span::raw(" "));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_quality(f: &mut Frame, area: Rect, app: &App, block: Block) {
    let session = app.monitor.session();
    let mut lines: Vec<Line> = Vec::new();

    if let Some(quality) = &session.quality {
        if let Some(score) = quality.score {
            lines.push(Line::from(vec![
                Span::styled("Score: ", Style::default().fg(Color::Gray)),
                Span::styled(
                    format!("{score:.1} / 100"),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]));
        }
        if let Some(category) = quality.category {
            lines.push(Line::from(vec![
                Span::styled("Category: ", Style::default().fg(Color::Gray)),
                Span::styled(category.as_str(), Style::default().fg(Color::White)),
            ]));
        }
        if let Some(assessment) = &quality.assessment {
            lines.push(Line::from(""));
            let sub_scores = [
                ("Clarity", assessment.clarity_score),
                ("Feasibility", assessment.feasibility_score),
                ("Novelty", assessment.novelty_score),
                ("Rigor", assessment.rigor_score),
                ("Overall", assessment.overall_score),
            ];
            for (label, value) in sub_scores {
                if let Some(value) = value {
                    lines.push(Line::from(vec![
                        Span::styled(format!("{label:<12}"), Style::default().fg(Color::Gray)),
                        Span::styled(
                            format!("{value:.1} / 10"),
                            Style::default().fg(Color::White),
                        ),
                    ]));
                }
            }
            if let Some(justification) = &assessment.justification {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    justification.clone(),
                    Style::default().fg(Color::Gray),
                )));
            }
            if let Some(verdict) = &assessment.verdict {
                lines.push(Line::from(""));
                lines.push(Line::from(vec![
                    Span::styled("Verdict: ", Style::default().fg(Color::Gray)),
                    Span::styled(
                        verdict.clone(),
                        Style::default()
                            .fg(Color::White)
                            .add_modifier(Modifier::BOLD),
                    ),
                ]));
            }
        }
    } else {
        lines.push(Line::from(Span::styled(
            "No quality verdict yet.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((app.output_scroll, 0))
        .block(block);
    f.render_widget(paragraph, area);
}
