use linguist_core::models::{AnalysisResult, RequiredField};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};

use super::{CARDS, FormState, INSIGHTS_TITLE};

const SPINNER: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];
const PLACEHOLDER: &str = "Paste your conversation here...";
const INPUT_HEIGHT: u16 = 10;
const CARD_HEIGHT: u16 = 5;

pub fn draw(frame: &mut Frame, state: &FormState) {
    let banner_height = if state.error.is_some() { 3 } else { 0 };
    let [header, input, banner, hint, results] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(INPUT_HEIGHT),
        Constraint::Length(banner_height),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .areas(frame.area());

    draw_header(frame, header);
    draw_input(frame, input, state);
    if let Some(message) = &state.error {
        draw_error(frame, banner, message);
    }
    draw_hint(frame, hint, state);
    if let Some(result) = &state.result {
        draw_results(frame, results, result);
    }
}

fn draw_header(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            "♥ Love Linguist",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Decode your crush's messages with AI",
            Style::default().fg(Color::Gray),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn draw_input(frame: &mut Frame, area: Rect, state: &FormState) {
    let block = Block::bordered()
        .title(" Conversation ")
        .border_style(Style::default().fg(Color::Magenta));

    let paragraph = if state.input.is_empty() {
        Paragraph::new(Span::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray)))
    } else {
        // Keep the end of the text in view, using the same wrapping the widget renders with
        let text = Paragraph::new(state.input.as_str()).wrap(Wrap { trim: false });
        let rows = text.line_count(area.width.saturating_sub(2));
        let scroll = rows.saturating_sub(area.height.saturating_sub(2) as usize);
        text.scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0))
    };

    frame.render_widget(paragraph.block(block), area);
}

fn draw_error(frame: &mut Frame, area: Rect, message: &str) {
    let banner = Paragraph::new(message)
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: true })
        .block(Block::bordered().border_style(Style::default().fg(Color::Red)));
    frame.render_widget(banner, area);
}

fn draw_hint(frame: &mut Frame, area: Rect, state: &FormState) {
    let action = if state.loading {
        let spinner = SPINNER[state.spinner_frame % SPINNER.len()];
        Span::styled(
            format!("{spinner} Analyzing..."),
            Style::default().fg(Color::Magenta),
        )
    } else if state.can_submit() {
        Span::styled(
            "[Ctrl+S] Analyze",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled("[Ctrl+S] Analyze", Style::default().fg(Color::DarkGray))
    };

    let line = Line::from(vec![
        action,
        Span::styled(
            "   Ctrl+L clear   Esc quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn draw_results(frame: &mut Frame, area: Rect, result: &AnalysisResult) {
    let [row1, row2, row3, insights] = Layout::vertical([
        Constraint::Length(CARD_HEIGHT),
        Constraint::Length(CARD_HEIGHT),
        Constraint::Length(CARD_HEIGHT),
        Constraint::Min(4),
    ])
    .areas(area);

    let cells = [row1, row2, row3].into_iter().flat_map(|row| {
        let [left, right] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(row);
        [left, right]
    });

    for ((field, title), cell) in CARDS.iter().zip(cells) {
        draw_card(frame, cell, title, result.get(*field), card_color(*field));
    }

    let panel = Paragraph::new(result.insights.as_str())
        .wrap(Wrap { trim: true })
        .block(
            Block::bordered()
                .title(Span::styled(
                    format!(" {INSIGHTS_TITLE} "),
                    Style::default()
                        .fg(Color::Magenta)
                        .add_modifier(Modifier::BOLD),
                ))
                .border_style(Style::default().fg(Color::Magenta)),
        );
    frame.render_widget(panel, insights);
}

fn draw_card(frame: &mut Frame, area: Rect, title: &str, value: &str, color: Color) {
    let card = Paragraph::new(value)
        .wrap(Wrap { trim: true })
        .block(Block::bordered().title(Span::styled(
            format!(" {title} "),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));
    frame.render_widget(card, area);
}

fn card_color(field: RequiredField) -> Color {
    match field {
        RequiredField::InterestLevel => Color::LightMagenta,
        RequiredField::FlirtingScore => Color::Magenta,
        RequiredField::RedFlags => Color::Red,
        RequiredField::Mood => Color::Blue,
        RequiredField::GhostingRisk => Color::Gray,
        RequiredField::Insights => Color::Magenta,
    }
}
