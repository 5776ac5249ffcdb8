//! UI rendering for the TUI.
//!
//! Handles layout and widget rendering using ratatui.
//! Supports customizable themes via the Theme struct.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Gauge, Padding, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::app::FormField;
use crate::domain::{Classification, Stage};
use crate::session::SessionState;
use crate::tui::Theme;
use crate::App;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

const FOOTER: &str = "Compliance Alignment: NIST RMF • ISO/IEC 27001 • CMMC";

/// Draw the main UI.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let state = app.session.state();
    let banner_height = if state.error().is_some() { 3 } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),             // Header
            Constraint::Length(3),             // Stage stepper
            Constraint::Length(banner_height), // Error banner
            Constraint::Min(8),                // Stage panel
            Constraint::Length(1),             // Status bar
            Constraint::Length(1),             // Footer
        ])
        .split(area);

    draw_header(frame, app, chunks[0]);
    draw_stepper(frame, app, chunks[1]);
    if let Some(error) = state.error() {
        draw_error_banner(frame, &app.theme, error, chunks[2]);
    }

    match state.stage() {
        Stage::Retrieve => draw_retrieve_panel(frame, app, chunks[3]),
        Stage::Analyze => draw_analyze_panel(frame, app, chunks[3]),
        Stage::Document => draw_document_panel(frame, app, chunks[3]),
        Stage::Advise => draw_advise_panel(frame, app, chunks[3]),
        Stage::Report => draw_report_panel(frame, app, chunks[3]),
    }

    draw_status_bar(frame, app, chunks[4]);

    let footer = Paragraph::new(FOOTER)
        .alignment(Alignment::Center)
        .style(Style::default().fg(app.theme.text_muted).bg(app.theme.background));
    frame.render_widget(footer, chunks[5]);
}

/// Draw the title bar.
fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let title = Line::from(vec![
        Span::styled(
            " R.A.D.A.R. ",
            Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
        ),
        Span::styled("Structured Intelligence Engine", Style::default().fg(theme.text_dim)),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title_bottom(
            Line::from(Span::styled(
                format!(" {} ", app.provider_name()),
                Style::default().fg(theme.text_muted),
            ))
            .right_aligned(),
        )
        .style(Style::default().bg(theme.background));

    frame.render_widget(Paragraph::new(title).block(block), area);
}

/// Draw the R-A-D-A-R stage stepper.
fn draw_stepper(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let current = app.stage();
    let mut spans = Vec::new();

    for (i, stage) in Stage::ALL.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  ──  ", Style::default().fg(theme.border)));
        }

        let style = if *stage == current {
            Style::default().fg(theme.primary).add_modifier(Modifier::BOLD)
        } else if *stage < current {
            Style::default().fg(theme.secondary)
        } else {
            Style::default().fg(theme.text_muted)
        };
        let marker = if *stage < current { "✓".to_string() } else { stage.letter().to_string() };

        spans.push(Span::styled(format!("[{marker}] "), style));
        spans.push(Span::styled(stage.label(), style));
    }

    let stepper = Paragraph::new(Line::from(spans)).alignment(Alignment::Center).block(
        Block::default().padding(Padding::vertical(1)).style(Style::default().bg(theme.background)),
    );
    frame.render_widget(stepper, area);
}

fn draw_error_banner(frame: &mut Frame, theme: &Theme, error: &str, area: Rect) {
    let banner = Paragraph::new(Line::from(vec![
        Span::styled("⚠ ", Style::default().fg(theme.error).add_modifier(Modifier::BOLD)),
        Span::styled(error, Style::default().fg(theme.error)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.error))
            .style(Style::default().bg(theme.background)),
    );
    frame.render_widget(banner, area);
}

fn panel<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
        ))
        .padding(Padding::horizontal(1))
        .style(Style::default().bg(theme.background))
}

/// Spinner line plus a caption, shown while a call is in flight.
fn loading_lines<'a>(app: &App, caption: &'a str, detail: &'a str) -> Vec<Line<'a>> {
    let theme = &app.theme;
    let frame = SPINNER[app.spinner % SPINNER.len()];
    vec![
        Line::default(),
        Line::from(vec![
            Span::styled(format!("{frame} "), Style::default().fg(theme.primary)),
            Span::styled(caption, Style::default().fg(theme.primary).add_modifier(Modifier::BOLD)),
        ])
        .centered(),
        Line::from(Span::styled(detail, Style::default().fg(theme.text_muted))).centered(),
    ]
}

fn label_line<'a>(label: &'a str, value: impl Into<Span<'a>>, theme: &Theme) -> Line<'a> {
    Line::from(vec![Span::styled(format!("{label:<16}"), Style::default().fg(theme.text_dim)), value.into()])
}

fn tag_list(items: &[String], empty: &str) -> String {
    if items.is_empty() {
        empty.to_string()
    } else {
        items.join(" • ")
    }
}

/// Draw the retrieval form.
fn draw_retrieve_panel(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let form = &app.form;
    let outer = panel("Retrieval Phase", theme);
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Intro
            Constraint::Length(3), // Source
            Constraint::Length(3), // Classification
            Constraint::Min(3),    // Content
        ])
        .split(inner);

    frame.render_widget(
        Paragraph::new(Span::styled(
            "Ingest structured or unstructured intelligence data for processing.",
            Style::default().fg(theme.text_dim),
        )),
        rows[0],
    );

    let field_block = |field: FormField, title: &'static str| {
        let focused = form.focus == field;
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(if focused { theme.primary } else { theme.border }))
    };

    let source = if form.source.is_empty() && form.focus != FormField::Source {
        Span::styled("e.g. OSINT Feed, Internal Memo", Style::default().fg(theme.text_muted))
    } else {
        Span::styled(form.source.as_str(), Style::default().fg(theme.text))
    };
    frame.render_widget(
        Paragraph::new(Line::from(source)).block(field_block(FormField::Source, " Source Origin ")),
        rows[1],
    );

    let mut levels = Vec::new();
    for level in Classification::ALL {
        let style = if level == form.classification {
            Style::default().fg(theme.primary).add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(theme.text_dim)
        };
        levels.push(Span::styled(format!(" {} ", level.label()), style));
        levels.push(Span::raw(" "));
    }
    frame.render_widget(
        Paragraph::new(Line::from(levels))
            .block(field_block(FormField::Classification, " Classification (←/→) ")),
        rows[2],
    );

    let content = if form.content.is_empty() && form.focus != FormField::Content {
        Paragraph::new(Span::styled(
            "Paste raw intelligence, logs, or reports here...",
            Style::default().fg(theme.text_muted),
        ))
    } else {
        Paragraph::new(form.content.as_str()).style(Style::default().fg(theme.text))
    };
    frame.render_widget(
        content.wrap(Wrap { trim: false }).block(field_block(FormField::Content, " Raw Content ")),
        rows[3],
    );
}

/// Draw the analysis results.
fn draw_analyze_panel(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let state = app.session.state();
    let outer = panel("Analysis", theme);

    let Some(analysis) = state.analysis() else {
        let lines = if state.is_processing() {
            loading_lines(app, "ANALYZING INTELLIGENCE VECTOR...", "Applying heuristic models and keyword extraction")
        } else {
            vec![Line::from(Span::styled(
                "No analysis available. Press r to retry.",
                Style::default().fg(theme.text_muted),
            ))]
        };
        frame.render_widget(Paragraph::new(lines).block(outer), area);
        return;
    };

    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(4)])
        .split(inner);

    let level = analysis.risk_level();
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" Calculated Risk Score "))
        .gauge_style(Style::default().fg(theme.risk_color(level)))
        .percent(u16::from(analysis.risk_score))
        .label(format!("{} / 100  {level}", analysis.risk_score));
    frame.render_widget(gauge, rows[0]);

    let lines = vec![
        Line::from(Span::styled("Executive Summary", Style::default().fg(theme.text_dim))),
        Line::from(Span::styled(analysis.summary.as_str(), Style::default().fg(theme.text))),
        Line::default(),
        label_line("Keywords", tag_list(&analysis.keywords, "None"), theme),
        label_line(
            "Entities",
            tag_list(&analysis.detected_entities, "No specific entities detected."),
            theme,
        ),
        label_line(
            "Compliance",
            Span::styled(tag_list(&analysis.compliance_tags, "None"), Style::default().fg(theme.secondary)),
            theme,
        ),
    ];
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), rows[1]);
}

/// Draw the sealed documentation record.
fn draw_document_panel(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let outer = panel("Documentation Record", theme);

    let Some(record) = app.session.state().documentation() else {
        frame.render_widget(Paragraph::new("No record.").block(outer), area);
        return;
    };

    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(3)])
        .split(inner);

    let integrity = if record.verify() {
        Span::styled("  ✓ verified", Style::default().fg(theme.success))
    } else {
        Span::styled("  ✗ mismatch", Style::default().fg(theme.error))
    };

    let meta = vec![
        label_line("Record ID", Span::styled(record.id(), Style::default().fg(theme.primary)), theme),
        Line::from(vec![
            Span::styled(format!("{:<16}", "Integrity Hash"), Style::default().fg(theme.text_dim)),
            Span::styled(record.hash(), Style::default().fg(theme.text)),
            integrity,
        ]),
        label_line("Timestamp", record.timestamp(), theme),
        label_line("Author", record.author(), theme),
    ];
    frame.render_widget(Paragraph::new(meta), rows[0]);

    let payload = Paragraph::new(record.pretty_payload())
        .style(Style::default().fg(theme.text_dim))
        .scroll((app.document_scroll, 0))
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(theme.border))
                .title(" Structured Data "),
        );
    frame.render_widget(payload, rows[1]);
}

/// Draw the advisory recommendations.
fn draw_advise_panel(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let state = app.session.state();
    let outer = panel("Strategic Recommendations", theme);

    if state.is_processing() {
        let lines = loading_lines(
            app,
            "GENERATING STRATEGIC ADVISORY...",
            "Cross-referencing findings with mitigation strategies",
        );
        frame.render_widget(Paragraph::new(lines).block(outer), area);
        return;
    }

    let mut lines = Vec::new();
    if state.advice().is_empty() {
        lines.push(Line::from(Span::styled(
            "No recommendations available.",
            Style::default().fg(theme.text_muted),
        )));
    }
    for rec in state.advice() {
        lines.push(Line::from(vec![
            Span::styled(
                format!("[{}] ", rec.priority),
                Style::default().fg(theme.priority_color(rec.priority)).add_modifier(Modifier::BOLD),
            ),
            Span::styled(rec.title.as_str(), Style::default().fg(theme.text).add_modifier(Modifier::BOLD)),
        ]));
        lines.push(Line::from(Span::styled(rec.description.as_str(), Style::default().fg(theme.text_dim))));
        if let Some(reference) = &rec.framework_reference {
            lines.push(Line::from(Span::styled(
                format!("REF: {reference}"),
                Style::default().fg(theme.secondary),
            )));
        }
        lines.push(Line::default());
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }).block(outer), area);
}

/// Draw the final report.
fn draw_report_panel(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let outer = panel("Final Intelligence Report", theme);

    let Some(report) = app.report() else {
        frame.render_widget(Paragraph::new("Report unavailable.").block(outer), area);
        return;
    };

    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(3)])
        .split(inner);

    let summary = vec![
        label_line(
            "Risk Profile",
            Span::styled(
                format!("{} / 100 ({})", report.risk_score, report.risk_level),
                Style::default().fg(theme.risk_color(report.risk_level)).add_modifier(Modifier::BOLD),
            ),
            theme,
        ),
        label_line("Classification", report.classification.label(), theme),
        label_line("Action Items", report.action_items.to_string(), theme),
    ];
    frame.render_widget(Paragraph::new(summary), rows[0]);

    let table_rows: Vec<Row> = report
        .action_plan
        .iter()
        .map(|rec| {
            Row::new(vec![
                Cell::from(rec.priority.as_str())
                    .style(Style::default().fg(theme.priority_color(rec.priority))),
                Cell::from(rec.title.clone()),
                Cell::from(rec.reference_or_na().to_string()),
            ])
        })
        .collect();

    let table = Table::new(
        table_rows,
        [Constraint::Length(10), Constraint::Percentage(55), Constraint::Percentage(35)],
    )
    .header(
        Row::new(vec!["Priority", "Recommendation", "Framework Reference"])
            .style(Style::default().fg(theme.text_dim).add_modifier(Modifier::BOLD)),
    )
    .block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(theme.border))
            .title(" Action Plan Summary "),
    );
    frame.render_widget(table, rows[1]);
}

/// Key hints for the current stage.
fn stage_hints(state: &SessionState) -> &'static str {
    if state.is_processing() {
        return "Working... • Esc quit";
    }
    match state.stage() {
        Stage::Retrieve => "Tab next field • ←/→ classification • Alt+Enter newline • Enter analyze • Esc quit",
        Stage::Report => "n new session • q quit",
        _ if state.error().is_some() => "r retry • q quit",
        Stage::Document => "c/Enter request advice • ↑/↓ scroll • q quit",
        _ => "c/Enter continue • q quit",
    }
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let line = match &app.status_message {
        Some(message) => Line::from(Span::styled(format!(" {message}"), Style::default().fg(theme.warning))),
        None => Line::from(Span::styled(
            format!(" {}", stage_hints(app.session.state())),
            Style::default().fg(theme.text_muted),
        )),
    };

    frame.render_widget(Paragraph::new(line).style(Style::default().bg(theme.background)), area);
}
