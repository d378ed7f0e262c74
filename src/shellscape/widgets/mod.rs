use std::borrow::Cow;

use chrono::{DateTime, Local};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph, Scrollbar, ScrollbarOrientation},
    Frame,
};
use textwrap::Options;

use crate::backdropper::sections::Section;

use super::{
    app::{InputMode, ShellscapeApp},
    notifications::ShellscapeNotifications,
};

const PRIMARY_COLOR: Color = Color::Rgb(120, 120, 120);
const LIST_COLOR: Color = Color::Rgb(55, 55, 55);
const CONTENT_COLOR: Color = Color::Rgb(10, 10, 10);

#[derive(Clone, PartialEq, Debug)]
pub struct ShellscapeWidgets {}

impl ShellscapeWidgets {
    pub fn paint(frame: &mut Frame, shellscape_app: &mut ShellscapeApp) {
        let main_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(20),
                Constraint::Percentage(72),
                Constraint::Percentage(8),
            ])
            .split(frame.area());

        Self::paint_header(frame, shellscape_app, main_layout[0]);

        let content_container = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(main_layout[1]);

        Self::paint_backdrops(frame, shellscape_app, content_container[0]);
        Self::paint_notifications(frame, shellscape_app, content_container[1]);
        Self::paint_footer(frame, shellscape_app, main_layout[2]);
    }

    fn paint_header(frame: &mut Frame, shellscape_app: &ShellscapeApp, area: Rect) {
        let mut header_elements = vec![];
        let heading_element = Line::from(Span::styled(
            format!(
                "Theme: {} | File: {} | License: {} | Version: {}",
                shellscape_app.metadata.theme_heading,
                shellscape_app
                    .metadata
                    .file_heading
                    .as_deref()
                    .unwrap_or("none"),
                shellscape_app.metadata.license,
                shellscape_app.metadata.version
            ),
            Style::default().add_modifier(Modifier::BOLD),
        ));

        let subtitle_lines = textwrap::wrap(
            &shellscape_app.metadata.subtitle,
            Options::new(heading_element.width().max(20)),
        );

        header_elements.push(heading_element);
        header_elements.push(Line::from(Span::styled("", Style::default())));

        for borrowed_line in subtitle_lines {
            if let Cow::Borrowed(line) = borrowed_line {
                header_elements.push(Line::from(Span::styled(line.to_string(), Style::default())));
            }
        }

        let title = format!(" {} ", shellscape_app.metadata.title.to_uppercase());
        let header = Paragraph::new(header_elements)
            .alignment(Alignment::Center)
            .bg(PRIMARY_COLOR)
            .block(
                Block::default()
                    .padding(Padding::top(1))
                    .title(Span::styled(
                        title,
                        Style::default().add_modifier(Modifier::BOLD),
                    ))
                    .borders(Borders::ALL)
                    .fg(Color::White)
                    .title_alignment(Alignment::Center),
            );

        frame.render_widget(header, area);
    }

    fn paint_backdrops(frame: &mut Frame, shellscape_app: &ShellscapeApp, area: Rect) {
        let mut list_elements = vec![];

        if shellscape_app.section_aware {
            list_elements.push(Line::from(vec![
                Span::styled("Section target: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(shellscape_app.section_target.to_string()),
            ]));
            list_elements.push(Line::from(Span::styled("", Style::default())));
        }

        if shellscape_app.backdrops.is_empty() {
            list_elements.push(Line::from(Span::styled(
                "No backdrops declared in this file.",
                Style::default().add_modifier(Modifier::ITALIC),
            )));
        }

        for (idx, entry) in shellscape_app.backdrops.iter().enumerate() {
            let highlighted = idx == shellscape_app.cursor;
            let marker = if entry.active { "\u{25CF}" } else { "\u{25CB}" };

            let mut style = Style::default();
            if highlighted {
                style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
            }

            let mut spans = vec![
                Span::raw(if highlighted { "\u{25B6} " } else { "  " }),
                Span::styled(
                    format!("{} ", marker),
                    Style::default().fg(if entry.active {
                        Color::LightGreen
                    } else {
                        Color::Gray
                    }),
                ),
                Span::styled(entry.url.clone(), style),
            ];

            let sections = entry
                .sections
                .iter()
                .filter(|section| **section != Section::Unsectioned)
                .map(|section| section.to_string())
                .collect::<Vec<_>>();

            if !sections.is_empty() {
                spans.push(Span::styled(
                    format!(" [{}]", sections.join(", ")),
                    Style::default().fg(Color::Gray),
                ));
            }

            list_elements.push(Line::from(spans));
        }

        let list = Paragraph::new(list_elements)
            .bg(LIST_COLOR)
            .fg(Color::White)
            .block(
                Block::default()
                    .title(Span::styled(
                        format!(" BACKDROPS ({}) ", shellscape_app.backdrops.len()),
                        Style::default().add_modifier(Modifier::BOLD),
                    ))
                    .padding(Padding::new(1, 1, 1, 1)),
            );

        frame.render_widget(list, area);
    }

    fn paint_notifications(frame: &mut Frame, shellscape_app: &mut ShellscapeApp, area: Rect) {
        let mut content_elements = vec![];
        let textwrap_width = Options::new(area.width.saturating_sub(10).max(10) as usize);

        for notification in &shellscape_app.notifications {
            match notification {
                ShellscapeNotifications::VcThemeError { start_time, error } => {
                    content_elements.push(Self::heading_line(
                        "\u{1F4A5}",
                        start_time,
                        Color::LightRed,
                        " VCTHEME ERROR ",
                        Color::Red,
                    ));
                    content_elements.extend(Self::message_lines(&error.get_message(), &textwrap_width));
                    content_elements.push(Line::from(Span::styled("", Style::default())));

                    content_elements.push(Line::from(vec![
                        Span::styled("        \u{1F6D1} ", Style::default()),
                        Span::styled("TYPE    ", Style::default().add_modifier(Modifier::BOLD)),
                        Span::styled(format!(" {:?}", error.get_type()), Style::default()),
                    ]));

                    content_elements.push(Line::from(vec![
                        Span::styled("        \u{1F9EF} ", Style::default()),
                        Span::styled("KIND    ", Style::default().add_modifier(Modifier::BOLD)),
                        Span::styled(format!(" {:?}", error.get_kind()), Style::default()),
                    ]));
                }
                ShellscapeNotifications::Information {
                    start_time,
                    message,
                } => {
                    content_elements.push(Self::heading_line(
                        "\u{1F535}",
                        start_time,
                        Color::LightBlue,
                        " INFORMATION ",
                        Color::Blue,
                    ));
                    content_elements.extend(Self::message_lines(message, &textwrap_width));
                }
                ShellscapeNotifications::Success {
                    start_time,
                    ending_time,
                    duration,
                    message,
                } => {
                    content_elements.push(Self::heading_line(
                        "\u{2705}",
                        start_time,
                        Color::LightGreen,
                        " SUCCESS ",
                        Color::Green,
                    ));
                    content_elements.extend(Self::message_lines(message, &textwrap_width));

                    let timing = format!(
                        "The current process took **{}** ms to complete, finishing at **{}**",
                        duration.num_milliseconds(),
                        Self::format_time(ending_time)
                    );

                    content_elements.extend(Self::message_lines(&timing, &textwrap_width));
                }
                ShellscapeNotifications::Warning {
                    start_time,
                    message,
                } => {
                    content_elements.push(Self::heading_line(
                        "\u{1F6A8}",
                        start_time,
                        Color::LightYellow,
                        " WARNING ",
                        Color::Yellow,
                    ));
                    content_elements.extend(Self::message_lines(message, &textwrap_width));
                }
            }

            content_elements.push(Line::from(Span::styled("", Style::default())));
        }

        let content = Paragraph::new(content_elements)
            .bg(CONTENT_COLOR)
            .scroll(shellscape_app.notifications_offset)
            .block(
                Block::default()
                    .padding(Padding::new(1, 1, 1, 1))
                    .fg(Color::White),
            );

        frame.render_widget(content, area);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("↑"))
                .end_symbol(Some("↓")),
            area,
            &mut shellscape_app.notification_scroll_vertical,
        );
    }

    fn paint_footer(frame: &mut Frame, shellscape_app: &ShellscapeApp, area: Rect) {
        let footer_element = match &shellscape_app.input_mode {
            InputMode::Normal => Line::from(Span::styled(
                shellscape_app.metadata.footer.clone(),
                Style::default().fg(Color::White),
            )),
            InputMode::Input => Line::from(vec![
                Span::styled("Backdrop URL: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(shellscape_app.input_buffer.clone()),
                Span::styled("\u{2588}", Style::default().add_modifier(Modifier::SLOW_BLINK)),
                Span::styled("   (Enter add \u{2022} Esc cancel)", Style::default().fg(Color::Gray)),
            ]),
            InputMode::Confirm(url) => Line::from(vec![
                Span::styled("Delete ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(url.clone()),
                Span::styled("? (y/n)", Style::default().add_modifier(Modifier::BOLD)),
            ]),
        };

        let footer_container = Paragraph::new(footer_element)
            .alignment(Alignment::Center)
            .bg(PRIMARY_COLOR)
            .fg(Color::White)
            .block(Block::default().padding(Padding::vertical(1)));

        frame.render_widget(footer_container, area);
    }

    fn heading_line(
        icon: &'static str,
        start_time: &DateTime<Local>,
        time_color: Color,
        label: &'static str,
        label_color: Color,
    ) -> Line<'static> {
        Line::from(vec![
            Span::raw(icon),
            Span::styled(
                format!(" {}", Self::format_time(start_time)),
                Style::default()
                    .add_modifier(Modifier::BOLD)
                    .fg(time_color),
            ),
            Span::styled(" \u{2022} ", Style::default()),
            Span::styled(
                label,
                Style::default()
                    .add_modifier(Modifier::BOLD | Modifier::ITALIC)
                    .bg(label_color),
            ),
        ])
    }

    /// Wraps a message and renders the `**`-delimited parts in bold.
    fn message_lines(message: &str, textwrap_width: &Options) -> Vec<Line<'static>> {
        let message = format!("\u{25C6} {}", message);

        textwrap::wrap(&message, textwrap_width)
            .into_iter()
            .map(|borrowed_line| {
                let mut spans = vec![Span::raw("    ")];

                for (idx, part) in borrowed_line.split("**").enumerate() {
                    if idx % 2 == 1 {
                        spans.push(Span::styled(
                            part.to_string(),
                            Style::default().add_modifier(Modifier::BOLD),
                        ));
                    } else {
                        spans.push(Span::raw(part.to_string()));
                    }
                }

                Line::from(spans)
            })
            .collect()
    }

    fn format_time(time: &DateTime<Local>) -> String {
        time.format("%H:%M:%S.%3f").to_string()
    }
}
