use gita_core::timer::format_elapsed;
use gita_core::verse::CHAPTER_COUNT;
use gita_core::{i18n, render as render_card, CardFace, CardView, Language, RenderContext, SessionMode, Theme};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::{App, HomeItem, JumpField, Screen, SelectionPurpose, SettingsItem, GRID_COLUMNS};

/// Card width at zoom 1.0
const BASE_CARD_WIDTH: f32 = 64.0;

/// Colors for one theme
#[derive(Debug, Clone, Copy)]
struct Palette {
    fg: Color,
    muted: Color,
    accent: Color,
    speaker: Color,
    highlight_fg: Color,
    bar_bg: Color,
}

impl Palette {
    fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Palette {
                fg: Color::Reset,
                muted: Color::DarkGray,
                accent: Color::Rgb(0xd3, 0x54, 0x00),
                speaker: Color::Rgb(0x8e, 0x44, 0xad),
                highlight_fg: Color::White,
                bar_bg: Color::DarkGray,
            },
            Theme::Dark => Palette {
                fg: Color::Gray,
                muted: Color::DarkGray,
                accent: Color::Rgb(0xf3, 0x9c, 0x12),
                speaker: Color::Rgb(0xbb, 0x8f, 0xce),
                highlight_fg: Color::Black,
                bar_bg: Color::Black,
            },
        }
    }
}

fn wrap_text_to_width(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if current_len == 0 {
            current_line = word.to_string();
            current_len = word_len;
        } else if current_len + 1 + word_len <= width {
            current_line.push(' ');
            current_line.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(current_line);
            current_line = word.to_string();
            current_len = word_len;
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

/// Horizontally centered rect no wider than `width`
fn centered_columns(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    let margin = (area.width - width) / 2;
    Rect::new(area.x + margin, area.y, width, area.height)
}

fn popup_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();
    let palette = Palette::for_theme(app.preferences.theme());

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area, &palette);

    app.card_area = None;
    match app.screen {
        Screen::Home => render_home_screen(app, frame, body_area, &palette),
        Screen::Selection => render_selection_screen(app, frame, body_area, &palette),
        Screen::Card => render_card_screen(app, frame, body_area, &palette),
        Screen::Completion => render_completion_screen(app, frame, body_area, &palette),
        Screen::Jump => render_jump_screen(app, frame, body_area, &palette),
    }

    render_footer(app, frame, footer_area, &palette);

    if app.show_settings {
        render_settings(app, frame, area, &palette);
    }
    render_toast(app, frame, body_area, &palette);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect, palette: &Palette) {
    let screen_title = match app.screen {
        Screen::Home => "",
        Screen::Selection => match app.selection_purpose {
            SelectionPurpose::Practice(kind) => match kind {
                gita_core::PracticeKind::Shlokank => "Shlokank",
                gita_core::PracticeKind::CharanBodha => "Charan Bodha",
            },
            SelectionPurpose::Reading => "Adhyay Path",
        },
        Screen::Card | Screen::Completion => match app.session.as_ref().map(|s| s.mode()) {
            Some(SessionMode::Practice(gita_core::PracticeKind::Shlokank)) => "Shlokank",
            Some(SessionMode::Practice(gita_core::PracticeKind::CharanBodha)) => "Charan Bodha",
            Some(SessionMode::Reading) => "Adhyay Path",
            Some(SessionMode::Starred) => "Starred",
            None => "",
        },
        Screen::Jump => "Jump to Verse",
    };

    let mut spans = vec![Span::styled(" Project Gita ", Style::default().fg(palette.accent).bold())];
    if !screen_title.is_empty() {
        spans.push(Span::styled(format!("· {} ", screen_title), Style::default().fg(Color::White)));
    }
    spans.push(Span::styled(
        format!("{} ", app.language().display_name()),
        Style::default().fg(Color::Gray),
    ));
    spans.push(Span::styled(
        format!("v{}", env!("CARGO_PKG_VERSION")),
        Style::default().fg(Color::Gray),
    ));

    let header = Paragraph::new(Line::from(spans)).style(Style::default().bg(palette.bar_bg));
    frame.render_widget(header, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect, palette: &Palette) {
    let mode_style = Style::default().bg(palette.accent).fg(palette.highlight_fg);
    let mode_text = match app.screen {
        Screen::Home => " HOME ",
        Screen::Selection => " SELECT ",
        Screen::Card => " CARD ",
        Screen::Completion => " DONE ",
        Screen::Jump => " JUMP ",
    };

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let pairs: Vec<(&str, &str)> = if app.show_settings {
        vec![("j/k", "choose"), ("h/l", "change"), ("Esc", "close")]
    } else {
        match app.screen {
            Screen::Home => vec![("j/k", "move"), ("Enter", "open"), ("o", "settings"), ("q", "quit")],
            Screen::Selection => match app.selection_purpose {
                SelectionPurpose::Practice(_) => {
                    let mut pairs = vec![("arrows", "move"), ("Space", "toggle"), ("a", "all")];
                    if app.can_start() {
                        pairs.push(("Enter", "start"));
                    }
                    pairs.push(("Esc", "back"));
                    pairs
                }
                SelectionPurpose::Reading => vec![("arrows", "move"), ("Enter", "read"), ("Esc", "back")],
            },
            Screen::Card => {
                let practice = app.session.as_ref().is_some_and(|s| s.mode().is_practice());
                let revealed = app.session.as_ref().is_some_and(|s| s.is_revealed());
                let mut pairs = vec![("h/l", "prev/next"), ("Space", "flip"), ("s", "star")];
                if practice && !revealed {
                    pairs.push(("?", "hint"));
                }
                if practice && revealed {
                    pairs.push(("[ ]", "neighbors"));
                }
                pairs.push(("Esc", "back"));
                pairs
            }
            Screen::Completion => {
                let mut pairs = vec![("r", "restart")];
                if app.can_continue_reading() {
                    pairs.push(("n", "next adhyay"));
                }
                pairs.push(("Esc", "back"));
                pairs
            }
            Screen::Jump => vec![("j/k", "move"), ("Enter", "choose"), ("Esc", "back")],
        }
    };

    let hints = pairs.into_iter().flat_map(|(k, label)| {
        [
            Span::styled(format!(" {} ", k), key_style),
            Span::styled(format!(" {} ", label), label_style),
        ]
    });

    let footer_content = Line::from(
        vec![Span::styled(mode_text, mode_style), Span::styled(" ", label_style)]
            .into_iter()
            .chain(hints)
            .collect::<Vec<_>>(),
    );

    let footer = Paragraph::new(footer_content).style(Style::default().bg(Color::Black));
    frame.render_widget(footer, area);
}

fn render_home_screen(app: &mut App, frame: &mut Frame, area: Rect, palette: &Palette) {
    let column = centered_columns(area, 56);
    let [_, menu_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(HomeItem::all().len() as u16 * 2 + 2),
        Constraint::Min(0),
    ])
    .areas(column);

    let items: Vec<ListItem> = HomeItem::all()
        .into_iter()
        .map(|item| {
            ListItem::new(vec![
                Line::from(Span::styled(item.title(), Style::default().bold())),
                Line::from(Span::styled(
                    format!("  {}", item.description()),
                    Style::default().fg(palette.muted),
                )),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.accent))
                .title(" श्रीमद्भगवद्गीता "),
        )
        .highlight_style(Style::default().fg(palette.accent).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, menu_area, &mut app.home_state);

    let status = if let Some(status) = &app.status {
        status.clone()
    } else {
        format!("{} verses · {} starred", app.db.len(), app.bookmarks.set().len())
    };
    let status = Paragraph::new(status)
        .style(Style::default().fg(palette.muted))
        .alignment(Alignment::Center);
    frame.render_widget(status, status_area);
}

fn render_selection_screen(app: &mut App, frame: &mut Frame, area: Rect, palette: &Palette) {
    let column = centered_columns(area, GRID_COLUMNS as u16 * 8 + 2);
    let rows = (CHAPTER_COUNT as u16).div_ceil(GRID_COLUMNS as u16);
    let [title_area, grid_area, info_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(rows * 3),
        Constraint::Min(0),
    ])
    .areas(column);

    let prompt = match app.selection_purpose {
        SelectionPurpose::Practice(_) => "Select adhyays to practice",
        SelectionPurpose::Reading => "Select an adhyay to read",
    };
    frame.render_widget(
        Paragraph::new(prompt).alignment(Alignment::Center).style(Style::default().fg(palette.fg)),
        title_area,
    );

    let row_areas = Layout::vertical(vec![Constraint::Length(3); rows as usize]).split(grid_area);
    for (row_idx, row_area) in row_areas.iter().enumerate() {
        let cells = Layout::horizontal(vec![Constraint::Length(8); GRID_COLUMNS as usize]).split(*row_area);
        for (col_idx, cell) in cells.iter().enumerate() {
            let chapter = (row_idx * GRID_COLUMNS as usize + col_idx + 1) as u8;
            if chapter > CHAPTER_COUNT {
                break;
            }
            let selected = app.selected_chapters.contains(&chapter);
            let focused = app.chapter_cursor == chapter;
            let available = app.db.chapters().contains(&chapter);

            let border_style = if focused {
                Style::default().fg(palette.accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(palette.muted)
            };
            let text_style = if selected {
                Style::default().bg(palette.accent).fg(palette.highlight_fg).bold()
            } else if available {
                Style::default().fg(palette.fg)
            } else {
                Style::default().fg(palette.muted)
            };

            let card = Paragraph::new(Span::styled(format!(" {} ", chapter), text_style))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).border_style(border_style));
            frame.render_widget(card, *cell);
        }
    }

    let info = match (app.selection_purpose, &app.status) {
        (_, Some(status)) if app.db.is_empty() => status.clone(),
        (SelectionPurpose::Practice(_), _) if app.selected_chapters.is_empty() => {
            "Select at least one adhyay to start".to_string()
        }
        (SelectionPurpose::Practice(_), _) => {
            let all = if app.all_chapters_selected() { " (all)" } else { "" };
            format!("{} selected{}", app.selected_chapters.len(), all)
        }
        (SelectionPurpose::Reading, _) => String::new(),
    };
    frame.render_widget(
        Paragraph::new(info).alignment(Alignment::Center).style(Style::default().fg(palette.muted)),
        info_area,
    );
}

fn face_lines(view: &CardView, width: usize, palette: &Palette) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    match &view.face {
        CardFace::Prompt(prompt) => {
            for row in wrap_text_to_width(prompt, width) {
                lines.push(Line::from(Span::styled(row, Style::default().fg(palette.fg).bold())).centered());
            }
        }
        CardFace::Verse { lines: verse, namaste } => {
            for formatted in verse {
                let style = if formatted.speaker {
                    Style::default().fg(palette.speaker).add_modifier(Modifier::ITALIC)
                } else {
                    Style::default().fg(palette.fg)
                };
                for row in &formatted.rows {
                    for wrapped in wrap_text_to_width(row, width) {
                        lines.push(Line::from(Span::styled(wrapped, style)).centered());
                    }
                }
                lines.push(Line::default());
            }
            if *namaste {
                lines.push(Line::from("🙏").centered());
            }
        }
        CardFace::Translation { text, missing } => {
            let style = if *missing {
                Style::default().fg(palette.muted).add_modifier(Modifier::ITALIC)
            } else {
                Style::default().fg(palette.fg)
            };
            for row in wrap_text_to_width(text, width) {
                lines.push(Line::from(Span::styled(row, style)));
            }
        }
    }
    lines
}

fn render_card_screen(app: &mut App, frame: &mut Frame, area: Rect, palette: &Palette) {
    let Some(session) = &app.session else {
        return;
    };
    let ctx = RenderContext {
        language: app.language(),
        bookmarks: app.bookmarks.set(),
    };
    let Some(view) = render_card(session, &app.db, &ctx) else {
        return;
    };
    let elapsed = session.elapsed();

    let width = (BASE_CARD_WIDTH * app.preferences.zoom()).round() as u16;
    let column = centered_columns(area, width + 4);
    let [top_area, card_area, hint_area, nav_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(5),
        Constraint::Length(if view.hint.is_some() { 3 } else { 0 }),
        Constraint::Length(1),
    ])
    .areas(column);

    // Counter left, title center, timer and star right
    let [counter_area, title_area, status_area] = Layout::horizontal([
        Constraint::Length(9),
        Constraint::Min(0),
        Constraint::Length(12),
    ])
    .areas(top_area);
    frame.render_widget(
        Paragraph::new(view.counter.clone().unwrap_or_default()).style(Style::default().fg(palette.muted)),
        counter_area,
    );
    frame.render_widget(
        Paragraph::new(Span::styled(view.header.clone(), Style::default().fg(palette.accent).bold()))
            .alignment(Alignment::Center),
        title_area,
    );
    let mut status = Vec::new();
    if view.timer_visible {
        status.push(Span::styled(
            format!("⏱ {} ", format_elapsed(elapsed)),
            Style::default().fg(palette.muted),
        ));
    }
    status.push(if view.starred {
        Span::styled("★", Style::default().fg(palette.accent))
    } else {
        Span::styled("☆", Style::default().fg(palette.muted))
    });
    frame.render_widget(Paragraph::new(Line::from(status)).alignment(Alignment::Right), status_area);

    // Card body
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.accent));
    if let Some(sticker) = view.sticker {
        block = block.title(format!(" {} ", sticker));
    }
    let inner = block.inner(card_area);
    let mut lines = face_lines(&view, inner.width as usize, palette);

    // Vertically center short content
    let content_height = lines.len() as u16;
    if content_height < inner.height {
        let pad = (inner.height - content_height) / 2;
        let mut padded = vec![Line::default(); pad as usize];
        padded.append(&mut lines);
        lines = padded;
    }

    app.card_max_scroll = content_height.saturating_sub(inner.height);
    app.card_scroll = app.card_scroll.min(app.card_max_scroll);
    app.card_area = Some(card_area);

    let body = Paragraph::new(lines).block(block).scroll((app.card_scroll, 0));
    frame.render_widget(body, card_area);

    if let Some(hint) = &view.hint {
        let hint_widget = Paragraph::new(hint.clone())
            .alignment(Alignment::Center)
            .style(Style::default().fg(palette.fg))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(palette.muted))
                    .title(" hint "),
            );
        frame.render_widget(hint_widget, hint_area);
    }

    // Neighbor arrows and previous-card marker
    let arrow = |shown: bool, text: &'static str| {
        if shown {
            Span::styled(text, Style::default().fg(palette.accent))
        } else {
            Span::raw(" ".repeat(text.chars().count()))
        }
    };
    let nav = Line::from(vec![
        arrow(view.show_prev, "◀ prev "),
        arrow(view.has_prev_neighbor, " [ "),
        Span::styled(
            if view.has_prev_neighbor || view.has_next_neighbor {
                "shloka"
            } else {
                "      "
            },
            Style::default().fg(palette.muted),
        ),
        arrow(view.has_next_neighbor, " ] "),
        Span::raw(" next ▶"),
    ])
    .centered();
    frame.render_widget(Paragraph::new(nav), nav_area);
}

fn render_completion_screen(app: &mut App, frame: &mut Frame, area: Rect, palette: &Palette) {
    let Some(session) = &app.session else {
        return;
    };
    let language = app.language();
    let message = match session.mode() {
        SessionMode::Reading => {
            let chapter = session.working_set().first().map(|v| v.chapter).unwrap_or(1);
            i18n::reading_complete(language, chapter)
        }
        _ => i18n::practice_complete(language, session.len()),
    };

    let mut lines = vec![
        Line::from(Span::styled("🙏", Style::default())).centered(),
        Line::default(),
        Line::from(Span::styled(message, Style::default().fg(palette.fg).bold())).centered(),
        Line::default(),
        Line::from(Span::styled("r  restart", Style::default().fg(palette.muted))).centered(),
    ];
    if let Some(next) = session.following_chapter() {
        lines.push(
            Line::from(Span::styled(
                format!("n  {} {}", i18n::chapter_word(language), next),
                Style::default().fg(palette.muted),
            ))
            .centered(),
        );
    }
    lines.push(Line::from(Span::styled("Esc  back", Style::default().fg(palette.muted))).centered());

    let popup = popup_rect(area, 56, lines.len() as u16 + 2);
    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.accent)),
    );
    frame.render_widget(widget, popup);
}

fn render_jump_screen(app: &mut App, frame: &mut Frame, area: Rect, palette: &Palette) {
    let column = centered_columns(area, 40);
    let [chapter_area, verse_area] =
        Layout::horizontal([Constraint::Length(16), Constraint::Min(0)]).areas(column);

    let focus_style = |focused: bool| {
        if focused {
            Style::default().fg(palette.accent)
        } else {
            Style::default().fg(palette.muted)
        }
    };
    let language = app.language();

    let chapters: Vec<ListItem> = (1..=CHAPTER_COUNT)
        .map(|c| {
            let style = if c == app.jump_chapter {
                Style::default().fg(palette.accent).bold()
            } else if app.db.chapters().contains(&c) {
                Style::default().fg(palette.fg)
            } else {
                Style::default().fg(palette.muted)
            };
            ListItem::new(format!(" {} {}", i18n::chapter_word(language), c)).style(style)
        })
        .collect();
    let chapter_list = List::new(chapters).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(focus_style(app.jump_field == JumpField::Chapter)),
    );
    let mut chapter_state = ListState::default();
    chapter_state.select(Some(app.jump_chapter as usize - 1));
    frame.render_stateful_widget(chapter_list, chapter_area, &mut chapter_state);

    let verse_word = i18n::verse_label(language);
    let verses: Vec<ListItem> = app
        .jump_verses()
        .into_iter()
        .map(|v| ListItem::new(format!(" {} {}", verse_word, v)))
        .collect();
    let verse_list = List::new(verses)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(focus_style(app.jump_field == JumpField::Verse)),
        )
        .highlight_style(if app.jump_field == JumpField::Verse {
            Style::default().fg(palette.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        })
        .highlight_symbol("> ");
    frame.render_stateful_widget(verse_list, verse_area, &mut app.jump_verse_state);
}

fn setting_value(app: &App, item: SettingsItem) -> String {
    match item {
        SettingsItem::Language => app.language().display_name().to_string(),
        SettingsItem::Theme => app.preferences.theme().as_str().to_string(),
        SettingsItem::Zoom => format!("{:.0}%", app.preferences.zoom() * 100.0),
    }
}

fn render_settings(app: &mut App, frame: &mut Frame, area: Rect, palette: &Palette) {
    let popup_area = popup_rect(area, 48, SettingsItem::all().len() as u16 + 4);
    frame.render_widget(Clear, popup_area);

    let items: Vec<ListItem> = SettingsItem::all()
        .into_iter()
        .map(|item| {
            let name = match item {
                SettingsItem::Language => "Language",
                SettingsItem::Theme => "Theme",
                SettingsItem::Zoom => "Zoom",
            };
            ListItem::new(Line::from(vec![
                Span::raw(format!(" {:<10}", name)),
                Span::styled(format!("‹ {} ›", setting_value(app, item)), Style::default().fg(palette.accent)),
            ]))
        })
        .collect();

    let description = Language::description(&app.language());
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.accent))
                .title(" Settings ")
                .title_bottom(format!(" {} ", description)),
        )
        .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED));

    frame.render_stateful_widget(list, popup_area, &mut app.settings_state);
}

fn render_toast(app: &App, frame: &mut Frame, area: Rect, palette: &Palette) {
    let Some(toast) = &app.toast else {
        return;
    };
    let width = (toast.message.chars().count() as u16 + 4).min(area.width);
    let toast_area = Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.y + area.height.saturating_sub(3),
        width,
        3.min(area.height),
    );
    frame.render_widget(Clear, toast_area);
    frame.render_widget(
        Paragraph::new(toast.message.clone())
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(palette.accent)),
            ),
        toast_area,
    );
}
