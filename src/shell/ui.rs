//! Frame layout: header, tree pane, image pane, footer.
//!
//! The image pane draws raster pixels with the upper-half-block glyph, one
//! terminal cell per two vertically stacked pixels (foreground is the top
//! pixel, background the bottom one).

use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use super::app::{App, ViewMode};
use crate::render::GraphRenderer;

const UPPER_HALF_BLOCK: &str = "▀";

pub fn ui<R: GraphRenderer>(frame: &mut Frame<'_>, app: &mut App<'_, R>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(2),
        ])
        .split(frame.area());

    render_header(frame, chunks[0], app);
    render_body(frame, chunks[1], app);
    render_footer(frame, chunks[2]);
}

fn render_header<R: GraphRenderer>(frame: &mut Frame<'_>, area: Rect, app: &App<'_, R>) {
    let tree = app.tree();
    let pipeline = app.pipeline();
    let stats = format!(
        "{} attempts | {} loops | renders: {} | fallbacks: {}",
        tree.attempt_count(),
        tree.peel_count(),
        pipeline.render_count(),
        pipeline.fallback_count()
    );

    let status_style = if pipeline.last_failure().is_some() {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Gray)
    };

    let selection = match app.selected_tag() {
        Some(tag) => format!("{} /{}", tag, app.model().path_of(tag)),
        None => "-".to_string(),
    };

    let header = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(
                "integrator",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(selection, Style::default().fg(Color::Yellow)),
            Span::raw("  "),
            Span::styled(stats, Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(Span::styled(app.status.clone(), status_style)),
    ])
    .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, area);
}

fn render_body<R: GraphRenderer>(frame: &mut Frame<'_>, area: Rect, app: &mut App<'_, R>) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    render_tree(frame, chunks[0], app);
    render_image(frame, chunks[1], app);
}

fn render_tree<R: GraphRenderer>(frame: &mut Frame<'_>, area: Rect, app: &mut App<'_, R>) {
    // Borders take two rows
    app.tree_viewport_height = area.height.saturating_sub(2).max(1) as usize;
    app.ensure_cursor_visible();

    let rows = app.visible_rows();
    let items: Vec<ListItem> = rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let indent = "  ".repeat(row.depth);
            let connector = if row.depth == 0 {
                ""
            } else if row.last_sibling {
                "└─ "
            } else {
                "├─ "
            };
            let fold = if row.container {
                if row.expanded {
                    "▼ "
                } else {
                    "▶ "
                }
            } else {
                "  "
            };

            let selected = index == app.cursor.pos();
            let style = if selected {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else if row.tag.as_peel().is_some() {
                Style::default().fg(Color::Magenta)
            } else {
                Style::default()
            };
            let marker = if selected { "▸ " } else { "  " };

            ListItem::new(Line::from(Span::styled(
                format!("{}{}{}{}{}", marker, indent, connector, fold, row.label),
                style,
            )))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().title("Results").borders(Borders::ALL))
        .highlight_style(Style::default());
    let mut state = ListState::default()
        .with_selected(Some(app.cursor.pos()))
        .with_offset(app.tree_offset);
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_image<R: GraphRenderer>(frame: &mut Frame<'_>, area: Rect, app: &App<'_, R>) {
    let mode = match app.view_mode {
        ViewMode::Fit => "fit",
        ViewMode::Actual => "1:1",
    };
    let current = app.pipeline().current_image();
    let title = if current.is_placeholder() {
        format!("Graph [{}]", mode)
    } else {
        format!("Graph {}x{} [{}]", current.width(), current.height(), mode)
    };
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.width == 0 || inner.height == 0 {
        return;
    }

    if current.is_placeholder() {
        let message = match app.pipeline().last_failure() {
            Some(_) => "No image: rendering failed",
            None => "Select an attempt",
        };
        let placeholder = Paragraph::new(message)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true });
        frame.render_widget(placeholder, inner);
        return;
    }

    let viewport = (inner.width as u32, inner.height as u32 * 2);
    let pixels = match app.view_mode {
        ViewMode::Fit => fit_to(current.image(), viewport),
        ViewMode::Actual => crop_at(current.image(), app.pan, viewport),
    };
    frame.render_widget(Paragraph::new(halfblock_lines(&pixels)), inner);
}

fn render_footer(frame: &mut Frame<'_>, area: Rect) {
    let help = "q: quit | ↑/↓: navigate | →/←: expand/collapse | Enter: toggle | r: re-render | z: fit/1:1 | H/J/K/L: pan";
    let footer = Paragraph::new(help)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, area);
}

/// Scale down into `(width, height)` pixels, keeping aspect ratio
pub fn fit_to(image: &DynamicImage, (width, height): (u32, u32)) -> RgbaImage {
    if image.width() <= width && image.height() <= height {
        image.to_rgba8()
    } else {
        image
            .resize(width.max(1), height.max(1), FilterType::Triangle)
            .to_rgba8()
    }
}

/// Crop a viewport-sized window at `pan`, clamped to the image bounds
pub fn crop_at(image: &DynamicImage, pan: (u32, u32), (width, height): (u32, u32)) -> RgbaImage {
    let w = width.min(image.width());
    let h = height.min(image.height());
    let x = pan.0.min(image.width() - w);
    let y = pan.1.min(image.height() - h);
    image.crop_imm(x, y, w, h).to_rgba8()
}

fn blend_over_white(pixel: image::Rgba<u8>) -> Color {
    let [r, g, b, a] = pixel.0;
    let a = a as u16;
    let mix = |c: u8| ((c as u16 * a + 255 * (255 - a)) / 255) as u8;
    Color::Rgb(mix(r), mix(g), mix(b))
}

/// Two pixel rows per line; an odd last row gets a white lower half
pub fn halfblock_lines(image: &RgbaImage) -> Vec<Line<'static>> {
    let (width, height) = image.dimensions();
    (0..height)
        .step_by(2)
        .map(|y| {
            let spans: Vec<Span<'static>> = (0..width)
                .map(|x| {
                    let top = blend_over_white(*image.get_pixel(x, y));
                    let bottom = if y + 1 < height {
                        blend_over_white(*image.get_pixel(x, y + 1))
                    } else {
                        Color::Rgb(255, 255, 255)
                    };
                    Span::styled(UPPER_HALF_BLOCK, Style::default().fg(top).bg(bottom))
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}
