//! Tile grid shared by the home and library screens
//!
//! Geometry comes from [`layout_for`] in virtual pixels and is projected
//! onto terminal cells through the viewport metrics. The grid scrolls by
//! whole rows so the focused tile is always visible.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};

use crate::focus::{FocusEmphasis, GridFocus, Platform, TileInteraction};
use crate::layout::{layout_for, GridKind, TileLayout, MARGIN_PX};
use crate::models::{LibraryItem, ViewportMetrics};
use crate::ui::Theme;

/// Smallest tile that still fits a bordered name
const MIN_TILE_COLS: u16 = 6;
const MIN_TILE_ROWS: u16 = 3;

/// Tile geometry in terminal cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellGrid {
    pub columns: usize,
    pub tile_cols: u16,
    pub tile_rows: u16,
    pub gap_cols: u16,
    pub gap_rows: u16,
    pub margin_cols: u16,
}

impl CellGrid {
    pub fn project(layout: &TileLayout, viewport: &ViewportMetrics, area: Rect) -> Self {
        let columns = layout.column_count.max(1) as usize;
        let gap_cols = viewport.px_to_cols(layout.gap_px).max(1);
        let gap_rows = viewport.px_to_rows(layout.gap_px);
        let mut tile_cols = viewport.px_to_cols(layout.tile_size_px).max(MIN_TILE_COLS);
        let tile_rows = viewport
            .px_to_rows(layout.tile_height_px())
            .max(MIN_TILE_ROWS);

        // The terminal may be narrower than the virtual width promised
        let needed = columns as u16 * tile_cols + (columns as u16 - 1) * gap_cols;
        if needed > area.width {
            let spare = area.width.saturating_sub((columns as u16 - 1) * gap_cols);
            tile_cols = (spare / columns as u16).max(1);
        }
        let used = columns as u16 * tile_cols + (columns as u16 - 1) * gap_cols;
        let margin_cols = viewport
            .px_to_cols(MARGIN_PX / 2)
            .min(area.width.saturating_sub(used) / 2);

        Self {
            columns,
            tile_cols,
            tile_rows,
            gap_cols,
            gap_rows,
            margin_cols,
        }
    }

    fn row_pitch(&self) -> u16 {
        self.tile_rows + self.gap_rows
    }

    /// Rows that fit in `height`
    pub fn visible_rows(&self, height: u16) -> usize {
        (((height + self.gap_rows) / self.row_pitch().max(1)) as usize).max(1)
    }

    /// First row to draw so that `focused` stays in view
    pub fn first_row(&self, focused: Option<usize>, height: u16) -> usize {
        let visible = self.visible_rows(height);
        match focused {
            Some(i) => (i / self.columns).saturating_sub(visible - 1),
            None => 0,
        }
    }
}

/// Visible tiles as `(index, rect)` pairs
pub fn tile_rects(
    area: Rect,
    layout: &TileLayout,
    viewport: &ViewportMetrics,
    count: usize,
    focused: Option<usize>,
) -> Vec<(usize, Rect)> {
    let cells = CellGrid::project(layout, viewport, area);
    let first_row = cells.first_row(focused, area.height);
    let visible = cells.visible_rows(area.height);

    let mut rects = Vec::new();
    for index in (first_row * cells.columns)..count {
        let row = index / cells.columns - first_row;
        if row >= visible {
            break;
        }
        let col = (index % cells.columns) as u16;
        let x = area.x + cells.margin_cols + col * (cells.tile_cols + cells.gap_cols);
        let y = area.y + row as u16 * cells.row_pitch();
        let rect = Rect::new(x, y, cells.tile_cols, cells.tile_rows).intersection(area);
        if !rect.is_empty() {
            rects.push((index, rect));
        }
    }
    rects
}

/// Emphasis shift in whole cells. Any shift, however small, moves the tile
/// by at least one cell.
fn shift_cells((x, y): (f32, f32), viewport: &ViewportMetrics) -> (u16, u16) {
    let cells = |px: f32, scale: f32| {
        if px > 0.0 && scale > 0.0 {
            (px / scale).ceil() as u16
        } else {
            0
        }
    };
    (cells(x, viewport.scale), cells(y, viewport.row_scale))
}

/// Grow and shift a tile rect for focus emphasis without leaving `bounds`
fn emphasize(
    rect: Rect,
    emphasis: &FocusEmphasis,
    interaction: TileInteraction,
    viewport: &ViewportMetrics,
    bounds: Rect,
) -> Rect {
    let grow = emphasis.grow_cells(interaction, rect.width);
    let (dx, dy) = shift_cells(emphasis.shift(interaction), viewport);
    if grow == 0 && dx == 0 && dy == 0 {
        return rect;
    }
    // Shifting must not push the bottom border out of view
    let y = (rect.y + dy)
        .min(bounds.bottom().saturating_sub(rect.height))
        .max(rect.y);
    Rect {
        x: (rect.x + dx).saturating_sub(grow),
        y,
        width: rect.width + grow * 2,
        height: rect.height,
    }
    .intersection(bounds)
}

/// Draw a grid of tiles
pub fn render_grid(
    frame: &mut Frame,
    area: Rect,
    kind: GridKind,
    tiles: &[LibraryItem],
    focus: &GridFocus,
    viewport: &ViewportMetrics,
    platform: Platform,
) {
    let layout = layout_for(viewport.width, kind);
    let emphasis = FocusEmphasis::for_platform(platform);
    let fallback = match kind {
        GridKind::Library => "Library",
        GridKind::Item => "Untitled",
    };

    let rects = tile_rects(area, &layout, viewport, tiles.len(), focus.focused());
    // Focused tile last so its emphasis draws over its neighbours
    let (mut rest, focused): (Vec<_>, Vec<_>) = rects
        .into_iter()
        .partition(|(i, _)| focus.interaction(*i) == TileInteraction::Idle);
    rest.extend(focused);

    for (index, rect) in rest {
        let tile = &tiles[index];
        let interaction = focus.interaction(index);
        let rect = emphasize(rect, &emphasis, interaction, viewport, area);
        render_tile(frame, rect, tile.display_name(fallback), tile.collection_type.as_deref(), interaction);
    }
}

fn render_tile(
    frame: &mut Frame,
    area: Rect,
    name: &str,
    subtitle: Option<&str>,
    interaction: TileInteraction,
) {
    let (style, border, border_type) = match interaction {
        TileInteraction::Idle => (Theme::tile(), Theme::border(), BorderType::Rounded),
        TileInteraction::Focused => (Theme::tile_focused(), Theme::border_focused(), BorderType::Thick),
        TileInteraction::Pressed => (
            Theme::tile_focused().bg(Theme::BACKGROUND_ELEVATED),
            Theme::border_focused(),
            BorderType::Double,
        ),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(border)
        .style(style);

    let mut lines = vec![Line::from(Span::styled(name.to_string(), style))];
    if let Some(subtitle) = subtitle {
        lines.push(Line::from(Span::styled(subtitle.to_string(), Theme::dimmed())));
    }

    let para = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(para, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> ViewportMetrics {
        // 120x40 terminal with 16x32 cells
        ViewportMetrics::from_terminal(120, 40, 16, 32)
    }

    #[test]
    fn test_project_library_grid() {
        let vp = viewport();
        let layout = layout_for(vp.width, GridKind::Library);
        let cells = CellGrid::project(&layout, &vp, Rect::new(0, 0, 120, 36));
        assert_eq!(cells.columns, 5);
        assert!(cells.tile_cols >= MIN_TILE_COLS);
        assert!(cells.tile_rows >= MIN_TILE_ROWS);
        let used = 5 * cells.tile_cols + 4 * cells.gap_cols + cells.margin_cols;
        assert!(used <= 120);
    }

    #[test]
    fn test_tile_rects_fill_rows_left_to_right() {
        let vp = viewport();
        let layout = layout_for(vp.width, GridKind::Library);
        let area = Rect::new(0, 0, 120, 36);
        let rects = tile_rects(area, &layout, &vp, 7, None);
        assert!(!rects.is_empty());
        assert_eq!(rects[0].0, 0);
        assert!(rects[1].1.x > rects[0].1.x);
        // Sixth tile wraps to the second row
        if let Some((_, sixth)) = rects.iter().find(|(i, _)| *i == 5) {
            assert!(sixth.y > rects[0].1.y);
            assert_eq!(sixth.x, rects[0].1.x);
        }
        for (_, rect) in &rects {
            assert!(area.contains(rect.as_position()));
        }
    }

    #[test]
    fn test_focused_tile_is_scrolled_into_view() {
        let vp = viewport();
        let layout = layout_for(vp.width, GridKind::Item);
        let area = Rect::new(0, 0, 120, 12);
        let rects = tile_rects(area, &layout, &vp, 60, Some(55));
        assert!(rects.iter().any(|(i, _)| *i == 55));
        assert!(rects.iter().all(|(i, _)| *i != 0));
    }

    #[test]
    fn test_narrow_terminal_still_fits() {
        let vp = ViewportMetrics::new(2400, 1080, 16.0);
        let layout = layout_for(vp.width, GridKind::Item);
        let area = Rect::new(0, 0, 40, 20);
        for (_, rect) in tile_rects(area, &layout, &vp, 14, None) {
            assert!(rect.right() <= area.right());
        }
    }

    #[test]
    fn test_emphasis_grows_within_bounds() {
        let vp = viewport();
        let bounds = Rect::new(0, 0, 100, 30);
        let rect = Rect::new(0, 0, 40, 10);
        let grown = emphasize(rect, &FocusEmphasis::TV, TileInteraction::Focused, &vp, bounds);
        assert_eq!(grown.x, 0);
        assert!(grown.width > rect.width);
        let idle = emphasize(rect, &FocusEmphasis::TV, TileInteraction::Idle, &vp, bounds);
        assert_eq!(idle, rect);
    }

    #[test]
    fn test_emphasis_shifts_focused_and_pressed_tiles() {
        let vp = viewport();
        let bounds = Rect::new(0, 0, 100, 30);
        let rect = Rect::new(20, 5, 20, 8);

        let pressed = emphasize(rect, &FocusEmphasis::TV, TileInteraction::Pressed, &vp, bounds);
        assert_eq!(pressed.y, 6);
        assert_eq!(pressed.height, 8);
        // 20 columns at 1.02 do not grow, so only the shift shows
        assert_eq!(pressed.x, 21);
        assert_eq!(pressed.width, 20);

        let flat = emphasize(rect, &FocusEmphasis::NONE, TileInteraction::Pressed, &vp, bounds);
        assert_eq!(flat, rect);

        // A tile on the bottom edge keeps its full height
        let bottom = Rect::new(20, 22, 20, 8);
        let shifted = emphasize(bottom, &FocusEmphasis::TV, TileInteraction::Focused, &vp, bounds);
        assert_eq!(shifted.y, 22);
        assert_eq!(shifted.height, 8);
    }
}
