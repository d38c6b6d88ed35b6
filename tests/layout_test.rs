//! Responsive layout tests
//!
//! Tests column breakpoints, tile sizing and the minimum-size floor across
//! representative viewport widths.

use jellytv::layout::{layout_for, GridKind, GAP_PX, MARGIN_PX};

const WIDTHS: [u32; 5] = [800, 1200, 1600, 2200, 3000];

#[test]
fn test_library_columns_by_width() {
    let columns: Vec<u32> = WIDTHS
        .iter()
        .map(|w| layout_for(*w, GridKind::Library).column_count)
        .collect();
    assert_eq!(columns, vec![3, 4, 5, 6, 6]);
}

#[test]
fn test_item_columns_by_width() {
    let columns: Vec<u32> = WIDTHS
        .iter()
        .map(|w| layout_for(*w, GridKind::Item).column_count)
        .collect();
    assert_eq!(columns, vec![4, 5, 6, 7, 7]);
}

#[test]
fn test_tile_size_formula() {
    for kind in [GridKind::Library, GridKind::Item] {
        for width in WIDTHS {
            let layout = layout_for(width, kind);
            let cols = layout.column_count;
            let raw = (width as i64 - (GAP_PX * (cols - 1)) as i64 - MARGIN_PX as i64) / cols as i64;
            let expected = raw.max(kind.min_tile_px() as i64) as u32;
            assert_eq!(layout.tile_size_px, expected, "{} at {}", kind, width);
            assert_eq!(layout.gap_px, 24);
        }
    }
}

#[test]
fn test_tiles_never_shrink_below_floor() {
    for kind in [GridKind::Library, GridKind::Item] {
        for width in [0, 1, 100, 500, 800, 1199] {
            assert!(layout_for(width, kind).tile_size_px >= kind.min_tile_px());
        }
    }
    assert_eq!(layout_for(0, GridKind::Library).tile_size_px, 240);
    assert_eq!(layout_for(0, GridKind::Item).tile_size_px, 220);
}

#[test]
fn test_known_layouts() {
    let wide = layout_for(2300, GridKind::Library);
    assert_eq!(wide.column_count, 6);
    assert_eq!(wide.tile_size_px, 336);
    assert_eq!(wide.tile_height_px(), 336);

    let narrow = layout_for(1000, GridKind::Item);
    assert_eq!(narrow.column_count, 4);
    assert_eq!(narrow.tile_size_px, 220);
    assert_eq!(narrow.tile_height_px(), 308);
}

#[test]
fn test_item_tiles_are_posters() {
    for width in WIDTHS {
        let layout = layout_for(width, GridKind::Item);
        let expected = (layout.tile_size_px as f64 * 1.4).floor() as u32;
        assert_eq!(layout.tile_height_px(), expected);
        assert!(layout.tile_height_px() > layout.tile_size_px);
    }
}

#[test]
fn test_rows_for_count() {
    let layout = layout_for(1920, GridKind::Library);
    assert_eq!(layout.column_count, 5);
    assert_eq!(layout.rows_for(0), 0);
    assert_eq!(layout.rows_for(5), 1);
    assert_eq!(layout.rows_for(6), 2);
}

#[test]
fn test_layout_serializes_for_cli() {
    let json = serde_json::to_value(layout_for(1920, GridKind::Item)).unwrap();
    assert_eq!(json["column_count"], 6);
    assert_eq!(json["grid_kind"], "item");
}
