use pcgfont::{
    geometry::apply,
    region::resolve,
    test_support::{patterned_store, ChangeLog},
    CharChange, CharacterStore, EditMode, Transform,
};
use pretty_assertions::assert_eq;

const MODES: [EditMode; 4] = [
    EditMode::Separate,
    EditMode::Vertical,
    EditMode::Horizontal,
    EditMode::All,
];

/// Reads the region under the cursor as rows of color codes.
fn region_pixels(store: &CharacterStore, mode: EditMode, cx: usize, cy: usize) -> Vec<Vec<u8>> {
    let region = resolve(mode, cx / 8, cy / 8);
    (0..region.height)
        .map(|y| {
            (0..region.width)
                .map(|x| {
                    let (code, lx, ly) = region.locate(x, y);
                    store.get_pixel(code, lx, ly)
                })
                .collect()
        })
        .collect()
}

#[test]
fn rotate180_twice_is_identity() {
    for mode in [EditMode::Separate, EditMode::All] {
        let mut store = patterned_store();
        assert!(apply(&mut store, mode, 9, 3, Transform::Rotate180));
        assert_ne!(store.get_all_data(), patterned_store().get_all_data());
        assert!(apply(&mut store, mode, 9, 3, Transform::Rotate180));
        assert_eq!(store.get_all_data(), patterned_store().get_all_data());
    }
}

#[test]
fn rotate90_four_times_is_identity() {
    let mut store = patterned_store();
    for _ in 0..4 {
        assert!(apply(&mut store, EditMode::All, 0, 0, Transform::Rotate90));
    }
    assert_eq!(store.get_all_data(), patterned_store().get_all_data());
}

#[test]
fn flips_twice_are_identity() {
    for mode in MODES {
        for kind in [Transform::FlipH, Transform::FlipV] {
            let mut store = patterned_store();
            apply(&mut store, mode, 12, 12, kind);
            apply(&mut store, mode, 12, 12, kind);
            assert_eq!(store.get_all_data(), patterned_store().get_all_data(), "{mode:?} {kind:?}");
        }
    }
}

#[test]
fn moving_full_width_is_identity() {
    for mode in MODES {
        let region = resolve(mode, 0, 0);
        for (kind, steps) in [
            (Transform::MoveRight, region.width),
            (Transform::MoveLeft, region.width),
            (Transform::MoveUp, region.height),
            (Transform::MoveDown, region.height),
        ] {
            let mut store = patterned_store();
            for _ in 0..steps {
                assert!(apply(&mut store, mode, 0, 0, kind));
            }
            assert_eq!(store.get_all_data(), patterned_store().get_all_data(), "{mode:?} {kind:?}");
        }
    }
}

#[test]
fn rotation_rejected_for_non_square_regions() {
    for mode in [EditMode::Vertical, EditMode::Horizontal] {
        for kind in [Transform::Rotate90, Transform::Rotate180] {
            let mut store = patterned_store();
            let log = ChangeLog::attach(&mut store);
            assert!(!apply(&mut store, mode, 0, 0, kind));
            assert_eq!(store.get_all_data(), patterned_store().get_all_data());
            assert!(log.events().is_empty());
        }
    }
}

#[test]
fn move_right_crosses_character_boundary() {
    let mut store = CharacterStore::new();
    // leftmost column of the right hand character
    store.set_pixel(1, 0, 0, 2);
    assert!(apply(&mut store, EditMode::Horizontal, 0, 0, Transform::MoveRight));
    assert_eq!(store.get_pixel(0, 7, 0), 2);
    assert_eq!(store.get_pixel(1, 0, 0), 0);

    // wraps from column 0 to column 15
    assert!(apply(&mut store, EditMode::Horizontal, 0, 0, Transform::MoveRight));
    for _ in 0..7 {
        apply(&mut store, EditMode::Horizontal, 0, 0, Transform::MoveRight);
    }
    assert_eq!(store.get_pixel(1, 7, 0), 2);
}

#[test]
fn rotate90_counter_clockwise_on_full_area() {
    let mut store = CharacterStore::new();
    // top right corner of the 16x16 area
    store.set_pixel(1, 7, 0, 5);
    assert!(apply(&mut store, EditMode::All, 0, 0, Transform::Rotate90));
    let grid = region_pixels(&store, EditMode::All, 0, 0);
    assert_eq!(grid[0][0], 5);
    assert_eq!(grid.iter().flatten().filter(|c| **c != 0).count(), 1);
}

#[test]
fn flip_h_mirrors_rows_and_flip_v_mirrors_columns() {
    let mut store = CharacterStore::new();
    store.set_pixel(0, 2, 1, 3);
    let mut flipped = store.clone();
    assert!(apply(&mut flipped, EditMode::Vertical, 0, 0, Transform::FlipH));
    // row 1 of 16 becomes row 14 -> second character, local row 6
    assert_eq!(flipped.get_pixel(16, 2, 6), 3);

    let mut mirrored = store.clone();
    assert!(apply(&mut mirrored, EditMode::Separate, 0, 0, Transform::FlipV));
    assert_eq!(mirrored.get_pixel(0, 5, 1), 3);
}

#[test]
fn cursor_selects_quadrant() {
    let mut store = CharacterStore::new();
    store.set_pixel(17, 0, 0, 7);
    assert!(apply(&mut store, EditMode::Separate, 3, 3, Transform::FlipV));
    assert_eq!(store.get_pixel(17, 0, 0), 7);
    assert!(apply(&mut store, EditMode::Separate, 15, 8, Transform::FlipV));
    assert_eq!(store.get_pixel(17, 7, 0), 7);
}

#[test]
fn notifies_each_slot_once() {
    let mut store = CharacterStore::new();
    let log = ChangeLog::attach(&mut store);
    apply(&mut store, EditMode::All, 0, 0, Transform::MoveUp);
    assert_eq!(
        log.events(),
        vec![
            CharChange::Single(0),
            CharChange::Single(1),
            CharChange::Single(16),
            CharChange::Single(17)
        ]
    );
}
