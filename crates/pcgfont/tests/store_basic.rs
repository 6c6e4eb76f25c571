use pcgfont::{
    test_support::{patterned_store, ChangeLog},
    CharChange, CharacterStore, ErrorKind, PcgError, Plane, CHAR_SIZE, STORE_SIZE,
};
use pretty_assertions::assert_eq;

#[test]
fn set_pixel_touches_single_pixel() {
    let mut store = CharacterStore::new();
    store.set_pixel(0x41, 0, 0, 7);
    assert_eq!(store.get_pixel(0x41, 0, 0), 7);
    for y in 0..8 {
        for x in 0..8 {
            if (x, y) != (0, 0) {
                assert_eq!(store.get_pixel(0x41, x, y), 0, "pixel {x},{y}");
            }
        }
    }
}

#[test]
fn pixel_bits_map_to_planes() {
    let mut store = CharacterStore::new();
    store.set_pixel(3, 1, 2, 0b101); // blue + green
    assert_eq!(store.get_plane_row(3, Plane::Blue, 2), 0x40);
    assert_eq!(store.get_plane_row(3, Plane::Red, 2), 0x00);
    assert_eq!(store.get_plane_row(3, Plane::Green, 2), 0x40);

    let data = store.get_character(3);
    assert_eq!(data[2], 0x40);
    assert_eq!(data[8 + 2], 0x00);
    assert_eq!(data[16 + 2], 0x40);

    store.set_pixel(3, 1, 2, 0b010);
    assert_eq!(store.get_pixel(3, 1, 2), 2);
    assert_eq!(store.get_plane_row(3, Plane::Blue, 2), 0x00);
}

#[test]
fn coordinates_wrap_inside_character() {
    let mut store = CharacterStore::new();
    store.set_pixel(9, 8 + 3, 16 + 5, 4);
    assert_eq!(store.get_pixel(9, 3, 5), 4);
}

#[test]
fn set_character_rejects_wrong_length() {
    let mut store = CharacterStore::new();
    let err = store.set_character(1, &[0; 23]).unwrap_err();
    assert!(matches!(err, PcgError::CharacterLength { actual: 23 }));
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(store.set_character(1, &[0xAA; CHAR_SIZE]).is_ok());
    assert_eq!(store.get_character(1), &[0xAAu8; CHAR_SIZE]);
}

#[test]
fn snapshot_restore() {
    let source = patterned_store();
    let mut target = CharacterStore::new();
    target.set_all_data(source.get_all_data()).unwrap();
    assert_eq!(target.get_all_data(), source.get_all_data());
    assert_eq!(source.get_all_data().len(), STORE_SIZE);

    let err = target.set_all_data(&[0; 100]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn clone_is_independent() {
    let original = patterned_store();
    let mut copy = original.clone();
    copy.set_pixel(0, 0, 0, 0);
    copy.set_pixel(0, 1, 0, 0);
    copy.clear();
    assert!(copy.is_blank(0));
    assert_eq!(original.get_all_data(), patterned_store().get_all_data());
}

#[test]
fn monochrome_character_uses_color_planes() {
    let mut store = patterned_store();
    let bitmap = [0x18, 0x3C, 0x66, 0x7E, 0x66, 0x66, 0x66, 0x00];
    store.set_monochrome_character(0x41, &bitmap, 6).unwrap();
    let data = store.get_character(0x41);
    assert_eq!(&data[0..8], &[0u8; 8]);
    assert_eq!(&data[8..16], &bitmap);
    assert_eq!(&data[16..24], &bitmap);
    assert_eq!(store.get_pixel(0x41, 3, 0), 6);
    assert_eq!(store.get_pixel(0x41, 0, 0), 0);

    let err = store.set_monochrome_character(0x41, &[0; 7], 1).unwrap_err();
    assert!(matches!(err, PcgError::BitmapLength { actual: 7 }));
}

#[test]
fn notifications_carry_code() {
    let mut store = CharacterStore::new();
    let log = ChangeLog::attach(&mut store);
    store.set_pixel(5, 0, 0, 1);
    store.set_character(6, &[0; CHAR_SIZE]).unwrap();
    store.set_plane_row(7, Plane::Red, 0, 0xFF);
    store.set_all_data(&vec![0; STORE_SIZE]).unwrap();
    assert_eq!(
        log.events(),
        vec![
            CharChange::Single(5),
            CharChange::Single(6),
            CharChange::Single(7),
            CharChange::All
        ]
    );
}

#[test]
fn clone_does_not_copy_listeners() {
    let mut store = CharacterStore::new();
    let log = ChangeLog::attach(&mut store);
    let mut copy = store.clone();
    copy.set_pixel(0, 0, 0, 7);
    assert!(log.events().is_empty());
}

#[test]
fn copy_between_stores() {
    let definition = patterned_store();
    let mut edit = CharacterStore::new();
    let log = ChangeLog::attach(&mut edit);
    edit.copy_from(&definition, 0x41, 0, 2).unwrap();
    assert_eq!(edit.get_character(0), definition.get_character(0x41));
    assert_eq!(edit.get_character(1), definition.get_character(0x42));
    assert!(edit.is_blank(2));
    assert_eq!(log.events(), vec![CharChange::Single(0), CharChange::Single(1)]);

    let err = edit.copy_from(&definition, 255, 0, 2).unwrap_err();
    assert!(matches!(err, PcgError::Overflow { start: 255, count: 2 }));
}
