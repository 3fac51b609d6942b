use super::*;

#[test]
fn option_value_round_trips_through_parse() {
    for kind in DbKind::ALL {
        assert_eq!(DbKind::parse(db_type_option_value(Some(kind))), Some(kind));
    }
}

#[test]
fn unselected_type_maps_to_placeholder_option() {
    assert_eq!(db_type_option_value(None), "");
    assert_eq!(DbKind::parse(""), None);
}
