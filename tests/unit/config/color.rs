use super::*;

fn de(json: &str) -> Result<ColorDef, serde_json::Error> {
    serde_json::from_str(json)
}

#[test]
fn parses_component_lists() {
    assert_eq!(de(r#""120, 235, 126""#).unwrap(), ColorDef::rgb(120, 235, 126));
    let c = de(r#""10,20,30, 0.5""#).unwrap();
    assert_eq!(c.rgba8(), Rgba8::new(10, 20, 30, 128));
}

#[test]
fn parses_hex_and_arrays() {
    assert_eq!(de(r##""#78EB7E""##).unwrap(), ColorDef::rgb(120, 235, 126));
    assert_eq!(
        de(r##""#78eb7e80""##).unwrap().rgba8(),
        Rgba8::new(120, 235, 126, 128)
    );
    assert_eq!(de("[1, 2, 3]").unwrap(), ColorDef::rgb(1, 2, 3));
    assert_eq!(de("[1, 2, 3, 4]").unwrap().rgba8(), Rgba8::new(1, 2, 3, 4));
}

#[test]
fn rejects_malformed_colors() {
    assert!(de(r#""300, 0, 0""#).is_err());
    assert!(de(r#""1, 2""#).is_err());
    assert!(de(r#""1, 2, 3, 1.5""#).is_err());
    assert!(de(r##""#12345""##).is_err());
    assert!(de("[1, 2]").is_err());
}

#[test]
fn serializes_as_hex() {
    let s = serde_json::to_string(&ColorDef::rgb(120, 235, 126)).unwrap();
    assert_eq!(s, r##""#78eb7e""##);
    let s = serde_json::to_string(&ColorDef(Rgba8::new(0, 0, 0, 0))).unwrap();
    assert_eq!(s, r##""#00000000""##);
}
