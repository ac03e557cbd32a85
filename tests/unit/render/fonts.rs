use super::*;

#[test]
fn generic_monospace_binds_to_an_installed_face() {
    let db = system_font_db();
    if !db.faces().any(|f| f.monospaced) {
        eprintln!("skipping: no monospaced system fonts");
        return;
    }

    let bound = installed_monospace_family(&db).unwrap();
    assert!(
        db.faces()
            .any(|f| f.monospaced && f.families.iter().any(|(name, _)| *name == bound))
    );

    let mut store = FontStore::new(None);
    let resolved = store.family_name("monospace").unwrap();
    assert!(!resolved.is_empty());
}

#[test]
fn monospace_binding_is_stable_across_scans() {
    let a = installed_monospace_family(&system_font_db());
    let b = installed_monospace_family(&system_font_db());
    assert_eq!(a, b);
}

#[test]
fn unknown_family_falls_back_to_an_installed_face() {
    if system_font_db().len() == 0 {
        eprintln!("skipping: no system fonts");
        return;
    }
    let mut store = FontStore::new(None);
    assert!(store.family_name("No Such Family 7f3a").is_ok());
}

#[test]
fn missing_font_path_is_an_error() {
    let mut store = FontStore::new(Some(PathBuf::from("target/does-not-exist.ttf")));
    assert!(store.family_name("monospace").is_err());
}

#[test]
fn shaping_is_cached_per_family_text_and_size() {
    if system_font_db().len() == 0 {
        eprintln!("skipping: no system fonts");
        return;
    }
    let mut store = FontStore::new(None);
    let spec = FontSpec::new("monospace", 16.0);
    let a = store.shape(&spec, "1").unwrap();
    let b = store.shape(&spec, "1").unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert!(!a.glyphs.is_empty());

    let smaller = store.shape(&FontSpec::new("monospace", 13.0), "1").unwrap();
    assert!(!Arc::ptr_eq(&a, &smaller));
    assert!(matches!(
        store.shape(&FontSpec::new("monospace", 0.0), "1"),
        Err(RainError::Render(_))
    ));
}
