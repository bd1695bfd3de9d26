use super::*;

#[test]
fn missing_extension_gets_png() {
    assert_eq!(
        normalize_output_path(Path::new("out/sheet"), OutputFormat::Png),
        PathBuf::from("out/sheet.png")
    );
}

#[test]
fn unknown_extension_is_kept_and_extended() {
    assert_eq!(
        normalize_output_path(Path::new("sheet.v2"), OutputFormat::Png),
        PathBuf::from("sheet.v2.png")
    );
    assert_eq!(
        normalize_output_path(Path::new("sheet.jpg"), OutputFormat::Webp),
        PathBuf::from("sheet.jpg.webp")
    );
}

#[test]
fn recognized_extension_is_untouched() {
    assert_eq!(
        normalize_output_path(Path::new("a/b/Sheet.PNG"), OutputFormat::Png),
        PathBuf::from("a/b/Sheet.PNG")
    );
    assert_eq!(
        normalize_output_path(Path::new("sheet.tif"), OutputFormat::Png),
        PathBuf::from("sheet.tif")
    );
}

#[test]
fn format_from_path_and_name() {
    assert_eq!(
        OutputFormat::from_path(Path::new("x.webp")),
        Some(OutputFormat::Webp)
    );
    assert_eq!(OutputFormat::from_path(Path::new("x")), None);
    assert_eq!(".tga".parse::<OutputFormat>().unwrap(), OutputFormat::Tga);
    assert!(
        "gif"
            .parse::<OutputFormat>()
            .unwrap_err()
            .is_invalid_configuration()
    );
}

#[test]
fn serde_uses_the_same_names_as_from_str() {
    let f: OutputFormat = serde_json::from_str("\"TIF\"").unwrap();
    assert_eq!(f, OutputFormat::Tiff);
    assert_eq!(serde_json::to_string(&OutputFormat::Webp).unwrap(), "\"webp\"");
    assert!(serde_json::from_str::<OutputFormat>("\"gif\"").is_err());
}
