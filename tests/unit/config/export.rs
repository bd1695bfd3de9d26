use super::*;

fn parse(json: &str) -> SheetResult<ExportConfig> {
    ExportConfig::from_reader(json.as_bytes())
}

#[test]
fn json_defaults_match_dialog_defaults() {
    let cfg = parse(r#"{ "output_path": "out/sheet", "sprite_width": 32, "sprite_height": 16 }"#)
        .unwrap();
    assert_eq!(cfg.layout, LayoutMode::Rows);
    assert!(cfg.ignore_empty_frames);
    assert_eq!(cfg.padding, 0);
    assert_eq!(cfg.filter, ResizeFilter::Auto);
    assert_eq!(cfg.format, OutputFormat::Png);
    assert_eq!(cfg.resolved_output_path(), PathBuf::from("out/sheet.png"));
    cfg.validate().unwrap();
}

#[test]
fn json_accepts_display_layout_names() {
    let cfg = parse(
        r#"{
            "output_path": "sheet.webp",
            "layout": "Horizontal Strip",
            "ignore_empty_frames": false,
            "sprite_width": 8,
            "sprite_height": 8,
            "padding": 1,
            "filter": "lanczos3"
        }"#,
    )
    .unwrap();
    assert_eq!(cfg.layout, LayoutMode::HorizontalStrip);
    assert_eq!(cfg.resolved_format(), OutputFormat::Webp);
    assert_eq!(cfg.geometry().unwrap().final_width(), 10);
}

#[test]
fn unknown_fields_and_layouts_are_rejected() {
    let err = parse(r#"{ "output_path": "a", "sprite_width": 1, "sprite_height": 1, "colour": 3 }"#)
        .unwrap_err();
    assert!(err.to_string().contains("serialization error:"));

    let err = parse(r#"{ "output_path": "a", "sprite_width": 1, "sprite_height": 1"#).unwrap_err();
    assert!(matches!(err, SheetError::Serde(_)));
}

#[test]
fn unknown_option_names_are_invalid_configuration() {
    for (field, value) in [
        ("layout", "Diagonal"),
        ("filter", "sinc"),
        ("format", "gif"),
    ] {
        let json = format!(
            r#"{{ "output_path": "a", "sprite_width": 1, "sprite_height": 1, "{field}": "{value}" }}"#
        );
        let err = parse(&json).unwrap_err();
        assert!(err.is_invalid_configuration(), "{field}: {err}");
        assert!(err.to_string().contains(value), "{field}: {err}");
    }
}

#[test]
fn json_layout_names_match_cli_names() {
    for (name, mode) in [
        ("HORIZONTALSTRIP", LayoutMode::HorizontalStrip),
        ("vertical_strip", LayoutMode::VerticalStrip),
        ("Columns", LayoutMode::Columns),
    ] {
        let json = format!(
            r#"{{ "output_path": "a", "sprite_width": 1, "sprite_height": 1, "layout": "{name}" }}"#
        );
        assert_eq!(parse(&json).unwrap().layout, mode);
        assert_eq!(name.parse::<LayoutMode>().unwrap(), mode);
    }
}

#[test]
fn serialized_config_reads_back() {
    let cfg = parse(
        r#"{ "output_path": "out/run.tga", "layout": "Vertical Strip", "sprite_width": 5,
             "sprite_height": 7, "filter": "Bicubic", "format": "tga" }"#,
    )
    .unwrap();
    let json = serde_json::to_string(&cfg).unwrap();
    assert!(json.contains("\"vertical-strip\""), "{json}");
    assert_eq!(parse(&json).unwrap(), cfg);
    assert_eq!(serde_json::from_str::<ExportConfig>(&json).unwrap(), cfg);
}

#[test]
fn validate_rejects_bad_dimensions() {
    let base = parse(r#"{ "output_path": "a", "sprite_width": 4, "sprite_height": 4 }"#).unwrap();

    let cfg = ExportConfig {
        sprite_width: 0,
        ..base.clone()
    };
    assert!(cfg.validate().unwrap_err().is_invalid_configuration());

    let cfg = ExportConfig {
        sprite_height: MAX_SPRITE_DIMENSION + 1,
        ..base.clone()
    };
    assert!(cfg.validate().unwrap_err().is_invalid_configuration());

    let cfg = ExportConfig {
        output_path: PathBuf::new(),
        ..base
    };
    assert!(cfg.validate().unwrap_err().is_invalid_configuration());
}

#[test]
fn missing_config_file_is_reported_with_path() {
    let err = ExportConfig::from_path("target/definitely/missing/config.json").unwrap_err();
    assert!(err.to_string().contains("missing/config.json"));
}
