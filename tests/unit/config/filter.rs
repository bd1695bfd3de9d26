use super::*;

#[test]
fn auto_prefers_nearest_for_upscales() {
    assert_eq!(
        ResizeFilter::Auto.filter_type((16, 16), (64, 64)),
        FilterType::Nearest
    );
    assert_eq!(
        ResizeFilter::Auto.filter_type((64, 64), (16, 16)),
        FilterType::Lanczos3
    );
    assert_eq!(
        ResizeFilter::Auto.filter_type((64, 16), (32, 32)),
        FilterType::Lanczos3
    );
}

#[test]
fn explicit_filters_ignore_direction() {
    assert_eq!(
        ResizeFilter::Bilinear.filter_type((1, 1), (2, 2)),
        FilterType::Triangle
    );
    assert_eq!(
        ResizeFilter::Bicubic.filter_type((2, 2), (1, 1)),
        FilterType::CatmullRom
    );
}

#[test]
fn parses_names_case_insensitively() {
    assert_eq!("LANCZOS3".parse::<ResizeFilter>().unwrap(), ResizeFilter::Lanczos3);
    assert_eq!("nearest".parse::<ResizeFilter>().unwrap(), ResizeFilter::Box);
    assert_eq!(" Auto ".parse::<ResizeFilter>().unwrap(), ResizeFilter::Auto);
    assert!(
        "mitchell"
            .parse::<ResizeFilter>()
            .unwrap_err()
            .is_invalid_configuration()
    );
}

#[test]
fn serde_uses_the_same_names_as_from_str() {
    let f: ResizeFilter = serde_json::from_str("\"Catmull-Rom\"").unwrap();
    assert_eq!(f, ResizeFilter::Bicubic);
    assert_eq!(serde_json::to_string(&ResizeFilter::Lanczos3).unwrap(), "\"lanczos3\"");
    assert!(serde_json::from_str::<ResizeFilter>("\"sinc\"").is_err());
}
