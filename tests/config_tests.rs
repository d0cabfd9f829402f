use std::io::Write;
use std::time::Duration;

use slide_sequencer::config::{CarouselOptions, Configuration, DEFAULT_INTERVAL};

#[test]
fn parse_kebab_case_config() {
    let yaml = r#"
carousels:
  - name: project-slides
    slide-count: 12
    interval: 7s
    auto-play: true
  - name: publications
    slide-count: 6
    interval: 4s
    pause-on-hover: true
"#;
    let cfg: Configuration = serde_yaml::from_str(yaml).unwrap();
    let cfg = cfg.validated().unwrap();
    assert_eq!(cfg.carousels.len(), 2);

    let slides = cfg.carousel("project-slides").unwrap();
    assert_eq!(slides.slide_count, 12);
    assert_eq!(slides.interval, Duration::from_secs(7));
    assert!(slides.auto_play);
    assert!(!slides.pause_on_hover);

    let pubs = cfg.carousel("publications").unwrap();
    assert!(pubs.pause_on_hover);
    assert!(cfg.carousel("missing").is_none());
}

#[test]
fn defaults_fill_missing_fields() {
    let yaml = r#"
carousels:
  - name: hero
"#;
    let cfg: Configuration = serde_yaml::from_str(yaml).unwrap();
    let hero = &cfg.carousels[0];
    assert_eq!(
        hero,
        &CarouselOptions {
            name: "hero".into(),
            slide_count: 0,
            interval: DEFAULT_INTERVAL,
            auto_play: true,
            pause_on_hover: false,
        }
    );
}

#[test]
fn humantime_intervals() {
    let yaml = r#"
carousels:
  - name: hero
    interval: 1m 30s
  - name: blog
    interval: 250ms
"#;
    let cfg: Configuration = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(cfg.carousels[0].interval, Duration::from_secs(90));
    assert_eq!(cfg.carousels[1].interval, Duration::from_millis(250));
}

#[test]
fn unknown_fields_are_rejected() {
    let yaml = r#"
carousels:
  - name: hero
    autoplay: false
"#;
    assert!(serde_yaml::from_str::<Configuration>(yaml).is_err());

    let yaml = r#"
slideshow: {}
"#;
    assert!(serde_yaml::from_str::<Configuration>(yaml).is_err());
}

#[test]
fn validation_rejects_bad_values() {
    let cases = [
        ("carousels: []", "at least one carousel"),
        (
            "carousels:\n  - name: hero\n    interval: 0s\n",
            "invalid carousel configuration",
        ),
        (
            "carousels:\n  - name: hero\n    interval: 2days\n",
            "must not exceed",
        ),
        (
            "carousels:\n  - name: \"my deck\"\n",
            "invalid carousel configuration",
        ),
        (
            "carousels:\n  - name: hero\n  - name: hero\n",
            "duplicate carousel name",
        ),
    ];
    for (yaml, expected) in cases {
        let cfg: Configuration = serde_yaml::from_str(yaml).unwrap();
        let err = cfg.validated().unwrap_err();
        assert!(
            format!("{err:#}").contains(expected),
            "{yaml:?}: {err:#}"
        );
    }
}

#[test]
fn loads_from_yaml_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "carousels:\n  - name: deck\n    slide-count: 3\n    interval: 1s\n"
    )
    .unwrap();
    let cfg = Configuration::from_yaml_file(file.path())
        .unwrap()
        .validated()
        .unwrap();
    assert_eq!(
        slide_sequencer::simulate(&cfg.carousels[0], 3),
        vec![0, 1, 2, 0]
    );
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(Configuration::from_yaml_file(dir.path().join("absent.yaml")).is_err());
}
