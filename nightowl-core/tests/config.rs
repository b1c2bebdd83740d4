use nightowl_core::{
    parse_config_str, ConfigError, ConfigFormat, Mode, Percentage, RunConfig, Source, Validate,
    ValueRange,
};

#[test]
fn yaml_config_with_ranges_and_sources() {
    let yaml = r##"
interact: ["@alice", "#cats:top", "dogs_daily"]
actions:
  likes_count: 2-4
  follow_percentage: 30
limits:
  total_likes_limit: 300
  follow_limit: 15
schedule:
  repeat: 120-180
  total_sessions: 3
"##;
    let parsed = parse_config_str(yaml, ConfigFormat::Auto).unwrap();
    assert_eq!(parsed.format, ConfigFormat::Yaml);
    let cfg = parsed.config;
    assert_eq!(
        cfg.interact,
        vec![
            Source::Followers("alice".into()),
            Source::HashtagTop("cats".into()),
            Source::Followers("dogs_daily".into()),
        ]
    );
    assert_eq!(cfg.actions.likes_count, ValueRange::new(2, 4).unwrap());
    assert_eq!(cfg.actions.follow_percentage, Percentage::new(30).unwrap());
    assert_eq!(cfg.limits.total_likes_limit, Some(300));
    // Unset fields keep their defaults.
    assert_eq!(cfg.limits.interactions_count, Some(100));
    assert_eq!(cfg.schedule.total_sessions, Some(3));
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.mode().unwrap(), Mode::Interact(cfg.interact.clone()));
}

#[test]
fn json_config_is_detected() {
    let parsed = parse_config_str(r#"{"unfollow": 25}"#, ConfigFormat::Auto).unwrap();
    assert_eq!(parsed.format, ConfigFormat::Json);
    assert_eq!(parsed.config.mode().unwrap(), Mode::Unfollow(25));
}

#[test]
fn empty_document_is_default() {
    let parsed = parse_config_str("", ConfigFormat::Yaml).unwrap();
    assert_eq!(parsed.config, RunConfig::default());
}

#[test]
fn unknown_fields_are_rejected() {
    let err = parse_config_str("unfollow: 3\nlikes: 5\n", ConfigFormat::Yaml).unwrap_err();
    assert!(matches!(err, ConfigError::Yaml(_)));
}

#[test]
fn both_modes_is_a_configuration_error() {
    let cfg = RunConfig {
        interact: vec![Source::followers("alice")],
        unfollow: Some(10),
        ..Default::default()
    };
    let err = cfg.validate().unwrap_err();
    assert!(err.violations.iter().any(|v| v.path == "mode"));
    assert!(matches!(cfg.mode(), Err(ConfigError::Validation(_))));
}

#[test]
fn neither_mode_is_a_configuration_error() {
    let cfg = RunConfig::default();
    let err = cfg.validate().unwrap_err();
    assert_eq!(err.violations.len(), 1);
    assert_eq!(err.violations[0].path, "mode");
}

#[test]
fn validation_collects_every_violation() {
    let cfg = RunConfig {
        interact: vec![
            Source::followers("alice"),
            Source::followers("alice"),
            Source::followers("not a valid name!"),
        ],
        limits: nightowl_core::LimitsConfig {
            total_likes_limit: Some(0),
            ..Default::default()
        },
        ..Default::default()
    };
    let err = cfg.validate().unwrap_err();
    let paths: Vec<&str> = err.violations.iter().map(|v| v.path.as_str()).collect();
    assert!(paths.contains(&"interact[1]"));
    assert!(paths.contains(&"interact[2]"));
    assert!(paths.contains(&"limits.total_likes_limit"));
}

#[test]
fn sources_parse_and_display() {
    assert_eq!("@bob".parse::<Source>().unwrap(), Source::followers("bob"));
    assert_eq!("#cats".parse::<Source>().unwrap(), Source::hashtag("cats"));
    assert_eq!(
        "#cats:recent".parse::<Source>().unwrap(),
        Source::HashtagRecent("cats".into())
    );
    assert_eq!(Source::HashtagTop("cats".into()).to_string(), "#cats:top");
    assert!("#".parse::<Source>().is_err());
    assert!("#cats:weird".parse::<Source>().is_err());
    assert!("@".parse::<Source>().is_err());
}

#[test]
fn value_ranges_parse_and_sample_within_bounds() {
    let r: ValueRange = "2-4".parse().unwrap();
    for seed in 0..20u64 {
        let v = r.sample(|| seed * 7919);
        assert!((2..=4).contains(&v));
    }
    assert_eq!("7".parse::<ValueRange>().unwrap().sample(|| 99), 7);
    assert!("5-2".parse::<ValueRange>().is_err());
    assert!("a-b".parse::<ValueRange>().is_err());
    assert_eq!(r.to_string(), "2-4");
}

#[test]
fn percentages_roll_at_the_edges_without_randomness() {
    assert!(!Percentage::NEVER.roll(|| unreachable!()));
    assert!(Percentage::ALWAYS.roll(|| unreachable!()));
    let half = Percentage::new(50).unwrap();
    assert!(half.roll(|| 49));
    assert!(!half.roll(|| 50));
    assert!(Percentage::new(101).is_err());
    assert_eq!("30%".parse::<Percentage>().unwrap().value(), 30);
}
