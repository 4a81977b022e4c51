use std::io::Write;

use lc_migrator::config::Config;
use lc_migrator::transform::PunctuationScheme;
use tempfile::NamedTempFile;

#[test]
fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
legacy_url = "http://legacy.local:5007"
register_url = "http://register.local:5004"
batch_size = 5

[decoder]
punctuation_scheme = "narrow"
development_corporation_codes = ["16"]

[logging]
directory = "var/log"
"#
    )
    .unwrap();

    let config = Config::load(file.path()).unwrap();

    assert_eq!(config.legacy_url, "http://legacy.local:5007");
    assert_eq!(config.batch_size, 5);
    assert_eq!(config.decoder.punctuation_scheme, PunctuationScheme::Narrow);
    assert_eq!(config.decoder.development_corporation_codes, vec!["16".to_string()]);
    assert_eq!(config.logging.directory, "var/log");
    assert_eq!(config.logging.level, "info");
    assert!(config.validate().is_ok());
}

#[test]
fn test_missing_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load(dir.path().join("absent.toml")).unwrap();

    assert_eq!(config.batch_size, 20);
    assert_eq!(config.application_name, "lc-migrator");
    assert_eq!(config.decoder.punctuation_scheme, PunctuationScheme::Keyed);
}

#[test]
fn test_malformed_file_is_an_error() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "batch_size = \"many\"").unwrap();

    assert!(Config::load(file.path()).is_err());
}
