use crate::common::{test_config, IsolatedEnv};
use mhs_probe::config::{Config, ConfigError, EnvironmentFixture, CONFIG_TEMPLATE};
use serial_test::serial;
use std::fs;

const SAMPLE: &str = r#"
nhs_environment = "dev"
mhs_inbound_url = "https://inbound.example.test"

[fixtures.dev]
repo_asid = "200000001161"
nhs_number = "9692294951"
gp_ods_code = "N82668"

[fixtures.test]
repo_asid = "200000001162"
nhs_number = "9692294952"
gp_ods_code = "B86041"
"#;

#[test]
fn test_parse_fixtures_per_environment() {
    let config = Config::from_toml_str(SAMPLE).unwrap();

    assert_eq!(config.nhs_environment().unwrap(), "dev");
    assert_eq!(config.fixtures.len(), 2);
    assert_eq!(
        config.fixture().unwrap(),
        &EnvironmentFixture {
            repo_asid: "200000001161".to_string(),
            nhs_number: "9692294951".to_string(),
            gp_ods_code: "N82668".to_string(),
        }
    );

    let test_env = config.with_environment("test");
    assert_eq!(test_env.fixture().unwrap().gp_ods_code, "B86041");
}

#[test]
fn test_urls_derive_from_environment() {
    let config = Config::from_toml_str(SAMPLE).unwrap();

    assert_eq!(config.inbound_url().unwrap(), "https://inbound.example.test");
    assert_eq!(
        config.outbound_url().unwrap(),
        "https://outbound.mhs.dev.non-prod.patient-deductions.nhs.uk"
    );

    let mut derived = config.with_environment("test");
    derived.mhs_inbound_url = None;
    assert_eq!(
        derived.inbound_url().unwrap(),
        "https://inbound.mhs.test.non-prod.patient-deductions.nhs.uk"
    );
}

#[test]
fn test_unknown_and_missing_environment() {
    let config = Config::from_toml_str(SAMPLE).unwrap().with_environment("prod");
    assert!(matches!(config.fixture(), Err(ConfigError::UnknownEnvironment(ref e)) if e == "prod"));

    let blank = Config::default().with_environment("  ");
    assert!(matches!(blank.nhs_environment(), Err(ConfigError::MissingEnvironment)));
    assert!(matches!(Config::default().outbound_url(), Err(ConfigError::MissingEnvironment)));
}

#[test]
fn test_parse_error_is_reported() {
    let err = Config::from_toml_str("nhs_environment = [").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_check_validates_urls_and_fixture() {
    assert!(test_config().check().is_ok());

    let mut bad_url = test_config();
    bad_url.mhs_outbound_url = Some("outbound without scheme".to_string());
    assert!(matches!(bad_url.check(), Err(ConfigError::InvalidUrl { .. })));

    let mut no_fixture = test_config();
    no_fixture.fixtures.clear();
    assert!(matches!(no_fixture.check(), Err(ConfigError::UnknownEnvironment(_))));
}

#[test]
fn test_template_parses() {
    let config = Config::from_toml_str(CONFIG_TEMPLATE).unwrap();
    assert_eq!(config.nhs_environment().unwrap(), "dev");
    assert!(config.fixture().is_ok());
    assert!(config.mhs_inbound_url.is_none());
}

#[test]
fn test_init_at_does_not_overwrite() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("nested").join("config.toml");

    assert!(Config::init_at(&path).unwrap());
    fs::write(&path, SAMPLE).unwrap();
    assert!(!Config::init_at(&path).unwrap());
    assert_eq!(fs::read_to_string(&path).unwrap(), SAMPLE);
}

#[test]
fn test_toml_string_round_trip() {
    let config = test_config();
    let text = config.to_toml_string().unwrap();
    assert_eq!(Config::from_toml_str(&text).unwrap(), config);
}

#[test]
#[serial]
fn test_load_applies_env_overrides() {
    let env = IsolatedEnv::new();
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, SAMPLE).unwrap();

    env.set("NHS_ENVIRONMENT", "test");
    env.set("MHS_OUTBOUND_URL", "http://localhost:9000");
    env.set("MHS_INBOUND_URL", "");

    let config = Config::load(Some(&path)).unwrap();

    assert_eq!(config.nhs_environment().unwrap(), "test");
    assert_eq!(config.outbound_url().unwrap(), "http://localhost:9000");
    // empty values do not override
    assert_eq!(config.inbound_url().unwrap(), "https://inbound.example.test");
}

#[test]
#[serial]
fn test_load_from_env_config_path() {
    let env = IsolatedEnv::new();
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("probe.toml");
    fs::write(&path, SAMPLE).unwrap();
    env.set("MHS_PROBE_CONFIG", path.to_str().unwrap());

    let config = Config::load(None).unwrap();
    assert_eq!(config.fixtures.len(), 2);
}

#[test]
#[serial]
fn test_load_missing_explicit_file_fails() {
    let _env = IsolatedEnv::new();
    let temp_dir = tempfile::tempdir().unwrap();

    let err = Config::load(Some(&temp_dir.path().join("absent.toml"))).unwrap_err();
    assert!(matches!(err, ConfigError::Read(_)));
}

#[test]
#[serial]
fn test_load_with_source_reports_env_config_path() {
    let env = IsolatedEnv::new();
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("from-env.toml");
    fs::write(&path, SAMPLE).unwrap();
    env.set("MHS_PROBE_CONFIG", path.to_str().unwrap());

    let (config, source) = Config::load_with_source(None).unwrap();

    assert_eq!(source, Some(path));
    assert_eq!(config.fixtures.len(), 2);
}

#[test]
#[serial]
fn test_explicit_path_wins_over_env_config_path() {
    let env = IsolatedEnv::new();
    let temp_dir = tempfile::tempdir().unwrap();
    let explicit = temp_dir.path().join("explicit.toml");
    env.set("MHS_PROBE_CONFIG", temp_dir.path().join("from-env.toml").to_str().unwrap());

    let resolved = Config::resolve_path(Some(&explicit)).unwrap();

    assert_eq!(resolved, Some(explicit));
}
