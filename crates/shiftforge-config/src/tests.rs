//! Tests for solver configuration.

use super::*;

#[test]
fn test_defaults() {
    let config = SolverConfig::default();
    assert_eq!(config.time_limit_millis, 10_000);
    assert_eq!(config.variable_ordering, VariableOrdering::FirstUnbound);
    assert_eq!(config.value_ordering, ValueOrdering::PreferZero);
    assert!(config.enable_pruning);
    assert!(config.phases.is_empty());
    assert_eq!(config.min_non_working_violation, Comparison::Less);
}

#[test]
fn test_empty_toml_matches_default() {
    let config = SolverConfig::from_toml_str("").unwrap();
    assert_eq!(config, SolverConfig::default());
}

#[test]
fn test_toml_parsing() {
    let toml = r#"
        time_limit_millis = 500
        variable_ordering = "min_domain_highest_max"
        value_ordering = "prefer_one"
        random_seed = 42
        enable_pruning = false
        min_non_working_violation = "less_or_equal"

        [[phases]]
        variable_ordering = "random"
        [phases.select]
        type = "workers"
        workers = [0, 2]

        [[phases]]
        value_ordering = "prefer_zero"
        [phases.select]
        type = "all"
    "#;

    let config = SolverConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.time_limit(), Duration::from_millis(500));
    assert_eq!(config.variable_ordering, VariableOrdering::MinDomainHighestMax);
    assert_eq!(config.value_ordering, ValueOrdering::PreferOne);
    assert_eq!(config.random_seed, Some(42));
    assert!(!config.enable_pruning);
    assert_eq!(config.min_non_working_violation, Comparison::LessOrEqual);
    assert_eq!(config.phases.len(), 2);
    assert_eq!(
        config.phases[0].select,
        PhaseSelection::Workers {
            workers: vec![0, 2]
        }
    );
    assert_eq!(config.phases[0].variable_ordering, Some(VariableOrdering::Random));
    assert_eq!(config.phases[1].value_ordering, Some(ValueOrdering::PreferZero));
}

#[test]
fn test_yaml_parsing_with_camel_case_names() {
    let yaml = r#"
        timeLimitMillis: 250
        variableOrdering: MinDomainLowestMax
        valueOrdering: PreferOne
        phases:
          - select:
              type: days
              days: [0]
            variableOrdering: FirstUnbound
    "#;

    let config = SolverConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.time_limit_millis, 250);
    assert_eq!(config.variable_ordering, VariableOrdering::MinDomainLowestMax);
    assert_eq!(config.value_ordering, ValueOrdering::PreferOne);
    assert_eq!(config.phases[0].select, PhaseSelection::Days { days: vec![0] });
    assert!(config.enable_pruning);
}

#[test]
fn test_empty_phase_selection_is_rejected() {
    let toml = r#"
        [[phases]]
        [phases.select]
        type = "shifts"
        shifts = []
    "#;

    let err = SolverConfig::from_toml_str(toml).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_unknown_ordering_is_a_parse_error() {
    let err = SolverConfig::from_toml_str(r#"variable_ordering = "sideways""#).unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)));
}

#[test]
fn test_load_missing_file() {
    let err = SolverConfig::load("/nonexistent/shiftforge.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_builder() {
    let config = SolverConfig::new()
        .with_time_limit_millis(60)
        .with_variable_ordering(VariableOrdering::Random)
        .with_value_ordering(ValueOrdering::PreferOne)
        .with_random_seed(123)
        .with_pruning(false)
        .with_min_non_working_violation(Comparison::Greater)
        .with_phase(PhaseConfig::new(PhaseSelection::Days { days: vec![1] }))
        .with_phase(
            PhaseConfig::default().with_variable_ordering(VariableOrdering::MinDomainLowestMin),
        );

    assert_eq!(config.time_limit(), Duration::from_millis(60));
    assert_eq!(config.random_seed, Some(123));
    assert!(!config.enable_pruning);
    assert_eq!(config.phases.len(), 2);
    assert_eq!(config.phases[1].select, PhaseSelection::All);
}

#[test]
fn test_selection_matches() {
    let sel = PhaseSelection::Shifts { shifts: vec![2] };
    assert!(sel.matches(0, 1, 2, 0));
    assert!(!sel.matches(0, 1, 1, 0));
    assert!(PhaseSelection::All.matches(3, 3, 3, 3));
    assert!(PhaseSelection::Workers { workers: vec![1] }.matches(1, 1, 1, 1));
}

#[test]
fn test_config_error_converts_to_config_variant() {
    let err = SolverConfig::from_toml_str("[[phases]]\n[phases.select]\ntype = \"days\"\ndays = []\n")
        .unwrap_err();
    let converted: ShiftForgeError = err.into();
    assert!(matches!(converted, ShiftForgeError::Config(_)));
}
