use adk_algorithm::{AlgorithmSetup, CustomKind, SetupError, UniversePlan};
use adk_data::Resolution;

fn valid_builder() -> adk_algorithm::SetupBuilder {
    AlgorithmSetup::builder()
        .window_ymd((2018, 10, 1), (2019, 1, 1))
        .cash_micros(100_000_000_000)
        .add_equity("CPRI")
        .add_custom("CPRI", CustomKind::WeeklySentiment)
}

#[test]
fn scenario_a_complete_declaration_builds() {
    let setup = valid_builder().resolution(Resolution::Daily).build().unwrap();
    assert_eq!(setup.equities, ["CPRI"]);
    assert_eq!(setup.custom.len(), 1);
    assert!(setup.universe.is_none());
    assert!(setup.start < setup.end);
}

#[test]
fn scenario_inverted_or_missing_window_is_fatal() {
    let inverted = AlgorithmSetup::builder()
        .window_ymd((2019, 1, 1), (2018, 10, 1))
        .cash_micros(1_000_000)
        .add_equity("CPRI")
        .build();
    assert!(matches!(inverted, Err(SetupError::WindowOrder { .. })));

    let missing = AlgorithmSetup::builder()
        .cash_micros(1_000_000)
        .add_equity("CPRI")
        .build();
    assert!(matches!(missing, Err(SetupError::WindowOrder { .. })));

    let bad_date = AlgorithmSetup::builder()
        .window_ymd((2018, 2, 30), (2019, 1, 1))
        .cash_micros(1_000_000)
        .add_equity("CPRI")
        .build();
    assert_eq!(
        bad_date,
        Err(SetupError::InvalidDate {
            year: 2018,
            month: 2,
            day: 30
        })
    );
}

#[test]
fn scenario_cash_and_symbols_are_validated() {
    let no_cash = AlgorithmSetup::builder()
        .window_ymd((2018, 10, 1), (2019, 1, 1))
        .add_equity("CPRI")
        .build();
    assert!(matches!(no_cash, Err(SetupError::NonPositiveCash { .. })));

    let empty_symbol = AlgorithmSetup::builder()
        .window_ymd((2018, 10, 1), (2019, 1, 1))
        .cash_micros(1_000_000)
        .add_equity("  ")
        .build();
    assert_eq!(empty_symbol, Err(SetupError::EmptySymbol));

    let duplicate = valid_builder().add_equity("CPRI").build();
    assert!(matches!(
        duplicate,
        Err(SetupError::DuplicateSubscription { .. })
    ));

    // The same symbol under different subscription kinds is fine.
    assert!(valid_builder().build().is_ok());
}

#[test]
fn scenario_something_must_be_subscribed() {
    let nothing = AlgorithmSetup::builder()
        .window_ymd((2018, 10, 1), (2019, 1, 1))
        .cash_micros(1_000_000)
        .build();
    assert_eq!(nothing, Err(SetupError::NothingSubscribed));

    // A universe plan alone is a valid subscription surface.
    let universe_only = AlgorithmSetup::builder()
        .window_ymd((2018, 10, 1), (2019, 1, 1))
        .cash_micros(1_000_000)
        .universe(UniversePlan::default())
        .build();
    assert!(universe_only.is_ok());
}

#[test]
fn scenario_host_revalidates_whatever_it_is_handed() {
    let mut setup = valid_builder().build().unwrap();
    setup.cash_micros = -5;
    assert!(matches!(
        setup.validate(),
        Err(SetupError::NonPositiveCash { cash_micros: -5 })
    ));
}
