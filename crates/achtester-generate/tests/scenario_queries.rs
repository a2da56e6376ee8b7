use achtester_core::{ScenarioCounts, ScenarioKey};
use achtester_generate::{generate_scenario_queries, scenario_predicate};

#[test]
fn two_scenarios_give_two_limited_queries() {
    let counts: ScenarioCounts = [(ScenarioKey::YesNullNull, 5), (ScenarioKey::NoSetSet, 3)]
        .into_iter()
        .collect();
    let queries = generate_scenario_queries("checks", &counts);

    assert_eq!(queries.len(), 2);
    assert_ne!(queries[0].sql, queries[1].sql);

    let first = &queries[0];
    assert_eq!(first.scenario, ScenarioKey::YesNullNull);
    assert!(first.sql.contains("FROM checks\n"));
    assert!(first.sql.contains(&format!("WHERE {}\n", scenario_predicate(ScenarioKey::YesNullNull))));
    assert!(first.sql.ends_with("FETCH FIRST 5 ROWS ONLY;"));

    let second = &queries[1];
    assert!(second.sql.contains(&format!("WHERE {}\n", scenario_predicate(ScenarioKey::NoSetSet))));
    assert!(second.sql.ends_with("FETCH FIRST 3 ROWS ONLY;"));
}

#[test]
fn zero_and_absent_counts_emit_nothing() {
    let mut counts = ScenarioCounts::new();
    assert!(generate_scenario_queries("checks", &counts).is_empty());

    counts.set(ScenarioKey::YesSetNull, 0);
    counts.set(ScenarioKey::NoNullSet, 7);
    let queries = generate_scenario_queries("checks", &counts);
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].scenario, ScenarioKey::NoNullSet);
    assert_eq!(queries[0].count, 7);
    assert!(queries[0].sql.ends_with("FETCH FIRST 7 ROWS ONLY;"));
}

#[test]
fn every_count_is_echoed_in_its_limit() {
    let counts: ScenarioCounts = ScenarioKey::ALL
        .into_iter()
        .zip(1..)
        .collect();
    let queries = generate_scenario_queries("t", &counts);
    assert_eq!(queries.len(), 8);
    for query in queries {
        assert_eq!(query.count, counts.get(query.scenario));
        assert!(query.sql.ends_with(&format!("FETCH FIRST {} ROWS ONLY;", query.count)));
    }
}
