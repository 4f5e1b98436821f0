use super::*;
use crate::operator::ScriptedOperator;
use crate::test_support::FixtureTransport;

fn candidate(id: &str, title: &str) -> SeriesCandidate {
    SeriesCandidate {
        id: id.to_string(),
        title: title.to_string(),
        url: format!("https://www.bedetheque.com/serie/index/s/{id}"),
    }
}

#[test]
fn test_interpret_choice() {
    assert_eq!(interpret_choice("1", 3), MenuAction::Pick(0));
    assert_eq!(interpret_choice(" 3 ", 3), MenuAction::Pick(2));
    assert_eq!(interpret_choice("4", 3), MenuAction::EnterTitle);
    assert_eq!(interpret_choice("5", 3), MenuAction::Quit);
    assert_eq!(interpret_choice("6", 3), MenuAction::Quit);
    assert_eq!(interpret_choice("0", 3), MenuAction::Quit);
    assert_eq!(interpret_choice("two", 3), MenuAction::Quit);
    assert_eq!(interpret_choice("", 3), MenuAction::Quit);
    assert_eq!(interpret_choice("-1", 3), MenuAction::Quit);
}

#[test]
fn test_interpret_choice_without_candidates() {
    assert_eq!(interpret_choice("1", 0), MenuAction::EnterTitle);
    assert_eq!(interpret_choice("2", 0), MenuAction::Quit);
}

#[test]
fn test_menu_lines() {
    let lines = menu_lines(&[candidate("1", "Canardo"), candidate("2", "Canardo (Les)")]);
    assert_eq!(
        lines,
        vec!["Found those series", "1: Canardo", "2: Canardo (Les)", "3: other", "4: quit"]
    );
    assert_eq!(menu_lines(&[]), vec!["No series found", "1: enter a name", "2: quit"]);
}

#[test]
fn test_exact_match_requires_a_single_candidate() {
    let one = [candidate("1", "Blacksad"), candidate("2", "Blacksad (Artbook)")];
    assert_eq!(exact_match("blacksad", &one).map(|c| c.id), Some("1".to_string()));

    let two = [candidate("1", "Aria"), candidate("2", "ARIA")];
    assert_eq!(exact_match("Aria", &two), None);
    assert_eq!(exact_match("Aria", &[]), None);
}

#[test]
fn test_resolve_exact_match_without_prompting() {
    let transport = FixtureTransport::new().with_search("Blacksad", &[("3", "Blacksad"), ("9", "Blacksad (Artbook)")]);
    let mut operator = ScriptedOperator::default();

    let found = CatalogResolver::new(&transport, &mut operator, 5).resolve("Blacksad").unwrap();

    assert_eq!(found.unwrap().url, "https://www.bedetheque.com/serie/index/s/3");
    assert!(operator.prompts.is_empty());
}

#[test]
fn test_resolve_uses_normalized_search_key() {
    let transport = FixtureTransport::new().with_search("Schtroumpfs", &[("12", "Schtroumpfs (Les)")]);
    let mut operator = ScriptedOperator::new(["1"]);

    let found = CatalogResolver::new(&transport, &mut operator, 5).resolve("Les Schtroumpfs").unwrap();

    assert_eq!(transport.search_log.borrow().as_slice(), ["Schtroumpfs"]);
    // "Schtroumpfs (Les)" is not an exact match for "Les Schtroumpfs"
    assert_eq!(operator.prompts, vec![CHOICE_PROMPT]);
    assert_eq!(found.unwrap().id, "12");
}

#[test]
fn test_resolve_pick_from_menu() {
    let transport = FixtureTransport::new().with_search("Canardo", &[("74809", "Canardo (Portugal)"), ("401", "Canardo (France)")]);
    let mut operator = ScriptedOperator::new(["2"]);

    let found = CatalogResolver::new(&transport, &mut operator, 5).resolve("Canardo").unwrap();

    assert_eq!(found.unwrap().id, "401");
    assert_eq!(operator.shown[0], "Found those series");
}

#[test]
fn test_resolve_other_title_restarts_search() {
    let transport = FixtureTransport::new()
        .with_search("Thorgal", &[("1", "Thorgal (Les mondes de)")])
        .with_search("Kriss", &[("2", "Kriss de Valnor")]);
    let mut operator = ScriptedOperator::new(["2", "Kriss de Valnor"]);

    let found = CatalogResolver::new(&transport, &mut operator, 5).resolve("Thorgal").unwrap();

    assert_eq!(found.unwrap().id, "2");
    assert_eq!(operator.prompts, vec![CHOICE_PROMPT, TITLE_PROMPT]);
    assert_eq!(transport.search_log.borrow().as_slice(), ["Thorgal", "Kriss"]);
}

#[test]
fn test_resolve_no_results_still_offers_a_title() {
    let transport = FixtureTransport::new().with_search("Spirou", &[("5", "Spirou et Fantasio")]);
    let mut operator = ScriptedOperator::new(["1", "Spirou et Fantasio"]);

    let found = CatalogResolver::new(&transport, &mut operator, 5).resolve("Inconnu").unwrap();

    assert_eq!(operator.shown[0], "No series found");
    assert_eq!(found.unwrap().id, "5");
}

#[test]
fn test_resolve_quit_and_invalid_input_abandon() {
    let transport = FixtureTransport::new().with_search("Aria", &[("1", "Aria (Intégrale)")]);

    let mut quit = ScriptedOperator::new(["3"]);
    assert_eq!(CatalogResolver::new(&transport, &mut quit, 5).resolve("Aria").unwrap(), None);

    let mut garbage = ScriptedOperator::new(["yes please"]);
    assert_eq!(CatalogResolver::new(&transport, &mut garbage, 5).resolve("Aria").unwrap(), None);

    let mut silent = ScriptedOperator::default();
    assert_eq!(CatalogResolver::new(&transport, &mut silent, 5).resolve("Aria").unwrap(), None);
}

#[test]
fn test_resolve_empty_title_answer_abandons() {
    let transport = FixtureTransport::new();
    let mut operator = ScriptedOperator::new(["1", "   "]);
    assert_eq!(CatalogResolver::new(&transport, &mut operator, 5).resolve("Rien").unwrap(), None);
}

#[test]
fn test_resolve_search_budget_is_bounded() {
    let transport = FixtureTransport::new();
    let mut operator = ScriptedOperator::new(["1", "Encore", "1", "Toujours", "1", "Jamais"]);

    let found = CatalogResolver::new(&transport, &mut operator, 3).resolve("Rien").unwrap();

    assert_eq!(found, None);
    assert_eq!(transport.search_log.borrow().len(), 3);
    assert_eq!(operator.remaining(), 0);
}
