//! Property-based tests for search and replace
//!
//! Uses proptest to generate random rule sets and verify invariants

use dmn_search::{
    derive_columns, replace_in_rule, search_rules, Cell, ColumnKind, DirectEditor, InputClause,
    OutputClause, PatternMode, ReplaceRequest, Rule, SearchRequest,
};
use proptest::prelude::*;
use std::collections::HashSet;

proptest! {
    #[test]
    fn test_negation_partitions_rules(
        rules in any_rules(),
        term in "[a-c]{1,2}",
        column in any_column_id(),
    ) {
        let columns = columns();
        let request = SearchRequest { term: Some(term), column_id: column };
        let hits = search_rules(Some(rules.as_slice()), &columns, false, &request);
        let misses = search_rules(Some(rules.as_slice()), &columns, true, &request);

        prop_assert_eq!(hits.len() + misses.len(), rules.len());
        let hit_ids: HashSet<_> = hits.iter().map(|r| r.id.as_str()).collect();
        prop_assert!(misses.iter().all(|r| !hit_ids.contains(r.id.as_str())));
    }

    #[test]
    fn test_results_preserve_order(rules in any_rules(), term in "[a-c]{1,2}") {
        let columns = columns();
        let request = SearchRequest::term(term);
        let hits = search_rules(Some(rules.as_slice()), &columns, false, &request);
        let positions: Vec<_> = hits
            .iter()
            .map(|h| rules.iter().position(|r| r.id == h.id).unwrap())
            .collect();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_empty_term_identity(rules in any_rules(), blank in " {0,3}") {
        let columns = columns();
        let request = SearchRequest::term(blank);
        let all = search_rules(Some(rules.as_slice()), &columns, false, &request);
        prop_assert_eq!(all.len(), rules.len());
        prop_assert!(search_rules(Some(rules.as_slice()), &columns, true, &request).is_empty());
    }

    #[test]
    fn test_search_is_idempotent(
        rules in any_rules(),
        term in "[a-c]{1,2}",
        negate in any::<bool>()
    ) {
        let columns = columns();
        let request = SearchRequest::term(term);
        let first = search_rules(Some(rules.as_slice()), &columns, negate, &request);
        let second = search_rules(Some(rules.as_slice()), &columns, negate, &request);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_search_ignores_case(rules in any_rules(), term in "[a-c]{1,2}") {
        let columns = columns();
        let lower_request = SearchRequest::term(term.clone());
        let upper_request = SearchRequest::term(term.to_uppercase());
        let lower = search_rules(Some(rules.as_slice()), &columns, false, &lower_request);
        let upper = search_rules(Some(rules.as_slice()), &columns, false, &upper_request);
        prop_assert_eq!(lower, upper);
    }

    #[test]
    fn test_literal_replace_removes_needle(mut rule in any_rule(0), what in "[a-c]{1,2}") {
        let columns = columns();
        let request = ReplaceRequest::new(what.clone(), "#");
        let count = replace_in_rule(
            &mut rule,
            &columns,
            &request,
            &mut DirectEditor,
            PatternMode::Literal.into(),
        )
        .unwrap();

        prop_assert!(count <= 3);
        let request = SearchRequest::term(what);
        let hits = search_rules(Some(std::slice::from_ref(&rule)), &columns, false, &request);
        prop_assert!(hits.is_empty());
    }

    #[test]
    fn test_column_order(inputs in 0usize..4, outputs in 0usize..4) {
        let inputs: Vec<_> = (0..inputs)
            .map(|i| InputClause {
                id: format!("i{}", i),
                label: None,
                expression_text: format!("e{}", i),
            })
            .collect();
        let outputs: Vec<_> = (0..outputs)
            .map(|i| OutputClause { id: format!("o{}", i), name: None })
            .collect();
        let columns = derive_columns(&inputs, &outputs);

        prop_assert_eq!(columns.len(), inputs.len() + outputs.len() + 1);
        let kinds: Vec<_> = columns.iter().map(|c| c.kind).collect();
        let mut sorted = kinds.clone();
        sorted.sort_by_key(|k| match k {
            ColumnKind::Output => 0,
            ColumnKind::Input => 1,
            ColumnKind::Annotation => 2,
        });
        prop_assert_eq!(&kinds, &sorted);
        prop_assert_eq!(kinds.last(), Some(&ColumnKind::Annotation));
    }
}

fn columns() -> Vec<dmn_search::Column> {
    derive_columns(
        &[InputClause {
            id: "i0".into(),
            label: None,
            expression_text: "x".into(),
        }],
        &[OutputClause {
            id: "o0".into(),
            name: None,
        }],
    )
}

fn any_column_id() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some("i0".to_string())),
        Just(Some("o0".to_string())),
        Just(Some("description".to_string())),
        Just(Some("unknown".to_string())),
    ]
}

fn any_text() -> impl Strategy<Value = Option<String>> {
    prop::option::of("[a-cA-C ]{0,6}")
}

fn any_rule(id: usize) -> impl Strategy<Value = Rule> {
    (any_text(), any_text(), any_text()).prop_map(move |(input, output, annotation)| Rule {
        id: format!("r{}", id),
        input_entries: vec![Cell { text: input }],
        output_entries: vec![Cell { text: output }],
        annotation,
    })
}

fn any_rules() -> impl Strategy<Value = Vec<Rule>> {
    prop::collection::vec(any_rule(0), 0..8).prop_map(|rules| {
        rules
            .into_iter()
            .enumerate()
            .map(|(i, mut rule)| {
                rule.id = format!("r{}", i);
                rule
            })
            .collect()
    })
}
