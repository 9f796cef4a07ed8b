mod common;

use common::{catalog, name};
use pretty_assertions::assert_eq;
use query_tree::editor::{ChildEditor, GroupEditor, RuleEditor};
use query_tree::error::EditError;
use query_tree::tree::TreeHelper;
use query_tree::{CatalogSpec, Edit, Group, Node, NodeName, Outcome, QueryBuilder};
use serde_json::{Value, json};
use std::cell::RefCell;
use std::rc::Rc;

fn set_field(value: &str) -> Edit {
    Edit::SetField {
        value: value.to_string(),
    }
}

fn set_operator(value: &str) -> Edit {
    Edit::SetOperator {
        value: value.to_string(),
    }
}

fn set_value(value: impl Into<Value>) -> Edit {
    Edit::SetValue {
        value: value.into(),
    }
}

#[test]
fn end_to_end_add_add_delete() {
    let mut qb = QueryBuilder::new(catalog()).unwrap();
    assert_eq!(
        serde_json::to_value(&*qb.tree()).unwrap(),
        json!({ "combinator": "AND", "nodeName": "1", "rules": [] })
    );

    let root = NodeName::root();
    qb.apply(&root, &Edit::AddRule).unwrap();
    qb.apply(&root, &Edit::AddGroup).unwrap();
    assert_eq!(
        serde_json::to_value(&*qb.tree()).unwrap(),
        json!({
            "combinator": "AND",
            "nodeName": "1",
            "rules": [
                { "field": "name", "operator": "eq", "value": "", "nodeName": "1/1" },
                { "combinator": "AND", "nodeName": "1/2", "rules": [] }
            ]
        })
    );

    assert_eq!(qb.apply(&name("1/1"), &Edit::Delete).unwrap(), Outcome::Changed);
    let tree = qb.snapshot();
    assert_eq!(tree.rules.len(), 1);
    assert_eq!(tree.rules[0].name(), &name("1/2"));
    assert_eq!(tree.rules[0].kind(), "group");

    let mut copy = tree.clone();
    assert!(TreeHelper::new(&mut copy).resolve(&name("1/1")).is_none());
    assert!(qb.rule_editor(&name("1/1")).is_none());
}

#[test]
fn nested_edits_reach_the_right_node_and_notify_once() {
    let notes = Rc::new(RefCell::new(0usize));
    let counter = Rc::clone(&notes);
    let mut qb = QueryBuilder::new(catalog())
        .unwrap()
        .on_change(move |_| *counter.borrow_mut() += 1);

    qb.apply(&NodeName::root(), &Edit::AddGroup).unwrap();
    qb.apply(&name("1/1"), &Edit::AddGroup).unwrap();
    qb.apply(&name("1/1/1"), &Edit::AddRule).unwrap();
    qb.apply(&name("1/1/1/1"), &set_field("age")).unwrap();
    qb.apply(&name("1/1/1/1"), &set_value("42")).unwrap();
    qb.apply(
        &name("1/1"),
        &Edit::SetCombinator {
            value: "OR".into(),
        },
    )
    .unwrap();
    assert_eq!(*notes.borrow(), 6);

    let tree = qb.snapshot();
    let inner = tree.rules[0].as_group().unwrap();
    assert_eq!(inner.combinator, "OR");
    let leaf = inner.rules[0].as_group().unwrap().rules[0].as_rule().unwrap();
    assert_eq!(leaf.field, "age");
    assert_eq!(leaf.operator, "eq");
    assert_eq!(leaf.value, Value::from("42"));

    // Ancestors re-resolved on the way up.
    assert_eq!(qb.group_editor(&name("1/1")).unwrap().combinator(), "OR");
    assert!(qb.rule_editor(&name("1/1/1/1")).is_some());
}

#[test]
fn field_change_resets_value_and_operator() {
    let mut qb = QueryBuilder::new(catalog()).unwrap();
    let rule = name("1/1");
    qb.apply(&NodeName::root(), &Edit::AddRule).unwrap();
    qb.apply(&rule, &set_operator("ne")).unwrap();
    qb.apply(&rule, &set_value("anything")).unwrap();

    // `age` allows [eq, gt] in catalog order; `ne` is not among them.
    qb.apply(&rule, &set_field("age")).unwrap();
    let r = qb.snapshot().rules[0].as_rule().unwrap().clone();
    assert_eq!(r.value, Value::from(""));
    assert_eq!(r.operator, "eq");

    let ops: Vec<_> = qb
        .rule_editor(&rule)
        .unwrap()
        .operators()
        .iter()
        .map(|o| o.operator.clone())
        .collect();
    assert_eq!(ops, vec!["eq", "gt"]);

    // An operator that survives the switch is kept.
    qb.apply(&rule, &set_operator("gt")).unwrap();
    qb.apply(&rule, &set_value(7)).unwrap();
    qb.apply(&rule, &set_field("email")).unwrap();
    let r = qb.snapshot().rules[0].as_rule().unwrap().clone();
    assert_eq!(r.operator, "gt");
    assert_eq!(r.value, Value::from(""));
}

#[test]
fn disallowed_operator_is_rejected_without_mutation() {
    let mut qb = QueryBuilder::new(catalog()).unwrap();
    let rule = name("1/1");
    qb.apply(&NodeName::root(), &Edit::AddRule).unwrap();
    qb.apply(&rule, &set_field("status")).unwrap();
    assert_eq!(qb.snapshot().rules[0].as_rule().unwrap().operator, "ne");

    let err = qb.apply(&rule, &set_operator("gt")).unwrap_err();
    assert!(matches!(err, EditError::OperatorNotAllowed { .. }));
    assert_eq!(qb.snapshot().rules[0].as_rule().unwrap().operator, "ne");

    let err = qb.apply(&rule, &set_field("shoe_size")).unwrap_err();
    assert!(matches!(err, EditError::UnknownField(_)));
    assert_eq!(qb.snapshot().rules[0].as_rule().unwrap().field, "status");
}

#[test]
fn wrong_kind_edits_are_errors() {
    let mut qb = QueryBuilder::new(catalog()).unwrap();
    qb.apply(&NodeName::root(), &Edit::AddRule).unwrap();

    assert!(matches!(
        qb.apply(&name("1/1"), &Edit::AddRule),
        Err(EditError::WrongKind { found: "rule", .. })
    ));
    assert!(matches!(
        qb.apply(&NodeName::root(), &set_field("age")),
        Err(EditError::WrongKind { found: "group", .. })
    ));
    assert!(matches!(
        qb.apply(&NodeName::root(), &Edit::SetCombinator { value: "XOR".into() }),
        Err(EditError::UnknownCombinator(_))
    ));
}

#[test]
fn invalid_values_are_stored_and_flagged() {
    let mut qb = QueryBuilder::new(catalog()).unwrap();
    let rule = name("1/1");
    qb.apply(&NodeName::root(), &Edit::AddRule).unwrap();
    qb.apply(&rule, &set_field("email")).unwrap();

    assert_eq!(qb.apply(&rule, &set_value("nope")).unwrap(), Outcome::Changed);
    assert_eq!(qb.snapshot().rules[0].as_rule().unwrap().value, Value::from("nope"));
    let editor = qb.rule_editor(&rule).unwrap();
    assert!(editor.is_invalid());
    assert_eq!(editor.error_text(), Some("needs an @"));

    qb.apply(&rule, &set_value("a@b")).unwrap();
    assert!(!qb.rule_editor(&rule).unwrap().is_invalid());

    // Default message when the field has none; field switch clears the flag.
    qb.apply(&rule, &set_field("age")).unwrap();
    qb.apply(&rule, &set_value("x1")).unwrap();
    assert_eq!(
        qb.rule_editor(&rule).unwrap().error_text(),
        Some("Input value is not correct")
    );
    qb.apply(&rule, &set_field("name")).unwrap();
    assert_eq!(qb.rule_editor(&rule).unwrap().error_text(), None);
}

#[test]
fn surviving_editors_keep_state_across_sibling_delete() {
    let mut qb = QueryBuilder::new(catalog()).unwrap();
    let root = NodeName::root();
    qb.apply(&root, &Edit::AddRule).unwrap();
    qb.apply(&root, &Edit::AddRule).unwrap();
    qb.apply(&name("1/2"), &set_field("email")).unwrap();
    qb.apply(&name("1/2"), &set_value("bad")).unwrap();

    qb.apply(&name("1/1"), &Edit::Delete).unwrap();
    let names: Vec<_> = qb
        .root_editor()
        .children()
        .iter()
        .map(|c| c.name().clone())
        .collect();
    assert_eq!(names, vec![name("1/2")]);
    assert!(qb.rule_editor(&name("1/2")).unwrap().is_invalid());

    // Next rule cannot reuse "1/2".
    qb.apply(&root, &Edit::AddRule).unwrap();
    assert_eq!(
        qb.names(),
        vec![NodeName::root(), name("1/2"), name("1/3")]
    );
}

#[test]
fn stale_editor_is_a_no_op() {
    let qb = QueryBuilder::new(catalog()).unwrap();
    let handle = qb.handle();
    let catalog = Rc::new(catalog());

    let mut root = GroupEditor::new(handle.clone(), NodeName::root(), Rc::clone(&catalog))
        .unwrap()
        .unwrap();
    let added = root.add_rule().unwrap().unwrap();

    // Two editors bound to the same rule, as two views of one tree would be.
    let mut first = RuleEditor::new(handle.clone(), added.clone(), Rc::clone(&catalog))
        .unwrap()
        .unwrap();
    let mut second = RuleEditor::new(handle.clone(), added.clone(), Rc::clone(&catalog))
        .unwrap()
        .unwrap();

    assert_eq!(first.delete_self(), Outcome::Changed);
    assert_eq!(second.set_value(Value::from("late")).unwrap(), Outcome::Stale);
    assert_eq!(second.set_field("age").unwrap(), Outcome::Stale);
    assert_eq!(second.set_operator("eq").unwrap(), Outcome::Stale);
    assert_eq!(second.delete_self(), Outcome::Stale);
    assert!(second.snapshot().is_none());
    assert!(qb.tree().rules.is_empty());

    // The group editor still lists the rule until it re-resolves.
    assert_eq!(root.children().len(), 1);
    assert_eq!(root.on_child_changed().unwrap(), Outcome::Changed);
    assert!(root.children().is_empty());
}

#[test]
fn editors_outliving_the_tree_report_stale() {
    let qb = QueryBuilder::new(catalog()).unwrap();
    let handle = qb.handle();
    let mut root = GroupEditor::new(handle.clone(), NodeName::root(), Rc::new(catalog()))
        .unwrap()
        .unwrap();
    assert!(handle.is_live());
    drop(qb);
    assert!(!handle.is_live());
    assert_eq!(handle.read(|r| r.names()), None);

    assert_eq!(root.add_rule().unwrap(), None);
    assert_eq!(
        root.set_combinator("OR").unwrap(),
        Outcome::Stale
    );
    assert!(root.snapshot().is_none());
}

#[test]
fn external_mutation_is_picked_up_on_refresh() {
    let mut qb = QueryBuilder::new(catalog()).unwrap();
    qb.handle()
        .with_helper(|h| {
            h.append(&NodeName::root(), |n| Node::Group(Group::seeded(n, "OR")))
        })
        .unwrap();
    assert!(qb.root_editor().children().is_empty());

    assert_eq!(qb.refresh().unwrap(), Outcome::Changed);
    match &qb.root_editor().children()[0] {
        ChildEditor::Group(g) => assert_eq!(g.combinator(), "OR"),
        ChildEditor::Rule(_) => panic!("expected a group editor"),
    }
}

#[test]
fn deleting_a_group_drops_its_whole_subtree() {
    let mut qb = QueryBuilder::new(catalog()).unwrap();
    let root = NodeName::root();
    qb.apply(&root, &Edit::AddRule).unwrap();
    qb.apply(&root, &Edit::AddGroup).unwrap();
    qb.apply(&name("1/2"), &Edit::AddRule).unwrap();
    qb.apply(&name("1/2"), &Edit::AddGroup).unwrap();
    qb.apply(&name("1/2/2"), &Edit::AddRule).unwrap();
    qb.apply(&root, &Edit::AddRule).unwrap();

    qb.apply(&name("1/2"), &Edit::Delete).unwrap();
    assert_eq!(qb.names(), vec![root, name("1/1"), name("1/3")]);
    assert!(qb.group_editor(&name("1/2")).is_none());
    assert!(qb.rule_editor(&name("1/2/2/1")).is_none());
    assert_eq!(
        qb.apply(&name("1/2/2/1"), &set_value("x")).unwrap(),
        Outcome::Stale
    );
}

#[test]
fn refresh_rederives_operator_sets_below_the_root() {
    let mut qb = QueryBuilder::new(catalog()).unwrap();
    qb.apply(&NodeName::root(), &Edit::AddGroup).unwrap();
    qb.apply(&name("1/1"), &Edit::AddRule).unwrap();
    assert_eq!(qb.rule_editor(&name("1/1/1")).unwrap().operators().len(), 3);

    qb.handle()
        .with_helper(|h| {
            let rule = h.rule_mut(&name("1/1/1")).unwrap();
            rule.field = "status".to_string();
            rule.operator = "ne".to_string();
        })
        .unwrap();
    qb.refresh().unwrap();

    let ops: Vec<_> = qb
        .rule_editor(&name("1/1/1"))
        .unwrap()
        .operators()
        .iter()
        .map(|o| o.operator.as_str())
        .collect();
    assert_eq!(ops, vec!["ne"]);
}

#[test]
fn change_listener_can_re_resolve_through_the_shared_root() {
    let qb = QueryBuilder::new(catalog()).unwrap();
    let handle = qb.handle();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&seen);
    let mut qb = qb.on_change(move |_| {
        let names = handle.read(|r| r.names().len());
        // A mutation from inside the notification is skipped, not a panic.
        let nested = handle.with_helper(|h| h.remove(&name("1/1")));
        log.borrow_mut().push((names, nested.is_none()));
    });

    qb.apply(&NodeName::root(), &Edit::AddRule).unwrap();
    qb.apply(&name("1/1"), &set_value("x")).unwrap();
    assert_eq!(*seen.borrow(), vec![(Some(2), true), (Some(2), true)]);
    assert_eq!(qb.names(), vec![NodeName::root(), name("1/1")]);
}

#[test]
fn value_check_uses_the_field_the_rule_holds_now() {
    let mut qb = QueryBuilder::new(catalog()).unwrap();
    let rule = name("1/1");
    qb.apply(&NodeName::root(), &Edit::AddRule).unwrap();

    // Switch to `email` behind the editor's back, no refresh.
    qb.handle()
        .with_helper(|h| h.rule_mut(&rule).unwrap().field = "email".to_string())
        .unwrap();
    qb.apply(&rule, &set_value("nobody")).unwrap();

    let editor = qb.rule_editor(&rule).unwrap();
    assert!(editor.is_invalid());
    assert_eq!(editor.error_text(), Some("needs an @"));
}

#[test]
fn field_without_matching_operators_keeps_the_stored_one() {
    let spec: CatalogSpec = serde_json::from_value(json!({
        "fields": [
            { "name": "name", "input": { "type": "text" } },
            { "name": "legacy", "operators": ["between"], "input": { "type": "text" } }
        ],
        "operators": [{ "operator": "eq", "label": "=" }],
        "combinators": [{ "combinator": "AND", "label": "All" }]
    }))
    .unwrap();
    let mut qb = QueryBuilder::new(spec.validate_and_build().unwrap()).unwrap();
    let rule = name("1/1");
    qb.apply(&NodeName::root(), &Edit::AddRule).unwrap();

    assert_eq!(qb.apply(&rule, &set_field("legacy")).unwrap(), Outcome::Changed);
    assert!(qb.rule_editor(&rule).unwrap().operators().is_empty());
    assert_eq!(qb.snapshot().rules[0].as_rule().unwrap().operator, "eq");
    assert!(matches!(
        qb.apply(&rule, &set_operator("eq")),
        Err(EditError::OperatorNotAllowed { .. })
    ));
}
