use bson::Bson;
use loom_change::{Change, ChangeOp, Changes};

#[test]
fn set_inc_then_set_keeps_two_entries_in_insertion_order() {
    let mut changes = Changes::new();
    Change::set("name", "Ann").build(&mut changes);
    Change::inc("score").build(&mut changes);
    Change::set("score", 0).build(&mut changes);

    let entries: Vec<_> = changes.iter().cloned().collect();
    assert_eq!(
        entries,
        vec![Change::set("name", "Ann"), Change::set("score", 0)]
    );
}

#[test]
fn overwriting_keeps_original_position() {
    let mut changes = Changes::new();
    changes.set(Change::set("x", 1));
    changes.set(Change::set("y", 1));
    changes.set(Change::set("x", 2));

    let fields: Vec<_> = changes.iter().map(|c| c.field.as_str()).collect();
    assert_eq!(fields, ["x", "y"]);
    assert_eq!(changes.get("x").map(|c| &c.op), Some(&ChangeOp::Set(Bson::Int32(2))));
}

#[test]
fn empty_until_something_is_built() {
    let mut changes = Changes::new();
    assert!(changes.is_empty());

    changes.set_assoc("children", Changes::new());
    assert!(changes.is_empty());

    Change::fragment("updated_at = now()", []).build(&mut changes);
    assert!(!changes.is_empty());
}

#[test]
fn parent_with_children_in_one_value() {
    let mut order: Changes = [Change::set("status", "paid"), Change::inc_by("version", 1)]
        .into_iter()
        .collect();
    order.assoc_mut("items").extend([
        Change::dec_by("stock", 2),
        Change::fragment("reserved_at = ?", [Bson::String("2024-01-01".into())]),
    ]);
    order.assoc_mut("items").set(Change::dec_by("stock", 3));

    let assoc: Vec<_> = order.assoc().map(|(name, c)| (name, c.len())).collect();
    assert_eq!(assoc, vec![("items", 2)]);
    assert_eq!(
        order.get_assoc("items").and_then(|c| c.get("stock")),
        Some(&Change::dec_by("stock", 3))
    );
}

#[test]
fn changes_walk_in_order_for_translators() {
    let mut changes = Changes::new();
    Change::set("name", "Ann").build(&mut changes);
    Change::inc("logins").build(&mut changes);
    Change::set("name", "Anne").build(&mut changes);
    Change::dec_by("credits", 2).build(&mut changes);

    let mut rendered = Vec::new();
    for change in &changes {
        rendered.push(match &change.op {
            ChangeOp::Set(_) => format!("{} = ?", change.field),
            ChangeOp::Inc(n) => format!("{0} = {0} + {n}", change.field),
            ChangeOp::Dec(n) => format!("{0} = {0} - {n}", change.field),
            ChangeOp::Fragment(_) => change.field.clone(),
        });
    }
    assert_eq!(
        rendered,
        ["name = ?", "logins = logins + 1", "credits = credits - 2"]
    );
}

#[test]
fn serialized_changes_round_trip() {
    let mut changes = Changes::new();
    changes.set(Change::set("name", "Ann"));
    changes.set(Change::dec("credits"));
    changes.assoc_mut("profile").set(Change::set("bio", "hi"));

    let json = serde_json::to_string(&changes).unwrap();
    let back: Changes = serde_json::from_str(&json).unwrap();
    assert_eq!(back, changes);
}
