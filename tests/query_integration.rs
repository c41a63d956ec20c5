// End-to-end coverage of the public surface: building tables, late-added
// columns, converters, aliases, and composed query filters.
use serde_json::{Value, json};
use tabulite::{Column, Row, Table, and, not, or};

fn row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

fn membership() -> (Table, Column, Column, Column) {
    let mut table = Table::new("membership");
    let id = Column::new("id");
    let given_name = Column::new("givenName");
    let family_name = Column::new("familyName");
    table
        .add([id.clone(), given_name.clone(), family_name.clone()])
        .expect("add columns");

    let members = [
        ("Boris", "Johnson"),
        ("Theresa", "May"),
        ("David", "Cameron"),
        ("Gordon", "Brown"),
        ("Tony", "Blair"),
        ("John", "Major"),
        ("Margaret", "Thatcher"),
        ("James", "Callaghan"),
        ("Harold", "Wilson"),
        ("David", "Steel"),
    ];
    for (n, (given, family)) in members.iter().enumerate() {
        let index = table.insert(&row(json!({
            "id": n,
            "givenName": given,
            "familyName": family,
            "county": "Kent",
        })));
        assert_eq!(index, n);
    }

    (table, id, given_name, family_name)
}

fn ids(rows: impl Iterator<Item = Row>) -> Vec<i64> {
    rows.map(|member| member.get("id").and_then(Value::as_i64).expect("id"))
        .collect()
}

#[test]
fn membership_flow_with_late_added_column() {
    let (mut table, id, given_name, family_name) = membership();

    // "county" arrives after ten rows already exist; they must read as empty.
    let county = Column::new("county");
    table.add([county.clone()]).expect("add county");
    for n in 10..13 {
        table.insert(&row(json!({
            "id": n,
            "givenName": "Edward",
            "familyName": "Heath",
            "county": "Essex",
        })));
    }

    assert_eq!(table.rows(), 13);
    for n in 0..10 {
        assert_eq!(county.value(n), None, "backfilled row {n}");
    }
    assert_eq!(county.value(10), Some(json!("Essex")));

    let selected: Vec<Row> = table
        .filter(given_name.is_in(["David", "James"]))
        .select(&[id.clone(), given_name.clone(), family_name.clone(), county.clone()])
        .collect();
    assert_eq!(ids(selected.clone().into_iter()), vec![2, 7, 9]);

    // Rows 2/7/9 predate the county column, so the key is absent entirely.
    for member in &selected {
        assert_eq!(member.get("county"), None);
    }
    let keys: Vec<&String> = selected[0].keys().collect();
    assert_eq!(keys, ["id", "givenName", "familyName"]);
}

#[test]
fn equality_and_combinators_agree() {
    let (table, _, given_name, family_name) = membership();

    let davids = table.filter(given_name.equals("David"));
    assert_eq!(davids.indexes().collect::<Vec<_>>(), vec![2, 9]);

    let cameron_david = davids.filter(family_name.equals("Cameron"));
    assert_eq!(cameron_david.indexes().collect::<Vec<_>>(), vec![2]);

    // where(A).where(B) == where(and(A, B)) == where(B).where(A)
    let conjoined = table.filter(and([
        given_name.equals("David"),
        family_name.equals("Cameron"),
    ]));
    assert_eq!(
        conjoined.indexes().collect::<Vec<_>>(),
        cameron_david.indexes().collect::<Vec<_>>()
    );

    let either = table.filter(or([
        given_name.equals("Margaret"),
        given_name.equals("Harold"),
    ]));
    assert_eq!(either.indexes().collect::<Vec<_>>(), vec![6, 8]);

    let excluded = table.filter(not(given_name.is_in(["David", "James"])));
    assert_eq!(
        excluded.indexes().collect::<Vec<_>>(),
        vec![0, 1, 3, 4, 5, 6, 8]
    );
}

#[test]
fn absent_filter_values_match_nothing_and_leave_pools_alone() {
    let (table, _, given_name, _) = membership();
    let before = given_name.distinct().len();

    assert_eq!(table.filter(given_name.equals("Zeno")).indexes().count(), 0);
    assert_eq!(
        table
            .filter(given_name.is_in(["Zeno", "Parmenides"]))
            .indexes()
            .count(),
        0
    );
    assert_eq!(given_name.distinct().len(), before);
}

#[test]
fn aliases_project_under_their_own_name() {
    let (table, id, given_name, _) = membership();

    let forename = given_name.alias("forename");
    let first: Row = table
        .filter(id.equals(0))
        .select(&[forename])
        .next()
        .expect("row 0");
    assert_eq!(first.get("forename"), Some(&json!("Boris")));
    assert_eq!(first.get("givenName"), None);
}

#[test]
fn converters_shape_projection() {
    let (mut table, id, _, _) = membership();
    let initial = Column::new("initial").to(|value| {
        json!(value.as_str().and_then(|name| name.get(..1)).unwrap_or("?"))
    });
    table.add([initial.clone()]).expect("add initial");
    table.insert(&row(json!({"id": 10, "initial": "Edward"})));

    let last: Row = table
        .filter(id.equals(10))
        .select(&[initial])
        .next()
        .expect("row 10");
    assert_eq!(last.get("initial"), Some(&json!("E")));
}

#[test]
fn date_ranges_via_evaluate() {
    // The between.ts scenario: rows span [from, to] ranges, the query keeps
    // the ranges containing a probe point.
    let mut table = Table::new("ranges");
    let name = Column::new("name");
    let from = Column::new("from");
    let to = Column::new("to");
    table
        .add([name.clone(), from.clone(), to.clone()])
        .expect("add");

    for year in 1990..2000 {
        table.insert(&row(json!({
            "name": format!("{year} - {}", year + 5),
            "from": year,
            "to": year + 5,
        })));
    }

    let probe: i64 = 1997;
    let starts_before = from.evaluate(move |value| {
        value.and_then(Value::as_i64).is_some_and(|year| year <= probe)
    });
    let ends_after = to.evaluate(move |value| {
        value.and_then(Value::as_i64).is_some_and(|year| year >= probe)
    });

    let active: Vec<Row> = table
        .filter(starts_before)
        .filter(ends_after)
        .select(&[name.clone()])
        .collect();
    let names: Vec<&str> = active
        .iter()
        .map(|range| range.get("name").and_then(Value::as_str).expect("name"))
        .collect();
    assert_eq!(
        names,
        ["1992 - 1997", "1993 - 1998", "1994 - 1999", "1995 - 2000", "1996 - 2001", "1997 - 2002"]
    );
}

#[test]
fn serde_records_round_trip() {
    #[derive(serde::Serialize)]
    struct Member {
        id: u32,
        #[serde(rename = "givenName")]
        given_name: String,
        #[serde(rename = "familyName")]
        family_name: String,
    }

    let (mut table, id, _, _) = membership();
    let index = table
        .insert_from(&Member {
            id: 10,
            given_name: "Edward".into(),
            family_name: "Heath".into(),
        })
        .expect("insert record");
    assert_eq!(index, 10);

    let added: Vec<Row> = table.filter(id.equals(10)).select(&[]).collect();
    assert_eq!(
        added,
        vec![row(json!({
            "id": 10,
            "givenName": "Edward",
            "familyName": "Heath",
        }))]
    );
}

#[test]
fn deep_copied_tables_diverge() {
    let (table, _, given_name, _) = membership();
    let mut copied = Table::copy_of("membership-2026", &table);

    copied.insert(&row(json!({
        "id": 10,
        "givenName": "David",
        "familyName": "Lloyd George",
    })));

    assert_eq!(table.rows(), 10);
    assert_eq!(copied.rows(), 11);

    // The copy's columns answer queries built from the copy, not the source.
    let copied_given = copied.columns()[1].clone();
    assert_eq!(copied.filter(copied_given.is_in(["David"])).indexes().count(), 3);
    assert_eq!(table.filter(given_name.is_in(["David"])).indexes().count(), 2);
}
