//! Purpose: Demo of table construction, late-added columns, and membership filters.
//! Exports: None (example binary entry point only).
//! Role: Generates a random roster, then queries it; built via `cargo run --example`.
//! Invariants: Exercises only the public crate surface.
use serde_json::{Value, json};
use tabulite::{Column, Error, Row, Table};
use tracing_subscriber::EnvFilter;

const GIVEN_NAMES: [&str; 10] = [
    "Boris", "Theresa", "David", "Gordon", "Tony", "John", "Margaret", "James", "Harold", "Edward",
];
const FAMILY_NAMES: [&str; 10] = [
    "Johnson", "May", "Cameron", "Brown", "Blair", "Major", "Thatcher", "Callaghan", "Wilson",
    "Heath",
];
const COUNTIES: [&str; 6] = [
    "Cambridgeshire", "East Sussex", "Essex", "Kent", "Suffolk", "West Sussex",
];

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("membership demo failed: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Error> {
    let mut membership = Table::new("membership");
    let id = Column::new("id");
    let given_name = Column::new("givenName");
    let family_name = Column::new("familyName");
    membership.add([id.clone(), given_name.clone(), family_name.clone()])?;

    // The first ten members arrive before a county column exists; their
    // county value is silently dropped, exactly like an unknown record key.
    for n in 0..10 {
        membership.insert(&member(n));
    }

    let county = Column::new("county");
    membership.add([county.clone()])?;
    for n in 10..20 {
        membership.insert(&member(n));
    }

    for mut member in membership
        .filter(given_name.is_in(["David", "James"]))
        .select(&[id, given_name.clone(), family_name, county])
    {
        member
            .entry("county")
            .or_insert_with(|| json!("Not specified"));
        println!("{}", Value::Object(member));
    }

    Ok(())
}

fn member(id: usize) -> Row {
    let record = json!({
        "id": id,
        "givenName": pick(&GIVEN_NAMES),
        "familyName": pick(&FAMILY_NAMES),
        "county": pick(&COUNTIES),
    });
    match record {
        Value::Object(row) => row,
        _ => unreachable!(),
    }
}

fn pick(names: &[&'static str]) -> &'static str {
    names[fastrand::usize(..names.len())]
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init();
}
