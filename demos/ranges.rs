//! Purpose: Demo of cascading queries and `evaluate` filters over date ranges.
//! Exports: None (example binary entry point only).
//! Role: Finds the year ranges containing today; built via `cargo run --example`.
//! Invariants: Exercises only the public crate surface.
use std::error::Error as StdError;

use serde_json::{Value, json};
use tabulite::{Column, Operator, Row, Table};
use time::format_description::{self, FormatItem};
use time::{Date, Month, OffsetDateTime};
use tracing_subscriber::EnvFilter;

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("ranges demo failed: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn StdError>> {
    // Dates are stored as julian day numbers; converters render them back to
    // calendar dates at read time, so filters see the rendered form too.
    let format = format_description::parse("[year]-[month]-[day]")?;
    let mut ranges = Table::new("ranges");
    let name = Column::new("name");
    let from = Column::new("from").to(render_day(format.clone()));
    let to = Column::new("to").to(render_day(format.clone()));
    ranges.add([name.clone(), from.clone(), to.clone()])?;

    for year in 1970..2070 {
        let start = Date::from_calendar_date(year, Month::January, 1)?;
        let end = Date::from_calendar_date(year + 5, Month::December, 31)?;
        ranges.insert(&row(json!({
            "name": format!("{year} - {}", year + 5),
            "from": start.to_julian_day(),
            "to": end.to_julian_day(),
        })));
    }

    // Two cascading refinements; the first query remains usable on its own.
    let today = OffsetDateTime::now_utc().date();
    let started = ranges.filter(date_at_most(&from, format.clone(), today));
    let active = started.filter(date_at_least(&to, format, today));

    for range in active.select(&[name.clone(), from.clone(), to.clone()]) {
        println!("{}", Value::Object(range));
    }

    Ok(())
}

fn date_at_most(column: &Column, format: Vec<FormatItem<'static>>, bound: Date) -> Operator {
    column.evaluate(move |value| {
        parse_day(value, &format).is_some_and(|date| date <= bound)
    })
}

fn date_at_least(column: &Column, format: Vec<FormatItem<'static>>, bound: Date) -> Operator {
    column.evaluate(move |value| {
        parse_day(value, &format).is_some_and(|date| date >= bound)
    })
}

fn parse_day(value: Option<&Value>, format: &[FormatItem<'static>]) -> Option<Date> {
    let rendered = value.and_then(Value::as_str)?;
    Date::parse(rendered, format).ok()
}

fn render_day(format: Vec<FormatItem<'static>>) -> impl Fn(&Value) -> Value + 'static {
    move |value| {
        value
            .as_i64()
            .and_then(|day| i32::try_from(day).ok())
            .and_then(|day| Date::from_julian_day(day).ok())
            .and_then(|date| date.format(&format).ok())
            .map(Value::from)
            .unwrap_or_else(|| value.clone())
    }
}

fn row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init();
}
