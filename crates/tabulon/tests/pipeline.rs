//! End-to-end pipeline coverage: tokenize, filter, sort, slice, fragment

use pretty_assertions::assert_eq;
use tabulon::prelude::*;

const DOCUMENT: &str = "\
name,country,id\n\
alice,DE,3\n\
bob,AT,2\n\
carol,DE,1\n\
dave,AT,9\n\
erin,CH,5\n";

fn read_records() -> Vec<Record> {
    let options = ReadOptions {
        has_header: true,
        ..ReadOptions::default()
    };
    Reader::from_string(DOCUMENT, options)
        .collect::<CsvResult<Vec<_>>>()
        .unwrap()
}

fn field(record: &Record, name: &str) -> String {
    tabulon::resolve_column(record, &name.into())
        .unwrap()
        .unwrap()
}

#[test]
fn filter_sort_slice_by_name() {
    let statement = Statement::new()
        .where_by(
            ColumnPredicate::new("country", Comparison::NotEquals, Operand::value("CH"))
                .unwrap(),
        )
        .order_by(SortBy::descending("id"))
        .offset(1)
        .limit(2)
        .unwrap();

    let result = statement.process(read_records()).unwrap();
    let names: Vec<String> = result.iter().map(|r| field(r, "name")).collect();
    // ids 3,2,1,9 -> 9,3,2,1 -> skip one, take two
    assert_eq!(names, vec!["alice".to_string(), "bob".to_string()]);
}

#[test]
fn criteria_combinators_compose() {
    let de = ColumnPredicate::new("country", Comparison::Equals, Operand::value("DE")).unwrap();
    let small_id =
        ColumnPredicate::new("id", Comparison::LesserThan, Operand::value(3)).unwrap();
    let criteria = Criteria::all(vec![std::sync::Arc::new(de)]).and(small_id);

    let result = Statement::new().where_by(criteria).process(read_records()).unwrap();
    let names: Vec<String> = result.iter().map(|r| field(r, "name")).collect();
    assert_eq!(names, vec!["carol".to_string()]);
}

#[test]
fn fragment_carves_the_result() {
    let records = read_records();
    let fragment = Fragment::from_expression("cell=1,1-2,2").unwrap();
    let sub = fragment.find_first(&records).unwrap();
    assert_eq!(sub.len(), 2);
    assert_eq!(sub[0], {
        let header: std::sync::Arc<[String]> =
            vec!["name".to_string(), "country".to_string()].into();
        Record::from_iter(["alice", "DE"]).with_header(header)
    });
}

#[test]
fn query_then_rewrite_round_trips() {
    let statement = Statement::new().order_by(SortBy::ascending("id"));
    let result = statement.process(read_records()).unwrap();

    let mut writer = Writer::new(Vec::new(), WriteOptions::default());
    for record in result.iter() {
        writer.write_record(record).unwrap();
    }
    let rewritten = String::from_utf8(writer.into_inner()).unwrap();
    assert_eq!(
        rewritten,
        "carol,DE,1\nbob,AT,2\nalice,DE,3\nerin,CH,5\ndave,AT,9\n"
    );
}
