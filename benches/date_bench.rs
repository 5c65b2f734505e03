use bancoerro::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn ok_inputs() -> Vec<&'static str> {
    vec!["01/01/2024", "1/1/2024", "29/02/2024", "31/12/1999"]
}

fn parse_ok(inputs: &[&str]) {
    for input in inputs {
        let res = parse_date(input);
        assert!(matches!(res, Ok(Some(_))));
    }
}

fn invalid_inputs() -> Vec<&'static str> {
    vec!["31/02/2024", "29/02/2023", "2024-01-01", "01/01/24"]
}

fn parse_invalid(inputs: &[&str]) {
    for input in inputs {
        let res = parse_date(input);
        assert!(res.is_err());
    }
}

fn validate_ranges(validator: &DateRangeValidator<FixedClock>, ranges: &[DateRange]) {
    let rules = [
        Rule::StartAfterEnd,
        Rule::EndAfterToday,
        Rule::StartOlderThanMonths(6),
        Rule::GapExceedsDays(90),
        Rule::StartWithinYearsOfEnd(2),
        Rule::StartWithinYearsOfToday(10),
    ];
    for range in ranges {
        black_box(validator.validate(range, &rules));
    }
}

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("parse_ok", |b| b.iter(|| parse_ok(black_box(&ok_inputs()))));
    c.bench_function("parse_invalid", |b| {
        b.iter(|| parse_invalid(black_box(&invalid_inputs())))
    });

    let today = CalendarDate::new(2024, 1, 15).unwrap();
    let validator = DateRangeValidator::new(FixedClock(today));
    let ranges = [
        DateRange::parse("01/01/2024", "10/01/2024").unwrap(),
        DateRange::parse("10/05/2023", "01/05/2023").unwrap(),
        DateRange::parse("01/01/2010", "").unwrap(),
    ];
    c.bench_function("validate_ranges", |b| {
        b.iter(|| validate_ranges(&validator, black_box(&ranges)))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
