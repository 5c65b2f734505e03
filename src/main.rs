use bancoerro::{
    check_field, parse_date, CalendarDate, Clock, DateError, DateRange, DateRangeValidator,
    FixedClock, NotificationSink, Rule, SystemClock, TracingSink, DATE_FORMAT,
};
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Date(#[from] DateError),
}

/// Where "today" comes from. At most one may be given; the local date is used otherwise.
#[derive(Args, Debug)]
#[group(required = false, multiple = false)]
struct DateArg {
    /// [DATE PROVIDER] Use the current UTC date as today. Exclusive with other date providers.
    #[arg(long)]
    utc: bool,

    /// [DATE PROVIDER] Use the current local date as today (the default). Exclusive with other
    /// date providers.
    #[arg(long)]
    local: bool,

    /// [DATE PROVIDER] Use a fixed date in format `DD/MM/YYYY` as today. Exclusive with other date
    /// providers.
    #[arg(long, value_name = DATE_FORMAT)]
    today: Option<String>,
}

impl DateArg {
    fn to_clock(&self) -> Result<Box<dyn Clock>, CliError> {
        // group is not multiple, so at most one of these is set
        if self.utc {
            return Ok(Box::new(SystemClock::Utc));
        }
        if let Some(today) = &self.today {
            return Ok(Box::new(FixedClock(today.parse::<CalendarDate>()?)));
        }
        if self.local {
            debug!("Using local date as today");
        }
        Ok(Box::new(SystemClock::Local))
    }
}

/// Rules to apply to a date range. Each flag adds one rule; they run in the order listed here.
#[derive(Args, Debug)]
struct RuleArgs {
    /// The start must not be after the end. A missing bound fails.
    #[arg(long)]
    ordering: bool,

    /// The end must not be after today. A missing end fails.
    #[arg(long)]
    not_future: bool,

    /// The start must not be more than N months (plus one day) before today.
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    max_age_months: Option<i32>,

    /// The end must not be more than N days after the start.
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    max_gap_days: Option<i32>,

    /// The end must not be more than N years after the start.
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    max_span_years: Option<i32>,

    /// The start must not be more than N years before today.
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    max_years_ago: Option<i32>,
}

impl RuleArgs {
    fn to_rules(&self) -> Vec<Rule> {
        let flags = [
            self.ordering.then_some(Rule::StartAfterEnd),
            self.not_future.then_some(Rule::EndAfterToday),
            self.max_age_months.map(Rule::StartOlderThanMonths),
            self.max_gap_days.map(Rule::GapExceedsDays),
            self.max_span_years.map(Rule::StartWithinYearsOfEnd),
            self.max_years_ago.map(Rule::StartWithinYearsOfToday),
        ];
        flags.into_iter().flatten().collect()
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
#[command(arg_required_else_help(true))]
enum Commands {
    /// Parses a `DD/MM/YYYY` date and prints it normalized. Blank input prints an empty line.
    Parse {
        /// The date string to parse
        date: String,
    },

    /// Checks that a form field holds a `DD/MM/YYYY`-shaped date.
    Valid {
        /// The field's name, used in the error message
        #[arg(short, long, default_value = "Date")]
        label: String,

        /// The field's content. Omit for an empty field.
        date: Option<String>,
    },

    /// Validates a date range against business rules and prints the key of the first rule that
    /// fails, or `ok`.
    Check {
        /// Start of the range in `DD/MM/YYYY`. Omit or leave blank for no start.
        #[arg(long, default_value = "")]
        start: String,

        /// End of the range in `DD/MM/YYYY`. Omit or leave blank for no end.
        #[arg(long, default_value = "")]
        end: String,

        #[command(flatten)]
        rules: RuleArgs,

        #[command(flatten)]
        date: DateArg,
    },

    /// Prints the earliest date a calendar picker should offer: today minus N months.
    MinDate {
        /// Number of months back. Non-positive values print an empty line.
        #[arg(short, long, allow_negative_numbers = true)]
        months: i32,

        #[command(flatten)]
        date: DateArg,
    },
}

type Output = (String, i32);

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_filter_from_verbosity(cli.verbose)));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    debug!(?cli, "Parsed arguments");

    match do_work(cli) {
        Ok((output, exit_code)) => {
            println!("{output}");
            std::process::exit(exit_code);
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

fn do_work(cli: Cli) -> Result<Output, CliError> {
    match cli.command {
        Some(Commands::Parse { date }) => {
            let parsed = parse_date(&date)?;
            Ok((bancoerro::format_date(parsed.as_ref()), 0))
        }
        Some(Commands::Valid { label, date }) => {
            let outcome = check_field(date.as_deref(), &label);
            if let Some(message) = outcome.message() {
                TracingSink.display_error(message);
                Ok((message.to_owned(), 1))
            } else {
                Ok(("true".to_string(), 0))
            }
        }
        Some(Commands::Check {
            start,
            end,
            rules,
            date,
        }) => {
            let clock = date.to_clock()?;
            let validator = DateRangeValidator::new(&*clock);
            let range = DateRange::parse(&start, &end)?;
            let outcome = validator.validate(&range, &rules.to_rules());
            Ok(match outcome.message_key {
                None => ("ok".to_string(), 0),
                Some(key) => (key.to_string(), 1),
            })
        }
        Some(Commands::MinDate { months, date }) => {
            let clock = date.to_clock()?;
            let validator = DateRangeValidator::new(&*clock);
            Ok((validator.minimum_date(months), 0))
        }
        None => unreachable!("clap should catch this no-subcommand case"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    fn run(args: &[&str]) -> Result<Output, CliError> {
        let cli = Cli::try_parse_from(args).unwrap();
        do_work(cli)
    }

    #[rstest]
    #[case(&["bancoerro", "parse", "5/3/2024"], "05/03/2024", 0)]
    #[case(&["bancoerro", "parse", ""], "", 0)]
    #[case(&["bancoerro", "valid", "--label", "Start", "1/2/2024"], "true", 0)]
    #[case(&["bancoerro", "valid", "--label", "Start"], "Start is required", 1)]
    #[case(&["bancoerro", "valid", "--label", "Start", "2024"], "Start is invalid", 1)]
    #[case(&["bancoerro", "min-date", "--months", "6", "--today", "15/01/2024"], "15/07/2023", 0)]
    #[case(&["bancoerro", "min-date", "--months", "0", "--today", "15/01/2024"], "", 0)]
    fn test_commands(#[case] args: &[&str], #[case] expected: &str, #[case] exit_code: i32) {
        assert_eq!((expected.to_string(), exit_code), run(args).unwrap());
    }

    #[rstest]
    #[case(&["--start", "01/01/2024", "--end", "31/12/2023", "--ordering"], "date.start_after_end")]
    #[case(&["--start", "01/01/2023", "--end", "31/12/2023", "--ordering"], "ok")]
    #[case(&["--end", "16/01/2024", "--not-future"], "date.end_after_today")]
    #[case(
        &["--start", "01/01/2020", "--end", "01/01/2023", "--max-span-years", "2"],
        "date.span_exceeds_years"
    )]
    #[case(
        &["--start", "01/01/2010", "--max-years-ago", "10"],
        "date.start_older_than_years"
    )]
    #[case(
        &["--start", "01/01/2023", "--max-age-months", "6"],
        "date.start_older_than_months"
    )]
    #[case(
        &["--start", "01/01/2024", "--end", "01/03/2024", "--max-gap-days", "30"],
        "date.gap_exceeds_days"
    )]
    #[case(
        &["--start", "01/01/2024", "--end", "01/03/2024", "--max-gap-days", "-1"],
        "ok"
    )]
    fn test_check(#[case] rule_args: &[&str], #[case] expected: &str) {
        let args: Vec<&str> = ["bancoerro", "check", "--today", "15/01/2024"]
            .into_iter()
            .chain(rule_args.iter().copied())
            .collect();
        let (output, exit_code) = run(&args).unwrap();
        assert_eq!(expected, output);
        assert_eq!(i32::from(expected != "ok"), exit_code);
    }

    #[test]
    fn test_bad_dates_are_errors() {
        assert!(matches!(
            run(&["bancoerro", "parse", "31/02/2024"]),
            Err(CliError::Date(DateError::InvalidFormat { .. }))
        ));
        assert!(run(&["bancoerro", "check", "--today", "2024-01-15", "--ordering"]).is_err());
        assert!(run(&["bancoerro", "check", "--start", "x", "--ordering"]).is_err());
    }

    #[test]
    fn test_date_providers_are_exclusive() {
        let both = ["bancoerro", "min-date", "-m", "1", "--utc", "--local"];
        assert!(Cli::try_parse_from(both).is_err());
        assert!(Cli::try_parse_from(["bancoerro", "min-date", "-m", "1", "--utc"]).is_ok());
    }

    #[test]
    fn test_rule_order() {
        let rules = RuleArgs {
            ordering: true,
            not_future: true,
            max_age_months: None,
            max_gap_days: Some(3),
            max_span_years: None,
            max_years_ago: Some(10),
        };
        assert_eq!(
            vec![
                Rule::StartAfterEnd,
                Rule::EndAfterToday,
                Rule::GapExceedsDays(3),
                Rule::StartWithinYearsOfToday(10),
            ],
            rules.to_rules()
        );
    }
}
