use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Arg, Command, ValueHint};
use log::LevelFilter;

use dinesat::config::{ModelConfig, ModelType};
use dinesat::inference::CustomerRecord;
use dinesat::pipeline::SatisfactionPipeline;

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("DINESAT_LOG", "error,dinesat=info"))
        .init();

    let matches = Command::new("dinesat")
        .version(clap::crate_version!())
        .about("Restaurant customer satisfaction prediction")
        .arg(
            Arg::new("data")
                .help("Path to the customer satisfaction CSV dataset")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("record")
                .short('r')
                .long("record")
                .help(
                    "Path to a JSON file holding one inference request. \
                     Prompts interactively when omitted.",
                )
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("model_type")
                .short('m')
                .long("model_type")
                .help("Classifier backend to fit")
                .default_value("gbdt"),
        )
        .get_matches();

    let data = matches
        .get_one::<PathBuf>("data")
        .expect("data is a required argument");
    let model_type: ModelType = matches
        .get_one::<String>("model_type")
        .expect("model_type has a default")
        .parse()
        .map_err(anyhow::Error::msg)?;
    let config = ModelConfig::new(0.1, model_type);

    let pipeline = SatisfactionPipeline::from_csv(data, config)
        .with_context(|| format!("failed to initialize pipeline from {}", data.display()))?;

    if let Some(record_path) = matches.get_one::<PathBuf>("record") {
        let raw = std::fs::read_to_string(record_path)
            .with_context(|| format!("failed to read record file {}", record_path.display()))?;
        let record: CustomerRecord = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse record file {}", record_path.display()))?;
        return match pipeline.predict(&record) {
            Ok(verdict) => {
                println!("{}", render_verdict(verdict.is_highly_satisfied()));
                Ok(())
            }
            Err(err) => {
                eprintln!("prediction rejected: {}", err);
                std::process::exit(2);
            }
        };
    }

    run_interactive(&pipeline)
}

fn render_verdict(highly_satisfied: bool) -> &'static str {
    if highly_satisfied {
        "Customer is Highly Satisfied"
    } else {
        "Customer is Not Highly Satisfied"
    }
}

fn run_interactive(pipeline: &SatisfactionPipeline) -> Result<()> {
    let stdin = io::stdin();
    let mut prompter = Prompter {
        lines: stdin.lock().lines(),
    };

    println!("Enter customer details (model: {}).", pipeline.model_name());
    loop {
        let record = match prompt_record(pipeline, &mut prompter)? {
            Some(record) => record,
            None => break,
        };
        match pipeline.predict(&record) {
            Ok(verdict) => println!("{}", render_verdict(verdict.is_highly_satisfied())),
            Err(err) => eprintln!("prediction rejected: {}", err),
        }
        match prompter.yes_no("Predict another customer?")? {
            Some(true) => continue,
            _ => break,
        }
    }
    Ok(())
}

struct Prompter {
    lines: io::Lines<io::StdinLock<'static>>,
}

impl Prompter {
    /// Print a prompt and read one trimmed line. `None` on end of input.
    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        print!("{}: ", prompt);
        io::stdout().flush().context("failed to flush stdout")?;
        match self.lines.next() {
            Some(line) => Ok(Some(line.context("failed to read stdin")?.trim().to_string())),
            None => Ok(None),
        }
    }

    fn number<T: std::str::FromStr>(&mut self, prompt: &str) -> Result<Option<T>> {
        loop {
            let line = match self.ask(prompt)? {
                Some(line) => line,
                None => return Ok(None),
            };
            match line.parse::<T>() {
                Ok(value) => return Ok(Some(value)),
                Err(_) => eprintln!("not a valid number: '{}'", line),
            }
        }
    }

    /// Numbered menu over a column's valid labels.
    fn choice(&mut self, prompt: &str, labels: &[String]) -> Result<Option<String>> {
        for (idx, label) in labels.iter().enumerate() {
            println!("  {}. {}", idx + 1, label);
        }
        loop {
            let line = match self.ask(prompt)? {
                Some(line) => line,
                None => return Ok(None),
            };
            if let Ok(idx) = line.parse::<usize>() {
                if idx >= 1 && idx <= labels.len() {
                    return Ok(Some(labels[idx - 1].clone()));
                }
            }
            if let Some(label) = labels.iter().find(|l| l.as_str() == line) {
                return Ok(Some(label.clone()));
            }
            eprintln!("pick 1-{} or type one of the listed labels", labels.len());
        }
    }

    fn yes_no(&mut self, prompt: &str) -> Result<Option<bool>> {
        loop {
            let line = match self.ask(&format!("{} [Yes/No]", prompt))? {
                Some(line) => line,
                None => return Ok(None),
            };
            match line.as_str() {
                "Yes" | "yes" | "y" => return Ok(Some(true)),
                "No" | "no" | "n" => return Ok(Some(false)),
                other => eprintln!("answer Yes or No, got '{}'", other),
            }
        }
    }
}

macro_rules! ask_or_break {
    ($expr:expr) => {
        match $expr? {
            Some(value) => value,
            None => return Ok(None),
        }
    };
}

/// Collect one record from the terminal. Ranges in the prompts mirror the
/// original form's slider bounds; values are hints only, not validated.
fn prompt_record(
    pipeline: &SatisfactionPipeline,
    prompter: &mut Prompter,
) -> Result<Option<CustomerRecord>> {
    let categorical = |column: &str| -> Vec<String> {
        pipeline.labels(column).map(<[String]>::to_vec).unwrap_or_default()
    };

    let record = CustomerRecord {
        age: ask_or_break!(prompter.number("Age (18-70)")),
        gender: ask_or_break!(prompter.choice("Gender", &categorical("Gender"))),
        income: ask_or_break!(prompter.number("Income (10000-200000)")),
        visit_frequency: ask_or_break!(
            prompter.choice("Visit Frequency", &categorical("VisitFrequency"))
        ),
        preferred_cuisine: ask_or_break!(
            prompter.choice("Preferred Cuisine", &categorical("PreferredCuisine"))
        ),
        time_of_visit: ask_or_break!(
            prompter.choice("Time of Visit", &categorical("TimeOfVisit"))
        ),
        dining_occasion: ask_or_break!(
            prompter.choice("Dining Occasion", &categorical("DiningOccasion"))
        ),
        group_size: ask_or_break!(prompter.number("Group Size (1-10)")),
        meal_type: ask_or_break!(prompter.choice("Meal Type", &categorical("MealType"))),
        loyalty_program_member: yes_no_string(ask_or_break!(
            prompter.yes_no("Loyalty Program Member")
        )),
        average_spend: ask_or_break!(prompter.number("Average Spend (100-10000)")),
        service_rating: ask_or_break!(prompter.number("Service Rating (1-5)")),
        food_rating: ask_or_break!(prompter.number("Food Rating (1-5)")),
        ambiance_rating: ask_or_break!(prompter.number("Ambiance Rating (1-5)")),
        delivery_order: yes_no_string(ask_or_break!(prompter.yes_no("Delivery Order"))),
        online_reservation: yes_no_string(ask_or_break!(prompter.yes_no("Online Reservation"))),
        wait_time: ask_or_break!(prompter.number("Wait Time in minutes (0-60)")),
    };
    Ok(Some(record))
}

fn yes_no_string(value: bool) -> String {
    let answer = if value { "Yes" } else { "No" };
    answer.to_string()
}
