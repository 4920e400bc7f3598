//! End-to-end tests for the satisfaction pipeline on a synthetic dataset.

use std::io::Write;

use dinesat::config::ModelConfig;
use dinesat::dataset::DataTable;
use dinesat::encoding::EncoderRegistry;
use dinesat::error::PipelineError;
use dinesat::inference::CustomerRecord;
use dinesat::pipeline::{
    SatisfactionPipeline, CATEGORICAL_COLUMNS, ID_COLUMN, TARGET_COLUMN,
};
use dinesat::schema::split_features;

const GENDERS: [&str; 2] = ["Male", "Female"];
const FREQUENCIES: [&str; 4] = ["Daily", "Weekly", "Monthly", "Rarely"];
const CUISINES: [&str; 5] = ["American", "Chinese", "Indian", "Italian", "Mexican"];
const TIMES: [&str; 3] = ["Breakfast", "Lunch", "Dinner"];
const OCCASIONS: [&str; 3] = ["Business", "Casual", "Celebration"];
const MEALS: [&str; 2] = ["Dine-in", "Takeaway"];

const N_ROWS: usize = 24;

/// Synthetic training table. The label follows ServiceRating alone
/// (>= 4 means highly satisfied), so the classifier can fit it exactly.
/// Row 5 has a missing AmbianceRating to exercise forward fill.
fn dataset_csv(force_label: Option<u32>) -> String {
    let mut csv = String::from(
        "CustomerID,Age,Gender,Income,VisitFrequency,PreferredCuisine,TimeOfVisit,\
         DiningOccasion,GroupSize,MealType,LoyaltyProgramMember,AverageSpend,\
         ServiceRating,FoodRating,AmbianceRating,DeliveryOrder,OnlineReservation,\
         WaitTime,HighSatisfaction\n",
    );
    for i in 0..N_ROWS {
        let service = (i % 5) + 1;
        let label = force_label.unwrap_or(u32::from(service >= 4));
        let ambiance = if i == 5 {
            String::new()
        } else {
            ((i % 3) + 2).to_string()
        };
        csv.push_str(&format!(
            "{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{}\n",
            1000 + i,
            20 + i,
            GENDERS[i % 2],
            30000 + 1000 * i,
            FREQUENCIES[i % 4],
            CUISINES[i % 5],
            TIMES[i % 3],
            OCCASIONS[i % 3],
            (i % 6) + 1,
            MEALS[i % 2],
            i % 2,
            200 + 25 * i,
            service,
            ((i + 2) % 5) + 1,
            ambiance,
            (i + 1) % 2,
            i % 2,
            5 + (i % 7) * 5,
            label,
        ));
    }
    csv
}

/// Raw request mirroring row `i` of the synthetic table, with the 0/1
/// boolean columns expressed as the "Yes"/"No" strings a form submits.
fn record_for_row(i: usize) -> CustomerRecord {
    assert_ne!(i, 5, "row 5 holds the forward-filled cell");
    CustomerRecord {
        age: (20 + i) as u32,
        gender: GENDERS[i % 2].to_string(),
        income: (30000 + 1000 * i) as u32,
        visit_frequency: FREQUENCIES[i % 4].to_string(),
        preferred_cuisine: CUISINES[i % 5].to_string(),
        time_of_visit: TIMES[i % 3].to_string(),
        dining_occasion: OCCASIONS[i % 3].to_string(),
        group_size: ((i % 6) + 1) as u32,
        meal_type: MEALS[i % 2].to_string(),
        loyalty_program_member: yes_no(i % 2 == 1),
        average_spend: (200 + 25 * i) as f32,
        service_rating: ((i % 5) + 1) as u8,
        food_rating: (((i + 2) % 5) + 1) as u8,
        ambiance_rating: ((i % 3) + 2) as u8,
        delivery_order: yes_no((i + 1) % 2 == 1),
        online_reservation: yes_no(i % 2 == 1),
        wait_time: (5 + (i % 7) * 5) as u32,
    }
}

fn yes_no(value: bool) -> String {
    let answer = if value { "Yes" } else { "No" };
    answer.to_string()
}

fn fitted_pipeline() -> SatisfactionPipeline {
    let table = DataTable::from_csv_reader(dataset_csv(None).as_bytes()).unwrap();
    SatisfactionPipeline::from_table(table, ModelConfig::default()).unwrap()
}

#[test]
fn initializes_from_csv_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("customers.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(dataset_csv(None).as_bytes()).unwrap();

    let pipeline = SatisfactionPipeline::from_csv(&path, ModelConfig::default()).unwrap();
    assert_eq!(pipeline.n_trained_rows(), N_ROWS);
    assert_eq!(pipeline.schema().len(), 17);
    // CustomerID and the target are gone; order is the table's.
    assert_eq!(pipeline.schema().columns()[0], "Age");
    assert!(pipeline.schema().position(ID_COLUMN).is_none());
    assert!(pipeline.schema().position(TARGET_COLUMN).is_none());
}

#[test]
fn missing_dataset_is_data_unavailable() {
    let err =
        SatisfactionPipeline::from_csv("/nonexistent/customers.csv", ModelConfig::default())
            .unwrap_err();
    assert!(matches!(err, PipelineError::DataUnavailable { .. }));
}

#[test]
fn category_codes_are_lexicographic() {
    let pipeline = fitted_pipeline();
    assert_eq!(
        pipeline.labels("Gender").unwrap(),
        &["Female".to_string(), "Male".to_string()]
    );
    assert_eq!(pipeline.encoders().encode("Gender", "Female").unwrap(), 0);
    assert_eq!(pipeline.encoders().encode("Gender", "Male").unwrap(), 1);
}

#[test]
fn adapter_row_matches_training_row() {
    // Build the training matrix the same way initialization does.
    let mut table = DataTable::from_csv_reader(dataset_csv(None).as_bytes()).unwrap();
    table.forward_fill();
    table.drop_column(ID_COLUMN);
    EncoderRegistry::build(&mut table, &CATEGORICAL_COLUMNS).unwrap();
    let training = split_features(&table, TARGET_COLUMN).unwrap();

    let pipeline = fitted_pipeline();
    for row in [0usize, 1, 7] {
        let assembled = pipeline.encode_record(&record_for_row(row)).unwrap();
        assert_eq!(assembled.as_slice(), training.x.row_slice(row));
    }
}

#[test]
fn training_row_predictions_are_reproduced() {
    let pipeline = fitted_pipeline();
    // Row 3 has ServiceRating 4 (highly satisfied), row 0 has 1.
    assert_eq!(pipeline.predict(&record_for_row(3)).unwrap().label(), 1);
    assert_eq!(pipeline.predict(&record_for_row(0)).unwrap().label(), 0);
}

#[test]
fn unknown_category_rejects_request_only() {
    let pipeline = fitted_pipeline();
    let mut record = record_for_row(0);
    record.gender = "Nonbinary".to_string();

    let err = pipeline.predict(&record).unwrap_err();
    assert_eq!(
        err,
        PipelineError::UnknownCategory {
            column: "Gender".to_string(),
            label: "Nonbinary".to_string(),
        }
    );

    // The fitted state is untouched; a valid request still works.
    assert!(pipeline.predict(&record_for_row(1)).is_ok());
}

#[test]
fn malformed_yes_no_is_rejected() {
    let pipeline = fitted_pipeline();
    let mut record = record_for_row(0);
    record.loyalty_program_member = "Maybe".to_string();

    let err = pipeline.predict(&record).unwrap_err();
    assert_eq!(
        err,
        PipelineError::UnknownCategory {
            column: "LoyaltyProgramMember".to_string(),
            label: "Maybe".to_string(),
        }
    );
}

#[test]
fn reinitialization_is_deterministic() {
    let first = fitted_pipeline();
    let second = fitted_pipeline();

    assert_eq!(first.schema(), second.schema());
    for column in CATEGORICAL_COLUMNS {
        assert_eq!(first.labels(column), second.labels(column));
    }
    for row in (0..N_ROWS).filter(|&r| r != 5) {
        let record = record_for_row(row);
        assert_eq!(
            first.predict(&record).unwrap(),
            second.predict(&record).unwrap()
        );
    }

    // Held-out records: valid categories, numeric values never trained on.
    for row in [0usize, 3, 8] {
        let mut record = record_for_row(row);
        record.age += 37;
        record.average_spend += 333.0;
        record.wait_time = 58;
        assert_eq!(
            first.predict(&record).unwrap(),
            second.predict(&record).unwrap()
        );
    }
}

#[test]
fn leading_missing_value_aborts_initialization() {
    // Blank out the first row's Age so forward fill cannot repair it.
    let csv = dataset_csv(None);
    let mut lines: Vec<String> = csv.lines().map(str::to_string).collect();
    let mut fields: Vec<&str> = lines[1].split(',').collect();
    fields[1] = "";
    lines[1] = fields.join(",");
    let broken = lines.join("\n");

    let table = DataTable::from_csv_reader(broken.as_bytes()).unwrap();
    let err = SatisfactionPipeline::from_table(table, ModelConfig::default()).unwrap_err();
    assert!(matches!(err, PipelineError::MalformedTable { .. }));
}

#[test]
fn single_class_labels_abort_initialization() {
    let table = DataTable::from_csv_reader(dataset_csv(Some(1)).as_bytes()).unwrap();
    let err = SatisfactionPipeline::from_table(table, ModelConfig::default()).unwrap_err();
    assert_eq!(err, PipelineError::DegenerateLabels { distinct: 1 });
}

#[test]
fn pipeline_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SatisfactionPipeline>();
}
