//! Raw inference requests and the predicted verdict.
//!
//! A request carries one raw value per feature column: categorical fields
//! as label strings, yes/no fields as the literal strings "Yes"/"No", the
//! rest as typed numerics. Serde renames keep the JSON keys identical to
//! the dataset's header names.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// One raw inference request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomerRecord {
    pub age: u32,
    pub gender: String,
    pub income: u32,
    pub visit_frequency: String,
    pub preferred_cuisine: String,
    pub time_of_visit: String,
    pub dining_occasion: String,
    pub group_size: u32,
    pub meal_type: String,
    pub loyalty_program_member: String,
    pub average_spend: f32,
    pub service_rating: u8,
    pub food_rating: u8,
    pub ambiance_rating: u8,
    pub delivery_order: String,
    pub online_reservation: String,
    pub wait_time: u32,
}

/// How one raw field enters the feature vector.
#[derive(Debug, Clone, Copy)]
pub(crate) enum RawField<'a> {
    Numeric(f32),
    Categorical(&'a str),
    YesNo(&'a str),
}

impl CustomerRecord {
    /// Resolve a feature column by name. Returns `None` for names the
    /// record does not carry; the mapping is an explicit match so the
    /// compiler sees every field.
    pub(crate) fn field(&self, column: &str) -> Option<RawField<'_>> {
        let value = match column {
            "Age" => RawField::Numeric(self.age as f32),
            "Gender" => RawField::Categorical(&self.gender),
            "Income" => RawField::Numeric(self.income as f32),
            "VisitFrequency" => RawField::Categorical(&self.visit_frequency),
            "PreferredCuisine" => RawField::Categorical(&self.preferred_cuisine),
            "TimeOfVisit" => RawField::Categorical(&self.time_of_visit),
            "DiningOccasion" => RawField::Categorical(&self.dining_occasion),
            "GroupSize" => RawField::Numeric(self.group_size as f32),
            "MealType" => RawField::Categorical(&self.meal_type),
            "LoyaltyProgramMember" => RawField::YesNo(&self.loyalty_program_member),
            "AverageSpend" => RawField::Numeric(self.average_spend),
            "ServiceRating" => RawField::Numeric(f32::from(self.service_rating)),
            "FoodRating" => RawField::Numeric(f32::from(self.food_rating)),
            "AmbianceRating" => RawField::Numeric(f32::from(self.ambiance_rating)),
            "DeliveryOrder" => RawField::YesNo(&self.delivery_order),
            "OnlineReservation" => RawField::YesNo(&self.online_reservation),
            "WaitTime" => RawField::Numeric(self.wait_time as f32),
            _ => return None,
        };
        Some(value)
    }
}

/// Translate a yes/no field. Anything other than the two literal values is
/// rejected rather than defaulted.
pub(crate) fn yes_no(column: &str, value: &str) -> Result<f32, PipelineError> {
    match value {
        "Yes" => Ok(1.0),
        "No" => Ok(0.0),
        other => Err(PipelineError::UnknownCategory {
            column: column.to_string(),
            label: other.to_string(),
        }),
    }
}

/// Binary prediction outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    HighlySatisfied,
    NotHighlySatisfied,
}

impl Verdict {
    pub fn from_label(label: i32) -> Verdict {
        if label == 1 {
            Verdict::HighlySatisfied
        } else {
            Verdict::NotHighlySatisfied
        }
    }

    /// Raw predicted label value.
    pub fn label(&self) -> i32 {
        match self {
            Verdict::HighlySatisfied => 1,
            Verdict::NotHighlySatisfied => 0,
        }
    }

    pub fn is_highly_satisfied(&self) -> bool {
        matches!(self, Verdict::HighlySatisfied)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::HighlySatisfied => write!(f, "Highly Satisfied"),
            Verdict::NotHighlySatisfied => write!(f, "Not Highly Satisfied"),
        }
    }
}
