use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{
    DatabaseResult,
    entity::{Course, CourseListRow, QuestionWithChoicesRow},
};

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CourseSummary {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub pub_date: Option<NaiveDate>,
    pub total_enrollment: i64,
    /// Present only for authenticated viewers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_enrolled: Option<bool>,
}

impl From<CourseListRow> for CourseSummary {
    fn from(row: CourseListRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            pub_date: row.pub_date,
            total_enrollment: row.total_enrollment,
            is_enrolled: row.is_enrolled,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ChoiceShort {
    pub id: Uuid,
    pub choice_text: String,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct QuestionWithChoices {
    pub id: Uuid,
    pub question_text: String,
    pub choices: Vec<ChoiceShort>,
}

impl TryFrom<QuestionWithChoicesRow> for QuestionWithChoices {
    type Error = serde_json::Error;

    fn try_from(value: QuestionWithChoicesRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id,
            question_text: value.question_text,
            choices: serde_json::from_value(value.choices)?,
        })
    }
}

impl QuestionWithChoices {
    pub fn from_rows(rows: Vec<QuestionWithChoicesRow>) -> DatabaseResult<Vec<Self>> {
        Ok(rows
            .into_iter()
            .map(QuestionWithChoices::try_from)
            .collect::<Result<_, _>>()?)
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CourseDetailResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub pub_date: Option<NaiveDate>,
    pub total_enrollment: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_enrolled: Option<bool>,
    pub questions: Vec<QuestionWithChoices>,
}

impl CourseDetailResponse {
    pub fn new(course: Course, is_enrolled: Option<bool>, questions: Vec<QuestionWithChoices>) -> Self {
        Self {
            id: course.id(),
            name: course.name().to_string(),
            description: course.description().to_string(),
            pub_date: course.pub_date(),
            total_enrollment: course.total_enrollment(),
            is_enrolled,
            questions,
        }
    }
}
