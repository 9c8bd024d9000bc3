use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::exam::Grade;

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ExamResultResponse {
    pub course_id: Uuid,
    pub submission_id: Uuid,
    /// Percentage of correctly selected choices over the course's question count.
    pub grade: f64,
    pub correct_answers: i64,
    pub total_questions: i64,
    pub selected_choice_ids: Vec<Uuid>,
}

impl ExamResultResponse {
    pub fn new(course_id: Uuid, submission_id: Uuid, grade: Grade, selected: Vec<Uuid>) -> Self {
        Self {
            course_id,
            submission_id,
            grade: grade.grade,
            correct_answers: grade.correct_answers,
            total_questions: grade.total_questions,
            selected_choice_ids: selected,
        }
    }
}
