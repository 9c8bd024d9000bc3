mod user;
pub use user::{UserEntity, UserEntityCreate};

mod course;
pub use course::{Course, CourseCreate, CourseListRow, TOP_COURSES_LIMIT};

mod question;
pub use question::{Question, QuestionCreate, QuestionWithChoicesRow};

mod choice;
pub use choice::{Choice, ChoiceCreate};

mod enrollment;
pub use enrollment::{Enrollment, EnrollmentCreate, EnrollmentMode};

mod submission;
pub use submission::{Submission, SubmissionCreate};
