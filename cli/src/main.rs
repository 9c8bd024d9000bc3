use clap::{Parser, Subcommand};
use onlinecourse::auth::hash_password;
use onlinecourse::model::entity::{
    Choice, ChoiceCreate, Course, CourseCreate, Question, QuestionCreate, UserEntity,
    UserEntityCreate,
};
use onlinecourse::model::{CrudRepository, DbConnection, ModelManager};
use onlinecourse::web::{AuthenticatedUser, UserRole};

#[derive(Parser, Debug)]
#[command(about = "CLI tool for filling the course DB", long_about = None)]
pub struct Cli {
    /// Overrides `DATABASE_URL`
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserCommands,
    },

    /// Manage courses
    Course {
        #[command(subcommand)]
        action: CourseCommands,
    },

    /// Manage exam questions and their choices
    Question {
        #[command(subcommand)]
        action: QuestionCommands,
    },
}

/// User management
#[derive(Subcommand, Debug)]
pub enum UserCommands {
    Add {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "")]
        first_name: String,
        #[arg(long, default_value = "")]
        last_name: String,
        /// `user` or `admin`
        #[arg(long, default_value = "user")]
        role: String,
    },
    /// Print every account with its role
    List {
        #[arg(long, default_value_t = 50)]
        limit: i64,
        #[arg(long, default_value_t = 0)]
        offset: i64,
    },
}

/// Course management
#[derive(Subcommand, Debug)]
pub enum CourseCommands {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Publication date, `YYYY-MM-DD`
        #[arg(long)]
        pub_date: Option<chrono::NaiveDate>,
    },
    /// Print every course with its enrollment counter
    List {
        #[arg(long, default_value_t = 50)]
        limit: i64,
        #[arg(long, default_value_t = 0)]
        offset: i64,
    },
}

/// Question management
#[derive(Subcommand, Debug)]
pub enum QuestionCommands {
    Add {
        /// Course name to attach the question to
        #[arg(long)]
        course_name: String,
        #[arg(long)]
        text: String,
    },
    AddChoice {
        #[arg(long)]
        course_name: String,
        /// Question text to attach the choice to
        #[arg(long)]
        question_text: String,
        #[arg(long)]
        text: String,
        #[arg(long, default_value_t = false)]
        is_correct: bool,
    },
}

fn die(msg: String) -> ! {
    eprintln!("{msg}");
    std::process::exit(2);
}

async fn course_by_name(mm: &ModelManager, actor: &AuthenticatedUser, name: &str) -> Course {
    match Course::find_by_name(mm, actor, name).await {
        Ok(Some(course)) => course,
        Ok(None) => die(format!("No course named `{name}`")),
        Err(e) => die(format!("Unable to look up course: {e}")),
    }
}

#[tokio::main]
async fn main() -> onlinecourse::error::AppResult<()> {
    let _ = dotenvy::dotenv();
    let args = Cli::parse();

    let database_url = match args.database_url.or_else(|| std::env::var("DATABASE_URL").ok()) {
        Some(url) => url,
        None => die(String::from("Pass --database-url or set DATABASE_URL")),
    };

    let db_con = DbConnection::connect(&database_url)?;
    let mm = ModelManager::new(db_con);
    let actor = AuthenticatedUser::admin();

    match args.command {
        Commands::User { action } => match action {
            UserCommands::Add {
                username,
                password,
                first_name,
                last_name,
                role,
            } => {
                let user = UserEntity::create(
                    &mm,
                    &actor,
                    UserEntityCreate {
                        username,
                        first_name,
                        last_name,
                        password_hash: hash_password(&password)?,
                        role: UserRole::from(role.as_str()),
                    },
                )
                .await?;
                println!("User created: {:?}", user);
            }
            UserCommands::List { limit, offset } => {
                let total = UserEntity::count(&mm, &actor).await?;
                for user in UserEntity::list(&mm, &actor, limit, offset).await? {
                    println!("{}\t{}\t{}", user.id(), user.username(), user.role());
                }
                println!("{total} user(s) total");
            }
        },

        Commands::Course { action } => match action {
            CourseCommands::Add {
                name,
                description,
                pub_date,
            } => {
                let course = Course::create(
                    &mm,
                    &actor,
                    CourseCreate {
                        name,
                        description,
                        pub_date,
                    },
                )
                .await?;
                println!("Course created: {:?}", course);
            }
            CourseCommands::List { limit, offset } => {
                let total = Course::count(&mm, &actor).await?;
                for course in Course::list(&mm, &actor, limit, offset).await? {
                    println!(
                        "{}\t{}\t{} enrolled",
                        course.id(),
                        course.name(),
                        course.total_enrollment()
                    );
                }
                println!("{total} course(s) total");
            }
        },

        Commands::Question { action } => match action {
            QuestionCommands::Add { course_name, text } => {
                let course = course_by_name(&mm, &actor, &course_name).await;
                let question = Question::create(
                    &mm,
                    QuestionCreate {
                        course_id: course.id(),
                        question_text: text,
                    },
                )
                .await?;
                println!("Question created: {:?}", question);
            }

            QuestionCommands::AddChoice {
                course_name,
                question_text,
                text,
                is_correct,
            } => {
                let course = course_by_name(&mm, &actor, &course_name).await;
                let question =
                    match Question::find_by_text(&mm, course.id(), &question_text).await? {
                        Some(q) => q,
                        None => die(format!("No question `{question_text}` in `{course_name}`")),
                    };

                let choice = Choice::create(
                    &mm,
                    ChoiceCreate {
                        question_id: question.id(),
                        choice_text: text,
                        is_correct: Some(is_correct),
                    },
                )
                .await?;
                println!("Choice created: {:?}", choice);
            }
        },
    }

    Ok(())
}
