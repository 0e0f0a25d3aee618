use std::path::PathBuf;

use clap::{Parser, Subcommand};
use course_core::model::{LessonId, ModuleId};

pub const DEFAULT_DB_URL: &str = "sqlite://course.sqlite3";

#[derive(Parser, Debug)]
#[command(name = "course")]
#[command(version, about = "Vivir su Mundo: course progress and lesson navigation")]
pub struct Cli {
    /// `SQLite` database holding the learner's progress.
    #[arg(long, global = true, env = "COURSE_DB_URL", default_value = DEFAULT_DB_URL)]
    pub db: String,

    /// JSON catalog replacing the bundled course.
    #[arg(long, global = true, env = "COURSE_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Keep progress in memory only; nothing is written to disk.
    #[arg(long, global = true)]
    pub in_memory: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Course overview with progress per module.
    Dashboard,
    /// Render any route path, e.g. `/leccion/les-1-1`.
    Open { path: String },
    /// Module page.
    Module { module_id: ModuleId },
    /// Lesson page; records the lesson as the resume point.
    Lesson { lesson_id: LessonId },
    /// Mark a lesson as completed.
    Complete { lesson_id: LessonId },
    /// Answer a lesson's activity, one `--answer` per prompt in order.
    Submit {
        lesson_id: LessonId,
        #[arg(short, long = "answer", required = true)]
        answers: Vec<String>,
    },
    /// Open the lesson where the learner left off.
    Resume,
    /// Final project page with annexes.
    FinalProject,
    /// Erase all progress.
    Reset {
        /// Skip the confirmation question.
        #[arg(long)]
        yes: bool,
    },
    /// Print the stored progress record as JSON.
    Export,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_dashboard() {
        let cli = Cli::try_parse_from(["course", "--in-memory"]).unwrap();
        assert!(cli.in_memory);
        assert_eq!(cli.command, None);
    }

    #[test]
    fn submit_collects_answers_in_order() {
        let cli = Cli::try_parse_from([
            "course", "submit", "les-2-1", "--answer", "uno", "-a", "dos",
        ])
        .unwrap();
        let Some(Command::Submit { lesson_id, answers }) = cli.command else {
            panic!("expected submit");
        };
        assert_eq!(lesson_id, "les-2-1");
        assert_eq!(answers, ["uno", "dos"]);
    }

    #[test]
    fn blank_lesson_id_is_rejected() {
        assert!(Cli::try_parse_from(["course", "lesson", " "]).is_err());
    }

    #[test]
    fn global_flags_work_after_the_subcommand() {
        let cli = Cli::try_parse_from(["course", "reset", "--yes", "--db", "sqlite::memory:"])
            .unwrap();
        assert_eq!(cli.db, "sqlite::memory:");
        assert_eq!(cli.command, Some(Command::Reset { yes: true }));
    }
}
