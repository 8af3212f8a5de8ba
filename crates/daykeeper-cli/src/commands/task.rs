//! Task management commands.

use clap::Subcommand;
use std::time::Duration;

use daykeeper_core::schedule::{ReflectionInput, TaskId};

use crate::common;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task to the first slot with room
    Add {
        /// Task name
        name: String,
        /// Duration in minutes (1-240)
        #[arg(long)]
        minutes: u32,
    },
    /// Start a task and arm its end-of-duration reminder
    Start {
        /// Task id (from `task list`)
        id: TaskId,
        /// Keep the process alive until the reminder fires
        #[arg(long)]
        wait: bool,
    },
    /// Complete a task and record a reflection
    Done {
        /// Task id (from `task list`)
        id: TaskId,
        /// What difficulties did you face?
        #[arg(long, default_value = "")]
        difficulties: String,
        /// What interruptions came up?
        #[arg(long, default_value = "")]
        interruptions: String,
        /// How do you feel about the task?
        #[arg(long, default_value = "")]
        feelings: String,
    },
    /// List open (pending or in-progress) tasks
    List,
}

pub async fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = common::build()?;
    let date = common::today();

    match action {
        TaskAction::Add { name, minutes } => {
            let placement = ctx.service.add_task(&ctx.user, date, &name, minutes).await?;
            println!(
                "Added '{}' ({minutes}m) to slot {} ({}).",
                placement.task.name, placement.slot_number, placement.time_range
            );
            println!("id: {}", placement.task.id);
        }
        TaskAction::Start { id, wait } => {
            let task = ctx.service.start_task(&ctx.user, date, id).await?;
            println!(
                "Started '{}'. A reminder will fire in {} minute(s).",
                task.name, task.duration_minutes
            );
            if wait {
                // Reminders are in-process timers; without --wait they die
                // with this short-lived command.
                tokio::time::sleep(Duration::from_secs(
                    u64::from(task.duration_minutes) * 60 + 1,
                ))
                .await;
            } else {
                println!("note: the reminder only fires while the process is running (use --wait).");
            }
        }
        TaskAction::Done {
            id,
            difficulties,
            interruptions,
            feelings,
        } => {
            let task = ctx
                .service
                .complete_task(
                    &ctx.user,
                    date,
                    id,
                    ReflectionInput {
                        difficulties,
                        interruptions,
                        feelings,
                    },
                )
                .await?;
            println!("Completed '{}'. Reflection logged.", task.name);
        }
        TaskAction::List => {
            let tasks = ctx.service.open_tasks(&ctx.user, date).await?;
            if tasks.is_empty() {
                println!("No open tasks today.");
            } else {
                for task in tasks {
                    println!(
                        "{} {} ({}m)  {}",
                        task.status.marker(),
                        task.name,
                        task.duration_minutes,
                        task.id
                    );
                }
            }
        }
    }
    Ok(())
}
