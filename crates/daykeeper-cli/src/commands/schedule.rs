//! Schedule display commands.

use clap::Subcommand;

use crate::common;

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// Show today's schedule
    Show {
        /// Emit the schedule as JSON instead of plain text
        #[arg(long)]
        json: bool,
    },
}

pub async fn run(action: ScheduleAction) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = common::build()?;
    match action {
        ScheduleAction::Show { json } => {
            let schedule = ctx.service.schedule_view(&ctx.user, common::today()).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&schedule)?);
            } else {
                print!("{}", schedule.render());
            }
        }
    }
    Ok(())
}
