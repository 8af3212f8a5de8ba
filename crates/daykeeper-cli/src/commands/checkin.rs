//! Daily habit check-in command.

use daykeeper_core::checkin::CheckinOutcome;

use crate::common;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = common::build()?;
    match ctx.service.check_in(&ctx.user, common::today()).await? {
        CheckinOutcome::Completed { entry, posted } => {
            if posted {
                println!("Summary posted: {}", entry.status_line);
            } else {
                println!("Summary generated but not delivered:");
                print!("{}", entry.render_text());
            }
        }
        CheckinOutcome::TimedOut => {
            println!("Check-in abandoned after inactivity. Nothing was saved.");
        }
    }
    Ok(())
}
