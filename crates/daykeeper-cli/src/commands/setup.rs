//! Setup command: create or replace the user's configuration.

use clap::Args;

use daykeeper_core::platform::ChannelId;
use daykeeper_core::service::SetupInput;

use crate::common;

#[derive(Args)]
pub struct SetupArgs {
    /// Hour (0-23) the first slot of your day starts at
    #[arg(long)]
    pub start_hour: u32,
    /// Channel id journal entries are posted to
    #[arg(long, default_value = "0")]
    pub journal_channel: u64,
    /// Habits to do, comma separated (e.g. "Meditate,Go to the gym")
    #[arg(long, value_delimiter = ',', num_args = 0..)]
    pub positive: Vec<String>,
    /// Habits to avoid, comma separated (e.g. "Smoke,Junk food")
    #[arg(long, value_delimiter = ',', num_args = 0..)]
    pub negative: Vec<String>,
}

pub async fn run(args: SetupArgs) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = common::build()?;
    let config = ctx
        .service
        .setup(
            &ctx.user,
            SetupInput {
                start_hour: args.start_hour,
                journal_channel: ChannelId(args.journal_channel),
                positive_habits: args.positive.join("\n"),
                negative_habits: args.negative.join("\n"),
            },
        )
        .await?;

    println!(
        "Setup saved: day starts at {:02}:00, tracking {} habit(s).",
        config.start_hour,
        config.habit_count()
    );
    Ok(())
}
