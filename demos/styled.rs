use colored::Colorize;
use gamelog::{log_game, log_info, GameLoggerBuilder};

fn main() {
    let mut logger = GameLoggerBuilder::new().directory("./logs").build();

    // Caller-supplied styling survives on the console but is stripped from
    // the log files.
    log_info!(logger, "Match", "ranked-17".bold(), "starting");
    log_game!(logger, "Winner:", "Alice".bright_green());
}
