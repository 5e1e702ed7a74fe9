use gamelog::{log_debug, log_error, log_game, log_info, log_warn, GameLoggerBuilder};

fn main() {
    let mut logger = GameLoggerBuilder::new().build();

    log_info!(logger, "Server listening on port", 8080);
    log_game!(logger, "Player", "Alice", "joined lobby", 3);
    log_warn!(logger, "Lobby", 3, "is almost full");
    log_debug!(logger, "Tick took", 4.2, "ms");
    log_error!(logger, "boom", 42);
}
