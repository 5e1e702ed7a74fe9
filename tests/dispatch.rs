use chrono::{DateTime, Utc};
use gamelog::{log_error, log_info, Clock, GameLoggerBuilder, Level};
use std::fs;

struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

fn instant(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .expect("valid test instant")
        .with_timezone(&Utc)
}

#[test]
fn records_land_in_the_daily_hierarchy() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut logger = GameLoggerBuilder::new()
        .directory(dir.path())
        .clock(Box::new(FixedClock(instant("2024-03-05T07:08:09.123Z"))))
        .build();

    log_error!(logger, "boom", 42);
    log_info!(logger, "still running");

    let day_dir = dir.path().join("2024").join("March").join("05");
    assert_eq!(
        fs::read_to_string(day_dir.join("2024-03-05-error.log")).expect("error log"),
        "07:08:09.123 GMT > error: boom 42\n"
    );
    assert_eq!(
        fs::read_to_string(day_dir.join("2024-03-05-info.log")).expect("info log"),
        "07:08:09.123 GMT > info:  still running\n"
    );
    assert_eq!(
        fs::read_to_string(day_dir.join("2024-03-05-all.log")).expect("combined log"),
        "07:08:09.123 GMT > error: boom 42\n07:08:09.123 GMT > info:  still running\n"
    );
    assert_eq!(
        logger.open_path(Level::Error).expect("error sink"),
        day_dir.join("2024-03-05-error.log")
    );
}

#[test]
fn slice_surface_accepts_mixed_display_values() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut logger = GameLoggerBuilder::new()
        .directory(dir.path())
        .clock(Box::new(FixedClock(instant("2024-07-01T00:00:00Z"))))
        .build();

    logger.game(&[&"score", &1024, &"for", &"Bob"]);

    let line = fs::read_to_string(
        dir.path()
            .join("2024")
            .join("July")
            .join("01")
            .join("2024-07-01-game.log"),
    )
    .expect("game log");
    assert_eq!(line, "00:00:00.000 GMT > game:  score 1024 for Bob\n");
}
