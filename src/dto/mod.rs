use std::time::Duration;

/// Sample forecast payload.
pub mod forecast;
pub mod health;

const TICKS_PER_SECOND: u128 = 10_000_000;
const NANOS_PER_TICK: u128 = 100;

/// Render a duration as a `[d.]hh:mm:ss[.fffffff]` time interval with 100ns precision.
fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let ticks = (duration.as_nanos() / NANOS_PER_TICK) % TICKS_PER_SECOND;
    let days = total_secs / 86_400;
    let hours = (total_secs / 3_600) % 24;
    let minutes = (total_secs / 60) % 60;
    let seconds = total_secs % 60;

    let mut rendered = if days > 0 {
        format!("{days}.")
    } else {
        String::new()
    };
    rendered.push_str(&format!("{hours:02}:{minutes:02}:{seconds:02}"));
    if ticks > 0 {
        rendered.push_str(&format!(".{ticks:07}"));
    }
    rendered
}
