use colored::{ColoredString, Colorize};
use std::fmt;
use std::fmt::Debug;
use std::fmt::Write;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, FormattedFields};
use tracing_subscriber::registry::LookupSpan;

pub(super) struct Formatter {
    use_colors: bool,
}

impl Formatter {
    pub(super) fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }
}

impl<S, N> FormatEvent<S, N> for Formatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        let now = chrono::Local::now();
        let mut visitor = StringVisitor::new();
        event.record(&mut visitor);
        let message = visitor.message;
        let mut trace_id = String::new();
        let mut span_fields = Vec::new();
        if let Some(scope) = ctx.event_scope() {
            for span in scope.from_root() {
                let exts = span.extensions();
                let Some(fields) = exts.get::<FormattedFields<N>>() else {
                    continue;
                };
                if fields.is_empty() {
                    continue;
                }
                match fields.strip_prefix("trace_id=") {
                    Some(id) => trace_id = format!("@{id}"),
                    None => span_fields.push(fields.to_string()),
                }
            }
        }
        let fields_str = if span_fields.is_empty() {
            String::new()
        } else {
            format!("{{{}}}", span_fields.join(" "))
        };

        if self.use_colors {
            write!(
                writer,
                "[{} {}] {} {}",
                now.format("%X%.3f").to_string().bright_black(),
                level_label(meta.level()),
                format!("{}{}{}:", short_target(meta.target()), trace_id, fields_str).bright_black(),
                message
            )?;
        } else {
            write!(
                writer,
                "{} {}{}{} {} {}",
                now.format("%F %X%.3f"),
                short_target(meta.target()),
                trace_id,
                fields_str,
                level_char(meta.level()),
                message
            )?;
        }
        writeln!(writer)
    }
}

/// `planti::services::photo` -> `services::photo`
fn short_target(target: &str) -> &str {
    target.strip_prefix("planti::").unwrap_or(target)
}

/// Joins the `message` field and the remaining event fields as `key=value`.
struct StringVisitor {
    message: String,
}

impl StringVisitor {
    fn new() -> Self {
        Self {
            message: String::new(),
        }
    }
}

impl Visit for StringVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.record_debug(field, &format_args!("{}", value));
        } else {
            self.record_debug(field, &value);
        }
    }
    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        if !self.message.is_empty() {
            self.message.push(' ');
        }
        if field.name() == "message" {
            write!(self.message, "{:?}", value).ok();
        } else {
            write!(self.message, "{}={:?}", field.name(), value).ok();
        }
    }
}

fn level_label(level: &Level) -> ColoredString {
    match *level {
        Level::ERROR => "ERR".bright_red(),
        Level::WARN => "WRN".bright_yellow(),
        Level::INFO => "INF".bright_blue(),
        Level::DEBUG => "DBG".bright_magenta(),
        Level::TRACE => "TRC".bright_white(),
    }
}

fn level_char(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "[E]",
        Level::WARN => "[W]",
        Level::INFO => "[I]",
        Level::DEBUG => "[D]",
        Level::TRACE => "[T]",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_target() {
        assert_eq!(short_target("planti::services::photo"), "services::photo");
        assert_eq!(short_target("tower_http::trace"), "tower_http::trace");
    }

    #[test]
    fn test_level_labels() {
        assert_eq!(level_char(&Level::WARN), "[W]");
        assert_eq!(level_label(&Level::ERROR).clear().to_string(), "ERR");
    }
}
