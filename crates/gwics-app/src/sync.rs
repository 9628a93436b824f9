//! Normalizes a calendar export and compares it with another snapshot.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use gwics_core::config::Settings;
use gwics_core::constants::CALENDAR_FOOTER;
use gwics_core::error::CoreError;
use gwics_rfc::error::RfcResult;
use gwics_rfc::rfc::ical::core::{Calendar, Event};
use gwics_rfc::rfc::ical::parse::parse;

use crate::report::DiffReport;

/// ## Summary
/// Reads and parses a calendar file.
///
/// ## Errors
/// Returns an error if the file cannot be read or is not a valid calendar.
pub fn load_calendar(path: &Path) -> Result<Calendar> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let calendar = parse(&text)
        .map_err(|e| CoreError::InvalidInput(format!("{}: {e}", path.display())))?;

    tracing::info!(
        path = %path.display(),
        events = calendar.events.len(),
        "Calendar loaded"
    );

    Ok(calendar)
}

/// ## Summary
/// Keeps the newest snapshot of each event, ordered by identity.
///
/// ## Errors
/// Returns an error if an event carries an unreadable DTSTAMP.
pub fn latest_events(calendar: &Calendar) -> RfcResult<Vec<&Event>> {
    let latest = calendar.latest_by_identity()?;

    let dropped = calendar.events.len().saturating_sub(latest.len());
    if dropped > 0 {
        tracing::info!(dropped, "Dropped duplicate or unidentified events");
    }

    Ok(latest.into_values().collect())
}

/// ## Summary
/// Keeps the newest snapshot of each event in a calendar of its own, so it can be
/// compared and written like a parsed one.
///
/// ## Errors
/// Returns an error if an event carries an unreadable DTSTAMP.
pub fn deduplicate(calendar: &Calendar) -> RfcResult<Calendar> {
    let events = latest_events(calendar)?.into_iter().cloned().collect();
    Ok(Calendar::new(events, calendar.timezones().clone()))
}

/// ## Summary
/// Opens `path` for writing, creating missing parent directories first.
///
/// ## Errors
/// Returns an error if a directory or the file cannot be created.
pub fn create_output(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;

    Ok(BufWriter::new(file))
}

/// ## Summary
/// Writes a complete document: `header`, every event, then the footer.
///
/// ## Errors
/// Returns any I/O error raised by `writer`.
pub fn write_document<'a, W: Write>(
    writer: &mut W,
    header: &str,
    events: impl IntoIterator<Item = &'a Event>,
) -> io::Result<()> {
    writer.write_all(header.as_bytes())?;
    for event in events {
        writer.write_all(event.to_ical().as_bytes())?;
    }
    writer.write_all(CALENDAR_FOOTER.as_bytes())?;
    writer.flush()
}

/// ## Summary
/// Loads and deduplicates the origin calendar, reports its differences with the
/// destination when one is configured, then writes it to `output`.
///
/// ## Errors
/// Returns an error if a calendar cannot be loaded, the report cannot be rendered or
/// writing fails.
pub fn run<W: Write, R: Write>(settings: &Settings, output: &mut W, report: &mut R) -> Result<()> {
    let origin = deduplicate(&load_calendar(&settings.input.origin)?)?;

    if let Some(path) = &settings.input.destination {
        let destination = load_calendar(path)?;
        let diff = origin.diff(&destination);
        if diff.is_empty() {
            tracing::info!("Destination is up to date");
        }

        let rendered = DiffReport::from(&diff).render(settings.output.report)?;
        report.write_all(rendered.as_bytes())?;
    }

    write_document(output, &settings.output.header(), &origin.events)
        .context("failed to write calendar")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gwics_core::config::{InputConfig, LoggingConfig, OutputConfig, ReportFormat};
    use gwics_core::constants::{CALENDAR_HEADER, PRODUCT_ID};
    use std::path::PathBuf;

    const ORIGIN: &str = "BEGIN:VCALENDAR\r\n\
        VERSION:2.0\r\n\
        BEGIN:VEVENT\r\n\
        UID:b\r\n\
        DTSTAMP:20130101T000000Z\r\n\
        SUMMARY:stale\r\n\
        END:VEVENT\r\n\
        BEGIN:VEVENT\r\n\
        UID:a\r\n\
        DTSTAMP:20130101T000000Z\r\n\
        SUMMARY:first\r\n\
        END:VEVENT\r\n\
        BEGIN:VEVENT\r\n\
        UID:b\r\n\
        DTSTAMP:20130301T000000Z\r\n\
        SUMMARY:fresh\r\n\
        END:VEVENT\r\n\
        END:VCALENDAR\r\n";

    const DESTINATION: &str = "BEGIN:VEVENT\r\n\
        UID:a\r\n\
        DTSTAMP:20130101T000000Z\r\n\
        SUMMARY:first\r\n\
        END:VEVENT\r\n";

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("gwics-{}-{name}", std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    fn settings(origin: PathBuf, destination: Option<PathBuf>) -> Settings {
        Settings {
            input: InputConfig {
                origin,
                destination,
            },
            output: OutputConfig {
                path: None,
                product_id: PRODUCT_ID.to_string(),
                report: ReportFormat::Text,
            },
            logging: LoggingConfig {
                level: "debug".to_string(),
            },
        }
    }

    #[test]
    fn document_is_wrapped() {
        let mut event = Event::new();
        event.set_uid("x");
        let mut buffer = Vec::new();

        write_document(&mut buffer, CALENDAR_HEADER, [&event]).unwrap();

        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            format!("{CALENDAR_HEADER}BEGIN:VEVENT\r\nUID:x\r\nEND:VEVENT\r\n{CALENDAR_FOOTER}")
        );
    }

    #[test]
    fn latest_events_drop_stale_duplicates() {
        let calendar = gwics_rfc::rfc::ical::parse::parse(ORIGIN).unwrap();
        let events = latest_events(&calendar).unwrap();

        let summaries: Vec<_> = events.iter().map(|e| e.summary()).collect();
        assert_eq!(summaries, [Some("first"), Some("fresh")]);
    }

    #[test_log::test]
    fn run_writes_document_and_report() {
        let origin = temp_file("run-origin.ics", ORIGIN);
        let destination = temp_file("run-destination.ics", DESTINATION);
        let mut output = Vec::new();
        let mut report = Vec::new();

        run(&settings(origin.clone(), Some(destination.clone())), &mut output, &mut report).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.starts_with(CALENDAR_HEADER));
        assert!(output.ends_with(CALENDAR_FOOTER));
        assert_eq!(output.matches("BEGIN:VEVENT").count(), 2);
        assert!(!output.contains("stale"));
        assert_eq!(
            String::from_utf8(report).unwrap(),
            "removed   b \"fresh\"\n0 changed, 1 removed, 0 added, 1 unchanged\n"
        );

        fs::remove_file(origin).ok();
        fs::remove_file(destination).ok();
    }

    #[test_log::test]
    fn run_compares_newest_snapshot_not_last_one() {
        let origin = temp_file(
            "reordered-origin.ics",
            "BEGIN:VEVENT\r\nUID:b\r\nDTSTAMP:20130301T000000Z\r\nSUMMARY:fresh\r\nEND:VEVENT\r\n\
             BEGIN:VEVENT\r\nUID:b\r\nDTSTAMP:20130101T000000Z\r\nSUMMARY:stale\r\nEND:VEVENT\r\n",
        );
        let destination = temp_file(
            "reordered-destination.ics",
            "BEGIN:VEVENT\r\nUID:b\r\nDTSTAMP:20130301T000000Z\r\nSUMMARY:fresh\r\nEND:VEVENT\r\n",
        );
        let mut output = Vec::new();
        let mut report = Vec::new();

        run(&settings(origin.clone(), Some(destination.clone())), &mut output, &mut report).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("SUMMARY:fresh"));
        assert!(!output.contains("stale"));
        assert_eq!(
            String::from_utf8(report).unwrap(),
            "0 changed, 0 removed, 0 added, 1 unchanged\n"
        );

        fs::remove_file(origin).ok();
        fs::remove_file(destination).ok();
    }

    #[test]
    fn deduplicate_keeps_timezones() {
        let calendar = gwics_rfc::rfc::ical::parse::parse(ORIGIN).unwrap();
        let latest = deduplicate(&calendar).unwrap();

        assert_eq!(latest.events.len(), 2);
        assert_eq!(latest.timezones(), calendar.timezones());
    }

    #[test]
    fn output_directories_are_created() {
        let dir = std::env::temp_dir().join(format!("gwics-{}-nested", std::process::id()));
        let path = dir.join("deeper").join("calendar.ics");

        let mut writer = create_output(&path).unwrap();
        writer.write_all(b"x").unwrap();
        writer.flush().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "x");

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn run_without_destination_skips_report() {
        let origin = temp_file("solo-origin.ics", DESTINATION);
        let mut output = Vec::new();
        let mut report = Vec::new();

        run(&settings(origin.clone(), None), &mut output, &mut report).unwrap();

        assert!(report.is_empty());
        assert!(String::from_utf8(output).unwrap().contains("UID:a\r\n"));

        fs::remove_file(origin).ok();
    }

    #[test]
    fn invalid_origin_names_the_file() {
        let origin = temp_file("broken.ics", "BEGIN:VEVENT\r\nUID:a\r\n");

        let err = load_calendar(&origin).unwrap_err();

        assert!(err.to_string().contains("broken.ics"));
        assert!(err.to_string().contains("missing END"));

        fs::remove_file(origin).ok();
    }

    #[test]
    fn missing_origin_is_an_error() {
        let err = load_calendar(Path::new("/nonexistent/gwics/origin.ics")).unwrap_err();

        assert!(err.to_string().contains("failed to read"));
    }
}
