/// Product identifier written in the `PRODID` header of generated documents.
pub const PRODUCT_ID: &str = "-//SUSE Hackweek//NONSGML groupwise-to-ics//EN";

pub const LINE_ENDING: &str = "\r\n";

pub const CALENDAR_BEGIN: &str = const_str::concat!("BEGIN:VCALENDAR", LINE_ENDING);
pub const CALENDAR_VERSION: &str = const_str::concat!("VERSION:2.0", LINE_ENDING);
pub const CALENDAR_HEADER: &str = const_str::concat!(
    CALENDAR_BEGIN,
    "PRODID:",
    PRODUCT_ID,
    LINE_ENDING,
    CALENDAR_VERSION
);
pub const CALENDAR_FOOTER: &str = const_str::concat!("END:VCALENDAR", LINE_ENDING);
