//! iCalendar feed generation.
//!
//! Hand-rolled RFC 5545 output rather than a builder crate: the feed has a
//! fixed shape and the consumers (Google Calendar and friends) poll it, so
//! the document must be byte-stable between reads of the same stored state.
//! DTSTAMP comes from the stored `created` timestamp, never the wall clock.

use chrono::{DateTime, Utc};

use crate::event::Event;

const PRODID: &str = "-//calfeed//Calendar Feed//EN";
const CALNAME: &str = "calfeed";
/// Appended to every UID so equal event ids from different deployments
/// can't collide in a merged calendar view.
const UID_DOMAIN: &str = "calfeed.local";
/// RFC 5545 3.1: content lines are limited to 75 octets before folding.
const MAX_LINE_OCTETS: usize = 75;

/// Encode a collection of events as a complete VCALENDAR document.
///
/// Entries appear in input order; an empty collection yields a valid empty
/// container. Output uses CRLF line endings and ends with a trailing CRLF.
pub fn encode_calendar(events: &[Event]) -> String {
    let mut out = String::new();

    push_line(&mut out, "BEGIN:VCALENDAR");
    push_line(&mut out, "VERSION:2.0");
    push_line(&mut out, &format!("PRODID:{PRODID}"));
    push_line(&mut out, "CALSCALE:GREGORIAN");
    push_line(&mut out, "METHOD:PUBLISH");
    push_line(&mut out, &format!("X-WR-CALNAME:{CALNAME}"));
    push_line(&mut out, "X-WR-TIMEZONE:UTC");

    for event in events {
        push_event(&mut out, event);
    }

    push_line(&mut out, "END:VCALENDAR");
    out
}

fn push_event(out: &mut String, event: &Event) {
    push_line(out, "BEGIN:VEVENT");
    push_line(out, &format!("UID:{}@{}", escape_text(&event.id), UID_DOMAIN));
    push_line(out, &format!("DTSTAMP:{}", format_utc(&event.created)));
    push_line(out, &format!("DTSTART:{}", format_utc(&event.start)));
    push_line(out, &format!("DTEND:{}", format_utc(&event.end)));
    push_line(out, &format!("SUMMARY:{}", escape_text(&event.summary)));

    if !event.description.is_empty() {
        push_line(out, &format!("DESCRIPTION:{}", escape_text(&event.description)));
    }
    if !event.location.is_empty() {
        push_line(out, &format!("LOCATION:{}", escape_text(&event.location)));
    }

    // Fixed markers for client compatibility; this subsystem keeps no
    // revision history, so SEQUENCE stays at its initial value.
    push_line(out, "STATUS:CONFIRMED");
    push_line(out, "SEQUENCE:0");
    push_line(out, "END:VEVENT");
}

/// UTC "basic" format, e.g. `20250106T090000Z`.
fn format_utc(dt: &DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Escape a TEXT value per RFC 5545 3.3.11.
///
/// Backslash, semicolon and comma get a backslash prefix; newlines become
/// the literal `\n`; carriage returns are dropped. Colons are structurally
/// harmless inside a value (the parser splits on the first colon only) and
/// stay as-is.
fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Append a content line, folding it at 75 octets per RFC 5545 3.1.
///
/// Continuation lines start with a single space, which counts toward their
/// budget. Splits only happen on UTF-8 character boundaries.
fn push_line(out: &mut String, line: &str) {
    let mut remaining = line;
    let mut first = true;

    loop {
        let budget = if first { MAX_LINE_OCTETS } else { MAX_LINE_OCTETS - 1 };
        if remaining.len() <= budget {
            if !first {
                out.push(' ');
            }
            out.push_str(remaining);
            out.push_str("\r\n");
            return;
        }

        let mut cut = budget;
        while !remaining.is_char_boundary(cut) {
            cut -= 1;
        }
        let (head, tail) = remaining.split_at(cut);
        if !first {
            out.push(' ');
        }
        out.push_str(head);
        out.push_str("\r\n");

        remaining = tail;
        first = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_event(summary: &str) -> Event {
        Event {
            id: "ev-1".to_string(),
            summary: summary.to_string(),
            description: String::new(),
            location: String::new(),
            start: Utc.with_ymd_and_hms(2025, 1, 6, 9, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2025, 1, 6, 9, 15, 0).unwrap(),
            created: Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap(),
        }
    }

    /// Undo line folding (test-side inverse of `push_line`).
    fn unfold(ics: &str) -> Vec<String> {
        let mut lines: Vec<String> = Vec::new();
        for line in ics.split("\r\n") {
            if let Some(rest) = line.strip_prefix(' ') {
                if let Some(last) = lines.last_mut() {
                    last.push_str(rest);
                    continue;
                }
            }
            lines.push(line.to_string());
        }
        lines
    }

    /// Reverse of RFC 5545 TEXT escaping (test-side inverse of `escape_text`).
    fn unescape(value: &str) -> String {
        let mut out = String::with_capacity(value.len());
        let mut chars = value.chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                match chars.next() {
                    Some(',') => out.push(','),
                    Some(';') => out.push(';'),
                    Some('\\') => out.push('\\'),
                    Some('n') | Some('N') => out.push('\n'),
                    Some(other) => {
                        out.push('\\');
                        out.push(other);
                    }
                    None => out.push('\\'),
                }
            } else {
                out.push(c);
            }
        }
        out
    }

    fn property(ics: &str, name: &str) -> Option<String> {
        unfold(ics).into_iter().find_map(|line| {
            line.strip_prefix(&format!("{name}:")).map(String::from)
        })
    }

    #[test]
    fn test_empty_collection_is_a_valid_container() {
        let ics = encode_calendar(&[]);
        assert!(ics.starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(ics.ends_with("END:VCALENDAR\r\n"));
        assert!(ics.contains("VERSION:2.0\r\n"));
        assert!(ics.contains("METHOD:PUBLISH\r\n"));
        assert!(!ics.contains("BEGIN:VEVENT"));
    }

    #[test]
    fn test_event_block_contents() {
        let mut event = make_event("Standup");
        event.description = "Daily sync".to_string();
        event.location = "Room 3".to_string();
        let ics = encode_calendar(&[event]);

        assert_eq!(property(&ics, "UID").unwrap(), "ev-1@calfeed.local");
        assert_eq!(property(&ics, "DTSTAMP").unwrap(), "20250101T120000Z");
        assert_eq!(property(&ics, "DTSTART").unwrap(), "20250106T090000Z");
        assert_eq!(property(&ics, "DTEND").unwrap(), "20250106T091500Z");
        assert_eq!(property(&ics, "SUMMARY").unwrap(), "Standup");
        assert_eq!(property(&ics, "DESCRIPTION").unwrap(), "Daily sync");
        assert_eq!(property(&ics, "LOCATION").unwrap(), "Room 3");
        assert_eq!(property(&ics, "STATUS").unwrap(), "CONFIRMED");
        assert_eq!(property(&ics, "SEQUENCE").unwrap(), "0");
    }

    #[test]
    fn test_optional_fields_omitted_when_empty() {
        let ics = encode_calendar(&[make_event("Standup")]);
        assert!(!ics.contains("DESCRIPTION"));
        assert!(!ics.contains("LOCATION"));
    }

    #[test]
    fn test_entries_keep_input_order() {
        let mut later = make_event("later");
        later.id = "later".to_string();
        later.start = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();
        let mut earlier = make_event("earlier");
        earlier.id = "earlier".to_string();

        // Deliberately not chronological
        let ics = encode_calendar(&[later, earlier]);
        let later_pos = ics.find("SUMMARY:later").unwrap();
        let earlier_pos = ics.find("SUMMARY:earlier").unwrap();
        assert!(later_pos < earlier_pos);
    }

    #[test]
    fn test_output_is_deterministic() {
        let events = vec![make_event("a"), make_event("b")];
        assert_eq!(encode_calendar(&events), encode_calendar(&events));
    }

    #[test]
    fn test_escaping_roundtrip_newline_and_colon() {
        let mut event = make_event("Standup");
        event.description = "Agenda: blockers\nthen, demos; maybe\\end".to_string();
        let ics = encode_calendar(&[event.clone()]);

        // The raw document must not contain an unescaped payload newline.
        let desc_line = unfold(&ics)
            .into_iter()
            .find(|l| l.starts_with("DESCRIPTION:"))
            .unwrap();
        assert!(!desc_line.contains('\n'));

        let recovered = unescape(desc_line.strip_prefix("DESCRIPTION:").unwrap());
        assert_eq!(recovered, event.description);
    }

    #[test]
    fn test_escaped_field_does_not_corrupt_following_lines() {
        let mut event = make_event("A;B,C");
        event.description = "line one\nline two".to_string();
        event.location = "HQ".to_string();
        let ics = encode_calendar(&[event]);

        // Every structural line survives intact after the free-text fields.
        assert_eq!(property(&ics, "SUMMARY").unwrap(), "A\\;B\\,C");
        assert_eq!(property(&ics, "LOCATION").unwrap(), "HQ");
        assert_eq!(property(&ics, "STATUS").unwrap(), "CONFIRMED");
        assert!(ics.contains("END:VEVENT\r\n"));
    }

    #[test]
    fn test_carriage_returns_are_dropped() {
        let mut event = make_event("Standup");
        event.description = "windows\r\nnewline".to_string();
        let ics = encode_calendar(&[event]);
        let desc = property(&ics, "DESCRIPTION").unwrap();
        assert_eq!(unescape(&desc), "windows\nnewline");
    }

    #[test]
    fn test_long_lines_fold_at_75_octets() {
        let mut event = make_event("Standup");
        event.description = "x".repeat(400);
        let ics = encode_calendar(&[event.clone()]);

        for line in ics.split("\r\n") {
            assert!(line.len() <= 75, "overlong line ({} octets): {line}", line.len());
        }

        let recovered = unescape(&property(&ics, "DESCRIPTION").unwrap());
        assert_eq!(recovered, event.description);
    }

    #[test]
    fn test_folding_respects_utf8_boundaries() {
        let mut event = make_event("Standup");
        // Multi-byte characters straddling the 75-octet mark
        event.description = "ö".repeat(120);
        let ics = encode_calendar(&[event.clone()]);

        for line in ics.split("\r\n") {
            assert!(line.len() <= 75);
        }
        let recovered = unescape(&property(&ics, "DESCRIPTION").unwrap());
        assert_eq!(recovered, event.description);
    }

    #[test]
    fn test_third_party_parser_accepts_feed() {
        use icalendar::parser::{read_calendar, unfold as ical_unfold};

        let mut first = make_event("Standup");
        first.location = "Room 3".to_string();
        let mut second = make_event("Review");
        second.id = "ev-2".to_string();

        let ics = encode_calendar(&[first, second]);
        let unfolded = ical_unfold(&ics);
        let parsed = read_calendar(&unfolded).expect("conformant parser should accept feed");

        let events: Vec<_> = parsed
            .components
            .iter()
            .filter(|c| c.name == "VEVENT")
            .collect();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].find_prop("SUMMARY").unwrap().val.as_ref(), "Standup");
        assert_eq!(
            events[0].find_prop("DTSTART").unwrap().val.as_ref(),
            "20250106T090000Z"
        );
        assert_eq!(
            events[0].find_prop("UID").unwrap().val.as_ref(),
            "ev-1@calfeed.local"
        );
        assert_eq!(events[0].find_prop("LOCATION").unwrap().val.as_ref(), "Room 3");
        assert_eq!(events[1].find_prop("SUMMARY").unwrap().val.as_ref(), "Review");
    }
}
