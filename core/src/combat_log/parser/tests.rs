use super::*;

fn test_parser() -> LogParser {
    LogParser::new()
}

fn ts(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
}

// parse_line
#[test]
fn test_parse_ability() {
    let parser = test_parser();
    let input = "21|2022-05-12T20:15:32.1230000-04:00|10FF0001|Warrior Of Light|07|Attack|40012345|King Thordan|710003|D690000|1B|7030000|0|0|0|0|0|0|0|0|0|0|0|0|1000000|1000000|0|10000|||100.00|100.00|0.00|0.00|44|44|0|10000|||100.00|100.00|0.00|0.00|0000A1B2|0|1|0123456789abcdef";
    let line = parser.parse_line(42, input);

    assert_eq!(line.line_number, 42);
    assert_eq!(line.timestamp, Some(ts("2022-05-12 20:15:32")));
    assert_eq!(
        line.event,
        LogEvent::Ability {
            source_id: "10FF0001".to_string(),
            source_name: "Warrior Of Light".to_string(),
            ability_id: "07".to_string(),
            ability_name: "Attack".to_string(),
            target_id: "40012345".to_string(),
            target_name: "King Thordan".to_string(),
        }
    );
}

#[test]
fn test_parse_change_zone() {
    let parser = test_parser();
    let input = "01|2022-05-12T20:10:00.0000000-04:00|3C8|Dragonsong's Reprise (Ultimate)|0123456789abcdef";
    let line = parser.parse_line(1, input);

    assert_eq!(line.timestamp, Some(ts("2022-05-12 20:10:00")));
    assert_eq!(
        line.event,
        LogEvent::ChangeZone {
            zone_id: "3C8".to_string(),
            zone_name: "Dragonsong's Reprise (Ultimate)".to_string(),
        }
    );
}

#[test]
fn test_parse_director_wipe() {
    let parser = test_parser();
    let input = "33|2022-05-12T20:25:01.5000000-04:00|80037586|40000005|00|00|00|00|0123456789abcdef\r\n";
    let line = parser.parse_line(7, input);

    assert_eq!(line.timestamp, Some(ts("2022-05-12 20:25:01")));
    assert_eq!(
        line.event,
        LogEvent::Director {
            instance: "80037586".to_string(),
            command: "40000005".to_string(),
        }
    );
}

#[test]
fn test_parse_short_line_is_other() {
    let parser = test_parser();
    let line = parser.parse_line(3, "21|2022-05-12T20:15:32.1230000-04:00|10FF0001|Warrior Of Light");

    assert_eq!(
        line.event,
        LogEvent::Other {
            type_code: "21".to_string()
        }
    );
    assert_eq!(line.event.type_code(), "21");
    assert!(line.timestamp.is_some());
}

#[test]
fn test_parse_unknown_type() {
    let parser = test_parser();
    let line = parser.parse_line(1, "00|2022-05-12T20:15:32.1230000-04:00|0839||Hello|abc");

    assert_eq!(line.event.type_code(), "00");
    assert!(matches!(line.event, LogEvent::Other { .. }));
}

#[test]
fn test_parse_garbage_line() {
    let parser = test_parser();
    let line = parser.parse_line(1, "not a log line");

    assert_eq!(line.timestamp, None);
    assert_eq!(
        line.event,
        LogEvent::Other {
            type_code: "not a log line".to_string()
        }
    );
}

// parse_timestamp
#[test]
fn test_parse_timestamp_ignores_fraction_and_offset() {
    assert_eq!(
        parse_timestamp("2022-05-12T23:59:59.9990000+09:00"),
        Some(ts("2022-05-12 23:59:59"))
    );
    assert_eq!(
        parse_timestamp("2022-05-12T00:00:00"),
        Some(ts("2022-05-12 00:00:00"))
    );
}

#[test]
fn test_parse_timestamp_invalid() {
    assert_eq!(parse_timestamp(""), None);
    assert_eq!(parse_timestamp("2022-05-12"), None);
    assert_eq!(parse_timestamp("2022/05/12T20:15:32.000"), None);
    assert_eq!(parse_timestamp("2022-05-12T2a:15:32.000"), None);
    assert_eq!(parse_timestamp("2022-13-12T20:15:32.000"), None);
    assert_eq!(parse_timestamp("2022-05-12T25:15:32.000"), None);
}
