//! Server-side HTML generation for the e-ink page.
//!
//! A pure function of the aggregated state: no scripts, embedded styles,
//! table layout, and a meta refresh so the display stays current without
//! any client logic.

use chrono::{DateTime, Datelike};
use chrono_tz::Tz;

use inkboard_core::EventKind;
use inkboard_core::event::Event;
use inkboard_core::timeline::{build_timeline, hour_label};
use inkboard_core::todo::Todo;
use inkboard_core::weather::WeatherReport;

/// Page reload interval in seconds.
const REFRESH_SECS: u32 = 300;

/// Human label for a WMO weather code.
fn condition_label(code: u32) -> &'static str {
    match code {
        0 => "Sunny",
        1..=3 => "Partly Cloudy",
        45 | 48 => "Foggy",
        51 | 53 | 55 => "Drizzle",
        61 | 63 | 65 => "Rain",
        71 | 73 | 75 => "Snow",
        80..=82 => "Showers",
        _ => "Clear",
    }
}

fn condition_icon(code: u32) -> &'static str {
    match code {
        0 => "\u{2600}\u{fe0f}",
        1..=3 => "\u{26c5}",
        45 | 48 => "\u{1f32b}\u{fe0f}",
        51 | 53 | 55 | 61 | 63 | 65 | 80..=82 => "\u{1f327}\u{fe0f}",
        71 | 73 | 75 => "\u{2744}\u{fe0f}",
        _ => "\u{2600}\u{fe0f}",
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn slot_background(kind: EventKind) -> &'static str {
    match kind {
        EventKind::Personal => "#e8e8e8",
        EventKind::Work => "#d0d0d0",
        EventKind::Meeting => "#f0f0f0",
        EventKind::Tentative => "#fafafa",
    }
}

fn todos_html(todos: &[Todo]) -> String {
    todos
        .iter()
        .map(|todo| {
            let checked = if todo.completed { "\u{2713}" } else { "" };
            let text_class = if todo.completed {
                " class=\"todo-completed\""
            } else {
                ""
            };
            format!(
                "<div class=\"todo-item\"><span class=\"todo-checkbox\">{}</span><span{}>{}</span></div>",
                checked,
                text_class,
                escape_html(&todo.text)
            )
        })
        .collect::<Vec<_>>()
        .join("\n            ")
}

fn timeline_html(events: &[Event], tz: Tz) -> String {
    let mut html =
        String::from("<table style=\"width:100%;border-collapse:collapse;font-size:9px;\">");

    for slot in build_timeline(events, tz) {
        html.push_str("<tr style=\"border-bottom:1px solid #ccc;\">");
        html.push_str(&format!(
            "<td style=\"width:35px;padding:1px;font-size:9px;font-weight:800;border-right:1px solid #ccc;\">{}</td>",
            hour_label(slot.hour)
        ));

        match slot.entry {
            Some(entry) => {
                let border_style = if entry.kind == EventKind::Tentative {
                    "dashed"
                } else {
                    "solid"
                };
                html.push_str(&format!(
                    "<td style=\"padding:1px 3px;border:1px {} #000;background:{};\"><b style=\"font-size:9px;\">{}</b> <span style=\"font-size:7px;color:#666;\">{}</span></td>",
                    border_style,
                    slot_background(entry.kind),
                    escape_html(&entry.title),
                    entry.time_range
                ));
            }
            None => html.push_str("<td style=\"padding:1px;\">&nbsp;</td>"),
        }

        html.push_str("</tr>");
    }

    html.push_str("</table>");
    html
}

/// Render the complete dashboard document.
pub fn render_dashboard(
    weather: &WeatherReport,
    events: &[Event],
    todos: &[Todo],
    now: DateTime<Tz>,
    location_label: &str,
) -> String {
    let current_date = format!("{}, {} {}", now.format("%A"), now.format("%b"), now.day());
    let current_time = now.format("%-I:%M %p").to_string();
    let updated = now.format("%Y-%m-%d %H:%M:%S %Z").to_string();

    let condition = condition_label(weather.condition);
    let icon = condition_icon(weather.condition);
    let city = location_label.split(',').next().unwrap_or(location_label);

    let todos_html = todos_html(todos);
    let timeline_html = timeline_html(events, now.timezone());

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <meta http-equiv="refresh" content="{REFRESH_SECS}">
    <meta name="viewport" content="width=device-width, initial-scale=1, maximum-scale=1, user-scalable=no">
    <style>
        * {{ margin: 0; padding: 0; box-sizing: border-box; }}
        body {{ font-family: "Amazon Ember", sans-serif; width: 100%; height: 100vh; }}
        .main-container {{ display: table; width: 100%; height: 100%; border-collapse: collapse; }}
        .header {{ display: table-row; height: 70px; }}
        .header-content {{ display: table-cell; padding: 16px 24px; border-bottom: 4px solid #000; vertical-align: middle; }}
        .header-left {{ float: left; }}
        .header-right {{ float: right; text-align: right; }}
        .date-large {{ font-size: 28px; font-weight: 900; }}
        .time-large {{ font-size: 20px; font-weight: 800; color: #333; }}
        .weather-summary {{ font-size: 24px; font-weight: 800; }}
        .content {{ display: table-row; height: auto; }}
        .sidebar {{ display: table-cell; width: 50%; padding: 20px; border-right: 2px solid #000; vertical-align: top; }}
        .weather-icon {{ font-size: 80px; text-align: center; margin-bottom: 12px; }}
        .weather-temp {{ font-size: 64px; font-weight: 900; text-align: center; line-height: 1; }}
        .weather-location {{ font-size: 14px; font-weight: 700; text-align: center; margin-top: 8px; color: #333; }}
        .weather-details {{ margin-top: 16px; padding: 12px 0; border-top: 2px solid #000; border-bottom: 2px solid #000; }}
        .weather-detail-row {{ padding: 6px 0; font-size: 16px; font-weight: 800; }}
        .weather-detail-label {{ display: inline-block; width: 120px; }}
        .weather-detail-value {{ font-weight: 900; }}
        .section-title {{ font-size: 20px; font-weight: 900; margin-bottom: 12px; border-bottom: 3px solid #000; }}
        .todo-item {{ padding: 10px 0; font-size: 15px; font-weight: 700; border-bottom: 1px solid #ccc; }}
        .todo-checkbox {{ display: inline-block; width: 18px; height: 18px; border: 2px solid #000; margin-right: 10px; font-weight: 900; text-align: center; }}
        .todo-completed {{ text-decoration: line-through; color: #666; }}
        .timeline {{ display: table-cell; padding: 8px 16px; vertical-align: top; }}
        .footer-timestamp {{ position: fixed; bottom: 8px; left: 8px; font-size: 11px; font-weight: 700; color: #666; }}
    </style>
</head>
<body>
<div class="main-container">
    <div class="header">
        <div class="header-content">
            <div class="header-left">
                <div class="date-large">{current_date}</div>
                <div class="time-large">{current_time}</div>
            </div>
            <div class="header-right">
                <div class="weather-summary">{icon} {temp}&deg; &bull; {city}</div>
            </div>
        </div>
    </div>
    <div class="content">
        <div class="sidebar">
            <div class="weather-widget">
                <div class="weather-icon">{icon}</div>
                <div class="weather-temp">{temp}&deg;</div>
                <div class="weather-location">{location}</div>
                <div class="weather-details">
                    <div class="weather-detail-row"><span class="weather-detail-label">Feels Like</span><span class="weather-detail-value">{feels_like}&deg;</span></div>
                    <div class="weather-detail-row"><span class="weather-detail-label">Humidity</span><span class="weather-detail-value">{humidity}%</span></div>
                    <div class="weather-detail-row"><span class="weather-detail-label">Condition</span><span class="weather-detail-value">{condition}</span></div>
                </div>
            </div>
            <div class="todos-section">
                <div class="section-title">TODAY'S TASKS</div>
                {todos_html}
            </div>
        </div>
        <div class="timeline">{timeline_html}</div>
    </div>
</div>
<div class="footer-timestamp">Updated: {updated}</div>
</body>
</html>"#,
        temp = weather.temp,
        feels_like = weather.feels_like,
        humidity = weather.humidity,
        location = escape_html(location_label),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use chrono_tz::Asia::Kolkata;
    use inkboard_core::event::{RawEvent, finalize_events};

    fn weather() -> WeatherReport {
        WeatherReport {
            temp: 31,
            feels_like: 34,
            humidity: 60,
            condition: 61,
            is_day: 1,
            time: "2026-03-10T14:00".to_string(),
            forecast: Vec::new(),
        }
    }

    fn now() -> DateTime<Tz> {
        Kolkata.with_ymd_and_hms(2026, 3, 10, 14, 5, 0).unwrap()
    }

    fn events(specs: &[(&str, u32, u32)]) -> Vec<Event> {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let raw = specs
            .iter()
            .map(|(title, h, m)| {
                let start = Kolkata
                    .from_local_datetime(&today.and_hms_opt(*h, *m, 0).unwrap())
                    .unwrap()
                    .with_timezone(&Utc);
                RawEvent {
                    title: title.to_string(),
                    start,
                    end: start + chrono::Duration::minutes(30),
                    attendees: Vec::new(),
                    kind: None,
                }
            })
            .collect();
        finalize_events(raw, Kolkata, today)
    }

    #[test]
    fn test_page_includes_weather_and_header() {
        let html = render_dashboard(&weather(), &[], &[], now(), "Gurugram, India");

        assert!(html.contains("Tuesday, Mar 10"));
        assert!(html.contains("2:05 PM"));
        assert!(html.contains("Rain"));
        assert!(html.contains("Gurugram, India"));
        assert!(html.contains("Updated: 2026-03-10 14:05:00 IST"));
        assert!(html.contains("http-equiv=\"refresh\""));
    }

    #[test]
    fn test_colliding_hour_renders_first_event_only() {
        let html = render_dashboard(
            &weather(),
            &events(&[("First focus", 10, 0), ("Second focus", 10, 45)]),
            &[],
            now(),
            "Gurugram, India",
        );

        assert!(html.contains("First focus"));
        assert!(!html.contains("Second focus"));
    }

    #[test]
    fn test_completed_todo_gets_strikethrough_class() {
        let todos = vec![
            Todo {
                id: "a".to_string(),
                text: "Done thing".to_string(),
                completed: true,
                list: None,
                priority: None,
                created_at: None,
            },
            Todo {
                id: "b".to_string(),
                text: "Open thing".to_string(),
                completed: false,
                list: None,
                priority: None,
                created_at: None,
            },
        ];

        let html = render_dashboard(&weather(), &[], &todos, now(), "Gurugram, India");

        assert!(html.contains("<span class=\"todo-completed\">Done thing</span>"));
        assert!(html.contains("<span>Open thing</span>"));
    }

    #[test]
    fn test_event_titles_are_escaped() {
        let html = render_dashboard(
            &weather(),
            &events(&[("<script> sync", 11, 0)]),
            &[],
            now(),
            "Gurugram, India",
        );

        assert!(html.contains("&lt;script&gt; sync"));
        assert!(!html.contains("<script> sync"));
    }
}
