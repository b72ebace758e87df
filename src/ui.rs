use crate::models::{Notice, NoticeKind, Overview};
use chrono::NaiveDate;

pub fn render_index(today: NaiveDate, overview: &Overview, notice: Option<&Notice>) -> String {
    INDEX_HTML
        .replace("{{NOTICE}}", &render_notice(notice))
        .replace("{{MONTH_COUNT}}", &overview.month_count.to_string())
        .replace("{{TODAY}}", &today.format("%Y-%m-%d").to_string())
        .replace("{{HISTORY}}", &render_history(overview))
}

fn render_notice(notice: Option<&Notice>) -> String {
    match notice {
        Some(notice) => format!(
            r#"<div class="notice" data-type="{}" role="status">{}</div>"#,
            notice.kind.as_str(),
            escape_html(&notice.message)
        ),
        None => String::new(),
    }
}

fn render_history(overview: &Overview) -> String {
    if overview.visits.is_empty() {
        return format!(
            r#"<div class="notice" data-type="{}">No office visits logged yet.</div>"#,
            NoticeKind::Info.as_str()
        );
    }

    let rows: String = overview
        .visits
        .iter()
        .map(|row| {
            let date = escape_html(&row.date);
            format!(
                r#"
        <tr>
          <td class="date">{date}</td>
          <td class="weekday">{weekday}</td>
          <td class="action">
            <form method="post" action="/visits/{date}/delete">
              <button class="btn-delete" type="submit" title="Delete {date}" aria-label="Delete {date}">&#x1F5D1;&#xFE0F;</button>
            </form>
          </td>
        </tr>"#,
                weekday = escape_html(&row.weekday),
            )
        })
        .collect();

    format!(
        r#"<table class="history">
        <thead>
          <tr><th>Date</th><th>Weekday</th><th></th></tr>
        </thead>
        <tbody>{rows}
        </tbody>
      </table>"#
    )
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>DayLogger</title>
  <style>
    :root {
      --bg-1: #f8f3e6;
      --bg-2: #f5d3a7;
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.86);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #ffe9d4 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(720px, 100%);
      background: var(--card);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 24px;
    }

    h1 {
      font-family: "Georgia", serif;
      font-size: clamp(2rem, 4vw, 2.8rem);
      margin: 0;
    }

    h2 {
      margin: 0 0 12px;
      font-size: 1.3rem;
    }

    .count {
      margin: 0;
      font-size: 1.5rem;
      color: var(--accent-2);
    }

    .log-form {
      display: flex;
      flex-wrap: wrap;
      gap: 12px;
      align-items: center;
    }

    input[type="date"] {
      font: inherit;
      padding: 12px 14px;
      border-radius: 12px;
      border: 1px solid rgba(47, 72, 88, 0.25);
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 12px 20px;
      font-size: 1rem;
      font-weight: 600;
      cursor: pointer;
    }

    .btn-log {
      background: var(--accent);
      color: white;
      box-shadow: 0 10px 24px rgba(255, 107, 74, 0.3);
    }

    .btn-delete {
      background: transparent;
      padding: 6px 10px;
    }

    .history {
      width: 100%;
      border-collapse: collapse;
      background: white;
      border-radius: 18px;
      overflow: hidden;
    }

    .history th,
    .history td {
      padding: 10px 14px;
      text-align: left;
      border-bottom: 1px solid rgba(47, 72, 88, 0.08);
    }

    .history td.action {
      width: 10%;
      text-align: right;
    }

    .notice {
      padding: 12px 16px;
      border-radius: 12px;
      font-size: 0.95rem;
    }

    .notice[data-type="success"] {
      background: #e3f4e9;
      color: #2d7a4b;
    }

    .notice[data-type="warning"] {
      background: #fff4d6;
      color: #8a6210;
    }

    .notice[data-type="error"] {
      background: #fbe3df;
      color: #c63b2b;
    }

    .notice[data-type="info"] {
      background: #e4eef5;
      color: var(--accent-2);
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>DayLogger</h1>
    </header>

    {{NOTICE}}

    <p class="count">Office Visits This Month: <span id="month-count">{{MONTH_COUNT}}</span></p>

    <section>
      <h2>Log Office Visit</h2>
      <form class="log-form" method="post" action="/visits">
        <label for="visit-date">Select Date</label>
        <input id="visit-date" type="date" name="date" value="{{TODAY}}" required />
        <button class="btn-log" type="submit">Log Visit</button>
      </form>
    </section>

    <section>
      <h2>Office Visit History</h2>
      {{HISTORY}}
    </section>
  </main>
</body>
</html>
"#;
