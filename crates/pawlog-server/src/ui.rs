//! HTML rendering for the single-page front end.
//!
//! The page is a fixed template with `{{PLACEHOLDER}}` slots. The chart is
//! drawn client-side by Chart.js from a JSON blob embedded in the page.

use pawlog_core::{
  entry::{EntryDate, EntryInput, Weight, WeightEntry, WeightInput},
  filter::EntryFilter,
  series::Projection,
  service::Listing,
};
use serde::Serialize;

// ─── Flash messages ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashLevel {
  Success,
  Info,
  Error,
}

/// A one-shot status line shown above the page content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
  pub level:   FlashLevel,
  pub message: String,
}

impl Flash {
  pub fn success(message: impl Into<String>) -> Self {
    Self { level: FlashLevel::Success, message: message.into() }
  }

  pub fn info(message: impl Into<String>) -> Self {
    Self { level: FlashLevel::Info, message: message.into() }
  }

  pub fn error(message: impl Into<String>) -> Self {
    Self { level: FlashLevel::Error, message: message.into() }
  }

  fn class(&self) -> &'static str {
    match self.level {
      FlashLevel::Success => "flash success",
      FlashLevel::Info => "flash info",
      FlashLevel::Error => "flash error",
    }
  }
}

// ─── Entry form ──────────────────────────────────────────────────────────────

/// Values to prefill the add/edit form with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
  pub subject: String,
  pub weight:  String,
  pub date:    String,
  /// `true` when the form was prefilled from an existing entry.
  pub editing: bool,
}

impl FormValues {
  pub fn blank(today: EntryDate) -> Self {
    Self { date: today.to_string(), ..Self::default() }
  }

  pub fn from_entry(entry: &WeightEntry) -> Self {
    Self {
      subject: entry.subject.to_string(),
      weight:  entry.weight.kg().to_string(),
      date:    entry.date.to_string(),
      editing: true,
    }
  }

  /// Echo a rejected submission back into the form.
  pub fn from_input(input: &EntryInput) -> Self {
    Self {
      subject: input.subject.clone(),
      weight:  match &input.weight {
        WeightInput::Number(n) => n.to_string(),
        WeightInput::Text(s) => s.clone(),
        WeightInput::Missing | WeightInput::Unsupported(_) => String::new(),
      },
      date:    input.date.clone(),
      editing: false,
    }
  }
}

// ─── Chart hand-off ──────────────────────────────────────────────────────────

/// Line colours, assigned by series position and reused cyclically.
pub const PALETTE: [&str; 8] = [
  "#e4572e", "#17bebb", "#ffc914", "#2e282a", "#76b041", "#7d5ba6", "#f29e4c", "#3d5a80",
];

pub fn series_color(index: usize) -> &'static str { PALETTE[index % PALETTE.len()] }

#[derive(Serialize)]
struct ChartData<'a> {
  labels:   &'a [EntryDate],
  datasets: Vec<Dataset<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Dataset<'a> {
  label:            &'a str,
  data:             &'a [Option<Weight>],
  border_color:     &'static str,
  background_color: &'static str,
  /// Draw across gaps instead of dropping the line.
  span_gaps:        bool,
}

fn chart_json(chart: &Projection) -> String {
  let data = ChartData {
    labels:   &chart.date_axis,
    datasets: chart
      .series
      .iter()
      .enumerate()
      .map(|(i, s)| Dataset {
        label:            s.subject.as_str(),
        data:             &s.points,
        border_color:     series_color(i),
        background_color: series_color(i),
        span_gaps:        true,
      })
      .collect(),
  };
  // Markup characters only occur inside JSON strings, where the `\u` escapes
  // decode to the same text and cannot end the surrounding <script> element.
  serde_json::to_string(&data)
    .map(|json| {
      json
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
    })
    .unwrap_or_else(|_| r#"{"labels":[],"datasets":[]}"#.to_owned())
}

// ─── Page ────────────────────────────────────────────────────────────────────

pub struct Page<'a> {
  pub title:   &'a str,
  pub listing: &'a Listing,
  pub flash:   Option<&'a Flash>,
  pub form:    &'a FormValues,
}

pub fn render_index(page: &Page<'_>) -> String {
  let filter = &page.listing.filter;
  let form = page.form;

  fill(INDEX_HTML, |slot| {
    Some(match slot {
      "TITLE" => escape(page.title),
      "FLASH" => render_flash(page.flash),
      "FILTER_START" => date_value(filter.start),
      "FILTER_END" => date_value(filter.end),
      "FILTER_KEPT" => render_kept_filter(filter),
      "SUBJECT_OPTIONS" => render_subject_options(page.listing, filter),
      "CAT_SUGGESTIONS" => render_suggestions(page.listing),
      "FORM_LEGEND" => if form.editing { "Edit entry" } else { "Add entry" }.to_owned(),
      "FORM_SUBJECT" => escape(&form.subject),
      "FORM_WEIGHT" => escape(&form.weight),
      "FORM_DATE" => escape(&form.date),
      "CHART_HIDDEN" => if page.listing.chart.is_empty() { " hidden" } else { "" }.to_owned(),
      "ROWS" => render_rows(&page.listing.entries, filter),
      "CHART_JSON" => chart_json(&page.listing.chart),
      _ => return None,
    })
  })
}

/// Substitute every `{{NAME}}` in `template` in one left-to-right pass.
///
/// Substituted text is never rescanned, so values that happen to contain
/// `{{...}}` come out verbatim. Unknown names are left in place.
fn fill(template: &str, mut slot: impl FnMut(&str) -> Option<String>) -> String {
  let mut out = String::with_capacity(template.len() * 2);
  let mut rest = template;

  while let Some(open) = rest.find("{{") {
    out.push_str(&rest[..open]);
    let after = &rest[open + 2..];
    let Some(close) = after.find("}}") else {
      rest = &rest[open..];
      break;
    };
    let name = &after[..close];
    match slot(name) {
      Some(value) => out.push_str(&value),
      None => out.push_str(&rest[open..open + close + 4]),
    }
    rest = &after[close + 2..];
  }

  out.push_str(rest);
  out
}

/// Minimal page for when the store cannot be read at all.
pub fn render_failure(title: &str, message: &str) -> String {
  format!(
    "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"UTF-8\" /><title>{t}</title></head>\
     <body><h1>{t}</h1><p class=\"flash error\">{m}</p></body></html>",
    t = escape(title),
    m = escape(message),
  )
}

fn render_flash(flash: Option<&Flash>) -> String {
  flash
    .map(|f| format!("<p class=\"{}\" role=\"status\">{}</p>", f.class(), escape(&f.message)))
    .unwrap_or_default()
}

fn date_value(date: Option<EntryDate>) -> String {
  date.map(|d| d.to_string()).unwrap_or_default()
}

/// Hidden inputs that carry the active filter through a form post.
fn render_kept_filter(filter: &EntryFilter) -> String {
  let subject = filter.subject.as_ref().map(|s| escape(s.as_str())).unwrap_or_default();
  format!(
    "<input type=\"hidden\" name=\"keep_start_date\" value=\"{}\" />\
     <input type=\"hidden\" name=\"keep_end_date\" value=\"{}\" />\
     <input type=\"hidden\" name=\"keep_subject\" value=\"{subject}\" />",
    date_value(filter.start),
    date_value(filter.end),
  )
}

fn render_subject_options(listing: &Listing, filter: &EntryFilter) -> String {
  let mut out = String::from("<option value=\"\">All cats</option>");
  for name in &listing.subjects {
    let selected = if filter.subject.as_ref() == Some(name) { " selected" } else { "" };
    let name = escape(name.as_str());
    out.push_str(&format!("<option value=\"{name}\"{selected}>{name}</option>"));
  }
  out
}

fn render_suggestions(listing: &Listing) -> String {
  listing
    .subjects
    .iter()
    .map(|name| format!("<option value=\"{}\"></option>", escape(name.as_str())))
    .collect()
}

fn render_rows(entries: &[WeightEntry], filter: &EntryFilter) -> String {
  if entries.is_empty() {
    return "<tr><td colspan=\"4\" class=\"empty\">No entries yet.</td></tr>".to_owned();
  }
  let kept = render_kept_filter(filter);
  entries
    .iter()
    .map(|e| {
      format!(
        "<tr><td>{date}</td><td>{subject}</td><td>{weight}</td><td class=\"actions\">\
         <a href=\"/?edit={id}\">Edit</a>\
         <form method=\"post\" action=\"/entries/{id}/delete\">{kept}\
         <button type=\"submit\">Delete</button></form></td></tr>",
        date = e.date,
        subject = escape(e.subject.as_str()),
        weight = e.weight,
        id = e.id,
      )
    })
    .collect()
}

fn escape(raw: &str) -> String {
  let mut out = String::with_capacity(raw.len());
  for c in raw.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#39;"),
      _ => out.push(c),
    }
  }
  out
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}}</title>
  <script src="https://cdn.jsdelivr.net/npm/chart.js"></script>
  <style>
    :root {
      --ink: #2b2a28;
      --muted: #6b6761;
      --card: #ffffff;
      --bg: #f6f1ea;
      --accent: #e4572e;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      padding: 32px 18px 48px;
    }

    main {
      width: min(960px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 24px;
    }

    section {
      background: var(--card);
      border-radius: 16px;
      padding: 20px 24px;
      box-shadow: 0 12px 30px rgba(43, 42, 40, 0.08);
    }

    form.inline {
      display: flex;
      flex-wrap: wrap;
      gap: 12px;
      align-items: end;
    }

    label {
      display: grid;
      gap: 4px;
      font-size: 0.9rem;
      color: var(--muted);
    }

    input, select, button {
      font: inherit;
      padding: 6px 10px;
    }

    button {
      background: var(--accent);
      color: #fff;
      border: 0;
      border-radius: 8px;
      cursor: pointer;
    }

    table {
      width: 100%;
      border-collapse: collapse;
    }

    th, td {
      text-align: left;
      padding: 8px;
      border-bottom: 1px solid #eee4d8;
    }

    td.actions {
      display: flex;
      gap: 10px;
      align-items: center;
    }

    td.actions form {
      margin: 0;
    }

    td.empty {
      color: var(--muted);
      text-align: center;
    }

    .flash {
      margin: 0;
      padding: 12px 16px;
      border-radius: 10px;
    }

    .flash.success { background: #e3f4e1; }
    .flash.info { background: #e4eef8; }
    .flash.error { background: #fbe2dc; }
  </style>
</head>
<body>
  <main>
    <header>
      <h1>{{TITLE}}</h1>
    </header>

    {{FLASH}}

    <section>
      <h2>{{FORM_LEGEND}}</h2>
      <form class="inline" method="post" action="/entries">
        <label>Cat
          <input name="subject" list="cat-names" value="{{FORM_SUBJECT}}" required />
        </label>
        <datalist id="cat-names">{{CAT_SUGGESTIONS}}</datalist>
        <label>Weight (kg)
          <input name="weight" type="number" step="0.01" min="0.01" value="{{FORM_WEIGHT}}" required />
        </label>
        <label>Date
          <input name="date" type="date" value="{{FORM_DATE}}" required />
        </label>
        {{FILTER_KEPT}}
        <button type="submit">Save</button>
      </form>
    </section>

    <section>
      <h2>Filter</h2>
      <form class="inline" method="get" action="/">
        <label>From
          <input name="start_date" type="date" value="{{FILTER_START}}" />
        </label>
        <label>To
          <input name="end_date" type="date" value="{{FILTER_END}}" />
        </label>
        <label>Cat
          <select name="subject">{{SUBJECT_OPTIONS}}</select>
        </label>
        <button type="submit">Apply</button>
        <a href="/">Reset</a>
      </form>
    </section>

    <section{{CHART_HIDDEN}}>
      <h2>Weight over time</h2>
      <canvas id="weight-chart" height="120"></canvas>
    </section>

    <section>
      <h2>Entries</h2>
      <table>
        <thead>
          <tr><th>Date</th><th>Cat</th><th>Weight</th><th></th></tr>
        </thead>
        <tbody>{{ROWS}}</tbody>
      </table>
    </section>
  </main>

  <script id="chart-data" type="application/json">{{CHART_JSON}}</script>
  <script>
    const chartData = JSON.parse(document.getElementById("chart-data").textContent);
    const canvas = document.getElementById("weight-chart");
    const section = canvas.closest("section");
    if (typeof Chart === "undefined") {
      section.hidden = true;
    } else if (!section.hidden) {
      new Chart(canvas, {
        type: "line",
        data: chartData,
        options: {
          scales: { y: { title: { display: true, text: "kg" } } },
        },
      });
    }
  </script>
</body>
</html>
"#;
