//! Server-rendered upload page.

use crate::history::HistoryEntry;
use crate::server::AppContext;
use axum::{extract::State, response::Html, routing::get, Router};
use mp3forge_common::Bitrate;
use std::fmt::Write;

pub fn ui_routes() -> Router<AppContext> {
    Router::new().route("/", get(index))
}

async fn index(State(ctx): State<AppContext>) -> Html<String> {
    Html(render_index(
        ctx.config.conversion.default_bitrate,
        &ctx.history.list(),
    ))
}

const PAGE_HEAD: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>MP4 to MP3 Converter</title>
<style>
body { font-family: system-ui, sans-serif; max-width: 46rem; margin: 2rem auto; padding: 0 1rem; color: #222; }
form { display: grid; gap: .75rem; padding: 1rem; border: 1px solid #ddd; border-radius: .5rem; }
label { display: grid; gap: .25rem; font-weight: 600; }
small, .muted { color: #666; font-weight: normal; }
#status.error { color: #b00020; }
#status.ok { color: #1b7a2a; }
footer { margin-top: 2rem; border-top: 1px solid #eee; padding-top: .5rem; color: #888; }
</style>
</head>
<body>
<h1>MP4 to MP3 Converter</h1>
<p>Upload an MP4 file and download its audio track as MP3.</p>
"#;

const PAGE_SCRIPT: &str = r#"<script>
const form = document.getElementById('convert-form');
const status = document.getElementById('status');

function setStatus(text, cls) {
  status.textContent = text;
  status.className = cls || '';
}

function fileNameFrom(response) {
  const header = response.headers.get('content-disposition') || '';
  const star = header.match(/filename\*=UTF-8''([^;]+)/);
  if (star) return decodeURIComponent(star[1]);
  const plain = header.match(/filename="([^"]+)"/);
  return plain ? plain[1] : 'audio.mp3';
}

async function refreshHistory() {
  const response = await fetch('/api/history');
  if (!response.ok) return;
  const entries = await response.json();
  const list = document.getElementById('history');
  list.replaceChildren();
  if (entries.length === 0) {
    const li = document.createElement('li');
    li.className = 'muted';
    li.textContent = 'No conversions yet';
    list.appendChild(li);
    return;
  }
  for (const e of entries) {
    const li = document.createElement('li');
    li.textContent = `${e.file_name} - ${e.bitrate_kbps}kbps - ${e.timestamp}`;
    list.appendChild(li);
  }
}

function formatSize(bytes) {
  return (bytes / (1024 * 1024)).toFixed(2) + ' MB';
}

form.elements.file.addEventListener('change', (event) => {
  const file = event.target.files[0];
  document.getElementById('selected').textContent =
    file ? `Selected: ${file.name} (${formatSize(file.size)})` : '';
});

form.addEventListener('submit', async (event) => {
  event.preventDefault();
  const data = new FormData(form);
  const bitrate = data.get('bitrate');
  setStatus(`Converting to ${bitrate}kbps MP3... this can take a while.`);
  form.querySelector('button').disabled = true;
  try {
    const response = await fetch('/api/convert', { method: 'POST', body: data });
    if (!response.ok) {
      let message = response.statusText;
      try { message = (await response.json()).error || message; } catch (_) {}
      setStatus(`Conversion failed: ${message}`, 'error');
      return;
    }
    const name = fileNameFrom(response);
    const url = URL.createObjectURL(await response.blob());
    const link = document.createElement('a');
    link.href = url;
    link.download = name;
    link.textContent = `Download ${name}`;
    status.replaceChildren(document.createTextNode('Conversion complete. '), link);
    status.className = 'ok';
    const savedTo = response.headers.get('x-mp3forge-saved-to');
    if (savedTo) status.append(` Saved to ${savedTo}.`);
    link.click();
    refreshHistory();
  } catch (err) {
    setStatus(`Conversion failed: ${err}`, 'error');
  } finally {
    form.querySelector('button').disabled = false;
  }
});
</script>
"#;

/// Render the upload page.
pub fn render_index(default_bitrate: Bitrate, history: &[HistoryEntry]) -> String {
    let mut page = String::from(PAGE_HEAD);

    page.push_str(
        r#"<form id="convert-form" action="/api/convert" method="post" enctype="multipart/form-data">
<label>MP4 file <input type="file" name="file" accept="video/mp4,.mp4" required></label>
<p id="selected" class="muted"></p>
<label>Audio quality (kbps) <select name="bitrate">
"#,
    );
    for bitrate in Bitrate::ALL {
        let selected = if bitrate == default_bitrate {
            " selected"
        } else {
            ""
        };
        let _ = writeln!(
            page,
            r#"<option value="{0}"{1}>{0}</option>"#,
            bitrate.kbps(),
            selected
        );
    }
    page.push_str(
        r#"</select><small>Higher quality means a larger file</small></label>
<label>Custom file name (without .mp3) <input type="text" name="name" placeholder="Defaults to the uploaded file name"></label>
<button type="submit">Convert to MP3</button>
</form>
<p id="status" role="status"></p>
<h2>Recently converted</h2>
<ul id="history">
"#,
    );

    if history.is_empty() {
        page.push_str("<li class=\"muted\">No conversions yet</li>\n");
    } else {
        for entry in history {
            let _ = writeln!(
                page,
                "<li>{} - {}kbps - {}</li>",
                escape_html(&entry.file_name),
                entry.bitrate_kbps,
                escape_html(&entry.timestamp)
            );
        }
    }

    page.push_str("</ul>\n<footer>mp3forge ");
    page.push_str(env!("CARGO_PKG_VERSION"));
    page.push_str("</footer>\n");
    page.push_str(PAGE_SCRIPT);
    page.push_str("</body>\n</html>\n");
    page
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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
