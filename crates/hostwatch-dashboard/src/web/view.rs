//! Server-rendered dashboard page.

use hostwatch_core::MetricsSnapshot;

use crate::auth::UserIdentity;

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn fmt_value(v: Option<f64>, unit: &str) -> String {
    match v {
        Some(v) => format!("{v:.2}{unit}"),
        None => "n/a".to_string(),
    }
}

fn row(out: &mut String, label: &str, value: &str) {
    out.push_str(&format!(
        "      <tr><th>{}</th><td>{}</td></tr>\n",
        html_escape(label),
        html_escape(value)
    ));
}

pub fn render_dashboard(user: &UserIdentity, snapshot: &MetricsSnapshot) -> String {
    let mut rows = String::new();
    row(&mut rows, "CPU", &fmt_value(Some(snapshot.local.cpu), " %"));
    row(&mut rows, "Memory", &fmt_value(Some(snapshot.local.memory), " %"));
    row(&mut rows, "Disk (/)", &fmt_value(Some(snapshot.local.disk), " %"));

    let mut remote = String::new();
    if let Some(r) = &snapshot.remote {
        remote.push_str("    <h2>Container platform</h2>\n    <table>\n");
        row(&mut remote, "CPU", &fmt_value(r.azure_cpu, ""));
        row(&mut remote, "Memory", &fmt_value(r.azure_memory, " MB"));
        remote.push_str("    </table>\n");
        if let Some(err) = &r.error {
            remote.push_str(&format!(
                "    <p class=\"error\">Remote metrics unavailable: {}</p>\n",
                html_escape(err)
            ));
        }
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>hostwatch</title>
  <style>
    body {{ font-family: sans-serif; margin: 2rem; }}
    table {{ border-collapse: collapse; margin-bottom: 1.5rem; }}
    th, td {{ text-align: left; padding: 0.3rem 1rem; border-bottom: 1px solid #ddd; }}
    .error {{ color: #b00020; }}
  </style>
</head>
<body>
  <header>
    <p>Signed in as <strong>{name}</strong> ({email}) &middot; <a href="/logout">Log out</a></p>
  </header>
  <main>
    <h1>System metrics</h1>
    <table>
{rows}    </table>
{remote}    <p><a href="/">Refresh</a> &middot; <a href="/api/metrics">JSON</a></p>
  </main>
</body>
</html>
"#,
        name = html_escape(&user.name),
        email = html_escape(&user.email),
        rows = rows,
        remote = remote,
    )
}
