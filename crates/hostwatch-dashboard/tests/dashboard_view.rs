#![allow(clippy::unwrap_used)]

use hostwatch_core::{LocalMetrics, MetricsSnapshot, RemoteReading};
use hostwatch_dashboard::auth::UserIdentity;
use hostwatch_dashboard::web::view::render_dashboard;

fn user() -> UserIdentity {
    UserIdentity {
        name: "Grace".into(),
        email: "grace@example.com".into(),
        subject: None,
    }
}

const LOCAL: LocalMetrics = LocalMetrics {
    cpu: 12.5,
    memory: 40.0,
    disk: 71.3,
};

#[test]
fn local_only_page_has_one_row_per_metric() {
    let html = render_dashboard(&user(), &MetricsSnapshot::merge(LOCAL, None));

    assert_eq!(html.matches("<tr>").count(), 3);
    assert!(html.contains("<tr><th>CPU</th><td>12.50 %</td></tr>\n"));
    assert!(html.contains("<tr><th>Disk (/)</th><td>71.30 %</td></tr>\n"));
    assert!(html.contains("grace@example.com"));
    assert!(!html.contains("Container platform"));
}

#[test]
fn remote_section_renders_values_and_escaped_error() {
    let ok = render_dashboard(
        &user(),
        &MetricsSnapshot::merge(LOCAL, Some(RemoteReading::ok(0.456, 512.0))),
    );
    assert!(ok.contains("    <h2>Container platform</h2>\n    <table>\n"));
    assert!(ok.contains("<td>512.00 MB</td>"));
    assert_eq!(ok.matches("<tr>").count(), 5);
    assert!(!ok.contains("Remote metrics unavailable"));

    let failed = render_dashboard(
        &user(),
        &MetricsSnapshot::merge(LOCAL, Some(RemoteReading::failed("<401> & denied"))),
    );
    assert!(failed.contains("<td>n/a</td>"));
    assert!(failed.contains(
        "<p class=\"error\">Remote metrics unavailable: &lt;401&gt; &amp; denied</p>\n"
    ));
}
